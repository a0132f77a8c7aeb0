//! Execution device selection.

use std::fmt;

use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, ExecutionProvider, ExecutionProviderDispatch,
};

/// Hardware backend an ONNX session runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionDevice {
    /// CUDA GPU, with CPU fallback for unsupported operators.
    Cuda,
    /// CPU only.
    Cpu,
}

impl ExecutionDevice {
    /// Probe the runtime for a usable GPU.
    ///
    /// Returns [`ExecutionDevice::Cpu`] when `force_cpu` is set or the CUDA
    /// execution provider is not available in the loaded ONNX Runtime.
    #[must_use]
    pub fn probe(force_cpu: bool) -> Self {
        if force_cpu {
            tracing::info!("CPU execution forced by configuration");
            return Self::Cpu;
        }

        match CUDAExecutionProvider::default().is_available() {
            Ok(true) => Self::Cuda,
            Ok(false) => Self::Cpu,
            Err(err) => {
                tracing::warn!("Failed to query CUDA availability, using CPU: {err}");
                Self::Cpu
            }
        }
    }

    /// Execution providers to register on a session, in priority order.
    pub(crate) fn providers(self) -> Vec<ExecutionProviderDispatch> {
        match self {
            Self::Cuda => vec![
                CUDAExecutionProvider::default().build(),
                CPUExecutionProvider::default().build(),
            ],
            Self::Cpu => vec![CPUExecutionProvider::default().build()],
        }
    }

    /// Short lowercase name, as reported by the health endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::Cpu => "cpu",
        }
    }
}

impl fmt::Display for ExecutionDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
