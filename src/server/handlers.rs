//! Request handlers for the upload page, stylization, and health check.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use serde::Serialize;

use crate::image::{check_extension, UploadedImage};
use crate::pipeline::ScaleSelection;

use super::error::{AppError, AppResult, PageError};
use super::page;
use super::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Model variant being served.
    pub variant: &'static str,
    /// Execution device the model runs on.
    pub device: &'static str,
}

/// GET /health -- returns service status and the loaded model.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        variant: state.stylizer.variant().name(),
        device: state.stylizer.device().as_str(),
    })
}

/// GET / -- the upload form.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::upload_page(
        state.stylizer.variant(),
        ScaleSelection::Original,
        None,
    ))
}

/// An uploaded file as received, before decoding.
struct Upload {
    filename: Option<String>,
    bytes: Vec<u8>,
}

/// Fields of the upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<Upload>,
    scale: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" => {
                    let filename = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await?;
                    form.file = Some(Upload {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
                "scale" => {
                    form.scale = Some(field.text().await?);
                }
                _ => {} // ignore unknown fields
            }
        }

        Ok(form)
    }
}

/// POST /stylize
///
/// Accepts a multipart form with a required `file` field and an optional
/// `scale` field (default `Original`). Returns the side-by-side result page,
/// or the upload page with an error message.
pub async fn stylize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, PageError> {
    let variant = state.stylizer.variant();

    let form = UploadForm::read(multipart)
        .await
        .map_err(|e| e.on_page(variant, ScaleSelection::Original))?;

    let scale = variant
        .parse_scale(form.scale.as_deref().unwrap_or(ScaleSelection::Original.label()))
        .map_err(|e| AppError::from(e).on_page(variant, ScaleSelection::Original))?;

    render_result(&state, form.file, scale)
        .await
        .map(Html)
        .map_err(|e| e.on_page(variant, scale))
}

async fn render_result(
    state: &AppState,
    file: Option<Upload>,
    scale: ScaleSelection,
) -> AppResult<String> {
    let upload = file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    if let Some(filename) = upload.filename.as_deref().filter(|name| !name.is_empty()) {
        check_extension(filename)?;
    }

    let stylizer = Arc::clone(&state.stylizer);
    let page = tokio::task::spawn_blocking(move || {
        let original = UploadedImage::decode(&upload.bytes)?;
        tracing::info!(
            width = original.width(),
            height = original.height(),
            %scale,
            "Stylizing upload"
        );

        let stylized = stylizer.stylize(&original, scale)?;
        tracing::info!(
            width = stylized.width(),
            height = stylized.height(),
            "Stylized image ready"
        );

        page::present(stylizer.variant(), scale, &original, &stylized)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(page)
}
