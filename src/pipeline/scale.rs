//! Output scale selection.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Multiplier applied to the model's native output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleSelection {
    /// Keep the model's output size.
    #[default]
    Original,
    /// 1.5x
    OneAndHalf,
    /// 2x
    Double,
    /// 3x
    Triple,
    /// 0.5x
    Half,
}

impl ScaleSelection {
    /// Every selection, in selector order.
    pub const ALL: [Self; 5] = [
        Self::Original,
        Self::OneAndHalf,
        Self::Double,
        Self::Triple,
        Self::Half,
    ];

    /// Label shown in the scale selector and accepted by [`FromStr`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::OneAndHalf => "1.5x",
            Self::Double => "2x",
            Self::Triple => "3x",
            Self::Half => "0.5x",
        }
    }

    /// Numeric multiplier.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Original => 1.0,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
            Self::Triple => 3.0,
            Self::Half => 0.5,
        }
    }

    /// Scale `(width, height)`, rounding to the nearest pixel.
    ///
    /// Each side is at least one pixel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply(self, (width, height): (u32, u32)) -> (u32, u32) {
        let m = self.multiplier();
        let scale = |side: u32| ((f64::from(side) * m).round() as u32).max(1);
        (scale(width), scale(height))
    }
}

impl fmt::Display for ScaleSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScaleSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|scale| scale.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedScale {
                label: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        for scale in ScaleSelection::ALL {
            assert_eq!(scale.label().parse::<ScaleSelection>().unwrap(), scale);
        }
        assert_eq!(
            "original".parse::<ScaleSelection>().unwrap(),
            ScaleSelection::Original
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            "4x".parse::<ScaleSelection>(),
            Err(Error::UnsupportedScale { .. })
        ));
    }

    #[test]
    fn test_apply_rounds() {
        assert_eq!(ScaleSelection::Original.apply((296, 296)), (296, 296));
        assert_eq!(ScaleSelection::Double.apply((640, 480)), (1280, 960));
        assert_eq!(ScaleSelection::OneAndHalf.apply((333, 101)), (500, 152));
        assert_eq!(ScaleSelection::Half.apply((257, 3)), (129, 2));
        assert_eq!(ScaleSelection::Half.apply((1, 1)), (1, 1));
    }
}
