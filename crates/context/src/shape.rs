//! Screen shape classification.
//!
//! Maps raw display dimensions to a coarse aspect-ratio bucket. The bucket
//! drives both coordinate selection in the binding table and the fallback
//! mode hint when no foreground app hint applies.

use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// Ratios at or above this are treated as ~20:9 (20:9 ≈ 2.22).
pub const TALL_RATIO_MIN: f32 = 2.1;

/// Lower bound of the ~16:9 band (16:9 ≈ 1.78).
pub const WIDE_RATIO_MIN: f32 = 1.6;

/// Exclusive upper bound of the ~16:9 band.
pub const WIDE_RATIO_MAX: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Coarse aspect-ratio bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectBucket {
    /// Roughly 16:9 (1.6 ≤ ratio < 2.0).
    #[serde(rename = "16x9")]
    Bucket16x9,
    /// Roughly 20:9 (ratio ≥ 2.1).
    #[serde(rename = "20x9")]
    Bucket20x9,
    /// Anything else. Produces no mode hint.
    Unclassified,
}

impl AspectBucket {
    /// Classify display dimensions. Orientation does not matter.
    pub fn classify(width_px: u32, height_px: u32) -> Self {
        let long = width_px.max(height_px);
        let short = width_px.min(height_px);
        if short == 0 {
            return AspectBucket::Unclassified;
        }

        let ratio = long as f32 / short as f32;
        if ratio >= TALL_RATIO_MIN {
            AspectBucket::Bucket20x9
        } else if (WIDE_RATIO_MIN..WIDE_RATIO_MAX).contains(&ratio) {
            AspectBucket::Bucket16x9
        } else {
            AspectBucket::Unclassified
        }
    }

    /// Default mode suggested for this bucket, if any.
    pub fn fallback_mode(&self) -> Option<Mode> {
        match self {
            AspectBucket::Bucket20x9 => Some(Mode::YouTube),
            AspectBucket::Bucket16x9 => Some(Mode::Tv),
            AspectBucket::Unclassified => None,
        }
    }
}

impl std::fmt::Display for AspectBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AspectBucket::Bucket16x9 => "~16:9",
            AspectBucket::Bucket20x9 => "~20:9",
            AspectBucket::Unclassified => "unclassified",
        };
        f.write_str(s)
    }
}

/// Latest known display configuration, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width_px: u32,
    pub height_px: u32,
    pub orientation: Orientation,
}

impl DisplayMetrics {
    pub fn new(width_px: u32, height_px: u32, orientation: Orientation) -> Self {
        Self {
            width_px,
            height_px,
            orientation,
        }
    }

    pub fn shape(&self) -> ScreenShape {
        ScreenShape {
            orientation: self.orientation,
            aspect: AspectBucket::classify(self.width_px, self.height_px),
        }
    }
}

impl Default for DisplayMetrics {
    /// A typical 20:9 phone held upright.
    fn default() -> Self {
        Self::new(1080, 2400, Orientation::Portrait)
    }
}

/// Orientation plus aspect bucket, used to select coordinate sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenShape {
    pub orientation: Orientation,
    pub aspect: AspectBucket,
}

impl ScreenShape {
    pub fn new(orientation: Orientation, aspect: AspectBucket) -> Self {
        Self {
            orientation,
            aspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tall_phone_is_20x9() {
        assert_eq!(AspectBucket::classify(1080, 2400), AspectBucket::Bucket20x9);
        assert_eq!(AspectBucket::classify(2400, 1080), AspectBucket::Bucket20x9);
    }

    #[test]
    fn test_tablet_like_is_16x9() {
        assert_eq!(AspectBucket::classify(1920, 1080), AspectBucket::Bucket16x9);
        assert_eq!(AspectBucket::classify(1080, 1920), AspectBucket::Bucket16x9);
    }

    #[test]
    fn test_boundaries() {
        // exactly 1.6
        assert_eq!(AspectBucket::classify(1600, 1000), AspectBucket::Bucket16x9);
        // exactly 2.0 falls in the gap
        assert_eq!(AspectBucket::classify(2000, 1000), AspectBucket::Unclassified);
        // between 2.0 and 2.1
        assert_eq!(AspectBucket::classify(2050, 1000), AspectBucket::Unclassified);
        // exactly 2.1
        assert_eq!(AspectBucket::classify(2100, 1000), AspectBucket::Bucket20x9);
        // 4:3
        assert_eq!(AspectBucket::classify(1024, 768), AspectBucket::Unclassified);
    }

    #[test]
    fn test_zero_dimension_is_unclassified() {
        assert_eq!(AspectBucket::classify(0, 1080), AspectBucket::Unclassified);
    }

    #[test]
    fn test_fallback_modes() {
        assert_eq!(AspectBucket::Bucket20x9.fallback_mode(), Some(Mode::YouTube));
        assert_eq!(AspectBucket::Bucket16x9.fallback_mode(), Some(Mode::Tv));
        assert_eq!(AspectBucket::Unclassified.fallback_mode(), None);
    }

    #[test]
    fn test_display_shape() {
        let display = DisplayMetrics::new(2400, 1080, Orientation::Landscape);
        assert_eq!(
            display.shape(),
            ScreenShape::new(Orientation::Landscape, AspectBucket::Bucket20x9)
        );
    }
}
