//! Measurements fed back from the capture layer.

use serde::{Deserialize, Serialize};

/// Brightness figures for one captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrightnessSample {
    /// Average intensity of the frame, 0-255
    pub average_brightness: f64,
    /// Fraction of pixels in the top histogram band (direct sun, lit clouds, moon)
    pub bright_fraction: f64,
}

impl BrightnessSample {
    pub fn new(average_brightness: f64, bright_fraction: f64) -> Self {
        Self {
            average_brightness,
            bright_fraction,
        }
    }
}

/// Output of a cloud/clear classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkyLabel {
    Clear,
    Cloudy,
    /// The frame could not be judged (invalid image, low confidence)
    Indeterminate,
}

/// Decide whether the sky is clear.
///
/// A definite classifier label wins. Without one, the bright-region fraction
/// decides: more than `cloud_fraction_threshold` of bright pixels at night
/// means lit cloud.
pub fn sky_is_clear(
    label: Option<SkyLabel>,
    sample: &BrightnessSample,
    cloud_fraction_threshold: f64,
) -> bool {
    match label {
        Some(SkyLabel::Clear) => true,
        Some(SkyLabel::Cloudy) => false,
        Some(SkyLabel::Indeterminate) | None => sample.bright_fraction <= cloud_fraction_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_label_wins() {
        let bright = BrightnessSample::new(40.0, 0.9);
        let dark = BrightnessSample::new(40.0, 0.0);

        assert!(sky_is_clear(Some(SkyLabel::Clear), &bright, 0.05));
        assert!(!sky_is_clear(Some(SkyLabel::Cloudy), &dark, 0.05));
    }

    #[test]
    fn test_fallback_uses_bright_fraction() {
        let lit_clouds = BrightnessSample::new(40.0, 0.2);
        let stars = BrightnessSample::new(40.0, 0.01);

        assert!(!sky_is_clear(None, &lit_clouds, 0.05));
        assert!(sky_is_clear(None, &stars, 0.05));
        assert!(!sky_is_clear(Some(SkyLabel::Indeterminate), &lit_clouds, 0.05));
        assert!(sky_is_clear(Some(SkyLabel::Indeterminate), &stars, 0.05));
    }
}
