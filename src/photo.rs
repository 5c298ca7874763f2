//! Photo records shared by both layout engines.
//!
//! A [`Photo`] is the input: an identity plus intrinsic pixel dimensions.
//! A [`PositionedPhoto`] is the output: the same photo with a placement in
//! the container's coordinate space. Both are plain values; the engines keep
//! nothing after a call returns.

use alloc::string::String;

/// A photo with known intrinsic dimensions.
///
/// # Example
///
/// ```
/// use photolayout::Photo;
///
/// let photo = Photo::new("sunset.jpg", 1600.0, 900.0).with_key("p-17");
/// assert_eq!(photo.render_key(), "p-17");
/// assert!((photo.aspect_ratio() - 16.0 / 9.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Photo {
    /// Source identity (usually a URL).
    pub src: String,
    /// Intrinsic width in pixels.
    pub width: f64,
    /// Intrinsic height in pixels.
    pub height: f64,
    /// Optional unique identity, preferred over `src` when present.
    #[cfg_attr(feature = "serde", serde(default))]
    pub key: Option<String>,
}

impl Photo {
    /// Create a photo without an explicit key.
    pub fn new(src: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            src: src.into(),
            width,
            height,
            key: None,
        }
    }

    /// Set the unique key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Width divided by height. Not validated; see [`validate`](Self::validate).
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Identity a renderer should key its element on: `key`, else `src`.
    pub fn render_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.src)
    }

    /// Check dimensions and return the aspect ratio.
    ///
    /// `index` is the photo's position in the input sequence and is only
    /// used for the error report.
    pub fn validate(&self, index: usize) -> Result<f64, LayoutError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(self.scale_error(index));
        }
        let ratio = self.aspect_ratio();
        // Finite, positive inputs can still overflow or underflow the ratio,
        // and a subnormal ratio has no finite inverse.
        if !valid(ratio) || !valid(1.0 / ratio) {
            return Err(self.scale_error(index));
        }
        Ok(ratio)
    }

    /// Error for a photo whose dimensions cannot be laid out, either up
    /// front or because scaling them produced non-finite geometry.
    pub(crate) fn scale_error(&self, index: usize) -> LayoutError {
        LayoutError::InvalidPhotoDimensions {
            index,
            width: self.width,
            height: self.height,
        }
    }
}

/// A photo placed in the container.
///
/// Coordinates are unrounded `f64`; renderers round when they emit pixels.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionedPhoto {
    /// The input record, unchanged (intrinsic dimensions included).
    pub photo: Photo,
    /// Position of the photo in the input sequence.
    pub index: usize,
    /// Distance from the container's left edge.
    pub left: f64,
    /// Distance from the container's top edge.
    pub top: f64,
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
    /// Overall content height. Set by the column engine only, identical on
    /// every record of a layout.
    #[cfg_attr(feature = "serde", serde(default))]
    pub container_height: Option<f64>,
}

impl PositionedPhoto {
    /// Right edge (`left + width`).
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (`top + height`).
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Height of the content box enclosing every placed photo.
///
/// Zero for an empty layout.
pub fn content_height(photos: &[PositionedPhoto]) -> f64 {
    photos.iter().map(PositionedPhoto::bottom).fold(0.0, f64::max)
}

/// Validate every photo, collecting aspect ratios in input order.
pub(crate) fn aspect_ratios(photos: &[Photo]) -> Result<alloc::vec::Vec<f64>, LayoutError> {
    photos
        .iter()
        .enumerate()
        .map(|(i, p)| p.validate(i))
        .collect()
}

/// Reject non-finite or out-of-range configuration values.
pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfiguration { field, value })
    }
}

pub(crate) fn check_margin(margin: f64) -> Result<(), LayoutError> {
    if margin.is_finite() && margin >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfiguration {
            field: "margin",
            value: margin,
        })
    }
}

/// Layout computation error.
///
/// Either error fails the whole computation; no partial layout is returned.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// A photo has a non-positive or non-finite width or height.
    #[error("photo {index} has invalid dimensions {width}x{height}")]
    InvalidPhotoDimensions {
        /// Position of the offending photo in the input sequence.
        index: usize,
        /// The photo's intrinsic width.
        width: f64,
        /// The photo's intrinsic height.
        height: f64,
    },
    /// A configuration value is out of range.
    #[error("invalid configuration: {field} = {value}")]
    InvalidConfiguration {
        /// Name of the rejected setting.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn render_key_prefers_key() {
        let p = Photo::new("a.jpg", 10.0, 10.0);
        assert_eq!(p.render_key(), "a.jpg");
        assert_eq!(p.with_key("k").render_key(), "k");
    }

    #[test]
    fn validate_accepts_positive() {
        let r = Photo::new("a", 800.0, 600.0).validate(0).unwrap();
        assert!((r - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_zero_negative_and_nan() {
        for (w, h) in [
            (0.0, 10.0),
            (10.0, 0.0),
            (-1.0, 10.0),
            (10.0, f64::NAN),
            (f64::INFINITY, 10.0),
        ] {
            let err = Photo::new("x", w, h).validate(3).unwrap_err();
            assert!(
                matches!(err, LayoutError::InvalidPhotoDimensions { index: 3, .. }),
                "{w}x{h}: {err:?}"
            );
        }
    }

    #[test]
    fn validate_rejects_overflowing_ratio() {
        let err = Photo::new("x", f64::MAX, 1e-300).validate(0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPhotoDimensions { .. }));
    }

    #[test]
    fn validate_rejects_ratio_without_finite_inverse() {
        // 1e-310 is subnormal: finite and positive, but its inverse is not.
        let err = Photo::new("x", 1e-10, 1e300).validate(2).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPhotoDimensions { index: 2, .. }));
    }

    #[test]
    fn aspect_ratios_reports_first_bad_index() {
        let photos = [
            Photo::new("a", 10.0, 10.0),
            Photo::new("b", 10.0, 0.0),
            Photo::new("c", 0.0, 10.0),
        ];
        assert!(matches!(
            aspect_ratios(&photos),
            Err(LayoutError::InvalidPhotoDimensions { index: 1, .. })
        ));
    }

    #[test]
    fn content_height_of_empty_is_zero() {
        assert_eq!(content_height(&[]), 0.0);
    }

    #[test]
    fn config_checks() {
        assert!(check_positive("containerWidth", 1.0).is_ok());
        assert!(check_positive("containerWidth", 0.0).is_err());
        assert!(check_positive("containerWidth", f64::NAN).is_err());
        assert!(check_margin(0.0).is_ok());
        assert_eq!(
            check_margin(-2.0),
            Err(LayoutError::InvalidConfiguration {
                field: "margin",
                value: -2.0
            })
        );
    }

    #[test]
    fn error_display() {
        let err = LayoutError::InvalidPhotoDimensions {
            index: 2,
            width: 0.0,
            height: 5.0,
        };
        assert_eq!(err.to_string(), "photo 2 has invalid dimensions 0x5");
    }
}
