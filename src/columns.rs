//! Column (masonry) layout.
//!
//! Photos go, in input order, into whichever column is currently shortest
//! (leftmost on ties), scaled to the shared column width. Greedy, so columns
//! are not globally balanced, but the spread between the tallest and shortest
//! column never exceeds the tallest single photo.
//!
//! # Example
//!
//! ```
//! use photolayout::{ColumnLayout, Photo};
//!
//! let placed = ColumnLayout::new(300.0, 3)
//!     .margin(0.0)
//!     .compute(&[Photo::new("a.jpg", 100.0, 100.0)])
//!     .unwrap();
//!
//! assert_eq!(placed[0].width, 100.0);
//! assert_eq!(placed[0].container_height, Some(100.0));
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::photo::{
    LayoutError, Photo, PositionedPhoto, aspect_ratios, check_margin, check_positive,
};

/// Configuration for the column engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColumnLayout {
    /// Total width available to all columns.
    pub container_width: f64,
    /// Fixed number of columns.
    pub columns: usize,
    /// Gap between columns and between photos in a column.
    pub margin: f64,
}

impl ColumnLayout {
    /// Create a column layout with the default margin.
    pub fn new(container_width: f64, columns: usize) -> Self {
        Self {
            container_width,
            columns,
            margin: crate::rows::RowLayout::DEFAULT_MARGIN,
        }
    }

    /// Set the inter-photo gap.
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Width shared by every column.
    pub fn column_width(&self) -> f64 {
        let gaps = self.columns.saturating_sub(1) as f64;
        (self.container_width - self.margin * gaps) / self.columns as f64
    }

    /// Check configuration values, including that columns end up with a
    /// positive width once margins are taken out.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_positive("container_width", self.container_width)?;
        if self.columns == 0 {
            return Err(LayoutError::InvalidConfiguration {
                field: "columns",
                value: 0.0,
            });
        }
        check_margin(self.margin)?;
        if self.column_width() <= 0.0 {
            return Err(LayoutError::InvalidConfiguration {
                field: "margin",
                value: self.margin,
            });
        }
        Ok(())
    }

    /// Compute the layout. Every record carries the final content height.
    pub fn compute(&self, photos: &[Photo]) -> Result<Vec<PositionedPhoto>, LayoutError> {
        self.validate()?;
        let ratios = aspect_ratios(photos)?;

        let column_width = self.column_width();
        let stride = column_width + self.margin;
        let mut tops = vec![0.0_f64; self.columns];
        let mut content_height = 0.0_f64;
        let mut out = Vec::with_capacity(photos.len());

        for (index, (photo, ratio)) in photos.iter().zip(ratios).enumerate() {
            let column = shortest(&tops);
            let top = tops[column];
            let height = column_width / ratio;
            if !(height.is_finite() && (top + height).is_finite()) {
                return Err(photo.scale_error(index));
            }
            out.push(PositionedPhoto {
                photo: photo.clone(),
                index,
                left: column as f64 * stride,
                top,
                width: column_width,
                height,
                container_height: None,
            });
            tops[column] = top + height + self.margin;
            content_height = content_height.max(top + height);
        }

        for p in &mut out {
            p.container_height = Some(content_height);
        }

        tracing::debug!(
            photos = photos.len(),
            columns = self.columns,
            content_height,
            "computed column layout"
        );
        Ok(out)
    }
}

/// Compute a column layout.
///
/// Convenience wrapper over [`ColumnLayout`].
pub fn compute_column_layout(
    container_width: f64,
    columns: usize,
    margin: f64,
    photos: &[Photo],
) -> Result<Vec<PositionedPhoto>, LayoutError> {
    ColumnLayout {
        container_width,
        columns,
        margin,
    }
    .compute(photos)
}

/// Index of the shortest column; the leftmost wins ties.
fn shortest(tops: &[f64]) -> usize {
    let mut best = 0;
    for (i, &top) in tops.iter().enumerate().skip(1) {
        if top < tops[best] {
            best = i;
        }
    }
    best
}
