//! Photo gallery layout: justified rows and masonry columns.
//!
//! Pure geometry. Photos go in with intrinsic dimensions; positioned photos
//! come out with `left`/`top`/`width`/`height` in container coordinates.
//! `no_std` compatible (needs `alloc`).
//!
//! # Modules
//!
//! - [`photo`]: Input and output records, validation, errors
//! - [`rows`]: Justified-row layout (shortest path over row breakpoints)
//! - [`columns`]: Column layout (greedy shortest-column assignment)
//! - [`gallery`]: Width tracking, configuration resolution, frames, clicks
//! - `query`: Options from URL-style query strings (feature `query`)
//! - `svg`: SVG visualization of a frame (feature `svg`)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod columns;
pub mod gallery;
pub mod photo;
pub mod rows;

#[cfg(feature = "query")]
pub mod query;
#[cfg(feature = "svg")]
pub mod svg;

pub use columns::{ColumnLayout, compute_column_layout};
pub use gallery::{
    Direction, Frame, Gallery, GalleryOptions, PhotoClick, ResolvedLayout, Setting, Ticket,
    WidthTracker, click, compute_frame, default_columns, default_max_node_search,
};
pub use photo::{LayoutError, Photo, PositionedPhoto, content_height};
pub use rows::{RowLayout, RowPlan, compute_row_layout};
