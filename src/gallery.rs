//! Gallery orchestration: width tracking, configuration resolution, and
//! frame bookkeeping around the two layout engines.
//!
//! Layout runs in two phases. [`GalleryOptions::resolve`] turns a measured
//! container width into a concrete [`ResolvedLayout`] (per-width settings
//! evaluated, defaults applied, rounding allowance subtracted). The resolved
//! layout then runs an engine over the photos. Neither phase keeps state.
//!
//! [`Gallery`] owns the little state there is: the last observed width, a
//! single pending-recompute slot, and the last applied [`Frame`]. A new width
//! replaces whatever is pending rather than queueing behind it, and frames
//! computed for a superseded width are rejected on [`apply`](Gallery::apply).
//!
//! # Example
//!
//! ```
//! use photolayout::{Direction, Gallery, GalleryOptions, Photo};
//!
//! let photos = vec![
//!     Photo::new("a.jpg", 800.0, 600.0),
//!     Photo::new("b.jpg", 600.0, 800.0),
//! ];
//! let mut gallery = Gallery::new(photos, GalleryOptions::new().direction(Direction::Column));
//!
//! let frame = gallery.update(1024.4).unwrap().unwrap();
//! assert_eq!(frame.container_width, 1024);
//! assert_eq!(frame.photos.len(), 2);
//! ```

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::columns::ColumnLayout;
use crate::photo::{LayoutError, Photo, PositionedPhoto, content_height};
use crate::rows::RowLayout;

/// Layout strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Justified rows.
    #[default]
    Row,
    /// Masonry columns.
    Column,
}

impl Direction {
    /// Parse `"row"` or `"column"` (ASCII case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("row") {
            Some(Self::Row)
        } else if s.eq_ignore_ascii_case("column") {
            Some(Self::Column)
        } else {
            None
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
        }
    }
}

/// A setting given directly, as a function of container width, or left to
/// the width-tiered default.
#[derive(Copy, Clone, Debug)]
pub enum Setting<T> {
    /// Use the built-in default for the current width.
    Auto,
    /// Fixed value.
    Fixed(T),
    /// Computed from the measured container width.
    PerWidth(fn(u32) -> T),
}

// Function settings compare by address; two copies of one pointer are equal.
impl<T: PartialEq> PartialEq for Setting<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Auto, Self::Auto) => true,
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::PerWidth(f), Self::PerWidth(g)) => core::ptr::fn_addr_eq(*f, *g),
            _ => false,
        }
    }
}

impl<T: Copy> Setting<T> {
    /// Evaluate for a container width, falling back to `default`.
    pub fn resolve(&self, width: u32, default: impl FnOnce(u32) -> T) -> T {
        match self {
            Self::Auto => default(width),
            Self::Fixed(v) => *v,
            Self::PerWidth(f) => f(width),
        }
    }
}

/// Column count for a container width: 1 below 500, 2 below 900, 3 below
/// 1500, 4 from there on.
pub fn default_columns(width: u32) -> usize {
    match width {
        0..500 => 1,
        500..900 => 2,
        900..1500 => 3,
        _ => 4,
    }
}

/// Row search window for a container width: 2 below 500, else 8.
pub fn default_max_node_search(width: u32) -> usize {
    if width < 500 { 2 } else { 8 }
}

/// Default row height target.
pub fn default_target_row_height(_width: u32) -> f64 {
    RowLayout::DEFAULT_TARGET_ROW_HEIGHT
}

/// Width subtracted from the measured container before layout, since the
/// host may round a fractional width up by one unit.
pub const ROUNDING_ALLOWANCE: u32 = 1;

/// Gallery configuration, before a container width is known.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GalleryOptions {
    /// Layout strategy.
    pub direction: Direction,
    /// Column count (column direction only).
    pub columns: Setting<usize>,
    /// Row search window (row direction only).
    pub max_node_search: Setting<usize>,
    /// Row height target (row direction only).
    pub target_row_height: Setting<f64>,
    /// Gap between photos.
    pub margin: f64,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryOptions {
    /// Row direction, width-tiered defaults, margin 2, row height 300.
    pub fn new() -> Self {
        Self {
            direction: Direction::Row,
            columns: Setting::Auto,
            max_node_search: Setting::Auto,
            target_row_height: Setting::Fixed(RowLayout::DEFAULT_TARGET_ROW_HEIGHT),
            margin: RowLayout::DEFAULT_MARGIN,
        }
    }

    /// Set the layout strategy.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Fix the column count.
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = Setting::Fixed(columns);
        self
    }

    /// Compute the column count from the container width.
    pub fn columns_with(mut self, f: fn(u32) -> usize) -> Self {
        self.columns = Setting::PerWidth(f);
        self
    }

    /// Fix the row search window.
    pub fn max_node_search(mut self, limit: usize) -> Self {
        self.max_node_search = Setting::Fixed(limit);
        self
    }

    /// Compute the row search window from the container width.
    pub fn max_node_search_with(mut self, f: fn(u32) -> usize) -> Self {
        self.max_node_search = Setting::PerWidth(f);
        self
    }

    /// Fix the row height target.
    pub fn target_row_height(mut self, height: f64) -> Self {
        self.target_row_height = Setting::Fixed(height);
        self
    }

    /// Compute the row height target from the container width.
    pub fn target_row_height_with(mut self, f: fn(u32) -> f64) -> Self {
        self.target_row_height = Setting::PerWidth(f);
        self
    }

    /// Set the gap between photos.
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Turn options plus a measured container width into concrete engine
    /// configuration.
    pub fn resolve(&self, container_width: u32) -> Result<ResolvedLayout, LayoutError> {
        if container_width <= ROUNDING_ALLOWANCE {
            return Err(LayoutError::InvalidConfiguration {
                field: "container_width",
                value: container_width as f64,
            });
        }
        let usable = (container_width - ROUNDING_ALLOWANCE) as f64;
        let resolved = match self.direction {
            Direction::Row => ResolvedLayout::Row(RowLayout {
                container_width: usable,
                target_row_height: self
                    .target_row_height
                    .resolve(container_width, default_target_row_height),
                max_node_search: self
                    .max_node_search
                    .resolve(container_width, default_max_node_search),
                margin: self.margin,
            }),
            Direction::Column => ResolvedLayout::Column(ColumnLayout {
                container_width: usable,
                columns: self.columns.resolve(container_width, default_columns),
                margin: self.margin,
            }),
        };
        resolved.validate()?;
        tracing::debug!(container_width, ?resolved, "resolved gallery layout");
        Ok(resolved)
    }
}

/// Engine configuration with every value concrete.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResolvedLayout {
    /// Justified rows.
    Row(RowLayout),
    /// Masonry columns.
    Column(ColumnLayout),
}

impl ResolvedLayout {
    /// Strategy this configuration runs.
    pub fn direction(&self) -> Direction {
        match self {
            Self::Row(_) => Direction::Row,
            Self::Column(_) => Direction::Column,
        }
    }

    /// Check the configuration without running it.
    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            Self::Row(r) => r.validate(),
            Self::Column(c) => c.validate(),
        }
    }

    /// Run the engine, returning positioned photos and the content height.
    pub fn compute(&self, photos: &[Photo]) -> Result<(Vec<PositionedPhoto>, f64), LayoutError> {
        match self {
            Self::Row(r) => {
                let placed = r.compute(photos)?;
                let height = content_height(&placed);
                Ok((placed, height))
            }
            Self::Column(c) => {
                let placed = c.compute(photos)?;
                let height = placed
                    .last()
                    .and_then(|p| p.container_height)
                    .unwrap_or(0.0);
                Ok((placed, height))
            }
        }
    }
}

// ============================================================================
// Width tracking
// ============================================================================

/// A scheduled recompute: the width to lay out at and the generation it
/// belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Tracker generation when the ticket was issued.
    pub generation: u64,
    /// Floored container width to lay out at.
    pub width: u32,
}

/// Tracks the container width and holds at most one pending recompute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WidthTracker {
    width: u32,
    generation: u64,
    pending: Option<Ticket>,
}

impl WidthTracker {
    /// Tracker with no width observed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last observed width (floored), 0 before the first observation.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Generation of the most recently scheduled recompute.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pending recompute, if any, without taking it.
    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    /// Record a measured width. Returns `true` if a recompute was scheduled.
    ///
    /// Fractional widths are floored. An unchanged width schedules nothing;
    /// a changed width replaces any pending recompute.
    pub fn observe(&mut self, measured: f64) -> bool {
        let width = floor_width(measured);
        if width == self.width {
            return false;
        }
        self.width = width;
        if width == 0 {
            // Nothing to lay out; drop whatever was pending.
            self.generation += 1;
            self.pending = None;
            return false;
        }
        self.schedule();
        true
    }

    /// Force a recompute at the current width (options or photos changed).
    /// Returns `false` if no width has been observed yet.
    pub fn invalidate(&mut self) -> bool {
        if self.width == 0 {
            self.generation += 1;
            return false;
        }
        self.schedule();
        true
    }

    /// Empty the pending slot.
    pub fn take_pending(&mut self) -> Option<Ticket> {
        self.pending.take()
    }

    /// Drop the pending recompute without running it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a ticket still belongs to the latest generation.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    fn schedule(&mut self) {
        self.generation += 1;
        if let Some(old) = self.pending.replace(Ticket {
            generation: self.generation,
            width: self.width,
        }) {
            tracing::trace!(
                replaced = old.width,
                width = self.width,
                "pending recompute replaced"
            );
        }
    }
}

fn floor_width(measured: f64) -> u32 {
    if measured.is_nan() || measured <= 0.0 {
        return 0;
    }
    // `as` saturates at u32::MAX.
    measured.floor() as u32
}

// ============================================================================
// Gallery
// ============================================================================

/// A computed layout, ready to render.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Generation of the ticket this frame was computed for.
    pub generation: u64,
    /// Measured container width (before the rounding allowance).
    pub container_width: u32,
    /// Strategy the frame was laid out with.
    pub direction: Direction,
    /// Positioned photos in input order.
    pub photos: Vec<PositionedPhoto>,
    /// Height the container must be to hold every photo.
    pub height: f64,
}

/// Click notification for a photo, with its neighbours in input order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhotoClick<'a> {
    /// Position of the clicked photo in the input sequence.
    pub index: usize,
    /// The clicked photo.
    pub photo: &'a Photo,
    /// Photo before it, if any.
    pub previous: Option<&'a Photo>,
    /// Photo after it, if any.
    pub next: Option<&'a Photo>,
}

/// A photo gallery bound to a container whose width changes over time.
#[derive(Clone, Debug)]
pub struct Gallery {
    photos: Vec<Photo>,
    options: GalleryOptions,
    tracker: WidthTracker,
    frame: Option<Frame>,
}

impl Gallery {
    /// Create a gallery. Nothing is laid out until a width is observed.
    pub fn new(photos: Vec<Photo>, options: GalleryOptions) -> Self {
        Self {
            photos,
            options,
            tracker: WidthTracker::new(),
            frame: None,
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn options(&self) -> &GalleryOptions {
        &self.options
    }

    pub fn tracker(&self) -> &WidthTracker {
        &self.tracker
    }

    /// Last applied frame.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Replace the photos. The current frame is dropped and a recompute is
    /// scheduled at the last known width.
    pub fn set_photos(&mut self, photos: Vec<Photo>) {
        self.photos = photos;
        self.frame = None;
        self.tracker.invalidate();
    }

    /// Replace the options, as [`set_photos`](Self::set_photos) does.
    pub fn set_options(&mut self, options: GalleryOptions) {
        self.options = options;
        self.frame = None;
        self.tracker.invalidate();
    }

    /// Record a measured container width. Returns `true` if a recompute was
    /// scheduled.
    pub fn observe_width(&mut self, measured: f64) -> bool {
        let scheduled = self.tracker.observe(measured);
        if self.tracker.width() == 0 {
            self.frame = None;
        }
        scheduled
    }

    /// Take the pending recompute, if any.
    pub fn take_pending(&mut self) -> Option<Ticket> {
        self.tracker.take_pending()
    }

    /// Compute the frame for a ticket. Pure: may run on another thread
    /// against a clone of the photos and options.
    pub fn compute(&self, ticket: &Ticket) -> Result<Frame, LayoutError> {
        compute_frame(&self.photos, &self.options, ticket)
    }

    /// Install a computed frame. Frames from a superseded generation are
    /// dropped and `false` is returned.
    pub fn apply(&mut self, frame: Frame) -> bool {
        if !self.tracker.is_current(frame.generation) {
            tracing::debug!(
                generation = frame.generation,
                current = self.tracker.generation(),
                "discarding stale frame"
            );
            return false;
        }
        self.frame = Some(frame);
        true
    }

    /// Observe a width and, if that schedules work, compute and apply it
    /// immediately. Returns the current frame.
    ///
    /// On error the previous frame is kept and the error returned; the
    /// caller can skip rendering for this width.
    pub fn update(&mut self, measured: f64) -> Result<Option<&Frame>, LayoutError> {
        self.observe_width(measured);
        self.flush()
    }

    /// Run the pending recompute, if any. Returns the current frame.
    pub fn flush(&mut self) -> Result<Option<&Frame>, LayoutError> {
        if let Some(ticket) = self.take_pending() {
            let frame = self.compute(&ticket)?;
            self.apply(frame);
        }
        Ok(self.frame.as_ref())
    }

    /// Click notification for the photo at `index`.
    pub fn click(&self, index: usize) -> Option<PhotoClick<'_>> {
        click(&self.photos, index)
    }
}

/// Compute a frame for a ticket from explicit inputs.
pub fn compute_frame(
    photos: &[Photo],
    options: &GalleryOptions,
    ticket: &Ticket,
) -> Result<Frame, LayoutError> {
    let resolved = options.resolve(ticket.width)?;
    let (placed, height) = resolved.compute(photos)?;
    Ok(Frame {
        generation: ticket.generation,
        container_width: ticket.width,
        direction: resolved.direction(),
        photos: placed,
        height,
    })
}

/// Click notification for `photos[index]`, or `None` if out of range.
pub fn click(photos: &[Photo], index: usize) -> Option<PhotoClick<'_>> {
    let photo = photos.get(index)?;
    Some(PhotoClick {
        index,
        photo,
        previous: index.checked_sub(1).and_then(|i| photos.get(i)),
        next: photos.get(index + 1),
    })
}
