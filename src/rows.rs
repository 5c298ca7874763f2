//! Justified-row layout.
//!
//! Packs photos into rows that each fill the container width exactly, choosing
//! the row breaks that keep row heights closest to a target height.
//!
//! The photo sequence is treated as a DAG of breakpoint nodes `0..=N`, where
//! node `i` means "photos before `i` are placed". An edge `i → j` is a row
//! holding photos `[i, j)`, with at most `max_node_search` photos per row. Node
//! indices are already a topological order, so the cheapest path falls out of
//! a single forward pass over an array of per-node minimum costs.
//!
//! Row cost is the squared relative deviation from the target height,
//! `((h − target) / target)²`. The last row is not stretched: its height is
//! capped at the target, which also makes an underfilled last row free.
//!
//! # Example
//!
//! ```
//! use photolayout::{Photo, RowLayout};
//!
//! let photos = vec![
//!     Photo::new("a.jpg", 800.0, 600.0),
//!     Photo::new("b.jpg", 600.0, 800.0),
//!     Photo::new("c.jpg", 1000.0, 500.0),
//! ];
//! let placed = RowLayout::new(900.0)
//!     .target_row_height(300.0)
//!     .max_node_search(3)
//!     .margin(2.0)
//!     .compute(&photos)
//!     .unwrap();
//!
//! assert_eq!(placed.len(), 3);
//! assert_eq!(placed[0].left, 0.0);
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ops::Range;

use crate::photo::{
    LayoutError, Photo, PositionedPhoto, aspect_ratios, check_margin, check_positive,
};

/// Configuration for the justified-row engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RowLayout {
    /// Usable width of a row, after any rounding allowance.
    pub container_width: f64,
    /// Desired row height. Rows deviate from it to fill the width exactly.
    pub target_row_height: f64,
    /// Most photos a single row may hold. Bounds search cost.
    pub max_node_search: usize,
    /// Gap between adjacent photos and between rows.
    pub margin: f64,
}

impl RowLayout {
    /// Default row height target.
    pub const DEFAULT_TARGET_ROW_HEIGHT: f64 = 300.0;
    /// Default search window for wide containers.
    pub const DEFAULT_MAX_NODE_SEARCH: usize = 8;
    /// Default inter-photo gap.
    pub const DEFAULT_MARGIN: f64 = 2.0;

    /// Create a row layout for the given width with default settings.
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            target_row_height: Self::DEFAULT_TARGET_ROW_HEIGHT,
            max_node_search: Self::DEFAULT_MAX_NODE_SEARCH,
            margin: Self::DEFAULT_MARGIN,
        }
    }

    /// Set the target row height.
    pub fn target_row_height(mut self, height: f64) -> Self {
        self.target_row_height = height;
        self
    }

    /// Set how many photos ahead of a breakpoint a row may reach.
    pub fn max_node_search(mut self, limit: usize) -> Self {
        self.max_node_search = limit;
        self
    }

    /// Set the inter-photo gap.
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Check configuration values without looking at any photos.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_positive("container_width", self.container_width)?;
        check_positive("target_row_height", self.target_row_height)?;
        if self.max_node_search == 0 {
            return Err(LayoutError::InvalidConfiguration {
                field: "max_node_search",
                value: 0.0,
            });
        }
        check_margin(self.margin)
    }

    /// Choose row breaks for `photos` without placing them.
    pub fn plan(&self, photos: &[Photo]) -> Result<RowPlan, LayoutError> {
        self.validate()?;
        let ratios = aspect_ratios(photos)?;
        Ok(self.plan_ratios(&ratios))
    }

    /// Compute the full layout: row breaks, then placement.
    pub fn compute(&self, photos: &[Photo]) -> Result<Vec<PositionedPhoto>, LayoutError> {
        self.validate()?;
        let ratios = aspect_ratios(photos)?;
        let plan = self.plan_ratios(&ratios);

        let mut out = Vec::with_capacity(photos.len());
        let mut top = 0.0;
        for (row, height) in plan.rows().zip(plan.row_heights.iter().copied()) {
            let mut left = 0.0;
            for index in row {
                let width = height * ratios[index];
                let finite = [left, top, width, height].iter().all(|v| v.is_finite());
                if !finite {
                    return Err(photos[index].scale_error(index));
                }
                out.push(PositionedPhoto {
                    photo: photos[index].clone(),
                    index,
                    left,
                    top,
                    width,
                    height,
                    container_height: None,
                });
                left += width + self.margin;
            }
            top += height + self.margin;
        }

        tracing::debug!(
            photos = photos.len(),
            rows = plan.row_count(),
            cost = plan.cost,
            width = self.container_width,
            "computed row layout"
        );
        Ok(out)
    }

    fn plan_ratios(&self, ratios: &[f64]) -> RowPlan {
        let n = ratios.len();
        if n == 0 {
            return RowPlan {
                breaks: vec![0],
                row_heights: Vec::new(),
                cost: 0.0,
            };
        }

        let mut best: Vec<Option<Node>> = vec![None; n + 1];
        best[0] = Some(Node {
            cost: 0.0,
            rows: 0,
            prev: 0,
        });

        for i in 0..n {
            let Some(from) = best[i] else { continue };
            let end = n.min(i.saturating_add(self.max_node_search));
            let mut sum = 0.0;
            for j in i + 1..=end {
                sum += ratios[j - 1];
                // Usable width only shrinks and the ratio sum only grows.
                let usable = self.usable_width(j - i);
                if usable <= 0.0 || !sum.is_finite() {
                    break;
                }
                let height = self.row_height(usable, sum, j == n);
                let candidate = Node {
                    cost: from.cost + self.penalty(height),
                    rows: from.rows + 1,
                    prev: i,
                };
                let replace = match &best[j] {
                    None => true,
                    Some(current) => prefer(&best, &candidate, current),
                };
                if replace {
                    best[j] = Some(candidate);
                }
            }
        }

        // Node N is always reachable through one-photo rows.
        let breaks = breakpoints(&best, n);
        let row_heights: Vec<f64> = breaks
            .windows(2)
            .map(|w| {
                let sum = ratios[w[0]..w[1]].iter().sum();
                self.row_height(self.usable_width(w[1] - w[0]), sum, w[1] == n)
            })
            .collect();
        let cost = best[n].map_or(0.0, |node| node.cost);

        for (k, w) in breaks.windows(2).enumerate() {
            tracing::trace!(row = k, start = w[0], end = w[1], height = row_heights[k], "row");
        }

        RowPlan {
            breaks,
            row_heights,
            cost,
        }
    }

    /// Width left for `count` photos once the gaps between them are taken.
    /// Zero or negative when the margins alone use up the row.
    fn usable_width(&self, count: usize) -> f64 {
        self.container_width - self.margin * count.saturating_sub(1) as f64
    }

    /// Height at which photos with aspect ratios summing to `ratio_sum`
    /// exactly fill `usable`. The last row is capped at the target height.
    fn row_height(&self, usable: f64, ratio_sum: f64, last: bool) -> f64 {
        let height = usable / ratio_sum;
        if last {
            height.min(self.target_row_height)
        } else {
            height
        }
    }

    fn penalty(&self, height: f64) -> f64 {
        let d = (height - self.target_row_height) / self.target_row_height;
        d * d
    }
}

/// Row breaks chosen for a gallery.
#[derive(Clone, Debug, PartialEq)]
pub struct RowPlan {
    /// Breakpoint nodes, starting at 0 and ending at the photo count.
    pub breaks: Vec<usize>,
    /// Height of each row, in order.
    pub row_heights: Vec<f64>,
    /// Total deviation cost of the chosen rows.
    pub cost: f64,
}

impl RowPlan {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_heights.len()
    }

    /// Photo index range of each row, in order.
    pub fn rows(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.breaks.windows(2).map(|w| w[0]..w[1])
    }
}

/// Compute a justified-row layout.
///
/// Convenience wrapper over [`RowLayout`].
pub fn compute_row_layout(
    container_width: f64,
    target_row_height: f64,
    max_node_search: usize,
    margin: f64,
    photos: &[Photo],
) -> Result<Vec<PositionedPhoto>, LayoutError> {
    RowLayout {
        container_width,
        target_row_height,
        max_node_search,
        margin,
    }
    .compute(photos)
}

// ============================================================================
// Shortest-path bookkeeping
// ============================================================================

/// Cheapest known way to reach a breakpoint node.
#[derive(Copy, Clone, Debug)]
struct Node {
    cost: f64,
    rows: usize,
    prev: usize,
}

/// Whether `candidate` beats `current` as the way into the same node:
/// lower cost, then fewer rows, then earlier breakpoints.
fn prefer(best: &[Option<Node>], candidate: &Node, current: &Node) -> bool {
    match candidate.cost.total_cmp(&current.cost) {
        Ordering::Less => return true,
        Ordering::Greater => return false,
        Ordering::Equal => {}
    }
    match candidate.rows.cmp(&current.rows) {
        Ordering::Less => return true,
        Ordering::Greater => return false,
        Ordering::Equal => {}
    }
    earlier_breakpoints(best, candidate.prev, current.prev)
}

/// Compare two equally long paths ending at `a` and `b`, walking back in
/// lockstep until they merge. The last difference seen is the first one in
/// reading order.
fn earlier_breakpoints(best: &[Option<Node>], mut a: usize, mut b: usize) -> bool {
    let mut verdict = false;
    while a != b {
        verdict = a < b;
        a = best[a].map_or(0, |n| n.prev);
        b = best[b].map_or(0, |n| n.prev);
    }
    verdict
}

/// Breakpoints on the chosen path from node 0 up to and including `node`.
fn breakpoints(best: &[Option<Node>], node: usize) -> Vec<usize> {
    let mut path = vec![node];
    let mut at = node;
    while at != 0 {
        match best[at] {
            Some(n) => at = n.prev,
            None => break,
        }
        path.push(at);
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(dims: &[(f64, f64)]) -> Vec<Photo> {
        dims.iter()
            .enumerate()
            .map(|(i, &(w, h))| Photo::new(alloc::format!("{i}.jpg"), w, h))
            .collect()
    }

    fn layout(width: f64, target: f64, search: usize, margin: f64) -> RowLayout {
        RowLayout::new(width)
            .target_row_height(target)
            .max_node_search(search)
            .margin(margin)
    }

    // ── configuration ───────────────────────────────────────────────────

    #[test]
    fn rejects_bad_configuration() {
        let p = photos(&[(100.0, 100.0)]);
        for (cfg, field) in [
            (layout(0.0, 300.0, 3, 2.0), "container_width"),
            (layout(900.0, -1.0, 3, 2.0), "target_row_height"),
            (layout(900.0, 300.0, 0, 2.0), "max_node_search"),
            (layout(900.0, 300.0, 3, -2.0), "margin"),
            (layout(f64::NAN, 300.0, 3, 2.0), "container_width"),
        ] {
            match cfg.compute(&p) {
                Err(LayoutError::InvalidConfiguration { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{cfg:?}: expected {field} error, got {other:?}"),
            }
        }
    }

    #[test]
    fn configuration_checked_before_photos() {
        let p = photos(&[(0.0, 100.0)]);
        assert!(matches!(
            layout(0.0, 300.0, 3, 2.0).compute(&p),
            Err(LayoutError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn zero_width_photo_rejected() {
        let p = photos(&[(100.0, 100.0), (0.0, 100.0)]);
        assert!(matches!(
            layout(900.0, 300.0, 3, 2.0).compute(&p),
            Err(LayoutError::InvalidPhotoDimensions { index: 1, .. })
        ));
    }

    #[test]
    fn empty_input_is_empty_output() {
        let out = layout(900.0, 300.0, 3, 2.0).compute(&[]).unwrap();
        assert!(out.is_empty());
        let plan = layout(900.0, 300.0, 3, 2.0).plan(&[]).unwrap();
        assert_eq!(plan.row_count(), 0);
        assert_eq!(plan.cost, 0.0);
    }

    // ── row height / penalty ────────────────────────────────────────────

    #[test]
    fn row_height_accounts_for_margins() {
        let cfg = layout(202.0, 1000.0, 3, 2.0);
        // Two squares: 202 - 2 = 200 usable, 2.0 total ratio → 100 high.
        assert_eq!(cfg.usable_width(2), 200.0);
        assert_eq!(cfg.row_height(cfg.usable_width(2), 2.0, false), 100.0);
    }

    #[test]
    fn last_row_is_capped_at_target() {
        let cfg = layout(1000.0, 300.0, 3, 0.0);
        // A single square would be 1000 high; capped to 300 at the end.
        assert_eq!(cfg.row_height(cfg.usable_width(1), 1.0, false), 1000.0);
        assert_eq!(cfg.row_height(cfg.usable_width(1), 1.0, true), 300.0);
    }

    #[test]
    fn usable_width_exhausted_by_margins() {
        let cfg = layout(10.0, 300.0, 8, 5.0);
        assert!(cfg.usable_width(3) <= 0.0);
        assert_eq!(cfg.usable_width(1), 10.0);
    }

    #[test]
    fn huge_panorama_leaves_later_rows_finite() {
        // Next to 1e17 the squares' ratios vanish from any running total
        // that starts before them.
        let mut dims = vec![(1e17, 1.0)];
        dims.extend([(100.0, 100.0); 5]);
        let p = photos(&dims);
        let out = layout(900.0, 300.0, 2, 2.0).compute(&p).unwrap();
        assert_eq!(out.len(), 6);
        for q in &out {
            for v in [q.left, q.top, q.width, q.height] {
                assert!(v.is_finite() && v >= 0.0, "{q:?}");
            }
            assert!(q.width > 0.0 && q.height > 0.0, "{q:?}");
        }
        let plan = layout(900.0, 300.0, 2, 2.0).plan(&p).unwrap();
        assert!(plan.cost.is_finite());
        assert_eq!(plan.row_heights.len(), plan.rows().count());
    }

    #[test]
    fn overflowing_row_height_is_an_error() {
        // Validates, but 1e10 / 1e-300 is past f64::MAX. One photo per row
        // keeps it out of the capped last row.
        let p = photos(&[(1.0, 1e300), (100.0, 100.0)]);
        assert!(matches!(
            layout(1e10, 300.0, 1, 0.0).compute(&p),
            Err(LayoutError::InvalidPhotoDimensions { index: 0, .. })
        ));
    }

    #[test]
    fn penalty_is_squared_relative_deviation() {
        let cfg = layout(900.0, 200.0, 3, 0.0);
        assert_eq!(cfg.penalty(200.0), 0.0);
        assert_eq!(cfg.penalty(300.0), 0.25);
        assert_eq!(cfg.penalty(100.0), 0.25);
    }

    // ── path search ─────────────────────────────────────────────────────

    #[test]
    fn identical_squares_fill_rows_of_expected_size() {
        // 4 squares at 300 high fill 1200 exactly.
        let p = photos(&[(100.0, 100.0); 8]);
        let plan = layout(1200.0, 300.0, 8, 0.0).plan(&p).unwrap();
        assert_eq!(plan.breaks, vec![0, 4, 8]);
        assert_eq!(plan.row_heights, vec![300.0, 300.0]);
        assert_eq!(plan.cost, 0.0);
    }

    #[test]
    fn one_full_row_beats_split() {
        // Two squares, width 600, target 300: one row of 2 is exact;
        // two rows of 1 leave the first row 600 high.
        let p = photos(&[(100.0, 100.0), (100.0, 100.0)]);
        let plan = layout(600.0, 300.0, 2, 0.0).plan(&p).unwrap();
        assert_eq!(plan.breaks, vec![0, 2]);
        assert_eq!(plan.cost, 0.0);
    }

    #[test]
    fn search_window_of_one_forces_single_photo_rows() {
        let p = photos(&[(100.0, 100.0); 4]);
        let plan = layout(100.0, 100.0, 1, 0.0).plan(&p).unwrap();
        assert_eq!(plan.breaks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn equal_cost_prefers_fewer_rows() {
        let best = vec![
            Some(Node { cost: 0.0, rows: 0, prev: 0 }),
            Some(Node { cost: 0.5, rows: 1, prev: 0 }),
            None,
        ];
        let direct = Node { cost: 1.0, rows: 1, prev: 0 };
        let via_1 = Node { cost: 1.0, rows: 2, prev: 1 };
        assert!(prefer(&best, &direct, &via_1));
        assert!(!prefer(&best, &via_1, &direct));
    }

    #[test]
    fn lexicographic_tie_break_on_symmetric_rows() {
        // Five squares, width 300, target 100, search 3, free last row.
        // Candidates with two exact rows: [0,3) then [3,5) (last, capped → 0).
        // [0,2) h=150 cost .25. Best: [0,3),[3,5) cost 0 with 2 rows.
        let p = photos(&[(100.0, 100.0); 5]);
        let plan = layout(300.0, 100.0, 3, 0.0).plan(&p).unwrap();
        assert_eq!(plan.breaks, vec![0, 3, 5]);
        assert_eq!(plan.cost, 0.0);

        // Direct check of `prefer` on an exact tie in cost and rows.
        let best = vec![
            Some(Node { cost: 0.0, rows: 0, prev: 0 }),
            Some(Node { cost: 1.0, rows: 1, prev: 0 }),
            Some(Node { cost: 1.0, rows: 1, prev: 0 }),
            None,
        ];
        let via_1 = Node { cost: 2.0, rows: 2, prev: 1 };
        let via_2 = Node { cost: 2.0, rows: 2, prev: 2 };
        assert!(prefer(&best, &via_1, &via_2));
        assert!(!prefer(&best, &via_2, &via_1));
    }

    #[test]
    fn earlier_breakpoints_uses_first_difference() {
        let node = |prev| Some(Node { cost: 0.0, rows: 0, prev });
        // Paths [0,2,3] and [0,1,4]: the last nodes favour 3, but the first
        // difference (2 vs 1) favours the path through 4.
        let best = vec![node(0), node(0), node(0), node(2), node(1)];
        assert!(!earlier_breakpoints(&best, 3, 4));
        assert!(earlier_breakpoints(&best, 4, 3));
        assert!(!earlier_breakpoints(&best, 3, 3));
    }

    #[test]
    fn scenario_three_mixed_photos() {
        // 800×600 (1.333), 600×800 (0.75), 1000×500 (2.0); sum 4.083.
        let p = photos(&[(800.0, 600.0), (600.0, 800.0), (1000.0, 500.0)]);
        let cfg = layout(900.0, 300.0, 3, 2.0);
        let plan = cfg.plan(&p).unwrap();
        let out = cfg.compute(&p).unwrap();
        assert_eq!(out.len(), 3);

        // Every candidate split, costed independently; the plan must match
        // the cheapest.
        let ratios = [800.0 / 600.0, 600.0 / 800.0, 2.0];
        let splits: [&[usize]; 4] = [&[0, 3], &[0, 1, 3], &[0, 2, 3], &[0, 1, 2, 3]];
        let cost_of = |b: &[usize]| -> f64 {
            b.windows(2)
                .map(|w| {
                    let sum: f64 = ratios[w[0]..w[1]].iter().sum();
                    let height = cfg.row_height(cfg.usable_width(w[1] - w[0]), sum, w[1] == 3);
                    cfg.penalty(height)
                })
                .sum()
        };
        let cheapest = splits
            .iter()
            .min_by(|a, b| cost_of(**a).total_cmp(&cost_of(**b)))
            .unwrap();
        assert_eq!(plan.breaks, cheapest.to_vec());
        assert!((plan.cost - cost_of(*cheapest)).abs() < 1e-12);
    }

    #[test]
    fn wide_photo_scaled_down_to_fit() {
        let p = photos(&[(5000.0, 500.0), (100.0, 100.0)]);
        let out = layout(900.0, 300.0, 2, 2.0).compute(&p).unwrap();
        assert!(out[0].right() <= 900.0 + 1e-9);
        assert!(out.iter().all(|o| o.width > 0.0 && o.height > 0.0));
    }

    #[test]
    fn placement_accumulates_left_and_top() {
        let p = photos(&[(100.0, 100.0); 4]);
        let out = layout(202.0, 100.0, 2, 2.0).compute(&p).unwrap();
        assert_eq!(out[0].left, 0.0);
        assert_eq!(out[1].left, 102.0);
        assert_eq!(out[2].top, 102.0);
        assert_eq!(out[3].left, 102.0);
        assert_eq!(out[3].top, 102.0);
        assert!(out.iter().all(|o| o.height == 100.0));
        assert!(out.iter().all(|o| o.container_height.is_none()));
        assert_eq!(
            out.iter().map(|o| o.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn huge_search_window_behaves_as_exhaustive() {
        let p = photos(&[(300.0, 200.0), (200.0, 300.0), (400.0, 300.0), (100.0, 100.0)]);
        let a = layout(700.0, 200.0, 4, 2.0).plan(&p).unwrap();
        let b = layout(700.0, 200.0, usize::MAX, 2.0).plan(&p).unwrap();
        assert_eq!(a, b);
    }
}
