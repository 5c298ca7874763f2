//! SVG visualization of a computed gallery frame.
//!
//! Draws the container as an outer box and every photo as a labelled rect
//! at its computed geometry, scaled down so wide containers stay readable.
//!
//! # Example
//!
//! ```
//! use photolayout::{Gallery, GalleryOptions, Photo, svg::render_frame_svg};
//!
//! let mut gallery = Gallery::new(
//!     vec![Photo::new("a.jpg", 800.0, 600.0), Photo::new("b.jpg", 600.0, 800.0)],
//!     GalleryOptions::new(),
//! );
//! let frame = gallery.update(900.0).unwrap().unwrap();
//!
//! let svg = render_frame_svg(frame);
//! assert!(svg.starts_with("<svg"));
//! ```

use crate::gallery::Frame;

/// Maximum drawn width of the container.
const MAX_PANEL_W: f64 = 800.0;
/// Margin around the container.
const MARGIN: f64 = 20.0;
/// Height of the title line above the container.
const LABEL_H: f64 = 24.0;

/// Render a frame as a complete SVG document.
pub fn render_frame_svg(frame: &Frame) -> String {
    let width = frame.container_width as f64;
    let scale = if width > MAX_PANEL_W {
        MAX_PANEL_W / width
    } else {
        1.0
    };
    let panel_w = width * scale;
    let panel_h = frame.height * scale;
    let total_w = panel_w + 2.0 * MARGIN;
    let total_h = panel_h + 2.0 * MARGIN + LABEL_H;

    let mut svg = String::with_capacity(1024 + frame.photos.len() * 160);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {:.1} {:.1}">"#,
        total_w.ceil() as u32,
        total_h.ceil() as u32,
        total_w,
        total_h
    ));
    svg.push('\n');

    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .index { font-size: 11px; fill: #fff; }
  .outer { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  .photo { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .outer { fill: #2d2d2d; stroke: #555; }
    .photo { fill: #3a72a4; stroke: #5a9fd4; }
  }
</style>
"##,
    );

    let title = format!(
        "{} {}×{:.0}  ({} photos)",
        frame.direction.as_str(),
        frame.container_width,
        frame.height,
        frame.photos.len()
    );
    svg.push_str(&format!(
        r#"<text x="{MARGIN}" y="{:.1}" class="label">{}</text>"#,
        MARGIN + 14.0,
        escape_xml(&title)
    ));
    svg.push('\n');

    let ox = MARGIN;
    let oy = MARGIN + LABEL_H;
    svg.push_str(&format!(
        r#"<rect x="{ox:.1}" y="{oy:.1}" width="{panel_w:.1}" height="{panel_h:.1}" class="outer"/>"#
    ));
    svg.push('\n');

    for p in &frame.photos {
        let x = ox + p.left * scale;
        let y = oy + p.top * scale;
        let w = p.width * scale;
        let h = p.height * scale;
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" class="photo"><title>{}</title></rect>"#,
            escape_xml(p.photo.render_key())
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" class="index">{}</text>"#,
            x + 4.0,
            y + 14.0,
            p.index
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
