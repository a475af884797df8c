//! SVG serialization of a [`SkyChart`].
//!
//! The document is square, with equal scales on both axes and no axis or tick.
//! Chart coordinates map to pixels with y pointing up:
//!
//! ```text
//! px = (x + axis_limit) · s
//! py = (axis_limit − y) · s,     s = pixels / (2 · axis_limit)
//! ```
//!
//! Marker sizes are areas: a marker of size `m` is a disc of radius `√m` in units of
//! [`MARKER_UNIT`] of the image width.
use std::fmt::Write;

use crate::starmap_errors::StarMapError;

use super::SkyChart;

/// Fraction of the image width of one marker radius unit.
pub const MARKER_UNIT: f64 = 1.0 / 500.0;

const BACKGROUND: &str = "#ffffff";
const STAR_FILL: &str = "#1f77b4";
const STAR_OPACITY: f64 = 0.5;
const HORIZON_STROKE: &str = "#b0b0b0";
const LABEL_FILL: &str = "#000000";

fn svg_error(e: std::fmt::Error) -> StarMapError {
    StarMapError::RenderError(format!("cannot write svg: {e}"))
}

impl SkyChart {
    /// Self-contained SVG document of the chart, `pixels` wide and high.
    ///
    /// Return
    /// ------
    /// * The document text, or [`StarMapError::RenderError`] when `pixels` is zero.
    pub fn to_svg(&self, pixels: u32) -> Result<String, StarMapError> {
        if pixels == 0 {
            return Err(StarMapError::RenderError("svg size must be > 0".into()));
        }
        let size = f64::from(pixels);
        let scale = size / (2.0 * self.axis_limit);
        let to_px = |x: f64, y: f64| ((x + self.axis_limit) * scale, (self.axis_limit - y) * scale);

        let mut out = String::with_capacity(256 + 96 * self.markers.len());
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{pixels}" height="{pixels}" viewBox="0 0 {pixels} {pixels}">"#
        )
        .map_err(svg_error)?;
        writeln!(
            out,
            r#"  <rect width="{pixels}" height="{pixels}" fill="{BACKGROUND}"/>"#
        )
        .map_err(svg_error)?;

        let (cx, cy) = to_px(0.0, 0.0);
        writeln!(
            out,
            r#"  <circle cx="{cx:.2}" cy="{cy:.2}" r="{:.2}" fill="none" stroke="{HORIZON_STROKE}" stroke-width="1"/>"#,
            self.horizon_radius * scale
        )
        .map_err(svg_error)?;

        writeln!(
            out,
            r#"  <g fill="{STAR_FILL}" fill-opacity="{STAR_OPACITY}">"#
        )
        .map_err(svg_error)?;
        for marker in &self.markers {
            let (px, py) = to_px(marker.x, marker.y);
            let radius = marker.size.sqrt() * size * MARKER_UNIT;
            writeln!(
                out,
                r#"    <circle cx="{px:.2}" cy="{py:.2}" r="{radius:.2}"><title>HIP {} (mag {:.2})</title></circle>"#,
                marker.hip, marker.magnitude
            )
            .map_err(svg_error)?;
        }
        writeln!(out, "  </g>").map_err(svg_error)?;

        let font_size = size / 40.0;
        for label in &self.labels {
            let (px, py) = to_px(label.x, label.y);
            writeln!(
                out,
                r#"  <text x="{px:.2}" y="{py:.2}" font-size="{font_size:.1}" fill="{LABEL_FILL}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                label.text()
            )
            .map_err(svg_error)?;
        }

        out.push_str("</svg>\n");
        Ok(out)
    }
}
