//! # Sky chart
//!
//! The chart is a plain figure description: square bounds centred on the origin, the
//! horizon circle, one marker per visible star, and the four compass labels. It holds
//! no drawing backend; the [`svg`] module serializes it for display.
//!
//! Marker sizes follow the inverse-magnitude rule of a scatter plot
//! (`s = scale / magnitude`), with an offset and a floor on the denominator so that
//! magnitudes near zero or negative still give finite, ordered sizes:
//!
//! ```text
//! size = marker_scale / max(magnitude + magnitude_offset, min_marker_denominator)
//! ```
//!
//! The size strictly decreases with the magnitude for every magnitude above
//! `min_marker_denominator − magnitude_offset` (−1.75 with the defaults).
pub mod svg;

use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use itertools::Itertools;
use tracing::debug;

use crate::{
    catalog::StarRecord, constants::Magnitude, projection::ProjectedPoint,
    starmap_errors::StarMapError,
};

/// Radius of the horizon circle in chart units.
pub const HORIZON_RADIUS: f64 = 1.0;

/// Points this far outside the horizon circle still count as on it.
const HORIZON_TOLERANCE: f64 = 1e-12;

/// Parameters of the chart layout.
///
/// Defaults
/// --------
/// * `axis_limit`: 1.2 (plot bounds are `[-axis_limit, axis_limit]` on both axes)
/// * `label_radius`: 1.1
/// * `marker_scale`: 10.0
/// * `magnitude_offset`: 2.0
/// * `min_marker_denominator`: 0.25
/// * `include_below_horizon`: false
///
/// Use [`ChartParams::builder`] to change them with validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartParams {
    pub axis_limit: f64,
    /// Distance of the compass labels from the centre
    pub label_radius: f64,
    pub marker_scale: f64,
    pub magnitude_offset: f64,
    pub min_marker_denominator: f64,
    /// Draw the stars projected outside the horizon circle
    pub include_below_horizon: bool,
}

impl Default for ChartParams {
    fn default() -> Self {
        ChartParams {
            axis_limit: 1.2,
            label_radius: 1.1,
            marker_scale: 10.0,
            magnitude_offset: 2.0,
            min_marker_denominator: 0.25,
            include_below_horizon: false,
        }
    }
}

impl ChartParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent, validated construction.
    ///
    /// ```rust
    /// use starmap::chart::ChartParams;
    ///
    /// let params = ChartParams::builder()
    ///     .axis_limit(1.5)
    ///     .label_radius(1.3)
    ///     .include_below_horizon(true)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.axis_limit, 1.5);
    /// ```
    pub fn builder() -> ChartParamsBuilder {
        ChartParamsBuilder::new()
    }

    /// Marker size of a star of magnitude `magnitude`.
    pub fn marker_size(&self, magnitude: Magnitude) -> f64 {
        self.marker_scale / (magnitude + self.magnitude_offset).max(self.min_marker_denominator)
    }
}

impl fmt::Display for ChartParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Chart Parameters")?;
            writeln!(f, "----------------")?;
            writeln!(f, "  axis_limit             = {}", self.axis_limit)?;
            writeln!(f, "  label_radius           = {}", self.label_radius)?;
            writeln!(f, "  marker_scale           = {}", self.marker_scale)?;
            writeln!(f, "  magnitude_offset       = {}", self.magnitude_offset)?;
            writeln!(f, "  min_marker_denominator = {}", self.min_marker_denominator)?;
            write!(f, "  include_below_horizon  = {}", self.include_below_horizon)
        } else {
            write!(
                f,
                "ChartParams(axis ±{}, labels at {}, size {}/max(m+{}, {}){})",
                self.axis_limit,
                self.label_radius,
                self.marker_scale,
                self.magnitude_offset,
                self.min_marker_denominator,
                if self.include_below_horizon {
                    ", below horizon shown"
                } else {
                    ""
                }
            )
        }
    }
}

/// Builder for [`ChartParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct ChartParamsBuilder {
    params: ChartParams,
}

impl ChartParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: ChartParams::default(),
        }
    }

    pub fn axis_limit(mut self, v: f64) -> Self {
        self.params.axis_limit = v;
        self
    }
    pub fn label_radius(mut self, v: f64) -> Self {
        self.params.label_radius = v;
        self
    }
    pub fn marker_scale(mut self, v: f64) -> Self {
        self.params.marker_scale = v;
        self
    }
    pub fn magnitude_offset(mut self, v: f64) -> Self {
        self.params.magnitude_offset = v;
        self
    }
    pub fn min_marker_denominator(mut self, v: f64) -> Self {
        self.params.min_marker_denominator = v;
        self
    }
    pub fn include_below_horizon(mut self, v: bool) -> Self {
        self.params.include_below_horizon = v;
        self
    }

    /// True iff x > 0.0 and finite (NaN is rejected).
    #[inline]
    fn positive(x: f64) -> bool {
        x.is_finite() && x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Validate and return the parameters.
    ///
    /// Validation rules
    /// ----------------
    /// * `axis_limit`, `label_radius`, `marker_scale`, `min_marker_denominator` are
    ///   finite and strictly positive.
    /// * `magnitude_offset` is finite.
    /// * `label_radius ≤ axis_limit`, the labels must stay inside the bounds.
    /// * `label_radius > 1`, the labels sit outside the horizon circle.
    ///
    /// Return
    /// ------
    /// * [`StarMapError::InvalidChartParameter`] naming the first rule broken.
    pub fn build(self) -> Result<ChartParams, StarMapError> {
        let p = &self.params;

        for (name, value) in [
            ("axis_limit", p.axis_limit),
            ("label_radius", p.label_radius),
            ("marker_scale", p.marker_scale),
            ("min_marker_denominator", p.min_marker_denominator),
        ] {
            if !Self::positive(value) {
                return Err(StarMapError::InvalidChartParameter(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        if !p.magnitude_offset.is_finite() {
            return Err(StarMapError::InvalidChartParameter(
                "magnitude_offset must be finite".into(),
            ));
        }
        if !matches!(p.label_radius.partial_cmp(&HORIZON_RADIUS), Some(Greater)) {
            return Err(StarMapError::InvalidChartParameter(format!(
                "label_radius ({}) must lie outside the horizon circle ({HORIZON_RADIUS})",
                p.label_radius
            )));
        }
        if !matches!(
            p.label_radius.partial_cmp(&p.axis_limit),
            Some(Less) | Some(Equal)
        ) {
            return Err(StarMapError::InvalidChartParameter(format!(
                "label_radius ({}) must not exceed axis_limit ({})",
                p.label_radius, p.axis_limit
            )));
        }

        Ok(self.params)
    }
}

/// Cardinal points, in clockwise order from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [
        Cardinal::North,
        Cardinal::East,
        Cardinal::South,
        Cardinal::West,
    ];

    pub fn azimuth_deg(&self) -> f64 {
        match self {
            Cardinal::North => 0.0,
            Cardinal::East => 90.0,
            Cardinal::South => 180.0,
            Cardinal::West => 270.0,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Cardinal::North => "N",
            Cardinal::East => "E",
            Cardinal::South => "S",
            Cardinal::West => "W",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// A compass label placed on the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassLabel {
    pub cardinal: Cardinal,
    pub x: f64,
    pub y: f64,
}

impl CompassLabel {
    /// Label of `cardinal` at distance `radius`, same orientation as the projection
    /// (north on +y, east on +x).
    pub fn at_radius(cardinal: Cardinal, radius: f64) -> Self {
        let (sin_az, cos_az) = match cardinal {
            Cardinal::North => (0.0, 1.0),
            Cardinal::East => (1.0, 0.0),
            Cardinal::South => (0.0, -1.0),
            Cardinal::West => (-1.0, 0.0),
        };
        CompassLabel {
            cardinal,
            x: radius * sin_az,
            y: radius * cos_az,
        }
    }

    pub fn text(&self) -> &'static str {
        self.cardinal.letter()
    }
}

/// One star drawn on the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarMarker {
    pub hip: u32,
    pub x: f64,
    pub y: f64,
    /// Marker area, in scatter-plot units
    pub size: f64,
    pub magnitude: Magnitude,
}

/// The rendered figure.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyChart {
    pub axis_limit: f64,
    pub horizon_radius: f64,
    /// Visible stars, in catalog order
    pub markers: Vec<StarMarker>,
    pub labels: [CompassLabel; 4],
    /// Stars projected outside the horizon and left out
    pub below_horizon: usize,
}

impl SkyChart {
    /// Chart with labels and no star.
    pub fn empty(params: &ChartParams) -> Self {
        SkyChart {
            axis_limit: params.axis_limit,
            horizon_radius: HORIZON_RADIUS,
            markers: Vec::new(),
            labels: Cardinal::ALL.map(|c| CompassLabel::at_radius(c, params.label_radius)),
            below_horizon: 0,
        }
    }

    pub fn label(&self, cardinal: Cardinal) -> Option<&CompassLabel> {
        self.labels.iter().find(|l| l.cardinal == cardinal)
    }
}

impl fmt::Display for SkyChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SkyChart: {} stars ({} below horizon), labels {}, bounds ±{}",
            self.markers.len(),
            self.below_horizon,
            self.labels.iter().map(|l| l.text()).join(""),
            self.axis_limit
        )
    }
}

/// Build the chart of the projected stars.
///
/// Arguments
/// ---------
/// * `points`: projected position of each star
/// * `stars`: the matching catalog rows (same length and order as `points`), giving
///   identifiers and magnitudes
/// * `params`: layout parameters
///
/// Return
/// ------
/// * The chart. Stars outside the horizon circle are counted in
///   [`SkyChart::below_horizon`] and skipped unless `params.include_below_horizon`.
///   A point [at infinity](ProjectedPoint::AT_INFINITY) is always counted and skipped.
/// * [`StarMapError::RenderError`] when the inputs do not line up or contain
///   non-finite values.
pub fn render(
    points: &[ProjectedPoint],
    stars: &[StarRecord],
    params: &ChartParams,
) -> Result<SkyChart, StarMapError> {
    if points.len() != stars.len() {
        return Err(StarMapError::RenderError(format!(
            "{} projected points for {} stars",
            points.len(),
            stars.len()
        )));
    }

    let mut chart = SkyChart::empty(params);
    chart.markers.reserve(points.len());

    for (point, star) in points.iter().zip(stars) {
        // the antipode has no place on the plane, even with `include_below_horizon`
        if point.is_at_infinity() && !point.x.is_nan() && !point.y.is_nan() {
            chart.below_horizon += 1;
            continue;
        }

        if !(point.x.is_finite() && point.y.is_finite() && star.magnitude.is_finite()) {
            return Err(StarMapError::RenderError(format!(
                "non-finite value for HIP {}: ({}, {}) mag {}",
                star.hip, point.x, point.y, star.magnitude
            )));
        }

        if point.radius() > HORIZON_RADIUS + HORIZON_TOLERANCE {
            chart.below_horizon += 1;
            if !params.include_below_horizon {
                continue;
            }
        }

        chart.markers.push(StarMarker {
            hip: star.hip,
            x: point.x,
            y: point.y,
            size: params.marker_size(star.magnitude),
            magnitude: star.magnitude,
        });
    }

    debug!(
        markers = chart.markers.len(),
        below_horizon = chart.below_horizon,
        "sky chart rendered"
    );
    Ok(chart)
}
