use serde::Serialize;

/// Value kept each year.
pub const ANNUAL_RETENTION: f64 = 0.85;

/// Years shown after the manufacture year.
pub const PROJECTION_YEARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub year: i32,
    pub price_lakhs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DepreciationProjection {
    pub points: Vec<ProjectedPoint>,
}

impl DepreciationProjection {
    /// `points[i] = price_lakhs * 0.85^i` for years `start_year..=start_year + 5`.
    pub fn project(start_year: i32, price_lakhs: f64) -> Self {
        let points = (0..=PROJECTION_YEARS)
            .map(|i| ProjectedPoint {
                year: start_year + i as i32,
                price_lakhs: price_lakhs * ANNUAL_RETENTION.powi(i as i32),
            })
            .collect();
        DepreciationProjection { points }
    }

    pub fn first(&self) -> Option<&ProjectedPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ProjectedPoint> {
        self.points.last()
    }

    /// (year, lakhs) pairs for plotting.
    pub fn as_plot_points(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.year as f64, p.price_lakhs]).collect()
    }
}
