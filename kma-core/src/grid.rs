//! Latitude/longitude to forecast-grid conversion.
//!
//! The village forecast is indexed on a 5 km grid laid out with a secant
//! Lambert Conformal Conic projection. All projection parameters are fixed by
//! the forecast service:
//! - Earth radius: 6371.00877 km
//! - Grid spacing: 5.0 km
//! - Standard parallels: 30°N and 60°N
//! - Origin: 38°N, 126°E, placed at grid cell (43, 136)

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.00877;
const GRID_SPACING_KM: f64 = 5.0;
const STANDARD_PARALLEL_1: f64 = 30.0;
const STANDARD_PARALLEL_2: f64 = 60.0;
const ORIGIN_LON: f64 = 126.0;
const ORIGIN_LAT: f64 = 38.0;
const ORIGIN_X: f64 = 43.0;
const ORIGIN_Y: f64 = 136.0;

const DEG_TO_RAD: f64 = PI / 180.0;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn to_grid(&self) -> GridCell {
        convert(self.latitude, self.longitude)
    }
}

/// A cell of the forecast grid (`nx`, `ny` in the forecast API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Convert a latitude/longitude in degrees to its forecast grid cell.
///
/// Input is not range-checked. Out-of-range coordinates still yield a cell,
/// just not a meaningful one. Non-finite input must not be passed.
pub fn convert(latitude: f64, longitude: f64) -> GridCell {
    let re = EARTH_RADIUS_KM / GRID_SPACING_KM;
    let slat1 = STANDARD_PARALLEL_1 * DEG_TO_RAD;
    let slat2 = STANDARD_PARALLEL_2 * DEG_TO_RAD;
    let olon = ORIGIN_LON * DEG_TO_RAD;
    let olat = ORIGIN_LAT * DEG_TO_RAD;

    // Cone constant
    let sn = half_angle_tan(slat2) / half_angle_tan(slat1);
    let sn = (slat1.cos() / slat2.cos()).ln() / sn.ln();

    // Scale factor
    let sf = half_angle_tan(slat1).powf(sn) * slat1.cos() / sn;

    let ro = re * sf / half_angle_tan(olat).powf(sn);
    let ra = re * sf / half_angle_tan(latitude * DEG_TO_RAD).powf(sn);

    let mut theta = longitude * DEG_TO_RAD - olon;
    if theta > PI {
        theta -= 2.0 * PI;
    }
    if theta < -PI {
        theta += 2.0 * PI;
    }
    theta *= sn;

    let x = (ra * theta.sin() + ORIGIN_X + 0.5).floor();
    let y = (ro - ra * theta.cos() + ORIGIN_Y + 0.5).floor();

    GridCell { x: x as i32, y: y as i32 }
}

/// `tan(π/4 + φ/2)`, shared by the cone constant and every radius term.
fn half_angle_tan(lat_rad: f64) -> f64 {
    (PI * 0.25 + lat_rad * 0.5).tan()
}
