use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
    forecast::WeatherSnapshot,
    grid::{GeoPoint, GridCell},
    schedule::{BaseTime, base_date, current_base_time},
};

/// Rows requested per page. One page covers the whole short-term horizon.
pub const DEFAULT_NUM_OF_ROWS: u32 = 500;

#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub point: GeoPoint,
    /// Local wall-clock time; `None` means "now".
    pub when: Option<NaiveDateTime>,
}

impl WeatherRequest {
    pub fn new(point: GeoPoint, when: Option<NaiveDateTime>) -> Self {
        Self { point, when }
    }

    /// Grid cell and issuance for this request, reading the local clock if
    /// no time was given.
    pub fn query(&self) -> ForecastQuery {
        let when = self.when.unwrap_or_else(|| Local::now().naive_local());
        ForecastQuery::new(self.point.to_grid(), &when)
    }
}

/// Parameters identifying one forecast issuance for one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastQuery {
    pub cell: GridCell,
    pub base_date: String,
    pub base_time: BaseTime,
}

impl ForecastQuery {
    /// Derive base date and base time from a single clock reading.
    pub fn new<T: Datelike + Timelike>(cell: GridCell, now: &T) -> Self {
        Self {
            cell,
            base_date: base_date(now),
            base_time: current_base_time(now),
        }
    }

    /// Query string pairs, excluding the service key.
    pub fn query_pairs(&self, num_of_rows: u32) -> Vec<(&'static str, String)> {
        vec![
            ("numOfRows", num_of_rows.to_string()),
            ("pageNo", "1".to_string()),
            ("dataType", "JSON".to_string()),
            ("base_date", self.base_date.clone()),
            ("base_time", self.base_time.code().to_string()),
            ("nx", self.cell.x.to_string()),
            ("ny", self.cell.y.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub point: GeoPoint,
    pub query: ForecastQuery,
    pub snapshot: WeatherSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn query_uses_one_clock_reading() {
        let cell = GridCell { x: 60, y: 127 };
        let query = ForecastQuery::new(cell, &at(15, 40));

        assert_eq!(query.base_date, "20261018");
        assert_eq!(query.base_time, BaseTime::H14);
    }

    #[test]
    fn early_morning_keeps_same_date() {
        let query = ForecastQuery::new(GridCell { x: 1, y: 1 }, &at(1, 30));

        assert_eq!(query.base_date, "20261018");
        assert_eq!(query.base_time, BaseTime::H23);
    }

    #[test]
    fn request_with_explicit_time() {
        let request = WeatherRequest::new(GeoPoint::new(37.5665, 126.9780), Some(at(23, 10)));
        let query = request.query();

        assert_eq!(query.cell, GridCell { x: 60, y: 127 });
        assert_eq!(query.base_date, "20261018");
        assert_eq!(query.base_time, BaseTime::H23);
    }

    #[test]
    fn query_pairs_match_endpoint_parameters() {
        let query = ForecastQuery::new(GridCell { x: 98, y: 76 }, &at(8, 5));
        let pairs = query.query_pairs(DEFAULT_NUM_OF_ROWS);

        assert_eq!(
            pairs,
            vec![
                ("numOfRows", "500".to_string()),
                ("pageNo", "1".to_string()),
                ("dataType", "JSON".to_string()),
                ("base_date", "20261018".to_string()),
                ("base_time", "0800".to_string()),
                ("nx", "98".to_string()),
                ("ny", "76".to_string()),
            ]
        );
    }
}
