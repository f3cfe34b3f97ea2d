//! Forecast issuance schedule.
//!
//! The village forecast is published eight times a day, every three hours
//! starting at 02:00 local time. A request must name the issuance it wants
//! with a base date (`YYYYMMDD`) and a base time (`HHMM`).

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// One of the eight daily issuance slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaseTime {
    #[serde(rename = "0200")]
    H02,
    #[serde(rename = "0500")]
    H05,
    #[serde(rename = "0800")]
    H08,
    #[serde(rename = "1100")]
    H11,
    #[serde(rename = "1400")]
    H14,
    #[serde(rename = "1700")]
    H17,
    #[serde(rename = "2000")]
    H20,
    #[serde(rename = "2300")]
    H23,
}

impl BaseTime {
    /// All slots in issuance order.
    pub const ALL: [BaseTime; 8] = [
        BaseTime::H02,
        BaseTime::H05,
        BaseTime::H08,
        BaseTime::H11,
        BaseTime::H14,
        BaseTime::H17,
        BaseTime::H20,
        BaseTime::H23,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BaseTime::H02 => "0200",
            BaseTime::H05 => "0500",
            BaseTime::H08 => "0800",
            BaseTime::H11 => "1100",
            BaseTime::H14 => "1400",
            BaseTime::H17 => "1700",
            BaseTime::H20 => "2000",
            BaseTime::H23 => "2300",
        }
    }

    pub fn hour(&self) -> u32 {
        match self {
            BaseTime::H02 => 2,
            BaseTime::H05 => 5,
            BaseTime::H08 => 8,
            BaseTime::H11 => 11,
            BaseTime::H14 => 14,
            BaseTime::H17 => 17,
            BaseTime::H20 => 20,
            BaseTime::H23 => 23,
        }
    }
}

impl fmt::Display for BaseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BaseTime {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseTime::ALL
            .into_iter()
            .find(|slot| slot.code() == s)
            .ok_or_else(|| anyhow!("Unknown base time '{s}'. Expected one of 0200, 0500, ..., 2300."))
    }
}

/// Latest issuance slot at or before `hour` (0–23).
///
/// Before 02:00 no slot of the day has been published yet and the result is
/// `2300`, the previous day's last slot. The base date is not rolled back.
pub fn base_time_for_hour(hour: u32) -> BaseTime {
    BaseTime::ALL
        .into_iter()
        .rev()
        .find(|slot| hour >= slot.hour())
        .unwrap_or(BaseTime::H23)
}

/// Latest issuance slot for a wall-clock reading.
pub fn current_base_time(now: &impl Timelike) -> BaseTime {
    base_time_for_hour(now.hour())
}

/// `YYYYMMDD` for the same clock reading the base time was taken from.
pub fn base_date(now: &impl Datelike) -> String {
    format!("{:04}{:02}{:02}", now.year(), now.month(), now.day())
}
