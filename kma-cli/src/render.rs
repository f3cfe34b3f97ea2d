//! Human-readable output for forecast reports.

use std::fmt::Write;

use kma_core::{WeatherReport, WeatherSnapshot};

const MISSING: &str = "-";

pub fn report(report: &WeatherReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Location: {:.4}, {:.4} (grid {})",
        report.point.latitude, report.point.longitude, report.query.cell
    );
    let _ = writeln!(
        out,
        "Forecast issued: {} {}",
        report.query.base_date, report.query.base_time
    );
    out.push('\n');
    out.push_str(&snapshot(&report.snapshot));

    out
}

pub fn snapshot(snapshot: &WeatherSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Current weather");
    let _ = writeln!(out, "  Temperature: {}", or_missing(snapshot.temperature.as_deref()));
    let _ = writeln!(out, "  Humidity:    {}", or_missing(snapshot.humidity.as_deref()));
    let _ = writeln!(out, "  Wind speed:  {}", or_missing(snapshot.wind_speed.as_deref()));
    let _ = writeln!(out, "  Sky:         {}", snapshot.sky());

    out.push('\n');
    let _ = writeln!(out, "Precipitation probability");
    if snapshot.precipitation.is_empty() {
        let _ = writeln!(out, "  {MISSING}");
    }
    for slot in &snapshot.precipitation {
        let _ = writeln!(out, "  {}h: {}", slot.hour_label(), slot.probability);
    }

    out
}

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}
