//! Shaping of raw village-forecast items into a display snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Number of precipitation-probability entries kept in a snapshot.
pub const PRECIPITATION_SLOTS: usize = 8;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("No forecast data in response")]
    NoData,
    #[error("Failed to reach the forecast service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Forecast request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode forecast response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One record of the forecast item list, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawForecastItem {
    pub category: String,
    #[serde(rename = "fcstDate", default, skip_serializing_if = "Option::is_none")]
    pub forecast_date: Option<String>,
    #[serde(rename = "fcstTime")]
    pub forecast_time: String,
    #[serde(rename = "fcstValue")]
    pub value: String,
}

impl RawForecastItem {
    pub fn new(category: &str, forecast_time: &str, value: &str) -> Self {
        Self {
            category: category.to_string(),
            forecast_date: None,
            forecast_time: forecast_time.to_string(),
            value: value.to_string(),
        }
    }
}

/// Forecast categories this crate understands. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Temperature,
    Humidity,
    WindSpeed,
    Sky,
    PrecipitationProbability,
}

impl Category {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TMP" => Some(Category::Temperature),
            "REH" => Some(Category::Humidity),
            "WSD" => Some(Category::WindSpeed),
            "SKY" => Some(Category::Sky),
            "POP" => Some(Category::PrecipitationProbability),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Category::Temperature => "TMP",
            Category::Humidity => "REH",
            Category::WindSpeed => "WSD",
            Category::Sky => "SKY",
            Category::PrecipitationProbability => "POP",
        }
    }
}

/// Sky-state code, mapped to a label for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyState {
    Clear,
    MostlyCloudy,
    Overcast,
    Unknown,
}

impl SkyState {
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" => SkyState::Clear,
            "3" => SkyState::MostlyCloudy,
            "4" => SkyState::Overcast,
            _ => SkyState::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkyState::Clear => "Clear",
            SkyState::MostlyCloudy => "Mostly cloudy",
            SkyState::Overcast => "Overcast",
            SkyState::Unknown => "No data",
        }
    }
}

impl std::fmt::Display for SkyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecipitationSlot {
    /// Forecast time as `HHMM`.
    pub time: String,
    /// Probability with a `%` suffix.
    pub probability: String,
}

impl PrecipitationSlot {
    /// The `HH` part of the forecast time.
    pub fn hour_label(&self) -> &str {
        self.time.get(..2).unwrap_or(&self.time)
    }
}

/// Current conditions plus the leading precipitation-probability series.
///
/// Current-condition fields carry their unit suffix and are `None` when the
/// response had no item of that category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub wind_speed: Option<String>,
    pub sky_code: Option<String>,
    pub precipitation: Vec<PrecipitationSlot>,
}

impl WeatherSnapshot {
    pub fn sky(&self) -> SkyState {
        self.sky_code.as_deref().map_or(SkyState::Unknown, SkyState::from_code)
    }
}

/// `response.header` of the API envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResultHeader {
    #[serde(rename = "resultCode")]
    pub code: String,
    #[serde(rename = "resultMsg")]
    pub message: String,
}

impl ResultHeader {
    pub fn from_body(body: &Value) -> Option<Self> {
        body.pointer("/response/header")
            .and_then(|header| ResultHeader::deserialize(header).ok())
    }
}

/// Pull the item list out of a decoded response body.
///
/// Returns `None` for any body that does not carry a well-formed
/// `response.body.items.item` array.
pub fn extract_items(body: &Value) -> Option<Vec<RawForecastItem>> {
    let items = body.pointer("/response/body/items/item")?;
    Vec::<RawForecastItem>::deserialize(items).ok()
}

/// Build a snapshot from a decoded response body.
pub fn shape_response(body: &Value) -> Result<WeatherSnapshot, ForecastError> {
    let items = extract_items(body).ok_or(ForecastError::NoData)?;
    shape(&items)
}

/// Build a snapshot from items in API order.
///
/// The first item of each current-condition category wins; later items of the
/// same category are skipped. Precipitation probabilities keep API order and
/// are cut to [`PRECIPITATION_SLOTS`].
pub fn shape(items: &[RawForecastItem]) -> Result<WeatherSnapshot, ForecastError> {
    if items.is_empty() {
        return Err(ForecastError::NoData);
    }

    let mut temperature = None;
    let mut humidity = None;
    let mut wind_speed = None;
    let mut sky_code = None;
    let mut precipitation = Vec::new();

    for item in items {
        let Some(category) = Category::from_code(&item.category) else {
            continue;
        };

        match category {
            Category::Temperature => set_if_absent(&mut temperature, &item.value),
            Category::Humidity => set_if_absent(&mut humidity, &item.value),
            Category::WindSpeed => set_if_absent(&mut wind_speed, &item.value),
            Category::Sky => set_if_absent(&mut sky_code, &item.value),
            Category::PrecipitationProbability => precipitation.push(PrecipitationSlot {
                time: item.forecast_time.clone(),
                probability: format!("{}%", item.value),
            }),
        }
    }

    precipitation.truncate(PRECIPITATION_SLOTS);

    Ok(WeatherSnapshot {
        temperature: temperature.map(|v| format!("{v}°C")),
        humidity: humidity.map(|v| format!("{v}%")),
        wind_speed: wind_speed.map(|v| format!("{v} m/s")),
        sky_code: sky_code.map(str::to_string),
        precipitation,
    })
}

fn set_if_absent<'a>(slot: &mut Option<&'a str>, value: &'a str) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(category: &str, time: &str, value: &str) -> RawForecastItem {
        RawForecastItem::new(category, time, value)
    }

    #[test]
    fn empty_list_is_no_data() {
        let err = shape(&[]).unwrap_err();
        assert!(matches!(err, ForecastError::NoData));
    }

    #[test]
    fn first_value_wins_and_pop_keeps_order() {
        let items = [
            item("TMP", "1500", "10"),
            item("TMP", "1600", "15"),
            item("POP", "1500", "20"),
            item("POP", "1600", "30"),
        ];

        let snapshot = shape(&items).unwrap();

        assert_eq!(snapshot.temperature.as_deref(), Some("10°C"));
        assert_eq!(
            snapshot.precipitation,
            vec![
                PrecipitationSlot { time: "1500".into(), probability: "20%".into() },
                PrecipitationSlot { time: "1600".into(), probability: "30%".into() },
            ]
        );
    }

    #[test]
    fn current_conditions_get_units() {
        let items = [
            item("REH", "1500", "60"),
            item("WSD", "1500", "2.1"),
            item("SKY", "1500", "3"),
            item("TMP", "1500", "-4"),
            item("SKY", "1600", "1"),
        ];

        let snapshot = shape(&items).unwrap();

        assert_eq!(snapshot.temperature.as_deref(), Some("-4°C"));
        assert_eq!(snapshot.humidity.as_deref(), Some("60%"));
        assert_eq!(snapshot.wind_speed.as_deref(), Some("2.1 m/s"));
        assert_eq!(snapshot.sky_code.as_deref(), Some("3"));
        assert_eq!(snapshot.sky(), SkyState::MostlyCloudy);
        assert!(snapshot.precipitation.is_empty());
    }

    #[test]
    fn pop_is_truncated_to_first_eight() {
        let items: Vec<_> = (0..12)
            .map(|h| item("POP", &format!("{h:02}00"), &(h * 5).to_string()))
            .collect();

        let snapshot = shape(&items).unwrap();

        assert_eq!(snapshot.precipitation.len(), PRECIPITATION_SLOTS);
        assert_eq!(snapshot.precipitation[0].time, "0000");
        assert_eq!(snapshot.precipitation[7].time, "0700");
        assert_eq!(snapshot.precipitation[7].probability, "35%");
    }

    #[test]
    fn unknown_categories_are_ignored() {
        let items = [item("UUU", "1500", "1.2"), item("PCP", "1500", "강수없음")];

        let snapshot = shape(&items).unwrap();
        assert_eq!(snapshot, WeatherSnapshot::default());
    }

    #[test]
    fn sky_lookup() {
        assert_eq!(SkyState::from_code("1").label(), "Clear");
        assert_eq!(SkyState::from_code("3").label(), "Mostly cloudy");
        assert_eq!(SkyState::from_code("4").label(), "Overcast");
        assert_eq!(SkyState::from_code("9").label(), "No data");
        assert_eq!(WeatherSnapshot::default().sky(), SkyState::Unknown);
    }

    #[test]
    fn hour_label_is_leading_two_digits() {
        let slot = PrecipitationSlot { time: "2100".into(), probability: "60%".into() };
        assert_eq!(slot.hour_label(), "21");

        let short = PrecipitationSlot { time: "9".into(), probability: "0%".into() };
        assert_eq!(short.hour_label(), "9");
    }

    #[test]
    fn shape_response_reads_nested_items() {
        let body = json!({
            "response": {
                "header": { "resultCode": "00", "resultMsg": "NORMAL_SERVICE" },
                "body": {
                    "dataType": "JSON",
                    "items": { "item": [
                        { "baseDate": "20261018", "baseTime": "1400", "category": "TMP",
                          "fcstDate": "20261018", "fcstTime": "1500", "fcstValue": "18", "nx": 60, "ny": 127 },
                        { "baseDate": "20261018", "baseTime": "1400", "category": "POP",
                          "fcstDate": "20261018", "fcstTime": "1500", "fcstValue": "30", "nx": 60, "ny": 127 }
                    ]},
                    "pageNo": 1, "numOfRows": 500, "totalCount": 2
                }
            }
        });

        let items = extract_items(&body).unwrap();
        assert_eq!(items[0].forecast_date.as_deref(), Some("20261018"));

        let snapshot = shape_response(&body).unwrap();
        assert_eq!(snapshot.temperature.as_deref(), Some("18°C"));
        assert_eq!(snapshot.precipitation[0].probability, "30%");
    }

    #[test]
    fn missing_item_list_is_no_data() {
        let body = json!({
            "response": {
                "header": { "resultCode": "03", "resultMsg": "NO_DATA" }
            }
        });

        assert!(extract_items(&body).is_none());
        assert!(matches!(shape_response(&body), Err(ForecastError::NoData)));

        let header = ResultHeader::from_body(&body).unwrap();
        assert_eq!(header.code, "03");
        assert_eq!(header.message, "NO_DATA");
    }

    #[test]
    fn malformed_item_list_is_no_data() {
        let empty_string = json!({ "response": { "body": { "items": "" } } });
        let missing_fields = json!({ "response": { "body": { "items": { "item": [ { "category": "TMP" } ] } } } });

        assert!(matches!(shape_response(&empty_string), Err(ForecastError::NoData)));
        assert!(matches!(shape_response(&missing_fields), Err(ForecastError::NoData)));
        assert!(matches!(shape_response(&json!(null)), Err(ForecastError::NoData)));
    }

    #[test]
    fn empty_item_array_is_no_data() {
        let body = json!({ "response": { "body": { "items": { "item": [] } } } });
        assert!(matches!(shape_response(&body), Err(ForecastError::NoData)));
    }
}
