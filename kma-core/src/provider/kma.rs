use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{
    forecast::{ForecastError, ResultHeader, WeatherSnapshot, shape_response},
    model::{ForecastQuery, WeatherReport, WeatherRequest},
};

use super::ForecastProvider;

/// Client for the village forecast (`getVilageFcst`) endpoint.
#[derive(Debug, Clone)]
pub struct KmaProvider {
    service_key: String,
    endpoint: String,
    num_of_rows: u32,
    http: Client,
}

impl KmaProvider {
    pub fn new(service_key: String, endpoint: String, num_of_rows: u32) -> Self {
        Self {
            service_key,
            endpoint,
            num_of_rows,
            http: Client::new(),
        }
    }

    async fn fetch(&self, query: &ForecastQuery) -> Result<WeatherSnapshot, ForecastError> {
        let mut params = query.query_pairs(self.num_of_rows);
        params.push(("serviceKey", self.service_key.clone()));

        tracing::debug!(
            nx = query.cell.x,
            ny = query.cell.y,
            base_date = %query.base_date,
            base_time = %query.base_time,
            "requesting village forecast"
        );

        let res = self.http.get(&self.endpoint).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ForecastError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        parse_body(&body)
    }
}

#[async_trait]
impl ForecastProvider for KmaProvider {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherReport, ForecastError> {
        let query = request.query();
        let snapshot = self.fetch(&query).await?;

        Ok(WeatherReport {
            point: request.point,
            query,
            snapshot,
        })
    }
}

/// Decode and shape a response body, logging the envelope when it carries no items.
fn parse_body(body: &str) -> Result<WeatherSnapshot, ForecastError> {
    let json: Value = serde_json::from_str(body).inspect_err(|_| {
        // Key and quota errors come back as XML with a 200 status.
        tracing::warn!(body = %truncate_body(body), "forecast response is not JSON");
    })?;

    shape_response(&json).inspect_err(|_| match ResultHeader::from_body(&json) {
        Some(header) => tracing::warn!(
            code = %header.code,
            message = %header.message,
            "forecast response has no items"
        ),
        None => tracing::warn!(body = %truncate_body(body), "unexpected forecast response"),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
