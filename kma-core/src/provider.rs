use crate::{
    Config, WeatherReport, WeatherRequest, forecast::ForecastError, provider::kma::KmaProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod kma;

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherReport, ForecastError>;
}

/// Construct the forecast provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let service_key = config.service_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No service key configured.\n\
                 Hint: run `kma-weather configure` or set KMA_SERVICE_KEY."
        )
    })?;

    Ok(Box::new(KmaProvider::new(
        service_key.to_owned(),
        config.endpoint().to_owned(),
        config.num_of_rows(),
    )))
}
