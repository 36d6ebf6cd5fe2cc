use crate::core::config::ProviderConfig;
use crate::core::currency::{RateSnapshot, RateTable};
use crate::core::rates::{FetchError, RateSource};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

// ExchangeRateApiProvider implementation for RateSource
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("fxconv/1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Self::with_timeout(
            &config.base_url,
            config.timeout_secs.map(Duration::from_secs),
        )
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: String,
    date: String,
    rates: RateTable,
}

fn parse_latest_rates(requested: &str, body: &str) -> Result<RateSnapshot, FetchError> {
    let data: LatestRatesResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("invalid response for {requested}: {e}")))?;

    if !data.base.eq_ignore_ascii_case(requested) {
        return Err(FetchError::Parse(format!(
            "requested rates for {requested} but received {}",
            data.base
        )));
    }

    let as_of = NaiveDate::parse_from_str(&data.date, "%Y-%m-%d").map_err(|e| {
        FetchError::Parse(format!("invalid date '{}' for {requested}: {e}", data.date))
    })?;

    if let Some((code, rate)) = data
        .rates
        .iter()
        .find(|(_, rate)| !(rate.is_finite() && *rate > 0.0))
    {
        return Err(FetchError::Parse(format!(
            "invalid rate {rate} for {code} in {requested} rates"
        )));
    }

    Ok(RateSnapshot::new(requested, data.rates, as_of))
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, FetchError> {
        let url = format!("{}/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{e} for base: {base}")))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Exchange rate service returned an error status");
            return Err(FetchError::Remote {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("{e} while reading rates for {base}")))?;

        parse_latest_rates(base, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::FetchErrorKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USD_RESPONSE: &str = r#"{
        "provider": "https://www.exchangerate-api.com",
        "base": "USD",
        "date": "2024-05-01",
        "time_last_updated": 1714521601,
        "rates": {
            "USD": 1,
            "EUR": 0.934,
            "INR": 83.45,
            "JPY": 157.2
        }
    }"#;

    pub async fn create_mock_server(base: &str, template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/{base}")))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_server =
            create_mock_server("USD", ResponseTemplate::new(200).set_body_string(USD_RESPONSE))
                .await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri()).unwrap();

        let snapshot = provider.fetch_rates("USD").await.unwrap();

        assert_eq!(snapshot.base, "USD");
        assert_eq!(snapshot.as_of, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(snapshot.table.len(), 4);
        assert_eq!(snapshot.table.get("EUR"), Some(0.934));
        assert_eq!(snapshot.table.get("USD"), Some(1.0));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server =
            create_mock_server("USD", ResponseTemplate::new(200).set_body_string(USD_RESPONSE))
                .await;
        let provider = ExchangeRateApiProvider::new(&format!("{}/", mock_server.uri())).unwrap();

        assert!(provider.fetch_rates("USD").await.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_is_remote_error() {
        let mock_server = create_mock_server("USD", ResponseTemplate::new(500)).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri()).unwrap();

        let error = provider.fetch_rates("USD").await.unwrap_err();

        assert_eq!(error.kind(), FetchErrorKind::Remote);
        assert_eq!(error, FetchError::Remote { status: 500 });
        assert!(error.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_unknown_base_is_remote_error() {
        let mock_server = MockServer::start().await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri()).unwrap();

        // Nothing mounted, wiremock answers 404.
        let error = provider.fetch_rates("ZZZ").await.unwrap_err();
        assert_eq!(error, FetchError::Remote { status: 404 });
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let mock_server = create_mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
        )
        .await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri()).unwrap();

        let error = provider.fetch_rates("USD").await.unwrap_err();
        assert_eq!(error.kind(), FetchErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_missing_rates_is_parse_error() {
        let mock_server = create_mock_server(
            "USD",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"base": "USD", "date": "2024-05-01", "quotes": {}}"#),
        )
        .await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri()).unwrap();

        let error = provider.fetch_rates("USD").await.unwrap_err();
        assert_eq!(error.kind(), FetchErrorKind::Parse);
        assert!(error.to_string().contains("missing field `rates`"));
    }

    #[tokio::test]
    async fn test_network_failure_is_network_error() {
        // Nothing listens on port 1.
        let provider = ExchangeRateApiProvider::new("http://127.0.0.1:1").unwrap();

        let error = provider.fetch_rates("USD").await.unwrap_err();
        assert_eq!(error.kind(), FetchErrorKind::Network);
    }

    #[test]
    fn test_mismatched_base_is_rejected() {
        let error = parse_latest_rates("EUR", USD_RESPONSE).unwrap_err();
        assert_eq!(error.kind(), FetchErrorKind::Parse);
        assert!(error.to_string().contains("received USD"));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let body = r#"{"base": "USD", "date": "yesterday", "rates": {"EUR": 0.9}}"#;
        let error = parse_latest_rates("USD", body).unwrap_err();
        assert!(error.to_string().contains("invalid date 'yesterday'"));
    }

    #[test]
    fn test_non_positive_rate_is_rejected() {
        let body = r#"{"base": "USD", "date": "2024-05-01", "rates": {"EUR": 0.9, "XXX": 0}}"#;
        let error = parse_latest_rates("USD", body).unwrap_err();
        assert!(error.to_string().contains("XXX"));
    }
}
