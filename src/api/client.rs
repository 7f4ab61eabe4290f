use log::{debug, info};
use reqwest::blocking::Client;
use url::Url;

use super::types::*;
use crate::config::Config;
use crate::error::{ConverterError, Result};

const USER_AGENT: &str = concat!("rateport/", env!("CARGO_PKG_VERSION"));

/// Currency API client.
///
/// Stateless request/response calls only: one attempt per call, no retry,
/// and the transport's default timeout.
pub struct CurrencyClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CurrencyClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.api.base_url, config.api.key.clone())
    }

    /// Create a client for an explicit endpoint
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Endpoint this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path)).map_err(|e| {
            ConverterError::Config(format!("Invalid API base URL '{}': {}", self.base_url, e))
        })?;

        let mut pairs: Vec<(&str, &str)> = query.to_vec();
        if let Some(ref key) = self.api_key {
            pairs.push(("apiKey", key.as_str()));
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    /// Make a GET request to the currency API
    fn get<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(path, query)?;
        debug!("GET {}{}", self.base_url, path);

        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ConverterError::api(status.as_u16(), message));
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| ConverterError::UnexpectedResponse(e.to_string()))
    }

    /// Fetch every country with its currency, ordered by country code
    pub fn fetch_countries(&self) -> Result<Vec<Country>> {
        let response: CountriesResponse = self.get("/countries", &[])?;
        info!("fetched {} countries", response.results.len());

        Ok(response.results.into_values().map(Country::from).collect())
    }

    /// Fetch the current rate for converting `from` into `to`
    pub fn fetch_rate(&self, from: &str, to: &str) -> Result<f64> {
        let key = pair_key(from, to);
        let response: ConvertResponse = self.get("/convert", &[("q", key.as_str())])?;

        let rate = response
            .results
            .get(&key)
            .map(|pair| pair.val)
            .ok_or_else(|| ConverterError::UnexpectedResponse(format!("no rate for {key}")))?;

        info!("fetched {key} = {rate}");
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const COUNTRIES_BODY: &str = r#"{"results": {
        "US": {"currencyId": "USD", "currencyName": "United States dollar", "id": "US"},
        "DE": {"currencyId": "EUR", "currencyName": "Euro", "id": "DE"}
    }}"#;

    // ─────────────────────────────────────────────────────────────────────────
    // Countries
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_fetch_countries() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/countries")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(COUNTRIES_BODY)
            .create();

        let client = CurrencyClient::with_base_url(server.url(), None).unwrap();
        let countries = client.fetch_countries().unwrap();

        mock.assert();
        assert_eq!(
            countries,
            vec![
                Country::new("EUR", "Euro"),
                Country::new("USD", "United States dollar"),
            ]
        );
    }

    #[test]
    fn test_fetch_countries_server_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/countries")
            .with_status(503)
            .with_body("unavailable")
            .create();

        let client = CurrencyClient::with_base_url(server.url(), None).unwrap();
        let err = client.fetch_countries().unwrap_err();

        assert!(err.is_network());
        assert!(matches!(err, ConverterError::Api { status: 503, .. }));
    }

    #[test]
    fn test_fetch_countries_malformed_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/countries")
            .with_status(200)
            .with_body("<html>")
            .create();

        let client = CurrencyClient::with_base_url(server.url(), None).unwrap();
        let err = client.fetch_countries().unwrap_err();
        assert!(matches!(err, ConverterError::UnexpectedResponse(_)));
        assert!(err.is_network());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_fetch_rate() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/convert")
            .match_query(Matcher::UrlEncoded("q".into(), "USD_EUR".into()))
            .with_status(200)
            .with_body(r#"{"results": {"USD_EUR": {"val": 0.9}}}"#)
            .create();

        let client = CurrencyClient::with_base_url(server.url(), None).unwrap();
        let rate = client.fetch_rate("USD", "EUR").unwrap();

        mock.assert();
        assert_eq!(rate, 0.9);
    }

    #[test]
    fn test_fetch_rate_http_500() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/convert")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("Internal Server Error")
            .create();

        let client = CurrencyClient::with_base_url(server.url(), None).unwrap();
        let err = client.fetch_rate("USD", "EUR").unwrap_err();

        assert!(matches!(err, ConverterError::Api { status: 500, .. }));
    }

    #[test]
    fn test_fetch_rate_missing_pair_in_payload() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/convert")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": {}}"#)
            .create();

        let client = CurrencyClient::with_base_url(server.url(), None).unwrap();
        let err = client.fetch_rate("USD", "EUR").unwrap_err();

        assert!(matches!(err, ConverterError::UnexpectedResponse(_)));
        assert!(err.is_network());
    }

    #[test]
    fn test_api_key_is_sent_as_query_parameter() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/convert")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "GBP_JPY".into()),
                Matcher::UrlEncoded("apiKey".into(), "secret".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"results": {"GBP_JPY": {"val": 190.5}}}"#)
            .create();

        let client =
            CurrencyClient::with_base_url(server.url(), Some("secret".to_string())).unwrap();
        assert_eq!(client.fetch_rate("GBP", "JPY").unwrap(), 190.5);
        mock.assert();
    }

    #[test]
    fn test_transport_failure_is_network_error() {
        // Nothing listens on port 1
        let client = CurrencyClient::with_base_url("http://127.0.0.1:1", None).unwrap();
        let err = client.fetch_rate("USD", "EUR").unwrap_err();

        assert!(matches!(err, ConverterError::Http(_)));
        assert!(err.is_network());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CurrencyClient::with_base_url("http://localhost:9000/api/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/api");
    }

    #[test]
    fn test_invalid_base_url() {
        let client = CurrencyClient::with_base_url("not a url", None).unwrap();
        assert!(matches!(
            client.fetch_countries(),
            Err(ConverterError::Config(_))
        ));
    }
}
