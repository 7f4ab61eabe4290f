use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Build the directional cache/query key for a currency pair, e.g. `USD_EUR`
pub fn pair_key(from: &str, to: &str) -> String {
    format!("{from}_{to}")
}

/// A selectable currency, as stored in the `countries` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// Surrogate key assigned by the store on first insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub currency_id: String,
    pub currency_name: String,
}

impl Country {
    pub fn new(currency_id: impl Into<String>, currency_name: impl Into<String>) -> Self {
        Self {
            id: None,
            currency_id: currency_id.into(),
            currency_name: currency_name.into(),
        }
    }
}

/// Response of `GET /countries`
#[derive(Debug, Clone, Deserialize)]
pub struct CountriesResponse {
    /// Keyed by country code
    pub results: BTreeMap<String, ApiCountry>,
}

/// Country entry as the API returns it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountry {
    pub currency_id: String,
    pub currency_name: String,
}

impl From<ApiCountry> for Country {
    fn from(country: ApiCountry) -> Self {
        Self::new(country.currency_id, country.currency_name)
    }
}

/// Response of `GET /convert?q=FROM_TO`
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertResponse {
    /// Keyed by pair, e.g. `USD_EUR`
    pub results: HashMap<String, PairRate>,
}

/// Rate for one pair
#[derive(Debug, Clone, Deserialize)]
pub struct PairRate {
    pub val: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_directional() {
        assert_eq!(pair_key("USD", "EUR"), "USD_EUR");
        assert_ne!(pair_key("USD", "EUR"), pair_key("EUR", "USD"));
    }

    #[test]
    fn test_countries_response_parses_and_ignores_extra_fields() {
        let body = r#"{
            "results": {
                "AF": {"alpha3": "AFG", "currencyId": "AFN", "currencyName": "Afghan afghani",
                       "currencySymbol": "؋", "id": "AF", "name": "Afghanistan"},
                "US": {"currencyId": "USD", "currencyName": "United States dollar", "id": "US"}
            }
        }"#;

        let response: CountriesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results["AF"].currency_id, "AFN");

        let country: Country = response.results["US"].clone().into();
        assert_eq!(country, Country::new("USD", "United States dollar"));
    }

    #[test]
    fn test_country_serializes_camel_case_without_empty_id() {
        let json = serde_json::to_value(Country::new("EUR", "Euro")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"currencyId": "EUR", "currencyName": "Euro"})
        );
    }

    #[test]
    fn test_convert_response_parses() {
        let body = r#"{"query": {"count": 1},
            "results": {"USD_EUR": {"id": "USD_EUR", "fr": "USD", "to": "EUR", "val": 0.9}}}"#;

        let response: ConvertResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.results["USD_EUR"].val, 0.9);
    }
}
