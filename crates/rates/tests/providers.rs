//! HTTP-level tests for the provider adapters and the service wiring.

use std::sync::Arc;

use moneywords_rates::{
    CurrencyFreaksProvider, ExchangeRateApiProvider, ExchangeRateService, HttpClient,
    NbrbProvider, RateProvider, RateSource, RatesConfig, RatesError, RetryClass, SourceSelector,
};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> Arc<HttpClient> {
    Arc::new(HttpClient::default())
}

#[tokio::test]
async fn test_currency_freaks_parses_string_rates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/rates/latest"))
        .and(query_param("apikey", "secret"))
        .and(query_param("base", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "date": "2024-05-01 00:00:00+00",
            "base": "USD",
            "rates": { "EUR": "0.9321", "rub": "91.5", "BTC": "0.0000162" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = CurrencyFreaksProvider::with_base_url(
        http(),
        Some("secret".to_string()),
        format!("{}/v2.0/rates/latest", server.uri()),
    );

    let rates = provider.fetch_rates("USD").await.unwrap();
    assert_eq!(rates["EUR"].to_decimal(), Some(dec!(0.9321)));
    assert_eq!(rates["RUB"].to_decimal(), Some(dec!(91.5)));
    assert_eq!(rates["BTC"].to_decimal(), Some(dec!(0.0000162)));
}

#[tokio::test]
async fn test_currency_freaks_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider =
        CurrencyFreaksProvider::with_base_url(http(), Some("secret".to_string()), server.uri());

    let err = provider.fetch_rates("USD").await.unwrap_err();
    assert!(matches!(err, RatesError::RateLimited { .. }));
    assert_eq!(err.retry_class(), RetryClass::FailoverWithPenalty);
}

#[tokio::test]
async fn test_exchange_rate_api_path_and_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/key123/latest/EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "base_code": "EUR",
            "conversion_rates": { "EUR": 1, "USD": 1.08, "JPY": 162.3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ExchangeRateApiProvider::with_base_url(
        http(),
        Some("key123".to_string()),
        format!("{}/v6", server.uri()),
    );

    let rates = provider.fetch_rates("EUR").await.unwrap();
    assert_eq!(rates["USD"].to_decimal(), Some(dec!(1.08)));
    assert_eq!(rates["JPY"].to_decimal(), Some(dec!(162.3)));
}

#[tokio::test]
async fn test_exchange_rate_api_in_band_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "error",
            "error-type": "invalid-key"
        })))
        .mount(&server)
        .await;

    let provider =
        ExchangeRateApiProvider::with_base_url(http(), Some("bad".to_string()), server.uri());

    let err = provider.fetch_rates("USD").await.unwrap_err();
    match err {
        RatesError::ProviderError { provider, message } => {
            assert_eq!(provider, "exchangerate");
            assert_eq!(message, "invalid-key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_nbrb_rebases_to_requested_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exrates/rates"))
        .and(query_param("periodicity", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Cur_Abbreviation": "USD", "Cur_OfficialRate": 3.2, "Cur_Scale": 1 },
            { "Cur_Abbreviation": "RUB", "Cur_OfficialRate": 3.5, "Cur_Scale": 100 }
        ])))
        .mount(&server)
        .await;

    let provider = NbrbProvider::with_url(
        http(),
        format!("{}/exrates/rates?periodicity=0", server.uri()),
    );

    let rates = provider.fetch_rates("USD").await.unwrap();
    assert_eq!(rates["USD"].to_decimal(), Some(dec!(1)));
    assert_eq!(rates["BYN"].to_decimal(), Some(dec!(3.2)));
    let rub = rates["RUB"].to_decimal().unwrap();
    assert!((rub - dec!(91.428571)).abs() < dec!(0.001));
}

#[tokio::test]
async fn test_malformed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let provider = NbrbProvider::with_url(http(), server.uri());
    let err = provider.fetch_rates("BYN").await.unwrap_err();
    assert!(matches!(err, RatesError::MalformedPayload { .. }));
}

#[tokio::test]
async fn test_service_uses_priority_order_and_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/freaks"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v6/key/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "conversion_rates": { "USD": 1, "EUR": 0.9 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = RatesConfig {
        currency_freaks_api_key: Some("key".to_string()),
        currency_freaks_base_url: format!("{}/freaks", server.uri()),
        exchange_rate_api_key: Some("key".to_string()),
        exchange_rate_base_url: format!("{}/v6", server.uri()),
        nbrb_base_url: format!("{}/nbrb", server.uri()),
        ..Default::default()
    };
    let service = ExchangeRateService::new(&config);

    let first = service.get_rates("USD", &SourceSelector::Auto).await;
    let second = service.get_rates("USD", &SourceSelector::Auto).await;

    assert_eq!(first.source, RateSource::Provider("exchangerate"));
    assert_eq!(second.rate("EUR"), Some(dec!(0.9)));
    assert_eq!(service.provider_health()[0].failure_count, 1);

    service.close();
}

#[tokio::test]
async fn test_service_without_keys_uses_nbrb_then_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nbrb"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let config = RatesConfig {
        nbrb_base_url: format!("{}/nbrb", server.uri()),
        ..Default::default()
    };
    let service = ExchangeRateService::new(&config);

    let snapshot = service.get_rates("USD", &SourceSelector::Auto).await;
    assert_eq!(snapshot.source, RateSource::Fallback);

    let health = service.provider_health();
    assert_eq!(health.len(), 3);
    assert_eq!(health[0].failure_count, 0);
    assert_eq!(health[1].failure_count, 0);
    assert_eq!(health[2].provider, "nbrb");
    assert_eq!(health[2].failure_count, 1);
}
