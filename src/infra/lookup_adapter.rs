use async_trait::async_trait;
use reqwest::Url;
use std::time::Instant;
use tracing::debug;

use crate::app::ports::{AddressLookupPort, HttpClientPort};
use crate::common::constants::{LOOKUP_API_VERSION, LOOKUP_COUNTRY};
use crate::common::error::{LookupFailure, Result, ValidatorError};
use crate::common::types::NormalizedQuery;
use crate::observability::metrics;
use crate::pipeline::row_validator::parse_lookup_payload;

/// getAddress.io client: `GET {base}/v2/uk/{postcode}/{house_number}?api-key={key}`
pub struct GetAddressClient {
    http: Box<dyn HttpClientPort>,
    base_url: Url,
    api_key: String,
}

impl GetAddressClient {
    pub fn new(
        http: Box<dyn HttpClientPort>,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ValidatorError::Config(format!("Invalid lookup base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ValidatorError::Config(format!(
                "Lookup base URL '{}' cannot have a path",
                base_url
            )));
        }
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Path segments are percent-encoded, so a stray `/` or `?` in a cell cannot change the route.
    ///
    /// URL parsing drops `.` and `..` segments (encoded or not), which would silently route the
    /// request to a different endpoint; such queries are rejected instead.
    pub fn lookup_url(&self, query: &NormalizedQuery) -> std::result::Result<Url, LookupFailure> {
        for segment in [&query.postcode, &query.house_number] {
            if matches!(segment.as_str(), "." | "..") {
                return Err(LookupFailure::UnroutableQuery(segment.clone()));
            }
        }

        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                LOOKUP_API_VERSION,
                LOOKUP_COUNTRY,
                query.postcode.as_str(),
                query.house_number.as_str(),
            ]);
        }
        url.query_pairs_mut().append_pair("api-key", &self.api_key);
        Ok(url)
    }
}

fn failure_kind(failure: &LookupFailure) -> &'static str {
    match failure {
        LookupFailure::Transport(_) => "transport",
        LookupFailure::Status(_) => "status",
        LookupFailure::Payload(_) => "payload",
        LookupFailure::NoAddresses => "no_addresses",
        LookupFailure::UnroutableQuery(_) => "unroutable",
    }
}

#[async_trait]
impl AddressLookupPort for GetAddressClient {
    async fn lookup(&self, query: &NormalizedQuery) -> std::result::Result<String, LookupFailure> {
        let started = Instant::now();

        let outcome = match self.lookup_url(query) {
            Err(failure) => Err(failure),
            Ok(url) => match self.http.get(url.as_str()).await {
                Err(e) => Err(LookupFailure::Transport(e)),
                Ok(resp) if !resp.is_success() => Err(LookupFailure::Status(resp.status)),
                Ok(resp) => parse_lookup_payload(&resp.bytes),
            },
        };

        metrics::lookup::request_duration(started.elapsed().as_secs_f64());
        match &outcome {
            Ok(_) => metrics::lookup::request_success(),
            Err(failure) => {
                debug!(postcode = %query.postcode, error = %failure, "Lookup returned no data");
                metrics::lookup::request_error(failure_kind(failure));
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::HttpGetResult;
    use std::sync::Arc;

    struct MockHttp {
        response: std::result::Result<HttpGetResult, String>,
        urls: Arc<tokio::sync::Mutex<Vec<String>>>,
    }

    impl MockHttp {
        fn respond(status: u16, body: &str) -> Self {
            Self {
                response: Ok(HttpGetResult {
                    status,
                    bytes: body.as_bytes().to_vec(),
                }),
                urls: Arc::new(tokio::sync::Mutex::new(Vec::new())),
            }
        }

        fn fail(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                urls: Arc::new(tokio::sync::Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl HttpClientPort for MockHttp {
        async fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String> {
            self.urls.lock().await.push(url.to_string());
            self.response.clone()
        }
    }

    fn query(house_number: &str, postcode: &str) -> NormalizedQuery {
        NormalizedQuery {
            house_number: house_number.to_string(),
            postcode: postcode.to_string(),
        }
    }

    fn client(http: MockHttp) -> GetAddressClient {
        GetAddressClient::new(Box::new(http), "https://api.getaddress.io", "secret").unwrap()
    }

    #[test]
    fn test_lookup_url() {
        let c = client(MockHttp::fail("unused"));
        assert_eq!(
            c.lookup_url(&query("10", "SW1A2AA")).unwrap().as_str(),
            "https://api.getaddress.io/v2/uk/SW1A2AA/10?api-key=secret"
        );
        assert_eq!(
            c.lookup_url(&query("1/2", "SW1A2AA")).unwrap().as_str(),
            "https://api.getaddress.io/v2/uk/SW1A2AA/1%2F2?api-key=secret"
        );
    }

    #[test]
    fn test_dot_segments_are_not_sent() {
        let c = client(MockHttp::fail("unused"));
        for (house_number, postcode) in [(".", "SW1A1AA"), ("..", "SW1A1AA"), ("10", "..")] {
            assert!(matches!(
                c.lookup_url(&query(house_number, postcode)),
                Err(LookupFailure::UnroutableQuery(_))
            ));
        }
        // Dots inside a longer segment are ordinary text
        assert_eq!(
            c.lookup_url(&query("10.", "SW1A1AA")).unwrap().as_str(),
            "https://api.getaddress.io/v2/uk/SW1A1AA/10.?api-key=secret"
        );
    }

    #[tokio::test]
    async fn test_dot_house_number_fails_without_request() {
        let http = MockHttp::respond(200, r#"{"Addresses": ["1, Postcode Only Road, SW1A 1AA"]}"#);
        let urls = http.urls.clone();

        let result = client(http).lookup(&query(".", "SW1A1AA")).await;

        assert_eq!(result, Err(LookupFailure::UnroutableQuery(".".to_string())));
        assert!(urls.lock().await.is_empty());
    }

    #[test]
    fn test_lookup_url_with_base_path() {
        let http = Box::new(MockHttp::fail("unused"));
        let c = GetAddressClient::new(http, "http://localhost:8080/proxy/", "k").unwrap();
        assert_eq!(
            c.lookup_url(&query("10", "SW1A2AA")).unwrap().as_str(),
            "http://localhost:8080/proxy/v2/uk/SW1A2AA/10?api-key=k"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = GetAddressClient::new(Box::new(MockHttp::fail("unused")), "not a url", "k");
        assert!(matches!(result, Err(ValidatorError::Config(_))));
    }

    #[tokio::test]
    async fn test_lookup_formats_first_address() {
        let http = MockHttp::respond(
            200,
            r#"{"Addresses": ["10, Downing Street, London, SW1A 1AA"]}"#,
        );
        let urls = http.urls.clone();

        let result = client(http).lookup(&query("10", "SW1A1AA")).await;

        assert_eq!(result.unwrap(), "10\nDowning Street\nLondon\nSW1A 1AA");
        assert_eq!(urls.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failures() {
        let result = client(MockHttp::respond(200, r#"{"Addresses": []}"#))
            .lookup(&query("10", "SW1A1AA"))
            .await;
        assert_eq!(result, Err(LookupFailure::NoAddresses));

        let result = client(MockHttp::respond(404, r#"{"Message": "Not found"}"#))
            .lookup(&query("10", "ZZ99ZZ"))
            .await;
        assert_eq!(result, Err(LookupFailure::Status(404)));

        let result = client(MockHttp::fail("connection refused"))
            .lookup(&query("10", "SW1A1AA"))
            .await;
        assert_eq!(result, Err(LookupFailure::Transport("connection refused".into())));
    }
}
