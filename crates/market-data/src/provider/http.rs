//! HTTP plumbing shared by the live providers.

use std::time::Duration;

use log::debug;
use reqwest::{Client, RequestBuilder};

use crate::errors::{MarketDataError, UpstreamFailure};

/// Build the reqwest client used by a provider.
pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Send `request` and return the body of a successful response.
///
/// Non-2xx answers are classified into an [`UpstreamFailure`]; transport
/// errors become `Timeout` or `ProviderError`.
pub(crate) async fn send(
    provider: &str,
    request: RequestBuilder,
) -> Result<String, MarketDataError> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(provider, "Request failed", e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!("{} answered HTTP {}", provider, status.as_u16());
        return Err(MarketDataError::Upstream {
            provider: provider.to_string(),
            failure: UpstreamFailure::classify(status, &body),
        });
    }

    response
        .text()
        .await
        .map_err(|e| transport_error(provider, "Failed to read response", e))
}

/// The client timeout covers the body too, so reads can time out as well.
fn transport_error(provider: &str, context: &str, error: reqwest::Error) -> MarketDataError {
    if error.is_timeout() {
        MarketDataError::Timeout {
            provider: provider.to_string(),
        }
    } else {
        MarketDataError::provider(provider, format!("{}: {}", context, error))
    }
}

/// Parse a JSON body, mapping failures to a provider error.
pub(crate) fn parse<T: serde::de::DeserializeOwned>(
    provider: &str,
    body: &str,
) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| {
        MarketDataError::provider(provider, format!("Failed to parse response: {}", e))
    })
}

/// Replace every occurrence of `secret` in `text` for logging.
pub(crate) fn mask(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => text.replace(secret, "***"),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_hides_api_key() {
        assert_eq!(
            mask("https://api.example.com/v2/exchanges?access_key=s3cret", Some("s3cret")),
            "https://api.example.com/v2/exchanges?access_key=***"
        );
        assert_eq!(mask("no key here", None), "no key here");
        assert_eq!(mask("empty", Some("")), "empty");
    }

    #[tokio::test]
    async fn test_send_classifies_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/exchanges")
            .with_status(401)
            .with_body(r#"{"error":{"code":"invalid_access_key","message":"bad key"}}"#)
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5));
        let result = send(
            "Marketstack",
            client.get(format!("{}/exchanges", server.url())),
        )
        .await;

        match result {
            Err(MarketDataError::Upstream { provider, failure }) => {
                assert_eq!(provider, "Marketstack");
                assert_eq!(failure, UpstreamFailure::Unauthorized);
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/ok")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5));
        let body = send("Yahoo Finance", client.get(format!("{}/ok", server.url())))
            .await
            .unwrap();
        assert_eq!(body, r#"{"data":[]}"#);
    }

    #[tokio::test]
    async fn test_send_reports_timeout() {
        use std::io::Write;

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/slow")
            .with_status(200)
            .with_chunked_body(|writer| {
                std::thread::sleep(Duration::from_secs(1));
                writer.write_all(br#"{"data":[]}"#)
            })
            .create_async()
            .await;

        let client = build_client(Duration::from_millis(200));
        let result = send("Yahoo Finance", client.get(format!("{}/slow", server.url()))).await;
        assert!(
            matches!(result, Err(MarketDataError::Timeout { ref provider }) if provider == "Yahoo Finance"),
            "expected timeout, got {:?}",
            result
        );
    }
}
