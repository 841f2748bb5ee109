use std::fmt;

use async_trait::async_trait;
use helpdesk_core::CoreError;

/// Raw file contents handed back to the host for rendering or saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Bulk-read seam. The snapshot loader talks to the backend through
/// this trait so tests can serve canned payloads without a server.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, CoreError>;
    async fn get_bytes(&self, url: &str) -> Result<FileDownload, CoreError>;
}

#[derive(Clone)]
pub struct ReqwestHttpTransport {
    token: String,
    client: reqwest::Client,
}

impl fmt::Debug for ReqwestHttpTransport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ReqwestHttpTransport")
            .field("token", &"<redacted>")
            .field("client", &self.client)
            .finish()
    }
}

impl ReqwestHttpTransport {
    pub fn new(token: impl Into<String>) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .user_agent("helpdesk/api")
            .build()
            .map_err(|err| {
                CoreError::Transport(format!("failed to initialize http client: {err}"))
            })?;

        Ok(Self {
            token: token.into(),
            client,
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, CoreError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|err| CoreError::Transport(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Transport(format!(
                "{url} returned http {status}: {}",
                truncate_for_error(&body)
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, CoreError> {
        let body = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|err| CoreError::Transport(format!("failed to read {url}: {err}")))?;

        serde_json::from_str(&body)
            .map_err(|err| CoreError::Decode(format!("{url} returned invalid json: {err}")))
    }

    async fn get_bytes(&self, url: &str) -> Result<FileDownload, CoreError> {
        let response = self.get(url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| CoreError::Transport(format!("failed to read {url}: {err}")))?;

        Ok(FileDownload {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

fn truncate_for_error(body: &str) -> String {
    const MAX_LEN: usize = 200;
    if body.chars().count() <= MAX_LEN {
        body.to_owned()
    } else {
        format!("{}...", body.chars().take(MAX_LEN).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_json_sends_bearer_token_and_parses_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/users/")
            .match_header("authorization", "Bearer seekrit")
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1}]"#)
            .create_async()
            .await;

        let transport = ReqwestHttpTransport::new("seekrit").expect("client should build");
        let value = transport
            .get_json(&format!("{}/users/", server.url()))
            .await
            .expect("request should succeed");

        mock.assert_async().await;
        assert_eq!(value, serde_json::json!([{"id": 1}]));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tickets/")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let transport = ReqwestHttpTransport::new("seekrit").expect("client should build");
        let err = transport
            .get_json(&format!("{}/tickets/", server.url()))
            .await
            .expect_err("503 should fail");

        match err {
            CoreError::Transport(message) => {
                assert!(message.contains("503"), "unexpected message: {message}")
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_maps_to_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admins/")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let transport = ReqwestHttpTransport::new("seekrit").expect("client should build");
        let err = transport
            .get_json(&format!("{}/admins/", server.url()))
            .await
            .expect_err("html body should fail to parse");

        assert!(matches!(err, CoreError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn get_bytes_carries_content_type() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/file/abc-123")
            .with_header("content-type", "image/png")
            .with_body([0x89u8, 0x50, 0x4e, 0x47].as_slice())
            .create_async()
            .await;

        let transport = ReqwestHttpTransport::new("seekrit").expect("client should build");
        let download = transport
            .get_bytes(&format!("{}/file/abc-123", server.url()))
            .await
            .expect("download should succeed");

        assert_eq!(download.content_type, "image/png");
        assert_eq!(download.bytes, vec![0x89, 0x50, 0x4e, 0x47]);
    }
}
