//! HTTP client for the application submission service
//!
//! Posts the finished application as JSON and expects `{ "id": "..." }` back.

use super::{Application, SubmissionReceipt, SubmissionService};
use crate::error::SubmissionError;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Default submission endpoint
pub const DEFAULT_SUBMISSION_URL: &str = "http://127.0.0.1:8080/applications";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ReceiptBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: Option<String>,
}

/// Client for the submission service
#[derive(Debug, Clone)]
pub struct HttpSubmissionClient {
    http: reqwest::Client,
    url: String,
}

impl HttpSubmissionClient {
    /// Create a client posting to `url`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Create a client over a preconfigured `reqwest::Client`
    pub fn with_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SubmissionService for HttpSubmissionClient {
    async fn submit(
        &self,
        application: &Application,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let response = self
            .http
            .post(&self.url)
            .json(application)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(SubmissionError::Rejected(message));
        }
        if !status.is_success() {
            return Err(SubmissionError::Other(format!("HTTP {status}")));
        }

        let body: ReceiptBody = response
            .json()
            .await
            .map_err(|e| SubmissionError::Other(format!("unreadable response: {e}")))?;
        if body.id.trim().is_empty() {
            return Err(SubmissionError::Other(
                "response did not include an application id".to_string(),
            ));
        }
        Ok(SubmissionReceipt { id: body.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PlanVariantKind;
    use crate::state::{AnswerSet, ConsentAnswers, PlanPayload, StepPayload};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn application() -> Application {
        let answers = AnswerSet::default()
            .with_step(StepPayload::Basics(Default::default()))
            .with_step(StepPayload::SiteDetails(Default::default()))
            .with_step(StepPayload::Plan(PlanPayload::empty(
                PlanVariantKind::Unsupported,
            )))
            .with_step(StepPayload::Monitoring(Default::default()))
            .with_consent(ConsentAnswers::accepted());
        Application::from_answers(&answers).unwrap()
    }

    /// Serve one request with a canned response, returning the endpoint URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/applications")
    }

    /// Read headers and the full body so the client never sees a reset
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    return;
                }
            }
        }
    }

    fn client(url: String) -> HttpSubmissionClient {
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpSubmissionClient::with_client(http, url)
    }

    #[tokio::test]
    async fn test_success_returns_receipt() {
        let url = serve_once("201 Created", r#"{"id":"APP-0042"}"#).await;
        let receipt = client(url).submit(&application()).await.unwrap();
        assert_eq!(receipt.id, "APP-0042");
    }

    #[tokio::test]
    async fn test_unprocessable_is_rejected_with_message() {
        let url = serve_once(
            "422 Unprocessable Entity",
            r#"{"message":"acreage exceeds program limit"}"#,
        )
        .await;
        let err = client(url).submit(&application()).await.unwrap_err();
        assert_eq!(
            err,
            SubmissionError::Rejected("acreage exceeds program limit".to_string())
        );
    }

    #[tokio::test]
    async fn test_server_error_is_other() {
        let url = serve_once("503 Service Unavailable", "{}").await;
        let err = client(url).submit(&application()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Other(_)));
    }

    #[tokio::test]
    async fn test_missing_id_is_other() {
        let url = serve_once("200 OK", r#"{"id":"  "}"#).await;
        let err = client(url).submit(&application()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Other(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // Bind then drop to get a local port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{addr}/applications"))
            .submit(&application())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Transport(_)));
    }
}
