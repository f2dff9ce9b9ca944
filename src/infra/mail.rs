// HTTP mail relay client.

use crate::domain::notification::{EmailMessage, Mailer};
use crate::error::VerificationError;
use crate::infra::config;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Posts `{from, to, subject, html}` as JSON to a relay endpoint.
#[derive(Debug, Clone)]
pub struct HttpMailRelay {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpMailRelay {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            token,
            client,
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(config::mail_relay_url()?, config::mail_relay_token())
    }
}

#[async_trait]
impl Mailer for HttpMailRelay {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let mut request = self.client.post(&self.endpoint).json(message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| VerificationError::external("mail relay", e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VerificationError::external(
                "mail relay",
                format!("HTTP {}: {}", status, body.trim()),
            )
            .into());
        }
        debug!(to = %message.to, "mail relay accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(Option<String>, EmailMessage)>>>;

    async fn relay(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Json(msg): Json<EmailMessage>,
    ) -> StatusCode {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let reject = msg.to.ends_with("@bounce.test");
        seen.lock().unwrap().push((auth, msg));
        if reject {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::ACCEPTED
        }
    }

    async fn spawn_relay() -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().route("/send", post(relay)).with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/send", addr), seen)
    }

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            from: "noreply@example.test".to_string(),
            to: to.to_string(),
            subject: "hello".to_string(),
            html: "<p>hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn posts_json_with_bearer_token() {
        let (url, seen) = spawn_relay().await;
        let relay = HttpMailRelay::new(url, Some("secret".to_string())).unwrap();
        relay.send(&message("ann@example.test")).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("Bearer secret"));
        assert_eq!(seen[0].1, message("ann@example.test"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_external_call_error() {
        let (url, _seen) = spawn_relay().await;
        let relay = HttpMailRelay::new(url, None).unwrap();
        let err = relay.send(&message("x@bounce.test")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VerificationError>(),
            Some(VerificationError::ExternalCall { .. })
        ));
    }
}
