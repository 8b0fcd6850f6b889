//! HTTP implementation of the comment service

use crate::payload::{error_from_status, parse_ack, parse_comments};
use async_trait::async_trait;
use ct_core::comment::{Comment, ModerationAction, NewComment};
use ct_core::config::ServiceConfig;
use ct_core::service::{CommentService, ServiceAck, ServiceRequest};
use ct_core::types::{CommentId, PostId};
use ct_core::{Result, ThreadError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Comment service reached over HTTP
#[derive(Clone)]
pub struct HttpCommentService {
    client: Client,
    base_url: Arc<Url>,
    token: Option<String>,
}

impl HttpCommentService {
    /// Client for `base_url` with the given request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ThreadError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: Arc::new(parse_base_url(base_url)?),
            token: None,
        })
    }

    /// Client configured from the `[service]` section
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        Ok(match &config.token {
            Some(token) => service.with_token(token.clone()),
            None => service,
        })
    }

    /// Send a bearer token with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of a request's endpoint
    pub fn endpoint(&self, request: &ServiceRequest) -> Result<Url> {
        self.base_url
            .join(&request.path())
            .map_err(|e| ThreadError::Config(format!("Invalid endpoint {}: {}", request, e)))
    }

    fn build(&self, request: &ServiceRequest) -> Result<RequestBuilder> {
        let method = Method::from_bytes(request.method().as_bytes())
            .map_err(|e| ThreadError::Transport(e.to_string()))?;
        let mut builder = self.client.request(method, self.endpoint(request)?);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        builder = match request {
            // partial reload: only the comments prop is wanted
            ServiceRequest::List { .. } => builder
                .header("X-Inertia", "true")
                .header("X-Inertia-Partial-Data", "comments"),
            ServiceRequest::Create { comment, .. } => builder.json(comment),
            _ => builder,
        };

        Ok(builder)
    }

    /// Send a request and return the body of a success response
    async fn send(&self, request: ServiceRequest) -> Result<Vec<u8>> {
        debug!("{}", request);

        let response = self
            .build(&request)?
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        if status.is_success() {
            debug!("{} -> {}", request, status);
            Ok(body)
        } else {
            warn!("{} -> {}", request, status);
            Err(error_from_status(&request, status.as_u16(), &body))
        }
    }
}

/// Joining onto a base without a trailing slash would drop its last segment
fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized)
        .map_err(|e| ThreadError::Config(format!("Invalid base URL '{}': {}", raw, e)))
}

fn transport_error(err: reqwest::Error) -> ThreadError {
    if err.is_timeout() {
        ThreadError::Transport(format!("request timed out: {}", err))
    } else {
        ThreadError::Transport(err.to_string())
    }
}

#[async_trait]
impl CommentService for HttpCommentService {
    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let body = self.send(ServiceRequest::List { post_id }).await?;
        parse_comments(&body)
            .map_err(|e| e.with_context(format!("Reading comments of post {}", post_id)))
    }

    async fn create_comment(&self, post_id: PostId, comment: &NewComment) -> Result<ServiceAck> {
        let body = self
            .send(ServiceRequest::Create {
                post_id,
                comment: comment.clone(),
            })
            .await?;
        Ok(parse_ack(&body))
    }

    async fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<ServiceAck> {
        let body = self
            .send(ServiceRequest::Delete {
                post_id,
                comment_id,
            })
            .await?;
        Ok(parse_ack(&body))
    }

    async fn moderate_comment(
        &self,
        comment_id: CommentId,
        action: ModerationAction,
    ) -> Result<ServiceAck> {
        let body = self
            .send(ServiceRequest::Moderate { comment_id, action })
            .await?;
        Ok(parse_ack(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn service(base: &str) -> HttpCommentService {
        HttpCommentService::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let service = service("https://blog.example.com/api");
        let url = service
            .endpoint(&ServiceRequest::Delete {
                post_id: PostId(3),
                comment_id: CommentId(9),
            })
            .unwrap();
        assert_eq!(url.as_str(), "https://blog.example.com/api/posts/3/comments/9");
    }

    #[test]
    fn test_moderation_endpoint() {
        let service = service("http://localhost:8000/");
        let url = service
            .endpoint(&ServiceRequest::Moderate {
                comment_id: CommentId(7),
                action: ModerationAction::Reject,
            })
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/admin/comments/7/reject");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpCommentService::new("not a url", Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, ThreadError::Config(_)));
    }

    #[test]
    fn test_list_request_headers() {
        let service = service("http://localhost:8000").with_token("secret");
        let request = service
            .build(&ServiceRequest::List { post_id: PostId(1) })
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.headers()["X-Inertia"], "true");
        assert_eq!(request.headers()["X-Inertia-Partial-Data"], "comments");
        assert_eq!(request.headers()["Authorization"], "Bearer secret");
    }

    #[test]
    fn test_create_request_body() {
        let service = service("http://localhost:8000");
        let request = service
            .build(&ServiceRequest::Create {
                post_id: PostId(1),
                comment: NewComment::top_level("Great post!"),
            })
            .unwrap()
            .build()
            .unwrap();

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "comment": "Great post!", "parent_id": null })
        );
        assert_eq!(request.method(), &Method::POST);
    }

    #[test]
    fn test_from_config_uses_token() {
        let config = ServiceConfig {
            token: Some("abc".to_string()),
            ..ServiceConfig::default()
        };
        let service = HttpCommentService::from_config(&config).unwrap();
        assert_eq!(service.token.as_deref(), Some("abc"));
        assert_eq!(service.base_url().as_str(), "http://localhost:8000/");
    }
}
