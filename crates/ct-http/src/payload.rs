//! Response bodies of the content service

use ct_core::comment::Comment;
use ct_core::service::{ServiceAck, ServiceRequest};
use ct_core::{Result, ThreadError};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Comment list as sent by the post endpoint: either a bare `comments`
/// payload from a partial reload or a full page object carrying props
#[derive(Deserialize)]
#[serde(untagged)]
enum CommentsPayload {
    Partial { comments: Vec<Comment> },
    Page { props: PageProps },
    Bare(Vec<Comment>),
}

#[derive(Deserialize)]
struct PageProps {
    #[serde(default)]
    comments: Vec<Comment>,
}

/// Error body of a non-success response
#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

/// Extract the comment list from a post payload
pub fn parse_comments(bytes: &[u8]) -> Result<Vec<Comment>> {
    let payload: CommentsPayload = serde_json::from_slice(bytes)?;
    Ok(match payload {
        CommentsPayload::Partial { comments } => comments,
        CommentsPayload::Page { props } => props.comments,
        CommentsPayload::Bare(comments) => comments,
    })
}

/// Read the success indicator of a mutation. Bodies that are empty or not
/// JSON (a redirect page, for instance) still count as success.
pub fn parse_ack(bytes: &[u8]) -> ServiceAck {
    serde_json::from_slice(bytes).unwrap_or_default()
}

/// Map a non-success response to an error
pub fn error_from_status(request: &ServiceRequest, status: u16, bytes: &[u8]) -> ThreadError {
    let body: ErrorBody = serde_json::from_slice(bytes).unwrap_or_default();

    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Request failed".to_string());

    let message = match status {
        422 => body.errors.into_values().flatten().next().unwrap_or(message),
        _ => message,
    };
    ThreadError::from_status(request.to_string(), status, message)
}
