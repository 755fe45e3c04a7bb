//! Error types for the Clockify server.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the Clockify API.
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Clockify answered with a non-success status.
    #[error("Clockify API error: {status}{}{}", status_text_suffix(.status_text), body_suffix(.body))]
    Upstream {
        status: u16,
        status_text: String,
        body: Option<String>,
    },

    /// A success response carried JSON that could not be decoded.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The HTTP exchange itself failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn status_text_suffix(status_text: &str) -> String {
    if status_text.is_empty() {
        String::new()
    } else {
        format!(" {status_text}")
    }
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) if !body.is_empty() => format!(" - {body}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    #[test]
    fn upstream_message_includes_body() {
        let err = Error::Upstream {
            status: 401,
            status_text: "Unauthorized".into(),
            body: Some("invalid key".into()),
        };
        assert_eq!(
            err.to_string(),
            "Clockify API error: 401 Unauthorized - invalid key"
        );
    }

    #[test]
    fn upstream_message_without_body() {
        let err = Error::Upstream {
            status: 404,
            status_text: "Not Found".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "Clockify API error: 404 Not Found");
    }

    #[test]
    fn upstream_message_without_status_text() {
        let err = Error::Upstream {
            status: 599,
            status_text: String::new(),
            body: Some("gateway gone".into()),
        };
        assert_eq!(err.to_string(), "Clockify API error: 599 - gateway gone");
    }
}
