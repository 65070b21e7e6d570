use thiserror::Error;

/// Failure retrieving the policy document from its remote source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Network error ({stage}): {details}")]
    Network { stage: NetworkStage, details: String },

    #[error("Metadata request failed with HTTP {status}{body_snippet}")]
    HttpStatus { status: u16, body_snippet: String },

    #[error("Metadata source not configured")]
    NotConfigured,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStage {
    #[error("request")]
    Request,
    #[error("response parse")]
    ResponseParse,
}

impl SourceError {
    pub fn request(details: impl Into<String>) -> Self {
        Self::Network {
            stage: NetworkStage::Request,
            details: details.into(),
        }
    }

    pub fn request_from<E>(error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::request(error.to_string())
    }

    pub fn parse(details: impl Into<String>) -> Self {
        Self::Network {
            stage: NetworkStage::ResponseParse,
            details: details.into(),
        }
    }

    pub fn parse_from<E>(error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::parse(error.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse_from(error)
    }
}

/// Failure reading or writing the key-value cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("IO error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("Cache contents are not valid JSON: {0}")]
    Serialize(String),

    #[error("Cache backend error: {details}")]
    Backend { details: String },
}

impl CacheError {
    pub fn backend(details: impl Into<String>) -> Self {
        Self::Backend {
            details: details.into(),
        }
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheError, NetworkStage, SourceError};

    #[test]
    fn io_error_conversion_maps_to_io_variant() {
        let mapped = CacheError::from(std::io::Error::other("permission denied"));
        assert!(
            matches!(mapped, CacheError::Io { kind, ref message } if kind == std::io::ErrorKind::Other && message.contains("permission denied"))
        );
    }

    #[test]
    fn http_status_display_includes_snippet() {
        let error = SourceError::HttpStatus {
            status: 503,
            body_snippet: ": upstream down".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Metadata request failed with HTTP 503: upstream down"
        );
    }

    #[test]
    fn network_helpers_set_expected_stage() {
        let request = SourceError::request("timed out");
        assert!(matches!(
            request,
            SourceError::Network {
                stage: NetworkStage::Request,
                ..
            }
        ));

        let parse = SourceError::parse("invalid json");
        assert!(matches!(
            parse,
            SourceError::Network {
                stage: NetworkStage::ResponseParse,
                ..
            }
        ));
        assert_eq!(
            parse.to_string(),
            "Network error (response parse): invalid json"
        );
    }

    #[test]
    fn json_errors_are_parse_failures() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            SourceError::from(json_error),
            SourceError::Network {
                stage: NetworkStage::ResponseParse,
                ..
            }
        ));
    }
}
