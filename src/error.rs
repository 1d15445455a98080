use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// The error type for every step of the capture-and-match pipeline.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Session {step} failed: {description}")]
    Session {
        step: &'static str,
        description: String,
    },

    #[error("Failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Invalid matcher input: {description}")]
    InvalidInput { description: String },

    #[error("Invalid configuration: {description}")]
    InvalidConfiguration { description: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Background task failed to complete: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl ProbeError {
    pub fn session(step: &'static str, description: impl Into<String>) -> Self {
        ProbeError::Session {
            step,
            description: description.into(),
        }
    }

    pub fn invalid_input(description: impl Into<String>) -> Self {
        ProbeError::InvalidInput {
            description: description.into(),
        }
    }

    pub fn invalid_config(description: impl Into<String>) -> Self {
        ProbeError::InvalidConfiguration {
            description: description.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProbeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Name of the pipeline step this error aborted: one of `session`,
    /// `decode`, `match`, `decision`, `io` or `config`.
    pub fn step(&self) -> &'static str {
        match self {
            ProbeError::Session { .. } => "session",
            ProbeError::Decode { .. } | ProbeError::Join { .. } => "decode",
            ProbeError::InvalidInput { .. } => "match",
            ProbeError::InvalidConfiguration { .. } => "decision",
            ProbeError::Json { .. } => "config",
            ProbeError::Io { .. } => "io",
        }
    }

    /// True for errors caused by the caller's configuration rather than the device
    /// or the files on disk.
    pub fn is_configuration_bug(&self) -> bool {
        matches!(
            self,
            ProbeError::InvalidInput { .. } | ProbeError::InvalidConfiguration { .. }
        )
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(source: reqwest::Error) -> Self {
        let step = if source.is_connect() {
            "connect"
        } else if source.is_decode() {
            "response"
        } else {
            "request"
        };
        ProbeError::session(step, source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names() {
        assert_eq!(ProbeError::session("create", "boom").step(), "session");
        assert_eq!(ProbeError::invalid_input("too big").step(), "match");
        assert_eq!(ProbeError::invalid_config("no mode").step(), "decision");
        let io = ProbeError::io("/tmp/x.png", std::io::Error::other("denied"));
        assert_eq!(io.step(), "io");
        let json: ProbeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(json.step(), "config");
    }

    #[test]
    fn test_messages_carry_context() {
        let err = ProbeError::session("screenshot", "no such session");
        assert_eq!(
            err.to_string(),
            "Session screenshot failed: no such session"
        );

        let err = ProbeError::io("shots/a.png", std::io::Error::other("read-only"));
        assert!(err.to_string().contains("shots/a.png"));
    }

    #[test]
    fn test_configuration_bug_classification() {
        assert!(ProbeError::invalid_input("x").is_configuration_bug());
        assert!(ProbeError::invalid_config("x").is_configuration_bug());
        assert!(!ProbeError::session("create", "x").is_configuration_bug());
    }
}
