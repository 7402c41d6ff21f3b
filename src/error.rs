use std::fmt;

#[derive(Debug)]
pub enum ImageGenError {
    ConfigError(String),
    InvalidArgument(String),
    RequestError(String),
    TransportError {
        status: Option<u16>,
        message: String,
    },
    ResponseError(String),
    SerializationError(String),
    ImageError(String),
    SolitaireError {
        step: usize,
        source: Box<ImageGenError>,
    },
}

impl ImageGenError {
    /// Transport failures are the only transient class; everything else is
    /// surfaced without retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, ImageGenError::TransportError { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ImageGenError::TransportError { status, .. } => *status,
            ImageGenError::SolitaireError { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl fmt::Display for ImageGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageGenError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ImageGenError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ImageGenError::RequestError(msg) => write!(f, "Request error: {}", msg),
            ImageGenError::TransportError { status, message } => match status {
                Some(code) => write!(f, "Transport error (HTTP {}): {}", code, message),
                None => write!(f, "Transport error: {}", message),
            },
            ImageGenError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            ImageGenError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            ImageGenError::ImageError(msg) => write!(f, "Image error: {}", msg),
            ImageGenError::SolitaireError { step, source } => {
                write!(f, "Solitaire chain failed at step {}: {}", step + 1, source)
            }
        }
    }
}

impl std::error::Error for ImageGenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageGenError::SolitaireError { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImageGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let transport = ImageGenError::TransportError {
            status: Some(503),
            message: "service unavailable".into(),
        };
        assert!(transport.is_transient());
        assert_eq!(transport.status(), Some(503));

        let invalid = ImageGenError::InvalidArgument("step must be between 1 and 7".into());
        assert!(!invalid.is_transient());
        assert_eq!(invalid.status(), None);
    }

    #[test]
    fn test_solitaire_error_context() {
        let err = ImageGenError::SolitaireError {
            step: 2,
            source: Box::new(ImageGenError::TransportError {
                status: Some(500),
                message: "boom".into(),
            }),
        };
        assert_eq!(err.status(), Some(500));
        let rendered = err.to_string();
        assert!(rendered.contains("step 3"));
        assert!(rendered.contains("HTTP 500"));
    }
}
