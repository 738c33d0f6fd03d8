use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while resolving a document and its stylesheet
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to open container {container}: {message}")]
    ContainerOpen { container: String, message: String },

    #[error("Source document not found: {path}")]
    SourceNotFound { path: String },

    #[error("Failed to read source document {path}: {message}")]
    SourceRead { path: String, message: String },

    #[error("Stylesheet not found: {href}")]
    StylesheetNotFound { href: String },

    #[error("Failed to read stylesheet {href}: {message}")]
    StylesheetRead { href: String, message: String },

    #[error("Entry not found: {path}")]
    NotFound { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Transport decoding error: {0}")]
    Transport(#[from] base64::DecodeError),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`ContentError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ContainerOpenFailure,
    SourceNotFound,
    SourceReadFailure,
    StylesheetNotFound,
    StylesheetReadFailure,
    NotFound,
    Io,
    Transport,
    InvalidConfig,
    Serialization,
}

impl ContentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::ContainerOpen { .. } => ErrorKind::ContainerOpenFailure,
            ContentError::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            ContentError::SourceRead { .. } => ErrorKind::SourceReadFailure,
            ContentError::StylesheetNotFound { .. } => ErrorKind::StylesheetNotFound,
            ContentError::StylesheetRead { .. } => ErrorKind::StylesheetReadFailure,
            ContentError::NotFound { .. } => ErrorKind::NotFound,
            ContentError::Io(_) | ContentError::Archive(_) => ErrorKind::Io,
            ContentError::Transport(_) => ErrorKind::Transport,
            ContentError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            ContentError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Whether this error aborts the whole request (no source content returned)
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ContentError::StylesheetNotFound { .. } | ContentError::StylesheetRead { .. }
        )
    }
}

/// Result type alias for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_errors_are_not_fatal() {
        let missing = ContentError::StylesheetNotFound {
            href: "style.xsl".to_string(),
        };
        assert!(!missing.is_fatal());
        assert_eq!(missing.kind(), ErrorKind::StylesheetNotFound);

        let source = ContentError::SourceNotFound {
            path: "doc.xml".to_string(),
        };
        assert!(source.is_fatal());
        assert_eq!(source.to_string(), "Source document not found: doc.xml");
    }

    #[test]
    fn test_io_error_conversion() {
        let err: ContentError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
