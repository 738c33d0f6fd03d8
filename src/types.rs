use crate::error::{ContentError, ErrorKind};

/// A source document together with the stylesheet it references
///
/// A populated `error` alongside `source_content` means the source loaded
/// but its stylesheet reference could not be satisfied.
#[derive(Debug, Default)]
pub struct DocumentPair {
    /// Text of the source document
    pub source_content: Option<String>,
    /// Base name of the source document, without directory
    pub source_name: Option<String>,
    /// Text of the referenced stylesheet
    pub stylesheet_content: Option<String>,
    /// The reference exactly as written in the source's `href`
    pub stylesheet_name: Option<String>,
    pub error: Option<ContentError>,
}

impl DocumentPair {
    /// A result carrying only a fatal error
    pub fn failed(error: ContentError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Whether the source document was loaded
    pub fn has_source(&self) -> bool {
        self.source_content.is_some()
    }

    /// Whether both documents were loaded
    pub fn is_complete(&self) -> bool {
        self.has_source() && self.stylesheet_content.is_some()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(ContentError::kind)
    }
}

/// An item stored in a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    /// Full name as stored; archives use `/`-delimited paths
    pub name: String,
    pub is_directory: bool,
    /// Uncompressed size in bytes
    pub size: u64,
}

impl ContainerEntry {
    /// The final path component of the entry name
    pub fn base_name(&self) -> &str {
        crate::resolver::base_name(&self.name)
    }
}

/// Result of listing the XML documents in an archive
#[derive(Debug, Default)]
pub struct ArchiveListing {
    /// Entry names in archive storage order
    pub xml_files: Vec<String>,
    /// Path of the archive, when it was opened from disk
    pub archive_path: Option<String>,
    pub error: Option<ContentError>,
}

impl ArchiveListing {
    pub fn failed(error: ContentError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}
