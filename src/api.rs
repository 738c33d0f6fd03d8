//! Request-level operations for hosts.
//!
//! Each call builds its own container, resolves, and drops the container
//! before returning. Nothing here returns `Err`; failures are carried in
//! the returned value.

use bytes::Bytes;
use std::path::Path;

use crate::{
    archive::ArchiveContainer,
    container::Container,
    directory::DirectoryContainer,
    error::ContentError,
    resolver::DocumentResolver,
    types::{ArchiveListing, DocumentPair},
};

fn require_name(value: &str, what: &str) -> Result<(), ContentError> {
    if value.is_empty() {
        return Err(ContentError::InvalidConfig {
            message: format!("{} must not be empty", what),
        });
    }
    Ok(())
}

/// Resolve a document on the local filesystem
pub async fn resolve_document(path: &str) -> DocumentPair {
    if let Err(e) = require_name(path, "document path") {
        return DocumentPair::failed(e);
    }

    let container = DirectoryContainer::default();
    DocumentResolver::new(&container).resolve(path).await
}

/// List the XML documents inside an archive file
pub async fn list_archive_xml_entries(path: impl AsRef<Path>) -> ArchiveListing {
    let path = path.as_ref();
    let mut listing = match ArchiveContainer::open_file(path).await {
        Ok(container) => list_xml(&container).await,
        Err(e) => ArchiveListing::failed(e),
    };
    if listing.error.is_none() {
        listing.archive_path = Some(path.display().to_string());
    }
    listing
}

/// List the XML documents inside an in-memory archive
pub async fn list_archive_xml_entries_from_bytes(data: impl Into<Bytes>) -> ArchiveListing {
    match ArchiveContainer::from_bytes(data) {
        Ok(container) => list_xml(&container).await,
        Err(e) => ArchiveListing::failed(e),
    }
}

/// Resolve a document stored in an archive file
pub async fn resolve_document_in_archive(path: impl AsRef<Path>, entry_name: &str) -> DocumentPair {
    if let Err(e) = require_name(entry_name, "entry name") {
        return DocumentPair::failed(e);
    }

    match ArchiveContainer::open_file(path).await {
        Ok(container) => DocumentResolver::new(&container).resolve(entry_name).await,
        Err(e) => DocumentPair::failed(e),
    }
}

/// Resolve a document stored in an in-memory archive
pub async fn resolve_document_in_archive_bytes(
    data: impl Into<Bytes>,
    entry_name: &str,
) -> DocumentPair {
    if let Err(e) = require_name(entry_name, "entry name") {
        return DocumentPair::failed(e);
    }

    match ArchiveContainer::from_bytes(data) {
        Ok(container) => DocumentResolver::new(&container).resolve(entry_name).await,
        Err(e) => DocumentPair::failed(e),
    }
}

async fn list_xml(container: &dyn Container) -> ArchiveListing {
    match DocumentResolver::new(container).list_xml_entries().await {
        Ok(xml_files) => ArchiveListing {
            xml_files,
            ..ArchiveListing::default()
        },
        Err(e) => {
            log::warn!("failed to list {}: {}", container.identifier(), e);
            ArchiveListing::failed(e)
        }
    }
}
