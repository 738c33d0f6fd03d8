pub mod api;
pub mod archive;
pub mod bridge;
pub mod container;
pub mod directory;
pub mod error;
pub mod extract;
pub mod resolver;
pub mod types;

pub use api::{
    list_archive_xml_entries, list_archive_xml_entries_from_bytes, resolve_document,
    resolve_document_in_archive, resolve_document_in_archive_bytes,
};
pub use archive::ArchiveContainer;
pub use container::Container;
pub use directory::DirectoryContainer;
pub use error::{ContentError, ErrorKind, Result};
pub use extract::extract_stylesheet_href;
pub use resolver::{locate_stylesheet, DocumentResolver};
pub use types::{ArchiveListing, ContainerEntry, DocumentPair};
