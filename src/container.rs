use async_trait::async_trait;
use bytes::Bytes;

use crate::{error::Result, resolver::locate_stylesheet, types::ContainerEntry};

/// Core abstraction for document containers
///
/// Implementors provide read-only access to the entries of a plain
/// directory or an archive. A container is built for one request and
/// dropped afterwards; it owns whatever handle it reads from.
#[async_trait]
pub trait Container: Send + Sync {
    /// List every entry in container-defined order
    async fn list(&self) -> Result<Vec<ContainerEntry>>;

    /// Read a whole entry by its exact name
    ///
    /// Returns `ContentError::NotFound` if the entry doesn't exist
    async fn open(&self, name: &str) -> Result<Bytes>;

    /// Get a human-readable identifier for this container (for logging/debugging)
    fn identifier(&self) -> String;

    /// Find the entry a stylesheet reference made from `source_name` points at
    ///
    /// Default implementation matches `href` against `list()` with the
    /// sibling, full-name and base-name rules, in that order.
    async fn locate(&self, source_name: &str, href: &str) -> Result<Option<String>> {
        let entries = self.list().await?;
        Ok(locate_stylesheet(&entries, source_name, href).map(|entry| entry.name.clone()))
    }
}
