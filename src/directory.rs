use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{
    container::Container,
    error::{ContentError, Result},
    types::ContainerEntry,
};

/// A container backed by the local filesystem
///
/// Entry names are platform paths resolved against `root`. An empty root
/// (the default) leaves names untouched, so absolute paths and paths
/// relative to the working directory both work.
#[derive(Debug, Clone, Default)]
pub struct DirectoryContainer {
    root: PathBuf,
}

impl DirectoryContainer {
    /// Create a new directory container rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn listing_dir(&self) -> &Path {
        if self.root.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.root
        }
    }
}

fn map_io_error(path: &str, e: std::io::Error) -> ContentError {
    if e.kind() == ErrorKind::NotFound {
        ContentError::NotFound {
            path: path.to_string(),
        }
    } else {
        ContentError::Io(e)
    }
}

#[async_trait]
impl Container for DirectoryContainer {
    async fn list(&self) -> Result<Vec<ContainerEntry>> {
        let dir = self.listing_dir();
        let mut read_dir = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| map_io_error(&dir.to_string_lossy(), e))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            entries.push(ContainerEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_directory: metadata.is_dir(),
                size: metadata.len(),
            });
        }

        // read_dir order is unspecified; keep listings stable between calls
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn open(&self, name: &str) -> Result<Bytes> {
        let path = self.resolve_path(name);
        let content = tokio::fs::read(&path)
            .await
            .map_err(|e| map_io_error(name, e))?;
        Ok(Bytes::from(content))
    }

    fn identifier(&self) -> String {
        format!("dir://{}", self.listing_dir().display())
    }

    /// Stylesheets next to a plain file are looked up directly beside it
    async fn locate(&self, source_name: &str, href: &str) -> Result<Option<String>> {
        let sibling = Path::new(source_name)
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(href.trim_start_matches(['/', '\\']));
        let sibling_name = sibling.to_string_lossy().to_string();

        match tokio::fs::metadata(self.resolve_path(&sibling_name)).await {
            Ok(metadata) if metadata.is_dir() => Ok(None),
            Ok(_) => Ok(Some(sibling_name)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Let the read report anything other than absence
            Err(_) => Ok(Some(sibling_name)),
        }
    }
}
