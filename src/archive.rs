use async_trait::async_trait;
use bytes::Bytes;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinError;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::{
    container::Container,
    error::{ContentError, Result},
    types::ContainerEntry,
};

/// Upper bound on buffer space reserved from an entry's declared size
const MAX_PREALLOC: u64 = 64 * 1024;

/// A container backed by a ZIP archive
///
/// The archive reader is owned exclusively by the container and released
/// when the container is dropped. Reads and decompression run on the
/// blocking pool, one at a time, because reading an entry needs the
/// reader mutably.
pub struct ArchiveContainer<R> {
    archive: Arc<Mutex<ZipArchive<R>>>,
    label: String,
}

impl ArchiveContainer<File> {
    /// Open an archive file from disk
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ContentError::ContainerOpen {
                container: label.clone(),
                message: e.to_string(),
            })?
            .into_std()
            .await;

        tokio::task::spawn_blocking(move || Self::from_reader(file, label))
            .await
            .map_err(join_error)?
    }
}

impl ArchiveContainer<Cursor<Bytes>> {
    /// Read an archive already held in memory
    pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let label = format!("<memory:{} bytes>", data.len());
        Self::from_reader(Cursor::new(data), label)
    }
}

impl<R: Read + Seek> ArchiveContainer<R> {
    /// Wrap any seekable reader holding ZIP data
    pub fn from_reader(reader: R, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let archive = ZipArchive::new(reader).map_err(|e| ContentError::ContainerOpen {
            container: label.clone(),
            message: e.to_string(),
        })?;

        log::debug!("opened archive {} ({} entries)", label, archive.len());

        Ok(Self {
            archive: Arc::new(Mutex::new(archive)),
            label,
        })
    }
}

fn join_error(e: JoinError) -> ContentError {
    ContentError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

fn read_entries<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<ContainerEntry>> {
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        entries.push(ContainerEntry {
            name: file.name().to_string(),
            is_directory: file.is_dir(),
            size: file.size(),
        });
    }
    Ok(entries)
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Bytes> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(ContentError::NotFound {
                path: name.to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    // The declared size comes from the archive and is not trusted
    let mut content = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
    file.read_to_end(&mut content)?;
    Ok(Bytes::from(content))
}

#[async_trait]
impl<R: Read + Seek + Send + 'static> Container for ArchiveContainer<R> {
    async fn list(&self) -> Result<Vec<ContainerEntry>> {
        let archive = Arc::clone(&self.archive);
        tokio::task::spawn_blocking(move || read_entries(&mut archive.blocking_lock()))
            .await
            .map_err(join_error)?
    }

    async fn open(&self, name: &str) -> Result<Bytes> {
        let archive = Arc::clone(&self.archive);
        let name = name.to_string();
        tokio::task::spawn_blocking(move || read_entry(&mut archive.blocking_lock(), &name))
            .await
            .map_err(join_error)?
    }

    fn identifier(&self) -> String {
        format!("zip://{}", self.label)
    }
}
