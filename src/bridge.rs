//! JSON bridge for UI shells.
//!
//! Every function returns one JSON object as a string, using the field
//! names the viewer front end expects. Archive blobs from the UI arrive as
//! standard base64 and are decoded here before reaching the core.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    api,
    error::{ContentError, Result},
    types::{ArchiveListing, DocumentPair},
};

/// Document response as seen by the front end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContentResponse {
    pub xml_content: String,
    pub xsl_content: String,
    pub xml_file: String,
    pub xsl_file: String,
    pub error: String,
}

impl From<DocumentPair> for FileContentResponse {
    fn from(pair: DocumentPair) -> Self {
        Self {
            xml_content: pair.source_content.unwrap_or_default(),
            xsl_content: pair.stylesheet_content.unwrap_or_default(),
            xml_file: pair.source_name.unwrap_or_default(),
            xsl_file: pair.stylesheet_name.unwrap_or_default(),
            error: pair.error.map(|e| e.to_string()).unwrap_or_default(),
        }
    }
}

/// Archive listing response as seen by the front end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipFileListResponse {
    pub xml_files: Vec<String>,
    pub zip_path: String,
    pub error: String,
}

impl From<ArchiveListing> for ZipFileListResponse {
    fn from(listing: ArchiveListing) -> Self {
        Self {
            xml_files: listing.xml_files,
            zip_path: listing.archive_path.unwrap_or_default(),
            error: listing.error.map(|e| e.to_string()).unwrap_or_default(),
        }
    }
}

/// Decode a base64 archive blob sent by the UI
pub fn decode_transport(data: &str) -> Result<Bytes> {
    let raw = STANDARD.decode(data.trim())?;
    Ok(Bytes::from(raw))
}

/// Serialize a response, falling back to an error object
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };

    encoded.unwrap_or_else(|e| {
        let error = ContentError::from(e).to_string();
        serde_json::json!({ "error": error }).to_string()
    })
}

pub async fn load_xml_file(path: &str) -> String {
    let response = FileContentResponse::from(api::resolve_document(path).await);
    to_json(&response, false)
}

pub async fn load_zip_file_list(zip_path: &str) -> String {
    let response = ZipFileListResponse::from(api::list_archive_xml_entries(zip_path).await);
    to_json(&response, false)
}

pub async fn load_file_from_zip(zip_path: &str, file_name: &str) -> String {
    let pair = api::resolve_document_in_archive(zip_path, file_name).await;
    to_json(&FileContentResponse::from(pair), false)
}

pub async fn load_zip_file_list_from_data(base64_data: &str) -> String {
    let listing = match decode_transport(base64_data) {
        Ok(data) => api::list_archive_xml_entries_from_bytes(data).await,
        Err(e) => ArchiveListing::failed(e),
    };
    to_json(&ZipFileListResponse::from(listing), false)
}

pub async fn load_file_from_zip_data(base64_data: &str, file_name: &str) -> String {
    let pair = match decode_transport(base64_data) {
        Ok(data) => api::resolve_document_in_archive_bytes(data, file_name).await,
        Err(e) => DocumentPair::failed(e),
    };
    to_json(&FileContentResponse::from(pair), false)
}
