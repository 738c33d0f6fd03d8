use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stylesheet_resolver::bridge::{self, FileContentResponse, ZipFileListResponse};
use stylesheet_resolver::{api, ArchiveListing, ContentError, DocumentPair};

/// Load XML documents together with the XSL stylesheet they reference
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve an XML file on disk and its sibling stylesheet
    Open { path: String },

    /// List the XML documents inside a ZIP archive
    List {
        archive: PathBuf,
        /// ARCHIVE is a text file holding the archive as base64
        #[arg(long)]
        base64: bool,
    },

    /// Resolve an XML document stored inside a ZIP archive
    OpenArchive {
        archive: PathBuf,
        entry: String,
        /// ARCHIVE is a text file holding the archive as base64
        #[arg(long)]
        base64: bool,
    },
}

async fn read_blob(path: &Path) -> stylesheet_resolver::Result<bytes::Bytes> {
    let text = tokio::fs::read_to_string(path).await?;
    bridge::decode_transport(&text)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let (output, failed) = match cli.command {
        Command::Open { path } => document_output(api::resolve_document(&path).await, cli.pretty),
        Command::List { archive, base64 } => {
            let listing = if base64 {
                match read_blob(&archive).await {
                    Ok(data) => api::list_archive_xml_entries_from_bytes(data).await,
                    Err(e) => ArchiveListing::failed(e),
                }
            } else {
                api::list_archive_xml_entries(&archive).await
            };
            let failed = listing.error.as_ref().is_some_and(ContentError::is_fatal);
            (
                bridge::to_json(&ZipFileListResponse::from(listing), cli.pretty),
                failed,
            )
        }
        Command::OpenArchive {
            archive,
            entry,
            base64,
        } => {
            let pair = if base64 {
                match read_blob(&archive).await {
                    Ok(data) => api::resolve_document_in_archive_bytes(data, &entry).await,
                    Err(e) => DocumentPair::failed(e),
                }
            } else {
                api::resolve_document_in_archive(&archive, &entry).await
            };
            document_output(pair, cli.pretty)
        }
    };

    println!("{}", output);
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Only fatal errors fail the process; a missing stylesheet is still output
fn document_output(pair: DocumentPair, pretty: bool) -> (String, bool) {
    let failed = pair.error.as_ref().is_some_and(ContentError::is_fatal);
    (bridge::to_json(&FileContentResponse::from(pair), pretty), failed)
}
