use bytes::Bytes;

use crate::{
    container::Container,
    error::{ContentError, Result},
    extract::extract_stylesheet_href,
    types::{ContainerEntry, DocumentPair},
};

const SEPARATORS: &[char] = &['/', '\\'];

/// The final component of a `/` or `\` delimited name
pub fn base_name(name: &str) -> &str {
    let trimmed = name.trim_end_matches(SEPARATORS);
    match trimmed.rfind(SEPARATORS) {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// The directory part of `source_name`, without trailing separators
///
/// Empty when the name has no directory component.
pub fn stylesheet_context(source_name: &str) -> &str {
    match source_name.rfind(SEPARATORS) {
        Some(index) => source_name[..index].trim_end_matches(SEPARATORS),
        None => "",
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Pick the entry a stylesheet reference points at
///
/// Rules are tried in order over all file entries:
/// 1. the sibling of the source (`context/href`)
/// 2. `href` as a full entry name
/// 3. any entry whose base name equals `href`; first listed wins
///
/// All comparisons ignore case.
pub fn locate_stylesheet<'a>(
    entries: &'a [ContainerEntry],
    source_name: &str,
    href: &str,
) -> Option<&'a ContainerEntry> {
    let context = stylesheet_context(source_name);
    let sibling = if context.is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", context, href)
    };

    let files = || entries.iter().filter(|entry| !entry.is_directory);

    if let Some(entry) = files().find(|entry| eq_ignore_case(&entry.name, &sibling)) {
        log::debug!("stylesheet {} matched sibling entry {}", href, entry.name);
        return Some(entry);
    }

    if let Some(entry) = files().find(|entry| eq_ignore_case(&entry.name, href)) {
        log::debug!("stylesheet {} matched full entry name {}", href, entry.name);
        return Some(entry);
    }

    let entry = files().find(|entry| eq_ignore_case(entry.base_name(), href))?;
    log::info!(
        "stylesheet {} resolved by base name to {} (directory structure not preserved)",
        href,
        entry.name
    );
    Some(entry)
}

fn decode_text(content: Bytes) -> std::result::Result<String, String> {
    String::from_utf8(content.to_vec()).map_err(|e| e.to_string())
}

/// Loads a source document and the stylesheet it references from one container
///
/// The resolver holds no state besides the borrowed container; build a
/// fresh one per request.
pub struct DocumentResolver<'a> {
    container: &'a dyn Container,
}

impl<'a> DocumentResolver<'a> {
    pub fn new(container: &'a dyn Container) -> Self {
        Self { container }
    }

    /// Load `source_name` and, if it references one, its stylesheet
    ///
    /// Never fails outright: fatal problems come back as a pair with only
    /// `error` set, stylesheet problems as a pair with source content and
    /// `error` set.
    pub async fn resolve(&self, source_name: &str) -> DocumentPair {
        let source_content = match self.load_source(source_name).await {
            Ok(content) => content,
            Err(error) => {
                log::warn!(
                    "failed to load {} from {}: {}",
                    source_name,
                    self.container.identifier(),
                    error
                );
                return DocumentPair::failed(error);
            }
        };

        let mut pair = DocumentPair {
            source_name: Some(base_name(source_name).to_string()),
            ..DocumentPair::default()
        };

        let href = extract_stylesheet_href(&source_content)
            .filter(|href| !href.is_empty())
            .map(str::to_string);
        pair.source_content = Some(source_content);

        let Some(href) = href else {
            log::debug!("{} references no stylesheet", source_name);
            return pair;
        };

        match self.load_stylesheet(source_name, &href).await {
            Ok(content) => {
                pair.stylesheet_content = Some(content);
                pair.stylesheet_name = Some(href);
            }
            Err(error) => {
                log::warn!("{}: {}", source_name, error);
                pair.error = Some(error);
            }
        }

        pair
    }

    /// Names of all non-directory entries ending in `.xml`, any case
    pub async fn list_xml_entries(&self) -> Result<Vec<String>> {
        let entries = self.container.list().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| !entry.is_directory && entry.name.to_lowercase().ends_with(".xml"))
            .map(|entry| entry.name)
            .collect())
    }

    async fn load_source(&self, source_name: &str) -> Result<String> {
        let content = self
            .container
            .open(source_name)
            .await
            .map_err(|e| match e {
                ContentError::NotFound { .. } => ContentError::SourceNotFound {
                    path: source_name.to_string(),
                },
                other => ContentError::SourceRead {
                    path: source_name.to_string(),
                    message: other.to_string(),
                },
            })?;

        decode_text(content).map_err(|message| ContentError::SourceRead {
            path: source_name.to_string(),
            message,
        })
    }

    async fn load_stylesheet(&self, source_name: &str, href: &str) -> Result<String> {
        let read_failure = |message: String| ContentError::StylesheetRead {
            href: href.to_string(),
            message,
        };

        let entry_name = self
            .container
            .locate(source_name, href)
            .await
            .map_err(|e| read_failure(e.to_string()))?
            .ok_or_else(|| ContentError::StylesheetNotFound {
                href: href.to_string(),
            })?;

        let content = self
            .container
            .open(&entry_name)
            .await
            .map_err(|e| read_failure(e.to_string()))?;

        decode_text(content).map_err(read_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use async_trait::async_trait;

    struct MockContainer {
        files: Vec<(String, Vec<u8>)>,
    }

    impl MockContainer {
        fn new() -> Self {
            Self { files: Vec::new() }
        }

        fn add_file(&mut self, path: &str, content: &[u8]) {
            self.files.push((path.to_string(), content.to_vec()));
        }
    }

    #[async_trait]
    impl Container for MockContainer {
        async fn list(&self) -> Result<Vec<ContainerEntry>> {
            Ok(self
                .files
                .iter()
                .map(|(name, content)| ContainerEntry {
                    name: name.clone(),
                    is_directory: name.ends_with('/'),
                    size: content.len() as u64,
                })
                .collect())
        }

        async fn open(&self, name: &str) -> Result<Bytes> {
            self.files
                .iter()
                .find(|(file_name, _)| file_name == name)
                .map(|(_, content)| Bytes::from(content.clone()))
                .ok_or_else(|| ContentError::NotFound {
                    path: name.to_string(),
                })
        }

        fn identifier(&self) -> String {
            "mock".to_string()
        }
    }

    fn entries(names: &[&str]) -> Vec<ContainerEntry> {
        names
            .iter()
            .map(|name| ContainerEntry {
                name: name.to_string(),
                is_directory: name.ends_with('/'),
                size: 0,
            })
            .collect()
    }

    const DOC: &[u8] = br#"<?xml-stylesheet type="text/xsl" href="style.xsl"?><doc/>"#;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("dir/sub/doc.xml"), "doc.xml");
        assert_eq!(base_name("dir\\doc.xml"), "doc.xml");
        assert_eq!(base_name("doc.xml"), "doc.xml");
        assert_eq!(base_name("dir/"), "dir");
    }

    #[test]
    fn test_stylesheet_context() {
        assert_eq!(stylesheet_context("dir/doc.xml"), "dir");
        assert_eq!(stylesheet_context("a/b\\doc.xml"), "a/b");
        assert_eq!(stylesheet_context("a//doc.xml"), "a");
        assert_eq!(stylesheet_context("doc.xml"), "");
        assert_eq!(stylesheet_context("/doc.xml"), "");
    }

    #[test]
    fn test_sibling_beats_earlier_base_name_match() {
        let listed = entries(&["other/style.xsl", "dir/style.xsl"]);
        let found = locate_stylesheet(&listed, "dir/doc.xml", "style.xsl").unwrap();
        assert_eq!(found.name, "dir/style.xsl");
    }

    #[test]
    fn test_full_name_beats_base_name() {
        let listed = entries(&["a/shared.xsl", "xsl/shared.xsl"]);
        let found = locate_stylesheet(&listed, "docs/doc.xml", "XSL/Shared.xsl").unwrap();
        assert_eq!(found.name, "xsl/shared.xsl");
    }

    #[test]
    fn test_base_name_fallback_first_listed_wins() {
        let listed = entries(&["b/style.xsl", "a/style.xsl"]);
        let found = locate_stylesheet(&listed, "dir/doc.xml", "STYLE.XSL").unwrap();
        assert_eq!(found.name, "b/style.xsl");
    }

    #[test]
    fn test_directories_never_match() {
        let listed = entries(&["dir/style.xsl/"]);
        assert!(locate_stylesheet(&listed, "dir/doc.xml", "style.xsl").is_none());
    }

    #[tokio::test]
    async fn test_resolve_sibling() {
        let mut container = MockContainer::new();
        container.add_file("dir/doc.xml", DOC);
        container.add_file("dir/style.xsl", b"<xsl/>");

        let pair = DocumentResolver::new(&container).resolve("dir/doc.xml").await;
        assert!(pair.error.is_none());
        assert_eq!(pair.source_name.as_deref(), Some("doc.xml"));
        assert_eq!(pair.stylesheet_content.as_deref(), Some("<xsl/>"));
        assert_eq!(pair.stylesheet_name.as_deref(), Some("style.xsl"));
    }

    #[tokio::test]
    async fn test_resolve_without_reference() {
        let mut container = MockContainer::new();
        container.add_file("doc.xml", b"<doc/>");

        let pair = DocumentResolver::new(&container).resolve("doc.xml").await;
        assert!(pair.error.is_none());
        assert_eq!(pair.source_content.as_deref(), Some("<doc/>"));
        assert!(pair.stylesheet_name.is_none());
    }

    #[tokio::test]
    async fn test_empty_href_is_no_reference() {
        let mut container = MockContainer::new();
        container.add_file("doc.xml", br#"<?xml-stylesheet href=""?><doc/>"#);

        let pair = DocumentResolver::new(&container).resolve("doc.xml").await;
        assert!(pair.error.is_none());
        assert!(pair.stylesheet_name.is_none());
    }

    #[tokio::test]
    async fn test_resolve_missing_stylesheet_is_partial() {
        let mut container = MockContainer::new();
        container.add_file("dir/doc.xml", DOC);

        let pair = DocumentResolver::new(&container).resolve("dir/doc.xml").await;
        assert!(pair.has_source());
        assert_eq!(pair.error_kind(), Some(ErrorKind::StylesheetNotFound));
        assert!(pair.stylesheet_content.is_none());
        assert!(pair.stylesheet_name.is_none());
    }

    #[tokio::test]
    async fn test_invalid_utf8_stylesheet_is_read_failure() {
        let mut container = MockContainer::new();
        container.add_file("doc.xml", DOC);
        container.add_file("style.xsl", &[0xff, 0xfe, 0x00]);

        let pair = DocumentResolver::new(&container).resolve("doc.xml").await;
        assert!(pair.has_source());
        assert_eq!(pair.error_kind(), Some(ErrorKind::StylesheetReadFailure));
        assert!(pair.stylesheet_name.is_none());
    }

    #[tokio::test]
    async fn test_missing_source_is_fatal() {
        let container = MockContainer::new();

        let pair = DocumentResolver::new(&container).resolve("nope.xml").await;
        assert_eq!(pair.error_kind(), Some(ErrorKind::SourceNotFound));
        assert!(!pair.has_source());
        assert!(pair.source_name.is_none());
    }

    #[tokio::test]
    async fn test_invalid_utf8_source_is_fatal() {
        let mut container = MockContainer::new();
        container.add_file("doc.xml", &[0xc3, 0x28]);

        let pair = DocumentResolver::new(&container).resolve("doc.xml").await;
        assert_eq!(pair.error_kind(), Some(ErrorKind::SourceReadFailure));
        assert!(!pair.has_source());
    }

    #[tokio::test]
    async fn test_list_xml_entries() {
        let mut container = MockContainer::new();
        for name in ["a.xml", "b.XML", "dir/", "dir/c.txt", "notes.xml.bak"] {
            container.add_file(name, b"");
        }

        let names = DocumentResolver::new(&container)
            .list_xml_entries()
            .await
            .unwrap();
        assert_eq!(names, vec!["a.xml", "b.XML"]);
    }
}
