//! Page storage.
//!
//! The bot never talks to the wiki directly: pages come from a [`PageStore`].
//! [`FsPageStore`] keeps one file per page under a root directory, with the
//! title's `/` segments as subdirectories:
//!
//! ```text
//! pages/
//! ├── Qiuwen%3A2026年春节编辑松/
//! │   ├── 提交.wiki                  <- Qiuwen:2026年春节编辑松/提交
//! │   └── 提交/
//! │       └── UserA的贡献.wiki       <- Qiuwen:2026年春节编辑松/提交/UserA的贡献
//! ```
//!
//! Characters some filesystems reject are stored as `%XX` and decoded back
//! when listing, so titles round-trip exactly.

use crate::log;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use thiserror::Error;
use walkdir::WalkDir;

/// Page storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page `{0}` not found")]
    NotFound(String),

    #[error("invalid page title `{0}`")]
    InvalidTitle(String),

    #[error("IO error on `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot walk page directory")]
    Walk(#[from] walkdir::Error),
}

/// Read/list/save capability over wiki pages, keyed by title.
pub trait PageStore: Sync {
    /// Every page title starting with `prefix`, sorted.
    fn list_pages(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    fn read_page(&self, title: &str) -> Result<String, StoreError>;

    fn save_page(&self, title: &str, text: &str, summary: &str) -> Result<(), StoreError>;
}

// ============================================================================
// Filesystem store
// ============================================================================

/// Pages as files under a root directory.
#[derive(Debug, Clone)]
pub struct FsPageStore {
    root: PathBuf,
    extension: String,
}

impl FsPageStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// File path holding `title`.
    pub fn page_path(&self, title: &str) -> Result<PathBuf, StoreError> {
        if title.is_empty() {
            return Err(StoreError::InvalidTitle(title.to_owned()));
        }
        let mut path = self.root.clone();
        for segment in title.split('/') {
            if segment.is_empty() {
                return Err(StoreError::InvalidTitle(title.to_owned()));
            }
            path.push(encode_segment(segment));
        }
        let mut file = path.into_os_string();
        file.push(".");
        file.push(&self.extension);
        Ok(PathBuf::from(file))
    }

    /// Title stored at `path`, if it is a page file under the root.
    fn title_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        if relative.extension()? != self.extension.as_str() {
            return None;
        }
        let relative = relative.with_extension("");
        let segments: Option<Vec<String>> = relative
            .components()
            .map(|component| component.as_os_str().to_str().map(decode_segment))
            .collect();
        Some(segments?.join("/"))
    }
}

impl PageStore for FsPageStore {
    fn list_pages(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut titles = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(title) = self.title_of(entry.path())
                && title.starts_with(prefix)
            {
                titles.push(title);
            }
        }
        titles.sort();
        Ok(titles)
    }

    fn read_page(&self, title: &str) -> Result<String, StoreError> {
        let path = self.page_path(title)?;
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(title.to_owned()),
            _ => StoreError::Io { path, source },
        })
    }

    fn save_page(&self, title: &str, text: &str, summary: &str) -> Result<(), StoreError> {
        let path = self.page_path(title)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, text).map_err(|source| StoreError::Io { path, source })?;
        log!("save"; "{title} ({summary})");
        Ok(())
    }
}

/// Characters kept out of file names.
const RESERVED: &[char] = &['%', '\\', ':', '*', '?', '"', '<', '>', '|'];

fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        if RESERVED.contains(&c) {
            out.push_str(&format!("%{:02X}", c as u32));
        } else {
            out.push(c);
        }
    }
    match out.as_str() {
        "." => "%2E".into(),
        ".." => "%2E%2E".into(),
        _ => out,
    }
}

fn decode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(at) = rest.find('%') {
        out.push_str(&rest[..at]);
        let decoded = rest
            .get(at + 1..at + 3)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .map(char::from);
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[at + 3..];
            }
            None => {
                out.push('%');
                rest = &rest[at + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// In-memory and dry-run stores
// ============================================================================

/// A save recorded by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    pub title: String,
    pub summary: String,
}

/// Pages held in memory; every save is also recorded in order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: Mutex<BTreeMap<String, String>>,
    saves: Mutex<Vec<SavedPage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, title: impl Into<String>, text: impl Into<String>) -> Self {
        self.lock_pages().insert(title.into(), text.into());
        self
    }

    /// Current text of `title`.
    pub fn page(&self, title: &str) -> Option<String> {
        self.lock_pages().get(title).cloned()
    }

    pub fn saves(&self) -> Vec<SavedPage> {
        self.saves.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_pages(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.pages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PageStore for MemoryStore {
    fn list_pages(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .lock_pages()
            .keys()
            .filter(|title| title.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn read_page(&self, title: &str) -> Result<String, StoreError> {
        self.page(title)
            .ok_or_else(|| StoreError::NotFound(title.to_owned()))
    }

    fn save_page(&self, title: &str, text: &str, summary: &str) -> Result<(), StoreError> {
        self.lock_pages().insert(title.to_owned(), text.to_owned());
        self.saves
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SavedPage {
                title: title.to_owned(),
                summary: summary.to_owned(),
            });
        Ok(())
    }
}

/// Reads from the wrapped store; saves are only logged.
#[derive(Debug)]
pub struct DryRun<S> {
    inner: S,
}

impl<S: PageStore> DryRun<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: PageStore> PageStore for DryRun<S> {
    fn list_pages(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.inner.list_pages(prefix)
    }

    fn read_page(&self, title: &str) -> Result<String, StoreError> {
        self.inner.read_page(title)
    }

    fn save_page(&self, title: &str, text: &str, summary: &str) -> Result<(), StoreError> {
        log!("dry-run"; "would save {title} ({} bytes, {summary})", text.len());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER: &str = "Qiuwen:2026年春节编辑松/提交/UserA的贡献";
    const BOARD: &str = "Qiuwen:2026年春节编辑松/提交";

    fn store() -> (tempfile::TempDir, FsPageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsPageStore::new(dir.path(), "wiki");
        (dir, store)
    }

    // ------------------------------------------------------------------------
    // path mapping
    // ------------------------------------------------------------------------

    #[test]
    fn test_page_path_layout() {
        let store = FsPageStore::new("/pages", "wiki");
        let path = store.page_path(LEDGER).unwrap();
        assert_eq!(
            path,
            Path::new("/pages/Qiuwen%3A2026年春节编辑松/提交/UserA的贡献.wiki")
        );
    }

    #[test]
    fn test_page_path_rejects_empty_segments() {
        let store = FsPageStore::new("/pages", "wiki");
        assert!(matches!(store.page_path(""), Err(StoreError::InvalidTitle(_))));
        assert!(matches!(store.page_path("a//b"), Err(StoreError::InvalidTitle(_))));
        assert!(matches!(store.page_path("a/"), Err(StoreError::InvalidTitle(_))));
    }

    #[test]
    fn test_dot_segments_stay_inside_root() {
        let store = FsPageStore::new("/pages", "wiki");
        let path = store.page_path("../etc/passwd").unwrap();
        assert!(path.starts_with("/pages"));
        assert_eq!(decode_segment(&encode_segment("..")), "..");
    }

    #[test]
    fn test_segment_encoding_round_trips() {
        for segment in ["Qiuwen:提交", "a%b", "what?", "plain", "x|y<z>"] {
            assert_eq!(decode_segment(&encode_segment(segment)), segment);
        }
        assert_eq!(decode_segment("100%"), "100%");
    }

    // ------------------------------------------------------------------------
    // filesystem store
    // ------------------------------------------------------------------------

    #[test]
    fn test_save_then_read() {
        let (_dir, store) = store();
        store.save_page(LEDGER, "text", "summary").unwrap();
        assert_eq!(store.read_page(LEDGER).unwrap(), "text");
    }

    #[test]
    fn test_read_missing_page() {
        let (_dir, store) = store();
        assert!(matches!(store.read_page(LEDGER), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_list_pages_by_prefix() {
        let (_dir, store) = store();
        store.save_page(BOARD, "board", "s").unwrap();
        store.save_page(LEDGER, "a", "s").unwrap();
        store
            .save_page("Qiuwen:2026年春节编辑松/提交/UserB的贡献", "b", "s")
            .unwrap();
        store.save_page("Other", "x", "s").unwrap();

        let titles = store.list_pages("Qiuwen:2026年春节编辑松/提交/").unwrap();
        assert_eq!(
            titles,
            vec![
                "Qiuwen:2026年春节编辑松/提交/UserA的贡献".to_string(),
                "Qiuwen:2026年春节编辑松/提交/UserB的贡献".to_string(),
            ]
        );

        let all = store.list_pages("").unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.contains(&BOARD.to_string()));
    }

    #[test]
    fn test_list_ignores_other_extensions() {
        let (dir, store) = store();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        store.save_page("Page", "y", "s").unwrap();
        assert_eq!(store.list_pages("").unwrap(), vec!["Page".to_string()]);
    }

    #[test]
    fn test_list_missing_root_is_empty() {
        let store = FsPageStore::new("/nonexistent/ledgerbot/pages", "wiki");
        assert!(store.list_pages("").unwrap().is_empty());
    }

    // ------------------------------------------------------------------------
    // memory and dry-run stores
    // ------------------------------------------------------------------------

    #[test]
    fn test_memory_store_records_saves() {
        let store = MemoryStore::new().with_page("A", "1");
        store.save_page("A", "2", "edit").unwrap();
        assert_eq!(store.page("A").as_deref(), Some("2"));
        assert_eq!(
            store.saves(),
            vec![SavedPage {
                title: "A".into(),
                summary: "edit".into()
            }]
        );
    }

    #[test]
    fn test_dry_run_never_writes() {
        let store = DryRun::new(MemoryStore::new().with_page("A", "1"));
        store.save_page("A", "2", "edit").unwrap();
        assert_eq!(store.read_page("A").unwrap(), "1");
        assert!(store.inner.saves().is_empty());
    }
}
