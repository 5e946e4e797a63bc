//! Byte-asset store for the template
//!
//! The template's raw bytes are frozen into a small TOML data file inside a
//! hidden directory next to the application, so generation no longer
//! depends on the original `.docx` staying where it was:
//!
//! ```toml
//! # Generated automatically, do not edit by hand.
//! # Contains the bytes of the original file: modelo.docx
//! version = 1
//! source = "modelo.docx"
//! sha256 = "sha256:9f86d0..."
//! payload = "UEsDBBQA..."
//! ```
//!
//! [`AssetStore::load`] always reads the file again. The in-memory copy
//! lives in a [`TemplateSlot`], which is only ever replaced whole.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::StoreError;

/// Hidden directory holding the asset, relative to the base directory
pub const ASSET_DIR_NAME: &str = "._modelo_data";

/// File name of the asset
pub const ASSET_FILE_NAME: &str = "declaracao_base_bytes.toml";

/// Current asset format version
pub const ASSET_FORMAT_VERSION: u32 = 1;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Serialize, Deserialize)]
struct AssetRecord {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
    #[serde(default)]
    payload: Option<String>,
}

/// A template payload read back from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTemplate {
    /// Raw bytes of the template document
    pub bytes: Vec<u8>,
    /// File name the bytes were imported from
    pub source: Option<String>,
}

/// Persists template bytes under an application base directory
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    file_name: String,
}

impl AssetStore {
    /// Store using the default hidden directory and file name
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self::with_names(base_dir, ASSET_DIR_NAME, ASSET_FILE_NAME)
    }

    /// Store with custom directory and file names
    pub fn with_names(
        base_dir: impl AsRef<Path>,
        dir_name: impl AsRef<Path>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            dir: base_dir.as_ref().join(dir_name),
            file_name: file_name.into(),
        }
    }

    /// Directory holding the asset
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the asset file
    pub fn asset_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Write `raw` into the asset file, replacing any previous one
    ///
    /// The file is written next to its final location and renamed into
    /// place, so a reader never sees a partial asset.
    pub fn persist(&self, raw: &[u8], original_filename: &str) -> StoreResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::from_io(&self.dir, e))?;

        let record = AssetRecord {
            version: ASSET_FORMAT_VERSION,
            source: Some(original_filename.to_string()),
            sha256: Some(content_hash(raw)),
            payload: Some(STANDARD.encode(raw)),
        };
        let body = toml::to_string(&record)
            .map_err(|e| StoreError::Malformed(format!("cannot encode asset: {}", e)))?;
        let contents = format!(
            "# Generated automatically, do not edit by hand.\n\
             # Contains the bytes of the original file: {}\n{}",
            comment_safe(original_filename),
            body
        );

        let path = self.asset_path();
        let staging = self.dir.join(format!("{}.tmp", self.file_name));
        fs::write(&staging, contents).map_err(|e| StoreError::from_io(&staging, e))?;
        fs::rename(&staging, &path).map_err(|e| StoreError::from_io(&path, e))?;

        info!(path = %path.display(), bytes = raw.len(), source = original_filename, "Template asset written");
        Ok(path)
    }

    /// Read the asset back
    ///
    /// `Ok(None)` means no template has been imported yet.
    pub fn load(&self) -> StoreResult<Option<StoredTemplate>> {
        let path = self.asset_path();
        if !path.exists() {
            debug!(path = %path.display(), "No template asset present");
            return Ok(None);
        }

        let text = fs::read_to_string(&path).map_err(|e| StoreError::from_io(&path, e))?;
        let record: AssetRecord =
            toml::from_str(&text).map_err(|e| StoreError::Malformed(e.to_string()))?;

        if record.version > ASSET_FORMAT_VERSION {
            return Err(StoreError::Malformed(format!(
                "unsupported asset version {}",
                record.version
            )));
        }

        let payload = record.payload.ok_or(StoreError::MissingPayload)?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| StoreError::Malformed(format!("payload is not valid base64: {}", e)))?;

        if let Some(expected) = record.sha256 {
            if content_hash(&bytes) != expected {
                return Err(StoreError::Malformed(
                    "payload does not match its checksum".to_string(),
                ));
            }
        }

        debug!(path = %path.display(), bytes = bytes.len(), "Template asset loaded");
        Ok(Some(StoredTemplate {
            bytes,
            source: record.source,
        }))
    }
}

/// Process-wide holder of the loaded template bytes
///
/// Only ever replaced as a whole; generation reads it and never edits it.
/// Access goes through `&mut self`, so a multi-threaded front end would
/// have to wrap it in a lock.
#[derive(Debug, Default)]
pub struct TemplateSlot {
    current: Option<StoredTemplate>,
}

impl TemplateSlot {
    /// An empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot's contents
    pub fn set(&mut self, template: Option<StoredTemplate>) {
        self.current = template;
    }

    /// The loaded template, if any
    pub fn get(&self) -> Option<&StoredTemplate> {
        self.current.as_ref()
    }

    /// The loaded bytes, if any
    pub fn bytes(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|t| t.bytes.as_slice())
    }

    /// Whether a template is loaded
    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }
}

/// TOML comments may hold tabs but no other control characters
fn comment_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() && c != '\t' { ' ' } else { c })
        .collect()
}

fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    format!(
        "sha256:{}",
        result.iter().map(|b| format!("{:02x}", b)).collect::<String>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, AssetStore) {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_load_absent() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_round_trip_binary() {
        let (_dir, store) = store();
        let payload: Vec<u8> = (0..=255u8).chain([0, 0, 0x50, 0x4b]).collect();

        let path = store.persist(&payload, "modelo.docx").unwrap();
        assert_eq!(path, store.asset_path());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.bytes, payload);
        assert_eq!(loaded.source.as_deref(), Some("modelo.docx"));
    }

    #[test]
    fn test_round_trip_empty() {
        let (_dir, store) = store();
        store.persist(&[], "vazio.docx").unwrap();
        assert_eq!(store.load().unwrap().unwrap().bytes, Vec::<u8>::new());
    }

    #[test]
    fn test_reload_after_reimport_is_never_stale() {
        let (_dir, store) = store();
        store.persist(b"payload A", "a.docx").unwrap();
        assert_eq!(store.load().unwrap().unwrap().bytes, b"payload A");

        store.persist(b"payload B", "b.docx").unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.bytes, b"payload B");
        assert_eq!(loaded.source.as_deref(), Some("b.docx"));
    }

    #[test]
    fn test_asset_file_layout() {
        let (_dir, store) = store();
        store.persist(b"abc", "modelo.docx").unwrap();

        let text = fs::read_to_string(store.asset_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with('#'));
        assert_eq!(lines[1], "# Contains the bytes of the original file: modelo.docx");
        assert!(text.contains("payload = \"YWJj\""));
        assert!(store.asset_path().starts_with(store.dir()));
        assert!(store.dir().ends_with(ASSET_DIR_NAME));
        // No staging file left behind
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_control_characters_in_source_name() {
        let (_dir, store) = store();
        let name = "mo\u{1}de\u{7f}lo.docx";
        store.persist(b"abc", name).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.bytes, b"abc");
        assert_eq!(loaded.source.as_deref(), Some(name));

        let text = fs::read_to_string(store.asset_path()).unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some("# Contains the bytes of the original file: mo de lo.docx")
        );
        assert_eq!(comment_safe("a\r\nb\tc"), "a  b\tc");
    }

    #[test]
    fn test_malformed_asset() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.asset_path(), "this is = = not toml").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_missing_payload() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.asset_path(), "version = 1\nsource = \"x.docx\"\n").unwrap();
        assert!(matches!(store.load(), Err(StoreError::MissingPayload)));
    }

    #[test]
    fn test_invalid_base64_payload() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.asset_path(), "version = 1\npayload = \"***\"\n").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_checksum_mismatch() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.asset_path(),
            "version = 1\nsha256 = \"sha256:00\"\npayload = \"YWJj\"\n",
        )
        .unwrap();
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_future_version_rejected() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.asset_path(), "version = 99\npayload = \"YWJj\"\n").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_base_dir() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        let store = AssetStore::new(&locked);
        let result = store.persist(b"x", "x.docx");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        // Root ignores permission bits; only assert when the write was refused
        if let Err(err) = result {
            assert!(matches!(err, StoreError::PermissionDenied { .. }));
        }
    }

    #[test]
    fn test_slot_replaced_wholesale() {
        let mut slot = TemplateSlot::new();
        assert!(!slot.is_loaded());
        assert_eq!(slot.bytes(), None);

        slot.set(Some(StoredTemplate {
            bytes: b"A".to_vec(),
            source: None,
        }));
        assert_eq!(slot.bytes(), Some(&b"A"[..]));

        slot.set(None);
        assert!(!slot.is_loaded());
        assert!(slot.get().is_none());
    }
}
