//! # Identity Document Storage
//!
//! Saves the guest's ID scan next to the database and hands back its path.
//!
//! ## Path Layout
//! ```text
//! <guest_docs_dir>/
//! ├── 2025-03-01_101_Asha_Rao.jpg
//! ├── 2025-03-02_Unassigned__Deluxe__Rahul_Mehta.pdf
//! └── 2025-03-04_202_guest.png          ◄── blank guest name
//! ```
//!
//! The path depends only on check-in date, room and guest name, so saving the
//! same booking twice overwrites the earlier file instead of adding another.
//!
//! The folder can be moved at runtime from the settings screen. Files saved
//! before the move stay where they are and keep working.

use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, info};

/// Extension used when the form did not say what was uploaded.
const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is empty")]
    Empty,

    #[error("document is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("could not write document: {0}")]
    Io(#[from] std::io::Error),
}

/// What the file is named after.
#[derive(Debug, Clone)]
pub struct DocumentMeta<'a> {
    pub guest_name: &'a str,
    pub check_in: NaiveDateTime,
    pub room: &'a str,
    pub extension: Option<&'a str>,
}

/// Replaces everything outside `[A-Za-z0-9]` with `_`.
fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn extension(raw: Option<&str>) -> String {
    let ext: String = raw
        .unwrap_or_default()
        .trim()
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    if ext.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        ext
    }
}

/// Strips a `data:<mime>;base64,` prefix, if present.
fn payload(blob: &str) -> &str {
    let blob = blob.trim();
    if blob.starts_with("data:") {
        if let Some((_, rest)) = blob.split_once(',') {
            return rest;
        }
    }
    blob
}

/// Decodes a base64 upload, with or without a `data:` prefix.
pub fn decode_base64(blob: &str) -> Result<Vec<u8>, DocumentError> {
    let encoded = payload(blob);
    if encoded.is_empty() {
        return Err(DocumentError::Empty);
    }
    Ok(general_purpose::STANDARD.decode(encoded)?)
}

/// Folder of saved ID documents.
#[derive(Debug)]
pub struct DocumentStore {
    root: RwLock<PathBuf>,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DocumentStore {
            root: RwLock::new(root.into()),
        }
    }

    pub fn root(&self) -> PathBuf {
        match self.root.read() {
            Ok(root) => root.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Creates `root` and points new uploads at it.
    pub fn relocate(&self, root: impl Into<PathBuf>) -> Result<PathBuf, DocumentError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        let mut guard = match self.root.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        info!(from = %guard.display(), to = %root.display(), "ID document folder moved");
        *guard = root.clone();
        Ok(root)
    }

    /// Where a document with this metadata lives.
    pub fn path_for(&self, meta: &DocumentMeta<'_>) -> PathBuf {
        let name = match sanitize(meta.guest_name) {
            n if n.is_empty() => "guest".to_string(),
            n => n,
        };
        let file = format!(
            "{}_{}_{}.{}",
            meta.check_in.format("%Y-%m-%d"),
            sanitize(meta.room),
            name,
            extension(meta.extension)
        );
        self.root().join(file)
    }

    /// True when `value` is a saved document rather than a fresh upload.
    ///
    /// Edited bookings carry their saved path back in the form, possibly
    /// from a folder used before a relocation; those must not be decoded.
    pub fn is_stored_path(&self, value: &str) -> bool {
        let path = Path::new(value.trim());
        path.starts_with(self.root()) || path.is_file()
    }

    /// Decodes `blob` and writes it, returning the resolved path.
    pub fn store(&self, blob: &str, meta: &DocumentMeta<'_>) -> Result<PathBuf, DocumentError> {
        let bytes = decode_base64(blob)?;

        std::fs::create_dir_all(self.root())?;
        let path = self.path_for(meta);
        std::fs::write(&path, &bytes)?;

        debug!(?path, bytes = bytes.len(), "ID document written");
        info!(guest = meta.guest_name, room = meta.room, "ID document saved");
        Ok(path)
    }
}
