//! Sidecar stores that persist assignments between generation runs.
//!
//! Two interchangeable formats implement [`StoreAdapter`]:
//!
//! - [`TableStore`] — a standalone file of `name = id` lines.
//! - [`EmbeddedStore`] — an `enum <Name> { ... }` block inside a larger text artifact (for example a
//!   `.proto` file); everything outside the block is written back untouched.
//!
//! The format is picked once, when the adapter is built ([`StoreFormat::adapter`]).

pub mod embedded;
pub mod table;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tagwright_core::{AllocError, Allocator, Assignment};
use thiserror::Error;

pub use embedded::EmbeddedStore;
pub use table::TableStore;

/// Errors raised while reading or writing a sidecar store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Format { path: PathBuf, line: usize, message: String },

    #[error("{}: enum {name} not found", path.display())]
    MissingBlock { path: PathBuf, name: String },
}

/// On-disk format of a sidecar store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreFormat {
    #[default]
    Table,
    Embedded,
}

impl StoreFormat {
    /// Guess the format from a file extension: `.proto` files embed an enum block.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("proto") => StoreFormat::Embedded,
            _ => StoreFormat::Table,
        }
    }

    /// Build the adapter for this format.
    pub fn adapter(self, path: impl Into<PathBuf>, enum_name: Option<&str>) -> Box<dyn StoreAdapter> {
        match self {
            StoreFormat::Table => Box::new(TableStore::new(path)),
            StoreFormat::Embedded => Box::new(EmbeddedStore::new(path, enum_name.map(str::to_string))),
        }
    }
}

/// A persistence strategy for one sidecar store.
pub trait StoreAdapter: std::fmt::Debug {
    fn path(&self) -> &Path;

    fn format(&self) -> StoreFormat;

    /// Populate the allocator's previous registry from the store contents.
    ///
    /// `source` is `None` when the file does not exist yet. Returns the number of entries read.
    fn load(&mut self, source: Option<&str>, allocator: &mut Allocator) -> Result<usize, StoreError>;

    /// Render the finalized assignments back to the store's text form.
    fn render(&self, assignments: &[Assignment]) -> String;
}

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("INVARIANT: identifier pattern is valid"));

/// Whether `name` can be written to a store and read back.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Read a store file, mapping "not found" to `None`.
pub fn read_source(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn write_rendered(path: &Path, text: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Record one parsed `name = digits` entry, turning numeric and bijection failures into format errors.
fn load_entry(path: &Path, line: usize, name: &str, digits: &str, allocator: &mut Allocator) -> Result<(), StoreError> {
    let id: u32 = digits.parse().map_err(|_| StoreError::Format {
        path: path.to_path_buf(),
        line,
        message: format!("type `{digits}` is not a 32-bit unsigned integer"),
    })?;
    allocator.load_previous(name, id).map_err(|e: AllocError| StoreError::Format {
        path: path.to_path_buf(),
        line,
        message: e.to_string(),
    })
}

/// Whether a store line carries no entry.
fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with("//")
}

/// Load a store on its own and return its entries sorted by id.
pub fn inspect(path: &Path, format: StoreFormat, enum_name: Option<&str>) -> Result<Vec<Assignment>, StoreError> {
    let source = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut adapter = format.adapter(path, enum_name);
    let mut allocator = Allocator::new(1, 0);
    adapter.load(Some(&source), &mut allocator)?;
    let mut entries: Vec<Assignment> = allocator.previous().iter().cloned().collect();
    entries.sort_by_key(|a| a.id);
    Ok(entries)
}
