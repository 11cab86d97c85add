//! Line-oriented store: one `name = id` pair per line.
//!
//! ```text
//! // login service
//! LoginType = 101
//! LogoutType = 102
//! ```
//!
//! Blank lines and `//` comments are ignored on load. A missing file is an empty store.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tagwright_core::{Allocator, Assignment};

use super::{StoreAdapter, StoreError, StoreFormat, is_skippable, load_entry};

static TABLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([0-9]+)$").expect("INVARIANT: table line pattern is valid")
});

#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StoreAdapter for TableStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> StoreFormat {
        StoreFormat::Table
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&mut self, source: Option<&str>, allocator: &mut Allocator) -> Result<usize, StoreError> {
        let Some(source) = source else {
            tracing::debug!("store missing, starting empty");
            return Ok(0);
        };
        let mut entries = 0;
        for (i, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if is_skippable(line) {
                continue;
            }
            let Some(caps) = TABLE_LINE.captures(line) else {
                return Err(StoreError::Format {
                    path: self.path.clone(),
                    line: i + 1,
                    message: format!("invalid line `{line}`, correct format: Name = integer"),
                });
            };
            load_entry(&self.path, i + 1, &caps[1], &caps[2], allocator)?;
            entries += 1;
        }
        tracing::debug!(entries, "store loaded");
        Ok(entries)
    }

    fn render(&self, assignments: &[Assignment]) -> String {
        let mut out = String::new();
        for a in assignments {
            out.push_str(&format!("{} = {}\n", a.name, a.id));
        }
        out
    }
}
