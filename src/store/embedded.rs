//! Store embedded in a larger text artifact as an enum block.
//!
//! ```text
//! syntax = "proto3";
//!
//! enum MessageType {
//! 	LoginType  = 101,
//! 	LogoutType = 102,
//! }
//! ```
//!
//! Only the block body is rewritten; the text before the opening brace and from the closing brace on
//! is reproduced byte for byte. Body names are right-padded so the `=` signs line up.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tagwright_core::{Allocator, Assignment};

use super::{StoreAdapter, StoreError, StoreFormat, is_skippable, load_entry};

static ENUM_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\benum\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{").expect("INVARIANT: enum header pattern is valid")
});

static ENUM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([0-9]+)\s*[,;]?$").expect("INVARIANT: enum line pattern is valid")
});

#[derive(Debug, Clone)]
pub struct EmbeddedStore {
    path: PathBuf,
    enum_name: Option<String>,
    /// Everything up to and including the opening brace.
    leading: String,
    /// Everything from the closing brace on.
    trailing: String,
}

impl EmbeddedStore {
    /// `enum_name` selects the block; `None` takes the first enum in the file.
    pub fn new(path: impl Into<PathBuf>, enum_name: Option<String>) -> Self {
        Self {
            path: path.into(),
            enum_name,
            leading: String::new(),
            trailing: String::new(),
        }
    }

    /// Name of the enum block once loaded (or as configured).
    pub fn enum_name(&self) -> Option<&str> {
        self.enum_name.as_deref()
    }

    fn format_error(&self, line: usize, message: impl Into<String>) -> StoreError {
        StoreError::Format {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }
}

impl StoreAdapter for EmbeddedStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> StoreFormat {
        StoreFormat::Embedded
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&mut self, source: Option<&str>, allocator: &mut Allocator) -> Result<usize, StoreError> {
        let Some(source) = source else {
            return Err(StoreError::Io {
                path: self.path.clone(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        };

        let header = ENUM_OPEN
            .captures_iter(source)
            .filter(|caps| caps.get(0).is_some_and(|m| !in_line_comment(source, m.start())))
            .find(|caps| self.enum_name.as_deref().is_none_or(|want| &caps[1] == want));
        let Some(header) = header else {
            return Err(StoreError::MissingBlock {
                path: self.path.clone(),
                name: self.enum_name.clone().unwrap_or_else(|| "<any>".to_string()),
            });
        };
        let (Some(whole), Some(name)) = (header.get(0), header.get(1)) else {
            return Err(self.format_error(1, "malformed enum header"));
        };

        let body_start = whole.end();
        let first_line = source[..body_start].matches('\n').count() + 1;
        let Some(body_len) = source[body_start..].find('}') else {
            return Err(self.format_error(first_line, format!("enum {} is not terminated", name.as_str())));
        };
        let body = &source[body_start..body_start + body_len];

        let mut entries = 0;
        for (offset, raw) in body.split('\n').enumerate() {
            let line = raw.trim();
            if is_skippable(line) {
                continue;
            }
            let Some(caps) = ENUM_LINE.captures(line) else {
                return Err(self.format_error(
                    first_line + offset,
                    format!("invalid line `{line}`, correct format: Name = integer,"),
                ));
            };
            load_entry(&self.path, first_line + offset, &caps[1], &caps[2], allocator)?;
            entries += 1;
        }

        self.enum_name = Some(name.as_str().to_string());
        self.leading = source[..body_start].to_string();
        self.trailing = source[body_start + body_len..].to_string();
        tracing::debug!(entries, enum_name = name.as_str(), "store loaded");
        Ok(entries)
    }

    fn render(&self, assignments: &[Assignment]) -> String {
        let width = assignments.iter().map(|a| a.name.len()).max().unwrap_or(0);
        let mut out = self.leading.clone();
        out.push('\n');
        for a in assignments {
            out.push_str(&format!("\t{:<width$} = {},\n", a.name, a.id));
        }
        out.push_str(&self.trailing);
        out
    }
}

/// Whether byte offset `at` sits after a `//` on its line.
fn in_line_comment(source: &str, at: usize) -> bool {
    let line_start = source[..at].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..at].contains("//")
}
