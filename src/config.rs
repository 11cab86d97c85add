//! Generator configuration.
//!
//! Mirrors the generator's command-line options: where the sidecar store lives, which format it uses,
//! and how constant names are formed from message names.

use std::path::{Path, PathBuf};

use crate::store::StoreFormat;

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Sidecar store shared by every exported package. `None` disables persistence.
    pub store_path: Option<PathBuf>,
    /// Format of the sidecar store
    pub store_format: StoreFormat,
    /// Enum block to use for the embedded format (first enum when unset)
    pub enum_name: Option<String>,
    /// Prepended to message names to form constant names
    pub const_prefix: String,
    /// Appended to message names to form constant names
    pub const_suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            store_format: StoreFormat::Table,
            enum_name: None,
            const_prefix: String::new(),
            const_suffix: "Type".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` as the sidecar store, inferring its format from the extension.
    pub fn with_store(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.store_format = StoreFormat::from_path(path);
        self.store_path = Some(path.to_path_buf());
        self
    }

    /// Override the inferred store format.
    pub fn with_store_format(mut self, format: StoreFormat) -> Self {
        self.store_format = format;
        self
    }

    pub fn with_enum_name(mut self, name: impl Into<String>) -> Self {
        self.enum_name = Some(name.into());
        self
    }

    pub fn with_const_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.const_prefix = prefix.into();
        self
    }

    pub fn with_const_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.const_suffix = suffix.into();
        self
    }

    /// Reject option combinations the generator cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.const_prefix.is_empty() && self.const_suffix.is_empty() {
            return Err("const prefix and const suffix are both empty".to_string());
        }
        Ok(())
    }

    /// Constant name for a message, e.g. `Login` → `LoginType`.
    pub fn const_name(&self, message: &str) -> String {
        format!("{}{}{}", self.const_prefix, message, self.const_suffix)
    }
}
