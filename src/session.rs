//! One generation run over a set of packages.
//!
//! A [`Session`] owns every sidecar store touched during the run. Each store is read at most once, on
//! first use, and gets its own [`Allocator`]; packages sharing a store share that allocator. When the
//! run ends, [`Session::finish`] finalizes and writes back every store that did not fail.
//!
//! ## Notes
//!
//! - A fatal error marks the store it happened on as failed. Failed stores are never rendered, so a
//!   broken run cannot overwrite the previous assignments.
//! - Explicit-id messages are fed before auto-assigned ones so that explicit ids are never drawn for
//!   someone else first.

use std::path::{Path, PathBuf};

use tagwright_core::{AllocError, Allocator, Assignment, ChangedId};
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::manifest::{IdRange, Package};
use crate::store::{self, StoreAdapter, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{package}: {source}")]
    Alloc {
        package: String,
        #[source]
        source: AllocError,
    },

    #[error("{package}: max ({max}) less than min ({min})")]
    InvalidRange { package: String, min: u32, max: u32 },

    #[error("{package}: `{name}` is not a valid identifier")]
    InvalidName { package: String, name: String },

    #[error("{package}: {entity} needs an explicit id while no package range and store are configured")]
    MissingRange { package: String, entity: String },

    #[error("{}: store unusable after an earlier error: {message}", path.display())]
    StoreFailed { path: PathBuf, message: String },
}

/// Tags assigned to one package, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReport {
    pub package: String,
    pub entries: Vec<Assignment>,
    pub warnings: Vec<ChangedId>,
}

#[derive(Debug)]
struct OpenStore {
    adapter: Box<dyn StoreAdapter>,
    allocator: Allocator,
    failed: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    config: GeneratorConfig,
    stores: Vec<OpenStore>,
    seed: Option<u64>,
}

impl Session {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            stores: Vec::new(),
            seed: None,
        }
    }

    /// A session whose auto-assigned ids are reproducible.
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The allocator of an already opened store.
    pub fn allocator(&self, path: &Path) -> Option<&Allocator> {
        self.stores
            .iter()
            .find(|s| s.adapter.path() == path)
            .map(|s| &s.allocator)
    }

    /// Open the store at `path`, loading it on first use.
    ///
    /// Re-opening an already loaded store re-scopes its allocator to `range`. A store that failed
    /// keeps failing.
    pub fn open(&mut self, path: &Path, range: IdRange) -> Result<&mut Allocator, SessionError> {
        let index = match self.stores.iter().position(|s| s.adapter.path() == path) {
            Some(index) => index,
            None => self.load(path, range)?,
        };
        let open = &mut self.stores[index];
        if let Some(message) = &open.failed {
            return Err(SessionError::StoreFailed {
                path: path.to_path_buf(),
                message: message.clone(),
            });
        }
        open.allocator.set_range(range.min, range.max);
        Ok(&mut open.allocator)
    }

    fn load(&mut self, path: &Path, range: IdRange) -> Result<usize, SessionError> {
        let mut adapter = self
            .config
            .store_format
            .adapter(path, self.config.enum_name.as_deref());
        let mut allocator = match self.seed {
            Some(seed) => Allocator::with_seed(range.min, range.max, seed),
            None => Allocator::new(range.min, range.max),
        };
        let loaded = store::read_source(path).and_then(|source| adapter.load(source.as_deref(), &mut allocator));
        let failed = loaded.as_ref().err().map(|e| e.to_string());
        self.stores.push(OpenStore {
            adapter,
            allocator,
            failed,
        });
        match loaded {
            Ok(entries) => {
                tracing::debug!(path = %path.display(), entries, "store opened");
                Ok(self.stores.len() - 1)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to open store");
                Err(e.into())
            }
        }
    }

    fn fail(&mut self, path: &Path, error: &AllocError) {
        if let Some(open) = self.stores.iter_mut().find(|s| s.adapter.path() == path) {
            open.failed = Some(error.to_string());
        }
    }

    /// Assign tags to every message of `package`.
    pub fn run_package(&mut self, package: &Package) -> Result<PackageReport, SessionError> {
        if let Some(range) = package.range.filter(|r| r.max < r.min) {
            return Err(SessionError::InvalidRange {
                package: package.name.clone(),
                min: range.min,
                max: range.max,
            });
        }

        if let Some(name) = package
            .messages
            .iter()
            .map(|m| self.config.const_name(&m.name))
            .find(|name| !store::is_identifier(name))
        {
            return Err(SessionError::InvalidName {
                package: package.name.clone(),
                name,
            });
        }

        let store = match (&self.config.store_path, package.range, package.export) {
            (Some(path), Some(range), true) => Some((path.clone(), range)),
            _ => None,
        };
        if let Some((path, range)) = &store {
            self.open(path, *range)?;
        }

        let mut report = PackageReport {
            package: package.name.clone(),
            ..PackageReport::default()
        };
        let explicit = package.messages.iter().filter(|m| m.id.is_some());
        let auto = package.messages.iter().filter(|m| m.id.is_none());

        for message in explicit.chain(auto) {
            let name = self.config.const_name(&message.name);
            let Some((path, _)) = &store else {
                let Some(id) = message.id else {
                    return Err(SessionError::MissingRange {
                        package: package.name.clone(),
                        entity: name,
                    });
                };
                report.entries.push(Assignment::new(name, id));
                continue;
            };

            let allocator = self.open_allocator(path)?;
            match allocator.generate(&name, message.id) {
                Ok(generated) => {
                    if let Some(changed) = generated.changed {
                        report.warnings.push(changed);
                    }
                    report.entries.push(Assignment::new(name, generated.id));
                }
                Err(source) => {
                    self.fail(path, &source);
                    return Err(SessionError::Alloc {
                        package: package.name.clone(),
                        source,
                    });
                }
            }
        }
        Ok(report)
    }

    fn open_allocator(&mut self, path: &Path) -> Result<&mut Allocator, SessionError> {
        match self.stores.iter_mut().find(|s| s.adapter.path() == path) {
            Some(open) if open.failed.is_none() => Ok(&mut open.allocator),
            Some(open) => Err(SessionError::StoreFailed {
                path: path.to_path_buf(),
                message: open.failed.clone().unwrap_or_default(),
            }),
            None => Err(SessionError::StoreFailed {
                path: path.to_path_buf(),
                message: "store was never opened".to_string(),
            }),
        }
    }

    /// Finalize and write back every healthy store. Returns the paths written.
    #[tracing::instrument(skip_all, fields(stores = self.stores.len()))]
    pub fn finish(&mut self) -> Result<Vec<PathBuf>, SessionError> {
        let mut written = Vec::new();
        for open in &mut self.stores {
            if let Some(message) = &open.failed {
                tracing::warn!(path = %open.adapter.path().display(), %message, "skipping failed store");
                continue;
            }
            open.allocator.done();
            let text = open.adapter.render(open.allocator.assignments());
            store::write_rendered(open.adapter.path(), &text)?;
            open.allocator.mark_rendered();
            tracing::debug!(
                path = %open.adapter.path().display(),
                entries = open.allocator.assignments().len(),
                "store written"
            );
            written.push(open.adapter.path().to_path_buf());
        }
        Ok(written)
    }
}
