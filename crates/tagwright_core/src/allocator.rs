//! Stable type-tag allocation for one generation run.
//!
//! An [`Allocator`] wraps the *previous* registry loaded from the sidecar store, a *pending* registry
//! that grows as the generator discovers entities, and the [`IdSpace`] of the current range.
//!
//! ## Notes
//!
//! - Auto-assigned names keep their previous id whenever it is still inside `[min, max]`.
//! - [`Allocator::done`] carries forward previous assignments nobody asked for, so a retired name's
//!   id is never handed to a different name by a later run. Carried ids are not range-checked: a
//!   narrowed range does not evict ids that were already committed.
//! - Fatal errors never mutate the allocator.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::errors::{AllocError, ChangedId};
use crate::registry::{Assignment, Conflict, Registry};
use crate::space::IdSpace;

/// Forward-only lifecycle of an allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    LoadingPrevious,
    AcceptingRequests,
    Finalizing,
    Rendered,
}

/// Result of a successful [`Allocator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub id: u32,
    pub changed: Option<ChangedId>,
}

#[derive(Debug)]
pub struct Allocator {
    min: u32,
    max: u32,
    previous: Registry,
    pending: Registry,
    space: IdSpace,
    warnings: Vec<ChangedId>,
    phase: Phase,
    rng: StdRng,
}

impl Allocator {
    /// Create an allocator for `[min, max]` seeded from OS entropy.
    pub fn new(min: u32, max: u32) -> Self {
        Self::with_rng(min, max, StdRng::from_entropy())
    }

    /// Create an allocator whose auto-assignments are reproducible.
    pub fn with_seed(min: u32, max: u32, seed: u64) -> Self {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    fn with_rng(min: u32, max: u32, rng: StdRng) -> Self {
        Self {
            min,
            max,
            previous: Registry::new(),
            pending: Registry::new(),
            space: IdSpace::new(min, max),
            warnings: Vec::new(),
            phase: Phase::LoadingPrevious,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn range(&self) -> (u32, u32) {
        (self.min, self.max)
    }

    pub fn previous(&self) -> &Registry {
        &self.previous
    }

    pub fn pending(&self) -> &Registry {
        &self.pending
    }

    pub fn space(&self) -> &IdSpace {
        &self.space
    }

    /// Change warnings raised so far, in request order.
    pub fn warnings(&self) -> &[ChangedId] {
        &self.warnings
    }

    /// Pending assignments. Sorted by id once [`Allocator::done`] has run.
    pub fn assignments(&self) -> &[Assignment] {
        self.pending.as_slice()
    }

    /// Record a persisted assignment. No range validation: legacy ids outside a since-narrowed range
    /// must still be recognized as previously assigned.
    pub fn load_previous(&mut self, name: &str, id: u32) -> Result<(), AllocError> {
        debug_assert_eq!(self.phase, Phase::LoadingPrevious);
        match self.previous.insert(name, id) {
            Ok(_) => Ok(()),
            Err(Conflict::Id { existing }) => Err(AllocError::PreviousConflict {
                name: name.to_string(),
                id,
                existing,
            }),
            Err(Conflict::Name { existing }) => Err(AllocError::PreviousConflict {
                name: name.to_string(),
                id,
                existing: format!("{name} = {existing}"),
            }),
        }
    }

    /// Re-scope the allocator to a new range, re-consuming every pending id.
    pub fn set_range(&mut self, min: u32, max: u32) {
        if (min, max) == (self.min, self.max) {
            return;
        }
        self.min = min;
        self.max = max;
        self.space = IdSpace::new(min, max);
        for a in self.pending.iter() {
            self.space.consume(a.id);
        }
        tracing::debug!(min, max, pending = self.pending.len(), "allocator range changed");
    }

    /// Assign an id to `name`.
    ///
    /// `requested_id` is an explicit override; its range validity is the caller's concern. Without
    /// one, the previous id is reused when still in range, otherwise a fresh id is drawn.
    pub fn generate(&mut self, name: &str, requested_id: Option<u32>) -> Result<Generated, AllocError> {
        if self.phase >= Phase::Finalizing {
            return Err(AllocError::Finalized { name: name.to_string() });
        }
        self.phase = Phase::AcceptingRequests;

        if self.pending.by_name(name).is_some() {
            return Err(AllocError::DuplicateName { name: name.to_string() });
        }

        let old_id = self.previous.by_name(name);
        let id = match (requested_id, old_id) {
            (Some(id), _) => id,
            (None, Some(old)) if self.space.in_range(old) => old,
            (None, _) => self.space.draw(&mut self.rng).ok_or_else(|| AllocError::Exhausted {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            })?,
        };

        if let Err(conflict) = self.pending.insert(name, id) {
            let existing = match conflict {
                Conflict::Id { existing } => existing,
                Conflict::Name { .. } => name.to_string(),
            };
            return Err(AllocError::DuplicateId {
                id,
                existing,
                requested: name.to_string(),
            });
        }
        if self.space.in_range(id) {
            self.space.consume(id);
        }

        let changed = match old_id {
            Some(old) if old != id => {
                let warning = ChangedId {
                    name: name.to_string(),
                    old,
                    new: id,
                };
                tracing::warn!(name, old, new = id, "type id changed");
                self.warnings.push(warning.clone());
                Some(warning)
            }
            _ => None,
        };
        if old_id.is_some() {
            self.previous.remove(name);
        }

        Ok(Generated { id, changed })
    }

    /// Carry forward unmatched previous assignments and sort pending by id. Idempotent.
    #[tracing::instrument(skip_all, fields(pending = self.pending.len(), previous = self.previous.len()))]
    pub fn done(&mut self) {
        if self.phase >= Phase::Finalizing {
            return;
        }
        let mut carried = 0usize;
        for a in self.previous.iter() {
            if self.pending.by_name(&a.name).is_some() || self.pending.by_id(a.id).is_some() {
                continue;
            }
            if let Ok(true) = self.pending.insert(&a.name, a.id) {
                self.space.consume(a.id);
                carried += 1;
            }
        }
        self.pending.sort_by_id();
        self.phase = Phase::Finalizing;
        tracing::debug!(carried, total = self.pending.len(), "allocator finalized");
    }

    /// Record that the pending table was written back out.
    pub fn mark_rendered(&mut self) {
        self.done();
        self.phase = Phase::Rendered;
    }
}
