//! The set of ids still available to auto-assignment within one run.
//!
//! ## Notes
//!
//! - Narrow ranges (`max - min < SCALAR_LIMIT`) keep an ascending vector of every available id.
//! - Wide ranges keep a sorted vector of disjoint half-open intervals. Upper bounds are `u64` so that
//!   `max == u32::MAX` stays representable.
//! - Consumption is one-way: there is no release. The representation only ever shrinks, so its size is
//!   bounded by the number of distinct consumed regions.

use std::ops::Range;

use rand::Rng;

/// Range widths below this use the explicit scalar representation.
pub const SCALAR_LIMIT: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Available {
    Scalars(Vec<u32>),
    Intervals(Vec<Range<u64>>),
}

/// Unconsumed ids within an inclusive `[min, max]` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSpace {
    min: u32,
    max: u32,
    available: Available,
}

impl IdSpace {
    /// Build the space for `[min, max]`. `max < min` yields an empty space.
    pub fn new(min: u32, max: u32) -> Self {
        let available = if max < min {
            Available::Scalars(Vec::new())
        } else if max - min < SCALAR_LIMIT {
            Available::Scalars((min..=max).collect())
        } else {
            Available::Intervals(vec![u64::from(min)..u64::from(max) + 1])
        };
        Self { min, max, available }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Whether `id` lies within `[min, max]`, regardless of consumption.
    pub fn in_range(&self, id: u32) -> bool {
        self.min <= id && id <= self.max
    }

    /// Number of ids still available.
    pub fn len(&self) -> u64 {
        match &self.available {
            Available::Scalars(values) => values.len() as u64,
            Available::Intervals(sections) => sections.iter().map(|s| s.end - s.start).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.available {
            Available::Scalars(values) => values.is_empty(),
            Available::Intervals(sections) => sections.is_empty(),
        }
    }

    /// Whether the space uses the interval representation.
    pub fn is_interval_form(&self) -> bool {
        matches!(self.available, Available::Intervals(_))
    }

    /// Available intervals, if the space uses the interval representation.
    pub fn intervals(&self) -> Option<&[Range<u64>]> {
        match &self.available {
            Available::Intervals(sections) => Some(sections),
            Available::Scalars(_) => None,
        }
    }

    /// Whether `id` is still available.
    pub fn contains(&self, id: u32) -> bool {
        match &self.available {
            Available::Scalars(values) => values.binary_search(&id).is_ok(),
            Available::Intervals(sections) => {
                let id = u64::from(id);
                let i = sections.partition_point(|s| s.end <= id);
                i < sections.len() && sections[i].start <= id
            }
        }
    }

    /// Remove `id` from the space. Returns `false` when it was not available.
    pub fn consume(&mut self, id: u32) -> bool {
        match &mut self.available {
            Available::Scalars(values) => match values.binary_search(&id) {
                Ok(i) => {
                    values.remove(i);
                    true
                }
                Err(_) => false,
            },
            Available::Intervals(sections) => {
                let id = u64::from(id);
                let i = sections.partition_point(|s| s.end <= id);
                if i == sections.len() || sections[i].start > id {
                    return false;
                }
                let Range { start, end } = sections[i].clone();
                if end - start == 1 {
                    sections.remove(i);
                } else if id == start {
                    sections[i].start = id + 1;
                } else if id + 1 == end {
                    sections[i].end = id;
                } else {
                    sections[i].start = id + 1;
                    sections.insert(i, start..id);
                }
                true
            }
        }
    }

    /// Pick an available id at random without consuming it.
    ///
    /// The interval form is weighted by interval width, so every remaining id is equally likely.
    /// Returns `None` when the space is exhausted.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u32> {
        match &self.available {
            Available::Scalars(values) => {
                if values.is_empty() {
                    return None;
                }
                Some(values[rng.gen_range(0..values.len())])
            }
            Available::Intervals(sections) => {
                let total: u64 = sections.iter().map(|s| s.end - s.start).sum();
                if total == 0 {
                    return None;
                }
                let mut offset = rng.gen_range(0..total);
                for section in sections {
                    let width = section.end - section.start;
                    if offset < width {
                        return u32::try_from(section.start + offset).ok();
                    }
                    offset -= width;
                }
                None
            }
        }
    }
}
