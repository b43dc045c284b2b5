//! Hexbin bin indices
//!
//! A [`BinIndex`] maps a 1-based bin id to the identifiers of the data points the
//! bin aggregates. Bins holding more points than the overflow cap keep a single
//! [`OVERFLOW_SENTINEL`] entry instead of their contents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entry marking a bin whose contents were not tracked
pub const OVERFLOW_SENTINEL: i64 = -1;

/// Default maximum number of identifiers tracked per bin
pub const DEFAULT_OVERFLOW_CAP: usize = 1000;

/// Row label emitted for an overflowed bin
pub fn overflow_label(cap: usize) -> String {
    format!("ThisBinContainsMoreThan{}Entries", cap)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<i64>>",
    into = "BTreeMap<String, Vec<i64>>"
)]
pub struct BinIndex {
    bins: BTreeMap<u32, Vec<i64>>,
}

/// Contents of one bin as seen by a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinContents<'a> {
    Items(&'a [i64]),
    Overflowed,
}

impl BinIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bin: u32, contents: Vec<i64>) {
        self.bins.insert(bin, contents);
    }

    pub fn get(&self, bin: u32) -> Option<BinContents<'_>> {
        self.bins.get(&bin).map(|items| {
            if items.contains(&OVERFLOW_SENTINEL) {
                BinContents::Overflowed
            } else {
                BinContents::Items(items)
            }
        })
    }

    pub fn is_overflowed(&self, bin: u32) -> bool {
        matches!(self.get(bin), Some(BinContents::Overflowed))
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> impl Iterator<Item = u32> + '_ {
        self.bins.keys().copied()
    }
}

impl TryFrom<BTreeMap<String, Vec<i64>>> for BinIndex {
    type Error = String;

    fn try_from(raw: BTreeMap<String, Vec<i64>>) -> Result<Self, Self::Error> {
        let mut bins = BTreeMap::new();
        for (key, contents) in raw {
            let bin: u32 = key
                .trim()
                .parse()
                .map_err(|_| format!("invalid bin id '{}'", key))?;
            if bin == 0 {
                return Err("bin ids are 1-based".to_string());
            }
            bins.insert(bin, contents);
        }
        Ok(Self { bins })
    }
}

impl From<BinIndex> for BTreeMap<String, Vec<i64>> {
    fn from(index: BinIndex) -> Self {
        index
            .bins
            .into_iter()
            .map(|(bin, contents)| (bin.to_string(), contents))
            .collect()
    }
}

/// Builds a [`BinIndex`] from `(bin, identifier)` assignments
#[derive(Debug, Clone)]
pub struct BinIndexBuilder {
    cap: usize,
    bins: BTreeMap<u32, Vec<i64>>,
}

impl Default for BinIndexBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_OVERFLOW_CAP)
    }
}

impl BinIndexBuilder {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            bins: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, bin: u32, id: i64) {
        let entry = self.bins.entry(bin).or_default();
        if entry.first() == Some(&OVERFLOW_SENTINEL) {
            return;
        }
        entry.push(id);
        if entry.len() > self.cap {
            log::debug!("bin {} exceeded {} entries, dropping identities", bin, self.cap);
            entry.clear();
            entry.push(OVERFLOW_SENTINEL);
        }
    }

    pub fn build(self) -> BinIndex {
        BinIndex { bins: self.bins }
    }
}

impl Extend<(u32, i64)> for BinIndexBuilder {
    fn extend<T: IntoIterator<Item = (u32, i64)>>(&mut self, iter: T) {
        for (bin, id) in iter {
            self.push(bin, id);
        }
    }
}
