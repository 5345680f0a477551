//! Perfect-hash member dispatch.
//!
//! For every type the member names are known in full once population ends,
//! so name resolution does not need a general-purpose hash map. Instead each
//! type gets a small decision table built from its static name set:
//!
//! 1. **Length**: names are bucketed by byte length and the bucket is found
//!    by direct indexing. Most probes for non-members stop here.
//! 2. **First character**: inside a bucket, names are grouped by their first
//!    character. A group with a single candidate needs one string compare.
//! 3. **Hash confirmed**: names sharing length and first character keep a
//!    precomputed hash; the input is hashed once and only candidates with an
//!    equal hash are string-compared.
//!
//! Every hit is confirmed by full string equality, so hash collisions inside
//! a group cost an extra compare but never a wrong answer. A name that
//! matches nothing yields `None`; that is the common case, not an error.

use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::fmt::{self, Write as _};
use std::hash::Hasher;
use tracing::warn;
use typestore_common::limits::{INLINE_CANDIDATES, INLINE_CHAR_GROUPS, MAX_MEMBER_NAME_LEN};

/// Hash used for the third tier.
///
/// Deterministic across runs and platforms so that tables built ahead of
/// time stay valid.
#[inline]
pub fn name_hash(name: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(name.as_bytes());
    hasher.finish()
}

/// The tier that resolved a name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DispatchTier {
    /// The only name of its length.
    Length,
    /// The only name of its length and first character.
    FirstChar,
    /// One of several names sharing length and first character.
    HashConfirmed,
}

impl fmt::Display for DispatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DispatchTier::Length => "length",
            DispatchTier::FirstChar => "first-char",
            DispatchTier::HashConfirmed => "hash-confirmed",
        })
    }
}

/// A successful probe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DispatchHit<K> {
    pub key: K,
    pub tier: DispatchTier,
    /// Full string comparisons performed, including the confirming one.
    pub comparisons: u32,
}

#[derive(Clone, Debug)]
struct Candidate<K> {
    hash: u64,
    name: Box<str>,
    key: K,
}

#[derive(Clone, Debug)]
struct CharGroup<K> {
    first: char,
    candidates: SmallVec<[Candidate<K>; INLINE_CANDIDATES]>,
}

#[derive(Clone, Debug)]
struct LengthBucket<K> {
    len: usize,
    groups: SmallVec<[CharGroup<K>; INLINE_CHAR_GROUPS]>,
}

impl<K> LengthBucket<K> {
    fn name_count(&self) -> usize {
        self.groups.iter().map(|g| g.candidates.len()).sum()
    }
}

/// Size breakdown of a table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub names: usize,
    pub length_buckets: usize,
    pub char_groups: usize,
    /// Names that can only be reached through the hash-confirmed tier.
    pub hashed_names: usize,
}

/// Name -> key decision table for one type's members of one kind.
#[derive(Clone, Debug)]
pub struct DispatchTable<K> {
    /// Indexed by name length; `u32::MAX` marks an empty slot.
    slots: Box<[u32]>,
    buckets: Vec<LengthBucket<K>>,
    names: usize,
}

const EMPTY_SLOT: u32 = u32::MAX;

impl<K: Copy> Default for DispatchTable<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: Copy> DispatchTable<K> {
    /// A table that resolves nothing.
    pub fn empty() -> Self {
        Self {
            slots: Box::new([]),
            buckets: Vec::new(),
            names: 0,
        }
    }

    /// Build a table from `(name, key)` pairs.
    ///
    /// Duplicate names keep the last key, matching the registry's name index.
    /// The length tier indexes directly by byte length, so names longer than
    /// `MAX_MEMBER_NAME_LEN` are skipped; the registries never accept them.
    pub fn build<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, K)>,
        S: AsRef<str>,
    {
        Self::build_with_hasher(entries, name_hash)
    }

    pub(crate) fn build_with_hasher<I, S>(entries: I, hash: fn(&str) -> u64) -> Self
    where
        I: IntoIterator<Item = (S, K)>,
        S: AsRef<str>,
    {
        let mut buckets: Vec<LengthBucket<K>> = Vec::new();
        let mut names = 0usize;

        for (name, key) in entries {
            let name = name.as_ref();
            let len = name.len();
            if len > MAX_MEMBER_NAME_LEN {
                warn!(len, "DispatchTable::build - skipping oversized member name");
                continue;
            }
            let first = name.chars().next().unwrap_or('\0');

            let bucket_idx = match buckets.iter().position(|b| b.len == len) {
                Some(idx) => idx,
                None => {
                    buckets.push(LengthBucket {
                        len,
                        groups: SmallVec::new(),
                    });
                    buckets.len() - 1
                }
            };
            let bucket = &mut buckets[bucket_idx];

            let group_idx = match bucket.groups.iter().position(|g| g.first == first) {
                Some(idx) => idx,
                None => {
                    bucket.groups.push(CharGroup {
                        first,
                        candidates: SmallVec::new(),
                    });
                    bucket.groups.len() - 1
                }
            };
            let group = &mut bucket.groups[group_idx];

            if let Some(existing) = group.candidates.iter_mut().find(|c| &*c.name == name) {
                existing.key = key;
                continue;
            }
            group.candidates.push(Candidate {
                hash: hash(name),
                name: name.into(),
                key,
            });
            names += 1;
        }

        // Deterministic layout: buckets by length, groups by first character.
        buckets.sort_by_key(|b| b.len);
        for bucket in &mut buckets {
            bucket.groups.sort_by_key(|g| g.first);
        }

        let max_len = buckets.last().map_or(0, |b| b.len);
        let mut slots = vec![EMPTY_SLOT; if buckets.is_empty() { 0 } else { max_len + 1 }];
        for (idx, bucket) in buckets.iter().enumerate() {
            slots[bucket.len] = idx as u32;
        }

        Self {
            slots: slots.into_boxed_slice(),
            buckets,
            names,
        }
    }

    /// Resolve a name to its key.
    #[inline]
    pub fn resolve(&self, name: &str) -> Option<K> {
        self.probe(name).map(|hit| hit.key)
    }

    /// Resolve a name and report which tier answered.
    pub fn probe(&self, name: &str) -> Option<DispatchHit<K>> {
        self.probe_with_hasher(name, name_hash)
    }

    pub(crate) fn probe_with_hasher(
        &self,
        name: &str,
        hash: fn(&str) -> u64,
    ) -> Option<DispatchHit<K>> {
        // Tier 1: length.
        let slot = *self.slots.get(name.len())?;
        if slot == EMPTY_SLOT {
            return None;
        }
        let bucket = &self.buckets[slot as usize];
        let single_in_bucket = bucket.groups.len() == 1 && bucket.groups[0].candidates.len() == 1;

        // Tier 2: first character.
        let first = name.chars().next().unwrap_or('\0');
        let group = bucket.groups.iter().find(|g| g.first == first)?;

        if let [only] = group.candidates.as_slice() {
            if &*only.name != name {
                return None;
            }
            let tier = if single_in_bucket {
                DispatchTier::Length
            } else {
                DispatchTier::FirstChar
            };
            return Some(DispatchHit {
                key: only.key,
                tier,
                comparisons: 1,
            });
        }

        // Tier 3: hash, confirmed by equality.
        let input_hash = hash(name);
        let mut comparisons = 0;
        for candidate in &group.candidates {
            if candidate.hash != input_hash {
                continue;
            }
            comparisons += 1;
            if &*candidate.name == name {
                return Some(DispatchHit {
                    key: candidate.key,
                    tier: DispatchTier::HashConfirmed,
                    comparisons,
                });
            }
        }
        None
    }

    /// Number of distinct names in the table.
    pub fn len(&self) -> usize {
        self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names == 0
    }

    pub fn stats(&self) -> DispatchStats {
        let mut stats = DispatchStats {
            names: self.names,
            length_buckets: self.buckets.len(),
            ..DispatchStats::default()
        };
        for bucket in &self.buckets {
            stats.char_groups += bucket.groups.len();
            stats.hashed_names += bucket
                .groups
                .iter()
                .filter(|g| g.candidates.len() > 1)
                .map(|g| g.candidates.len())
                .sum::<usize>();
        }
        stats
    }

    /// Human-readable layout of the table, one line per decision.
    ///
    /// Buckets, groups and candidates appear in table order, so the output is
    /// stable for a given name set.
    pub fn plan(&self) -> String
    where
        K: fmt::Display,
    {
        let mut out = String::new();
        if self.buckets.is_empty() {
            out.push_str("(no members)\n");
            return out;
        }
        for bucket in &self.buckets {
            let _ = writeln!(out, "len {} ({} names)", bucket.len, bucket.name_count());
            for group in &bucket.groups {
                if bucket.name_count() == 1 {
                    let only = &group.candidates[0];
                    let _ = writeln!(out, "  == {:?} -> {}", only.name, only.key);
                    continue;
                }
                let _ = writeln!(out, "  first {:?}", group.first);
                if let [only] = group.candidates.as_slice() {
                    let _ = writeln!(out, "    == {:?} -> {}", only.name, only.key);
                    continue;
                }
                for candidate in &group.candidates {
                    let _ = writeln!(
                        out,
                        "    hash {:#018x} && == {:?} -> {}",
                        candidate.hash, candidate.name, candidate.key
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../tests/dispatch_tests.rs"]
mod tests;
