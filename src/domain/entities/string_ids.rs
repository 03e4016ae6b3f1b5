//! String-id repository entity
//!
//! Remembers the string behind every id handed out during a build so that
//! ids found in compiled data can be resolved back for debugging.

use std::collections::BTreeMap;

use crate::domain::value_objects::StringId64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringIdRepository {
    strings: BTreeMap<u64, String>,
}

impl StringIdRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the id of `s` and remember the mapping
    pub fn record(&mut self, s: &str) -> StringId64 {
        let id = StringId64::of(s);
        self.strings
            .entry(id.raw())
            .or_insert_with(|| s.to_string());
        id
    }

    /// Insert a known mapping (used when loading)
    pub fn insert(&mut self, id: u64, s: String) {
        self.strings.insert(id, s);
    }

    pub fn lookup(&self, id: u64) -> Option<&str> {
        self.strings.get(&id).map(String::as_str)
    }

    /// Reverse lookup of a 32-bit id
    pub fn lookup32(&self, id: u32) -> Option<&str> {
        self.strings
            .iter()
            .find(|(raw, _)| StringId64::from_raw(**raw).to_u32() == id)
            .map(|(_, s)| s.as_str())
    }

    /// Resolve `0x...` notation: up to 8 hex digits is a 32-bit id
    pub fn lookup_hex(&self, hex: &str) -> Option<&str> {
        let raw = StringId64::parse_hex(hex)?;
        let digits = hex.len() - 2;
        if digits <= 8 {
            self.lookup32(raw as u32)
        } else {
            self.lookup(raw)
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (u64, &str)> {
        self.strings.iter().map(|(id, s)| (*id, s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
