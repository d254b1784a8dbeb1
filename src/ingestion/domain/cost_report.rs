use serde::Serialize;
use std::collections::BTreeMap;

/// How far the dependency cost walk goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostScope {
    /// Only the stored archive of the package itself
    RootOnly,
    /// The package's direct dependencies
    #[default]
    FirstLevel,
    /// Direct dependencies and everything they pull in, up to the depth limit
    Transitive,
}

/// Unpacked size of one resolved dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostEntry {
    pub package_name: String,
    pub package_version: String,
    pub unpacked_size_bytes: u64,
}

impl CostEntry {
    pub fn key(&self) -> String {
        format!("{}@{}", self.package_name, self.package_version)
    }
}

/// Result of a dependency cost walk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CostReport {
    total_bytes: u64,
    per_dependency: BTreeMap<String, CostEntry>,
    unresolved: Vec<String>,
}

impl CostReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry unless one with the same `name@version` is already
    /// counted. Returns whether the entry was new.
    pub fn add(&mut self, entry: CostEntry) -> bool {
        let key = entry.key();
        if self.per_dependency.contains_key(&key) {
            return false;
        }
        self.total_bytes = self.total_bytes.saturating_add(entry.unpacked_size_bytes);
        self.per_dependency.insert(key, entry);
        true
    }

    pub fn add_unresolved(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.unresolved.contains(&name) {
            self.unresolved.push(name);
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn per_dependency(&self) -> &BTreeMap<String, CostEntry> {
        &self.per_dependency
    }

    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }
}
