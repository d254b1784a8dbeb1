use super::package::{PackageId, PackageName, Version};
use super::repo_slug::RepoSlug;
use std::collections::BTreeMap;

/// Dependency name to version constraint, as written in a manifest
pub type DependencyMap = BTreeMap<String, String>;

/// Normalized package metadata plus the canonical (zip) archive bytes.
///
/// Produced by the source resolver and consumed by the rest of the pipeline.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    name: PackageName,
    version: Version,
    repository: Option<RepoSlug>,
    dependencies: DependencyMap,
    dev_dependencies: DependencyMap,
    entry_point: Option<String>,
    readme: String,
    archive: Vec<u8>,
}

impl ResolvedPackage {
    pub fn new(name: PackageName, version: Version, archive: Vec<u8>) -> Self {
        Self {
            name,
            version,
            repository: None,
            dependencies: DependencyMap::new(),
            dev_dependencies: DependencyMap::new(),
            entry_point: None,
            readme: String::new(),
            archive,
        }
    }

    pub fn with_repository(mut self, repository: Option<RepoSlug>) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_dependencies(mut self, runtime: DependencyMap, dev: DependencyMap) -> Self {
        self.dependencies = runtime;
        self.dev_dependencies = dev;
        self
    }

    pub fn with_entry_point(mut self, entry_point: Option<String>) -> Self {
        self.entry_point = entry_point;
        self
    }

    pub fn with_readme(mut self, readme: String) -> Self {
        self.readme = readme;
        self
    }

    pub fn id(&self) -> PackageId {
        PackageId::new(&self.name, &self.version)
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn repository(&self) -> Option<&RepoSlug> {
        self.repository.as_ref()
    }

    /// Runtime `dependencies` only
    pub fn runtime_dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// Union of `dependencies` and `devDependencies`; the runtime
    /// constraint wins when a name appears in both
    pub fn all_dependencies(&self) -> DependencyMap {
        let mut merged = self.dev_dependencies.clone();
        merged.extend(
            self.dependencies
                .iter()
                .map(|(name, constraint)| (name.clone(), constraint.clone())),
        );
        merged
    }

    pub fn entry_point(&self) -> Option<&str> {
        self.entry_point.as_deref()
    }

    pub fn readme(&self) -> &str {
        &self.readme
    }

    pub fn archive(&self) -> &[u8] {
        &self.archive
    }

    /// Replaces the archive bytes (used after debloating)
    pub fn replace_archive(&mut self, archive: Vec<u8>) {
        self.archive = archive;
    }
}
