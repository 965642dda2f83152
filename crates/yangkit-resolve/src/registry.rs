//! The shared module registry.
//!
//! Finished modules are installed here keyed by name and revision.
//! Every later request for the same pair gets the same `Arc`, so a
//! module is parsed and resolved at most once per registry lifetime.

use std::sync::Arc;

use indexmap::IndexMap;
use yangkit_ast::Module;

/// Cache of fully loaded modules.
///
/// Keys are `(name, revision)`; a module compiled from a source without
/// a revision statement is stored under `(name, None)` and only found by
/// revisionless lookups. Insertion order is preserved so listings come
/// out in load order.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: IndexMap<(String, Option<String>), Arc<Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a module, returning the registered instance.
    ///
    /// Installation is idempotent: when the `(name, revision)` pair is
    /// already present the existing entry wins and is returned, and the
    /// argument is dropped.
    pub fn install(&mut self, module: Arc<Module>) -> Arc<Module> {
        let key = (module.name.clone(), module.version.clone());
        self.modules.entry(key).or_insert(module).clone()
    }

    /// Looks up a registered module.
    ///
    /// With a revision the match is exact. Without one the greatest
    /// registered revision of the name wins; `Option` ordering puts any
    /// dated entry above an undated one.
    pub fn find(&self, name: &str, revision: Option<&str>) -> Option<Arc<Module>> {
        match revision {
            Some(rev) => self
                .modules
                .get(&(name.to_string(), Some(rev.to_string())))
                .cloned(),
            None => self
                .modules
                .iter()
                .filter(|((n, _), _)| n == name)
                .max_by(|((_, a), _), ((_, b), _)| a.cmp(b))
                .map(|(_, module)| module.clone()),
        }
    }

    pub fn contains(&self, name: &str, revision: Option<&str>) -> bool {
        self.find(name, revision).is_some()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Registered modules in installation order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Module>> {
        self.modules.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use yangkit_ast::{ModuleKind, Span};

    fn module(name: &str, revision: Option<&str>) -> Arc<Module> {
        let mut module = Module::new(
            name.to_string(),
            ModuleKind::Module,
            PathBuf::from(format!("{}.yang", name)),
            Span::zero(0),
        );
        module.version = revision.map(str::to_string);
        Arc::new(module)
    }

    #[test]
    fn test_install_is_idempotent() {
        let mut registry = ModuleRegistry::new();
        let first = registry.install(module("test", Some("2024-01-15")));
        let second = registry.install(module("test", Some("2024-01-15")));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_exact_revision() {
        let mut registry = ModuleRegistry::new();
        registry.install(module("test", Some("2023-01-01")));
        registry.install(module("test", Some("2024-01-15")));

        let hit = registry.find("test", Some("2023-01-01")).unwrap();
        assert_eq!(hit.version.as_deref(), Some("2023-01-01"));
        assert!(registry.find("test", Some("1999-01-01")).is_none());
    }

    #[test]
    fn test_find_without_revision_takes_greatest() {
        let mut registry = ModuleRegistry::new();
        registry.install(module("test", None));
        registry.install(module("test", Some("2023-01-01")));
        registry.install(module("test", Some("2024-01-15")));

        let hit = registry.find("test", None).unwrap();
        assert_eq!(hit.version.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_distinct_revisions_coexist() {
        let mut registry = ModuleRegistry::new();
        registry.install(module("test", Some("2023-01-01")));
        registry.install(module("test", Some("2024-01-15")));
        registry.install(module("other", None));

        assert_eq!(registry.len(), 3);
        assert!(registry.contains("other", None));
        assert_eq!(registry.iter().count(), 3);
    }
}
