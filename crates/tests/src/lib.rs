//! Integration test harness for yangkit.
//!
//! Provides a scratch module directory plus a loader wired to search it,
//! so end-to-end tests can write YANG sources to disk and load them by
//! name exactly the way an application would: Locate → Parse →
//! Resolve → Register.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use yangkit::{
    DiagnosticFormatter, ErrorKind, LoadOptions, LoadResult, Loader, Module, ModuleRegistry,
    SearchPaths,
};

/// Test harness loading YANG modules from a scratch directory.
pub struct LoadHarness {
    dir: TempDir,
    loader: Loader,
}

impl LoadHarness {
    /// Creates a harness over a fresh scratch directory.
    ///
    /// The loader searches only that directory; the environment and the
    /// installed module tree are never consulted.
    ///
    /// # Panics
    ///
    /// Panics if the scratch directory cannot be created.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("scratch directory");
        let mut paths = SearchPaths::empty();
        paths.cwd = dir.path().to_path_buf();
        Self {
            dir,
            loader: Loader::new(paths),
        }
    }

    /// Writes `source` as `<name>.yang` in the scratch directory.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, name: &str, source: &str) -> PathBuf {
        self.write_file(&format!("{}.yang", name), source)
    }

    /// Writes a file with the exact name given, such as
    /// `lib@2024-01-15.yang` or `vendor/acme.yang`, creating
    /// intermediate directories as needed.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_file(&self, file: &str, source: &str) -> PathBuf {
        let path = self.dir.path().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create module subdirectory");
        }
        fs::write(&path, source).expect("write module source");
        path
    }

    /// Removes a previously written file.
    ///
    /// # Panics
    ///
    /// Panics if the file does not exist.
    pub fn remove(&self, file: &str) {
        fs::remove_file(self.dir.path().join(file)).expect("remove module source");
    }

    /// The scratch directory being searched.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Loads a module by name with default options.
    pub fn load(&mut self, name: &str) -> LoadResult {
        self.loader.load(name, None, &LoadOptions::default())
    }

    /// Loads a module with an explicit revision and options.
    pub fn load_with(
        &mut self,
        name: &str,
        revision: Option<&str>,
        options: &LoadOptions,
    ) -> LoadResult {
        self.loader.load(name, revision, options)
    }

    /// Loads a module and unwraps the record.
    ///
    /// # Panics
    ///
    /// Panics when the load produced no record at all. A load that
    /// merely carries diagnostics still returns its record.
    pub fn load_ok(&mut self, name: &str) -> Arc<Module> {
        let result = self.load(name);
        match result.module.clone() {
            Some(module) => module,
            None => panic!("module '{}' did not load:\n{}", name, self.render(&result)),
        }
    }

    /// The loader's registry of installed modules.
    pub fn registry(&self) -> &ModuleRegistry {
        self.loader.registry()
    }

    /// Renders a result's diagnostics the way the CLI would.
    pub fn render(&self, result: &LoadResult) -> String {
        DiagnosticFormatter::new(self.loader.sources()).format_all(result.diagnostics.as_slice())
    }
}

impl Default for LoadHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts the diagnostics of one kind in a result.
pub fn kind_count(result: &LoadResult, kind: ErrorKind) -> usize {
    result
        .diagnostics
        .iter()
        .filter(|error| error.kind == kind)
        .count()
}
