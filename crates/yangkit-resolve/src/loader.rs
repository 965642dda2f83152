//! The dependency-driven module loader.
//!
//! Loading a module is not one parse but a small traversal: the front of
//! the file names imports and includes, each of those is a module of its
//! own, and references cannot resolve until the whole unit is in memory.
//! The loader runs that traversal with an explicit frame stack instead
//! of recursion:
//!
//! 1. Locate the file, tokenize it, and parse the front (header,
//!    linkage, meta, revisions). The body is left unparsed; the spot is
//!    remembered.
//! 2. Queue the record's imports and includes as pending work.
//! 3. Drive the stack: each step either settles the top frame's next
//!    dependency (cache hit, cycle, failure, or a new frame) or, when
//!    none remain, finishes the frame by parsing its deferred body.
//! 4. When a module frame finishes, resolve references across the unit
//!    (module plus collected submodules), freeze the records behind
//!    `Arc`s, and install the result in the registry.
//!
//! Dependency failures are not fatal. A missing import leaves the slot
//! unresolved and errors the importer; a failed include does the same
//! for its unit. Cycles are detected against the active chains before
//! anything is opened twice, so the traversal always terminates.

use std::fs;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use logos::Logos;
use tracing::{debug, info, trace};
use yangkit_ast::{
    Diagnostics, ErrorKind, LoadStatus, Module, ModuleKind, SourceMap, Span, YangError,
};
use yangkit_lexer::Token;
use yangkit_parser::{TokenStream, parse_body, parse_front};

use crate::context::{ChainEntry, LoadOptions, ResolutionContext, revisions_compatible};
use crate::locate::{LocateError, SearchPaths};
use crate::registry::ModuleRegistry;
use crate::resolve::resolve_unit;

/// Base NETCONF module whose toolkit copy takes precedence.
const NETCONF_MODULE: &str = "ietf-netconf";
/// Enriched replacement the toolkit ships for [`NETCONF_MODULE`].
const NETCONF_SUBSTITUTE: &str = "yangkit-netconf";

/// Outcome of one [`Loader::load`] call.
#[derive(Debug)]
pub struct LoadResult {
    /// The requested module, present for every non-fatal outcome.
    pub module: Option<Arc<Module>>,
    /// Worst severity across the whole load.
    pub status: LoadStatus,
    /// Every diagnostic the load produced, in load order.
    pub diagnostics: Diagnostics,
}

/// Loads modules and their dependency closures.
///
/// The loader owns the registry of finished modules and the source map
/// behind every span it ever produced, so diagnostics from one load can
/// still be formatted after later loads.
pub struct Loader {
    paths: SearchPaths,
    registry: ModuleRegistry,
    sources: SourceMap,
}

/// Which dependency statement queued a piece of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DepKind {
    Import,
    Include,
}

/// One module file mid-load.
struct Frame {
    module: Module,
    /// Token buffer for the deferred body parse.
    tokens: Vec<(Token, Range<usize>)>,
    file_id: u16,
    /// Stream position just past the front sections.
    resume_pos: usize,
    diags: Diagnostics,
    /// Dependency slots still to settle, imports before includes.
    pending: Vec<(DepKind, usize)>,
    cursor: usize,
    /// The slot in the parent frame that requested this one.
    origin: Option<(DepKind, usize)>,
    /// Submodules finished under this frame, in completion order.
    /// Only used on module frames.
    unit_submodules: Vec<Module>,
}

/// A dependency slot lifted out of a frame, ready to settle.
struct Dependency {
    kind: DepKind,
    slot: usize,
    name: String,
    revision: Option<String>,
    span: Span,
}

enum Step {
    Dependency(Dependency),
    Finished,
}

/// Why a file could not produce a record at all.
enum OpenFailure {
    /// No file anywhere on the search path; carries the rendered
    /// locate message.
    NotFound(String),
    /// The file exists only in a format this build does not parse.
    Unsupported(PathBuf),
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
    /// The file was read but the front could not produce a record.
    Parse { kind: ErrorKind, diags: Diagnostics },
}

impl OpenFailure {
    fn kind(&self) -> ErrorKind {
        match self {
            OpenFailure::NotFound(_) => ErrorKind::ModuleNotFound,
            OpenFailure::Unsupported(_) => ErrorKind::UnsupportedFormat,
            OpenFailure::Io { .. } => ErrorKind::Io,
            OpenFailure::Parse { kind, .. } => *kind,
        }
    }
}

impl Loader {
    pub fn new(paths: SearchPaths) -> Self {
        Self {
            paths,
            registry: ModuleRegistry::new(),
            sources: SourceMap::new(),
        }
    }

    /// A loader over the search paths taken from the environment.
    pub fn from_env() -> Self {
        Self::new(SearchPaths::from_env())
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Consumes the loader, yielding the accumulated source map.
    pub fn into_sources(self) -> SourceMap {
        self.sources
    }

    /// Loads a module and everything it depends on.
    ///
    /// `name` is a module name to search for, or an explicit path to a
    /// module file. Returns the finished module for every non-fatal
    /// outcome; whether an errored module is worth keeping is the
    /// caller's call, the registry only keeps it under
    /// [`LoadOptions::keep_partial`].
    pub fn load(&mut self, name: &str, revision: Option<&str>, options: &LoadOptions) -> LoadResult {
        debug!(module = name, ?revision, "load requested");

        // An earlier load already finished this module.
        if let Some(cached) = self.lookup_cached(name, revision) {
            debug!(module = name, "registry hit");
            return LoadResult {
                status: cached.status(),
                module: Some(cached),
                diagnostics: Diagnostics::new(),
            };
        }

        if options.search_only {
            return self.search_header(name, revision, options);
        }

        let mut ctx = ResolutionContext::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut result: Option<Arc<Module>> = None;

        match self.open_frame(name, revision, ModuleKind::Module, options, None) {
            Ok(frame) => {
                ctx.import_chain.push(ChainEntry {
                    name: name.to_string(),
                    revision: revision.map(str::to_string),
                    span: frame.module.span,
                });
                stack.push(frame);
            }
            Err(failure) => {
                report_top_failure(name, failure, &mut ctx.report);
                return LoadResult {
                    module: None,
                    status: ctx.report.status(),
                    diagnostics: ctx.report,
                };
            }
        }

        while !stack.is_empty() {
            match next_step(&mut stack) {
                Step::Dependency(dep) => match dep.kind {
                    DepKind::Import => self.handle_import(&mut stack, &mut ctx, options, dep),
                    DepKind::Include => self.handle_include(&mut stack, &mut ctx, options, dep),
                },
                Step::Finished => self.finish_frame(&mut stack, &mut ctx, options, &mut result),
            }
        }

        LoadResult {
            module: result,
            status: ctx.report.status(),
            diagnostics: ctx.report,
        }
    }

    /// Registry lookup with the NETCONF base-module substitution.
    ///
    /// The toolkit ships its own enriched copy of the base NETCONF
    /// module; a request for the stock name is satisfied by that copy
    /// whenever it is registered, and a parsed stock copy is never
    /// installed over it.
    fn lookup_cached(&self, name: &str, revision: Option<&str>) -> Option<Arc<Module>> {
        if name == NETCONF_MODULE {
            if let Some(substitute) = self.registry.find(NETCONF_SUBSTITUTE, None) {
                debug!(
                    requested = NETCONF_MODULE,
                    substituted = NETCONF_SUBSTITUTE,
                    "base module substitution"
                );
                return Some(substitute);
            }
        }
        self.registry.find(name, revision)
    }

    /// Header-only load: locate, parse the front, stop.
    ///
    /// No dependency is opened, nothing is installed; the caller gets
    /// the record with its linkage and revision sections filled.
    fn search_header(
        &mut self,
        name: &str,
        revision: Option<&str>,
        options: &LoadOptions,
    ) -> LoadResult {
        match self.open_frame(name, revision, ModuleKind::Module, options, None) {
            Ok(mut frame) => {
                frame.module.errors = frame.diags.error_count() as u32;
                frame.module.warnings = frame.diags.warning_count() as u32;
                LoadResult {
                    status: frame.diags.status(),
                    module: Some(Arc::new(frame.module)),
                    diagnostics: frame.diags,
                }
            }
            Err(failure) => {
                let mut report = Diagnostics::new();
                report_top_failure(name, failure, &mut report);
                LoadResult {
                    module: None,
                    status: report.status(),
                    diagnostics: report,
                }
            }
        }
    }

    /// Settles one import slot of the top frame.
    fn handle_import(
        &mut self,
        stack: &mut Vec<Frame>,
        ctx: &mut ResolutionContext,
        options: &LoadOptions,
        dep: Dependency,
    ) {
        let rev = dep.revision.as_deref();

        // Replay a failure recorded earlier in this load.
        if let Some(kind) = ctx.find_failed(&dep.name, rev) {
            let frame = top(stack);
            frame
                .diags
                .push(dependency_failure_error(kind, dep.kind, &dep.name, dep.span));
            frame.module.imports[dep.slot].status = LoadStatus::Error;
            return;
        }

        if let Some(cached) = self.lookup_cached(&dep.name, rev) {
            trace!(module = %dep.name, "import satisfied from registry");
            bind_import(top(stack), dep.slot, cached);
            return;
        }

        if let Some(done) = ctx.find_completed(&dep.name, rev) {
            trace!(module = %dep.name, "import satisfied from this load");
            bind_import(top(stack), dep.slot, done);
            return;
        }

        // The request would re-enter a module already being loaded.
        if ctx.on_import_chain(&dep.name, rev) {
            let chain: Vec<&str> = ctx.import_chain.iter().map(|e| e.name.as_str()).collect();
            let frame = top(stack);
            frame.diags.push(
                YangError::new(
                    ErrorKind::ImportCycle,
                    dep.span,
                    format!("import cycle: {} → {}", chain.join(" → "), dep.name),
                )
                .with_note("the import is left unresolved".to_string()),
            );
            frame.module.imports[dep.slot].status = LoadStatus::Error;
            return;
        }

        if stack.len() >= options.max_depth {
            let frame = top(stack);
            frame.diags.push(YangError::new(
                ErrorKind::Internal,
                dep.span,
                format!("dependency nesting deeper than {} levels", options.max_depth),
            ));
            frame.module.imports[dep.slot].status = LoadStatus::Error;
            return;
        }

        match self.open_frame(
            &dep.name,
            rev,
            ModuleKind::Module,
            options,
            Some((DepKind::Import, dep.slot)),
        ) {
            Ok(frame) => {
                ctx.import_chain.push(ChainEntry {
                    name: dep.name,
                    revision: dep.revision,
                    span: dep.span,
                });
                stack.push(frame);
            }
            Err(failure) => {
                let kind = failure.kind();
                // The failed file's own diagnostics go to the report;
                // the import site gets a one-line consequence.
                if let OpenFailure::Parse { diags, .. } = failure {
                    ctx.report.merge(diags);
                }
                ctx.failed.insert((dep.name.clone(), dep.revision), kind);
                let frame = top(stack);
                frame
                    .diags
                    .push(dependency_failure_error(kind, dep.kind, &dep.name, dep.span));
                frame.module.imports[dep.slot].status = LoadStatus::Error;
            }
        }
    }

    /// Settles one include slot of the top frame.
    fn handle_include(
        &mut self,
        stack: &mut Vec<Frame>,
        ctx: &mut ResolutionContext,
        options: &LoadOptions,
        dep: Dependency,
    ) {
        let rev = dep.revision.as_deref();
        let owner = unit_owner(stack);

        // A sibling include chain may have finished this submodule
        // already; each submodule is read once per unit.
        let memo = stack[owner]
            .unit_submodules
            .iter()
            .find(|sub| sub.name == dep.name && revisions_compatible(sub.version.as_deref(), rev))
            .map(|sub| sub.status());
        if let Some(status) = memo {
            trace!(submodule = %dep.name, "include satisfied from unit");
            top(stack).module.includes[dep.slot].status = status;
            return;
        }

        if let Some(kind) = ctx.find_failed(&dep.name, rev) {
            let frame = top(stack);
            frame
                .diags
                .push(dependency_failure_error(kind, dep.kind, &dep.name, dep.span));
            frame.module.includes[dep.slot].status = LoadStatus::Error;
            return;
        }

        if ctx.on_include_chain(&dep.name, rev) {
            let chain: Vec<&str> = ctx.include_chain.iter().map(|e| e.name.as_str()).collect();
            let frame = top(stack);
            frame.diags.push(
                YangError::new(
                    ErrorKind::IncludeCycle,
                    dep.span,
                    format!("include cycle: {} → {}", chain.join(" → "), dep.name),
                )
                .with_note("the include is left unresolved".to_string()),
            );
            frame.module.includes[dep.slot].status = LoadStatus::Error;
            return;
        }

        if stack.len() >= options.max_depth {
            let frame = top(stack);
            frame.diags.push(YangError::new(
                ErrorKind::Internal,
                dep.span,
                format!("dependency nesting deeper than {} levels", options.max_depth),
            ));
            frame.module.includes[dep.slot].status = LoadStatus::Error;
            return;
        }

        match self.open_frame(
            &dep.name,
            rev,
            ModuleKind::Submodule,
            options,
            Some((DepKind::Include, dep.slot)),
        ) {
            Ok(child) => {
                // A submodule claiming a different owner is refused, not
                // adopted; its text never joins this unit.
                let owner_name = stack[owner].module.name.clone();
                if let Some(belongs) = &child.module.belongs_to {
                    if belongs.module != owner_name {
                        let error = YangError::new(
                            ErrorKind::WrongModuleType,
                            belongs.span,
                            format!(
                                "submodule '{}' belongs to module '{}', not '{}'",
                                child.module.name, belongs.module, owner_name
                            ),
                        );
                        ctx.failed
                            .insert((dep.name, dep.revision), ErrorKind::WrongModuleType);
                        let frame = top(stack);
                        frame.diags.merge(child.diags);
                        frame.diags.push(error);
                        frame.module.includes[dep.slot].status = LoadStatus::Error;
                        return;
                    }
                }
                ctx.include_chain.push(ChainEntry {
                    name: dep.name,
                    revision: dep.revision,
                    span: dep.span,
                });
                stack.push(child);
            }
            Err(failure) => {
                let kind = failure.kind();
                // Submodule diagnostics belong to the including unit.
                if let OpenFailure::Parse { diags, .. } = failure {
                    top(stack).diags.merge(diags);
                }
                ctx.failed.insert((dep.name.clone(), dep.revision), kind);
                let frame = top(stack);
                frame
                    .diags
                    .push(dependency_failure_error(kind, dep.kind, &dep.name, dep.span));
                frame.module.includes[dep.slot].status = LoadStatus::Error;
            }
        }
    }

    /// Locates, reads, tokenizes, and front-parses one module file.
    fn open_frame(
        &mut self,
        name: &str,
        revision: Option<&str>,
        expect: ModuleKind,
        options: &LoadOptions,
        origin: Option<(DepKind, usize)>,
    ) -> Result<Frame, OpenFailure> {
        let path = match self.paths.locate(name, revision, options.search_subdirs) {
            Ok(path) => path,
            Err(err @ LocateError::NotFound { .. }) => {
                return Err(OpenFailure::NotFound(err.to_string()));
            }
            Err(LocateError::Io { path, source }) => {
                return Err(OpenFailure::Io {
                    path,
                    error: source,
                });
            }
        };

        if path.extension().is_some_and(|ext| ext == "yin") {
            return Err(OpenFailure::Unsupported(path));
        }

        debug!(module = name, path = %path.display(), "reading module file");
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) => return Err(OpenFailure::Io { path, error }),
        };

        // Tokenize before the text moves into the source map; the
        // tokens own their string contents.
        let mut tokens: Vec<(Token, Range<usize>)> = Vec::new();
        let mut bad_ranges: Vec<Range<usize>> = Vec::new();
        for (result, range) in Token::lexer(&text).spanned() {
            match result {
                Ok(token) => tokens.push((token, range)),
                Err(()) => bad_ranges.push(range),
            }
        }

        let source_path = path.clone();
        let file_id = self.sources.add_file(path, text);

        let mut diags = Diagnostics::new();
        for range in bad_ranges {
            diags.push(
                YangError::new(
                    ErrorKind::Syntax,
                    Span::new(file_id, range.start as u32, range.end as u32, 0),
                    "malformed token".to_string(),
                )
                .with_note(
                    "double-quoted strings support only \\n, \\t, \\\" and \\\\ escapes"
                        .to_string(),
                ),
            );
        }

        let mut stream = TokenStream::new(&tokens, file_id);
        let module = match parse_front(&mut stream, &mut diags, Some(expect), &source_path) {
            Ok(module) => module,
            Err(fatal) => {
                let kind = fatal.kind;
                diags.push(fatal);
                return Err(OpenFailure::Parse { kind, diags });
            }
        };

        if module.kind != expect {
            return Err(OpenFailure::Parse {
                kind: ErrorKind::WrongModuleType,
                diags,
            });
        }

        // A located file satisfies a pinned request only if its selected
        // revision agrees; a bare-name fallback can legitimately differ.
        if let Some(requested) = revision {
            if module.version.as_deref() != Some(requested) {
                diags.push(YangError::new(
                    ErrorKind::RevisionMismatch,
                    module.span,
                    format!(
                        "requested revision {} of {} '{}', found {}",
                        requested,
                        module.kind,
                        module.name,
                        module.version.as_deref().unwrap_or("none")
                    ),
                ));
            }
        }

        let resume_pos = stream.current_pos();
        let mut pending: Vec<(DepKind, usize)> = Vec::new();
        pending.extend((0..module.imports.len()).map(|i| (DepKind::Import, i)));
        pending.extend((0..module.includes.len()).map(|i| (DepKind::Include, i)));

        trace!(
            module = %module.name,
            imports = module.imports.len(),
            includes = module.includes.len(),
            "front parsed"
        );

        Ok(Frame {
            module,
            tokens,
            file_id,
            resume_pos,
            diags,
            pending,
            cursor: 0,
            origin,
            unit_submodules: Vec::new(),
        })
    }

    /// Parses the deferred body of the top frame and retires it.
    fn finish_frame(
        &mut self,
        stack: &mut Vec<Frame>,
        ctx: &mut ResolutionContext,
        options: &LoadOptions,
        result: &mut Option<Arc<Module>>,
    ) {
        let mut frame = stack.pop().expect("finish without an open frame");

        let mut stream = TokenStream::new(&frame.tokens, frame.file_id);
        stream.seek(frame.resume_pos);
        if let Err(fatal) = parse_body(&mut stream, &mut frame.diags, &mut frame.module) {
            frame.diags.push(fatal);
        }

        match frame.module.kind {
            ModuleKind::Submodule => {
                // Counters cover this file only, before the diagnostics
                // flow into the including unit.
                frame.module.errors = frame.diags.error_count() as u32;
                frame.module.warnings = frame.diags.warning_count() as u32;
                ctx.include_chain.pop();

                let status = frame.module.status();
                trace!(submodule = %frame.module.name, %status, "submodule finished");
                {
                    let parent = top(stack);
                    if let Some((DepKind::Include, slot)) = frame.origin {
                        parent.module.includes[slot].status = status;
                    }
                    parent.diags.merge(frame.diags);
                }
                let owner = unit_owner(stack);
                stack[owner].unit_submodules.push(frame.module);
            }
            ModuleKind::Module => {
                ctx.import_chain.pop();

                // The unit is complete; resolve across all members.
                let mut members = Vec::with_capacity(1 + frame.unit_submodules.len());
                members.push(frame.module);
                members.append(&mut frame.unit_submodules);
                resolve_unit(&mut members, &mut frame.diags);

                let mut iter = members.into_iter();
                let mut module = iter.next().expect("unit always has a module");
                let submodules: Vec<Module> = iter.collect();

                // Module counters cover the whole unit.
                module.errors = frame.diags.error_count() as u32;
                module.warnings = frame.diags.warning_count() as u32;

                // Freeze in completion order; an includer's slots can
                // only point at submodules that froze before it, so a
                // cyclic include stays unresolved.
                let mut frozen: IndexMap<String, Arc<Module>> = IndexMap::new();
                for mut sub in submodules {
                    for include in &mut sub.includes {
                        if let Some(arc) = frozen.get(&include.submodule) {
                            include.resolved = Some(arc.clone());
                        }
                    }
                    frozen.insert(sub.name.clone(), Arc::new(sub));
                }
                for include in &mut module.includes {
                    if let Some(arc) = frozen.get(&include.submodule) {
                        include.resolved = Some(arc.clone());
                    }
                }

                let arc = Arc::new(module);
                let status = arc.status();
                ctx.completed
                    .insert((arc.name.clone(), arc.version.clone()), arc.clone());

                if !options.parse_only
                    && arc.name != NETCONF_MODULE
                    && (status != LoadStatus::Error || options.keep_partial)
                {
                    self.registry.install(arc.clone());
                }
                info!(
                    module = %arc.name,
                    revision = ?arc.version,
                    %status,
                    errors = arc.errors,
                    warnings = arc.warnings,
                    "module finished"
                );

                ctx.report.merge(frame.diags);

                match stack.last_mut() {
                    None => *result = Some(arc),
                    Some(parent) => {
                        if let Some((DepKind::Import, slot)) = frame.origin {
                            bind_import(parent, slot, arc);
                        }
                    }
                }
            }
        }
    }
}

/// The frame currently being driven.
fn top(stack: &mut [Frame]) -> &mut Frame {
    stack.last_mut().expect("frame stack is empty")
}

/// Index of the module frame owning the current include chain.
fn unit_owner(stack: &[Frame]) -> usize {
    stack
        .iter()
        .rposition(|frame| frame.module.kind == ModuleKind::Module)
        .expect("include without an owning module frame")
}

/// Takes the next unsettled dependency slot off the top frame.
fn next_step(stack: &mut [Frame]) -> Step {
    let frame = stack.last_mut().expect("step without an open frame");
    if frame.cursor >= frame.pending.len() {
        return Step::Finished;
    }
    let (kind, slot) = frame.pending[frame.cursor];
    frame.cursor += 1;

    let (name, revision, span) = match kind {
        DepKind::Import => {
            let import = &frame.module.imports[slot];
            (import.module.clone(), import.revision.clone(), import.span)
        }
        DepKind::Include => {
            let include = &frame.module.includes[slot];
            (
                include.submodule.clone(),
                include.revision.clone(),
                include.span,
            )
        }
    };
    Step::Dependency(Dependency {
        kind,
        slot,
        name,
        revision,
        span,
    })
}

/// Binds a finished module into an import slot of `frame`.
///
/// An errored dependency errors the importer too; the module record is
/// still bound so diagnostics can point into it.
fn bind_import(frame: &mut Frame, slot: usize, target: Arc<Module>) {
    let status = target.status();
    let (name, span) = {
        let import = &mut frame.module.imports[slot];
        import.status = status;
        import.resolved = Some(target);
        (import.module.clone(), import.span)
    };
    if status == LoadStatus::Error {
        frame.diags.push(YangError::new(
            ErrorKind::DependencyErrors,
            span,
            format!("imported module '{}' has errors", name),
        ));
    }
}

/// The one-line consequence of a dependency failure, placed at the
/// import or include statement that needed it.
fn dependency_failure_error(kind: ErrorKind, dep: DepKind, name: &str, span: Span) -> YangError {
    let message = match (kind, dep) {
        (ErrorKind::ModuleNotFound, DepKind::Import) => {
            format!("imported module '{}' not found on the search path", name)
        }
        (ErrorKind::ModuleNotFound, DepKind::Include) => {
            format!("included submodule '{}' not found on the search path", name)
        }
        (ErrorKind::UnsupportedFormat, _) => {
            format!("'{}' was found only in a format this build does not parse", name)
        }
        (ErrorKind::WrongModuleType, DepKind::Import) => {
            format!("import '{}' resolved to a submodule", name)
        }
        (ErrorKind::WrongModuleType, DepKind::Include) => {
            format!("include '{}' did not resolve to a submodule of this module", name)
        }
        (ErrorKind::Io, _) => format!("failed to read the file for '{}'", name),
        (_, DepKind::Import) => format!("imported module '{}' could not be loaded", name),
        (_, DepKind::Include) => format!("included submodule '{}' could not be loaded", name),
    };
    YangError::new(kind, span, message)
}

/// Reports a failure to open the requested module itself.
fn report_top_failure(name: &str, failure: OpenFailure, report: &mut Diagnostics) {
    match failure {
        OpenFailure::NotFound(message) => {
            report.push(YangError::new(
                ErrorKind::ModuleNotFound,
                Span::zero(0),
                message,
            ));
        }
        OpenFailure::Unsupported(path) => {
            report.push(YangError::new(
                ErrorKind::UnsupportedFormat,
                Span::zero(0),
                format!(
                    "{} is a YIN file; this engine parses YANG source only",
                    path.display()
                ),
            ));
        }
        OpenFailure::Io { path, error } => {
            report.push(YangError::new(
                ErrorKind::Io,
                Span::zero(0),
                format!("failed to read {}: {}", path.display(), error),
            ));
        }
        OpenFailure::Parse { kind, diags } => {
            report.merge(diags);
            if kind == ErrorKind::WrongModuleType {
                report.push(YangError::new(
                    ErrorKind::WrongModuleType,
                    Span::zero(0),
                    format!("'{}' is a submodule; load its module instead", name),
                ));
            }
        }
    }
}
