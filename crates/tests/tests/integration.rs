//! End-to-end tests for YANG module loading.
//!
//! Every test drives the full pipeline from files on disk:
//! Locate → Parse → Resolve → Register

use std::fs;
use std::sync::Arc;

use yangkit::{
    CycleMark, ErrorKind, LoadOptions, LoadStatus, Loader, ResolvedRef, SearchPaths, Severity,
};
use yangkit_tests::{LoadHarness, kind_count};

/// A module with no dependencies loads cleanly and lands in the registry.
#[test]
fn test_plain_module_loads() {
    let mut harness = LoadHarness::new();
    harness.write(
        "routing",
        r#"
module routing {
    namespace "urn:example:routing";
    prefix rt;

    revision 2024-01-15;

    feature multipath;

    container routes {
        leaf count { type uint32; }
    }
}
"#,
    );

    let result = harness.load("routing");
    assert_eq!(result.status, LoadStatus::Ok, "{}", harness.render(&result));

    let module = result.module.expect("module loaded");
    assert_eq!(module.name, "routing");
    assert_eq!(module.version.as_deref(), Some("2024-01-15"));
    assert_eq!(module.errors, 0);
    assert_eq!(module.warnings, 0);
    assert!(module.find_feature("multipath").is_some());
    assert!(harness.registry().contains("routing", Some("2024-01-15")));
}

/// A module without any revision statement loads with a warning and has
/// no selected version.
#[test]
fn test_missing_revision_warns() {
    let mut harness = LoadHarness::new();
    harness.write(
        "bare",
        r#"
module bare {
    namespace "urn:example:bare";
    prefix b;
}
"#,
    );

    let result = harness.load("bare");
    assert_eq!(result.status, LoadStatus::Warning);
    assert_eq!(kind_count(&result, ErrorKind::MissingRevision), 1);

    let module = result.module.expect("module loaded");
    assert!(module.version.is_none());
    assert_eq!(module.warnings, 1);
}

/// An import is located, loaded, and bound; references through its
/// prefix resolve into the imported module and mark the import used.
#[test]
fn test_import_binds_across_modules() {
    let mut harness = LoadHarness::new();
    harness.write(
        "base",
        r#"
module base {
    namespace "urn:example:base";
    prefix b;

    revision 2024-01-01;

    feature core;
}
"#,
    );
    harness.write(
        "app",
        r#"
module app {
    namespace "urn:example:app";
    prefix a;

    import base {
        prefix b;
    }

    revision 2024-02-01;

    feature extended {
        if-feature b:core;
    }
}
"#,
    );

    let result = harness.load("app");
    assert_eq!(result.status, LoadStatus::Ok, "{}", harness.render(&result));

    let module = result.module.expect("module loaded");
    let import = &module.imports[0];
    assert_eq!(import.module, "base");
    assert_eq!(import.status, LoadStatus::Ok);
    assert!(import.used);
    assert_eq!(import.resolved.as_ref().expect("bound").name, "base");

    assert_eq!(
        module.features[0].resolved,
        vec![ResolvedRef::Imported {
            module: "base".to_string(),
            revision: Some("2024-01-01".to_string()),
            index: 0,
        }]
    );

    // The dependency was installed alongside the requested module.
    assert!(harness.registry().contains("base", None));
    assert!(harness.registry().contains("app", None));
}

/// An import whose prefix is never referenced draws a warning.
#[test]
fn test_unused_import_warns() {
    let mut harness = LoadHarness::new();
    harness.write(
        "base",
        r#"
module base {
    namespace "urn:example:base";
    prefix b;

    revision 2024-01-01;
}
"#,
    );
    harness.write(
        "idle",
        r#"
module idle {
    namespace "urn:example:idle";
    prefix i;

    import base {
        prefix b;
    }

    revision 2024-02-01;
}
"#,
    );

    let result = harness.load("idle");
    assert_eq!(result.status, LoadStatus::Warning);
    assert_eq!(kind_count(&result, ErrorKind::UnusedImport), 1);
    let module = result.module.expect("module loaded");
    assert!(!module.imports[0].used);
}

/// A missing import is reported at the import statement; the importer
/// still finishes, carrying the error, and is not installed.
#[test]
fn test_missing_import_reported_at_site() {
    let mut harness = LoadHarness::new();
    harness.write(
        "app",
        r#"
module app {
    namespace "urn:example:app";
    prefix a;

    import ghost {
        prefix g;
    }

    revision 2024-02-01;

    feature extended {
        if-feature g:core;
    }
}
"#,
    );

    let result = harness.load("app");
    assert_eq!(result.status, LoadStatus::Error);
    assert_eq!(kind_count(&result, ErrorKind::ModuleNotFound), 1);

    let module = result.module.expect("module still returned");
    assert!(module.errors > 0);
    assert_eq!(module.imports[0].status, LoadStatus::Error);
    assert!(module.imports[0].resolved.is_none());
    assert!(harness.registry().is_empty());
}

/// Two modules importing each other produce exactly one cycle report,
/// plus one consequence error in the module that imported the broken
/// dependency. Neither module is installed.
#[test]
fn test_import_cycle_reported_once() {
    let mut harness = LoadHarness::new();
    harness.write(
        "alpha",
        r#"
module alpha {
    namespace "urn:example:alpha";
    prefix al;

    import beta {
        prefix be;
    }

    revision 2024-01-01;
}
"#,
    );
    harness.write(
        "beta",
        r#"
module beta {
    namespace "urn:example:beta";
    prefix be;

    import alpha {
        prefix al;
    }

    revision 2024-01-01;
}
"#,
    );

    let result = harness.load("alpha");
    assert_eq!(result.status, LoadStatus::Error);
    assert_eq!(kind_count(&result, ErrorKind::ImportCycle), 1);
    assert_eq!(kind_count(&result, ErrorKind::DependencyErrors), 1);

    let cycle = result
        .diagnostics
        .iter()
        .find(|e| e.kind == ErrorKind::ImportCycle)
        .expect("cycle diagnostic");
    assert!(cycle.message.contains("alpha → beta → alpha"));

    // The errored dependency is still bound so diagnostics can point
    // into it, but nothing reached the registry.
    let module = result.module.expect("module still returned");
    assert_eq!(module.imports[0].status, LoadStatus::Error);
    assert!(module.imports[0].resolved.is_some());
    assert!(harness.registry().is_empty());
}

/// A module importing itself is rejected during parsing; the import
/// never becomes a dependency.
#[test]
fn test_self_import_rejected() {
    let mut harness = LoadHarness::new();
    harness.write(
        "selfish",
        r#"
module selfish {
    namespace "urn:example:selfish";
    prefix s;

    import selfish {
        prefix me;
    }

    revision 2024-01-01;
}
"#,
    );

    let result = harness.load("selfish");
    assert_eq!(result.status, LoadStatus::Error);
    assert_eq!(kind_count(&result, ErrorKind::ImportCycle), 1);
    let module = result.module.expect("module still returned");
    assert!(module.imports.is_empty());
}

/// Importing the same module twice collapses to one import with a
/// warning on the repeat.
#[test]
fn test_duplicate_import_collapsed() {
    let mut harness = LoadHarness::new();
    harness.write(
        "base",
        r#"
module base {
    namespace "urn:example:base";
    prefix b;

    revision 2024-01-01;

    feature core;
}
"#,
    );
    harness.write(
        "twice",
        r#"
module twice {
    namespace "urn:example:twice";
    prefix t;

    import base {
        prefix b1;
    }
    import base {
        prefix b2;
    }

    revision 2024-02-01;

    feature gated {
        if-feature b1:core;
    }
}
"#,
    );

    let result = harness.load("twice");
    assert_eq!(result.status, LoadStatus::Warning);
    assert_eq!(kind_count(&result, ErrorKind::DuplicateStatement), 1);
    let module = result.module.expect("module loaded");
    assert_eq!(module.imports.len(), 1);
    assert_eq!(module.imports[0].prefix, "b1");
}

/// Two imports claiming the same prefix: the second is dropped with an
/// error, since references through that prefix would be ambiguous.
#[test]
fn test_prefix_collision_rejected() {
    let mut harness = LoadHarness::new();
    harness.write(
        "base",
        r#"
module base {
    namespace "urn:example:base";
    prefix b;

    revision 2024-01-01;

    feature core;
}
"#,
    );
    harness.write(
        "clash",
        r#"
module clash {
    namespace "urn:example:clash";
    prefix c;

    import base {
        prefix b;
    }
    import other {
        prefix b;
    }

    revision 2024-02-01;

    feature gated {
        if-feature b:core;
    }
}
"#,
    );

    let result = harness.load("clash");
    assert_eq!(result.status, LoadStatus::Error);
    assert_eq!(kind_count(&result, ErrorKind::DuplicateName), 1);
    let module = result.module.expect("module loaded");
    assert_eq!(module.imports.len(), 1);
    assert_eq!(module.imports[0].module, "base");
}

/// A second load of the same name is served from the registry: same
/// record, no new diagnostics, and no disk access.
#[test]
fn test_second_load_hits_registry() {
    let mut harness = LoadHarness::new();
    harness.write(
        "stable",
        r#"
module stable {
    namespace "urn:example:stable";
    prefix st;

    revision 2024-01-01;
}
"#,
    );

    let first = harness.load("stable");
    assert_eq!(first.status, LoadStatus::Ok);

    // Deleting the file proves the second load never touches disk.
    harness.remove("stable.yang");

    let second = harness.load("stable");
    assert_eq!(second.status, LoadStatus::Ok);
    assert_eq!(second.diagnostics.len(), 0);
    assert!(Arc::ptr_eq(
        first.module.as_ref().expect("first load"),
        second.module.as_ref().expect("second load"),
    ));
}

/// Search-only stops after the front sections: the body is never
/// parsed, dependencies are never opened, nothing is installed.
#[test]
fn test_search_only_stops_before_body() {
    let mut harness = LoadHarness::new();
    harness.write(
        "probe",
        r#"
module probe {
    namespace "urn:example:probe";
    prefix p;

    import missing-dep {
        prefix m;
    }

    revision 2024-03-01;

    feature body-only;
}
"#,
    );

    let options = LoadOptions {
        search_only: true,
        ..LoadOptions::default()
    };
    let result = harness.load_with("probe", None, &options);

    let module = result.module.expect("header returned");
    assert_eq!(module.version.as_deref(), Some("2024-03-01"));
    assert!(module.features.is_empty());
    assert_eq!(module.imports.len(), 1);
    assert!(module.imports[0].resolved.is_none());
    assert!(harness.registry().is_empty());
}

/// Parse-only keeps the registry untouched while still returning the
/// fully resolved module.
#[test]
fn test_parse_only_installs_nothing() {
    let mut harness = LoadHarness::new();
    harness.write(
        "transient",
        r#"
module transient {
    namespace "urn:example:transient";
    prefix tr;

    revision 2024-01-01;

    feature flag;
}
"#,
    );

    let options = LoadOptions {
        parse_only: true,
        ..LoadOptions::default()
    };
    let result = harness.load_with("transient", None, &options);

    assert_eq!(result.status, LoadStatus::Ok);
    let module = result.module.expect("module returned");
    assert!(module.find_feature("flag").is_some());
    assert!(harness.registry().is_empty());
}

/// With keep-partial, a module that finished with errors stays
/// available to later loads instead of being re-read and re-failed.
#[test]
fn test_keep_partial_keeps_errored_module() {
    let mut harness = LoadHarness::new();
    harness.write(
        "broken",
        r#"
module broken {
    namespace "urn:example:broken";
    prefix br;

    import ghost {
        prefix g;
    }

    revision 2024-01-01;

    feature gated {
        if-feature g:core;
    }
}
"#,
    );

    let options = LoadOptions {
        keep_partial: true,
        ..LoadOptions::default()
    };
    let first = harness.load_with("broken", None, &options);
    assert_eq!(first.status, LoadStatus::Error);
    assert!(harness.registry().contains("broken", None));

    let second = harness.load_with("broken", None, &options);
    assert_eq!(second.status, LoadStatus::Error);
    assert_eq!(second.diagnostics.len(), 0);
    assert!(Arc::ptr_eq(
        first.module.as_ref().expect("first load"),
        second.module.as_ref().expect("second load"),
    ));
}

/// A feature depending on itself is reported once and parked on the
/// cycle; the module finishes in error.
#[test]
fn test_feature_dependency_loop() {
    let mut harness = LoadHarness::new();
    harness.write(
        "looped",
        r#"
module looped {
    namespace "urn:example:looped";
    prefix lo;

    revision 2024-01-01;

    feature storage {
        if-feature storage;
    }
}
"#,
    );

    let result = harness.load("looped");
    assert_eq!(result.status, LoadStatus::Error);
    assert_eq!(kind_count(&result, ErrorKind::DefinitionLoop), 1);

    let module = result.module.expect("module returned");
    assert_eq!(module.features[0].mark, CycleMark::OnCycle);
    assert!(harness.registry().is_empty());
}

/// Two identities based on each other form a loop; the report names the
/// whole chain.
#[test]
fn test_identity_base_loop() {
    let mut harness = LoadHarness::new();
    harness.write(
        "circular",
        r#"
module circular {
    namespace "urn:example:circular";
    prefix ci;

    revision 2024-01-01;

    identity first {
        base second;
    }
    identity second {
        base first;
    }
}
"#,
    );

    let result = harness.load("circular");
    assert_eq!(result.status, LoadStatus::Error);
    assert_eq!(kind_count(&result, ErrorKind::DefinitionLoop), 1);

    let loop_report = result
        .diagnostics
        .iter()
        .find(|e| e.kind == ErrorKind::DefinitionLoop)
        .expect("loop diagnostic");
    assert!(loop_report.message.contains("first"));
    assert!(loop_report.message.contains("second"));
}

/// Derivation edges point from each base identity to the identities
/// derived from it.
#[test]
fn test_identity_children_recorded() {
    let mut harness = LoadHarness::new();
    harness.write(
        "transports",
        r#"
module transports {
    namespace "urn:example:transports";
    prefix tp;

    revision 2024-01-01;

    identity transport;
    identity tcp {
        base transport;
    }
    identity quic {
        base transport;
    }
}
"#,
    );

    let result = harness.load("transports");
    assert_eq!(result.status, LoadStatus::Ok, "{}", harness.render(&result));

    let module = result.module.expect("module loaded");
    assert_eq!(module.identities[0].children, vec![(0, 1), (0, 2)]);
    assert_eq!(
        module.identities[1].resolved_base,
        Some(ResolvedRef::Unit {
            member: 0,
            index: 0
        })
    );
}

/// An included submodule joins the load unit: the module's own body can
/// reference the submodule's definitions without any prefix.
#[test]
fn test_submodule_include() {
    let mut harness = LoadHarness::new();
    harness.write(
        "host",
        r#"
module host {
    namespace "urn:example:host";
    prefix h;

    include parts;

    revision 2024-02-10;

    feature assembled {
        if-feature chassis;
    }
}
"#,
    );
    harness.write(
        "parts",
        r#"
submodule parts {
    belongs-to host {
        prefix h;
    }

    revision 2024-02-10;

    feature chassis;
}
"#,
    );

    let result = harness.load("host");
    assert_eq!(result.status, LoadStatus::Ok, "{}", harness.render(&result));

    let module = result.module.expect("module loaded");
    let include = &module.includes[0];
    assert_eq!(include.status, LoadStatus::Ok);
    let parts = include.resolved.as_ref().expect("submodule frozen");
    assert_eq!(parts.name, "parts");
    assert!(parts.is_submodule());

    // The feature in the submodule is member 1 of the unit.
    assert_eq!(
        module.features[0].resolved,
        vec![ResolvedRef::Unit {
            member: 1,
            index: 0
        }]
    );

    // Submodules are not installed on their own.
    assert_eq!(harness.registry().len(), 1);
}

/// A submodule claiming a different owner is refused, not adopted.
#[test]
fn test_include_wrong_owner_refused() {
    let mut harness = LoadHarness::new();
    harness.write(
        "mine",
        r#"
module mine {
    namespace "urn:example:mine";
    prefix mi;

    include stray;

    revision 2024-01-01;
}
"#,
    );
    harness.write(
        "stray",
        r#"
submodule stray {
    belongs-to other {
        prefix o;
    }

    revision 2024-01-01;
}
"#,
    );

    let result = harness.load("mine");
    assert_eq!(result.status, LoadStatus::Error);

    let refusal = result
        .diagnostics
        .iter()
        .find(|e| e.kind == ErrorKind::WrongModuleType)
        .expect("refusal diagnostic");
    assert!(refusal.message.contains("belongs to module 'other'"));

    let module = result.module.expect("module returned");
    assert_eq!(module.includes[0].status, LoadStatus::Error);
    assert!(module.includes[0].resolved.is_none());
}

/// Submodules including each other: the re-entering include is reported
/// once and stays unresolved, while the rest of the unit still freezes.
#[test]
fn test_include_cycle_left_unresolved() {
    let mut harness = LoadHarness::new();
    harness.write(
        "trunk",
        r#"
module trunk {
    namespace "urn:example:trunk";
    prefix tr;

    include limb;

    revision 2024-03-01;
}
"#,
    );
    harness.write(
        "limb",
        r#"
submodule limb {
    belongs-to trunk {
        prefix tr;
    }

    include branch;

    revision 2024-03-01;
}
"#,
    );
    harness.write(
        "branch",
        r#"
submodule branch {
    belongs-to trunk {
        prefix tr;
    }

    include limb;

    revision 2024-03-01;
}
"#,
    );

    let result = harness.load("trunk");
    assert_eq!(result.status, LoadStatus::Error);
    assert_eq!(kind_count(&result, ErrorKind::IncludeCycle), 1);

    let module = result.module.expect("module returned");
    let limb = module.includes[0].resolved.as_ref().expect("limb frozen");
    let branch = limb.includes[0].resolved.as_ref().expect("branch frozen");
    // The include that closed the cycle is the one left unresolved.
    assert!(branch.includes[0].resolved.is_none());
    assert_eq!(branch.includes[0].status, LoadStatus::Error);
}

/// Revision history: the newest date becomes the version, and a history
/// not in reverse chronological order draws a warning.
#[test]
fn test_revision_selection_and_order() {
    let mut harness = LoadHarness::new();
    harness.write(
        "tidy",
        r#"
module tidy {
    namespace "urn:example:tidy";
    prefix ti;

    revision 2024-06-01;
    revision 2024-01-01;
}
"#,
    );
    harness.write(
        "untidy",
        r#"
module untidy {
    namespace "urn:example:untidy";
    prefix un;

    revision 2024-01-01;
    revision 2024-06-01;
}
"#,
    );

    let tidy = harness.load("tidy");
    assert_eq!(tidy.status, LoadStatus::Ok, "{}", harness.render(&tidy));
    assert_eq!(
        tidy.module.expect("tidy loaded").version.as_deref(),
        Some("2024-06-01")
    );

    let untidy = harness.load("untidy");
    assert_eq!(untidy.status, LoadStatus::Warning);
    assert_eq!(kind_count(&untidy, ErrorKind::BadRevisionOrder), 1);
    // Selection is by date, not declaration position.
    assert_eq!(
        untidy.module.expect("untidy loaded").version.as_deref(),
        Some("2024-06-01")
    );
}

/// A pinned revision prefers the dated file name; an unpinned load
/// takes the bare file; later unpinned loads get the greatest
/// registered revision.
#[test]
fn test_dated_file_selected_for_pinned_revision() {
    let mut harness = LoadHarness::new();
    harness.write(
        "lib",
        r#"
module lib {
    namespace "urn:example:lib";
    prefix li;

    revision 2024-01-01;
}
"#,
    );
    harness.write_file(
        "lib@2024-02-01.yang",
        r#"
module lib {
    namespace "urn:example:lib";
    prefix li;

    revision 2024-02-01;
}
"#,
    );

    let unpinned = harness.load("lib");
    assert_eq!(
        unpinned.module.as_ref().expect("bare file").version.as_deref(),
        Some("2024-01-01")
    );

    let pinned = harness.load_with("lib", Some("2024-02-01"), &LoadOptions::default());
    assert_eq!(pinned.status, LoadStatus::Ok, "{}", harness.render(&pinned));
    let pinned_module = pinned.module.expect("dated file");
    assert_eq!(pinned_module.version.as_deref(), Some("2024-02-01"));

    // Both revisions are registered now; an unpinned request is served
    // the greatest one.
    let again = harness.load("lib");
    assert!(Arc::ptr_eq(
        &pinned_module,
        again.module.as_ref().expect("registry hit"),
    ));
}

/// When only a bare file exists and its revision disagrees with the
/// pinned request, the load continues but carries an error.
#[test]
fn test_requested_revision_mismatch_is_error() {
    let mut harness = LoadHarness::new();
    harness.write(
        "lib",
        r#"
module lib {
    namespace "urn:example:lib";
    prefix li;

    revision 2024-01-01;
}
"#,
    );

    let result = harness.load_with("lib", Some("2099-12-31"), &LoadOptions::default());
    assert_eq!(result.status, LoadStatus::Error);
    assert_eq!(kind_count(&result, ErrorKind::RevisionMismatch), 1);

    let mismatch = result
        .diagnostics
        .iter()
        .find(|e| e.kind == ErrorKind::RevisionMismatch)
        .expect("mismatch diagnostic");
    assert!(mismatch.message.contains("2099-12-31"));
    assert!(mismatch.message.contains("2024-01-01"));
    assert_eq!(
        result.module.expect("module returned").version.as_deref(),
        Some("2024-01-01")
    );
}

/// The working directory outranks the module search path.
#[test]
fn test_cwd_wins_over_modpath() {
    let primary = tempfile::tempdir().expect("primary directory");
    let fallback = tempfile::tempdir().expect("fallback directory");
    fs::write(
        primary.path().join("dup.yang"),
        r#"
module dup {
    namespace "urn:example:dup";
    prefix du;

    revision 2024-03-05;
}
"#,
    )
    .expect("write primary copy");
    fs::write(
        fallback.path().join("dup.yang"),
        r#"
module dup {
    namespace "urn:example:dup";
    prefix du;

    revision 2024-01-05;
}
"#,
    )
    .expect("write fallback copy");

    let mut paths = SearchPaths::empty();
    paths.cwd = primary.path().to_path_buf();
    paths.modpath.push(fallback.path().to_path_buf());

    let mut loader = Loader::new(paths);
    let result = loader.load("dup", None, &LoadOptions::default());
    assert_eq!(
        result.module.expect("module loaded").version.as_deref(),
        Some("2024-03-05")
    );
}

/// An explicit file path skips the search entirely, reaching files the
/// search could never see.
#[test]
fn test_explicit_path_bypasses_search() {
    let mut harness = LoadHarness::new();
    // Hidden directories are invisible to the search walk.
    let path = harness.write_file(
        ".vendor/acme.yang",
        r#"
module acme {
    namespace "urn:example:acme";
    prefix ac;

    revision 2024-01-01;
}
"#,
    );

    let by_name = harness.load("acme");
    assert!(by_name.module.is_none());
    assert_eq!(kind_count(&by_name, ErrorKind::ModuleNotFound), 1);

    let by_path = harness.load(path.to_str().expect("utf-8 path"));
    assert_eq!(by_path.status, LoadStatus::Ok);
    assert_eq!(by_path.module.expect("explicit path").name, "acme");
}

/// Requesting a submodule at the top level fails with a pointer to the
/// owning module.
#[test]
fn test_submodule_requested_as_module_fails() {
    let mut harness = LoadHarness::new();
    harness.write(
        "fragment",
        r#"
submodule fragment {
    belongs-to whole {
        prefix w;
    }

    revision 2024-01-01;
}
"#,
    );

    let result = harness.load("fragment");
    assert!(result.module.is_none());
    assert_eq!(result.status, LoadStatus::Error);
    assert_eq!(kind_count(&result, ErrorKind::WrongModuleType), 2);
    assert!(
        result
            .diagnostics
            .iter()
            .any(|e| e.message.contains("load its module instead"))
    );
}

/// A registered yangkit-netconf module satisfies requests for the stock
/// ietf-netconf name, both direct and via import.
#[test]
fn test_netconf_substitution() {
    let mut harness = LoadHarness::new();
    harness.write(
        "yangkit-netconf",
        r#"
module yangkit-netconf {
    namespace "urn:yangkit:params:xml:ns:netconf:base";
    prefix nc;

    revision 2024-01-01;

    feature startup;
    feature candidate;
}
"#,
    );
    harness.write(
        "client",
        r#"
module client {
    namespace "urn:example:client";
    prefix cl;

    import ietf-netconf {
        prefix nc;
    }

    revision 2024-05-01;

    feature cold-boot {
        if-feature nc:startup;
    }
}
"#,
    );

    let substitute = harness.load_ok("yangkit-netconf");

    // No ietf-netconf.yang exists anywhere; the import is satisfied by
    // the registered substitute.
    let result = harness.load("client");
    assert_eq!(result.status, LoadStatus::Ok, "{}", harness.render(&result));
    let client = result.module.expect("client loaded");
    assert_eq!(client.imports[0].module, "ietf-netconf");
    let bound = client.imports[0].resolved.as_ref().expect("import bound");
    assert_eq!(bound.name, "yangkit-netconf");
    assert!(Arc::ptr_eq(&substitute, bound));

    // A direct request for the stock name gets the substitute too.
    let direct = harness.load("ietf-netconf");
    assert!(Arc::ptr_eq(
        &substitute,
        direct.module.as_ref().expect("substituted"),
    ));
}

/// Extension statements at module level are captured with their prefix
/// split off, without affecting the load status.
#[test]
fn test_extension_statement_captured() {
    let mut harness = LoadHarness::new();
    harness.write(
        "annotated",
        r#"
module annotated {
    namespace "urn:example:annotated";
    prefix an;

    revision 2024-04-01;

    extension note {
        argument text;
    }

    an:note "remember this";
}
"#,
    );

    let result = harness.load("annotated");
    assert_eq!(result.status, LoadStatus::Ok, "{}", harness.render(&result));

    let module = result.module.expect("module loaded");
    assert_eq!(module.extensions.len(), 1);
    assert_eq!(module.extensions[0].arg.as_deref(), Some("note"));

    let use_stmt = &module.extension_uses[0];
    assert_eq!(use_stmt.prefix.as_deref(), Some("an"));
    assert_eq!(use_stmt.keyword, "note");
    assert_eq!(use_stmt.arg.as_deref(), Some("remember this"));
}

/// A dependency shared by two import chains is read and parsed once;
/// both importers hold the same record.
#[test]
fn test_diamond_shares_one_copy() {
    let mut harness = LoadHarness::new();
    harness.write(
        "core",
        r#"
module core {
    namespace "urn:example:core";
    prefix co;

    revision 2024-01-01;

    feature ready;
}
"#,
    );
    harness.write(
        "left",
        r#"
module left {
    namespace "urn:example:left";
    prefix le;

    import core {
        prefix c;
    }

    revision 2024-01-01;

    feature left-ready {
        if-feature c:ready;
    }
}
"#,
    );
    harness.write(
        "right",
        r#"
module right {
    namespace "urn:example:right";
    prefix ri;

    import core {
        prefix c;
    }

    revision 2024-01-01;

    feature right-ready {
        if-feature c:ready;
    }
}
"#,
    );
    harness.write(
        "apex",
        r#"
module apex {
    namespace "urn:example:apex";
    prefix ap;

    import left {
        prefix l;
    }
    import right {
        prefix r;
    }

    revision 2024-01-01;

    feature both {
        if-feature l:left-ready;
        if-feature r:right-ready;
    }
}
"#,
    );

    let result = harness.load("apex");
    assert_eq!(result.status, LoadStatus::Ok, "{}", harness.render(&result));
    assert_eq!(harness.registry().len(), 4);

    let apex = result.module.expect("apex loaded");
    let left = apex.imports[0].resolved.as_ref().expect("left bound");
    let right = apex.imports[1].resolved.as_ref().expect("right bound");
    assert!(Arc::ptr_eq(
        left.imports[0].resolved.as_ref().expect("core via left"),
        right.imports[0].resolved.as_ref().expect("core via right"),
    ));
}

/// Diagnostics render with file, line, and a caret under the offending
/// text.
#[test]
fn test_diagnostics_render_with_location() {
    let mut harness = LoadHarness::new();
    harness.write(
        "bare",
        "module bare {\n  namespace \"urn:example:bare\";\n  prefix b;\n}\n",
    );

    let result = harness.load("bare");
    let text = harness.render(&result);
    assert!(text.contains("warning"), "rendered: {}", text);
    assert!(text.contains("bare.yang"), "rendered: {}", text);
    assert!(text.contains("^"), "rendered: {}", text);
}

/// Warnings never shadow errors when both are present.
#[test]
fn test_worst_status_wins() {
    let mut harness = LoadHarness::new();
    // No revision (warning) and a missing import (error).
    harness.write(
        "mixed",
        r#"
module mixed {
    namespace "urn:example:mixed";
    prefix mx;

    import ghost {
        prefix g;
    }

    feature gated {
        if-feature g:core;
    }
}
"#,
    );

    let result = harness.load("mixed");
    assert_eq!(result.status, LoadStatus::Error);
    assert!(
        result
            .diagnostics
            .iter()
            .any(|e| e.severity == Severity::Warning)
    );
    assert!(
        result
            .diagnostics
            .iter()
            .any(|e| e.severity == Severity::Error)
    );
}
