//! End-to-end reconciliation scenarios.
//!
//! Each test builds a real machine tree and source tree, runs the whole
//! pipeline (config parse, tree walk, reconcile, optionally apply), and
//! checks the resulting classification or filesystem state.

use pretty_assertions::assert_eq;

use sam_core::{Error, PlanExecutor, ReconciliationEngine, RequirementIndex};
use sam_fs::FileTreeIndex;
use sam_test_utils::TestMachine;

fn machine_index(machine: &TestMachine) -> FileTreeIndex {
    FileTreeIndex::build(&machine.machine_root(), &machine.layout().walk_excludes()).unwrap()
}

fn source_index(machine: &TestMachine) -> FileTreeIndex {
    FileTreeIndex::build(&machine.source_root(), &[]).unwrap()
}

fn reconcile(machine: &TestMachine) -> sam_core::DiffPlan {
    let requirements = RequirementIndex::build(&machine.machine_root()).unwrap();
    let engine = ReconciliationEngine::new(machine.machine_root());
    engine.reconcile(
        &machine_index(machine),
        &source_index(machine),
        &requirements,
        false,
    )
}

/// A child mode's assets live under its root ancestor's folder: the file
/// is `found`, not `misplaced`.
#[test]
fn child_mode_requirement_is_found_under_the_top_level_folder() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "config:\n  - attract.yaml\nsounds:\n  theme:\n    file: mus_theme.ogg\n",
    );
    machine.add_mode_config(
        "attract",
        "sounds:\n  boot:\n    file: boot.wav\n    track: sfx\n",
    );
    machine.add_machine_file("modes/main/sounds/sfx/boot.wav");
    machine.add_machine_file("modes/main/sounds/music/mus_theme.ogg");

    let plan = reconcile(&machine);

    assert!(plan.found.contains(&"boot.wav".to_string()));
    assert!(plan.misplaced.is_empty());
    let detail = &plan.sounds["boot.wav"];
    assert_eq!(detail.mode, "attract");
    assert_eq!(
        detail.expected_dir,
        machine.layout().sounds_dir("main", "sfx")
    );
    assert!(detail.stat.is_some());
}

/// The same requirement with the file on the wrong track maps expected to
/// actual in `misplaced`.
#[test]
fn wrong_track_is_misplaced() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "config:\n  - attract.yaml\nsounds: {}\n",
    );
    machine.add_mode_config(
        "attract",
        "sounds:\n  boot:\n    file: boot.wav\n    track: sfx\n",
    );
    let actual = machine.add_machine_file("modes/main/sounds/music/boot.wav");

    let plan = reconcile(&machine);

    let expected = machine.layout().expected_path("main", "sfx", "boot.wav");
    assert_eq!(plan.misplaced.get(&expected), Some(&actual));
    // The pending move satisfies the requirement; it is not missing.
    assert!(plan.missing.is_empty());
    assert!(!plan.found.contains(&"boot.wav".to_string()));
}

/// A required file absent from the machine but present in the source tree
/// is `available`, with the source path as the value.
#[test]
fn missing_file_present_in_source_is_available() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "sounds:\n  intro:\n    file: en_us_intro.ogg\n",
    );
    let source_path = machine.add_source_file("voice/en_us_intro.ogg");

    let plan = reconcile(&machine);

    let expected = machine
        .layout()
        .expected_path("main", "voice", "en_us_intro.ogg");
    assert_eq!(plan.missing, vec!["en_us_intro.ogg".to_string()]);
    assert_eq!(plan.available.get(&expected), Some(&source_path));
    assert!(plan.unavailable.is_empty());
}

/// A required file absent from both trees is `unavailable`.
#[test]
fn missing_file_absent_from_source_is_unavailable() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "sounds:\n  intro:\n    file: en_us_intro.ogg\n",
    );

    let plan = reconcile(&machine);

    assert_eq!(plan.missing, vec!["en_us_intro.ogg".to_string()]);
    assert_eq!(plan.unavailable, vec!["en_us_intro.ogg".to_string()]);
    assert!(plan.available.is_empty());
}

/// A file required by no mode is always orphaned, wherever it sits.
#[test]
fn unrequired_files_are_orphaned() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "sounds:\n  boot:\n    file: boot.wav\n    track: sfx\n",
    );
    machine.add_machine_file("modes/main/sounds/sfx/boot.wav");
    let stray_a = machine.add_machine_file("modes/main/sounds/sfx/stray.wav");
    let stray_b = machine.add_machine_file("odd/corner/stray2.ogg");

    let plan = reconcile(&machine);

    assert!(plan.orphaned.contains(&stray_a));
    assert!(plan.orphaned.contains(&stray_b));
    assert_eq!(plan.orphaned.len(), 2);
}

/// The copy at the expected path is canonical; every other copy is a
/// duplicate.
#[test]
fn canonical_copy_is_excluded_from_duplicates() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "sounds:\n  boot:\n    file: boot.wav\n    track: sfx\n",
    );
    let canonical = machine.add_machine_file("modes/main/sounds/sfx/boot.wav");
    let extra_a = machine.add_machine_file("modes/main/sounds/music/boot.wav");
    let extra_b = machine.add_machine_file("modes/main/boot.wav");

    let plan = reconcile(&machine);

    assert!(!plan.duplicated.contains(&canonical));
    assert!(plan.duplicated.contains(&extra_a));
    assert!(plan.duplicated.contains(&extra_b));
    assert_eq!(plan.duplicated.len(), 2);
    assert!(plan.misplaced.is_empty());
}

/// A filename required by two distinct modes aborts before any plan is
/// produced: the requirement index refuses to build.
#[test]
fn cross_mode_ownership_conflict_aborts_the_run() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "alpha",
        "sounds:\n  theme:\n    file: theme.ogg\n    track: music\n",
    );
    machine.add_mode_config(
        "beta",
        "sounds:\n  theme:\n    file: theme.ogg\n    track: music\n",
    );

    let err = RequirementIndex::build(&machine.machine_root()).unwrap_err();
    assert!(matches!(err, Error::OwnershipConflict { .. }));
}

/// Reconcile is pure: repeated calls on an unchanged tree agree.
#[test]
fn reconcile_is_deterministic_on_an_unchanged_tree() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "sounds:\n  boot:\n    file: boot.wav\n    track: sfx\n  intro:\n    file: en_us_intro.ogg\n",
    );
    machine.add_machine_file("modes/main/sounds/music/boot.wav");
    machine.add_machine_file("modes/stray/noise.wav");
    machine.add_source_file("voice/en_us_intro.ogg");

    let first = reconcile(&machine);
    let second = reconcile(&machine);
    assert_eq!(first, second);
}

/// Applying a plan and reconciling again yields no further work.
#[test]
fn apply_then_reconcile_converges() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "config:\n  - attract.yaml\nsounds:\n  theme:\n    file: mus_theme.ogg\n  intro:\n    file: en_us_intro.ogg\n",
    );
    machine.add_mode_config(
        "attract",
        "sounds:\n  boot:\n    file: boot.wav\n    track: sfx\n",
    );
    // Misplaced (wrong track), with a stray extra copy.
    machine.add_machine_file("modes/main/sounds/music/boot.wav");
    machine.add_machine_file("modes/main/sounds/voice/boot.wav");
    // Correct, plus a duplicate.
    machine.add_machine_file("modes/main/sounds/music/mus_theme.ogg");
    machine.add_machine_file("modes/main/mus_theme.ogg");
    // Orphan.
    machine.add_machine_file("modes/main/sounds/sfx/leftover.wav");
    // Missing, sourced from the media repository.
    machine.add_source_file("voice/en_us_intro.ogg");

    let plan = reconcile(&machine);
    assert!(!plan.is_settled());

    let report = PlanExecutor::new(false).apply(&plan).unwrap();
    assert!(report.files_changed() > 0);

    let after = reconcile(&machine);
    assert!(after.missing.is_empty());
    assert!(after.misplaced.is_empty());
    assert!(after.duplicated.is_empty());
    assert!(after.orphaned.is_empty());
    assert!(after.available.is_empty());
    assert_eq!(after.found.len(), 3);
}

/// Force-refetch treats every requirement as absent and re-sources the
/// whole collection.
#[test]
fn force_refetch_re_sources_present_files() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "sounds:\n  boot:\n    file: boot.wav\n    track: sfx\n",
    );
    machine.add_machine_file("modes/main/sounds/sfx/boot.wav");
    let source_path = machine.add_source_file("sfx/boot.wav");

    let requirements = RequirementIndex::build(&machine.machine_root()).unwrap();
    let engine = ReconciliationEngine::new(machine.machine_root());
    let plan = engine.reconcile(
        &machine_index(&machine),
        &source_index(&machine),
        &requirements,
        true,
    );

    let expected = machine.layout().expected_path("main", "sfx", "boot.wav");
    assert!(plan.found.is_empty());
    assert_eq!(plan.available.get(&expected), Some(&source_path));
}

/// Backup-named files neither satisfy requirements nor count as orphans
/// to prune.
#[test]
fn backup_files_are_ignored_by_reconciliation() {
    let machine = TestMachine::new();
    machine.add_mode_config(
        "main",
        "sounds:\n  boot:\n    file: boot.wav\n    track: sfx\n",
    );
    machine.add_machine_file("modes/main/sounds/sfx/boot.wav");
    machine.add_machine_file("modes/main/sounds/sfx/boot.original.wav");

    let plan = reconcile(&machine);

    assert!(plan.found.contains(&"boot.wav".to_string()));
    assert!(plan.orphaned.is_empty());
    assert!(plan.duplicated.is_empty());
}
