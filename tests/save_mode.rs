//! Save-mode runs: baseline replacement without comparison.

mod common;

use common::Fixture;

#[test]
fn save_replaces_the_baseline_and_skips_comparison() {
    let fixture = Fixture::new();
    fixture.write("in/t1.txt", "fresh\n");
    fixture.write("expected/stale.txt", "stale\n");

    let output = fixture.run_diffout(&["--save", "cp %F .", "in/*.txt"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fixture.read("expected/t1.txt"), "fresh\n");
    assert!(
        !fixture.path("expected/stale.txt").exists(),
        "stale baseline files must be cleared"
    );
    assert!(
        !fixture.path("report/results.html").exists(),
        "save mode must not write a comparison report"
    );
}

#[test]
fn save_then_compare_is_clean() {
    let fixture = Fixture::new();
    fixture.write("in/t1.txt", "same\n");
    fixture.write("in/t2.txt", "content\n");

    let save = fixture.run_diffout(&["--save", "cp %F .", "in/*.txt"]);
    assert_eq!(save.status.code(), Some(0));

    let compare = fixture.run_diffout(&["cp %F .", "in/*.txt"]);
    assert_eq!(compare.status.code(), Some(0));
    let summary = fixture.summary_json();
    assert_eq!(summary["unchanged"], 2);
    assert_eq!(summary["changed"], 0);
    assert_eq!(summary["extra"], 0);
    assert_eq!(summary["missing"], 0);
}
