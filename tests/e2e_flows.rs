use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct TestEnv {
    _tmp: TempDir,
    home: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        Self { _tmp: tmp, home }
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("taxdepth");
        cmd.env("HOME", &self.home).env("USER", "tester");
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    fn run_json_fail(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error output")
    }

    fn write_registry(&self, body: &str) {
        let dir = self.home.join(".config/taxdepth");
        fs::create_dir_all(&dir).expect("create config dir");
        fs::write(dir.join("taxonomies.toml"), body).expect("write registry");
    }
}

#[test]
fn settings_set_show_roundtrip() {
    let env = TestEnv::new();

    let set = env.run_json(&[
        "settings",
        "set",
        "--depth",
        "2",
        "--hide-slug",
        "--label",
        "Section",
        "--label",
        "Topic",
        "--show-labels",
    ]);
    assert_eq!(set["ok"], true);
    assert_eq!(set["data"]["max_depth"], 2);

    let show = env.run_json(&["settings", "show"]);
    assert_eq!(show["ok"], true);
    assert_eq!(show["data"]["taxonomy"], "category");
    assert_eq!(show["data"]["max_depth"], 2);
    assert_eq!(show["data"]["hide_slug"], true);
    assert_eq!(show["data"]["hide_description"], false);
    assert_eq!(show["data"]["labels"][0], "Section");
    assert_eq!(show["data"]["show_labels"], true);
}

#[test]
fn negative_depth_input_reads_as_unlimited() {
    let env = TestEnv::new();

    let set = env.run_json(&["settings", "set", "--depth=-4"]);
    assert_eq!(set["ok"], true);
    assert_eq!(set["data"]["max_depth"], 0);
}

#[test]
fn unconfigured_taxonomy_shows_defaults() {
    let env = TestEnv::new();

    let show = env.run_json(&["settings", "show"]);
    assert_eq!(show["ok"], true);
    assert_eq!(show["data"]["max_depth"], 0);
    assert_eq!(show["data"]["show_labels"], false);
    assert_eq!(
        show["data"]["labels"].as_array().expect("labels array").len(),
        0
    );
}

#[test]
fn insert_beyond_max_depth_is_rejected() {
    let env = TestEnv::new();
    env.run_json(&["settings", "set", "--depth", "2"]);

    // A(1, depth 0) -> B(2, depth 1) -> C(3, depth 2)
    env.run_json(&["term", "add", "A"]);
    env.run_json(&["term", "add", "B", "--parent", "1"]);
    let c = env.run_json(&["term", "add", "C", "--parent", "2"]);
    assert_eq!(c["data"]["depth"], 2);

    let err = env.run_json_fail(&["term", "add", "D", "--parent", "3"]);
    assert_eq!(err["ok"], false);
    assert_eq!(err["error"]["code"], "TOO_DEEP");
    let msg = err["error"]["message"].as_str().unwrap_or("");
    assert!(msg.contains("cannot create a term at depth greater than 2"));

    // Root inserts stay admitted regardless of the ceiling.
    let root = env.run_json(&["term", "add", "E"]);
    assert_eq!(root["data"]["depth"], 0);
}

#[test]
fn deep_move_is_corrected_and_notice_consumed_once() {
    let env = TestEnv::new();

    // Build A -> B plus root C while unlimited, then cap at 1.
    env.run_json(&["term", "add", "A"]);
    env.run_json(&["term", "add", "B", "--parent", "1"]);
    env.run_json(&["term", "add", "C"]);
    env.run_json(&["settings", "set", "--depth", "1"]);

    let moved = env.run_json(&["term", "move", "3", "--parent", "2"]);
    assert_eq!(moved["ok"], true);
    assert_eq!(moved["data"]["corrected"], true);
    assert_eq!(moved["data"]["parent"], Value::Null);
    assert_eq!(moved["data"]["depth"], 0);

    let notice = env.run_json(&["notices"]);
    let msg = notice["data"].as_str().expect("notice message");
    assert!(msg.contains("max depth 1"));

    let again = env.run_json(&["notices"]);
    assert_eq!(again["data"], Value::Null);
}

#[test]
fn move_within_limit_is_left_alone() {
    let env = TestEnv::new();
    env.run_json(&["settings", "set", "--depth", "2"]);

    env.run_json(&["term", "add", "A"]);
    env.run_json(&["term", "add", "B"]);
    let moved = env.run_json(&["term", "move", "2", "--parent", "1"]);
    assert_eq!(moved["data"]["corrected"], false);
    assert_eq!(moved["data"]["depth"], 1);

    let notice = env.run_json(&["notices"]);
    assert_eq!(notice["data"], Value::Null);
}

#[test]
fn assign_drops_deep_terms_and_passes_unresolved_aliases() {
    let env = TestEnv::new();
    env.run_json(&["term", "add", "Tools"]);
    env.run_json(&["term", "add", "Power", "--parent", "1"]);
    env.run_json(&["term", "add", "Drills", "--parent", "2"]);
    env.run_json(&["settings", "set", "--depth", "1"]);

    let assign = env.run_json(&["assign", "post-7", "1", "3", "unknown-slug"]);
    assert_eq!(assign["ok"], true);
    let admitted = assign["data"]["admitted"].as_array().expect("admitted");
    assert_eq!(admitted.len(), 2);
    assert_eq!(admitted[0], "1");
    assert_eq!(admitted[1], "unknown-slug");
    assert_eq!(assign["data"]["removed_count"], 1);

    let notice = env.run_json(&["notices"]);
    let msg = notice["data"].as_str().expect("notice message");
    assert!(msg.contains("removed 1 terms deeper than max depth (1)"));

    let stored = env.run_json(&["assignments", "post-7"]);
    assert_eq!(stored["data"][0]["terms"][0], "1");
    assert_eq!(stored["data"][0]["terms"][1], "unknown-slug");
}

#[test]
fn assign_normalizes_resolved_aliases_to_ids() {
    let env = TestEnv::new();
    env.run_json(&["term", "add", "Tools"]);
    env.run_json(&["settings", "set", "--depth", "3"]);

    let assign = env.run_json(&["assign", "post-1", "tools"]);
    assert_eq!(assign["data"]["admitted"][0], "1");
    assert_eq!(assign["data"]["removed_count"], 0);
}

#[test]
fn unlimited_mode_admits_everything_unchanged() {
    let env = TestEnv::new();
    env.run_json(&["term", "add", "A"]);
    env.run_json(&["term", "add", "B", "--parent", "1"]);
    env.run_json(&["term", "add", "C", "--parent", "2"]);
    env.run_json(&["term", "add", "D", "--parent", "3"]);

    let assign = env.run_json(&["assign", "post-9", "4", "no-such-term"]);
    assert_eq!(assign["data"]["admitted"][0], "4");
    assert_eq!(assign["data"]["admitted"][1], "no-such-term");
    assert_eq!(assign["data"]["removed_count"], 0);

    let parents = env.run_json(&["parents"]);
    assert_eq!(parents["data"].as_array().expect("parents").len(), 4);

    let checklist = env.run_json(&["checklist"]);
    for item in checklist["data"].as_array().expect("checklist") {
        assert_eq!(item["disabled"], false);
    }
}

#[test]
fn parent_choices_exclude_terms_at_the_ceiling() {
    let env = TestEnv::new();
    env.run_json(&["settings", "set", "--depth", "2"]);
    env.run_json(&["term", "add", "A"]);
    env.run_json(&["term", "add", "B", "--parent", "1"]);
    env.run_json(&["term", "add", "C", "--parent", "2"]);

    let parents = env.run_json(&["parents"]);
    let ids: Vec<u64> = parents["data"]
        .as_array()
        .expect("parents")
        .iter()
        .map(|p| p["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn checklist_disables_deep_terms_and_shows_labels() {
    let env = TestEnv::new();
    env.run_json(&["term", "add", "A"]);
    env.run_json(&["term", "add", "B", "--parent", "1"]);
    env.run_json(&["term", "add", "C", "--parent", "2"]);
    env.run_json(&[
        "settings",
        "set",
        "--depth",
        "1",
        "--label",
        "Top",
        "--label",
        "Sub",
        "--show-labels",
    ]);

    let checklist = env.run_json(&["checklist"]);
    let items = checklist["data"].as_array().expect("checklist");
    assert_eq!(items[0]["disabled"], false);
    assert_eq!(items[0]["label"], "Top");
    assert_eq!(items[1]["disabled"], false);
    assert_eq!(items[1]["label"], "Sub");
    assert_eq!(items[2]["disabled"], true);
    assert_eq!(items[2]["label"], Value::Null);
}

#[test]
fn uidata_mirrors_settings_and_depths() {
    let env = TestEnv::new();
    env.run_json(&["term", "add", "A"]);
    env.run_json(&["term", "add", "B", "--parent", "1"]);
    env.run_json(&[
        "settings",
        "set",
        "--depth",
        "3",
        "--hide-count",
        "--label",
        "Top",
        "--show-labels",
    ]);

    let ui = env.run_json(&["uidata"]);
    assert_eq!(ui["data"]["current_tax"], "category");
    assert_eq!(ui["data"]["max_depth_by_tax"]["category"], 3);
    assert_eq!(ui["data"]["term_depths"]["1"], 0);
    assert_eq!(ui["data"]["term_depths"]["2"], 1);
    assert_eq!(ui["data"]["labels"][0], "Top");
    assert_eq!(ui["data"]["hide_columns"]["category"]["count"], true);
    assert_eq!(ui["data"]["hide_columns"]["category"]["slug"], false);
    assert_eq!(ui["data"]["show_labels"]["category"], true);
}

#[test]
fn unknown_taxonomy_is_an_error() {
    let env = TestEnv::new();

    let err = env.run_json_fail(&["--tax", "nope", "term", "list"]);
    assert_eq!(err["ok"], false);
    assert_eq!(err["error"]["code"], "UNKNOWN_TAXONOMY");
}

#[test]
fn flat_taxonomies_reject_parents_and_skip_enforcement() {
    let env = TestEnv::new();
    env.write_registry(
        r#"[[taxonomy]]
name = "category"

[[taxonomy]]
name = "tag"
hierarchical = false
"#,
    );

    let root = env.run_json(&["--tax", "tag", "term", "add", "Rust"]);
    assert_eq!(root["data"]["depth"], 0);

    let err = env.run_json_fail(&["--tax", "tag", "term", "add", "Nested", "--parent", "1"]);
    assert_eq!(err["error"]["code"], "NOT_HIERARCHICAL");
}

#[test]
fn removing_a_term_promotes_its_children() {
    let env = TestEnv::new();
    env.run_json(&["term", "add", "A"]);
    env.run_json(&["term", "add", "B", "--parent", "1"]);
    env.run_json(&["term", "add", "C", "--parent", "2"]);

    env.run_json(&["term", "remove", "2"]);
    let list = env.run_json(&["term", "list"]);
    let c = list["data"]
        .as_array()
        .expect("terms")
        .iter()
        .find(|t| t["id"] == 3)
        .expect("term C")
        .clone();
    assert_eq!(c["parent"], 1);
    assert_eq!(c["depth"], 1);
}

#[test]
fn doctor_finds_and_repairs_stragglers() {
    let env = TestEnv::new();

    // Grow a chain while unlimited, then cap it: C is now a straggler.
    env.run_json(&["term", "add", "A"]);
    env.run_json(&["term", "add", "B", "--parent", "1"]);
    env.run_json(&["term", "add", "C", "--parent", "2"]);
    env.run_json(&["settings", "set", "--depth", "1"]);

    let mut cmd = env.cmd();
    let out = cmd
        .arg("--json")
        .arg("doctor")
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let scan: Value = serde_json::from_slice(&out).expect("doctor json");
    assert_eq!(scan["ok"], false);
    assert_eq!(scan["data"]["overall"], "needs_attention");
    assert_eq!(scan["data"]["checks"][0]["offenders"][0], 3);

    let fixed = env.run_json(&["doctor", "--fix"]);
    assert_eq!(fixed["ok"], true);
    assert_eq!(fixed["data"]["checks"][0]["repaired"], 1);

    let clean = env.run_json(&["doctor"]);
    assert_eq!(clean["data"]["overall"], "ok");
}
