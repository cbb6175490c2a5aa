// Integration tests for the splan binary: exit codes, the --json stdout
// contract, and list/quote records round-tripping through a temp database.
//
// Run with: cargo test -p supplyplan-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn splan(db: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_splan"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("SPLAN_DB", db)
        .env_remove("SPLAN_ACCOUNT")
        .env_remove("RUST_LOG");
    cmd
}

fn run_ok(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("spawn splan");
    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn exit_code(cmd: &mut Command) -> i32 {
    cmd.output().expect("spawn splan").status.code().unwrap_or(-1)
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &[u8]) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(stdout);
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed)
        .unwrap_or_else(|e| panic!("stdout must be valid JSON.\nParse error: {e}\nstdout:\n{trimmed}"))
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn temp_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("splan.db");
    (dir, db)
}

// ===========================================================================
// splan run
// ===========================================================================

#[test]
fn run_json_is_single_value_with_plan() {
    let (_dir, db) = temp_db();
    let output = run_ok(splan(&db).args(["run", &fixture("back-to-school.toml"), "--json"]));
    let val = assert_single_json(&output.stdout);

    assert_eq!(val["summary"]["lists"], 2);
    assert_eq!(val["summary"]["entries"], 2);
    assert_eq!(val["analysis"]["best_global_supplier"], "SupplierB");
    assert_eq!(val["analysis"]["best_global_total"], "4.00");
    assert_eq!(val["analysis"]["split_supplier_total"], "6.00");
    assert_eq!(val["analysis"]["split_quantity"], "raw");
    assert_eq!(val["plan"][0]["supplier"], "SupplierB");
    assert_eq!(val["plan"][0]["subtotal"], "4.00");
    assert_eq!(val["plan"][1]["supplier"], "SupplierA");
}

#[test]
fn run_without_json_keeps_stdout_human() {
    let (_dir, db) = temp_db();
    let output = run_ok(splan(&db).args(["run", &fixture("back-to-school.toml")]));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SupplierB  4.00"), "stdout: {stdout}");
    assert!(serde_json::from_str::<serde_json::Value>(stdout.trim()).is_err());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("best single supplier: SupplierB 4.00"), "stderr: {stderr}");
}

#[test]
fn run_writes_output_and_csv_files() {
    let (dir, db) = temp_db();
    let json_path = dir.path().join("plan.json");
    let csv_path = dir.path().join("plan.csv");
    run_ok(splan(&db).args([
        "run",
        &fixture("back-to-school.toml"),
        "--output",
        json_path.to_str().unwrap(),
        "--csv",
        csv_path.to_str().unwrap(),
    ]));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["meta"]["plan_name"], "supply plan");

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Item,Melhor Fornecedor,Preco Unitario,Quantidade Total,Custo Total"));
    assert_eq!(lines.next(), Some("Lápis,SupplierB,0.80,5,4.00"));
    assert_eq!(lines.next(), Some("Borracha,SupplierA,2.00,1,2.00"));
}

#[test]
fn run_keeps_sub_cent_unit_prices() {
    let (dir, db) = temp_db();
    let csv_path = dir.path().join("sheets.csv");
    let output = run_ok(splan(&db).args([
        "run",
        &fixture("sheets.toml"),
        "--json",
        "--csv",
        csv_path.to_str().unwrap(),
    ]));
    let val = assert_single_json(&output.stdout);
    assert_eq!(val["analysis"]["best_global_supplier"], "B");
    assert_eq!(val["analysis"]["best_global_total"], "51.00");
    assert_eq!(val["analysis"]["recommendations"][0]["offer"]["unit_price"], "0.051");

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().nth(1), Some("Papel sulfite,B,0.051,1000,51.00"));
}

#[test]
fn run_with_config_uses_plan_name() {
    let (_dir, db) = temp_db();
    let output = run_ok(splan(&db).args([
        "run",
        &fixture("back-to-school.toml"),
        "--config",
        &fixture("effective.config.toml"),
        "--json",
    ]));
    let val = assert_single_json(&output.stdout);
    assert_eq!(val["meta"]["plan_name"], "Paper run");
    assert_eq!(val["analysis"]["split_quantity"], "effective");
}

#[test]
fn run_missing_input_is_input_error() {
    let (_dir, db) = temp_db();
    assert_eq!(exit_code(splan(&db).args(["run", "does-not-exist.toml"])), 4);
}

#[test]
fn run_bad_config_is_config_error() {
    let (_dir, db) = temp_db();
    let code = exit_code(splan(&db).args([
        "run",
        &fixture("back-to-school.toml"),
        "--config",
        &fixture("bad.config.toml"),
    ]));
    assert_eq!(code, 3);
}

#[test]
fn nothing_to_analyze_only_fails_when_strict() {
    let (_dir, db) = temp_db();
    let lists_only = fixture("lists.toml");

    let output = run_ok(splan(&db).args(["run", &lists_only, "--json"]));
    let val = assert_single_json(&output.stdout);
    assert!(val.get("analysis").is_none());
    assert_eq!(val["summary"]["unquoted_entries"], 2);

    assert_eq!(exit_code(splan(&db).args(["run", &lists_only, "--strict"])), 7);
}

// ===========================================================================
// splan validate / compare
// ===========================================================================

#[test]
fn validate_accepts_good_and_rejects_bad_config() {
    let (_dir, db) = temp_db();
    run_ok(splan(&db).args(["validate", &fixture("effective.config.toml")]));
    assert_eq!(exit_code(splan(&db).args(["validate", &fixture("bad.config.toml")])), 3);
    assert_eq!(exit_code(splan(&db).args(["validate", "missing.toml"])), 3);
}

#[test]
fn compare_json_filters_by_term() {
    let (_dir, db) = temp_db();
    let output = run_ok(splan(&db).args(["compare", &fixture("back-to-school.toml"), "borr", "--json"]));
    let val = assert_single_json(&output.stdout);

    assert_eq!(val["suppliers"], serde_json::json!(["SupplierA", "SupplierB"]));
    let rows = val["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["item_name"], "Borracha");
    assert_eq!(rows[0]["prices"], serde_json::json!(["2.00", null]));
    assert_eq!(rows[0]["best_price"], "2.00");
    assert_eq!(rows[0]["best_quotes"], serde_json::json!([0]));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let (_dir, db) = temp_db();
    assert_eq!(exit_code(splan(&db).arg("frobnicate")), 2);
}

// ===========================================================================
// splan list / quote / report
// ===========================================================================

#[test]
fn stored_records_feed_report() {
    let (_dir, db) = temp_db();

    let added = run_ok(splan(&db).args(["list", "add", &fixture("lists.toml")]));
    assert_eq!(stdout_lines(&added).len(), 2);
    run_ok(splan(&db).args(["quote", "add", &fixture("quotes.toml")]));

    let quotes = run_ok(splan(&db).args(["quote", "ls", "--json"]));
    let val = assert_single_json(&quotes.stdout);
    assert_eq!(val[0]["supplier_name"], "SupplierA");
    // Snapshot against Lápis x5 and Borracha x1.
    assert_eq!(val[0]["total_value"], "7.00");
    assert_eq!(val[1]["total_value"], "4.00");

    let report = run_ok(splan(&db).args(["report", "--json"]));
    let val = assert_single_json(&report.stdout);
    assert_eq!(val["analysis"]["best_global_supplier"], "SupplierB");
    assert_eq!(val["analysis"]["split_supplier_total"], "6.00");
}

#[test]
fn accounts_do_not_see_each_other() {
    let (_dir, db) = temp_db();
    run_ok(splan(&db).args(["--account", "casa", "list", "add", &fixture("lists.toml")]));

    let mine = run_ok(splan(&db).args(["--account", "casa", "list", "ls", "--json"]));
    assert_eq!(assert_single_json(&mine.stdout).as_array().unwrap().len(), 2);

    let theirs = run_ok(splan(&db).args(["list", "ls", "--json"]));
    assert_eq!(assert_single_json(&theirs.stdout), serde_json::json!([]));
}

#[test]
fn rename_and_remove_list() {
    let (_dir, db) = temp_db();
    let added = run_ok(splan(&db).args(["list", "add", &fixture("lists.toml")]));
    let ids = stdout_lines(&added);

    run_ok(splan(&db).args(["list", "rename", &ids[0], "Ana (revisada)"]));
    run_ok(splan(&db).args(["list", "rm", &ids[1]]));

    let ls = run_ok(splan(&db).args(["list", "ls", "--json"]));
    let val = assert_single_json(&ls.stdout);
    let lists = val.as_array().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["title"], "Ana (revisada)");
}

#[test]
fn unknown_ids_are_not_found() {
    let (_dir, db) = temp_db();
    assert_eq!(exit_code(splan(&db).args(["list", "rm", "nope"])), 6);
    assert_eq!(exit_code(splan(&db).args(["list", "share", "nope"])), 6);
    assert_eq!(exit_code(splan(&db).args(["list", "import", "nope"])), 6);
    assert_eq!(exit_code(splan(&db).args(["quote", "rename", "nope", "X"])), 6);
}

#[test]
fn shared_list_imports_into_other_account() {
    let (_dir, db) = temp_db();
    let added = run_ok(splan(&db).args(["list", "add", &fixture("lists.toml")]));
    let ids = stdout_lines(&added);

    let shared = run_ok(splan(&db).args(["list", "share", &ids[1]]));
    let share_id = stdout_lines(&shared).remove(0);

    run_ok(splan(&db).args(["--account", "casa", "list", "import", &share_id]));
    let ls = run_ok(splan(&db).args(["--account", "casa", "list", "ls", "--json"]));
    let val = assert_single_json(&ls.stdout);
    assert_eq!(val[0]["title"], "Bia - 5º ano (Importada)");
    assert_eq!(val[0]["items"].as_array().unwrap().len(), 2);
}

#[test]
fn quote_update_replaces_lines_and_resnapshots() {
    let (_dir, db) = temp_db();
    run_ok(splan(&db).args(["list", "add", &fixture("lists.toml")]));
    let added = run_ok(splan(&db).args(["quote", "add", &fixture("quotes.toml")]));
    let ids = stdout_lines(&added);

    run_ok(splan(&db).args(["quote", "update", &ids[1], &fixture("supplier-b-restock.toml")]));

    let ls = run_ok(splan(&db).args(["quote", "ls", "--json"]));
    let val = assert_single_json(&ls.stdout);
    assert_eq!(val[1]["items"].as_array().unwrap().len(), 2);
    assert_eq!(val[1]["total_value"], "5.00");

    // Multi-quote documents are refused for update.
    assert_eq!(exit_code(splan(&db).args(["quote", "update", &ids[1], &fixture("quotes.toml")])), 4);
}

#[test]
fn list_add_without_lists_is_input_error() {
    let (_dir, db) = temp_db();
    assert_eq!(exit_code(splan(&db).args(["list", "add", &fixture("quotes.toml")])), 4);
}
