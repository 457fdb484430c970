use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use std::fs;
use std::path::PathBuf;
mod test_env;

/// Port 9 (discard) refuses connections, so every request fails fast
const UNREACHABLE_API: &str = "http://127.0.0.1:9/api";

/// Helper to create a temporary HOME with an rc file pointing at a dead server
fn setup_test_env() -> (TempDir, std::sync::MutexGuard<'static, ()>) {
    let guard = test_env::lock_test_env();
    let temp_dir = TempDir::new().unwrap();

    let config_dir = temp_dir.path().join(".changedesk");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("rc"),
        format!("api.base_url={}\napi.timeout_secs=2\n", UNREACHABLE_API),
    )
    .unwrap();
    (temp_dir, guard)
}

fn session_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join(".changedesk").join("session.json")
}

fn write_session(temp_dir: &TempDir, username: &str, role: &str) {
    let session = json!({
        "token": "test-token",
        "user": {
            "username": username,
            "name": format!("{} user", username),
            "role": role,
            "api_role": "ADMIN",
            "email": null,
            "instansi": "Dinas Kominfo"
        }
    });
    fs::write(session_path(temp_dir), serde_json::to_string_pretty(&session).unwrap()).unwrap();
}

fn get_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("changedesk").unwrap();
    cmd.env("HOME", temp_dir.path());
    cmd.env_remove("CHANGEDESK_API_URL");
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_version_flag() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir)
        .args(["--version"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("changedesk {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_whoami_reads_session_offline() {
    let (temp_dir, _guard) = setup_test_env();
    write_session(&temp_dir, "kasi", "kasi");

    get_cmd(&temp_dir)
        .args(["whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as kasi"))
        .stdout(predicate::str::contains("kasi user"));

    get_cmd(&temp_dir)
        .args(["whoami", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"role\": \"kasi\""));
}

#[test]
fn test_not_logged_in_is_user_error() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir)
        .args(["changes", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_corrupt_session_is_internal_error() {
    let (temp_dir, _guard) = setup_test_env();
    fs::write(session_path(&temp_dir), "{not json").unwrap();
    get_cmd(&temp_dir)
        .args(["whoami"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::starts_with("Internal error:"))
        .stderr(predicate::str::contains("Caused by:"));
}

#[test]
fn test_reject_without_note_sends_nothing() {
    let (temp_dir, _guard) = setup_test_env();
    write_session(&temp_dir, "kasi", "kasi");

    get_cmd(&temp_dir)
        .args(["approvals", "reject", "CR-1", "--note", "   "])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("A note is required for Reject"));

    get_cmd(&temp_dir)
        .args(["approvals", "need-info", "CR-1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("A note is required for Need Info"));
}

#[test]
fn test_logout_clears_session_when_server_unreachable() {
    let (temp_dir, _guard) = setup_test_env();
    write_session(&temp_dir, "budi", "teknisi");
    assert!(session_path(&temp_dir).exists());

    get_cmd(&temp_dir)
        .args(["logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
    assert!(!session_path(&temp_dir).exists());

    get_cmd(&temp_dir)
        .args(["logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_list_fetch_failure_degrades_to_empty() {
    let (temp_dir, _guard) = setup_test_env();
    write_session(&temp_dir, "kasi", "kasi");

    get_cmd(&temp_dir)
        .args(["changes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No change requests found."));

    get_cmd(&temp_dir)
        .args(["assets", "list", "router"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No assets found."));
}

#[test]
fn test_empty_list_json_is_empty_array() {
    let (temp_dir, _guard) = setup_test_env();
    write_session(&temp_dir, "kasi", "kasi");

    get_cmd(&temp_dir)
        .args(["changes", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::eq("[]\n"));

    get_cmd(&temp_dir)
        .args(["emergency", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::eq("[]\n"));
}

#[test]
fn test_unknown_filter_suggests_key() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir)
        .args(["changes", "list", "stauts:Approved"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown filter 'stauts'. Did you mean 'status'?"));

    get_cmd(&temp_dir)
        .args(["emergency", "list", "dinas:Kominfo"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does not apply to emergency tickets"));
}

#[test]
fn test_permission_checked_before_request() {
    let (temp_dir, _guard) = setup_test_env();
    write_session(&temp_dir, "budi", "teknisi");
    get_cmd(&temp_dir)
        .args([
            "patch-jobs", "create", "--asset", "A1", "--before", "1.0", "--after", "1.1",
            "--deadline", "2026-11-01", "--dinas", "Dinas A",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Role 'teknisi' cannot create patch jobs"));

    write_session(&temp_dir, "diskominfo", "diskominfo");
    get_cmd(&temp_dir)
        .args(["assets", "update", "7", "lokasi=Gedung B"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot edit CMDB assets"));
}

#[test]
fn test_asset_update_argument_errors() {
    let (temp_dir, _guard) = setup_test_env();
    write_session(&temp_dir, "budi", "teknisi");

    get_cmd(&temp_dir)
        .args(["assets", "update", "7", "lokasi"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Expected key=value, got 'lokasi'"));

    get_cmd(&temp_dir)
        .args(["assets", "update", "7", "kode_bmd=X"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("kode_bmd cannot be edited"));
}

#[test]
fn test_workflow_checklist() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir)
        .args(["workflow", "change-request", "Approved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Revision"))
        .stdout(predicate::str::contains("[x] Approved  <- current"))
        .stdout(predicate::str::contains("[ ] Scheduled"));

    get_cmd(&temp_dir)
        .args(["work", "patch-job", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Deploying  <- current"))
        .stdout(predicate::str::contains("[ ] Succeeded / Failed / Partially Failed"));

    get_cmd(&temp_dir)
        .args(["workflow", "patch-job", "Partially", "Failed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Partially Failed  <- current"));
}

#[test]
fn test_workflow_unknown_status_and_name() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir)
        .args(["workflow", "change-request", "Cancelled"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] Submitted"))
        .stdout(predicate::str::contains("status 'Cancelled' is not part of this workflow"));

    get_cmd(&temp_dir)
        .args(["workflow", "incident", "Open"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown workflow 'incident'"));
}

#[test]
fn test_roles() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir)
        .args(["roles", "kabid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("standard, major"));

    get_cmd(&temp_dir)
        .args(["roles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("teknisi"))
        .stdout(predicate::str::contains("diskominfo"));

    get_cmd(&temp_dir)
        .args(["roles", "admin"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown role 'admin'"));
}

#[test]
fn test_ambiguous_abbreviation() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir)
        .args(["lo"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Ambiguous command 'lo'. Did you mean one of: login, logout?"));
}
