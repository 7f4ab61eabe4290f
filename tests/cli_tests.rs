//! CLI integration tests
//!
//! Every test runs against its own temporary HOME; tests that need the API
//! point `api.base_url` at a local mock server.

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the rateport binary with an isolated HOME
fn rateport(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rateport").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("RATEPORT_API_KEY")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Write a config pointing the client at `base_url`
fn configure(home: &TempDir, base_url: &str) {
    let root = home.path().join(".rateport");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(
        root.join("config.toml"),
        format!("[api]\nbase_url = \"{base_url}\"\n"),
    )
    .unwrap();
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and usage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Currency converter backed by a local rate cache",
        ));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rateport"));
}

#[test]
fn test_convert_help() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert an amount"))
        .stdout(predicate::str::contains("--target"))
        .stdout(predicate::str::contains("--no-cache"));
}

#[test]
fn test_config_help() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage configuration"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_cache_help() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["cache", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage local cache"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("clear"));
}

#[test]
fn test_invalid_command() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["--quiet", "--verbose", "config", "path"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_output_format_options() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["--output", "pretty", "config", "path"])
        .assert()
        .success();

    rateport(&home)
        .args(["--output", "json", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exists\": false"));

    rateport(&home)
        .args(["--output", "invalid", "config", "path"])
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rateport"));
}

#[test]
fn test_aliases() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["i", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interactive conversion session"));

    rateport(&home)
        .args(["c", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List selectable currencies"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config and cache
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".rateport/config.toml"));
}

#[test]
fn test_config_set_and_show() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["config", "set", "cache.rate_ttl_minutes", "15"])
        .assert()
        .success();

    rateport(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rate_ttl_minutes = 15"));
}

#[test]
fn test_config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["config", "set", "nope", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_cache_status() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache Status"));
}

#[test]
fn test_cache_clear() {
    let home = TempDir::new().unwrap();
    rateport(&home)
        .args(["-o", "json", "cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions against a mock API
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_convert_caches_rate_between_runs() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/convert")
        .match_query(Matcher::UrlEncoded("q".into(), "USD_EUR".into()))
        .with_status(200)
        .with_body(r#"{"results": {"USD_EUR": {"val": 0.9}}}"#)
        .expect(1)
        .create();
    configure(&home, &server.url());

    rateport(&home)
        .args(["-o", "json", "convert", "usd", "eur", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"origin\": \"network\""))
        .stdout(predicate::str::contains("\"to_amount\": 90.0"));

    rateport(&home)
        .args(["-o", "json", "convert", "USD", "EUR", "--target", "45"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"origin\": \"cache\""))
        .stdout(predicate::str::contains("\"from_amount\": 50.0"));

    mock.assert();
}

#[test]
fn test_convert_no_cache_always_fetches() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/convert")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": {"GBP_USD": {"val": 1.25}}}"#)
        .expect(2)
        .create();
    configure(&home, &server.url());

    for _ in 0..2 {
        rateport(&home)
            .args(["--no-cache", "convert", "GBP", "USD", "4"])
            .assert()
            .success()
            .stdout(predicate::str::contains("4 GBP = 5 USD"));
    }

    mock.assert();
    assert!(!home.path().join(".rateport/data").exists());
}

#[test]
fn test_convert_network_failure_shows_alert() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/convert")
        .match_query(Matcher::Any)
        .with_status(500)
        .create();
    configure(&home, &server.url());

    rateport(&home)
        .args(["convert", "USD", "EUR"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "Sorry, a connection issue has occurred. Please try again later.",
        ));

    rateport(&home)
        .args(["-o", "json", "cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rates\": []"));
}

#[test]
fn test_countries_lists_unique_currencies() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/countries")
        .with_status(200)
        .with_body(
            r#"{"results": {
                "DE": {"currencyId": "EUR", "currencyName": "Euro"},
                "FR": {"currencyId": "EUR", "currencyName": "Euro"},
                "US": {"currencyId": "USD", "currencyName": "United States dollar"}
            }}"#,
        )
        .expect(1)
        .create();
    configure(&home, &server.url());

    rateport(&home)
        .arg("countries")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 currencies"));

    // Second run reads the cached list
    rateport(&home)
        .args(["countries", "--filter", "dollar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USD"))
        .stdout(predicate::str::contains("Euro").not());

    mock.assert();
}

#[test]
fn test_interactive_session() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let _countries = server
        .mock("GET", "/countries")
        .with_status(200)
        .with_body(r#"{"results": {"JP": {"currencyId": "JPY", "currencyName": "Yen"}}}"#)
        .create();
    let _rate = server
        .mock("GET", "/convert")
        .match_query(Matcher::UrlEncoded("q".into(), "EUR_JPY".into()))
        .with_status(200)
        .with_body(r#"{"results": {"EUR_JPY": {"val": 160.0}}}"#)
        .create();
    configure(&home, &server.url());

    rateport(&home)
        .arg("interactive")
        .write_stdin("from EUR\nto JPY\n2\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 currencies available"))
        .stdout(predicate::str::contains("2 EUR = 320 JPY"));
}
