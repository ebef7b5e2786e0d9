use std::fs;
use std::process::Command;

use tdm_eda::dashboard::{generate, render_shell, DASHBOARD_FILE, TABS};
use tdm_eda::EdaConfig;
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> EdaConfig {
    EdaConfig {
        out_dir: dir.path().to_path_buf(),
        ..EdaConfig::default()
    }
}

#[test]
fn every_chart_file_is_written_and_non_empty() {
    let dir = TempDir::new().unwrap();
    let mut seen = Vec::new();
    let report = generate(&config_for(&dir), |a| seen.push(a.name.clone())).unwrap();

    assert_eq!(report.rows, 1745);
    assert_eq!(report.charts.len(), 6);
    for tab in TABS {
        let path = dir.path().join(tab.file_name);
        let meta = fs::metadata(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
        assert!(meta.len() > 0, "{} is empty", tab.file_name);
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("Plotly.newPlot"));
    }
    assert_eq!(seen.len(), 7);
    assert_eq!(seen.last().map(String::as_str), Some(DASHBOARD_FILE));
}

#[test]
fn dashboard_file_matches_rendered_shell() {
    let dir = TempDir::new().unwrap();
    let report = generate(&config_for(&dir), |_| {}).unwrap();
    let html = fs::read_to_string(dir.path().join(DASHBOARD_FILE)).unwrap();
    assert_eq!(html, render_shell(1745));
    assert_eq!(report.dashboard.bytes, html.len());
    assert_eq!(html.matches("class=\"nav-btn").count(), 6);
    assert_eq!(html.matches("class=\"chart-container").count(), 6);
}

#[test]
fn output_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let cfg = EdaConfig {
        out_dir: nested.clone(),
        records: 50,
        ..EdaConfig::default()
    };
    generate(&cfg, |_| {}).unwrap();
    assert!(nested.join(DASHBOARD_FILE).exists());
}

#[test]
fn reruns_are_byte_identical() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    let ra = generate(&config_for(&a), |_| {}).unwrap();
    let rb = generate(&config_for(&b), |_| {}).unwrap();
    assert_eq!(ra.fingerprint, rb.fingerprint);
    for tab in TABS {
        let x = fs::read(a.path().join(tab.file_name)).unwrap();
        let y = fs::read(b.path().join(tab.file_name)).unwrap();
        assert_eq!(x, y, "{} differs between runs", tab.file_name);
    }
}

#[test]
fn unwritable_output_is_an_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, b"x").unwrap();
    let cfg = EdaConfig {
        out_dir: blocker.join("sub"),
        ..EdaConfig::default()
    };
    let err = generate(&cfg, |_| {}).unwrap_err();
    assert!(format!("{:#}", err).contains("create output dir"));
}

#[test]
fn binary_reports_failure_and_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"x").unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_tdm-eda"))
        .env("EDA_OUT_DIR", blocker.join("sub"))
        .env("LOG_LEVEL", "info")
        .env("LOG_DOMAINS", "all")
        .env_remove("LOG_DIR")
        .output()
        .unwrap();

    assert!(out.status.success(), "exit status {:?}", out.status);
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stdout.contains("[ERROR] Generation failed:"), "stdout: {}", stdout);
    assert!(stdout.contains("create output dir"), "stdout: {}", stdout);
    assert!(!stdout.contains("[SUCCESS]"));
    let failure = stderr
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .find(|rec| rec["event"] == "generation_failed")
        .unwrap_or_else(|| panic!("no generation_failed record in: {}", stderr));
    assert_eq!(failure["lvl"], "ERROR");
}
