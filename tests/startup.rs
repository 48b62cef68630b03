use std::process::Command;

#[test]
fn server_refuses_to_start_without_api_key() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_jobs-crm-assistant"))
        .env_clear()
        .env("PORT", "0")
        .current_dir(dir.path())
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "server started: {stderr}");
    assert!(stderr.contains("OPENAI_API_KEY"), "stderr: {stderr}");
    // Logging is configured after settings, so nothing about listening is printed.
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Listening"));
}

#[test]
fn add_frontmatter_fails_on_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_add-frontmatter"))
        .arg("absent.mdc")
        .env_clear()
        .current_dir(dir.path())
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("absent.mdc"), "stderr: {stderr}");
    assert!(!dir.path().join("absent.mdc").exists());
}

#[test]
fn add_frontmatter_patches_once() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("rule.mdc");
    std::fs::write(&doc, "# Rules\n").unwrap();

    for _ in 0..2 {
        let status = Command::new(env!("CARGO_BIN_EXE_add-frontmatter"))
            .arg(&doc)
            .env_clear()
            .status()
            .unwrap();
        assert!(status.success());
    }

    let content = std::fs::read_to_string(&doc).unwrap();
    assert!(content.starts_with("---\n"));
    assert_eq!(content.matches("alwaysApply: false").count(), 1);
    assert!(content.ends_with("# Rules\n"));
}
