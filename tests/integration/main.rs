//! Integration tests for stage0

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn stage0(dir: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("stage0");
        cmd.current_dir(dir)
            .env_remove("RUST_LOG")
            .env_remove("STAGE0_CONFIG");
        cmd
    }

    fn source_tree(manifest: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/nightlies.txt"), manifest).unwrap();
        dir
    }

    #[test]
    fn version_displays() {
        let dir = TempDir::new().unwrap();
        stage0(dir.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("stage0"));
    }

    #[test]
    fn missing_source_root_fails() {
        let dir = TempDir::new().unwrap();
        stage0(dir.path())
            .arg("build")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error:"))
            .stderr(predicate::str::contains("src/nightlies.txt"));
    }

    #[test]
    fn malformed_manifest_fails() {
        let dir = source_tree("rustc 2016-01-01\ncargo: 2016-01-01\n");
        fs::write(
            dir.path().join("config.toml"),
            "[build]\nbuild = \"x86_64-unknown-linux-gnu\"\n",
        )
        .unwrap();

        stage0(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid release manifest"));
    }

    #[test]
    fn malformed_config_fails() {
        let dir = source_tree("rustc: 2016-01-01\ncargo: 2016-01-01\n");
        fs::write(dir.path().join("config.toml"), "[build\n").unwrap();

        stage0(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[cfg(unix)]
    fn script(path: &Path, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        fs::write(path, format!("#!/bin/sh\n{body}")).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Overridden tools skip the download; the fake cargo "compiles" a
    /// driver that echoes its arguments and exits with 3.
    #[cfg(unix)]
    #[test]
    fn overridden_toolchain_hands_off_to_driver() {
        let dir = source_tree("rustc: 2016-01-01\ncargo: 2016-01-01\n");
        let tools = dir.path().join("tools");
        fs::create_dir_all(&tools).unwrap();

        script(&tools.join("rustc"), "exit 0\n");
        script(
            &tools.join("cargo"),
            r#"mkdir -p "$CARGO_TARGET_DIR/debug"
cat > "$CARGO_TARGET_DIR/debug/bootstrap" <<'EOS'
#!/bin/sh
echo "driver: $@"
echo "parent: $BOOTSTRAP_PARENT_ID"
exit 3
EOS
chmod +x "$CARGO_TARGET_DIR/debug/bootstrap"
"#,
        );

        fs::write(
            dir.path().join("config.toml"),
            format!(
                "[build]\nbuild = \"x86_64-unknown-linux-gnu\"\nrustc = \"{}\"\ncargo = \"{}\"\n",
                tools.join("rustc").display(),
                tools.join("cargo").display()
            ),
        )
        .unwrap();

        stage0(dir.path())
            .args(["build", "--stage", "1"])
            .assert()
            .code(3)
            .stdout(predicate::str::contains("driver: build --stage 1 --src"))
            .stdout(predicate::str::contains("--build x86_64-unknown-linux-gnu"))
            .stdout(predicate::str::contains("parent: "));

        assert!(dir.path().join("build/bootstrap/debug/bootstrap").exists());
        assert!(!dir.path().join("build/cache").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failing_driver_build_exits_with_error() {
        let dir = source_tree("rustc: 2016-01-01\ncargo: 2016-01-01\n");
        let tools = dir.path().join("tools");
        fs::create_dir_all(&tools).unwrap();
        script(&tools.join("rustc"), "exit 0\n");
        script(&tools.join("cargo"), "exit 101\n");

        fs::write(
            dir.path().join("config.toml"),
            format!(
                "[build]\nbuild = \"x86_64-unknown-linux-gnu\"\nrustc = \"{}\"\ncargo = \"{}\"\n",
                tools.join("rustc").display(),
                tools.join("cargo").display()
            ),
        )
        .unwrap();

        stage0(dir.path())
            .arg("build")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("exit code: 101"));
    }
}
