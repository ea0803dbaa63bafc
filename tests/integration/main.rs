//! Integration tests for setup-texlive

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the runner environment and the user's config
    fn setup_texlive(config_dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("setup-texlive");
        cmd.env_remove("GITHUB_ACTIONS")
            .env_remove("GITHUB_OUTPUT")
            .env_remove("GITHUB_PATH")
            .env_remove("INPUT_PACKAGES")
            .env_remove("INPUT_PACKAGE_FILE")
            .env_remove("INPUT_REPOSITORY")
            .env_remove("INPUT_CACHE_VERSION")
            .env_remove("INPUT_TEXLIVE_VERSION")
            .env_remove("INPUT_ACCEPT-STALE")
            .env("SETUP_TEXLIVE_CONFIG", config_dir.path().join("config.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Provision a cached TeX Live installation"));
    }

    #[test]
    fn version_displays() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("setup-texlive"));
    }

    #[test]
    fn platform_prints_identifier() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir).arg("platform").assert().success().stdout(
            predicate::str::contains("-linux")
                .or(predicate::str::contains("universal-darwin"))
                .or(predicate::str::contains("windows")),
        );
    }

    #[test]
    fn config_path_honours_override() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[mirror]"))
            .stdout(predicate::str::contains("mirrors.v2.json"));
    }

    #[test]
    fn config_init_writes_file() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir)
            .args(["config", "init"])
            .assert()
            .success();
        assert!(dir.path().join("config.toml").is_file());
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[mirror\n").unwrap();
        setup_texlive(&dir)
            .arg("platform")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn run_requires_packages() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir)
            .args(["run", "--cache-version", "v1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("package-file or packages input required"));
    }

    #[test]
    fn run_requires_cache_version() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir)
            .args(["run", "--packages", "latexmk"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Input required and not supplied: cache_version",
            ));
    }

    #[test]
    fn key_without_mirror() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir)
            .args(["key", "--packages", "b a", "--cache-version", "v1", "--no-mirror"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "-v1-7e18f737311b2dc3b2f269dd78396b0351f14fb66efa879f768cb23181883c78-NONE-\n",
            ))
            .stdout(predicate::str::contains("key=texlive-"));
    }

    #[test]
    fn key_reads_runner_inputs() {
        let dir = TempDir::new().unwrap();
        let packages = dir.path().join("texlive.packages");
        std::fs::write(&packages, "# comment\na\nb # trailing\n").unwrap();

        setup_texlive(&dir)
            .args(["key", "--no-mirror"])
            .env("INPUT_CACHE_VERSION", "v1")
            .env("INPUT_PACKAGE_FILE", &packages)
            .env("INPUT_PACKAGES", "")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "-v1-7e18f737311b2dc3b2f269dd78396b0351f14fb66efa879f768cb23181883c78-NONE-\n",
            ));
    }

    #[test]
    fn key_with_explicit_repository_skips_catalog() {
        let dir = TempDir::new().unwrap();
        setup_texlive(&dir)
            .args([
                "key",
                "--packages",
                "latexmk",
                "--cache-version",
                "v2",
                "--repository",
                "https://example.invalid/tlnet",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("-v2-"))
            .stdout(predicate::str::contains("-NONE-"));
    }
}
