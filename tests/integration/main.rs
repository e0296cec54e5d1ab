//! Integration tests for lazydeploy

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn lazydeploy(dir: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("lazydeploy");
        cmd.current_dir(dir).env_remove("LAZYDEPLOY_CONFIG");
        cmd
    }

    /// A build directory next to a `file://` repository
    struct Workspace {
        temp: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::create_dir_all(temp.path().join("repo")).unwrap();
            fs::create_dir_all(temp.path().join("target")).unwrap();
            Self { temp }
        }

        fn path(&self) -> &Path {
            self.temp.path()
        }

        fn repo_url(&self) -> String {
            format!("local=file://{}", self.path().join("repo").display())
        }

        fn build(&self, name: &str, content: &[u8]) -> PathBuf {
            let path = self.path().join("target").join(name);
            fs::write(&path, content).unwrap();
            path
        }

        fn publish(&self, version_dir: &str, file: &str, content: &[u8]) {
            let dir = self.path().join("repo/org/example/app").join(version_dir);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(file), content).unwrap();
        }

        fn check(&self, version: &str, file: &Path) -> Command {
            let mut cmd = lazydeploy(self.path());
            cmd.args(["check", "--group", "org.example", "--name", "app"])
                .args(["--artifact-version", version])
                .arg("--file")
                .arg(file)
                .args(["--repo", &self.repo_url()])
                .arg("--properties")
                .arg(self.properties());
            cmd
        }

        fn properties(&self) -> PathBuf {
            self.path().join("target/build.properties")
        }
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        lazydeploy(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("skip deploying snapshots"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        lazydeploy(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("lazydeploy"));
    }

    #[test]
    fn compare_identical_and_different() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.bin"), b"same").unwrap();
        fs::write(temp.path().join("b.bin"), b"same").unwrap();
        fs::write(temp.path().join("c.bin"), b"sama").unwrap();

        lazydeploy(temp.path())
            .args(["compare", "a.bin", "b.bin"])
            .assert()
            .success()
            .stdout("identical\n");

        lazydeploy(temp.path())
            .args(["compare", "a.bin", "c.bin"])
            .assert()
            .code(1)
            .stdout("different\n");
    }

    #[test]
    fn compare_runs_without_configuration() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lazydeploy.toml"), "[http]\ntimeout_secs = 0\n").unwrap();
        fs::write(temp.path().join("a.bin"), b"same").unwrap();
        fs::write(temp.path().join("b.bin"), b"same").unwrap();

        lazydeploy(temp.path())
            .args(["compare", "a.bin", "b.bin"])
            .assert()
            .success()
            .stdout("identical\n");

        lazydeploy(temp.path())
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("timeout_secs"));
    }

    #[test]
    fn compare_missing_file() {
        let temp = TempDir::new().unwrap();
        lazydeploy(temp.path())
            .args(["compare", "nope.bin", "nope.bin"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[test]
    fn check_unchanged_sets_skip_property() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"jar contents");
        ws.publish("1.0-SNAPSHOT", "app-1.0-SNAPSHOT.jar", b"jar contents");

        ws.check("1.0-SNAPSHOT", &jar)
            .assert()
            .success()
            .stdout(predicate::str::contains("Deployment skipped"));

        let properties = fs::read_to_string(ws.properties()).unwrap();
        assert!(properties.contains("maven.deploy.skip=true"));
        assert!(ws
            .path()
            .join("target/lazydeploy/org/example/app/1.0-SNAPSHOT/app-1.0-SNAPSHOT.jar")
            .is_file());
    }

    #[test]
    fn check_follows_timestamped_metadata() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"build 3");
        ws.publish(
            "1.0-SNAPSHOT",
            "maven-metadata.xml",
            br#"<metadata><versioning><snapshot><timestamp>20240131.093015</timestamp><buildNumber>3</buildNumber></snapshot></versioning></metadata>"#,
        );
        ws.publish("1.0-SNAPSHOT", "app-1.0-20240131.093015-3.jar", b"build 3");

        ws.check("1.0-SNAPSHOT", &jar)
            .args(["--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""verdict": "unchanged""#));
    }

    #[test]
    fn check_changed_leaves_properties_untouched() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"new contents");
        ws.publish("1.0-SNAPSHOT", "app-1.0-SNAPSHOT.jar", b"old contents");

        ws.check("1.0-SNAPSHOT", &jar)
            .assert()
            .success()
            .stdout(predicate::str::contains("content differs"))
            .stdout(predicate::str::contains("Deployment required"));

        assert!(!ws.properties().exists());
    }

    #[test]
    fn check_never_published_is_changed() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"first build");

        ws.check("1.0-SNAPSHOT", &jar)
            .assert()
            .success()
            .stdout(predicate::str::contains("not published yet"));
    }

    #[test]
    fn check_offline_has_no_side_effects() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"contents");
        ws.publish("1.0-SNAPSHOT", "app-1.0-SNAPSHOT.jar", b"contents");

        ws.check("1.0-SNAPSHOT", &jar)
            .arg("--offline")
            .assert()
            .success()
            .stdout(predicate::str::contains("skipped (offline)"));

        assert!(!ws.path().join("target/lazydeploy").exists());
        assert!(!ws.properties().exists());
    }

    #[test]
    fn check_offline_ignores_malformed_properties() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"contents");
        fs::write(ws.properties(), "not a property line\n").unwrap();

        ws.check("1.0-SNAPSHOT", &jar)
            .arg("--offline")
            .assert()
            .success()
            .stdout(predicate::str::contains("skipped (offline)"));

        assert_eq!(
            fs::read_to_string(ws.properties()).unwrap(),
            "not a property line\n"
        );
    }

    #[test]
    fn check_release_is_not_checked() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"contents");
        ws.publish("1.0", "app-1.0.jar", b"contents");

        ws.check("1.0", &jar)
            .assert()
            .success()
            .stdout(predicate::str::contains("not a snapshot"));

        assert!(!ws.path().join("target/lazydeploy").exists());
    }

    #[test]
    fn check_with_changed_attachment() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"main");
        let sources = ws.build("app-sources.jar", b"edited");
        ws.publish("1.0-SNAPSHOT", "app-1.0-SNAPSHOT.jar", b"main");
        ws.publish("1.0-SNAPSHOT", "app-1.0-SNAPSHOT-sources.jar", b"original");

        ws.check("1.0-SNAPSHOT", &jar)
            .arg("--attach")
            .arg(format!("sources:jar={}", sources.display()))
            .assert()
            .success()
            .stdout(predicate::str::contains("Deployment required"));

        assert!(!ws.properties().exists());
    }

    #[test]
    fn check_reads_repositories_from_config() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"contents");
        ws.publish("1.0-SNAPSHOT", "app-1.0-SNAPSHOT.jar", b"contents");
        fs::write(
            ws.path().join("lazydeploy.toml"),
            format!(
                "[[repositories]]\nid = \"local\"\nurl = \"file://{}\"\n",
                ws.path().join("repo").display()
            ),
        )
        .unwrap();

        lazydeploy(ws.path())
            .args(["check", "-g", "org.example", "-n", "app", "--ver", "1.0-SNAPSHOT"])
            .arg("--file")
            .arg(&jar)
            .assert()
            .success()
            .stdout(predicate::str::contains("Deployment skipped"));
    }

    #[test]
    fn check_rejects_bad_repository() {
        let ws = Workspace::new();
        let jar = ws.build("app.jar", b"contents");

        lazydeploy(ws.path())
            .args(["check", "-g", "org.example", "-n", "app", "--ver", "1.0-SNAPSHOT"])
            .arg("--file")
            .arg(&jar)
            .args(["--repo", "ftp://example.com/repo"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        lazydeploy(temp.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lazydeploy.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        lazydeploy(temp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }

    #[test]
    fn config_init_then_refuse_overwrite() {
        let temp = TempDir::new().unwrap();
        lazydeploy(temp.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));
        assert!(temp.path().join("lazydeploy.toml").is_file());

        lazydeploy(temp.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));
    }
}
