//! Integration test suite for the `jb` CLI
use assert_cmd::Command;

/// Helper function to run the `main` binary with the given arguments and
/// return a [`assert_cmd::assert::Assert`].
fn run_main(args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("jb").expect("Failed to find main binary");
    cmd.args(args);
    cmd.assert()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    /// Parse the command's stdout as JSON for shape comparisons.
    fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
        let output = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");
        serde_json::from_str(output.trim())
            .expect("Failed to parse output JSON")
    }

    #[test]
    fn valid_file_pretty_prints() {
        let assert =
            run_main(&["tests/data/simple.json"]).success().code(0);
        let output = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");
        // Pretty output spans multiple lines and reparses to the original.
        assert!(output.lines().count() > 1, "expected pretty output");
        let expected: Value = serde_json::from_str(
            &std::fs::read_to_string("tests/data/simple.json")
                .expect("fixture readable"),
        )
        .expect("fixture is valid JSON");
        assert_eq!(stdout_json(&assert), expected);
    }

    #[test]
    fn compact_output_is_single_line() {
        let assert = run_main(&["--compact", "tests/data/nested.json"])
            .success()
            .code(0);
        let output = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");
        assert_eq!(output.trim().lines().count(), 1);
        assert!(!output.trim().contains(' '), "compact output has spaces");
    }

    #[test]
    fn malformed_file_reports_line_and_column() {
        let assert = run_main(&["tests/data/malformed.json"]).failure().code(1);
        let stderr = String::from_utf8(assert.get_output().stderr.clone())
            .expect("Invalid UTF-8 stderr");
        // The stray name starts on line 3.
        assert!(
            stderr.contains("at line 3, column"),
            "missing location in: {stderr:?}"
        );
    }

    #[test]
    fn check_is_silent_on_valid_input() {
        run_main(&["--check", "tests/data/simple.json"])
            .success()
            .code(0)
            .stdout("");
    }

    #[test]
    fn check_fails_on_malformed_input() {
        run_main(&["--check", "tests/data/malformed.json"]).failure().code(1);
    }

    #[test]
    fn depth_flag_reports_nesting() {
        let assert = run_main(&["--depth", "--check", "tests/data/nested.json"]);
        // --check suppresses document output but not the parse itself
        assert.success();

        let assert =
            run_main(&["--depth", "--compact", "tests/data/nested.json"])
                .success();
        let output = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");
        assert!(
            output.starts_with("Depth: 7"),
            "unexpected depth line in: {output:?}"
        );
    }

    #[test]
    fn reads_from_stdin_when_piped() {
        let mut cmd =
            Command::cargo_bin("jb").expect("Failed to find main binary");
        let assert = cmd
            .arg("--compact")
            .write_stdin(r#"{ "x": [1, 2, 3] }"#)
            .assert()
            .success();
        let output = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");
        assert_eq!(output.trim(), r#"{"x":[1,2,3]}"#);
    }

    #[test]
    fn nonexistent_file() {
        run_main(&["tests/data/missing.json"]).failure();
    }

    #[test]
    fn accepts_non_finite_extension_literals() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("nonfinite.json");
        std::fs::write(&path, "[NaN, Infinity, -Infinity]")
            .expect("write fixture");

        let mut cmd =
            Command::cargo_bin("jb").expect("Failed to find main binary");
        let assert =
            cmd.arg("--compact").arg(&path).assert().success().code(0);
        let output = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");
        assert_eq!(output.trim(), "[NaN,Infinity,-Infinity]");
    }
}
