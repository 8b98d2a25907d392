//! Integration test suite for the `jscan` CLI
use assert_cmd::Command;

/// Helper function to run the `jscan` binary with the given arguments and
/// optional STDIN, returning a [`assert_cmd::assert::Assert`].
fn run_main(args: &[&str], stdin: Option<&str>) -> assert_cmd::assert::Assert {
    let mut cmd =
        Command::cargo_bin("jscan").expect("Failed to find main binary");
    cmd.args(args);
    // Keep decode diagnostics on stderr only, free of log noise.
    cmd.env_remove("RUST_LOG");
    cmd.write_stdin(stdin.unwrap_or_default());
    cmd.assert()
}

/// Decodes captured output as UTF-8.
fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).expect("Invalid UTF-8 output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Write;

    #[test]
    fn reports_type_of_each_object() {
        let assert =
            run_main(&["tests/data/events.json"], None).success().code(0);
        let output = assert.get_output();

        assert_eq!(
            text(&output.stdout),
            "Got object: cpu\n\
             Got object: blockstats\n\
             Got object: net_interface\n\
             Got object: unknown\n"
        );
        assert!(text(&output.stderr).is_empty());
    }

    #[test]
    fn reads_stdin() {
        let assert = run_main(&[], Some("{\"type\": \"a\"}{\"type\": \"b\"}"))
            .success();
        assert_eq!(
            text(&assert.get_output().stdout),
            "Got object: a\nGot object: b\n"
        );
    }

    #[test]
    fn empty_input() {
        let assert = run_main(&["--count"], Some("")).success();
        let output = assert.get_output();
        assert_eq!(text(&output.stdout), "Objects: 0\nDecode errors: 0\n");
        assert!(text(&output.stderr).is_empty());
    }

    #[test]
    fn decode_errors_go_to_stderr() {
        let assert = run_main(&["--count", "tests/data/malformed.json"], None)
            .success()
            .code(0);
        let output = assert.get_output();

        // The truncated last object is dropped without a diagnostic.
        assert_eq!(
            text(&output.stdout),
            "Got object: first\n\
             Got object: second\n\
             Objects: 2\n\
             Decode errors: 1\n"
        );
        let stderr = text(&output.stderr);
        let lines: Vec<&str> = stderr.lines().collect();
        assert_eq!(lines.len(), 1, "stderr: {stderr:?}");
        assert!(lines[0].starts_with("JSON decode error: "));
    }

    #[test]
    fn custom_field() {
        let assert = run_main(
            &["--field", "interface", "tests/data/events.json"],
            None,
        )
        .success();
        assert_eq!(
            text(&assert.get_output().stdout),
            "Got object: unknown\n\
             Got object: unknown\n\
             Got object: eth0\n\
             Got object: unknown\n"
        );
    }

    #[test]
    fn limit_stops_early() {
        let assert =
            run_main(&["-n", "1", "tests/data/events.json"], None).success();
        assert_eq!(text(&assert.get_output().stdout), "Got object: cpu\n");
    }

    #[test]
    fn print_compact_objects() {
        let assert = run_main(
            &["--print", "--compact", "-n", "2", "tests/data/events.json"],
            None,
        )
        .success();
        let stdout = text(&assert.get_output().stdout);
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Got object: cpu");
        assert_eq!(lines[1], r#"{"type":"cpu","load":[0.5,0.25]}"#);
        assert_eq!(lines[2], "Got object: blockstats");

        let second: Value = serde_json::from_str(lines[3])
            .expect("Failed to parse output JSON");
        assert_eq!(second["device"], "sda");
    }

    #[test]
    fn print_pretty_objects() {
        let input = "{\"type\": \"x\", \"nested\": {\"k\": [1, 2]}}";
        let assert = run_main(&["--print"], Some(input)).success();
        let stdout = text(&assert.get_output().stdout);

        let mut lines = stdout.lines();
        assert_eq!(lines.next(), Some("Got object: x"));
        let body = lines.collect::<Vec<_>>().join("\n");
        assert!(body.contains('\n'), "expected multi-line output: {body}");

        let printed: Value =
            serde_json::from_str(&body).expect("Failed to parse output JSON");
        let expected: Value = serde_json::from_str(input)
            .expect("Failed to parse expected JSON");
        assert_eq!(printed, expected);
    }

    #[test]
    fn nonexistent_file() {
        let assert = run_main(&["tests/data/does-not-exist.json"], None);
        let stderr = text(&assert.failure().code(1).get_output().stderr);
        assert!(stderr.contains("Failed to read file"));
    }

    #[test]
    fn objects_split_across_many_lines() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        for i in 0..50 {
            write!(file, "{{\n  \"type\":\n  \"t{i}\"\n}}").expect("write");
        }
        file.flush().expect("flush");

        let path = file.path().to_str().expect("UTF-8 temp path");
        let assert = run_main(&["--count", path], None).success();
        let stdout = text(&assert.get_output().stdout);
        let lines: Vec<&str> = stdout.lines().collect();

        assert_eq!(lines.len(), 52);
        assert_eq!(lines[0], "Got object: t0");
        assert_eq!(lines[49], "Got object: t49");
        assert_eq!(lines[50], "Objects: 50");
    }
}
