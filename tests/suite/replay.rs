//! Script replay through the binary

use crate::common::{FAST_CONFIG, Sandbox, gesture, stdout_lines};

#[test]
fn enroll_and_confirm_stores_the_pattern() {
    let sandbox = Sandbox::new();
    sandbox.write_config(FAST_CONFIG);
    let script = format!(
        "# first entry\n{}wait 100\n# confirmation\n{}",
        gesture(&[1, 2, 3, 6]),
        gesture(&[1, 2, 3, 6])
    );
    let path = sandbox.write_script("enroll.txt", &script);

    let output = sandbox.run(&["enroll", path.to_str().unwrap()]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        stdout_lines(&output),
        [
            "enroll first_enrollment_complete",
            "final state=FeedbackPositive gate=Locked pending=false stored=true",
        ]
    );
}

#[test]
fn mismatched_confirmation_is_reported() {
    let sandbox = Sandbox::new();
    sandbox.write_config(FAST_CONFIG);
    let script = format!(
        "{}wait 100\n{}",
        gesture(&[1, 2, 3, 6]),
        gesture(&[1, 4, 8, 6])
    );
    let path = sandbox.write_script("enroll.txt", &script);

    let output = sandbox.run(&["enroll", path.to_str().unwrap()]);

    let lines = stdout_lines(&output);
    assert_eq!(
        lines[..2],
        [
            "enroll first_enrollment_complete",
            "enroll confirmation_mismatch"
        ]
    );
    assert!(lines[2].contains("pending=true stored=false"), "{lines:?}");
}

#[test]
fn enroll_then_authenticate_in_one_script() {
    let sandbox = Sandbox::new();
    sandbox.write_config(FAST_CONFIG);
    let script = format!(
        "{}wait 100\n{}restart authenticate\n{}",
        gesture(&[7, 4, 5, 3]),
        gesture(&[7, 4, 5, 3]),
        gesture(&[7, 4, 5, 3])
    );
    let path = sandbox.write_script("round_trip.txt", &script);

    let output = sandbox.run(&["enroll", path.to_str().unwrap()]);

    let lines = stdout_lines(&output);
    assert_eq!(
        lines[..2],
        [
            "enroll first_enrollment_complete",
            "authenticate verified"
        ]
    );
}

#[test]
fn authenticate_against_preloaded_credential() {
    let sandbox = Sandbox::new();
    sandbox.write_config(FAST_CONFIG);
    let script = format!(
        "{}wait 100\n{}",
        gesture(&[9, 8, 7, 4]),
        gesture(&[2, 5, 8, 9])
    );
    let path = sandbox.write_script("auth.txt", &script);

    let output = sandbox.run(&[
        "authenticate",
        path.to_str().unwrap(),
        "--credential",
        "2589",
    ]);

    assert!(output.status.success(), "{output:?}");
    let lines = stdout_lines(&output);
    assert_eq!(
        lines[..2],
        ["authenticate not_verified", "authenticate verified"]
    );
}

#[test]
fn skipped_middle_point_counts_toward_length() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[shape]\nmin_points = 3\nreject_weak = false\n");
    // 1 -> 3 passes over 2.
    let path = sandbox.write_script("skip.txt", &gesture(&[1, 3]));

    let output = sandbox.run(&["enroll", path.to_str().unwrap()]);

    assert_eq!(stdout_lines(&output)[0], "enroll first_enrollment_complete");
}

#[test]
fn short_pattern_is_rejected() {
    let sandbox = Sandbox::new();
    let path = sandbox.write_script("short.txt", &gesture(&[1, 5]));

    let output = sandbox.run(&["enroll", path.to_str().unwrap()]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout_lines(&output)[0], "enroll too_short");
}

#[test]
fn invalid_script_fails_with_line_number() {
    let sandbox = Sandbox::new();
    let path = sandbox.write_script("broken.txt", "down 150 150\ntap 450 150\n");

    let output = sandbox.run(&["enroll", path.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "{stderr}");
}

#[test]
fn logs_are_written_next_to_the_config() {
    let sandbox = Sandbox::new();
    let path = sandbox.write_script("short.txt", &gesture(&[1, 5]));

    let output = sandbox.run(&["enroll", path.to_str().unwrap()]);

    assert!(output.status.success(), "{output:?}");
    let log = std::fs::read_to_string(sandbox.path().join("logs").join("lattice.log"))
        .expect("log file");
    assert!(log.contains("Logging initialized"), "{log}");
}
