//! Config file loading and parameter resolution

use std::num::NonZeroU32;
use std::time::Duration;

use lattice_config::{CaptureParameters, ConfigError, LatticeConfig};

use crate::common::Sandbox;

#[test]
fn file_values_flow_into_parameters() {
    let sandbox = Sandbox::new();
    sandbox.write_config(
        "[capture]\ndelay_between_capture_ms = 750\nmax_confirmation_attempts = 3\n\n[shape]\nmin_points = 5\n",
    );

    let config = LatticeConfig::load_from(&sandbox.config_path()).unwrap();
    let params = CaptureParameters::from_config(Some(&config));

    assert_eq!(params.delay_between_capture, Duration::from_millis(750));
    assert_eq!(params.max_confirmation_attempts, NonZeroU32::new(3));
    assert_eq!(params.shape.min_points(), 5);
    assert!(params.vibrate_on_invalid);
}

#[test]
fn parse_errors_carry_the_path() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[capture]\ndelay_between_capture_ms = \"soon\"\n");

    let err = LatticeConfig::load_from(&sandbox.config_path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), &sandbox.config_path());
}

#[test]
fn missing_file_is_a_read_error() {
    let sandbox = Sandbox::new();

    let err = LatticeConfig::load_from(&sandbox.config_path()).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn broken_config_falls_back_to_defaults_in_the_binary() {
    let sandbox = Sandbox::new();
    sandbox.write_config("this is not toml");
    let path = sandbox.write_script("short.txt", &crate::common::gesture(&[1, 5]));

    let output = sandbox.run(&["enroll", path.to_str().unwrap()]);

    assert!(output.status.success(), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("using defaults"), "{stderr}");
}
