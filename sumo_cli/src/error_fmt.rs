//! Human-readable error descriptions and structured JSON error formatting.

use sumo_core::error::{BuildError, SumoError};

/// Full context chain, outermost first, joined with ": ".
fn chain_text(err: &eyre::Report) -> String {
    err.chain()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingAccelerometer
            | BuildError::MissingBoundary
            | BuildError::MissingRangeFinder
            | BuildError::MissingDrive
            | BuildError::MissingRandom => format!(
                "What happened: The controller was built without a collaborator ({be}).\nLikely causes: A device failed to initialize or was not wired into the builder.\nHow to fix: Pass every device to the builder before try_build()."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/sumo.toml for a sample."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SumoError>() {
        return match se {
            SumoError::Timeout => "What happened: A device read timed out.\nLikely causes: Sensor not wired correctly or not powered.\nHow to fix: Check wiring and power, then rerun.".to_string(),
            SumoError::Hardware(msg) | SumoError::HardwareFault(msg) => format!(
                "What happened: The drive or a sensor failed mid-bout ({msg}).\nLikely causes: Motor driver fault, loose connection, or a speed outside the driver's range.\nHow to fix: Check the motor driver and wiring; the motors were stopped on the way out."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from config or trace loading
    let msg = chain_text(err);
    let lower = msg.to_ascii_lowercase();

    if lower.contains("trace csv must have headers") {
        return format!(
            "Invalid headers in trace CSV. Expected '{}'.",
            sumo_config::TRACE_HEADERS.join(",")
        );
    }

    if lower.contains("strictly increasing") || lower.contains("invalid csv row") {
        return format!(
            "What happened: The trace CSV is malformed.\nLikely causes: Out-of-order t_ms, a non-numeric field, or a flag other than 0/1/true/false.\nHow to fix: Fix the trace and rerun. Detail: {}",
            err.root_cause()
        );
    }

    if lower.contains("invalid configuration") {
        return format!(
            "What happened: Invalid configuration ({}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/sumo.toml for a sample.",
            err.root_cause()
        );
    }

    if lower.contains("parse config") {
        return format!(
            "What happened: The config file is not valid TOML for this controller.\nLikely causes: A typo, an unknown type, or a value of the wrong kind.\nHow to fix: Compare against etc/sumo.toml. Detail: {}",
            err.root_cause()
        );
    }

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read ({msg}).\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config <FILE> pointing at a readable TOML file."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 configuration, 4 hardware, 5 timeout, 1 anything else.
/// (clap itself exits with 2 on usage errors.)
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 3;
    }
    match err.downcast_ref::<SumoError>() {
        Some(SumoError::Timeout) => 5,
        Some(SumoError::Hardware(_) | SumoError::HardwareFault(_)) => 4,
        None if chain_text(err).contains("invalid configuration") => 3,
        None => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    match err.downcast_ref::<SumoError>() {
        Some(SumoError::Timeout) => "Timeout",
        Some(SumoError::Hardware(_) | SumoError::HardwareFault(_)) => "Hardware",
        None if chain_text(err).contains("invalid configuration") => "InvalidConfig",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardware_fault_maps_to_exit_code_4() {
        let err = eyre::Report::new(SumoError::HardwareFault("device disconnected: drive".into()))
            .wrap_err("set_speeds");
        assert_eq!(exit_code_for_error(&err), 4);
        assert!(humanize(&err).contains("drive or a sensor failed"));
    }

    #[test]
    fn validation_failure_is_a_config_error() {
        let err = eyre::eyre!("speeds.full must be in 1..=400, got 500").wrap_err("invalid configuration");
        assert_eq!(exit_code_for_error(&err), 3);
        assert!(humanize(&err).contains("speeds.full"));
    }

    #[test]
    fn error_json_carries_reason_and_message() {
        let err = eyre::Report::new(BuildError::InvalidConfig("tick_hz must be > 0"));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "InvalidConfig");
        assert_eq!(v["exit_code"], 3);
        assert!(v["message"].as_str().unwrap().contains("tick_hz"));
    }
}
