use rstest::rstest;
use sumo_config::load_toml;

fn rejects(toml: &str, needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("config should be rejected");
    let msg = format!("{err}").to_lowercase();
    assert!(msg.contains(needle), "expected {needle:?} in {msg:?}");
}

#[test]
fn full_document_round_trips_through_validate() {
    let toml = r#"
[filter]
window = 4

[detector]
threshold = 2000
settle_ms = 350
cooldown_ms = 900

[speeds]
search = 150
sustained = 300
full = 400
reverse = 200
turn = 200
evade = 400

[timing]
tick_hz = 50
countdown_ms = 0
turn_ms = 320
evade_ms = 450
jitter_min = -1
jitter_max = 3

[proximity]
confirmations = 2
samples_per_tick = 3

[logging]
level = "debug"
rotation = "daily"

[sim]
seed = 42
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.filter.window, 4);
    assert_eq!(cfg.detector.cooldown_ms, 900);
    assert_eq!(cfg.timing.countdown_ms, 0);
    assert_eq!(cfg.sim.seed, 42);
    // untouched keys keep their defaults
    assert_eq!(cfg.timing.stop_ms, 100);
    assert_eq!(cfg.sim.impact_accel, 3500);
}

#[rstest]
#[case("[filter]\nwindow = 0\n", "filter.window must be >= 1")]
#[case("[detector]\nthreshold = 0\n", "detector.threshold must be > 0")]
#[case("[speeds]\nsearch = 0\n", "speeds.search must be in 1..=400")]
#[case("[speeds]\nevade = 401\n", "speeds.evade must be in 1..=400")]
#[case("[speeds]\nturn = -200\n", "speeds.turn must be in 1..=400")]
#[case("[speeds]\nsearch = 300\nfull = 250\n", "speeds.full must be >= speeds.search")]
#[case("[timing]\ntick_hz = 0\n", "timing.tick_hz must be > 0")]
#[case("[timing]\nturn_ms = 0\n", "timing.turn_ms must be > 0")]
#[case("[timing]\nevade_ms = 0\n", "timing.evade_ms must be > 0")]
#[case("[timing]\nturn_ms = 9223372036854775807\n", "timing.turn_ms must be <= 10000")]
#[case("[timing]\nreverse_ms = 60000\n", "timing.reverse_ms must be <= 10000")]
#[case("[timing]\nfull_speed_limit_ms = 10001\n", "timing.full_speed_limit_ms must be <= 10000")]
#[case("[timing]\njitter_min = 3\njitter_max = 2\n", "jitter_min must be <= timing.jitter_max")]
#[case("[timing]\njitter_min = -4\n", "would make a turn non-positive")]
#[case("[proximity]\nconfirmations = 0\n", "proximity.confirmations must be >= 1")]
#[case("[proximity]\nsamples_per_tick = 0\n", "proximity.samples_per_tick must be >= 1")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation must be one of")]
fn rejects_invalid_sections(#[case] toml: &str, #[case] needle: &str) {
    rejects(toml, needle);
}

#[test]
fn jitter_floor_just_above_zero_is_accepted() {
    // 300 + (-3 * 75) = 75 ms
    let cfg = load_toml("[timing]\njitter_min = -3\n").expect("parse TOML");
    cfg.validate().expect("75 ms turn is still a turn");
}

#[test]
fn unknown_types_fail_at_parse_time() {
    let err = load_toml("[filter]\nwindow = \"three\"\n").expect_err("type mismatch");
    assert!(format!("{err}").contains("window"));
}

#[test]
fn longest_allowed_maneuver_is_accepted() {
    let cfg = load_toml("[timing]\nturn_ms = 10000\nevade_ms = 10000\n").expect("parse TOML");
    cfg.validate().expect("10 s holds are at the limit");
}
