#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing and validation may reject the input but must never panic.
    // Anything validate() accepts must also build a controller config.
    if let Ok(cfg) = sumo_config::load_toml(data)
        && cfg.validate().is_ok()
    {
        let core: sumo_core::CoreCfg = (&cfg).into();
        assert!(core.speeds.full >= core.speeds.search);
    }
});
