#![no_main]

use libfuzzer_sys::fuzz_target;
use docgate_core::config::DocgateConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(config) = DocgateConfig::parse(content) {
            let _ = config.validate();
            let _ = config.retrieval.render_mode();
            let _ = config.retrieval.result_limit();
        }
    }
});
