//! `vkb-replay`: run a recorded touch trace and print the mouse events it
//! produces, one JSON object per line.
//!
//! ```text
//! RUST_LOG=vkb_touch=trace vkb-replay trace.json
//! ```

use std::process::ExitCode;
use vkb_touch::replay::{GridHost, ReplayError, Trace, run_trace};

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: vkb-replay <trace.json>");
        return ExitCode::from(2);
    };

    match replay(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("vkb-replay: {path}: {err}");
            ExitCode::FAILURE
        }
    }
}

fn replay(path: &str) -> Result<(), ReplayError> {
    let trace = Trace::from_json(&std::fs::read_to_string(path)?)?;
    let mut host = GridHost::default();
    for dispatched in run_trace(&trace, &mut host) {
        println!("{}", serde_json::to_string(&dispatched)?);
    }
    if !host.pulses.is_empty() {
        log::info!("{} haptic pulse(s) requested", host.pulses.len());
    }
    Ok(())
}
