//! Headless demo: a scripted hand cycles open → away → fist while the swarm
//! runs against a logging sink.
//!
//! ```text
//! RUST_LOG=debug cargo run -- [config.json] [seconds]
//! ```

use std::time::Duration;

use env_logger::Env;
use handswarm::prelude::*;
use handswarm::visuals::BucketStyle;

/// Seconds each scripted phase lasts.
const PHASE_SECS: f32 = 3.0;

fn scripted_hand(tick_hz: f32) -> ScriptedSource {
    let ticks = (PHASE_SECS * tick_hz.max(1.0)) as usize;
    let open = HandDetection::synthetic(0.6, 0.95);
    let fist = HandDetection::synthetic(0.05, 0.95);

    let script = std::iter::repeat(Some(open))
        .take(ticks)
        .chain(std::iter::repeat(None).take(ticks))
        .chain(std::iter::repeat(Some(fist)).take(ticks))
        .chain(std::iter::repeat(None).take(ticks));
    ScriptedSource::new(script).looping()
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SwarmConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => SwarmConfig::default(),
    };
    let seconds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(12);

    for category in Category::ALL {
        let style = BucketStyle::for_category(category);
        log::info!(
            "{:?} bucket: emissive {:?} x{:.1}, roughness {:.2}, metalness {:.1}",
            category,
            style.emissive.to_array(),
            style.emissive_intensity,
            style.roughness,
            style.metalness
        );
    }

    let tick_hz = config.tracking.tick_hz;
    let mut last = GestureState::None;
    let sink = move |frame: &FrameBuffers| {
        if frame.gesture != last {
            log::info!(
                "[{:>6.2}s] swarm now {} ({} round, {} angular instances)",
                frame.time,
                frame.gesture,
                frame.bucket(Category::Round).len(),
                frame.bucket(Category::Angular).len()
            );
            last = frame.gesture;
        }
    };

    let mut session = match Session::new(config) {
        Ok(session) => session.with_sink(sink),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = session.start_tracking(scripted_hand(tick_hz)) {
        log::error!("{}", e);
    }

    for _ in 0..seconds * 2 {
        session.run_for(Duration::from_millis(500));
        log::info!(
            "{:>5} frames | {:>5.1} fps | {} | mean distance to logo {:.3}",
            session.clock().frame(),
            session.clock().fps(),
            session.gesture(),
            session.swarm().mean_target_distance()
        );
    }

    session.teardown();
}
