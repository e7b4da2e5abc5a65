// SPDX-License-Identifier: MIT OR Apache-2.0
//! Seamloop demo - headless host for the loop engine
//!
//! Builds a looping strip of cards from a RON settings file (or the
//! built-in defaults) and drives it through a scripted session:
//! - Free running with autoplay
//! - Index navigation across the seam
//! - A drag with a throw
//! - Visibility changes and a viewport resize
//! - Teardown
//!
//! Usage: `seamloop_demo [settings.ron] [effective.ron]`
//!
//! When a second path is given, the settings actually used for the session
//! are written there.

mod host;
mod settings;

use host::{Card, SimulatedHost};
use seamloop_engine::{LoopEngine, LoopError, LoopEvent, TransitionOptions};
use settings::{DemoSettings, SettingsError};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Errors that end the demo
#[derive(Debug, Error)]
enum DemoError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("failed to build loop: {0}")]
    Loop(#[from] LoopError),
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive(
            "seamloop_demo=debug"
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::DEBUG.into()),
        );

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting seamloop demo v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let settings_path = args.next();
    let effective_path = args.next();

    if let Err(e) = run(settings_path, effective_path) {
        tracing::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(settings_path: Option<PathBuf>, effective_path: Option<PathBuf>) -> Result<(), DemoError> {
    let settings = match settings_path {
        Some(path) => {
            tracing::info!("Loading settings from {}", path.display());
            DemoSettings::load(&path)?
        }
        None => DemoSettings::default(),
    };
    if let Some(path) = effective_path {
        settings.save(&path)?;
        tracing::info!("Wrote effective settings to {}", path.display());
    }
    let frame = settings.frame_time();

    let mut host = SimulatedHost::new(&settings);
    let mut engine = LoopEngine::build(SimulatedHost::cards(&settings), &host, settings.loop_config.clone())?;
    host.observe(&mut engine);

    engine.subscribe(|event: &LoopEvent<'_, Card>| {
        match event {
            LoopEvent::Changed(change) => tracing::info!(
                index = change.index,
                progress = format_args!("{:.3}", change.progress),
                "now showing {} of {}",
                change.item.title,
                change.total_items
            ),
            LoopEvent::Settled { index, cause } => {
                tracing::info!(index, ?cause, "settled");
            }
        }
        Ok(())
    });

    tracing::info!(
        cards = engine.item_count(),
        loop_length = engine.layout().total_length(),
        period = engine.duration(),
        "loop ready"
    );

    let run_frames = |engine: &mut LoopEngine<Card>, host: &SimulatedHost, seconds: f64| {
        let frames = (seconds / frame).round() as usize;
        for _ in 0..frames {
            engine.tick(frame);
        }
        tracing::debug!(time = engine.time(), "{}", host.render(engine));
    };

    run_frames(&mut engine, &host, settings.run_seconds);

    engine.pause();
    engine.to_index(-1, TransitionOptions::over(0.6));
    run_frames(&mut engine, &host, 1.0);
    engine.next(TransitionOptions::default());
    run_frames(&mut engine, &host, 2.0);

    engine.set_visible(false);
    run_frames(&mut engine, &host, 3.0);
    engine.set_visible(true);

    let drag_start = settings.viewport_width * 0.75;
    if engine.press(drag_start) {
        for step in 1..=10 {
            engine.drag_to(drag_start - 18.0 * f64::from(step));
            engine.tick(frame);
        }
        engine.release(drag_start - 180.0, -900.0);
        run_frames(&mut engine, &host, 1.5);
    }

    if let Some(width) = settings.resized_viewport_width {
        host.resize(width);
        if !engine.on_resize(&host) {
            tracing::warn!("resize ignored, keeping previous layout");
        }
        run_frames(&mut engine, &host, 1.0);
    }

    tracing::info!(index = engine.current(), "tearing down");
    engine.teardown();
    tracing::info!(
        remaining_observers = host.active_registrations().len(),
        "demo finished"
    );
    Ok(())
}
