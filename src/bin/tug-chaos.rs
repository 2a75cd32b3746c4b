use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};
use tug::chaos::{Canvas, ChaosGame};
use tug::sync::CrossbeamTug;
use tug::{Config, LogView, Ticker};

const WIDTH: usize = 1000;
const HEIGHT: usize = 800;

fn init_logger() {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
            .write_style_or("RUST_LOG_STYLE", "AUTO"),
    )
    .format_timestamp(None)
    .init();
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn main() -> ExitCode {
    init_logger();

    let config = Config::from_millis(env_u64("TUG_POLL_MS").unwrap_or(125));
    let run_for = Duration::from_secs(env_u64("TUG_RUN_SECS").unwrap_or(5));
    let limit = env_u64("TUG_POINTS");
    let base = env::var("TUG_OUTPUT").unwrap_or_else(|_| "tug-chaos".to_string());

    let (mut consumer, mut producer) = CrossbeamTug::<Canvas>::pair();
    let latest = consumer.latest();

    let producer_config = config.clone();
    let worker = thread::spawn(move || {
        let mut game = ChaosGame::new(WIDTH, HEIGHT, limit);
        let result = producer.run(&mut game, &producer_config);
        info!("producer plotted {} points", game.plotted());
        result
    });

    let ticker = Ticker::new(&config);
    info!("polling every {:?} for up to {run_for:?}", ticker.interval());

    let started = Instant::now();
    let mut view = LogView::default();
    let ticked = ticker.run(&mut consumer, &mut view, |c| {
        c.producer_done() || started.elapsed() >= run_for
    });

    let mut status = ExitCode::SUCCESS;
    match ticked {
        Ok(state) => info!("consumer finished in {state:?} after {} snapshots", view.snapshots()),
        Err(err) => {
            error!("consumer failed: {err} ({})", err.as_label());
            status = ExitCode::FAILURE;
        }
    }

    match worker.join() {
        Ok(Ok(state)) => info!("producer finished in {state:?}"),
        Ok(Err(err)) => {
            error!("producer failed: {err}");
            status = ExitCode::FAILURE;
        }
        Err(_) => {
            error!("producer thread panicked");
            status = ExitCode::FAILURE;
        }
    }

    if !latest.is_set() {
        info!("no image received, nothing to save");
    } else if let Some(canvas) = latest.load() {
        let mut counter = 0;
        if let Err(err) = canvas.save_next(Path::new("."), &base, &mut counter) {
            error!("saving image failed: {err}");
            status = ExitCode::FAILURE;
        }
    }

    status
}
