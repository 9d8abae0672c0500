use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use brickfall_engine::{Action, Cue, Direction, GameView, PieceSeed};
use brickfall_runtime::{GameHandle, GameRuntime, RuntimeConfig, SoundSink};
use rand::Rng;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Seed for piece generation (32 hex characters); random when omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Stop the session after this many seconds
    #[clap(long, default_value_t = 30)]
    duration_secs: u64,
    /// Milliseconds between two bot inputs
    #[clap(long, default_value_t = 120)]
    bot_interval_ms: u64,
    /// Start with sound cues muted
    #[clap(long)]
    muted: bool,
    /// Print the final snapshot as JSON
    #[clap(long)]
    json: bool,
    /// Write the final snapshot to a file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

/// Sound sink that reports cues through the log.
#[derive(Debug, Default, Clone, Copy)]
struct LogSink;

impl SoundSink for LogSink {
    fn notify(&self, cue: Cue, muted: bool) {
        if muted {
            tracing::trace!(?cue, "sound muted");
        } else {
            tracing::debug!(?cue, "sound");
        }
    }
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to create tokio runtime")?;
    let view = runtime.block_on(play(arg))?;
    util::save_view(&view, arg.output.as_deref(), arg.json)
}

async fn play(arg: &RunArg) -> anyhow::Result<GameView> {
    let RunArg {
        seed,
        duration_secs,
        bot_interval_ms,
        muted,
        ..
    } = arg;

    let config = RuntimeConfig {
        seed: *seed,
        auto_tick: true,
        muted: *muted,
    };
    let runtime = GameRuntime::spawn(config, LogSink);
    tracing::info!(seed = %runtime.seed(), "session started");

    let handle = runtime.handle();
    handle.dispatch(Action::Reset)?;

    let deadline = Instant::now() + Duration::from_secs(*duration_secs);
    let result = drive_bot(&handle, deadline, Duration::from_millis(*bot_interval_ms)).await;
    let view = handle.view();
    runtime.shutdown().await;
    result?;

    tracing::info!(
        score = view.score(),
        lines = view.lines(),
        level = view.level(),
        "session finished"
    );
    Ok(view)
}

/// Sends random inputs until `deadline` passes or the game is over.
async fn drive_bot(
    handle: &GameHandle,
    deadline: Instant,
    interval: Duration,
) -> anyhow::Result<()> {
    let mut views = handle.subscribe();
    let mut inputs = time::interval(interval);
    inputs.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rng = rand::rng();

    loop {
        tokio::select! {
            () = time::sleep_until(deadline) => {
                tracing::info!("time is up");
                return Ok(());
            }
            changed = views.changed() => {
                changed.context("game runtime stopped unexpectedly")?;
                if views.borrow_and_update().status().is_game_over() {
                    return Ok(());
                }
            }
            _ = inputs.tick() => {
                if handle.view().is_running() {
                    handle.dispatch(bot_action(&mut rng))?;
                }
            }
        }
    }
}

fn bot_action<R>(rng: &mut R) -> Action
where
    R: Rng + ?Sized,
{
    match rng.random_range(0..10) {
        0..=2 => Action::Move(Direction::Left),
        3..=5 => Action::Move(Direction::Right),
        6..=7 => Action::Rotate,
        8 => Action::Move(Direction::Down),
        _ => Action::Drop,
    }
}
