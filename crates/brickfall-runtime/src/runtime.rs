use brickfall_engine::{Action, GameView, PieceSeed};
use rand::Rng as _;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    RuntimeError,
    actor::{Actor, Command},
    config::RuntimeConfig,
    sink::SoundSink,
    ticker,
};

/// Running game session.
///
/// Spawns the actor task that owns the game and, when
/// [`RuntimeConfig::auto_tick`] is set, the ticker task that drives gravity.
/// Use [`handle`](Self::handle) to interact with the game.
///
/// # Example
///
/// ```
/// use brickfall_engine::{Action, PieceSeed};
/// use brickfall_runtime::{GameRuntime, RuntimeConfig, SilentSink};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), brickfall_runtime::RuntimeError> {
/// let config = RuntimeConfig::default().with_seed(PieceSeed::from_bytes([1; 16]));
/// let runtime = GameRuntime::spawn(config, SilentSink);
/// let handle = runtime.handle();
///
/// let mut views = handle.subscribe();
/// handle.dispatch(Action::Reset)?;
/// let view = views.wait_for(|view| view.is_running()).await.expect("runtime is alive");
/// assert!(!view.piece().is_empty());
/// drop(view);
///
/// runtime.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GameRuntime {
    handle: GameHandle,
    seed: PieceSeed,
    actor: JoinHandle<()>,
    ticker: Option<JoinHandle<()>>,
}

impl GameRuntime {
    /// Starts a new game session on the current tokio runtime.
    ///
    /// The session begins in the `Onboard` status; send `Reset` to start playing.
    #[must_use]
    pub fn spawn<S>(config: RuntimeConfig, sink: S) -> Self
    where
        S: SoundSink,
    {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let view = GameView::new().with_muted(config.muted);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(view.clone());

        tracing::debug!(%seed, auto_tick = config.auto_tick, "spawning game runtime");

        let ticker = config
            .auto_tick
            .then(|| tokio::spawn(ticker::run(command_tx.downgrade(), view_rx.clone())));
        let actor = Actor::new(view, seed.into_rng(), sink, command_rx, view_tx);
        let actor = tokio::spawn(actor.run());

        Self {
            handle: GameHandle {
                commands: command_tx,
                views: view_rx,
            },
            seed,
            actor,
            ticker,
        }
    }

    /// Seed the session's pieces are generated from.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn handle(&self) -> GameHandle {
        self.handle.clone()
    }

    /// Stops the actor and the ticker, and waits for both to finish.
    ///
    /// Handles still held elsewhere keep their last snapshot but every
    /// further dispatch fails with [`RuntimeError::Closed`].
    pub async fn shutdown(self) {
        // Already closed when the actor has stopped on its own.
        let _ = self.handle.commands.send(Command::Shutdown);
        if let Err(err) = self.actor.await {
            tracing::warn!(%err, "game actor task failed");
        }
        if let Some(ticker) = self.ticker {
            ticker.abort();
            let _ = ticker.await;
        }
    }
}

/// Cloneable access to a running game.
#[derive(Debug, Clone)]
pub struct GameHandle {
    commands: mpsc::UnboundedSender<Command>,
    views: watch::Receiver<GameView>,
}

impl GameHandle {
    /// Queues `action`; actions are applied in the order they are dispatched.
    pub fn dispatch(&self, action: Action) -> Result<(), RuntimeError> {
        self.commands
            .send(Command::Dispatch(action))
            .map_err(|_| RuntimeError::Closed)
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn view(&self) -> GameView {
        self.views.borrow().clone()
    }

    /// A receiver notified of every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GameView> {
        self.views.clone()
    }

    /// Whether the session has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}
