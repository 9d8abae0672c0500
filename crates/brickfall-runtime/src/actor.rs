use std::collections::VecDeque;

use brickfall_engine::{Action, Frame, GameStatus, GameView};
use rand_pcg::Pcg32;
use tokio::{
    sync::{mpsc, watch},
    time::{self, Instant},
};

use crate::sink::SoundSink;

/// Message delivered to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Dispatch(Action),
    Shutdown,
}

/// Frames of an animated transition waiting to be published.
#[derive(Debug, Default)]
struct Script {
    frames: VecDeque<Frame>,
    next_frame_at: Option<Instant>,
}

impl Script {
    fn is_playing(&self) -> bool {
        self.next_frame_at.is_some()
    }

    /// Replaces the pending frames; the first one is due immediately.
    fn start(&mut self, frames: Vec<Frame>, now: Instant) {
        self.frames = frames.into();
        self.next_frame_at = (!self.frames.is_empty()).then_some(now);
    }

    /// Takes the due frame and schedules the next one after its hold.
    fn advance(&mut self) -> Option<Frame> {
        let due_at = self.next_frame_at?;
        let frame = self.frames.pop_front()?;
        self.next_frame_at = (!self.frames.is_empty()).then(|| due_at + frame.hold);
        Some(frame)
    }

    fn set_muted(&mut self, muted: bool) {
        for frame in &mut self.frames {
            frame.view = frame.view.with_muted(muted);
        }
    }
}

/// Single owner of the current game snapshot.
pub(crate) struct Actor<S> {
    view: GameView,
    script: Script,
    rng: Pcg32,
    sink: S,
    commands: mpsc::UnboundedReceiver<Command>,
    views: watch::Sender<GameView>,
}

impl<S> Actor<S>
where
    S: SoundSink,
{
    pub(crate) fn new(
        view: GameView,
        rng: Pcg32,
        sink: S,
        commands: mpsc::UnboundedReceiver<Command>,
        views: watch::Sender<GameView>,
    ) -> Self {
        Self {
            view,
            script: Script::default(),
            rng,
            sink,
            commands,
            views,
        }
    }

    /// Processes commands and script frames until shut down.
    ///
    /// Exits on [`Command::Shutdown`] or once every sender is gone.
    pub(crate) async fn run(mut self) {
        loop {
            let next_frame_at = self.script.next_frame_at;
            tokio::select! {
                biased;
                () = time::sleep_until(next_frame_at.unwrap_or_else(Instant::now)),
                    if next_frame_at.is_some() =>
                {
                    if let Some(frame) = self.script.advance() {
                        self.publish(frame.view);
                    }
                }
                command = self.commands.recv() => match command {
                    Some(Command::Dispatch(action)) => self.apply(action),
                    Some(Command::Shutdown) | None => break,
                },
            }
        }
        tracing::debug!("game runtime stopped");
    }

    fn apply(&mut self, action: Action) {
        if action == Action::Mute && self.script.is_playing() {
            let muted = !self.view.is_muted();
            self.script.set_muted(muted);
            self.publish(self.view.with_muted(muted));
            return;
        }

        let transition = self.view.reduce(action, &mut self.rng);
        for &cue in &transition.cues {
            tracing::trace!(?cue, ?action, "sound cue");
            self.sink.notify(cue, self.view.is_muted());
        }

        if transition.script.is_empty() {
            if transition.view != self.view {
                self.publish(transition.view);
            }
            return;
        }

        tracing::trace!(
            ?action,
            frames = transition.script.len(),
            "animation started"
        );
        self.script.start(transition.script, Instant::now());
        self.publish(transition.view);
    }

    fn publish(&mut self, view: GameView) {
        let (from, to) = (self.view.status(), view.status());
        if from != to {
            tracing::debug!(?from, ?to, "status changed");
            match to {
                GameStatus::GameOver => {
                    tracing::info!(score = view.score(), lines = view.lines(), "game over");
                }
                GameStatus::Onboard => tracing::info!("game reset"),
                GameStatus::Running if from.is_onboard() || from.is_game_over() => {
                    tracing::info!("game started");
                }
                _ => {}
            }
        }
        self.view = view.clone();
        self.views.send_replace(view);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use brickfall_engine::{BOARD_HEIGHT, PieceSeed};

    use crate::sink::SilentSink;

    use super::*;

    fn idle_frames(count: usize, hold: Duration) -> Vec<Frame> {
        (0..count)
            .map(|_| Frame::new(GameView::new(), hold))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_schedules_each_frame_after_previous_hold() {
        let hold = Duration::from_millis(50);
        let mut script = Script::default();
        let start = Instant::now();
        script.start(idle_frames(3, hold), start);

        assert_eq!(script.next_frame_at, Some(start));
        assert!(script.advance().is_some());
        assert_eq!(script.next_frame_at, Some(start + hold));
        assert!(script.advance().is_some());
        assert_eq!(script.next_frame_at, Some(start + hold * 2));
        assert!(script.advance().is_some());
        assert_eq!(script.next_frame_at, None);
        assert!(script.advance().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_script_is_not_playing() {
        let mut script = Script::default();
        script.start(Vec::new(), Instant::now());
        assert!(!script.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mute_reaches_pending_frames() {
        let mut script = Script::default();
        script.start(idle_frames(2, Duration::ZERO), Instant::now());
        script.set_muted(true);
        while let Some(frame) = script.advance() {
            assert!(frame.view.is_muted());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_actor_runs_wipe_to_completion() {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (view_tx, mut view_rx) = watch::channel(GameView::new());
        let rng = PieceSeed::from_bytes([3; 16]).into_rng();
        let actor = Actor::new(GameView::new(), rng, SilentSink, command_rx, view_tx);
        let task = tokio::spawn(actor.run());

        command_tx.send(Command::Dispatch(Action::Reset)).unwrap();
        view_rx.wait_for(GameView::is_running).await.unwrap();

        let start = Instant::now();
        command_tx.send(Command::Dispatch(Action::Reset)).unwrap();
        view_rx
            .wait_for(|view| view.status() == GameStatus::Onboard)
            .await
            .unwrap();

        // Every wipe frame but the settled one holds for 50ms.
        let frames = u32::try_from(2 * BOARD_HEIGHT + 1).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50) * frames);

        command_tx.send(Command::Shutdown).unwrap();
        task.await.unwrap();
    }
}
