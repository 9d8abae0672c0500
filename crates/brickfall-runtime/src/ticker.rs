use brickfall_engine::{Action, GameView};
use tokio::{
    sync::{mpsc, watch},
    time,
};

use crate::actor::Command;

/// Sends `GameTick` at the interval of the latest snapshot's level.
///
/// Holds only a weak sender, so it never keeps the actor alive; it stops as
/// soon as the actor has exited.
pub(crate) async fn run(
    commands: mpsc::WeakUnboundedSender<Command>,
    views: watch::Receiver<GameView>,
) {
    loop {
        let interval = views.borrow().tick_interval();
        time::sleep(interval).await;

        if views.has_changed().is_err() {
            break;
        }
        if !views.borrow().is_running() {
            continue;
        }
        let Some(commands) = commands.upgrade() else {
            break;
        };
        if commands.send(Command::Dispatch(Action::GameTick)).is_err() {
            break;
        }
    }
    tracing::debug!("ticker stopped");
}
