use std::{path::PathBuf, str::FromStr};

use brickfall_engine::{Action, Direction, GameView, PieceSeed};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Seed for piece generation (32 hex characters)
    #[clap(long)]
    seed: PieceSeed,
    /// Comma-separated actions: L, R, U, D (moves), rot, drop, T (tick), reset, pause, resume, mute
    #[clap(long, conflicts_with = "actions_file")]
    actions: Option<String>,
    /// JSON file holding an array of actions
    #[clap(long)]
    actions_file: Option<PathBuf>,
    /// Start from a muted snapshot
    #[clap(long)]
    muted: bool,
    /// Print the final snapshot as JSON
    #[clap(long)]
    json: bool,
    /// Write the final snapshot to a file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown action {token:?} at position {position}")]
pub(crate) struct ParseActionError {
    token: String,
    position: usize,
}

/// One action as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActionToken(Action);

impl FromStr for ActionToken {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.to_ascii_lowercase().as_str() {
            "l" | "left" => Action::Move(Direction::Left),
            "r" | "right" => Action::Move(Direction::Right),
            "u" | "up" => Action::Move(Direction::Up),
            "d" | "down" => Action::Move(Direction::Down),
            "rot" | "rotate" => Action::Rotate,
            "drop" => Action::Drop,
            "t" | "tick" => Action::GameTick,
            "reset" => Action::Reset,
            "pause" => Action::Pause,
            "resume" => Action::Resume,
            "mute" => Action::Mute,
            _ => return Err(()),
        };
        Ok(Self(action))
    }
}

/// Parses a comma-separated action list; blank entries are skipped.
pub(crate) fn parse_actions(input: &str) -> Result<Vec<Action>, ParseActionError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(position, token)| {
            token
                .parse::<ActionToken>()
                .map(|ActionToken(action)| action)
                .map_err(|()| ParseActionError {
                    token: token.to_owned(),
                    position,
                })
        })
        .collect()
}

/// Applies `actions` in order, skipping animation pacing.
///
/// Every animated transition collapses to the snapshot it settles on.
pub(crate) fn replay(seed: PieceSeed, muted: bool, actions: &[Action]) -> GameView {
    let mut rng = seed.into_rng();
    actions
        .iter()
        .fold(GameView::new().with_muted(muted), |view, &action| {
            let transition = view.reduce(action, &mut rng);
            if !transition.cues.is_empty() {
                tracing::trace!(?action, cues = ?transition.cues, "sound cues");
            }
            let next = transition.into_final_view();
            if next.status() != view.status() {
                tracing::debug!(?action, from = ?view.status(), to = ?next.status(), "status changed");
            }
            next
        })
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        seed,
        actions,
        actions_file,
        muted,
        json,
        output,
    } = arg;

    let actions: Vec<Action> = match (actions, actions_file) {
        (_, Some(path)) => util::read_json_file("actions", path)?,
        (Some(actions), None) => parse_actions(actions)?,
        (None, None) => Vec::new(),
    };
    tracing::info!(%seed, actions = actions.len(), "replaying");

    let view = replay(*seed, *muted, &actions);
    util::save_view(&view, output.as_deref(), *json)
}
