use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    core::{Board, Bounds, Cell, Direction, Piece},
    engine::{
        game_stats::{GameStats, MAX_LEVEL},
        piece_generator::PieceReserve,
    },
};

/// Tick period at level 1.
const BASE_TICK_MILLIS: u64 = 650;
/// Tick period reduction per level above 1.
const TICK_STEP_MILLIS: u64 = 55;

/// Period between two `GameTick` actions at `level`.
///
/// `650 - 55 * (level - 1)` milliseconds; levels outside `1..=10` are clamped.
///
/// ```
/// use std::time::Duration;
/// use brickfall_engine::tick_interval;
///
/// assert_eq!(tick_interval(1), Duration::from_millis(650));
/// assert_eq!(tick_interval(10), Duration::from_millis(155));
/// ```
#[must_use]
pub fn tick_interval(level: u32) -> Duration {
    let steps = u64::from(level.clamp(1, MAX_LEVEL) - 1);
    Duration::from_millis(BASE_TICK_MILLIS - TICK_STEP_MILLIS * steps)
}

/// Lifecycle status of a game.
///
/// ```text
/// Onboard ──Reset──▶ Running ◀──Resume── Paused
///                     │  ▲  └───Pause────▶  │
///            GameTick │  │ flash done       │ Reset
///                     ▼  │                  ▼
///               LineClearing        ScreenClearing ──▶ Onboard / GameOver
/// ```
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::IsVariant,
)]
pub enum GameStatus {
    /// Idle, no active piece.
    #[default]
    Onboard,
    /// Normal play.
    Running,
    /// Play suspended until `Resume`.
    Paused,
    /// Transient: full rows are flashing.
    LineClearing,
    /// Transient: the board is being wiped.
    ScreenClearing,
    /// Terminal until `Reset`.
    GameOver,
}

/// Discrete input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Action {
    Move(Direction),
    Reset,
    Pause,
    Resume,
    Rotate,
    Drop,
    GameTick,
    Mute,
}

/// Sound cue requested by a transition.
///
/// The engine never plays sounds; hosts receive cues together with the
/// mute flag and decide what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Cue {
    Move,
    Rotate,
    Start,
    Drop,
    Clean,
}

/// Immutable snapshot of a whole game.
///
/// Every reduction step produces a new `GameView`; nothing outside this crate
/// mutates one in place. Two snapshots compare equal when all their fields do.
///
/// # Example
///
/// ```
/// use brickfall_engine::{Action, GameStatus, GameView, PieceSeed};
///
/// let mut rng = PieceSeed::from_bytes([1; 16]).into_rng();
/// let view = GameView::new();
/// assert_eq!(view.status(), GameStatus::Onboard);
///
/// let view = view.reduce(Action::Reset, &mut rng).view;
/// assert!(view.is_running());
/// assert!(!view.piece().is_empty());
/// assert!(view.next_piece().is_some());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameView {
    pub(crate) board: Board,
    pub(crate) piece: Piece,
    pub(crate) reserve: PieceReserve,
    pub(crate) bounds: Bounds,
    pub(crate) status: GameStatus,
    pub(crate) stats: GameStats,
    pub(crate) muted: bool,
}

impl GameView {
    /// A fresh idle game on the standard board.
    #[must_use]
    pub fn new() -> Self {
        Self::onboard(Bounds::STANDARD, false)
    }

    /// A fresh idle game on a custom board.
    #[must_use]
    pub fn with_bounds(bounds: Bounds) -> Self {
        Self::onboard(bounds, false)
    }

    pub(crate) fn onboard(bounds: Bounds, muted: bool) -> Self {
        Self {
            board: Board::EMPTY,
            piece: Piece::EMPTY,
            reserve: PieceReserve::EMPTY,
            bounds,
            status: GameStatus::Onboard,
            stats: GameStats::new(),
            muted,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling piece, or [`Piece::EMPTY`] when there is none.
    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    #[must_use]
    pub fn reserve(&self) -> &PieceReserve {
        &self.reserve
    }

    /// Preview of the piece that spawns after the current one locks.
    #[must_use]
    pub fn next_piece(&self) -> Option<&Piece> {
        self.reserve.peek()
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn stats(&self) -> GameStats {
        self.stats
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.stats.score()
    }

    #[must_use]
    pub fn lines(&self) -> u32 {
        self.stats.lines()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.stats.level()
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.status.is_paused()
    }

    /// Period until the next `GameTick` at the current level.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.level())
    }

    /// Same snapshot with the mute flag set to `muted`.
    #[must_use]
    pub fn with_muted(&self, muted: bool) -> Self {
        Self {
            muted,
            ..self.clone()
        }
    }

    pub(crate) fn with_status(&self, status: GameStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub(crate) fn with_piece(&self, piece: Piece) -> Self {
        Self {
            piece,
            ..self.clone()
        }
    }
}

/// Renders the playfield: `#` for bricks, `@` for the falling piece, `.` for empty cells.
///
/// Piece cells above the board are not shown.
impl fmt::Display for GameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.bounds.height() {
            for x in 0..self.bounds.width() {
                let cell = Cell::new(x, y);
                let c = if self.board.contains(cell) {
                    '#'
                } else if self.piece.cells().any(|p| p == cell) {
                    '@'
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::PieceKind;

    use super::*;

    #[test]
    fn test_tick_interval() {
        assert_eq!(tick_interval(1), Duration::from_millis(650));
        assert_eq!(tick_interval(2), Duration::from_millis(595));
        assert_eq!(tick_interval(10), Duration::from_millis(155));
        assert_eq!(tick_interval(0), Duration::from_millis(650));
        assert_eq!(tick_interval(99), Duration::from_millis(155));
    }

    #[test]
    fn test_new_view_is_idle() {
        let view = GameView::new();
        assert_eq!(view.status(), GameStatus::Onboard);
        assert!(view.board().is_empty());
        assert!(view.piece().is_empty());
        assert_eq!(view.next_piece(), None);
        assert_eq!(view.bounds(), Bounds::STANDARD);
        assert_eq!((view.score(), view.lines(), view.level()), (0, 0, 1));
        assert!(!view.is_running());
        assert!(!view.is_paused());
        assert!(!view.is_muted());
        assert_eq!(view, GameView::default());
    }

    #[test]
    fn test_display() {
        let view = GameView {
            board: Board::from_cells([Cell::new(0, 2), Cell::new(2, 2)]).unwrap(),
            piece: Piece::new(PieceKind::O, Cell::new(1, 1)),
            status: GameStatus::Running,
            ..GameView::with_bounds(Bounds::new(3, 3))
        };
        assert_eq!(view.to_string(), ".@@\n.@@\n#.#\n");
    }

    #[test]
    fn test_serialization_round_trip() {
        let view = GameView {
            board: Board::from_cells([Cell::new(0, 23)]).unwrap(),
            piece: Piece::new(PieceKind::L, Cell::new(4, 3)),
            status: GameStatus::Paused,
            muted: true,
            ..GameView::new()
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"status\":\"Paused\""));
        let back: GameView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }
}
