use serde::{Deserialize, Serialize};

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 700 points
/// - 4 lines: 1500 points
const SCORE_TABLE: [u32; 5] = [0, 100, 300, 700, 1500];

/// Flat bonus for every non-empty piece that locks, whether or not it clears lines.
pub const LOCK_BONUS: u32 = 12;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 20;

/// Highest reachable level.
pub const MAX_LEVEL: u32 = 10;

/// Points for clearing `rows` lines with a single lock.
///
/// Anything outside the table (including 0) scores nothing.
#[must_use]
pub fn line_clear_score(rows: usize) -> u32 {
    SCORE_TABLE.get(rows).copied().unwrap_or(0)
}

/// Score and line totals of a game.
///
/// # Scoring
///
/// - Each lock adds [`line_clear_score`] for the rows it cleared
/// - Each lock of a non-empty piece also adds [`LOCK_BONUS`]
///
/// The level is derived, never stored: `min(10, 1 + lines / 20)`.
///
/// # Example
///
/// ```
/// use brickfall_engine::GameStats;
///
/// let stats = GameStats::new().record_lock(4, true);
///
/// assert_eq!(stats.score(), 1500 + 12);
/// assert_eq!(stats.lines(), 4);
/// assert_eq!(stats.level(), 1);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score: u32,
    lines: u32,
}

impl GameStats {
    /// Creates a new tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { score: 0, lines: 0 }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn lines(&self) -> u32 {
        self.lines
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        u32::min(MAX_LEVEL, 1 + self.lines / LINES_PER_LEVEL)
    }

    /// Returns the totals after a piece lock that cleared `cleared_rows` rows.
    ///
    /// `piece_locked` is `false` when the active piece was the empty sentinel,
    /// in which case no lock bonus is granted.
    #[must_use]
    pub fn record_lock(self, cleared_rows: usize, piece_locked: bool) -> Self {
        let bonus = if piece_locked { LOCK_BONUS } else { 0 };
        let rows = u32::try_from(cleared_rows).unwrap_or(u32::MAX);
        Self {
            score: self.score + line_clear_score(cleared_rows) + bonus,
            lines: self.lines.saturating_add(rows),
        }
    }
}
