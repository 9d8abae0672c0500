use std::collections::{BTreeMap, BTreeSet};

use crate::core::{Board, Bounds, Piece};

/// Result of locking a piece into the board.
///
/// The three boards drive the line-clear animation: the flash alternates
/// between `locked` and `flashing`, and the game continues from `compacted`.
/// When nothing was cleared all three are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Board with the piece merged and nothing removed.
    pub locked: Board,
    /// Full rows removed, rows above left where they were.
    pub flashing: Board,
    /// Full rows removed and everything above each one shifted down.
    pub compacted: Board,
    /// Number of full rows removed.
    pub cleared_rows: usize,
}

/// Merges `piece` into `board` and clears every full row.
///
/// A row is full when its occupied column count equals the board width.
/// Rows are processed top to bottom, so each cleared row shifts only the
/// rows above it and simultaneous clears compact correctly.
#[must_use]
pub fn settle(board: &Board, piece: &Piece, bounds: Bounds) -> Settlement {
    let locked = board.with_piece(piece);

    let mut columns_by_row: BTreeMap<i32, BTreeSet<i32>> = BTreeMap::new();
    for cell in locked.cells() {
        columns_by_row.entry(cell.y).or_default().insert(cell.x);
    }
    let full_rows: Vec<i32> = columns_by_row
        .into_iter()
        .filter(|(_, columns)| columns.len() == bounds.columns())
        .map(|(y, _)| y)
        .collect();

    let mut flashing = locked.clone();
    let mut compacted = locked.clone();
    for &y in &full_rows {
        flashing = flashing.without_row(y);
        compacted = compacted.collapse_row(y);
    }

    Settlement {
        locked,
        flashing,
        compacted,
        cleared_rows: full_rows.len(),
    }
}
