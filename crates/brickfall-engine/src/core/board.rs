use std::{collections::HashSet, ops::Range};

use serde::{Deserialize, Serialize};

use crate::BrickOverlapError;

use super::geometry::{Bounds, Cell, Piece};

/// Settled bricks on the playfield.
///
/// A `Board` is an ordered sequence of occupied cells with set semantics:
/// no two bricks share a cell. It is a plain value; every operation that
/// changes the bricks returns a new board. Equality ignores brick order.
///
/// # Example
///
/// ```
/// use brickfall_engine::{Board, Bounds, Cell, Piece, PieceKind};
///
/// let bounds = Bounds::STANDARD;
/// let board = Board::from_cells([Cell::new(0, 23), Cell::new(1, 23)]).unwrap();
///
/// let piece = Piece::new(PieceKind::O, Cell::new(0, 23));
/// assert!(!board.is_valid(&piece, bounds));
/// assert!(board.is_valid(&piece.translated(2, 0), bounds));
/// ```
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Board {
    bricks: Vec<Cell>,
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.cells().all(|cell| other.contains(cell))
    }
}

impl Eq for Board {}

impl TryFrom<Vec<Cell>> for Board {
    type Error = BrickOverlapError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        Self::from_cells(cells)
    }
}

impl From<Board> for Vec<Cell> {
    fn from(board: Board) -> Self {
        board.bricks
    }
}

impl Board {
    pub const EMPTY: Self = Self { bricks: Vec::new() };

    /// Builds a board from arbitrary cells, rejecting duplicates.
    pub fn from_cells<I>(cells: I) -> Result<Self, BrickOverlapError>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut seen = HashSet::new();
        let mut bricks = Vec::new();
        for cell in cells {
            if !seen.insert(cell) {
                return Err(BrickOverlapError {
                    x: cell.x,
                    y: cell.y,
                });
            }
            bricks.push(cell);
        }
        Ok(Self { bricks })
    }

    /// Every cell of the rows in `rows`, spanning the full board width.
    #[must_use]
    pub fn full_rows(bounds: Bounds, rows: Range<i32>) -> Self {
        let bricks = (0..bounds.width())
            .flat_map(|x| rows.clone().map(move |y| Cell::new(x, y)))
            .collect();
        Self { bricks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.bricks.iter().copied()
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.bricks.contains(&cell)
    }

    /// Returns `true` if every cell of `piece` is inside the walls, not below
    /// the floor, and not on a settled brick.
    ///
    /// There is no ceiling: cells above row 0 are allowed so pieces can spawn
    /// partially outside the visible board. The empty piece is always valid.
    #[must_use]
    pub fn is_valid(&self, piece: &Piece, bounds: Bounds) -> bool {
        piece
            .cells()
            .all(|cell| bounds.admits(cell) && !self.contains(cell))
    }

    /// Merges the cells of `piece` into a new board.
    ///
    /// The piece is expected to be valid against this board; cells already
    /// present are not added twice.
    #[must_use]
    pub fn with_piece(&self, piece: &Piece) -> Self {
        let mut bricks = self.bricks.clone();
        for cell in piece.cells() {
            if !bricks.contains(&cell) {
                bricks.push(cell);
            }
        }
        Self { bricks }
    }

    /// Set union, keeping the order of `self` followed by the new cells of `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut bricks = self.bricks.clone();
        bricks.extend(other.cells().filter(|cell| !self.contains(*cell)));
        Self { bricks }
    }

    /// Removes every brick on row `y`, leaving the rows above in place.
    #[must_use]
    pub fn without_row(&self, y: i32) -> Self {
        Self {
            bricks: self.cells().filter(|cell| cell.y != y).collect(),
        }
    }

    /// Removes row `y` and shifts every brick above it down by one.
    #[must_use]
    pub fn collapse_row(&self, y: i32) -> Self {
        Self {
            bricks: self
                .cells()
                .filter(|cell| cell.y != y)
                .map(|cell| if cell.y < y { cell.offset(0, 1) } else { cell })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::geometry::{BOARD_HEIGHT, BOARD_WIDTH, PieceKind};

    use super::*;

    fn board(cells: &[(i32, i32)]) -> Board {
        Board::from_cells(cells.iter().map(|&(x, y)| Cell::new(x, y))).unwrap()
    }

    #[test]
    fn test_from_cells_rejects_duplicates() {
        let result = Board::from_cells([Cell::new(1, 2), Cell::new(3, 4), Cell::new(1, 2)]);
        let err = result.unwrap_err();
        assert_eq!((err.x, err.y), (1, 2));
        assert_eq!(err.to_string(), "brick already occupies (1, 2)");
    }

    #[test]
    fn test_valid_inside_empty_board() {
        let bounds = Bounds::STANDARD;
        let piece = Piece::new(PieceKind::T, Cell::new(5, 5));
        assert!(Board::EMPTY.is_valid(&piece, bounds));
    }

    #[test]
    fn test_invalid_outside_walls_and_floor() {
        let bounds = Bounds::STANDARD;
        let empty = Board::EMPTY;

        let left = Piece::new(PieceKind::I, Cell::new(-1, 5));
        let right = Piece::new(PieceKind::O, Cell::new(BOARD_WIDTH - 1, 5));
        let below = Piece::new(PieceKind::I, Cell::new(0, BOARD_HEIGHT - 2));
        assert!(!empty.is_valid(&left, bounds));
        assert!(!empty.is_valid(&right, bounds));
        assert!(!empty.is_valid(&below, bounds));
        assert!(empty.is_valid(&below.translated(0, -1), bounds));
    }

    #[test]
    fn test_valid_above_the_board() {
        let bounds = Bounds::STANDARD;
        let piece = Piece::new(PieceKind::I, Cell::new(3, -10));
        assert!(Board::EMPTY.is_valid(&piece, bounds));
    }

    #[test]
    fn test_invalid_on_brick() {
        let bounds = Bounds::STANDARD;
        let bricks = board(&[(5, 6)]);
        let piece = Piece::new(PieceKind::T, Cell::new(5, 5));
        assert!(!bricks.is_valid(&piece, bounds));
        assert!(bricks.is_valid(&piece.translated(2, 0), bounds));
    }

    #[test]
    fn test_empty_piece_always_valid() {
        let full = Board::full_rows(Bounds::STANDARD, 0..BOARD_HEIGHT);
        assert!(full.is_valid(&Piece::EMPTY, Bounds::STANDARD));
    }

    #[test]
    fn test_full_rows() {
        let rows = Board::full_rows(Bounds::new(4, 6), 4..6);
        assert_eq!(rows.len(), 8);
        assert!(rows.contains(Cell::new(0, 4)));
        assert!(rows.contains(Cell::new(3, 5)));
        assert!(!rows.contains(Cell::new(0, 3)));
        assert!(Board::full_rows(Bounds::new(4, 6), 6..6).is_empty());
    }

    #[test]
    fn test_union_keeps_cells_unique() {
        let a = board(&[(0, 5), (1, 5)]);
        let b = board(&[(1, 5), (2, 5)]);
        let merged = a.union(&b);
        assert_eq!(merged, board(&[(0, 5), (1, 5), (2, 5)]));
        assert_eq!(merged.cells().last(), Some(Cell::new(2, 5)));
    }

    #[test]
    fn test_equality_ignores_order() {
        assert_eq!(board(&[(0, 1), (2, 3)]), board(&[(2, 3), (0, 1)]));
        assert_ne!(board(&[(0, 1), (2, 3)]), board(&[(0, 1)]));
        assert_ne!(board(&[(0, 1)]), board(&[(1, 0)]));
    }

    #[test]
    fn test_without_and_collapse_row() {
        let bricks = board(&[(0, 3), (1, 4), (2, 5), (3, 4)]);

        assert_eq!(bricks.without_row(4), board(&[(0, 3), (2, 5)]));
        assert_eq!(bricks.collapse_row(4), board(&[(0, 4), (2, 5)]));
    }

    #[test]
    fn test_serialization_rejects_overlap() {
        let bricks = board(&[(0, 1), (2, 3)]);
        let json = serde_json::to_string(&bricks).unwrap();
        assert_eq!(json, r#"[{"x":0,"y":1},{"x":2,"y":3}]"#);
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), bricks);

        let overlapping = r#"[{"x":0,"y":1},{"x":0,"y":1}]"#;
        assert!(serde_json::from_str::<Board>(overlapping).is_err());
    }
}
