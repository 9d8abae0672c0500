use std::ops::Add;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Width of the playfield in cells.
pub const BOARD_WIDTH: i32 = 12;
/// Height of the playfield in cells.
pub const BOARD_HEIGHT: i32 = 24;

/// A cell coordinate on the playfield.
///
/// # Coordinate System
///
/// - X increases rightward (columns)
/// - Y increases downward (rows)
/// - Y may be negative while a freshly spawned piece sits above the board
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add for Cell {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.offset(rhs.x, rhs.y)
    }
}

/// Dimensions of the playfield.
///
/// Valid columns are `0..width`; valid rows are everything up to `height - 1`.
/// There is no upper limit on how far above the board a piece may sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bounds {
    width: i32,
    height: i32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl Bounds {
    pub const STANDARD: Self = Self::new(BOARD_WIDTH, BOARD_HEIGHT);

    /// Creates custom board dimensions.
    ///
    /// # Panics
    ///
    /// Panics if `width < 2` or `height < 1`; spawn placement needs at least two columns.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        assert!(width >= 2);
        assert!(height >= 1);
        Self { width, height }
    }

    #[must_use]
    pub const fn width(self) -> i32 {
        self.width
    }

    #[must_use]
    pub const fn height(self) -> i32 {
        self.height
    }

    /// Number of columns, i.e. the occupied-cell count of a full row.
    #[must_use]
    pub fn columns(self) -> usize {
        usize::try_from(self.width).unwrap_or_default()
    }

    /// Returns `true` if the cell lies inside the side walls and above the floor.
    #[must_use]
    pub const fn admits(self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y < self.height
    }
}

/// Movement direction for a single-cell translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// Returns the `(dx, dy)` step for this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// Z-piece.
    Z = 0,
    /// S-piece.
    S = 1,
    /// I-piece.
    I = 2,
    /// T-piece.
    T = 3,
    /// O-piece.
    O = 4,
    /// L-piece.
    L = 5,
    /// J-piece.
    J = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece kind, in table order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::Z,
        PieceKind::S,
        PieceKind::I,
        PieceKind::T,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
    ];

    /// Local offsets of the four cells, relative to the rotation pivot.
    #[must_use]
    pub const fn shape(self) -> [Cell; 4] {
        PIECE_SHAPES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use brickfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::I => 'I',
            PieceKind::T => 'T',
            PieceKind::O => 'O',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'Z' => Some(PieceKind::Z),
            'S' => Some(PieceKind::S),
            'I' => Some(PieceKind::I),
            'T' => Some(PieceKind::T),
            'O' => Some(PieceKind::O),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            _ => None,
        }
    }
}

const PIECE_SHAPES: [[Cell; 4]; PieceKind::LEN] = {
    const fn c(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }
    [
        // Z-piece
        [c(1, -1), c(1, 0), c(0, 0), c(0, 1)],
        // S-piece
        [c(0, -1), c(0, 0), c(1, 0), c(1, 1)],
        // I-piece
        [c(0, -1), c(0, 0), c(0, 1), c(0, 2)],
        // T-piece
        [c(0, 1), c(0, 0), c(0, -1), c(1, 0)],
        // O-piece
        [c(1, 0), c(0, 0), c(1, -1), c(0, -1)],
        // L-piece
        [c(0, -1), c(1, -1), c(1, 0), c(1, 1)],
        // J-piece
        [c(1, -1), c(0, -1), c(0, 0), c(0, 1)],
    ]
};

/// A falling piece: a shape of local offsets plus a translation.
///
/// Pieces are immutable - movement and rotation operations return new `Piece` instances.
/// The absolute cells are recomputed from `shape + offset` on every call to [`Piece::cells`].
///
/// [`Piece::EMPTY`] is the "no active piece" sentinel. It has no cells, so it is
/// valid everywhere and never adds bricks when locked.
///
/// # Example
///
/// ```
/// use brickfall_engine::{Cell, Direction, Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T, Cell::new(4, 0));
/// let moved = piece.moved(Direction::Right);
/// assert_eq!(moved.offset(), Cell::new(5, 0));
///
/// let rotated = moved.rotated().rotated().rotated().rotated();
/// assert_eq!(rotated, moved);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Piece {
    kind: Option<PieceKind>,
    shape: ArrayVec<Cell, 4>,
    offset: Cell,
}

impl Piece {
    pub const EMPTY: Self = Self {
        kind: None,
        shape: ArrayVec::new_const(),
        offset: Cell::ORIGIN,
    };

    #[must_use]
    pub fn new(kind: PieceKind, offset: Cell) -> Self {
        Self {
            kind: Some(kind),
            shape: ArrayVec::from(kind.shape()),
            offset,
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<PieceKind> {
        self.kind
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    #[must_use]
    pub fn shape(&self) -> &[Cell] {
        &self.shape
    }

    #[must_use]
    pub fn offset(&self) -> Cell {
        self.offset
    }

    /// Absolute cells occupied by the piece.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.shape.iter().map(move |&cell| cell + self.offset)
    }

    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            offset: self.offset.offset(dx, dy),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn moved(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.translated(dx, dy)
    }

    /// Rotates the shape 90° about its pivot: `(x, y) -> (y, -x)`.
    ///
    /// Only the shape changes; the result is not checked against any board.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self
                .shape
                .iter()
                .map(|cell| Cell::new(cell.y, -cell.x))
                .collect(),
            ..self.clone()
        }
    }

    /// Shifts the piece by the smallest amount that brings it inside `bounds`.
    ///
    /// Columns are always corrected. Rows are corrected against `0..height`
    /// only when `adjust_y` is set; spawn placement leaves negative rows alone.
    #[must_use]
    pub fn adjusted(&self, bounds: Bounds, adjust_y: bool) -> Self {
        let dx = correction(self.cells().map(|cell| cell.x), bounds.width());
        let dy = if adjust_y {
            correction(self.cells().map(|cell| cell.y), bounds.height())
        } else {
            0
        };
        self.translated(dx, dy)
    }
}

/// Computes the shift that moves every value into `0..extent`.
///
/// Both the low and the high correction are summed; for a shape narrower than
/// the board at most one of them is nonzero.
fn correction(values: impl Iterator<Item = i32>, extent: i32) -> i32 {
    let (min, max) = values.fold((i32::MAX, i32::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let mut delta = 0;
    if min < 0 {
        delta -= min;
    }
    if max > extent - 1 {
        delta -= max - (extent - 1);
    }
    delta
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn cell_set(piece: &Piece) -> BTreeSet<Cell> {
        piece.cells().collect()
    }

    #[test]
    fn test_cells_follow_offset() {
        let piece = Piece::new(PieceKind::I, Cell::new(3, 5));
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(3, 4),
                Cell::new(3, 5),
                Cell::new(3, 6),
                Cell::new(3, 7)
            ]
        );

        let moved = piece.translated(-2, 1);
        assert_eq!(moved.offset(), Cell::new(1, 6));
        assert_eq!(moved.shape(), piece.shape());
    }

    #[test]
    fn test_rotation_transform() {
        let piece = Piece::new(PieceKind::T, Cell::ORIGIN).rotated();
        assert_eq!(
            piece.shape(),
            &[
                Cell::new(1, 0),
                Cell::new(0, 0),
                Cell::new(-1, 0),
                Cell::new(0, -1)
            ]
        );
        assert_eq!(piece.offset(), Cell::ORIGIN);
        assert_eq!(piece.kind(), Some(PieceKind::T));
    }

    #[test]
    fn test_rotation_has_order_four() {
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind, Cell::new(5, 5));
            let mut rotated = piece.clone();
            for _ in 0..4 {
                rotated = rotated.rotated();
            }
            assert_eq!(rotated, piece, "{kind:?} did not return to its spawn shape");
            assert_eq!(cell_set(&rotated), cell_set(&piece));
        }
    }

    #[test]
    fn test_adjust_pulls_piece_off_left_wall() {
        let bounds = Bounds::STANDARD;
        let piece = Piece::new(PieceKind::T, Cell::new(0, 5)).rotated();
        assert_eq!(piece.cells().map(|c| c.x).min(), Some(-1));

        let adjusted = piece.adjusted(bounds, true);
        assert_eq!(adjusted.offset(), Cell::new(1, 5));
        assert!(adjusted.cells().all(|c| bounds.admits(c)));
    }

    #[test]
    fn test_adjust_pulls_piece_off_right_wall() {
        let bounds = Bounds::STANDARD;
        let piece = Piece::new(PieceKind::O, Cell::new(BOARD_WIDTH - 1, 5));
        let adjusted = piece.adjusted(bounds, false);
        assert_eq!(adjusted.offset(), Cell::new(BOARD_WIDTH - 2, 5));
        assert_eq!(adjusted.cells().map(|c| c.x).max(), Some(BOARD_WIDTH - 1));
    }

    #[test]
    fn test_adjust_y_only_when_requested() {
        let bounds = Bounds::STANDARD;
        let piece = Piece::new(PieceKind::I, Cell::new(4, -1));

        let spawn = piece.adjusted(bounds, false);
        assert_eq!(spawn.offset(), Cell::new(4, -1));

        let clamped = piece.adjusted(bounds, true);
        assert_eq!(clamped.offset(), Cell::new(4, 1));
        assert_eq!(clamped.cells().map(|c| c.y).min(), Some(0));

        let sunk = Piece::new(PieceKind::I, Cell::new(4, BOARD_HEIGHT - 1)).adjusted(bounds, true);
        assert_eq!(sunk.cells().map(|c| c.y).max(), Some(BOARD_HEIGHT - 1));
    }

    #[test]
    fn test_empty_piece() {
        let empty = Piece::EMPTY;
        assert!(empty.is_empty());
        assert_eq!(empty.cells().count(), 0);
        assert_eq!(empty.rotated(), empty);
        assert_eq!(empty.adjusted(Bounds::STANDARD, true), empty);
        assert_eq!(Piece::default(), empty);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('z'), None);
    }
}
