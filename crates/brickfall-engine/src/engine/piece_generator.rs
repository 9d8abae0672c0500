use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Bounds, Cell, Piece, PieceKind};

/// Row at which freshly generated pieces are anchored, one above the board.
pub const SPAWN_ROW: i32 = -1;

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator that places and shuffles pieces. Feeding the same seed and the
/// same action sequence to [`GameView::reduce`](crate::GameView::reduce)
/// reproduces a game exactly.
///
/// Seeds are written as 32 hex characters, both in JSON and on the command line.
///
/// # Example
///
/// ```
/// use brickfall_engine::PieceSeed;
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct ParseSeedError {
    input: String,
}

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates the random number generator this seed describes.
    #[must_use]
    pub fn into_rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| invalid())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Builds one shuffled cycle containing each of the 7 piece kinds exactly once.
///
/// Every piece is anchored at a random column in `0..width - 1` on [`SPAWN_ROW`]
/// and pushed back inside the side walls. Rows are not adjusted, so pieces may
/// start partly above the board.
pub fn generate_cycle<R>(bounds: Bounds, rng: &mut R) -> Vec<Piece>
where
    R: Rng + ?Sized,
{
    let mut cycle: Vec<Piece> = PieceKind::ALL
        .iter()
        .map(|&kind| {
            let x = rng.random_range(0..bounds.width() - 1);
            Piece::new(kind, Cell::new(x, SPAWN_ROW)).adjusted(bounds, false)
        })
        .collect();
    cycle.shuffle(rng);
    cycle
}

/// Queue of upcoming pieces.
///
/// # Refill rule
///
/// Whenever taking the head empties the queue, a fresh shuffled cycle of all
/// 7 kinds is appended, so the "next piece" preview is always defined after a pop.
///
/// # Example
///
/// ```
/// use brickfall_engine::{Bounds, PieceReserve, PieceSeed};
///
/// let bounds = Bounds::STANDARD;
/// let mut rng = PieceSeed::from_bytes([7; 16]).into_rng();
/// let mut reserve = PieceReserve::generate(bounds, &mut rng);
///
/// for _ in 0..20 {
///     let piece = reserve.pop(bounds, &mut rng);
///     assert!(!piece.is_empty());
///     assert!(reserve.peek().is_some());
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PieceReserve {
    queue: VecDeque<Piece>,
}

impl PieceReserve {
    /// An empty reserve; the first [`Self::pop`] yields the empty piece and refills.
    pub const EMPTY: Self = Self {
        queue: VecDeque::new(),
    };

    /// Creates a reserve holding one freshly generated cycle.
    pub fn generate<R>(bounds: Bounds, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            queue: generate_cycle(bounds, rng).into(),
        }
    }

    /// The piece that will become active next.
    #[must_use]
    pub fn peek(&self) -> Option<&Piece> {
        self.queue.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.queue.iter()
    }

    /// Takes the head of the queue, refilling with a new cycle if that emptied it.
    ///
    /// Returns [`Piece::EMPTY`] if the reserve was already empty.
    pub fn pop<R>(&mut self, bounds: Bounds, rng: &mut R) -> Piece
    where
        R: Rng + ?Sized,
    {
        let head = self.queue.pop_front().unwrap_or(Piece::EMPTY);
        if self.queue.is_empty() {
            self.queue.extend(generate_cycle(bounds, rng));
        }
        head
    }
}

impl FromIterator<Piece> for PieceReserve {
    fn from_iter<I: IntoIterator<Item = Piece>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn seeded(byte: u8) -> Pcg32 {
        PieceSeed::from_bytes([byte; 16]).into_rng()
    }

    #[test]
    fn test_cycle_contains_every_kind_once() {
        let mut rng = seeded(1);
        for _ in 0..50 {
            let cycle = generate_cycle(Bounds::STANDARD, &mut rng);
            let kinds: BTreeSet<_> = cycle.iter().filter_map(Piece::kind).map(|k| k as u8).collect();
            assert_eq!(cycle.len(), PieceKind::LEN);
            assert_eq!(kinds.len(), PieceKind::LEN);
        }
    }

    #[test]
    fn test_cycle_pieces_spawn_inside_walls() {
        let bounds = Bounds::STANDARD;
        let mut rng = seeded(2);
        for _ in 0..200 {
            for piece in generate_cycle(bounds, &mut rng) {
                assert!(piece.cells().all(|c| c.x >= 0 && c.x < bounds.width()));
                assert!(piece.cells().all(|c| c.y <= 2));
                assert!(piece.offset().x <= bounds.width() - 2);
            }
        }
    }

    #[test]
    fn test_cycle_on_narrow_board() {
        let bounds = Bounds::new(2, 6);
        let mut rng = seeded(3);
        let cycle = generate_cycle(bounds, &mut rng);
        for piece in cycle {
            assert!(piece.cells().all(|c| c.x == 0 || c.x == 1), "{piece:?}");
        }
    }

    #[test]
    fn test_pop_refills_when_exhausted() {
        let bounds = Bounds::STANDARD;
        let mut rng = seeded(4);
        let mut reserve = PieceReserve::generate(bounds, &mut rng);
        assert_eq!(reserve.len(), 7);

        for expected_len in (1..7).rev() {
            reserve.pop(bounds, &mut rng);
            assert_eq!(reserve.len(), expected_len);
        }
        reserve.pop(bounds, &mut rng);
        assert_eq!(reserve.len(), 7);
    }

    #[test]
    fn test_pop_from_empty_reserve() {
        let bounds = Bounds::STANDARD;
        let mut rng = seeded(5);
        let mut reserve = PieceReserve::EMPTY;
        assert_eq!(reserve.pop(bounds, &mut rng), Piece::EMPTY);
        assert_eq!(reserve.len(), 7);
    }

    #[test]
    fn test_deterministic_generation() {
        let bounds = Bounds::STANDARD;
        let mut rng1 = seeded(6);
        let mut rng2 = seeded(6);
        let mut reserve1 = PieceReserve::generate(bounds, &mut rng1);
        let mut reserve2 = PieceReserve::generate(bounds, &mut rng2);
        for _ in 0..20 {
            assert_eq!(reserve1.pop(bounds, &mut rng1), reserve2.pop(bounds, &mut rng2));
        }
    }

    #[test]
    fn test_seed_known_value() {
        let seed = PieceSeed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

        let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
        assert_eq!(
            "0123456789ABCDEFFEDCBA9876543210".parse::<PieceSeed>().unwrap(),
            seed
        );
    }

    #[test]
    fn test_seed_parse_errors() {
        assert!("".parse::<PieceSeed>().is_err());
        assert!("0123456789abcdef0123456789abcde".parse::<PieceSeed>().is_err());
        assert!("0123456789abcdef0123456789abcdef0".parse::<PieceSeed>().is_err());
        assert!("+123456789abcdef0123456789abcdef".parse::<PieceSeed>().is_err());

        let err = "ghijklmnopqrstuvwxyzghijklmnopqr"
            .parse::<PieceSeed>()
            .unwrap_err();
        assert!(err.to_string().contains("invalid hex seed"));
    }
}
