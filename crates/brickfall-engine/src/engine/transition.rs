use std::time::Duration;

use arrayvec::ArrayVec;
use rand::Rng;

use crate::{
    core::{Board, Direction, Piece},
    engine::{
        game_stats::GameStats,
        game_view::{Action, Cue, GameStatus, GameView},
        line_clear::{self, Settlement},
        piece_generator::PieceReserve,
    },
};

/// Pause after each frame of the screen wipe.
pub const WIPE_FRAME_HOLD: Duration = Duration::from_millis(50);
/// Pause after each frame of the line-clear flash.
pub const FLASH_FRAME_HOLD: Duration = Duration::from_millis(150);
/// Number of alternating frames in the line-clear flash.
pub const FLASH_FRAMES: usize = 5;

/// One scheduled snapshot of an animation.
///
/// The host publishes `view`, then waits `hold` before the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub view: GameView,
    pub hold: Duration,
}

impl Frame {
    #[must_use]
    pub fn new(view: GameView, hold: Duration) -> Self {
        Self { view, hold }
    }

    /// Closing frame of a script; nothing follows it.
    #[must_use]
    pub fn settled(view: GameView) -> Self {
        Self::new(view, Duration::ZERO)
    }
}

/// Outcome of reducing one action.
///
/// `view` is the snapshot to publish right away. `script` lists the follow-up
/// frames of an animated transition in emission order and is empty for steady
/// moves. `cues` are the sound requests raised by the step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub view: GameView,
    pub script: Vec<Frame>,
    pub cues: ArrayVec<Cue, 2>,
}

impl Transition {
    #[must_use]
    pub fn steady(view: GameView) -> Self {
        Self {
            view,
            script: Vec::new(),
            cues: ArrayVec::new(),
        }
    }

    #[must_use]
    pub fn animated(view: GameView, script: Vec<Frame>) -> Self {
        Self {
            view,
            script,
            cues: ArrayVec::new(),
        }
    }

    #[must_use]
    pub fn with_cue(mut self, cue: Cue) -> Self {
        self.cues.push(cue);
        self
    }

    /// The snapshot the transition settles on once its script has played.
    #[must_use]
    pub fn into_final_view(mut self) -> GameView {
        self.script.pop().map_or(self.view, |frame| frame.view)
    }
}

impl GameView {
    /// Applies `action` and returns the resulting transition.
    ///
    /// This is a pure function of `self`, `action` and the random stream: the
    /// same snapshot, action and generator state always give the same result.
    /// Actions that the current status does not allow return the unchanged
    /// snapshot.
    ///
    /// # Actions
    ///
    /// - `Reset`: from `Onboard`/`GameOver` starts a fresh game; from `Running`/`Paused`
    ///   wipes the screen back to `Onboard`; ignored during animations
    /// - `Pause`/`Resume`: toggle between `Running` and `Paused`
    /// - `Move`/`Rotate`/`Drop`: manipulate the falling piece while `Running`
    /// - `GameTick`: gravity, locking, line clears and game over while `Running`
    /// - `Mute`: toggles the mute flag in any status
    pub fn reduce<R>(&self, action: Action, rng: &mut R) -> Transition
    where
        R: Rng + ?Sized,
    {
        match action {
            Action::Reset => self.reset(rng),
            Action::Pause if self.is_running() => {
                Transition::steady(self.with_status(GameStatus::Paused))
            }
            Action::Resume if self.is_paused() => {
                Transition::steady(self.with_status(GameStatus::Running))
            }
            Action::Move(direction) if self.is_running() => self.shift(direction),
            Action::Rotate if self.is_running() => self.rotate(),
            Action::Drop if self.is_running() => self.hard_drop(),
            Action::GameTick if self.is_running() => self.tick(rng),
            Action::Mute => Transition::steady(self.with_muted(!self.muted)),
            Action::Pause
            | Action::Resume
            | Action::Move(_)
            | Action::Rotate
            | Action::Drop
            | Action::GameTick => Transition::steady(self.clone()),
        }
    }

    fn start<R>(&self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut reserve = PieceReserve::generate(self.bounds, rng);
        let piece = reserve.pop(self.bounds, rng);
        Self {
            board: Board::EMPTY,
            piece,
            reserve,
            bounds: self.bounds,
            status: GameStatus::Running,
            stats: GameStats::new(),
            muted: self.muted,
        }
    }

    fn reset<R>(&self, rng: &mut R) -> Transition
    where
        R: Rng + ?Sized,
    {
        match self.status {
            GameStatus::Onboard | GameStatus::GameOver => {
                Transition::steady(self.start(rng)).with_cue(Cue::Start)
            }
            GameStatus::Running | GameStatus::Paused => {
                let onboard = Self::onboard(self.bounds, self.muted);
                Transition::animated(
                    self.with_status(GameStatus::ScreenClearing),
                    self.wipe_script(onboard),
                )
                .with_cue(Cue::Start)
            }
            GameStatus::LineClearing | GameStatus::ScreenClearing => {
                Transition::steady(self.clone())
            }
        }
    }

    fn shift(&self, direction: Direction) -> Transition {
        let moved = self.piece.moved(direction);
        self.accept_if_valid(moved).with_cue(Cue::Move)
    }

    fn rotate(&self) -> Transition {
        let rotated = self.piece.rotated().adjusted(self.bounds, true);
        self.accept_if_valid(rotated).with_cue(Cue::Rotate)
    }

    fn accept_if_valid(&self, candidate: Piece) -> Transition {
        if self.board.is_valid(&candidate, self.bounds) {
            Transition::steady(self.with_piece(candidate))
        } else {
            Transition::steady(self.clone())
        }
    }

    fn hard_drop(&self) -> Transition {
        if self.piece.is_empty() {
            return Transition::steady(self.clone()).with_cue(Cue::Drop);
        }
        let mut distance = 0;
        while self
            .board
            .is_valid(&self.piece.translated(0, distance + 1), self.bounds)
        {
            distance += 1;
        }
        Transition::steady(self.with_piece(self.piece.translated(0, distance))).with_cue(Cue::Drop)
    }

    fn tick<R>(&self, rng: &mut R) -> Transition
    where
        R: Rng + ?Sized,
    {
        if !self.piece.is_empty() {
            let fallen = self.piece.moved(Direction::Down);
            if self.board.is_valid(&fallen, self.bounds) {
                return Transition::steady(self.with_piece(fallen));
            }
        }

        if !self.board.is_valid(&self.piece, self.bounds) {
            let game_over = Self {
                board: Board::EMPTY,
                piece: Piece::EMPTY,
                status: GameStatus::GameOver,
                ..self.clone()
            };
            return Transition::animated(
                self.with_status(GameStatus::ScreenClearing),
                self.wipe_script(game_over),
            )
            .with_cue(Cue::Start);
        }

        let settlement = line_clear::settle(&self.board, &self.piece, self.bounds);
        let mut reserve = self.reserve.clone();
        let piece = reserve.pop(self.bounds, rng);
        let settled = Self {
            board: settlement.compacted.clone(),
            piece,
            reserve,
            status: GameStatus::Running,
            stats: self
                .stats
                .record_lock(settlement.cleared_rows, !self.piece.is_empty()),
            ..self.clone()
        };

        let mut script = Vec::new();
        let mut cues = ArrayVec::new();
        if settlement.cleared_rows > 0 {
            script.extend(self.flash_frames(&settlement));
            cues.push(Cue::Clean);
        }

        if !settled.board.is_valid(&settled.piece, self.bounds) {
            // The next piece has no room to spawn.
            let stacked = Self {
                piece: Piece::EMPTY,
                ..settled
            };
            let game_over = Self {
                board: Board::EMPTY,
                status: GameStatus::GameOver,
                ..stacked.clone()
            };
            script.extend(stacked.wipe_frames());
            script.push(Frame::settled(game_over));
            cues.push(Cue::Start);
            return Transition {
                view: self.with_status(GameStatus::ScreenClearing),
                script,
                cues,
            };
        }

        if script.is_empty() {
            return Transition::steady(settled);
        }
        script.push(Frame::settled(settled));
        Transition {
            view: self.with_status(GameStatus::LineClearing),
            script,
            cues,
        }
    }

    /// Frames of the line-clear flash.
    ///
    /// The piece is hidden and the board alternates between the locked and
    /// the cleared-but-unshifted bricks, starting with the locked ones.
    fn flash_frames(&self, settlement: &Settlement) -> Vec<Frame> {
        (0..FLASH_FRAMES)
            .map(|i| {
                let board = if i % 2 == 0 {
                    &settlement.locked
                } else {
                    &settlement.flashing
                };
                let view = Self {
                    board: board.clone(),
                    piece: Piece::EMPTY,
                    status: GameStatus::LineClearing,
                    ..self.clone()
                };
                Frame::new(view, FLASH_FRAME_HOLD)
            })
            .collect()
    }

    /// Frames of the two-phase screen wipe, ending on `settled`.
    fn wipe_script(&self, settled: Self) -> Vec<Frame> {
        let mut script = self.wipe_frames();
        script.push(Frame::settled(settled));
        script
    }

    /// Phase 1 fills rows from the bottom up on top of the current bricks, with
    /// the piece still shown. Phase 2 hides the piece and empties rows from the
    /// top down until the board is empty.
    fn wipe_frames(&self) -> Vec<Frame> {
        let height = self.bounds.height();
        let filling = (0..height).rev().map(|y| Self {
            board: self.board.union(&Board::full_rows(self.bounds, y..height)),
            status: GameStatus::ScreenClearing,
            ..self.clone()
        });
        let emptying = (0..=height).map(|y| Self {
            board: Board::full_rows(self.bounds, y..height),
            piece: Piece::EMPTY,
            status: GameStatus::ScreenClearing,
            ..self.clone()
        });
        filling
            .chain(emptying)
            .map(|view| Frame::new(view, WIPE_FRAME_HOLD))
            .collect()
    }
}
