//! Game rules and state transitions.
//!
//! This module builds the playable game on top of the [`core`](crate::core)
//! geometry and board types:
//!
//! - [`GameView`] - Immutable snapshot of a whole game (board, piece, reserve, status, stats)
//! - [`Transition`] - Result of reducing an [`Action`], with animation frames and sound cues
//! - [`GameStats`] - Score and line totals, and the derived level
//! - [`PieceReserve`] - Queue of upcoming pieces, refilled one shuffled 7-piece cycle at a time
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. Start from [`GameView::new`] in the `Onboard` status
//! 2. `Reset` spawns the first piece and switches to `Running`
//! 3. The host sends moves, rotations and drops, and a `GameTick` every
//!    [`GameView::tick_interval`]
//! 4. When a tick cannot move the piece down it locks; full rows flash and are cleared
//! 5. When the next piece has no room, the screen is wiped and the game is over
//!
//! Animated steps return their frames in [`Transition::script`]; the host plays
//! them back, holding each frame for [`Frame::hold`].

pub use self::{game_stats::*, game_view::*, line_clear::*, piece_generator::*, transition::*};

mod game_stats;
mod game_view;
mod line_clear;
mod piece_generator;
mod transition;
