pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("brick already occupies ({x}, {y})")]
pub struct BrickOverlapError {
    pub x: i32,
    pub y: i32,
}
