pub use self::{board::*, geometry::*};

pub(crate) mod board;
pub(crate) mod geometry;
