//! Wire types shared with the relay server

mod model;

pub use model::*;
