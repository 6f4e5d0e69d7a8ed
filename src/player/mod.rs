//! Player session lifecycle and backends

mod engine;
mod manager;
mod mpv;

pub use engine::*;
pub use manager::*;
pub use mpv::MpvEngine;
