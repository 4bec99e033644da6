//! DropJelly (workspace facade crate).
//!
//! Re-exports the workspace crates as `drop_jelly::{types,core,engine,adapter}`; the
//! implementation lives in dedicated crates under `crates/`.

pub use drop_jelly_adapter as adapter;
pub use drop_jelly_core as core;
pub use drop_jelly_engine as engine;
pub use drop_jelly_types as types;
