//! Adapter module - drive a session over line-delimited JSON
//!
//! This crate lets an external input/render collaborator play a level through any
//! async byte stream. The binary wires it to stdin/stdout; tests use in-memory buffers.
//!
//! # Message Types
//!
//! ## Client → Game
//!
//! - **place**: drop the current tile into a column
//! - **observe**: request a grid observation
//!
//! ## Game → Client
//!
//! - **ack**: placement outcome (`accepted`, landing `row`/`col`, or an `error` code)
//! - **event**: one per simulation event (placements, transitions, destructions, falls)
//! - **observation**: the grid with every tile's parts, plus the tile waiting to drop
//! - **error**: a line that could not be understood
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Game: {"type":"place","seq":1,"column":2}
//! Game -> Client: {"type":"ack","seq":1,"accepted":true,"row":7,"col":2}
//! Game -> Client: {"type":"event","event":{"kind":"tile_placed","tile":1,"cell":[7,2]}}
//! Game -> Client: {"type":"event","event":{"kind":"transition","target":"tile_position",...}}
//! Game -> Client: {"type":"event","event":{"kind":"spawn_requested"}}
//! Client -> Game: {"type":"observe","seq":2}
//! Game -> Client: {"type":"observation","seq":2,"rows":8,"columns":5,...}
//! ```
//!
//! The loop ends once input is closed and the cascade has come to rest; a final
//! observation (without `seq`) is written last.

pub mod protocol;
pub mod runtime;

pub use drop_jelly_core as core;
pub use drop_jelly_engine as engine;
pub use drop_jelly_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{run, RunStats};
