//! Engine module - placement requests and the play session
//!
//! [`place`] turns a column choice from an input collaborator into a placement result;
//! [`session`] couples a simulation with the tile spawner so every accepted placement
//! is followed by the next tile.

pub mod place;
pub mod session;

pub use drop_jelly_core as core;
pub use drop_jelly_types as types;

pub use place::{apply_place, PlacementRequest, PlacementResult};
pub use session::Session;
