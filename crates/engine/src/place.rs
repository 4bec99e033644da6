use tracing::debug;

use crate::core::{PlaceError, Simulation, TileDescriptor};
use crate::types::{CellPos, TileId};

/// A player dropping `descriptor` into `column`
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest<'a> {
    pub column: usize,
    pub descriptor: &'a TileDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementResult {
    pub accepted: bool,
    pub tile: Option<TileId>,
    pub cell: Option<CellPos>,
    pub error: Option<PlaceError>,
}

impl PlacementResult {
    fn rejected(error: PlaceError) -> Self {
        Self {
            accepted: false,
            tile: None,
            cell: None,
            error: Some(error),
        }
    }

    /// Wire code of the rejection, if any
    pub fn code(&self) -> Option<&'static str> {
        self.error.map(PlaceError::code)
    }
}

/// Handle a placement request. A rejected descriptor is untouched and can be retried.
pub fn apply_place(sim: &mut Simulation, request: PlacementRequest<'_>) -> PlacementResult {
    match sim.place(request.column, request.descriptor) {
        Ok(outcome) => PlacementResult {
            accepted: true,
            tile: Some(outcome.tile),
            cell: Some(outcome.cell),
            error: None,
        },
        Err(err) => {
            debug!(column = request.column, code = err.code(), "placement rejected");
            PlacementResult::rejected(err)
        }
    }
}
