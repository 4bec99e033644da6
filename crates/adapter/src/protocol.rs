//! Protocol module - line-delimited JSON messages
//!
//! Every inbound message carries `type` and `seq`; replies echo the `seq` they answer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{GridSnapshot, TileSnapshot};
use crate::engine::PlacementResult;
use crate::types::{CellPos, CoreEvent, TransitionTarget, Vec2};

/// Longest accepted input line
pub const MAX_LINE_BYTES: usize = 64 * 1024;

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Drop the session's current tile into `column`
    Place { seq: u64, column: usize },
    /// Ask for an observation
    Observe { seq: u64 },
}

impl ClientMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ClientMessage::Place { seq, .. } | ClientMessage::Observe { seq } => *seq,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("line longer than {max} bytes")]
    TooLong { max: usize },
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        match self {
            ProtocolError::Malformed(_) => "malformed",
            ProtocolError::TooLong { .. } => "too_long",
        }
    }
}

pub fn parse_line(line: &str) -> Result<ClientMessage, ProtocolError> {
    if line.len() > MAX_LINE_BYTES {
        return Err(ProtocolError::TooLong {
            max: MAX_LINE_BYTES,
        });
    }
    Ok(serde_json::from_str(line)?)
}

/// Pull `seq` out of a line that failed to parse, so the error can still be correlated
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Ack(AckMessage),
    Event(EventMessage),
    Observation(ObservationMessage),
    Error(ErrorMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AckMessage {
    pub seq: u64,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl AckMessage {
    pub fn from_result(seq: u64, result: &PlacementResult) -> Self {
        Self {
            seq,
            accepted: result.accepted,
            row: result.cell.map(|c| c.row),
            col: result.cell.map(|c| c.col),
            error: result.code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    pub code: &'static str,
    pub message: String,
}

impl ErrorMessage {
    pub fn from_protocol(line: &str, err: &ProtocolError) -> Self {
        Self {
            seq: extract_seq_best_effort(line),
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventMessage {
    pub event: EventPayload,
}

fn cell_pair(cell: CellPos) -> [usize; 2] {
    [cell.row, cell.col]
}

fn vec_pair(v: Vec2) -> [f32; 2] {
    [v.x, v.y]
}

/// Wire form of a [`CoreEvent`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    TilePlaced {
        tile: u32,
        cell: [usize; 2],
    },
    SpawnRequested,
    Transition {
        target: &'static str,
        tile: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        part: Option<u32>,
        to: [f32; 2],
        duration_ms: u32,
        ease: &'static str,
    },
    MatchesFound {
        parts: u32,
    },
    PartDestroyed {
        tile: u32,
        part: u32,
    },
    TileDestroyed {
        tile: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        cell: Option<[usize; 2]>,
    },
    TileFell {
        tile: u32,
        from: [usize; 2],
        to: [usize; 2],
    },
    CascadeFinished {
        rounds: u32,
    },
}

impl From<&CoreEvent> for EventPayload {
    fn from(value: &CoreEvent) -> Self {
        match *value {
            CoreEvent::TilePlaced { tile, cell } => EventPayload::TilePlaced {
                tile: tile.0,
                cell: cell_pair(cell),
            },
            CoreEvent::SpawnRequested => EventPayload::SpawnRequested,
            CoreEvent::Transition(req) => {
                let (target, tile, part) = match req.target {
                    TransitionTarget::PartPosition { tile, part } => {
                        ("part_position", tile, Some(part.0))
                    }
                    TransitionTarget::PartScale { tile, part } => ("part_scale", tile, Some(part.0)),
                    TransitionTarget::TilePosition { tile } => ("tile_position", tile, None),
                };
                EventPayload::Transition {
                    target,
                    tile: tile.0,
                    part,
                    to: vec_pair(req.to),
                    duration_ms: req.duration_ms,
                    ease: req.ease.as_str(),
                }
            }
            CoreEvent::MatchesFound { parts } => EventPayload::MatchesFound { parts },
            CoreEvent::PartDestroyed { tile, part } => EventPayload::PartDestroyed {
                tile: tile.0,
                part: part.0,
            },
            CoreEvent::TileDestroyed { tile, cell } => EventPayload::TileDestroyed {
                tile: tile.0,
                cell: cell.map(cell_pair),
            },
            CoreEvent::TileFell { tile, from, to } => EventPayload::TileFell {
                tile: tile.0,
                from: cell_pair(from),
                to: cell_pair(to),
            },
            CoreEvent::CascadeFinished { rounds } => EventPayload::CascadeFinished { rounds },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartView {
    pub part: u32,
    pub color: &'static str,
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub footprint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub tile: u32,
    pub parts: Vec<PartView>,
}

impl From<&TileSnapshot> for TileView {
    fn from(value: &TileSnapshot) -> Self {
        Self {
            tile: value.id.0,
            parts: value
                .parts
                .iter()
                .map(|p| PartView {
                    part: p.id.0,
                    color: p.color.as_str(),
                    position: vec_pair(p.position),
                    scale: vec_pair(p.scale),
                    footprint: p.footprint.as_str(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    pub rows: u8,
    pub columns: u8,
    pub cascade_idle: bool,
    /// Colours of the tile waiting to be dropped
    pub current: Vec<&'static str>,
    /// `cells[row][col]`, row 0 at the top
    pub cells: Vec<Vec<Option<TileView>>>,
}

impl ObservationMessage {
    pub fn from_snapshot(seq: Option<u64>, snapshot: &GridSnapshot, current: Vec<&'static str>) -> Self {
        let columns = snapshot.columns.max(1) as usize;
        let cells = snapshot
            .cells
            .chunks(columns)
            .map(|row| row.iter().map(|c| c.as_ref().map(TileView::from)).collect())
            .collect();
        Self {
            seq,
            rows: snapshot.rows,
            columns: snapshot.columns,
            cascade_idle: snapshot.cascade_idle,
            current,
            cells,
        }
    }
}
