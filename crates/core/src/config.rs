//! Simulation configuration
//!
//! Environment variables (all optional):
//!
//! - `DROP_JELLY_ROWS`: grid rows (default 8)
//! - `DROP_JELLY_COLUMNS`: grid columns (default 5)
//! - `DROP_JELLY_SEED`: seed for tile generation (default 1)
//! - `DROP_JELLY_FAST`: `1` or `true` zeroes every pacing delay

use crate::error::ConfigError;
use crate::types::{
    DEFAULT_COLUMNS, DEFAULT_ROWS, FINAL_SNAP_DELAY_MS, GRAVITY_MOVE_MS, GRAVITY_PASS_DELAY_MS,
    MATCH_CHECK_DELAY_MS, MATCH_SETTLE_DELAY_MS, PART_SHRINK_MS, PLACE_MOVE_MS, REARRANGE_MS,
};

/// Pacing of every timed phase, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub place_move_ms: u32,
    pub match_check_delay_ms: u32,
    pub match_settle_delay_ms: u32,
    pub part_shrink_ms: u32,
    pub rearrange_ms: u32,
    pub final_snap_delay_ms: u32,
    pub gravity_move_ms: u32,
    pub gravity_pass_delay_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            place_move_ms: PLACE_MOVE_MS,
            match_check_delay_ms: MATCH_CHECK_DELAY_MS,
            match_settle_delay_ms: MATCH_SETTLE_DELAY_MS,
            part_shrink_ms: PART_SHRINK_MS,
            rearrange_ms: REARRANGE_MS,
            final_snap_delay_ms: FINAL_SNAP_DELAY_MS,
            gravity_move_ms: GRAVITY_MOVE_MS,
            gravity_pass_delay_ms: GRAVITY_PASS_DELAY_MS,
        }
    }
}

impl Timings {
    /// No pacing at all; every phase advances on the next tick
    pub fn instant() -> Self {
        Self {
            place_move_ms: 0,
            match_check_delay_ms: 0,
            match_settle_delay_ms: 0,
            part_shrink_ms: 0,
            rearrange_ms: 0,
            final_snap_delay_ms: 0,
            gravity_move_ms: 0,
            gravity_pass_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub rows: u8,
    pub columns: u8,
    pub cell_size: f32,
    pub seed: u32,
    pub timings: Timings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            cell_size: 1.0,
            seed: 1,
            timings: Timings::default(),
        }
    }
}

impl SimConfig {
    /// Grid of the given size with default pacing
    pub fn with_size(rows: u8, columns: u8) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(rows) = parse_var::<u8>(&lookup, "DROP_JELLY_ROWS")? {
            config.rows = rows;
        }
        if let Some(columns) = parse_var::<u8>(&lookup, "DROP_JELLY_COLUMNS")? {
            config.columns = columns;
        }
        if let Some(seed) = parse_var::<u32>(&lookup, "DROP_JELLY_SEED")? {
            config.seed = seed;
        }
        if let Some(fast) = lookup("DROP_JELLY_FAST") {
            if fast == "1" || fast.eq_ignore_ascii_case("true") {
                config.timings = Timings::instant();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { key, value: raw }),
    }
}
