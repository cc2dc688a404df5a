//! Game balance and layout tuning
//!
//! Every gameplay constant lives here so a JSON file can override it.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Data-driven game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Layout ===
    /// Visible playfield size (origin bottom-left, y up)
    pub viewport: Vec2,
    /// Player sprite size
    pub player_size: Vec2,
    /// Size of a single obstacle (top or bottom)
    pub obstacle_size: Vec2,

    // === Obstacles ===
    /// Gap height as a multiple of the player height
    pub gap_factor: f32,
    /// Seconds between spawns
    pub spawn_period: f32,
    /// Scroll duration = viewport width / scroll_divisor
    pub scroll_divisor: f32,
    /// Spawn one pair as soon as a session starts
    pub spawn_on_start: bool,

    // === Player ===
    pub gravity: f32,
    pub flap_impulse: f32,
    pub player_mass: f32,
    /// Player hangs in place until the first tap of a session
    pub hold_until_first_tap: bool,
    /// Seconds per flap animation frame
    pub flap_frame_time: f32,

    // === Backdrop ===
    pub backdrop_tile_width: f32,
    /// Seconds for the backdrop to scroll one tile width
    pub backdrop_period: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            obstacle_size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),

            gap_factor: GAP_FACTOR,
            spawn_period: SPAWN_PERIOD,
            scroll_divisor: SCROLL_DIVISOR,
            spawn_on_start: true,

            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            player_mass: PLAYER_MASS,
            hold_until_first_tap: true,
            flap_frame_time: FLAP_FRAME_TIME,

            backdrop_tile_width: BACKDROP_TILE_WIDTH,
            backdrop_period: BACKDROP_PERIOD,
        }
    }
}

impl Tuning {
    /// Viewport center point
    pub fn center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    /// Height of the opening between an obstacle pair
    pub fn gap_height(&self) -> f32 {
        self.player_size.y * self.gap_factor
    }

    /// Time for an obstacle to scroll out (constant speed regardless of width)
    pub fn scroll_duration(&self) -> f32 {
        self.viewport.x / self.scroll_divisor
    }

    /// Radius of the player's circular contact body
    pub fn player_radius(&self) -> f32 {
        self.player_size.y / 2.0
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("viewport.x", self.viewport.x),
            ("viewport.y", self.viewport.y),
            ("player_size.y", self.player_size.y),
            ("obstacle_size.x", self.obstacle_size.x),
            ("obstacle_size.y", self.obstacle_size.y),
            ("gap_factor", self.gap_factor),
            ("spawn_period", self.spawn_period),
            ("scroll_divisor", self.scroll_divisor),
            ("player_mass", self.player_mass),
            ("flap_frame_time", self.flap_frame_time),
            ("backdrop_tile_width", self.backdrop_tile_width),
            ("backdrop_period", self.backdrop_period),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidTuning {
                    field,
                    reason: "must be a finite positive number",
                });
            }
        }
        Ok(())
    }

    /// Parse and validate tuning from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning ({}): {err}", path.display());
                Self::default()
            }
        }
    }
}
