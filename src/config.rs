use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MOVE_SPEED: f32 = 5.0;
pub const DEFAULT_LOOK_SENSITIVITY: f32 = 0.003;
pub const DEFAULT_PLAYER_HEIGHT: f32 = 1.6;
pub const DEFAULT_PLAYER_RADIUS: f32 = 0.3;
pub const DEFAULT_WALL_PROBE_MARGIN: f32 = 0.1;
pub const DEFAULT_GROUND_PROBE_HEIGHT: f32 = 10.0;
pub const DEFAULT_FALLBACK_PROBE_HEIGHT: f32 = 2.0;
pub const DEFAULT_IDLE_EASE_FACTOR: f32 = 0.1;
pub const DEFAULT_MAX_FRAME_DELTA: f32 = 0.1;

pub const DEFAULT_DOOR_RADIUS: f32 = 5.0;
pub const DEFAULT_HOTSPOT_RADIUS: f32 = 1.5;

/// Tunables for one navigation session. Immutable once the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Units per second
    pub move_speed: f32,
    /// Radians per pixel of pointer drag
    pub look_sensitivity: f32,
    /// Eye height above the floor
    pub player_height: f32,
    pub player_radius: f32,
    /// Ground probe origin, measured above the eye
    pub ground_probe_height: f32,
    /// Shorter probe tried when the primary one misses
    pub fallback_probe_height: f32,
    pub wall_probe_margin: f32,
    /// Height of the lowest body probe above the floor
    pub step_height: f32,
    /// Fraction of the remaining height error removed per idle frame
    pub idle_ease_factor: f32,
    /// Longest frame delta the solver will integrate, in seconds
    pub max_frame_delta: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            look_sensitivity: DEFAULT_LOOK_SENSITIVITY,
            player_height: DEFAULT_PLAYER_HEIGHT,
            player_radius: DEFAULT_PLAYER_RADIUS,
            ground_probe_height: DEFAULT_GROUND_PROBE_HEIGHT,
            fallback_probe_height: DEFAULT_FALLBACK_PROBE_HEIGHT,
            wall_probe_margin: DEFAULT_WALL_PROBE_MARGIN,
            step_height: 0.0,
            idle_ease_factor: DEFAULT_IDLE_EASE_FACTOR,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
        }
    }
}

impl NavigationConfig {
    /// Distance within which a body probe hit blocks the move
    pub fn wall_reach(&self) -> f32 {
        self.player_radius + self.wall_probe_margin
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("moveSpeed", self.move_speed),
            ("lookSensitivity", self.look_sensitivity),
            ("playerHeight", self.player_height),
            ("playerRadius", self.player_radius),
            ("groundProbeHeight", self.ground_probe_height),
            ("fallbackProbeHeight", self.fallback_probe_height),
            ("maxFrameDelta", self.max_frame_delta),
        ];
        for (name, value) in fields {
            ensure!(
                value.is_finite() && value > 0.0,
                "{name} must be a positive number, got {value}"
            );
        }
        ensure!(
            self.wall_probe_margin.is_finite() && self.wall_probe_margin >= 0.0,
            "wallProbeMargin must be non-negative, got {}",
            self.wall_probe_margin
        );
        ensure!(
            self.step_height.is_finite() && (0.0..self.player_height).contains(&self.step_height),
            "stepHeight must be in [0, playerHeight), got {}",
            self.step_height
        );
        ensure!(
            self.idle_ease_factor > 0.0 && self.idle_ease_factor <= 1.0,
            "idleEaseFactor must be in (0, 1], got {}",
            self.idle_ease_factor
        );
        ensure!(
            self.fallback_probe_height <= self.ground_probe_height,
            "fallbackProbeHeight ({}) must not exceed groundProbeHeight ({})",
            self.fallback_probe_height,
            self.ground_probe_height
        );
        Ok(())
    }
}
