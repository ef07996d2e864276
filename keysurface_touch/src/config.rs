// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch configuration.

use keysurface_gesture::{GlideConfig, SwipeThresholds};

use crate::action::SwipeBindings;
use crate::error::ConfigError;

/// How far a pointer may drift outside a key before it counts as leaving.
///
/// Ratios of the key's visible width and height.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hysteresis {
    /// Horizontal tolerance.
    pub horizontal: f64,
    /// Vertical tolerance.
    pub vertical: f64,
}

impl Default for Hysteresis {
    fn default() -> Self {
        Self {
            horizontal: 0.10,
            vertical: 0.35,
        }
    }
}

/// Popup behavior.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopupConfig {
    /// Show the basic preview bubble on press.
    pub preview: bool,
    /// Maximum cells per row in the extended grid.
    pub columns: usize,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            preview: true,
            columns: 5,
        }
    }
}

/// Immutable configuration for a [`PointerTracker`](crate::PointerTracker).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchConfig {
    /// Delay before a held key counts as long-pressed.
    pub long_press_delay_ms: u64,
    /// Interval between repeats of a held repeatable key.
    pub repeat_interval_ms: u64,
    /// Swipe classification thresholds.
    pub swipe: SwipeThresholds,
    /// Glide typing.
    pub glide: GlideConfig,
    /// Key-leave tolerance.
    pub hysteresis: Hysteresis,
    /// Swipe and long-press action bindings.
    pub swipe_bindings: SwipeBindings,
    /// Popups.
    pub popup: PopupConfig,
    /// Capacity of the pending-event queue.
    pub queue_capacity: usize,
    /// Maximum number of simultaneously tracked pointers.
    pub max_pointers: usize,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            long_press_delay_ms: 300,
            repeat_interval_ms: 50,
            swipe: SwipeThresholds::default(),
            glide: GlideConfig::default(),
            hysteresis: Hysteresis::default(),
            swipe_bindings: SwipeBindings::default(),
            popup: PopupConfig::default(),
            queue_capacity: 64,
            max_pointers: 10,
        }
    }
}

impl TouchConfig {
    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        threshold("swipe.distance", self.swipe.distance)?;
        threshold("swipe.velocity", self.swipe.velocity)?;
        threshold("glide.engage_ratio", self.glide.engage_ratio)?;
        threshold("glide.trail.start_radius", self.glide.trail.start_radius)?;
        threshold("glide.trail.end_radius", self.glide.trail.end_radius)?;
        ratio("glide.trail.decay", self.glide.trail.decay)?;
        ratio("hysteresis.horizontal", self.hysteresis.horizontal)?;
        ratio("hysteresis.vertical", self.hysteresis.vertical)?;
        non_zero_ms("long_press_delay_ms", self.long_press_delay_ms)?;
        non_zero_ms("repeat_interval_ms", self.repeat_interval_ms)?;
        non_zero("queue_capacity", self.queue_capacity)?;
        non_zero("max_pointers", self.max_pointers)?;
        non_zero("popup.columns", self.popup.columns)?;
        Ok(())
    }
}

fn threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { field, value })
    }
}

fn ratio(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RatioOutOfRange { field, value })
    }
}

fn non_zero_ms(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroInterval { field })
    } else {
        Ok(())
    }
}

fn non_zero(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroCapacity { field })
    } else {
        Ok(())
    }
}
