// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors at the fallible edges: configuration and queue admission.
//!
//! Event processing itself never fails; malformed input degrades to "no key, no gesture".

use core::fmt;

use crate::event::InputEvent;

/// A [`TouchConfig`](crate::TouchConfig) value that cannot be used.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A threshold is negative, NaN, or infinite.
    InvalidThreshold {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A delay or interval is zero.
    ZeroInterval {
        /// Offending field.
        field: &'static str,
    },
    /// A ratio lies outside `0..=1`.
    RatioOutOfRange {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A capacity or count is zero.
    ZeroCapacity {
        /// Offending field.
        field: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreshold { field, value } => {
                write!(f, "`{field}` must be finite and non-negative, got {value}")
            }
            Self::ZeroInterval { field } => write!(f, "`{field}` must be at least 1 ms"),
            Self::RatioOutOfRange { field, value } => {
                write!(f, "`{field}` must lie in 0..=1, got {value}")
            }
            Self::ZeroCapacity { field } => write!(f, "`{field}` must be non-zero"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// The event queue is at capacity; the rejected event is handed back.
#[derive(Clone, Debug, PartialEq)]
pub struct QueueFull(pub InputEvent);

impl QueueFull {
    /// Recover the rejected event.
    pub fn into_inner(self) -> InputEvent {
        self.0
    }
}

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input queue is full, dropped {:?}", self.0)
    }
}

impl core::error::Error for QueueFull {}
