// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glide typing: trajectory capture for one finger tracing a word.
//!
//! ## Lifecycle
//!
//! 1) [`GlideTypingDetector::begin`] registers a candidate pointer and the center of the key
//!    it landed on.
//! 2) [`GlideTypingDetector::on_move`] records every sample. Once the pointer is further than
//!    `engage_ratio × key width` from the key center, the glide is engaged.
//! 3) [`GlideTypingDetector::finish`] returns the full trajectory (including samples recorded
//!    before engagement) and snapshots it into a [`GlideTrail`] for fading.
//!
//! Eligibility (layout mode, password fields, other pointers) is the caller's decision.

use kurbo::Point;

use crate::trail::{GlideTrail, TrailStyle};
use crate::types::{GlidePoint, PointerId};

/// Glide settings.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlideConfig {
    /// Master switch.
    pub enabled: bool,
    /// Engagement distance from the initial key center, as a fraction of the key width.
    pub engage_ratio: f64,
    /// Whether finished trajectories leave a fading trail.
    pub show_trail: bool,
    /// Fade parameters.
    pub trail: TrailStyle,
}

impl Default for GlideConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engage_ratio: 0.35,
            show_trail: true,
            trail: TrailStyle::default(),
        }
    }
}

/// A finished glide.
#[derive(Clone, Debug, PartialEq)]
pub struct GlideTrajectory {
    /// Pointer that traced it.
    pub pointer: PointerId,
    /// Samples in arrival order.
    pub points: Vec<GlidePoint>,
    /// `false` when the glide ended by cancellation rather than lift-off.
    pub completed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Phase {
    Idle,
    Candidate { pointer: PointerId, origin: Point },
    Engaged { pointer: PointerId },
}

/// Single-pointer glide detector.
#[derive(Clone, Debug)]
pub struct GlideTypingDetector {
    config: GlideConfig,
    key_width: f64,
    phase: Phase,
    points: Vec<GlidePoint>,
    trail: Option<GlideTrail>,
}

impl GlideTypingDetector {
    /// Create a detector. `key_width` is the reference key width.
    pub fn new(config: GlideConfig, key_width: f64) -> Self {
        Self {
            config,
            key_width,
            phase: Phase::Idle,
            points: Vec::new(),
            trail: None,
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &GlideConfig {
        &self.config
    }

    /// Update the reference key width after a layout pass.
    pub fn set_key_width(&mut self, key_width: f64) {
        self.key_width = key_width;
    }

    /// Register `pointer` as a candidate. Any previous state is discarded.
    pub fn begin(&mut self, pointer: PointerId, key_center: Point, pos: Point, time_ms: u64) {
        self.points.clear();
        self.points.push(GlidePoint {
            position: pos,
            time_ms,
        });
        self.phase = Phase::Candidate {
            pointer,
            origin: key_center,
        };
    }

    /// Whether `pointer` is a candidate that has not engaged yet.
    pub fn is_candidate(&self, pointer: PointerId) -> bool {
        matches!(self.phase, Phase::Candidate { pointer: p, .. } if p == pointer)
    }

    /// Pointer of the engaged glide, if any.
    pub fn engaged_pointer(&self) -> Option<PointerId> {
        match self.phase {
            Phase::Engaged { pointer } => Some(pointer),
            _ => None,
        }
    }

    /// Whether any glide is engaged.
    pub fn is_engaged(&self) -> bool {
        self.engaged_pointer().is_some()
    }

    /// Samples recorded so far.
    pub fn points(&self) -> &[GlidePoint] {
        &self.points
    }

    /// Record a sample. Returns `true` on the sample that engages the glide.
    pub fn on_move(&mut self, pointer: PointerId, pos: Point, time_ms: u64) -> bool {
        let origin = match self.phase {
            Phase::Candidate { pointer: p, origin } if p == pointer => origin,
            Phase::Engaged { pointer: p } if p == pointer => {
                self.points.push(GlidePoint {
                    position: pos,
                    time_ms,
                });
                return false;
            }
            _ => return false,
        };
        self.points.push(GlidePoint {
            position: pos,
            time_ms,
        });
        let distance = (pos - origin).hypot();
        if distance > self.config.engage_ratio * self.key_width {
            self.phase = Phase::Engaged { pointer };
            tracing::debug!(?pointer, distance, samples = self.points.len(), "glide engaged");
            return true;
        }
        false
    }

    /// End the glide for `pointer`.
    ///
    /// Returns the trajectory if the glide was engaged; a candidate that never engaged
    /// yields `None`. Either way the live state is cleared.
    pub fn finish(&mut self, pointer: PointerId, completed: bool) -> Option<GlideTrajectory> {
        match self.phase {
            Phase::Engaged { pointer: p } if p == pointer => {}
            Phase::Candidate { pointer: p, .. } if p == pointer => {
                self.reset();
                return None;
            }
            _ => return None,
        }
        let points = core::mem::take(&mut self.points);
        if self.config.show_trail {
            let started = points.last().map_or(0, |p| p.time_ms);
            self.trail = Some(GlideTrail::new(
                points.iter().map(|p| p.position).collect(),
                started,
                self.config.trail,
            ));
        }
        self.phase = Phase::Idle;
        tracing::debug!(?pointer, completed, samples = points.len(), "glide finalized");
        Some(GlideTrajectory {
            pointer,
            points,
            completed,
        })
    }

    /// Drop candidacy for `pointer` without producing anything. Engaged glides are kept.
    pub fn abandon(&mut self, pointer: PointerId) {
        if self.is_candidate(pointer) {
            self.reset();
        }
    }

    /// Drop all live state. The fading trail is kept.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.points.clear();
    }

    /// Fading trail of the last finished glide, if still alive at `now_ms`.
    pub fn trail(&self, now_ms: u64) -> Option<&GlideTrail> {
        self.trail.as_ref().filter(|t| !t.is_expired(now_ms))
    }

    /// Release an expired trail.
    pub fn prune_trail(&mut self, now_ms: u64) {
        if self.trail.as_ref().is_some_and(|t| t.is_expired(now_ms)) {
            self.trail = None;
        }
    }
}
