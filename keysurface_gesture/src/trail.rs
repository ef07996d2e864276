// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fading glide trail: a presentation-only snapshot of a finished trajectory.

use kurbo::{Line, Point};

/// Parameters for [`GlideTrail`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrailStyle {
    /// Time for the radius to go from `start_radius` to `end_radius`.
    pub duration_ms: u64,
    /// Radius of the newest segment when the trail starts fading.
    pub start_radius: f64,
    /// Radius of the newest segment once the duration has elapsed.
    pub end_radius: f64,
    /// Per-segment factor applied counting back from the newest segment.
    pub decay: f64,
}

impl Default for TrailStyle {
    fn default() -> Self {
        Self {
            duration_ms: 200,
            start_radius: 10.0,
            end_radius: 0.0,
            decay: 0.93,
        }
    }
}

/// A snapshot of a glide path that fades out over time.
///
/// Sampling is a pure function of the `now` passed in; the trail never mutates after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct GlideTrail {
    points: Vec<Point>,
    started_ms: u64,
    style: TrailStyle,
}

impl GlideTrail {
    /// Snapshot `points`, starting the fade at `started_ms`.
    pub fn new(points: Vec<Point>, started_ms: u64, style: TrailStyle) -> Self {
        Self {
            points,
            started_ms,
            style,
        }
    }

    /// Trail vertices, oldest first.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Whether the fade has finished at `now_ms`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.started_ms.saturating_add(self.style.duration_ms)
    }

    /// Radius of the newest segment at `now_ms`.
    #[allow(
        clippy::cast_precision_loss,
        reason = "millisecond spans are far below 2^52"
    )]
    pub fn radius_at(&self, now_ms: u64) -> f64 {
        let t = if self.style.duration_ms == 0 {
            1.0
        } else {
            let elapsed = now_ms.saturating_sub(self.started_ms) as f64;
            (elapsed / self.style.duration_ms as f64).clamp(0.0, 1.0)
        };
        self.style.start_radius + (self.style.end_radius - self.style.start_radius) * t
    }

    /// Segments with their radii at `now_ms`, newest first.
    pub fn segments(&self, now_ms: u64) -> impl Iterator<Item = (Line, f64)> + '_ {
        let radius = self.radius_at(now_ms);
        let decay = self.style.decay;
        self.points
            .windows(2)
            .rev()
            .scan(radius, move |r, w| {
                let seg = (Line::new(w[0], w[1]), *r);
                *r *= decay;
                Some(seg)
            })
    }
}
