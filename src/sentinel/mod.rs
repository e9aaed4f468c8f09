//! Viewport sentinel: the "last visible item" observer.
//!
//! In the browser this role is played by an `IntersectionObserver` on the
//! last rendered row; here it is a state machine fed with marker geometry
//! by whatever rendering surface hosts the list (DOM, terminal, batch
//! cursor). The sentinel fires at most once per armed marker; re-arming
//! is disconnect-then-observe, so repeated re-arm calls are idempotent
//! and an already-delivered page can never fire again.
//!
//! State machine: `Unarmed → Armed(marker) → Armed(marker')` on re-arm,
//! `→ Disconnected` on teardown (terminal).

use crate::model::MarkerId;
use serde::Deserialize;

#[cfg(test)]
#[path = "sentinel_tests.rs"]
mod tests;

/// Detection zone tunables.
///
/// Defaults follow the reference behavior: the zone extends 100 units past
/// the container bound and the marker must be at least half visible. These
/// are tunable thresholds, not hard requirements.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentinelTuning {
    /// How far past the container bound the detection zone extends.
    pub root_margin: i32,
    /// Minimum fraction of the marker that must be visible, 0.0 to 1.0.
    pub intersection_threshold: f64,
}

impl Default for SentinelTuning {
    fn default() -> Self {
        Self {
            root_margin: 100,
            intersection_threshold: 0.5,
        }
    }
}

/// Where a marker currently sits relative to the scroll container.
///
/// Reported by the rendering surface on scroll/layout events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerGeometry {
    /// Distance from the container's bottom bound to the marker, in layout
    /// units. Zero or negative means the marker is inside the container;
    /// positive means it is that far below the fold.
    pub distance_past_bound: i32,
    /// Fraction of the marker inside the detection zone, 0.0 to 1.0.
    pub intersection_ratio: f64,
}

/// Lifecycle phase of the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelPhase {
    /// No marker under observation.
    Unarmed,
    /// Watching `marker`; `delivered` is set once it has fired.
    Armed {
        /// The marker under observation.
        marker: MarkerId,
        /// Whether the visibility event for this marker was already
        /// delivered.
        delivered: bool,
    },
    /// Torn down. Terminal: firing after disconnect is impossible.
    Disconnected,
}

/// Observer of the list's last visible item.
///
/// Owned by one feed instance; holds only the marker's identity, never the
/// marker itself.
#[derive(Debug, Clone)]
pub struct ViewportSentinel {
    phase: SentinelPhase,
    tuning: SentinelTuning,
}

impl ViewportSentinel {
    /// Create an unarmed sentinel with the given detection thresholds.
    pub fn new(tuning: SentinelTuning) -> Self {
        Self {
            phase: SentinelPhase::Unarmed,
            tuning,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SentinelPhase {
        self.phase
    }

    /// Whether a marker is under observation and has not fired yet.
    pub fn is_watching(&self) -> bool {
        matches!(
            self.phase,
            SentinelPhase::Armed {
                delivered: false,
                ..
            }
        )
    }

    /// Observe `marker`, replacing any previous observation.
    ///
    /// Disconnect-then-observe: the previous marker stops being watched
    /// even if it never fired. Idempotent — arming the same marker twice
    /// is equivalent to arming it once, and does not reset a delivered
    /// flag for a marker that already fired. No-op after
    /// [`disconnect`](Self::disconnect).
    pub fn arm(&mut self, marker: MarkerId) {
        match self.phase {
            SentinelPhase::Disconnected => {
                tracing::warn!(%marker, "ignoring arm() on disconnected sentinel");
            }
            SentinelPhase::Armed {
                marker: current,
                delivered,
            } if current == marker => {
                // Re-arming the same marker keeps its delivered state.
                self.phase = SentinelPhase::Armed { marker, delivered };
            }
            _ => {
                tracing::trace!(%marker, "sentinel armed");
                self.phase = SentinelPhase::Armed {
                    marker,
                    delivered: false,
                };
            }
        }
    }

    /// Feed a geometry report for `marker`.
    ///
    /// Returns `true` exactly when this is the first time the armed,
    /// undelivered marker is seen inside the detection zone. Reports for
    /// other markers, out-of-zone geometry, delivered markers, or a
    /// disconnected sentinel return `false`.
    pub fn observe(&mut self, marker: MarkerId, geometry: MarkerGeometry) -> bool {
        let SentinelPhase::Armed {
            marker: watched,
            delivered,
        } = self.phase
        else {
            return false;
        };
        if watched != marker || delivered {
            return false;
        }
        if !self.in_zone(geometry) {
            return false;
        }
        self.phase = SentinelPhase::Armed {
            marker,
            delivered: true,
        };
        tracing::debug!(%marker, "sentinel fired");
        true
    }

    /// Stop watching without tearing down.
    ///
    /// Used when the list is cleared on a query change: the old marker's
    /// delivered state is meaningless for the new accumulation, and index
    /// reuse must not suppress the new marker. No-op after
    /// [`disconnect`](Self::disconnect).
    pub fn disarm(&mut self) {
        if self.phase != SentinelPhase::Disconnected {
            self.phase = SentinelPhase::Unarmed;
        }
    }

    /// Tear down the sentinel. Terminal.
    pub fn disconnect(&mut self) {
        self.phase = SentinelPhase::Disconnected;
    }

    fn in_zone(&self, geometry: MarkerGeometry) -> bool {
        geometry.distance_past_bound <= self.tuning.root_margin
            && geometry.intersection_ratio >= self.tuning.intersection_threshold
    }
}

impl Default for ViewportSentinel {
    fn default() -> Self {
        Self::new(SentinelTuning::default())
    }
}
