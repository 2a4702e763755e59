use std::collections::VecDeque;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::config::AlignmentConfig;
use super::guidance::{self, GuidanceInputs, GuidanceMessage};
use super::haptics::{HapticTimeline, PulseKind};
use super::types::{
    AlignmentResult, AlignmentStatus, BubbleOffset, DeviceOrientation, OrientationSample,
};
use super::window::SampleWindow;

/// Edge-triggered change reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AlignmentEvent {
    StatusChanged {
        from: Option<AlignmentStatus>,
        to: AlignmentStatus,
    },
    GuidanceChanged {
        from: Option<GuidanceMessage>,
        to: Option<GuidanceMessage>,
    },
}

/// Undrained events kept by the classifier; older ones are dropped first.
pub const MAX_PENDING_EVENTS: usize = 64;

#[derive(Debug, Clone, Copy)]
struct SmoothedTilt {
    beta: f64,
    gamma: f64,
}

/// Turns a stream of orientation samples into capture readiness.
///
/// Owns all of its history: smoothed angles, the tilt and acceleration
/// windows, the last reported status/message and the pending haptic pulses.
/// Call [`reset`](Self::reset) whenever sampling stops and resumes.
#[derive(Debug, Clone)]
pub struct AlignmentClassifier {
    config: AlignmentConfig,
    smoothed: Option<SmoothedTilt>,
    tilt_window: SampleWindow,
    accel_window: SampleWindow,
    last_status: Option<AlignmentStatus>,
    last_guidance: Option<GuidanceMessage>,
    last_result: Option<AlignmentResult>,
    events: VecDeque<AlignmentEvent>,
    events_dropped: u64,
    haptics: HapticTimeline,
    samples_ingested: u64,
}

impl Default for AlignmentClassifier {
    fn default() -> Self {
        Self::new(AlignmentConfig::default())
    }
}

impl AlignmentClassifier {
    /// Build a classifier from `config` as given.
    ///
    /// The config is not checked; use [`try_new`](Self::try_new) for configs
    /// that did not come through [`AlignmentConfig::validate`].
    pub fn new(config: AlignmentConfig) -> Self {
        Self {
            tilt_window: SampleWindow::new(config.window_len),
            accel_window: SampleWindow::new(config.window_len),
            config,
            smoothed: None,
            last_status: None,
            last_guidance: None,
            last_result: None,
            events: VecDeque::with_capacity(MAX_PENDING_EVENTS),
            events_dropped: 0,
            haptics: HapticTimeline::new(),
            samples_ingested: 0,
        }
    }

    /// Build a classifier, rejecting an inconsistent `config`.
    pub fn try_new(config: AlignmentConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Classify one sample.
    ///
    /// Samples with non-finite angles or acceleration are dropped and the
    /// previous result is returned unchanged.
    pub fn ingest(&mut self, sample: &OrientationSample) -> AlignmentResult {
        if !sample.is_finite() {
            tracing::warn!("dropping non-finite orientation sample");
            return self
                .last_result
                .clone()
                .unwrap_or_else(|| AlignmentResult::unavailable(self.config.bubble_radius_px));
        }
        self.samples_ingested += 1;

        let tilt = self.smooth(sample.beta, sample.gamma);
        let orientation = self.orientation(tilt);
        let tilt_angle = match orientation {
            DeviceOrientation::Horizontal => tilt.beta.hypot(tilt.gamma),
            DeviceOrientation::Vertical => (tilt.beta.abs() - 90.0).abs(),
        };

        let accel_magnitude = Vector3::from(sample.acceleration).norm();
        self.tilt_window.push(tilt_angle);
        self.accel_window.push(accel_magnitude);

        let is_stable = self.is_stable();
        let bubble_offset = self.bubble_offset(tilt, orientation);
        let status = self.status(bubble_offset.distance(), tilt_angle);

        let guidance = guidance::select(
            &GuidanceInputs {
                tilt_angle,
                accel_variance: self.accel_window.variance(),
                status,
                is_stable,
                orientation,
                beta: tilt.beta,
                gamma: tilt.gamma,
            },
            &self.config.guidance,
        );

        self.report_status(status, sample.timestamp_ms);
        self.report_guidance(guidance);

        let result = AlignmentResult {
            tilt_angle,
            is_stable,
            status,
            orientation,
            bubble_offset,
            guidance,
        };
        self.last_result = Some(result.clone());
        result
    }

    /// Forget all history, pending pulses and reported state.
    pub fn reset(&mut self) {
        self.smoothed = None;
        self.tilt_window.clear();
        self.accel_window.clear();
        self.last_status = None;
        self.last_guidance = None;
        self.last_result = None;
        self.events.clear();
        self.events_dropped = 0;
        self.haptics.cancel_all();
        self.samples_ingested = 0;
        tracing::debug!("alignment classifier reset");
    }

    /// Most recent result, if any sample has been classified since reset.
    pub fn last_result(&self) -> Option<&AlignmentResult> {
        self.last_result.as_ref()
    }

    /// Drain the status and guidance changes recorded since the last call.
    ///
    /// At most [`MAX_PENDING_EVENTS`] are kept between calls, newest last.
    pub fn take_events(&mut self) -> Vec<AlignmentEvent> {
        self.events.drain(..).collect()
    }

    /// Number of events waiting in the queue.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Events evicted because nobody drained the queue.
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped
    }

    /// Haptic pulses due at `now_ms`.
    pub fn due_haptics(&mut self, now_ms: u64) -> Vec<PulseKind> {
        self.haptics.due(now_ms)
    }

    pub fn haptics(&self) -> &HapticTimeline {
        &self.haptics
    }

    pub fn samples_ingested(&self) -> u64 {
        self.samples_ingested
    }

    fn smooth(&mut self, beta: f64, gamma: f64) -> SmoothedTilt {
        let a = self.config.smoothing_alpha;
        let next = match self.smoothed {
            None => SmoothedTilt { beta, gamma },
            Some(prev) => SmoothedTilt {
                beta: prev.beta * (1.0 - a) + beta * a,
                gamma: prev.gamma * (1.0 - a) + gamma * a,
            },
        };
        self.smoothed = Some(next);
        next
    }

    fn orientation(&self, tilt: SmoothedTilt) -> DeviceOrientation {
        let limit = self.config.horizontal_limit_deg;
        if tilt.beta.abs() < limit && tilt.gamma.abs() < limit {
            DeviceOrientation::Horizontal
        } else {
            DeviceOrientation::Vertical
        }
    }

    fn is_stable(&self) -> bool {
        let min = self.config.min_stability_samples;
        if self.tilt_window.len() < min || self.accel_window.len() < min {
            return false;
        }
        match (self.tilt_window.spread(), self.accel_window.spread()) {
            (Some(tilt), Some(accel)) => {
                tilt <= self.config.stable_tilt_spread_deg
                    && accel <= self.config.stable_accel_spread
            }
            _ => false,
        }
    }

    fn bubble_offset(&self, tilt: SmoothedTilt, orientation: DeviceOrientation) -> BubbleOffset {
        let scale = self.config.bubble_px_per_deg();
        let (x, y) = match orientation {
            DeviceOrientation::Horizontal => (tilt.gamma * scale, tilt.beta * scale),
            DeviceOrientation::Vertical => (0.0, (tilt.beta.abs() - 90.0) * scale),
        };
        let radius = self.config.bubble_radius_px;
        let d = x.hypot(y);
        if d > radius {
            BubbleOffset {
                x: x * radius / d,
                y: y * radius / d,
            }
        } else {
            BubbleOffset { x, y }
        }
    }

    fn status(&self, offset_px: f64, tilt_angle: f64) -> AlignmentStatus {
        let good = self.config.good;
        let warning = self.config.warning;
        if offset_px <= good.max_offset_px && tilt_angle <= good.max_tilt_deg {
            AlignmentStatus::Good
        } else if offset_px <= warning.max_offset_px && tilt_angle <= warning.max_tilt_deg {
            AlignmentStatus::Warning
        } else {
            AlignmentStatus::Bad
        }
    }

    fn report_status(&mut self, status: AlignmentStatus, now_ms: u64) {
        if self.last_status == Some(status) {
            return;
        }
        let from = self.last_status.replace(status);
        tracing::debug!(?from, to = %status, "alignment status changed");
        self.push_event(AlignmentEvent::StatusChanged { from, to: status });

        if self.config.haptics.enabled {
            let burst = match status {
                AlignmentStatus::Good => &self.config.haptics.good,
                AlignmentStatus::Warning => &self.config.haptics.warning,
                AlignmentStatus::Bad => &self.config.haptics.bad,
            };
            let cancelled = self.haptics.schedule(now_ms, burst);
            if cancelled > 0 {
                tracing::trace!(cancelled, "cancelled pending haptic pulses");
            }
        }
    }

    fn report_guidance(&mut self, guidance: Option<GuidanceMessage>) {
        if self.last_guidance == guidance {
            return;
        }
        let from = std::mem::replace(&mut self.last_guidance, guidance);
        self.push_event(AlignmentEvent::GuidanceChanged { from, to: guidance });
    }

    fn push_event(&mut self, event: AlignmentEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
            self.events_dropped += 1;
        }
        self.events.push_back(event);
    }
}
