//! Scroll position → progress, section, velocity, calm and transition.
//!
//! Re-evaluated on every scroll event, plus one decay step per animation frame
//! while the velocity is still relaxing.

use crate::constants::*;
use crate::section::{Section, SectionTable};
use crate::store::AnimationStore;

/// One scroll measurement from the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollSample {
    pub scroll_y: f32,
    pub document_height: f32,
    pub viewport_height: f32,
    pub time_ms: f64,
}

/// Values derived from a sample, as published to the store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollReport {
    pub fraction: f32,
    pub section: Section,
    pub section_index: usize,
    pub section_progress: f32,
    pub velocity: f32,
    pub calm_factor: f32,
    pub transition_progress: f32,
}

/// Absolute scroll fraction; 0 for documents that cannot scroll.
#[inline]
pub fn scroll_fraction(scroll_y: f32, document_height: f32, viewport_height: f32) -> f32 {
    let range = document_height - viewport_height;
    if !(range > 0.0) || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / range).clamp(0.0, 1.0)
}

/// Calm target before renderer-side smoothing, capped at `CALM_MAX`.
#[inline]
pub fn calm_target(fraction: f32, section_index: usize) -> f32 {
    (fraction * CALM_SCROLL_WEIGHT + section_index as f32 * CALM_SECTION_WEIGHT).min(CALM_MAX)
}

/// Ramp 0→1 over the first 15% of a section, hold, ramp 1→0 over the last 15%.
#[inline]
pub fn transition_progress(section_progress: f32) -> f32 {
    let p = section_progress.clamp(0.0, 1.0);
    if p < TRANSITION_RAMP {
        p / TRANSITION_RAMP
    } else if p > 1.0 - TRANSITION_RAMP {
        (1.0 - p) / TRANSITION_RAMP
    } else {
        1.0
    }
}

#[derive(Clone, Debug)]
pub struct ScrollController {
    sections: SectionTable,
    last_y: Option<f32>,
    last_time_ms: f64,
    accumulator: f32,
    smoothed: f32,
    decay_armed: bool,
    visible: bool,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(SectionTable::default())
    }
}

impl ScrollController {
    pub fn new(sections: SectionTable) -> Self {
        Self {
            sections,
            last_y: None,
            last_time_ms: 0.0,
            accumulator: 0.0,
            smoothed: 0.0,
            decay_armed: false,
            visible: true,
        }
    }

    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    /// Smoothed velocity in px/s (before normalisation).
    pub fn smoothed_velocity(&self) -> f32 {
        self.smoothed
    }

    pub fn decay_armed(&self) -> bool {
        self.decay_armed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Pause or resume scroll handling. State is kept while hidden.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            log::info!("[scroll] visible={}", visible);
        }
        self.visible = visible;
    }

    /// Pure part of the scroll step: update internal registers and derive
    /// the report without touching a store.
    pub fn step(&mut self, sample: ScrollSample) -> ScrollReport {
        let y = if sample.scroll_y.is_finite() {
            sample.scroll_y
        } else {
            0.0
        };
        let raw = match self.last_y {
            Some(prev) => {
                let dt_sec = ((sample.time_ms - self.last_time_ms) / 1000.0) as f32;
                if dt_sec > 0.0 {
                    (y - prev).abs() / dt_sec
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        self.last_y = Some(y);
        self.last_time_ms = sample.time_ms;
        self.accumulator = self.accumulator * SCROLL_ACCUM_KEEP + raw * (1.0 - SCROLL_ACCUM_KEEP);

        let fraction = scroll_fraction(y, sample.document_height, sample.viewport_height);
        let section_index = self.sections.locate(fraction);
        let range = *self.sections.range(section_index);
        let section_progress = range.local_progress(fraction);

        self.smoothed += (self.accumulator - self.smoothed) * SCROLL_DISPLAY_BLEND;
        self.decay_armed = true;

        ScrollReport {
            fraction,
            section: range.section,
            section_index,
            section_progress,
            velocity: normalized_velocity(self.smoothed),
            calm_factor: calm_target(fraction, section_index),
            transition_progress: transition_progress(section_progress),
        }
    }

    /// Handle a scroll event. Returns `None` while the page is hidden.
    pub fn on_scroll(
        &mut self,
        sample: ScrollSample,
        store: &mut AnimationStore,
    ) -> Option<ScrollReport> {
        if !self.visible {
            return None;
        }
        let report = self.step(sample);
        store.set_scroll_progress(report.fraction);
        store.set_section_at(report.section, report.section_index);
        store.set_section_progress(report.section_progress);
        store.set_scroll_velocity(report.velocity);
        store.set_calm_factor(report.calm_factor);
        store.set_transition_progress(report.transition_progress);
        Some(report)
    }

    /// One idle-frame decay step. Returns the republished velocity, or `None`
    /// when nothing was pending.
    pub fn decay_tick(&mut self, store: &mut AnimationStore) -> Option<f32> {
        if !self.decay_armed || !self.visible {
            return None;
        }
        self.accumulator *= SCROLL_DECAY_KEEP;
        self.smoothed += (self.accumulator - self.smoothed) * SCROLL_DECAY_BLEND;
        if self.smoothed < SCROLL_SETTLE_EPSILON && self.accumulator < SCROLL_SETTLE_EPSILON {
            self.accumulator = 0.0;
            self.smoothed = 0.0;
            self.decay_armed = false;
        }
        let v = normalized_velocity(self.smoothed);
        store.set_scroll_velocity(v);
        Some(v)
    }
}

#[inline]
fn normalized_velocity(smoothed: f32) -> f32 {
    (smoothed / SCROLL_VELOCITY_NORM).clamp(0.0, 1.0)
}
