use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Focus milestones in elapsed stopwatch seconds (30/60/120/180 minutes).
pub const MILESTONES: [u64; 4] = [1800, 3600, 7200, 10800];

/// The progress indicator fills after one hour of focus.
pub const FOCUS_GOAL_SECONDS: u64 = 3600;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Focusing,
    Procrastinating,
    Stopped,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

/// Ephemeral per-session counters. Every second of a session lands in
/// exactly one of the focus or procrastination buckets; the stopwatch
/// advances only while focusing and is what milestones are checked against.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub phase: Phase,
    pub session_id: Option<String>,
    pub label: Option<String>,
    pub focus_seconds: u64,
    pub procrastination_seconds: u64,
    pub stopwatch_seconds: u64,
    pub pause_count: u64,
    #[serde(skip)]
    pub reached_milestones: HashSet<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Focusing | Phase::Procrastinating)
    }

    pub fn begin(&mut self, session_id: String, label: String) {
        *self = Self {
            phase: Phase::Focusing,
            session_id: Some(session_id),
            label: Some(label),
            ..Self::default()
        };
    }

    /// Credits `delta_seconds` to the bucket for the current phase and
    /// returns the milestone thresholds this tick crossed, in ascending
    /// order. Each threshold fires at most once per session even when a
    /// single delta jumps past several.
    pub fn tick(&mut self, delta_seconds: u64) -> Vec<u64> {
        match self.phase {
            Phase::Focusing => {
                self.focus_seconds += delta_seconds;
                self.stopwatch_seconds += delta_seconds;
                self.newly_reached_milestones()
            }
            Phase::Procrastinating => {
                self.procrastination_seconds += delta_seconds;
                Vec::new()
            }
            Phase::Idle | Phase::Stopped => Vec::new(),
        }
    }

    fn newly_reached_milestones(&mut self) -> Vec<u64> {
        MILESTONES
            .iter()
            .copied()
            .filter(|threshold| {
                self.stopwatch_seconds >= *threshold && self.reached_milestones.insert(*threshold)
            })
            .collect()
    }

    /// Every pause bumps the counter, even when already procrastinating;
    /// the phase change itself is one-directional until the next start.
    pub fn mark_paused(&mut self) -> u64 {
        self.phase = Phase::Procrastinating;
        self.pause_count += 1;
        self.pause_count
    }

    /// Share of the one-hour focus goal reached so far, as 0..=100.
    pub fn progress_percent(&self) -> f64 {
        (self.focus_seconds as f64 / FOCUS_GOAL_SECONDS as f64).min(1.0) * 100.0
    }

    pub fn stop(&mut self) {
        self.phase = Phase::Stopped;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
