use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::format::format_clock;

/// Sessions whose procrastination share exceeds this forfeit the streak.
pub const PENALTY_RATIO: f64 = 0.6;

/// At most this many daily aggregates are retained. Eviction drops the
/// oldest-inserted entry, not the oldest date.
pub const HISTORY_LIMIT: usize = 30;

/// The leaderboard projects the most recent week.
pub const LEADERBOARD_DAYS: usize = 7;

/// Percentage of session time spent focusing, rounded; 0 for an empty
/// session.
pub fn productivity_score(focus_seconds: u64, procrastination_seconds: u64) -> u32 {
    let total = focus_seconds + procrastination_seconds;
    if total == 0 {
        return 0;
    }
    ((focus_seconds as f64 / total as f64) * 100.0).round() as u32
}

/// Share of session time spent procrastinating; 0.0 for an empty session.
pub fn procrastination_ratio(focus_seconds: u64, procrastination_seconds: u64) -> f64 {
    let total = focus_seconds + procrastination_seconds;
    if total == 0 {
        return 0.0;
    }
    procrastination_seconds as f64 / total as f64
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub focus: u64,
    pub procrastination: u64,
    pub score: u32,
}

/// Display-ready leaderboard row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub date: String,
    pub score: u32,
    pub focus: String,
    pub procrastination: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub cumulative_focus: u64,
    pub cumulative_procrastination: u64,
    pub percent_focused: u32,
    pub streak: u32,
}

/// Cumulative totals, streak state, and the rolling daily history. Pure
/// aggregation logic; persistence lives in the surrounding store.
#[derive(Debug, Clone, Default)]
pub struct StatsState {
    pub cumulative_focus: u64,
    pub cumulative_procrastination: u64,
    pub streak: u32,
    pub last_active_date: Option<NaiveDate>,
    pub weekly: Vec<DailyAggregate>,
}

impl StatsState {
    /// Counts `today` toward the streak: a no-op when already counted,
    /// an increment when yesterday was active, a reset to 1 otherwise.
    pub fn check_and_update_streak(&mut self, today: NaiveDate) -> u32 {
        if self.last_active_date == Some(today) {
            return self.streak;
        }
        match (self.last_active_date, today.pred_opt()) {
            (Some(last), Some(yesterday)) if last == yesterday => self.streak += 1,
            _ => self.streak = 1,
        }
        self.last_active_date = Some(today);
        self.streak
    }

    /// Returns true when the streak was forfeited.
    pub fn penalize_streak(&mut self, procrastination_ratio: f64) -> bool {
        if procrastination_ratio > PENALTY_RATIO && self.streak > 0 {
            self.streak = 0;
            return true;
        }
        false
    }

    /// Folds a finished session into the aggregate for `date` and the
    /// cumulative totals; returns the updated aggregate. The day's score is
    /// recomputed from the summed totals, never averaged from per-session
    /// scores.
    pub fn record_session_end(
        &mut self,
        date: NaiveDate,
        focus_seconds: u64,
        procrastination_seconds: u64,
    ) -> DailyAggregate {
        let updated = match self.weekly.iter().position(|day| day.date == date) {
            Some(index) => {
                let day = &mut self.weekly[index];
                day.focus += focus_seconds;
                day.procrastination += procrastination_seconds;
                day.score = productivity_score(day.focus, day.procrastination);
                day.clone()
            }
            None => {
                let day = DailyAggregate {
                    date,
                    focus: focus_seconds,
                    procrastination: procrastination_seconds,
                    score: productivity_score(focus_seconds, procrastination_seconds),
                };
                self.weekly.push(day.clone());
                day
            }
        };

        while self.weekly.len() > HISTORY_LIMIT {
            self.weekly.remove(0);
        }

        self.cumulative_focus += focus_seconds;
        self.cumulative_procrastination += procrastination_seconds;
        updated
    }

    /// The 7 most recent days by date, newest first, formatted for display.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut recent = self.weekly.clone();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(LEADERBOARD_DAYS);
        recent
            .into_iter()
            .map(|day| LeaderboardEntry {
                date: day.date.format("%a, %b %-d").to_string(),
                score: day.score,
                focus: format_clock(day.focus),
                procrastination: format_clock(day.procrastination),
            })
            .collect()
    }

    pub fn overview(&self) -> StatsOverview {
        StatsOverview {
            cumulative_focus: self.cumulative_focus,
            cumulative_procrastination: self.cumulative_procrastination,
            percent_focused: productivity_score(
                self.cumulative_focus,
                self.cumulative_procrastination,
            ),
            streak: self.streak,
        }
    }
}
