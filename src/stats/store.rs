use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;
use tokio::sync::Mutex;

use crate::db::Database;

use super::state::{DailyAggregate, LeaderboardEntry, StatsOverview, StatsState};

const KEY_CUMULATIVE_FOCUS: &str = "cumulativeFocus";
const KEY_CUMULATIVE_PROCRASTINATION: &str = "cumulativeProcrastination";
const KEY_STREAK: &str = "streak";
const KEY_LAST_ACTIVE_DATE: &str = "lastActiveDate";
const KEY_WEEKLY_STATS: &str = "weeklyStats";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sole owner of the persisted statistics. State is read once at load and
/// written through to the key-value layer on every mutation; each mutation
/// persists as a single transaction.
#[derive(Clone)]
pub struct StatsStore {
    state: Arc<Mutex<StatsState>>,
    db: Database,
}

impl StatsStore {
    /// Reads every persisted key once. Missing or unparseable values fall
    /// back to their defaults rather than failing the load.
    pub async fn load(db: Database) -> Result<Self> {
        let weekly: Vec<DailyAggregate> = match db.get_value(KEY_WEEKLY_STATS).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(days) => days,
                Err(err) => {
                    warn!("ignoring corrupt {KEY_WEEKLY_STATS}: {err}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let state = StatsState {
            cumulative_focus: read_parsed::<u64>(&db, KEY_CUMULATIVE_FOCUS)
                .await?
                .unwrap_or(0),
            cumulative_procrastination: read_parsed::<u64>(&db, KEY_CUMULATIVE_PROCRASTINATION)
                .await?
                .unwrap_or(0),
            streak: read_parsed::<u32>(&db, KEY_STREAK).await?.unwrap_or(0),
            last_active_date: read_parsed::<NaiveDate>(&db, KEY_LAST_ACTIVE_DATE).await?,
            weekly,
        };

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            db,
        })
    }

    pub async fn check_and_update_streak(&self, today: NaiveDate) -> Result<u32> {
        let streak = { self.state.lock().await.check_and_update_streak(today) };
        self.db
            .set_values(vec![
                (KEY_STREAK.to_string(), streak.to_string()),
                (
                    KEY_LAST_ACTIVE_DATE.to_string(),
                    today.format(DATE_FORMAT).to_string(),
                ),
            ])
            .await
            .context("failed to persist streak update")?;
        Ok(streak)
    }

    /// Returns true when the streak was forfeited to the penalty rule.
    pub async fn penalize_streak(&self, procrastination_ratio: f64) -> Result<bool> {
        let lost = { self.state.lock().await.penalize_streak(procrastination_ratio) };
        if lost {
            self.db
                .set_values(vec![(KEY_STREAK.to_string(), "0".to_string())])
                .await
                .context("failed to persist streak penalty")?;
        }
        Ok(lost)
    }

    /// Folds a finished session into the daily history and cumulative
    /// totals, persisting all of it in one write.
    pub async fn record_session_end(
        &self,
        date: NaiveDate,
        focus_seconds: u64,
        procrastination_seconds: u64,
    ) -> Result<DailyAggregate> {
        let (updated, values) = {
            let mut state = self.state.lock().await;
            let updated = state.record_session_end(date, focus_seconds, procrastination_seconds);
            let weekly_json = serde_json::to_string(&state.weekly)
                .context("failed to serialize weekly stats")?;
            let values = vec![
                (KEY_WEEKLY_STATS.to_string(), weekly_json),
                (
                    KEY_CUMULATIVE_FOCUS.to_string(),
                    state.cumulative_focus.to_string(),
                ),
                (
                    KEY_CUMULATIVE_PROCRASTINATION.to_string(),
                    state.cumulative_procrastination.to_string(),
                ),
            ];
            (updated, values)
        };
        self.db
            .set_values(values)
            .await
            .context("failed to persist session totals")?;
        Ok(updated)
    }

    pub async fn streak(&self) -> u32 {
        self.state.lock().await.streak
    }

    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.state.lock().await.leaderboard()
    }

    pub async fn overview(&self) -> StatsOverview {
        self.state.lock().await.overview()
    }
}

async fn read_parsed<T: FromStr>(db: &Database, key: &str) -> Result<Option<T>> {
    let Some(raw) = db.get_value(key).await? else {
        return Ok(None);
    };
    match raw.parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            warn!("ignoring corrupt persisted value for {key}: {raw:?}");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_db(dir: &TempDir) -> Database {
        Database::new(dir.path().join("stats.sqlite3")).unwrap()
    }

    fn date(text: &str) -> NaiveDate {
        text.parse().unwrap()
    }

    #[tokio::test]
    async fn load_defaults_on_an_empty_database() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatsStore::load(open_db(&dir)).await.unwrap();
        assert_eq!(store.streak().await, 0);
        let overview = store.overview().await;
        assert_eq!(overview.cumulative_focus, 0);
        assert_eq!(overview.cumulative_procrastination, 0);
        assert!(store.leaderboard().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_values_load_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);
        db.set_values(vec![
            ("cumulativeFocus".to_string(), "-3".to_string()),
            ("streak".to_string(), "lots".to_string()),
            ("lastActiveDate".to_string(), "yesterday-ish".to_string()),
            ("weeklyStats".to_string(), "{not json".to_string()),
        ])
        .await
        .unwrap();

        let store = StatsStore::load(db).await.unwrap();
        assert_eq!(store.streak().await, 0);
        assert_eq!(store.overview().await.cumulative_focus, 0);
        assert!(store.leaderboard().await.is_empty());
    }

    #[tokio::test]
    async fn mutations_write_through_and_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let store = StatsStore::load(db.clone()).await.unwrap();
        store
            .check_and_update_streak(date("2024-05-01"))
            .await
            .unwrap();
        store
            .record_session_end(date("2024-05-01"), 300, 100)
            .await
            .unwrap();
        store
            .check_and_update_streak(date("2024-05-02"))
            .await
            .unwrap();
        store
            .record_session_end(date("2024-05-02"), 50, 0)
            .await
            .unwrap();
        drop(store);

        assert_eq!(
            db.get_value("lastActiveDate").await.unwrap().as_deref(),
            Some("2024-05-02")
        );

        let reloaded = StatsStore::load(db).await.unwrap();
        assert_eq!(reloaded.streak().await, 2);
        let overview = reloaded.overview().await;
        assert_eq!(overview.cumulative_focus, 350);
        assert_eq!(overview.cumulative_procrastination, 100);
        let board = reloaded.leaderboard().await;
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].score, 100);
        assert_eq!(board[1].score, 75);
    }

    #[tokio::test]
    async fn penalty_persists_the_forfeited_streak() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let store = StatsStore::load(db.clone()).await.unwrap();
        store
            .check_and_update_streak(date("2024-05-01"))
            .await
            .unwrap();
        assert!(store.penalize_streak(0.7).await.unwrap());
        drop(store);

        assert_eq!(db.get_value("streak").await.unwrap().as_deref(), Some("0"));
        let reloaded = StatsStore::load(db).await.unwrap();
        assert_eq!(reloaded.streak().await, 0);
    }
}
