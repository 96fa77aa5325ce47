pub mod db;
pub mod display;
pub mod messages;
pub mod stats;
pub mod tracker;
pub mod utils;

pub use db::Database;
pub use display::{ChannelSink, ConsoleSink, DisplayEvent, DisplaySink, SessionSummary};
pub use stats::{productivity_score, DailyAggregate, LeaderboardEntry, StatsStore};
pub use tracker::{Phase, Session, SessionTracker, TrackerSnapshot};
