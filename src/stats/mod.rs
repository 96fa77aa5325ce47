mod state;
mod store;

pub use state::{
    procrastination_ratio, productivity_score, DailyAggregate, LeaderboardEntry, StatsOverview,
    StatsState, HISTORY_LIMIT, LEADERBOARD_DAYS, PENALTY_RATIO,
};
pub use store::StatsStore;
