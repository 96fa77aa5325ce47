pub mod controller;
pub mod state;

pub use controller::{SessionTracker, TrackerSnapshot};
pub use state::{Phase, Session, FOCUS_GOAL_SECONDS, MILESTONES};
