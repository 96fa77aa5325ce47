use std::time::Duration;

use focusfox::display::{ChannelSink, DisplayEvent, DisplaySink};
use focusfox::{Database, SessionTracker, StatsStore};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

async fn tracker_fixture(
    dir: &TempDir,
) -> (SessionTracker, StatsStore, UnboundedReceiver<DisplayEvent>) {
    let db = Database::new(dir.path().join("stats.sqlite3")).unwrap();
    let stats = StatsStore::load(db).await.unwrap();
    let (sink, events) = ChannelSink::new();
    let sinks: Vec<Box<dyn DisplaySink>> = vec![Box::new(sink)];
    // A long interval keeps the built-in tick source quiet so the test can
    // drive simulated ticks itself.
    let tracker =
        SessionTracker::with_tick_interval(stats.clone(), sinks, Duration::from_secs(3600));
    (tracker, stats, events)
}

fn drain(events: &mut UnboundedReceiver<DisplayEvent>) -> Vec<DisplayEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

#[tokio::test]
async fn a_full_session_folds_into_stats_and_resets() {
    let dir = tempfile::tempdir().unwrap();
    let (tracker, stats, mut events) = tracker_fixture(&dir).await;

    tracker.start(Some("thesis".into())).await.unwrap();
    for _ in 0..30 {
        assert!(tracker.on_tick(1).await);
    }
    tracker.pause().await;
    for _ in 0..20 {
        assert!(tracker.on_tick(1).await);
    }
    tracker.stop().await.unwrap();

    // Totals, streak, and the daily aggregate all reflect the session.
    assert_eq!(stats.streak().await, 1);
    let overview = stats.overview().await;
    assert_eq!(overview.cumulative_focus, 30);
    assert_eq!(overview.cumulative_procrastination, 20);

    let board = stats.leaderboard().await;
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].score, 60);
    assert_eq!(board[0].focus, "00:30");
    assert_eq!(board[0].procrastination, "00:20");

    // Session counters are back to zero once the totals are recorded.
    let snapshot = tracker.snapshot().await;
    assert!(!snapshot.session.is_active());
    assert_eq!(snapshot.session.focus_seconds, 0);
    assert_eq!(snapshot.session.procrastination_seconds, 0);
    assert_eq!(snapshot.session.pause_count, 0);

    // Event stream: one start, fifty ticks, one pause message, one summary.
    let mut started = 0;
    let mut ticks = 0;
    let mut messages = 0;
    let mut summary = None;
    for event in drain(&mut events) {
        match event {
            DisplayEvent::SessionStarted(e) => {
                started += 1;
                assert_eq!(e.label, "thesis");
            }
            DisplayEvent::Tick(_) => ticks += 1,
            DisplayEvent::MessageShown(_) => messages += 1,
            DisplayEvent::SessionEnded(s) => summary = Some(s),
            _ => {}
        }
    }
    assert_eq!(started, 1);
    assert_eq!(ticks, 50);
    assert_eq!(messages, 1);

    let summary = summary.expect("session ended event");
    assert_eq!(summary.focus_seconds, 30);
    assert_eq!(summary.procrastination_seconds, 20);
    assert_eq!(summary.score, 60);
    assert_eq!(summary.streak, 1);
}

#[tokio::test]
async fn a_lopsided_session_forfeits_the_streak() {
    let dir = tempfile::tempdir().unwrap();
    let (tracker, stats, mut events) = tracker_fixture(&dir).await;

    tracker.start(None).await.unwrap();
    for _ in 0..10 {
        tracker.on_tick(1).await;
    }
    tracker.pause().await;
    for _ in 0..20 {
        tracker.on_tick(1).await;
    }
    // Two thirds procrastination is past the 60% penalty line.
    tracker.stop().await.unwrap();

    assert_eq!(stats.streak().await, 0);
    let streak_lost = drain(&mut events)
        .iter()
        .any(|event| matches!(event, DisplayEvent::StreakLost));
    assert!(streak_lost);
}

#[tokio::test]
async fn an_even_session_keeps_the_streak() {
    let dir = tempfile::tempdir().unwrap();
    let (tracker, stats, mut events) = tracker_fixture(&dir).await;

    tracker.start(None).await.unwrap();
    for _ in 0..25 {
        tracker.on_tick(1).await;
    }
    tracker.pause().await;
    for _ in 0..25 {
        tracker.on_tick(1).await;
    }
    tracker.stop().await.unwrap();

    assert_eq!(stats.streak().await, 1);
    let streak_lost = drain(&mut events)
        .iter()
        .any(|event| matches!(event, DisplayEvent::StreakLost));
    assert!(!streak_lost);
}

#[tokio::test]
async fn pause_and_stop_are_no_ops_without_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let (tracker, stats, mut events) = tracker_fixture(&dir).await;

    tracker.pause().await;
    tracker.stop().await.unwrap();

    assert!(drain(&mut events).is_empty());
    assert_eq!(stats.streak().await, 0);
    assert_eq!(stats.overview().await.cumulative_focus, 0);
}

#[tokio::test]
async fn repeated_pauses_alternate_message_catalogs() {
    let dir = tempfile::tempdir().unwrap();
    let (tracker, _stats, mut events) = tracker_fixture(&dir).await;

    tracker.start(None).await.unwrap();
    tracker.on_tick(5).await;
    for _ in 0..4 {
        tracker.pause().await;
    }

    let shown: Vec<String> = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            DisplayEvent::MessageShown(m) => Some(m.text),
            _ => None,
        })
        .collect();
    assert_eq!(shown.len(), 4);
    // Pauses 1 and 3 roast, pauses 2 and 4 excuse.
    assert!(focusfox::messages::ROASTS.contains(&shown[0].as_str()));
    assert!(focusfox::messages::EXCUSES.contains(&shown[1].as_str()));
    assert!(focusfox::messages::ROASTS.contains(&shown[2].as_str()));
    assert!(focusfox::messages::EXCUSES.contains(&shown[3].as_str()));

    tracker.dispose().await;
}
