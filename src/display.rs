//! Display events and the sinks that consume them.
//!
//! The tracker never renders anything itself; it hands `DisplayEvent`s to
//! whatever sinks were attached at construction. `ConsoleSink` renders
//! directly, `ChannelSink` forwards events over a channel for a companion
//! surface running elsewhere.

use std::io::{self, Write};

use serde::Serialize;
use tokio::sync::mpsc;

use crate::utils::format::format_clock;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartedEvent {
    pub session_id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickEvent {
    pub focus_seconds: u64,
    pub procrastination_seconds: u64,
    pub stopwatch_seconds: u64,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneEvent {
    pub threshold_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub focus_seconds: u64,
    pub procrastination_seconds: u64,
    pub score: u32,
    pub streak: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum DisplayEvent {
    SessionStarted(SessionStartedEvent),
    Tick(TickEvent),
    MilestoneReached(MilestoneEvent),
    MessageShown(MessageEvent),
    StreakLost,
    SessionEnded(SessionSummary),
}

/// Read-only consumer of display events; implementations never mutate
/// tracker state.
pub trait DisplaySink: Send + Sync {
    fn deliver(&self, event: &DisplayEvent);
}

/// Renders events straight to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySink for ConsoleSink {
    fn deliver(&self, event: &DisplayEvent) {
        match event {
            DisplayEvent::SessionStarted(started) => {
                println!("🔒 Focus session started: {}", started.label);
            }
            DisplayEvent::Tick(tick) => {
                // Inline stopwatch line, redrawn every tick.
                print!(
                    "\r⏱  {}  focus {}  slack {} ",
                    format_clock(tick.stopwatch_seconds),
                    format_clock(tick.focus_seconds),
                    format_clock(tick.procrastination_seconds),
                );
                let _ = io::stdout().flush();
            }
            DisplayEvent::MilestoneReached(milestone) => {
                println!(
                    "\n🎉 Milestone reached! {} of focus",
                    format_clock(milestone.threshold_seconds)
                );
            }
            DisplayEvent::MessageShown(message) => {
                println!("\n{}", message.text);
            }
            DisplayEvent::StreakLost => {
                println!("\n💔 Streak lost! Too much procrastination detected.");
            }
            DisplayEvent::SessionEnded(summary) => {
                println!(
                    "\nSession ended. Focus: {}, Procrastination: {}. Score: {}/100",
                    format_clock(summary.focus_seconds),
                    format_clock(summary.procrastination_seconds),
                    summary.score,
                );
            }
        }
    }
}

/// Forwards events over an unbounded channel; the receiving half belongs to
/// a secondary surface (overlay window, test harness).
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<DisplayEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DisplayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DisplaySink for ChannelSink {
    fn deliver(&self, event: &DisplayEvent) {
        // A closed receiver just means the surface went away.
        let _ = self.tx.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_forwards_events() {
        let (sink, mut rx) = ChannelSink::new();
        sink.deliver(&DisplayEvent::StreakLost);
        assert!(matches!(rx.try_recv(), Ok(DisplayEvent::StreakLost)));
    }

    #[test]
    fn channel_sink_ignores_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.deliver(&DisplayEvent::StreakLost);
    }

    #[test]
    fn events_serialize_with_camel_case_tags() {
        let event = DisplayEvent::MilestoneReached(MilestoneEvent {
            threshold_seconds: 1800,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"milestoneReached\""));
        assert!(json.contains("\"thresholdSeconds\":1800"));
    }
}
