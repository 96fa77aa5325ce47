//! Satirical flavor text shown when the user pauses a session.
//!
//! Selection contract: odd pause counts draw from the roast catalog, even
//! counts from the excuse catalog, uniformly at random within the catalog.

use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_SESSION_LABEL: &str = "Unnamed Session";

pub const STREAK_LOST_FOLLOWUP: &str = "Reset and try again tomorrow!";

pub const ROASTS: &[&str] = &[
    "Oh wow, another break? Groundbreaking.",
    "Your future self is facepalming right now.",
    "TikTok called, they said thanks!",
    "Netflix isn't going to watch itself, right?",
    "Another notification? It can wait. Oh wait, you clicked it.",
    "Professional procrastinator applying for a raise?",
    "Your to-do list is weeping quietly in the corner.",
    "Instagram stories > your dreams, apparently.",
    "That 'quick' YouTube video was 45 minutes ago.",
    "Scrolling through memes counts as research, right?",
    "Your deadline sends its regards.",
    "Breaking news: Local person discovers new way to avoid work.",
    "Your productivity called. It left a voicemail you'll ignore.",
    "This break sponsored by 'I'll Start Tomorrow Inc.'",
    "Champion of the 'Just 5 More Minutes' Olympics.",
    "Your focus lasted longer than most celebrity marriages.",
    "Refresh that feed one more time, I'm sure it'll help.",
    "Coffee break #7 hits different, doesn't it?",
    "Your brain: 'Let's work!' Your body: 'But... couch.'",
    "Adding 'professional time waster' to your LinkedIn?",
];

pub const EXCUSES: &[&str] = &[
    "I had to water my imaginary plants :(",
    "My goldfish needed emotional support 🐟.",
    "My chair wasn't sitting right, had to adjust.",
    "I heard a noise. Had to investigate for 20 minutes.",
    "My pen ran out of ink. All of them. Simultaneously.",
    "The wifi signal looked weak. Had to stand closer.",
    "I was manifesting productivity. It didn't manifest.",
    "My cat gave me that look. You know the one.",
    "I had to reorganize my desk. For the third time today.",
    "The temperature was 0.5 degrees off. Unworkable conditions.",
];

/// Picks the pause message for the given pause count: even counts get an
/// excuse, odd counts get a roast.
pub fn pick_pause_message<R: Rng + ?Sized>(pause_count: u64, rng: &mut R) -> &'static str {
    let catalog = if pause_count % 2 == 0 { EXCUSES } else { ROASTS };
    catalog.choose(rng).copied().unwrap_or_default()
}
