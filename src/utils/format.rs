/// Formats a second count as `MM:SS`. Minutes grow past two digits for
/// sessions longer than 99 minutes.
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}
