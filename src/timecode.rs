//! Timestamp parsing and display helpers shared by the normalizer and the
//! export layer.

/// Speaking rate assumed when a transcript carries no timing at all.
pub const WORDS_PER_SECOND: f64 = 2.5;

/// Chunk size for word-rate estimation: 20 words at 2.5 w/s = 8 seconds.
pub const WORDS_PER_CHUNK: usize = 20;

/// Parse an SRT timestamp (`HH:MM:SS,mmm` or `HH:MM:SS.mmm`) to milliseconds.
///
/// Anything that does not split into exactly three colon-separated parts
/// returns 0. Subtitle files in the wild are messy enough that a bad
/// timestamp degrades to the start of the clip rather than aborting the
/// whole import.
pub fn srt_time_to_ms(time_str: &str) -> u64 {
    let normalized = time_str.trim().replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.len() != 3 {
        return 0;
    }

    let hours = parts[0].trim().parse::<u64>().unwrap_or(0);
    let minutes = parts[1].trim().parse::<u64>().unwrap_or(0);
    let seconds = parts[2].trim().parse::<f64>().unwrap_or(0.0);

    (((hours * 3600 + minutes * 60) as f64 + seconds) * 1000.0).round() as u64
}

/// Format milliseconds as `MM:SS` for timeline display.
///
/// Minutes are not wrapped at 60: a 61-minute mark renders as `61:01`, which
/// is what editors expect from a running clip counter.
pub fn ms_to_display(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Time window covered by `word_count` words starting at `word_offset`,
/// assuming the fixed speaking rate.
pub fn word_window_ms(word_offset: usize, word_count: usize) -> (u64, u64) {
    let start = (word_offset as f64 / WORDS_PER_SECOND) * 1000.0;
    let end = ((word_offset + word_count) as f64 / WORDS_PER_SECOND) * 1000.0;
    (start.round() as u64, end.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_and_dot_separators() {
        assert_eq!(srt_time_to_ms("00:01:05,000"), 65_000);
        assert_eq!(srt_time_to_ms("00:01:05.500"), 65_500);
        assert_eq!(srt_time_to_ms("01:02:03,250"), 3_723_250);
    }

    #[test]
    fn malformed_timestamps_fall_back_to_zero() {
        assert_eq!(srt_time_to_ms("01:05"), 0);
        assert_eq!(srt_time_to_ms("garbage"), 0);
        assert_eq!(srt_time_to_ms(""), 0);
        // Bad numeric fields degrade per-field instead of failing the parse.
        assert_eq!(srt_time_to_ms("xx:01:05,000"), 65_000);
    }

    #[test]
    fn display_round_trip() {
        assert_eq!(ms_to_display(srt_time_to_ms("00:01:05,000")), "01:05");
    }

    #[test]
    fn display_does_not_wrap_minutes() {
        assert_eq!(ms_to_display(3_661_000), "61:01");
        assert_eq!(ms_to_display(0), "00:00");
        assert_eq!(ms_to_display(59_999), "00:59");
    }

    #[test]
    fn word_windows_span_eight_seconds() {
        assert_eq!(word_window_ms(0, 20), (0, 8_000));
        assert_eq!(word_window_ms(20, 20), (8_000, 16_000));
        // A short final chunk covers only its own words.
        assert_eq!(word_window_ms(40, 10), (16_000, 20_000));
    }
}
