//! Conversion of cue timestamps into deep-link offsets.

use tracing::trace;

/// Seconds subtracted from a cue start so playback begins just before the line.
pub const DEFAULT_LEAD_IN_SECS: u64 = 2;

/// Convert `HH:MM:SS.mmm` into whole seconds minus `lead_in`, clamped at zero.
/// Milliseconds are ignored. Malformed input yields `0` so a single bad cue
/// never costs the rest of the file.
pub fn offset_seconds(timestamp: &str, lead_in: u64) -> u64 {
    match whole_seconds(timestamp) {
        Some(secs) => secs.saturating_sub(lead_in),
        None => {
            trace!("offset_seconds(timestamp={timestamp:?}): malformed, using 0");
            0
        }
    }
}

/// Parse the `HH:MM:SS` part of a timestamp into seconds.
fn whole_seconds(timestamp: &str) -> Option<u64> {
    let (clock, _millis) = split_exact_two(timestamp, '.')?;
    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let h: u64 = parts[0].trim().parse().ok()?;
    let m: u64 = parts[1].trim().parse().ok()?;
    let s: u64 = parts[2].trim().parse().ok()?;
    h.checked_mul(3600)?
        .checked_add(m.checked_mul(60)?)?
        .checked_add(s)
}

/// Split on `sep` only when it occurs exactly once.
fn split_exact_two(input: &str, sep: char) -> Option<(&str, &str)> {
    let (head, tail) = input.split_once(sep)?;
    if tail.contains(sep) {
        return None;
    }
    Some((head, tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtracts_lead_in() {
        assert_eq!(offset_seconds("00:01:05.000", DEFAULT_LEAD_IN_SECS), 63);
        assert_eq!(offset_seconds("01:00:00.999", DEFAULT_LEAD_IN_SECS), 3598);
    }

    /// Early cues clamp at zero instead of going negative.
    #[test]
    fn clamps_early_cues() {
        assert_eq!(offset_seconds("00:00:01.000", DEFAULT_LEAD_IN_SECS), 0);
        assert_eq!(offset_seconds("00:00:02.500", DEFAULT_LEAD_IN_SECS), 0);
    }

    #[test]
    fn malformed_is_zero() {
        assert_eq!(offset_seconds("00:01:05", DEFAULT_LEAD_IN_SECS), 0);
        assert_eq!(offset_seconds("01:05.000", DEFAULT_LEAD_IN_SECS), 0);
        assert_eq!(offset_seconds("aa:01:05.000", DEFAULT_LEAD_IN_SECS), 0);
        assert_eq!(offset_seconds("00:01:05.000.1", DEFAULT_LEAD_IN_SECS), 0);
        assert_eq!(offset_seconds("", DEFAULT_LEAD_IN_SECS), 0);
    }

    /// Fields too large for the seconds total fall back to zero.
    #[test]
    fn overflowing_fields_are_zero() {
        assert_eq!(offset_seconds("9999999999999999:00:00.000", DEFAULT_LEAD_IN_SECS), 0);
        assert_eq!(offset_seconds("00:9999999999999999999:00.000", DEFAULT_LEAD_IN_SECS), 0);
        assert_eq!(offset_seconds(&format!("00:00:{}.000", u64::MAX), 0), u64::MAX);
    }

    #[test]
    fn honours_custom_lead_in() {
        assert_eq!(offset_seconds("00:01:05.000", 0), 65);
        assert_eq!(offset_seconds("00:01:05.000", 10), 55);
    }
}
