/*
This code is part of the stormcatchments library.
Authors: Thomas Ott
Created: 02/03/2026
Last Modified: 14/10/2026
License: MIT
*/

use std::time::{Duration, Instant};

/// Returns a formatted string of elapsed time, e.g.
/// `1min 34.052s`
pub fn get_formatted_elapsed_time(instant: Instant) -> String {
    format_duration(instant.elapsed())
}

fn format_duration(dur: Duration) -> String {
    let minutes = dur.as_secs() / 60;
    let sub_sec = dur.as_secs() % 60;
    let sub_milli = dur.subsec_millis();
    if minutes > 0 {
        return format!("{}min {}.{:03}s", minutes, sub_sec, sub_milli);
    }
    format!("{}.{:03}s", sub_sec, sub_milli)
}

#[cfg(test)]
mod test {
    use super::format_duration;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(94_052)), "1min 34.052s");
        assert_eq!(format_duration(Duration::from_millis(2_500)), "2.500s");
    }
}
