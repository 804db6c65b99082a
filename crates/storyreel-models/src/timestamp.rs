//! Narration track time formatting.

/// Format seconds as `MM:SS.mmm` for logs and warnings.
///
/// Narration tracks are minutes long, so hours fold into the minute field.
/// Negative input is clamped to zero.
///
/// # Examples
/// ```
/// use storyreel_models::timestamp::format_track_time;
/// assert_eq!(format_track_time(8.0), "00:08.000");
/// assert_eq!(format_track_time(75.25), "01:15.250");
/// ```
pub fn format_track_time(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let mins = total_ms / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;
    format!("{:02}:{:02}.{:03}", mins, secs, ms)
}
