use crate::rows::TimestampRow;

/// The earliest and latest timestamp of a recording.
///
/// Returns `None` for an empty table.
pub fn time_range(timestamps: &[TimestampRow]) -> Option<(f64, f64)> {
    timestamps.iter().fold(None, |acc, row| {
        let t = row.timestamp;
        Some(match acc {
            None => (t, t),
            Some((min, max)) => (f64::min(min, t), f64::max(max, t)),
        })
    })
}

/// The first and last frame captured inside a time window.
///
/// Both ends of the window are inclusive. Returns `None` when no frame falls
/// inside the window.
///
/// # Arguments
///
/// * `timestamps` - The capture time of every frame.
/// * `start` - The start of the window in milliseconds.
/// * `stop` - The end of the window in milliseconds.
///
/// # Example
///
/// ```
/// use trajvis_trajectory::time::frame_range;
/// use trajvis_trajectory::TimestampRow;
///
/// let timestamps: Vec<TimestampRow> = (0..10)
///     .map(|frame| TimestampRow { frame, timestamp: frame as f64 * 100.0 })
///     .collect();
///
/// assert_eq!(frame_range(&timestamps, 150.0, 400.0), Some((2, 4)));
/// assert_eq!(frame_range(&timestamps, 2000.0, 3000.0), None);
/// ```
pub fn frame_range(timestamps: &[TimestampRow], start: f64, stop: f64) -> Option<(i64, i64)> {
    timestamps
        .iter()
        .filter(|row| start <= row.timestamp && row.timestamp <= stop)
        .fold(None, |acc, row| {
            Some(match acc {
                None => (row.frame, row.frame),
                Some((min, max)) => (min.min(row.frame), max.max(row.frame)),
            })
        })
}

/// Format milliseconds as `HH:MM:SS`.
///
/// Each field keeps its last two digits. Negative times format as `00:00:00`.
pub fn format_time(ms: f64) -> String {
    let ms = ms.max(0.0);
    let hour = (ms / 3_600_000.0).floor();
    let min = (ms / 60_000.0).floor() - hour * 60.0;
    let sec = (ms / 1000.0).floor() - (ms / 60_000.0).floor() * 60.0;

    let two = |v: f64| (v as u64) % 100;
    format!("{:02}:{:02}:{:02}", two(hour), two(min), two(sec))
}
