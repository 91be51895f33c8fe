use chrono::{DateTime, Utc};

/// Anything carrying a UTC timestamp that can be located in a time series.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl<T: Timestamped> Timestamped for &T {
    fn timestamp(&self) -> DateTime<Utc> {
        (*self).timestamp()
    }
}

/// Find the entries that bracket `target` in time.
///
/// Returns the entry with the largest timestamp <= `target` and the entry
/// with the smallest timestamp > `target`; either side is `None` when no
/// such entry exists. Input order never affects the result. An entry
/// exactly at `target` is returned on the preceding side. Among entries
/// sharing a timestamp, the last occurrence wins on the preceding side and
/// the first on the following side.
pub fn bracket<T: Timestamped>(series: &[T], target: DateTime<Utc>) -> (Option<&T>, Option<&T>) {
    let mut prev: Option<&T> = None;
    let mut next: Option<&T> = None;

    for entry in series {
        let ts = entry.timestamp();
        if ts <= target {
            if prev.map_or(true, |p| ts >= p.timestamp()) {
                prev = Some(entry);
            }
        } else if next.map_or(true, |n| ts < n.timestamp()) {
            next = Some(entry);
        }
    }

    (prev, next)
}
