use chrono::{DateTime, Duration, TimeZone, Utc};

/// Half-open time range `[start, stop)` used for store range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl TimeWindow {
    /// The window spanning `timestamps`, widened by `padding` on both sides.
    ///
    /// Returns `None` for an empty input.
    pub fn around<'a, Tz, I>(timestamps: I, padding: Duration) -> Option<Self>
    where
        Tz: TimeZone + 'a,
        I: IntoIterator<Item = &'a DateTime<Tz>>,
    {
        let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
        for ts in timestamps {
            let ts = ts.with_timezone(&Utc);
            bounds = Some(match bounds {
                None => (ts, ts),
                Some((min, max)) => (min.min(ts), max.max(ts)),
            });
        }
        bounds.map(|(min, max)| Self {
            start: min - padding,
            stop: max + padding,
        })
    }

    #[cfg(test)]
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts < self.stop
    }
}
