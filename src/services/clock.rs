use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Millisecond clock shared by every request in the process.
///
/// Stored timestamps have millisecond resolution, so two writes inside the same
/// millisecond would otherwise get equal `updated` values. Each call returns a
/// value strictly greater than the previous one, running ahead of the wall
/// clock by a millisecond when it has to.
#[derive(Debug, Default)]
pub struct MillisClock {
    last: AtomicI64,
}

impl MillisClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_millis();
        let (Ok(prev) | Err(prev)) =
            self.last
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                    Some(wall.max(last.saturating_add(1)))
                });
        let millis = wall.max(prev.saturating_add(1));
        DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::MillisClock;

    #[test]
    fn readings_strictly_increase() {
        let clock = MillisClock::new();
        let mut prev = clock.now();
        for _ in 0..1_000 {
            let next = clock.now();
            assert!(next > prev, "{next} should be after {prev}");
            prev = next;
        }
    }

    #[test]
    fn readings_have_millisecond_resolution() {
        let now = MillisClock::new().now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[tokio::test]
    async fn concurrent_readers_never_share_a_millisecond() {
        let clock = Arc::new(MillisClock::new());
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let clock = Arc::clone(&clock);
                tokio::spawn(async move { (0..100).map(|_| clock.now()).collect::<Vec<_>>() })
            })
            .collect();

        let mut all = Vec::new();
        for task in tasks {
            all.extend(task.await.expect("task should finish"));
        }
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
