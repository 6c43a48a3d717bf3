//! Shared cooldown state.
//!
//! Maps provider name to the instant its cooldown ends. Entries are pruned
//! lazily by [`CooldownTracker::is_in_cooldown`]; there is no sweeper task.
//! Each operation takes the lock for a single map access only, so callers
//! never hold it across a network request.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Cooldown applied when no explicit duration is given.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Stand-in expiry for durations too large to add to an instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + duration`, saturating at [`FAR_FUTURE`].
pub(crate) fn instant_after(duration: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(duration.min(FAR_FUTURE)).unwrap_or(now)
}

/// Remaining cooldown for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownStatus {
    pub name: String,
    pub remaining: Duration,
}

/// Concurrency-safe provider name → cooldown expiry store.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    expiries: Mutex<HashMap<String, Instant>>,
    failures: Mutex<HashMap<String, u32>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is cooling down. Drops the entry once it has expired.
    pub fn is_in_cooldown(&self, name: &str) -> bool {
        let mut expiries = self.expiries.lock();
        let expired = match expiries.get(name) {
            Some(expiry) => Instant::now() > *expiry,
            None => return false,
        };
        if expired {
            expiries.remove(name);
        }
        !expired
    }

    /// Time left on `name`'s cooldown, without pruning.
    pub fn remaining(&self, name: &str) -> Option<Duration> {
        let expiries = self.expiries.lock();
        let expiry = expiries.get(name)?;
        let now = Instant::now();
        (now <= *expiry).then(|| expiry.saturating_duration_since(now))
    }

    /// Put `name` into cooldown for `duration`, measured from now.
    ///
    /// Replaces any existing entry; the most recent report wins.
    pub fn mark_rate_limited(&self, name: &str, duration: Duration) {
        let expiry = instant_after(duration);
        self.expiries.lock().insert(name.to_string(), expiry);
    }

    /// Cool `name` down for at least `duration`; never shortens a longer
    /// cooldown already in place.
    pub fn mark_at_least(&self, name: &str, duration: Duration) {
        let expiry = instant_after(duration);
        self.expiries
            .lock()
            .entry(name.to_string())
            .and_modify(|current| *current = (*current).max(expiry))
            .or_insert(expiry);
    }

    /// [`mark_rate_limited`](Self::mark_rate_limited) with [`DEFAULT_COOLDOWN`].
    pub fn mark_rate_limited_default(&self, name: &str) {
        self.mark_rate_limited(name, DEFAULT_COOLDOWN);
    }

    /// Unexpired cooldowns, sorted by name. Read-only: expired entries are
    /// skipped but left for the next `is_in_cooldown` to prune.
    pub fn snapshot(&self) -> Vec<CooldownStatus> {
        let now = Instant::now();
        let mut statuses: Vec<CooldownStatus> = self
            .expiries
            .lock()
            .iter()
            .filter(|(_, expiry)| now <= **expiry)
            .map(|(name, expiry)| CooldownStatus {
                name: name.clone(),
                remaining: expiry.saturating_duration_since(now),
            })
            .collect();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        statuses
    }

    /// Count a transient failure; returns the consecutive count so far.
    pub fn record_transient_failure(&self, name: &str) -> u32 {
        let mut failures = self.failures.lock();
        let count = failures.entry(name.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Reset the consecutive failure count after a success.
    pub fn clear_failures(&self, name: &str) {
        self.failures.lock().remove(name);
    }

    /// Drop every cooldown and failure count.
    pub fn clear(&self) {
        self.expiries.lock().clear();
        self.failures.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_unknown_provider_not_cooling() {
        let tracker = CooldownTracker::new();
        assert!(!tracker.is_in_cooldown("groq"));
        assert!(tracker.remaining("groq").is_none());
        assert!(tracker.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_until_expiry() {
        let tracker = CooldownTracker::new();
        tracker.mark_rate_limited_default("groq");
        assert!(tracker.is_in_cooldown("groq"));

        advance(Duration::from_secs(59)).await;
        assert!(tracker.is_in_cooldown("groq"));
        assert_eq!(tracker.remaining("groq"), Some(Duration::from_secs(1)));

        advance(Duration::from_secs(2)).await;
        assert!(!tracker.is_in_cooldown("groq"));
        // pruned on read
        assert!(tracker.expiries.lock().get("groq").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_mark_extends_from_latest_report() {
        let tracker = CooldownTracker::new();
        tracker.mark_rate_limited("groq", Duration::from_secs(60));
        advance(Duration::from_secs(50)).await;
        tracker.mark_rate_limited("groq", Duration::from_secs(60));

        advance(Duration::from_secs(30)).await;
        assert!(tracker.is_in_cooldown("groq"));

        advance(Duration::from_secs(31)).await;
        assert!(!tracker.is_in_cooldown("groq"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_never_flips_early() {
        let tracker = CooldownTracker::new();
        tracker.mark_rate_limited("a", Duration::from_secs(10));
        for _ in 0..10 {
            assert!(tracker.is_in_cooldown("a"));
            advance(Duration::from_secs(1)).await;
        }
        // exactly at expiry still cooling; strictly after, released
        assert!(tracker.is_in_cooldown("a"));
        advance(Duration::from_millis(1)).await;
        assert!(!tracker.is_in_cooldown("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_sorted_and_read_only() {
        let tracker = CooldownTracker::new();
        tracker.mark_rate_limited("openai", Duration::from_secs(30));
        tracker.mark_rate_limited("gemini", Duration::from_secs(5));
        tracker.mark_rate_limited("groq", Duration::from_secs(1));

        advance(Duration::from_secs(2)).await;
        let snapshot = tracker.snapshot();
        assert_eq!(
            snapshot,
            vec![
                CooldownStatus {
                    name: "gemini".to_string(),
                    remaining: Duration::from_secs(3),
                },
                CooldownStatus {
                    name: "openai".to_string(),
                    remaining: Duration::from_secs(28),
                },
            ]
        );
        assert!(tracker.expiries.lock().contains_key("groq"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mark_at_least_never_shortens() {
        let tracker = CooldownTracker::new();
        tracker.mark_rate_limited("groq", Duration::from_secs(60));
        tracker.mark_at_least("groq", Duration::from_secs(15));
        assert_eq!(tracker.remaining("groq"), Some(Duration::from_secs(60)));

        tracker.mark_at_least("groq", Duration::from_secs(90));
        assert_eq!(tracker.remaining("groq"), Some(Duration::from_secs(90)));

        tracker.mark_at_least("gemini", Duration::from_secs(15));
        assert_eq!(tracker.remaining("gemini"), Some(Duration::from_secs(15)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_duration_saturates() {
        let tracker = CooldownTracker::new();
        tracker.mark_rate_limited("groq", Duration::from_secs(u64::MAX));
        tracker.mark_at_least("gemini", Duration::MAX);
        assert!(tracker.is_in_cooldown("groq"));
        assert!(tracker.is_in_cooldown("gemini"));
        assert_eq!(tracker.remaining("groq"), Some(FAR_FUTURE));

        advance(Duration::from_secs(86_400 * 365)).await;
        assert!(tracker.is_in_cooldown("groq"));
    }

    #[test]
    fn test_failure_counter() {
        let tracker = CooldownTracker::new();
        assert_eq!(tracker.record_transient_failure("a"), 1);
        assert_eq!(tracker.record_transient_failure("a"), 2);
        assert_eq!(tracker.record_transient_failure("b"), 1);
        tracker.clear_failures("a");
        assert_eq!(tracker.record_transient_failure("a"), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_marks_and_reads() {
        let tracker = Arc::new(CooldownTracker::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                let name = format!("p{}", i % 4);
                tracker.mark_rate_limited(&name, Duration::from_secs(60));
                assert!(tracker.is_in_cooldown(&name));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(tracker.snapshot().len(), 4);
    }
}
