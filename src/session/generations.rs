//! Last-writer-wins bookkeeping for report queries and input debouncing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::FilterTab;

/// Delay before a free-text filter change issues a query
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Handle of one issued query; its response is applied only while it is current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub tab: FilterTab,
    pub generation: u64,
}

/// Per-tab generation counters
#[derive(Debug, Clone, Default)]
pub struct QueryGenerations {
    counters: Arc<[AtomicU64; 5]>,
}

fn slot(tab: FilterTab) -> usize {
    match tab {
        FilterTab::Purchase => 0,
        FilterTab::StoreIssue => 1,
        FilterTab::ServiceReturn => 2,
        FilterTab::Disposal => 3,
        FilterTab::DeadStock => 4,
    }
}

impl QueryGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a query for `tab`, superseding any query still in flight
    pub fn begin(&self, tab: FilterTab) -> Ticket {
        let generation = self.counters[slot(tab)].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { tab, generation }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.counters[slot(ticket.tab)].load(Ordering::SeqCst) == ticket.generation
    }

    /// Supersede every in-flight query
    pub fn invalidate_all(&self) {
        for counter in self.counters.iter() {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Trailing-edge debouncer: only the last call within the delay proceeds
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait out the delay; returns false if another call arrived meanwhile
    pub async fn settle(&self) -> bool {
        let mine = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        self.latest.load(Ordering::SeqCst) == mine
    }

    /// Drop any pending call
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_query_supersedes_older() {
        let generations = QueryGenerations::new();
        let first = generations.begin(FilterTab::Purchase);
        let second = generations.begin(FilterTab::Purchase);
        let other_tab = generations.begin(FilterTab::DeadStock);

        assert!(!generations.is_current(&first));
        assert!(generations.is_current(&second));
        assert!(generations.is_current(&other_tab));

        generations.invalidate_all();
        assert!(!generations.is_current(&second));
        assert!(!generations.is_current(&other_tab));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_keeps_last_call() {
        let debouncer = Debouncer::default();
        let early = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.settle().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let late = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.settle().await })
        };

        assert!(!early.await.unwrap());
        assert!(late.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let pending = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.settle().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        debouncer.cancel();
        assert!(!pending.await.unwrap());
    }
}
