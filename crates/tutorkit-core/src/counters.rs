//! Process-wide session counters.
//!
//! Shared across sessions via `Arc`; used only for reporting, never for
//! control flow.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters consumed by the report collaborator.
#[derive(Debug, Default)]
pub struct SessionCounters {
    assessment_passes: AtomicU64,
    assistant_turns: AtomicU64,
}

impl SessionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called exactly once per successful assessment pass.
    pub fn record_pass(&self) {
        self.assessment_passes.fetch_add(1, Ordering::Relaxed);
    }

    /// Called once per completed assistant turn across all threads.
    pub fn record_assistant_turn(&self) {
        self.assistant_turns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn assessment_passes(&self) -> u64 {
        self.assessment_passes.load(Ordering::Relaxed)
    }

    pub fn assistant_turns(&self) -> u64 {
        self.assistant_turns.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn counters_start_at_zero() {
        let counters = SessionCounters::new();
        assert_eq!(counters.assessment_passes(), 0);
        assert_eq!(counters.assistant_turns(), 0);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let counters = Arc::new(SessionCounters::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counters = Arc::clone(&counters);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        counters.record_pass();
                        counters.record_assistant_turn();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(counters.assessment_passes(), 800);
        assert_eq!(counters.assistant_turns(), 800);
    }
}
