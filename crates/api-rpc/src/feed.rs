//! Bounded per-client buffer for display updates
//!
//! Store listeners never block and never grow memory without bound. When a
//! client falls behind, updates beyond the channel capacity are coalesced to
//! the latest entry per counter and delivered once the channel drains.

use crate::types::BoardEntry;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};

/// Updates buffered per client before coalescing starts
pub(crate) const FEED_CAPACITY: usize = 64;

type Overflow = Arc<Mutex<Vec<BoardEntry>>>;

pub(crate) fn channel(capacity: usize) -> (FeedSender, FeedReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let overflow: Overflow = Arc::default();
    (
        FeedSender {
            tx,
            overflow: Arc::clone(&overflow),
        },
        FeedReceiver {
            rx,
            overflow,
            ready: VecDeque::new(),
        },
    )
}

#[derive(Clone)]
pub(crate) struct FeedSender {
    tx: mpsc::Sender<BoardEntry>,
    overflow: Overflow,
}

impl FeedSender {
    pub(crate) fn push(&self, entry: BoardEntry) {
        let mut overflow = lock(&self.overflow);
        // Once spilling, keep spilling so a path never goes back in time
        if !overflow.is_empty() {
            upsert(&mut overflow, entry);
            return;
        }
        match self.tx.try_send(entry) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(entry)) => upsert(&mut overflow, entry),
        }
    }
}

pub(crate) struct FeedReceiver {
    rx: mpsc::Receiver<BoardEntry>,
    overflow: Overflow,
    ready: VecDeque<BoardEntry>,
}

impl FeedReceiver {
    /// Next update; `None` once every sender is gone and nothing is left.
    /// Cancel safe.
    pub(crate) async fn recv(&mut self) -> Option<BoardEntry> {
        loop {
            if let Some(entry) = self.ready.pop_front() {
                return Some(entry);
            }
            match self.rx.try_recv() {
                Ok(entry) => return Some(entry),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                    let spilled = std::mem::take(&mut *lock(&self.overflow));
                    if !spilled.is_empty() {
                        self.ready.extend(spilled);
                        continue;
                    }
                }
            }
            return self.rx.recv().await;
        }
    }
}

fn upsert(overflow: &mut Vec<BoardEntry>, entry: BoardEntry) {
    match overflow
        .iter_mut()
        .find(|e| e.kind == entry.kind && e.company == entry.company)
    {
        Some(slot) => *slot = entry,
        None => overflow.push(entry),
    }
}

fn lock(overflow: &Overflow) -> MutexGuard<'_, Vec<BoardEntry>> {
    overflow.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use queueboard_core::domain::{CompanyId, CounterPath, CounterValue};

    fn queue_entry(company: CompanyId, current: i64) -> BoardEntry {
        BoardEntry::from_snapshot(CounterPath::queue(company), Some(CounterValue::new(current)))
    }

    async fn labels(rx: &mut FeedReceiver, n: usize) -> Vec<String> {
        let mut out = Vec::new();
        for _ in 0..n {
            out.push(rx.recv().await.unwrap().label.into_string());
        }
        out
    }

    #[tokio::test]
    async fn test_passes_updates_through_in_order() {
        let (tx, mut rx) = channel(8);
        for n in 1..=3 {
            tx.push(queue_entry(CompanyId::A, n));
        }
        assert_eq!(labels(&mut rx, 3).await, vec!["A001", "A002", "A003"]);
    }

    #[tokio::test]
    async fn test_slow_reader_gets_latest_value_per_counter() {
        let (tx, mut rx) = channel(2);
        for n in 1..=5 {
            tx.push(queue_entry(CompanyId::A, n));
        }
        tx.push(queue_entry(CompanyId::B, 1));
        tx.push(queue_entry(CompanyId::A, 6));

        assert_eq!(
            labels(&mut rx, 4).await,
            vec!["A001", "A002", "A006", "B001"]
        );

        // Drained: back to the channel
        tx.push(queue_entry(CompanyId::C, 9));
        assert_eq!(labels(&mut rx, 1).await, vec!["C009"]);
        assert!(lock(&rx.overflow).is_empty());
    }

    #[tokio::test]
    async fn test_buffer_stays_bounded() {
        let (tx, rx) = channel(4);
        for n in 0..10_000 {
            tx.push(queue_entry(CompanyId::ALL[(n % 4) as usize], n));
        }
        assert!(lock(&rx.overflow).len() <= 4);
    }

    #[tokio::test]
    async fn test_closes_after_senders_drop() {
        let (tx, mut rx) = channel(1);
        tx.push(queue_entry(CompanyId::D, 1));
        tx.push(queue_entry(CompanyId::D, 2));
        drop(tx);

        assert_eq!(labels(&mut rx, 2).await, vec!["D001", "D002"]);
        assert!(rx.recv().await.is_none());
    }
}
