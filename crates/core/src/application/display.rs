// Display Board - live projection of every counter into labels

use crate::domain::{project, CompanyId, CounterKind, CounterPath, CounterValue, DisplayLabel};
use crate::error::Result;
use crate::port::{Listener, Snapshot, StateStore, Subscription};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// One rendered counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEntry {
    pub company: CompanyId,
    pub kind: CounterKind,
    pub current: i64,
    pub label: DisplayLabel,
}

impl BoardEntry {
    /// Render a delivered store value
    pub fn from_snapshot(path: CounterPath, snapshot: Snapshot) -> Self {
        let current = CounterValue::or_zero(snapshot);
        Self {
            company: path.company,
            kind: path.kind,
            current,
            label: project(path.company, Some(current)),
        }
    }
}

/// All eight counters, ordered queue A..D then ticket A..D
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub entries: Vec<BoardEntry>,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            entries: CounterPath::all()
                .map(|path| BoardEntry::from_snapshot(path, None))
                .collect(),
        }
    }
}

impl BoardSnapshot {
    pub fn get(&self, path: CounterPath) -> Option<&BoardEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == path.kind && e.company == path.company)
    }

    pub fn label(&self, path: CounterPath) -> Option<&DisplayLabel> {
        self.get(path).map(|e| &e.label)
    }

    fn apply(&mut self, entry: BoardEntry) {
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|e| e.kind == entry.kind && e.company == entry.company)
        {
            *slot = entry;
        }
    }
}

/// Keeps a `BoardSnapshot` current for as long as it is alive.
/// Dropping the board releases its store subscriptions.
pub struct DisplayBoard {
    tx: Arc<watch::Sender<BoardSnapshot>>,
    _subscriptions: Vec<Subscription>,
}

impl DisplayBoard {
    /// Subscribe to every counter path
    pub async fn attach(store: &dyn StateStore) -> Result<Self> {
        let (tx, _rx) = watch::channel(BoardSnapshot::default());
        let tx = Arc::new(tx);

        let mut subscriptions = Vec::with_capacity(8);
        for path in CounterPath::all() {
            let tx = Arc::clone(&tx);
            let listener: Listener = Arc::new(move |snapshot| {
                let entry = BoardEntry::from_snapshot(path, snapshot);
                debug!(path = %path, label = %entry.label, "Display updated");
                tx.send_modify(|board| board.apply(entry));
            });
            subscriptions.push(store.subscribe(&path, listener).await?);
        }

        Ok(Self {
            tx,
            _subscriptions: subscriptions,
        })
    }

    /// Current board
    pub fn snapshot(&self) -> BoardSnapshot {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every change
    pub fn watch(&self) -> watch::Receiver<BoardSnapshot> {
        self.tx.subscribe()
    }
}
