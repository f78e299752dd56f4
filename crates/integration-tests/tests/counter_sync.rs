//! Shared counter behaviour over the SQLite store
//!
//! Several consoles, boards and ticket services attached to one store stand
//! in for stations sharing the same backend.

use queueboard_core::application::{DisplayBoard, QueueConsole, TicketService};
use queueboard_core::domain::{CompanyId, CounterPath, CounterValue};
use queueboard_core::port::{read_once, Listener, StateStore, SystemTimeProvider};
use queueboard_infra_sqlite::{create_pool, run_migrations, SqliteStateStore};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

async fn setup_store() -> Arc<SqliteStateStore> {
    let pool = create_pool(":memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    Arc::new(SqliteStateStore::new(pool, Arc::new(SystemTimeProvider)))
}

async fn attached_console(store: &Arc<SqliteStateStore>) -> QueueConsole {
    let console = QueueConsole::new(store.clone());
    console.attach().await.unwrap();
    console
}

#[tokio::test]
async fn test_fresh_tickets_count_from_one() {
    let store = setup_store().await;
    let tickets = TicketService::new(store.clone());
    let path = CounterPath::ticket(CompanyId::A);

    assert_eq!(tickets.issue_ticket(CompanyId::A).await.unwrap(), 1);
    assert_eq!(store.read(&path).await.unwrap(), Some(CounterValue::new(1)));

    assert_eq!(tickets.issue_ticket(CompanyId::A).await.unwrap(), 2);
    assert_eq!(store.read(&path).await.unwrap(), Some(CounterValue::new(2)));

    // Other companies are untouched
    assert_eq!(store.read(&CounterPath::ticket(CompanyId::B)).await.unwrap(), None);
}

#[tokio::test]
async fn test_concurrent_issuance_in_one_process_never_repeats() {
    let store = setup_store().await;
    let tickets = Arc::new(TicketService::new(store.clone()));

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let tickets = tickets.clone();
            tokio::spawn(async move { tickets.issue_ticket(CompanyId::D).await.unwrap() })
        })
        .collect();

    let issued: HashSet<i64> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(issued, (1..=12).collect::<HashSet<i64>>());
    assert_eq!(
        store.read(&CounterPath::ticket(CompanyId::D)).await.unwrap(),
        Some(CounterValue::new(12))
    );
}

#[tokio::test]
async fn test_ticket_numbers_widen_past_999() {
    let store = setup_store().await;
    store
        .write(&CounterPath::ticket(CompanyId::C), CounterValue::new(999))
        .await
        .unwrap();
    let board = DisplayBoard::attach(store.as_ref()).await.unwrap();

    let tickets = TicketService::new(store.clone());
    assert_eq!(tickets.issue_ticket(CompanyId::C).await.unwrap(), 1000);

    let snapshot = board.snapshot();
    assert_eq!(
        snapshot.label(CounterPath::ticket(CompanyId::C)).unwrap().as_str(),
        "C1000"
    );
}

#[tokio::test]
async fn test_queue_change_reaches_every_station() {
    let store = setup_store().await;
    let front_desk = attached_console(&store).await;
    let side_desk = attached_console(&store).await;
    let board = DisplayBoard::attach(store.as_ref()).await.unwrap();

    assert_eq!(front_desk.increment(CompanyId::A).await.unwrap(), 1);
    assert_eq!(front_desk.increment(CompanyId::A).await.unwrap(), 2);

    assert_eq!(side_desk.current(CompanyId::A), 2);
    assert_eq!(side_desk.decrement(CompanyId::A).await.unwrap(), 1);
    assert_eq!(front_desk.current(CompanyId::A), 1);

    let snapshot = board.snapshot();
    assert_eq!(snapshot.label(CounterPath::queue(CompanyId::A)).unwrap().as_str(), "A001");
    assert_eq!(snapshot.label(CounterPath::queue(CompanyId::B)).unwrap().as_str(), "B000");
}

#[tokio::test]
async fn test_queue_bounds_are_no_ops() {
    let store = setup_store().await;
    store
        .write(&CounterPath::queue(CompanyId::B), CounterValue::new(998))
        .await
        .unwrap();
    let console = attached_console(&store).await;

    assert_eq!(console.increment(CompanyId::B).await.unwrap(), 999);
    assert_eq!(console.increment(CompanyId::B).await.unwrap(), 999);
    assert_eq!(
        store.read(&CounterPath::queue(CompanyId::B)).await.unwrap(),
        Some(CounterValue::new(999))
    );

    // Decrement at zero never creates the path
    assert_eq!(console.decrement(CompanyId::D).await.unwrap(), 0);
    assert_eq!(store.read(&CounterPath::queue(CompanyId::D)).await.unwrap(), None);
}

#[tokio::test]
async fn test_reset_all_zeroes_eight_counters() {
    let store = setup_store().await;
    let console = attached_console(&store).await;
    let tickets = TicketService::new(store.clone());
    let board = DisplayBoard::attach(store.as_ref()).await.unwrap();

    for company in CompanyId::ALL {
        console.increment(company).await.unwrap();
        tickets.issue_ticket(company).await.unwrap();
        tickets.issue_ticket(company).await.unwrap();
    }

    console.reset_all().await.unwrap();

    assert_eq!(console.snapshot(), [0; 4]);
    for path in CounterPath::all() {
        assert_eq!(store.read(&path).await.unwrap(), Some(CounterValue::new(0)), "{}", path);
    }
    let snapshot = board.snapshot();
    for entry in &snapshot.entries {
        assert_eq!(entry.label.as_str(), format!("{}000", entry.company));
    }

    // Issuance restarts at 1
    assert_eq!(tickets.issue_ticket(CompanyId::A).await.unwrap(), 1);
}

#[tokio::test]
async fn test_released_listener_receives_nothing_more() {
    let store = setup_store().await;
    let path = CounterPath::queue(CompanyId::C);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let listener: Listener = Arc::new(move |snapshot| sink.lock().unwrap().push(snapshot));

    let subscription = store.subscribe(&path, listener).await.unwrap();
    store.write(&path, CounterValue::new(1)).await.unwrap();
    drop(subscription);
    store.write(&path, CounterValue::new(2)).await.unwrap();

    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[None, Some(CounterValue::new(1))]
    );
    assert_eq!(store.listener_count(&path), 0);
}

#[tokio::test]
async fn test_read_once_leaves_no_listener_behind() {
    let store = setup_store().await;
    let path = CounterPath::ticket(CompanyId::B);
    store.write(&path, CounterValue::new(17)).await.unwrap();

    let value = read_once(store.as_ref(), &path).await.unwrap();

    assert_eq!(value, Some(CounterValue::new(17)));
    assert_eq!(store.listener_count(&path), 0);
}
