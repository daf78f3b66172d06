use async_trait::async_trait;
use ddd_kernel::{
    DispatchArgs, DomainEvent, DomainEventRegistry, Entity, EventHandler, EventOptions, Id,
    Plain, PriorityEventEmitter, Props, Reply,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Props)]
struct TicketProps {
    title: String,
}

struct Counter {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl EventHandler<TicketProps> for Counter {
    async fn dispatch(&self, _event: &DomainEvent<TicketProps>) -> anyhow::Result<()> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn ticket(id: &str) -> Entity<TicketProps> {
    Entity::create_with_id(
        TicketProps {
            title: "printer".into(),
        },
        id,
    )
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_registry_consumes_each_event_at_most_once() {
    let registry = Arc::new(DomainEventRegistry::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let handler: Arc<dyn EventHandler<TicketProps>> = Arc::new(Counter {
        calls: calls.clone(),
    });

    for i in 0..16 {
        let id = format!("t-{i}");
        registry.register(&Id::from(id.as_str()), "Opened", handler.clone(), ticket(&id));
    }
    assert_eq!(registry.total(), 16);

    // 每个事件被两个任务同时分发，只有一个能取到
    let mut tasks = Vec::new();
    for i in 0..16 {
        for _ in 0..2 {
            let registry = registry.clone();
            let owner = Id::from(format!("t-{i}"));
            tasks.push(tokio::spawn(async move {
                registry.dispatch(&owner, "Opened").await
            }));
        }
    }

    let mut fired = 0;
    for task in tasks {
        if task.await.unwrap().unwrap() {
            fired += 1;
        }
    }
    assert_eq!(fired, 16);
    assert_eq!(calls.load(Ordering::SeqCst), 16);
    assert_eq!(registry.total(), 0);
}

#[test]
fn emitter_priorities_with_plain_payload() {
    let mut emitter: PriorityEventEmitter<Plain> =
        PriorityEventEmitter::new(Plain::from(json!({ "name": "Jane", "age": 21 })));
    let calls = Arc::new(Mutex::new(Vec::new()));

    let record = |calls: &Arc<Mutex<Vec<(String, u8, Option<i64>)>>>| {
        let calls = calls.clone();
        move |payload: &Plain, args: &DispatchArgs<Plain>| {
            calls.lock().unwrap().push((
                args.descriptor.event_name.clone(),
                args.descriptor.options.priority,
                payload["age"].as_i64(),
            ));
        }
    };

    emitter.add_event("first", record(&calls)).unwrap();
    emitter.add_event("second", record(&calls)).unwrap();
    emitter
        .add_event_with(
            "third",
            record(&calls),
            EventOptions::builder().priority(1).build(),
        )
        .unwrap();
    assert_eq!(emitter.metrics().total_events(), 3);

    let reply = emitter.dispatch_events();
    assert!(!reply.is_pending());
    assert_eq!(emitter.metrics().total_dispatched(), 3);
    assert_eq!(emitter.metrics().total_events(), 0);

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0], ("third".to_string(), 1, Some(21)));
    assert_eq!(calls[1].0, "first");
    assert_eq!(calls[2].0, "second");
}

#[tokio::test]
async fn emitter_resolves_many_deferred_replies() {
    let mut emitter: PriorityEventEmitter<Entity<TicketProps>> =
        PriorityEventEmitter::new(ticket("t-1"));
    let resolved = Arc::new(AtomicUsize::new(0));

    for (name, priority) in [("first", 2), ("second", 2), ("third", 1)] {
        let resolved = resolved.clone();
        emitter
            .add_event_with(
                name,
                move |ticket: &Entity<TicketProps>, _: &DispatchArgs<Entity<TicketProps>>| {
                    assert_eq!(ticket.get(TicketProps::TITLE), "printer");
                    let resolved = resolved.clone();
                    Reply::deferred(async move {
                        tokio::time::sleep(Duration::from_millis(1)).await;
                        resolved.fetch_add(1, Ordering::SeqCst);
                    })
                },
                EventOptions::builder().priority(priority).build(),
            )
            .unwrap();
    }

    emitter.dispatch_events().await;
    assert_eq!(resolved.load(Ordering::SeqCst), 3);
    assert_eq!(emitter.metrics().total_dispatched(), 3);
    assert_eq!(emitter.metrics().total_events(), 0);
}

#[test]
fn emitter_contract_violations_and_no_ops() {
    let mut emitter: PriorityEventEmitter<()> = PriorityEventEmitter::new(());
    assert!(emitter.add_event("", |_, _| ()).is_err());
    assert!(emitter.dispatch_event("missing", vec![json!(1)]).is_none());
    assert_eq!(emitter.metrics().total_dispatched(), 0);

    emitter.add_event("first", |_, _| ()).unwrap();
    emitter.add_event("first", |_, _| ()).unwrap();
    emitter
        .add_event_with("first", |_, _| (), EventOptions::builder().priority(1).build())
        .unwrap();
    assert_eq!(emitter.metrics().total_events(), 1);
}
