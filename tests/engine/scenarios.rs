//! End-to-end scenarios over one project.

use crate::common::*;

#[test]
fn three_writes_then_page_and_query() {
    let stack = TestStack::new();
    stack.write_values("proj1", &["v1", "v2", "v3"]);

    let page = stack
        .service
        .read("proj1", &ReadRequest::page(2, 1))
        .unwrap();
    assert_eq!(values(&page.items), vec![json!("v2"), json!("v3")]);
    assert_eq!(page.total, 3);

    let found = stack
        .service
        .query("proj1", &QueryRequest::new("v2"))
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(values(&found.items), vec![json!("v2")]);
}

#[test]
fn purge_then_read_is_empty() {
    let stack = TestStack::new();
    stack.write_values("proj1", &["v1", "v2", "v3"]);

    stack.service.purge("proj1", true).unwrap();
    let page = stack.service.read("proj1", &ReadRequest::default()).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}

#[test]
fn reopened_mirror_survives_restart() {
    let stack = TestStack::new();
    stack.write_values("proj1", &["kept"]);
    let path = stack.dir.path().join("data").join("memory.db");

    // a fresh process: empty in-process primary, same SQLite file
    let mut config = MnemoConfig::default();
    config.primary.backend = mnemo::PrimaryBackend::Memory;
    config.backup.path = path;
    let service = MemoryService::open(&config).unwrap();

    let page = service.read("proj1", &ReadRequest::default()).unwrap();
    assert_eq!(values(&page.items), vec![json!("kept")]);
    assert_eq!(page.total, 1);
}

#[test]
fn concurrent_writers_keep_every_record() {
    let stack = TestStack::new();
    let service = stack.service.clone();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let service = service.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    service
                        .write("proj1", obj(json!({"t": t, "i": i})), None)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let page = stack
        .service
        .read("proj1", &ReadRequest::page(1000, 0))
        .unwrap();
    assert_eq!(page.items.len(), 100);
    assert_eq!(page.total, 100);
    assert_eq!(stack.backup_count("proj1"), 100);

    let ids: Vec<StreamId> = page.items.iter().map(|r| r.id.parse().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}
