//! Property tests for the write/read path.

use crate::common::*;
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
    ]
}

fn payload() -> impl Strategy<Value = Payload> {
    prop::collection::btree_map("[a-z]{1,8}", scalar(), 0..6)
        .prop_map(|m| m.into_iter().collect::<Payload>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn written_payloads_read_back_unchanged(
        records in prop::collection::vec((payload(), prop::option::of(payload())), 1..8)
    ) {
        let service = MemoryService::ephemeral().unwrap();
        for (data, metadata) in &records {
            service.write("prop", data.clone(), metadata.clone()).unwrap();
        }

        let page = service.read("prop", &ReadRequest::page(100, 0)).unwrap();
        prop_assert_eq!(page.items.len(), records.len());
        prop_assert_eq!(page.total, records.len() as u64);
        for (item, (data, metadata)) in page.items.iter().zip(&records) {
            prop_assert_eq!(&item.data, data);
            let expected = metadata.clone().unwrap_or_default();
            prop_assert_eq!(item.metadata.as_ref(), Some(&expected));
        }
    }

    #[test]
    fn paging_partitions_the_log(count in 1usize..30, limit in 1usize..10) {
        let service = MemoryService::ephemeral().unwrap();
        for i in 0..count {
            service.write("prop", obj(json!({"i": i})), None).unwrap();
        }

        let mut seen = Vec::new();
        let mut offset = 0;
        while offset < count {
            let page = service.read("prop", &ReadRequest::page(limit, offset)).unwrap();
            prop_assert!(page.items.len() <= limit);
            seen.extend(page.items.into_iter().map(|r| r.data["i"].as_u64().unwrap()));
            offset += limit;
        }
        let expected: Vec<u64> = (0..count as u64).collect();
        prop_assert_eq!(seen, expected);
    }
}
