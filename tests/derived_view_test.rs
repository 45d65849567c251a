// ==========================================
// 派生视图测试
// ==========================================
// 测试目标: 过滤 + 稳定排序为纯函数，不改动记录仓
// ==========================================


use gem_inventory::domain::{Field, SortDirection, SortSpec};
use gem_inventory::engine::{compute_view, ViewQuery};
use std::collections::BTreeMap;
use test_helpers::RecordBuilder;

fn ids(view: &[&gem_inventory::domain::InventoryRecord]) -> Vec<String> {
    view.iter().map(|r| r.id.clone()).collect()
}

#[test]
fn test_view_is_idempotent() {
    let records = vec![
        RecordBuilder::new("a").color("F").carat(1.0).build(),
        RecordBuilder::new("b").color("D").carat(0.5).build(),
        RecordBuilder::new("c").color("E").carat(2.0).build(),
    ];
    let query = ViewQuery {
        search: String::new(),
        column_filters: BTreeMap::new(),
        sort: Some(SortSpec {
            field: Field::Color,
            direction: SortDirection::Asc,
        }),
    };

    let first = ids(&compute_view(&records, &query));
    let second = ids(&compute_view(&records, &query));
    assert_eq!(first, vec!["b", "c", "a"]);
    assert_eq!(first, second);
}

#[test]
fn test_equal_keys_keep_store_order() {
    let records = vec![
        RecordBuilder::new("a").laboratory("GIA").carat(1.0).build(),
        RecordBuilder::new("b").laboratory("IGI").carat(1.0).build(),
        RecordBuilder::new("c").laboratory("HRD").carat(0.3).build(),
        RecordBuilder::new("d").laboratory("GIA").carat(1.0).build(),
    ];

    let asc = ViewQuery {
        sort: Some(SortSpec {
            field: Field::Carat,
            direction: SortDirection::Asc,
        }),
        ..ViewQuery::default()
    };
    assert_eq!(ids(&compute_view(&records, &asc)), vec!["c", "a", "b", "d"]);

    let desc = ViewQuery {
        sort: Some(SortSpec {
            field: Field::Carat,
            direction: SortDirection::Desc,
        }),
        ..ViewQuery::default()
    };
    assert_eq!(ids(&compute_view(&records, &desc)), vec!["a", "b", "d", "c"]);
}

#[test]
fn test_search_and_filters_intersect() {
    let records = vec![
        RecordBuilder::new("a").laboratory("GIA").seller_name("North Gems").build(),
        RecordBuilder::new("b").laboratory("IGI").seller_name("North Gems").build(),
        RecordBuilder::new("c").laboratory("GIA").seller_name("South Stones").build(),
    ];

    let mut column_filters = BTreeMap::new();
    column_filters.insert(Field::Laboratory, "gia".to_string());
    let query = ViewQuery {
        search: "NORTH".to_string(),
        column_filters,
        sort: None,
    };

    assert_eq!(ids(&compute_view(&records, &query)), vec!["a"]);
    assert!(ViewQuery::default().is_identity());
    assert!(!query.is_identity());
}
