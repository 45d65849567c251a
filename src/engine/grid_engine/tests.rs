use super::{EditorKind, GridEngine};
use crate::config::ImportApplyMode;
use crate::domain::field::Field;
use crate::domain::import::ImportResult;
use crate::domain::record::InventoryRecord;
use crate::domain::types::{CellPosition, FieldValue, SortDirection};
use crate::engine::error::{GridError, GridNotice, UploadFailure};
use crate::engine::navigation::NavigationKey;
use std::collections::HashSet;

// ==========================================
// 测试辅助函数
// ==========================================

fn record(id: &str, product_id: &str, laboratory: &str, carat: f64) -> InventoryRecord {
    let mut record = InventoryRecord::blank(id);
    record.product_id = product_id.to_string();
    record.laboratory = laboratory.to_string();
    record.carat = carat;
    record
}

fn engine() -> GridEngine {
    GridEngine::with_records(
        vec![
            record("r1", "000001", "GIA", 1.5),
            record("r2", "000002", "IGI", 0.9),
            record("r3", "000003", "gia dor", 2.1),
        ],
        6,
    )
}

fn ids(engine: &GridEngine) -> Vec<String> {
    engine.records().iter().map(|r| r.id.clone()).collect()
}

// ==========================================
// 编辑光标
// ==========================================

#[test]
fn test_start_edit_rejects_attachment_field() {
    let mut engine = engine();
    let result = engine.start_edit("r1", Field::ImageUrl);
    assert_eq!(result, Err(GridError::FieldNotEditable(Field::ImageUrl)));
    assert!(engine.cursor().is_none());
}

#[test]
fn test_editor_kind_follows_field_capability() {
    let mut engine = engine();
    engine.start_edit("r1", Field::Color).unwrap();
    assert!(matches!(engine.editing().unwrap().editor, EditorKind::Dropdown(_)));

    engine.start_edit("r1", Field::Carat).unwrap();
    assert_eq!(engine.editing().unwrap().editor, EditorKind::FreeText);
}

#[test]
fn test_advance_commits_and_moves() {
    let mut engine = engine();
    engine.start_edit("r1", Field::Carat).unwrap();
    engine.input("3.25").unwrap();

    let next = engine.handle_key(NavigationKey::Advance).unwrap();
    assert_eq!(next, Some(CellPosition::new("r1", Field::Color)));
    assert_eq!(engine.record("r1").unwrap().carat, 3.25);
    assert!(engine.is_dirty("r1"));
}

#[test]
fn test_commit_numeric_fallback_zero_and_flag() {
    let mut engine = engine();
    engine.start_edit("r2", Field::Carat).unwrap();
    engine.input("heavy").unwrap();
    engine.commit_edit().unwrap();

    let record = engine.record("r2").unwrap();
    assert_eq!(record.carat, 0.0);
    assert!(record.is_invalid(Field::Carat));
    assert!(engine.cursor().is_none());
}

#[test]
fn test_commit_clears_previous_invalid_flag() {
    let mut engine = engine();
    engine.set_cell_value("r1", Field::Color, "ZZ").unwrap();
    assert!(engine.record("r1").unwrap().is_invalid(Field::Color));

    engine.start_edit("r1", Field::Color).unwrap();
    engine.choose_option("E").unwrap();
    let record = engine.record("r1").unwrap();
    assert_eq!(record.color, "E");
    assert!(!record.is_invalid(Field::Color));
}

#[test]
fn test_cancel_leaves_record_unchanged() {
    let mut engine = engine();
    engine.start_edit("r1", Field::Carat).unwrap();
    engine.input("99").unwrap();

    assert_eq!(engine.handle_key(NavigationKey::Cancel).unwrap(), None);
    assert_eq!(engine.record("r1").unwrap().carat, 1.5);
    assert!(!engine.is_dirty("r1"));
}

#[test]
fn test_advance_without_input_does_not_dirty() {
    let mut engine = engine();
    engine.start_edit("r1", Field::Shape).unwrap();
    engine.handle_key(NavigationKey::Advance).unwrap();
    assert!(!engine.has_unsaved_changes());
}

#[test]
fn test_row_confirm_follows_view_order() {
    let mut engine = engine();
    engine.request_sort(Field::Carat);
    // 升序: r2(0.9), r1(1.5), r3(2.1)
    engine.start_edit("r2", Field::Shape).unwrap();
    let next = engine.handle_key(NavigationKey::RowConfirm).unwrap();
    assert_eq!(next, Some(CellPosition::new("r1", Field::Shape)));
}

#[test]
fn test_advance_from_last_cell_closes() {
    let mut engine = engine();
    let last_field = *engine.navigable_columns().last().unwrap();
    engine.start_edit("r3", last_field).unwrap();
    assert_eq!(engine.handle_key(NavigationKey::Advance).unwrap(), None);
    assert!(engine.cursor().is_none());
}

#[test]
fn test_navigation_never_lands_on_hidden_or_attachment() {
    let mut engine = engine();
    for field in Field::ATTACHMENTS {
        engine.set_column_visible(field, true);
    }
    engine.start_edit("r1", Field::SellerId).unwrap();

    while let Some(position) = engine.handle_key(NavigationKey::Advance).unwrap() {
        assert!(!position.field.is_attachment());
        assert!(engine.columns().is_visible(position.field));
    }
}

#[test]
fn test_choose_option_rejects_outside_value() {
    let mut engine = engine();
    engine.start_edit("r1", Field::Shape).unwrap();
    let result = engine.choose_option("Triangle");
    assert!(matches!(result, Err(GridError::InvalidOption { .. })));
    assert!(engine.cursor().is_some());
    assert!(!engine.is_dirty("r1"));
}

#[test]
fn test_dropdown_input_rejects_outside_value() {
    let mut engine = engine();
    engine.start_edit("r1", Field::Color).unwrap();
    engine.input("E").unwrap();

    let result = engine.input("xyz");
    assert_eq!(
        result,
        Err(GridError::InvalidOption {
            field: Field::Color,
            value: "xyz".to_string(),
        })
    );
    assert_eq!(engine.editing().unwrap().draft.as_deref(), Some("E"), "草稿保持上一次合法输入");

    engine.handle_key(NavigationKey::Advance).unwrap();
    let record = engine.record("r1").unwrap();
    assert_eq!(record.color, "E");
    assert!(!record.is_invalid(Field::Color));
}

#[test]
fn test_dropdown_input_allows_clearing() {
    let mut engine = engine();
    engine.set_cell_value("r1", Field::Laboratory, "HRD").unwrap();
    engine.start_edit("r1", Field::Laboratory).unwrap();
    engine.input("").unwrap();
    engine.commit_edit().unwrap();
    assert_eq!(engine.record("r1").unwrap().laboratory, "");
}

#[test]
fn test_hiding_cursor_column_closes_cursor() {
    let mut engine = engine();
    engine.start_edit("r1", Field::Carat).unwrap();
    engine.toggle_column(Field::Carat);
    assert!(engine.cursor().is_none());
}

#[test]
fn test_copy_cell_value() {
    let mut engine = engine();
    assert_eq!(engine.copy_cell_value("r1", Field::Carat).unwrap(), "1.5");
    assert_eq!(engine.text_clipboard(), Some("1.5"));
}

// ==========================================
// 派生视图
// ==========================================

#[test]
fn test_laboratory_filter_scenario() {
    let mut engine = engine();
    engine.set_column_filter(Field::Laboratory, "gia");
    let view: Vec<String> = engine.view().iter().map(|r| r.id.clone()).collect();
    assert_eq!(view, vec!["r1", "r3"]);
}

#[test]
fn test_sort_cycle_through_engine() {
    let mut engine = engine();
    assert_eq!(
        engine.request_sort(Field::Carat).map(|s| s.direction),
        Some(SortDirection::Asc)
    );
    assert_eq!(
        engine.request_sort(Field::Carat).map(|s| s.direction),
        Some(SortDirection::Desc)
    );
    assert_eq!(engine.request_sort(Field::Carat), None);
    assert_eq!(engine.view_ids(), vec!["r1", "r2", "r3"]);
}

#[test]
fn test_rename_column_does_not_touch_schema() {
    let mut engine = engine();
    engine.rename_column(Field::Laboratory, Some("Lab".to_string()));
    assert_eq!(engine.column_label(Field::Laboratory), "Lab");
    assert_eq!(Field::Laboratory.label(), "Laboratory");
    engine.set_column_filter(Field::Laboratory, "igi");
    assert_eq!(engine.view_ids(), vec!["r2"]);
}

// ==========================================
// 批量行操作
// ==========================================

#[test]
fn test_add_row_prepends_and_opens_cursor() {
    let mut engine = engine();
    assert_eq!(engine.add_row(), GridNotice::RowsAdded { count: 1 });

    let first = &engine.records()[0];
    assert_eq!(first.product_id, "000004");
    assert_eq!(first.seller_id, "");
    assert_eq!(
        engine.cursor(),
        Some(&CellPosition::new(first.id.clone(), Field::SellerId))
    );
    assert!(engine.is_dirty(&first.id));
}

#[test]
fn test_add_rows_contiguous_ids() {
    let mut engine = engine();
    engine.add_rows(3);
    let product_ids: Vec<&str> = engine.records()[..3]
        .iter()
        .map(|r| r.product_id.as_str())
        .collect();
    assert_eq!(product_ids, vec!["000004", "000005", "000006"]);
    assert_eq!(engine.len(), 6);
}

#[test]
fn test_row_ops_next_to_max_numeric_product_id() {
    let mut engine = GridEngine::with_records(
        vec![
            record("r1", "18446744073709551615", "GIA", 1.5),
            record("r2", "000002", "IGI", 0.9),
        ],
        6,
    );

    assert_eq!(engine.add_row(), GridNotice::RowsAdded { count: 1 });
    assert_eq!(engine.records()[0].product_id, "000001");

    engine.toggle_select("r1").unwrap();
    engine.toggle_select("r2").unwrap();
    assert_eq!(engine.duplicate_selected(), GridNotice::RowsDuplicated { count: 2 });

    engine.toggle_select("r2").unwrap();
    engine.copy_selected();
    assert_eq!(engine.paste(), GridNotice::RowsPasted { count: 1 });

    let product_ids: HashSet<&str> = engine.records().iter().map(|r| r.product_id.as_str()).collect();
    assert_eq!(product_ids.len(), engine.len(), "业务编号不重复");
    assert_eq!(engine.len(), 6);
}

#[test]
fn test_delete_with_empty_selection_is_noop() {
    let mut engine = engine();
    assert_eq!(engine.delete_selected(), GridNotice::NothingSelected);
    assert_eq!(engine.len(), 3);
}

#[test]
fn test_delete_selected_clears_selection_and_dirty() {
    let mut engine = engine();
    engine.set_cell_value("r2", Field::Shape, "Oval").unwrap();
    engine.toggle_select("r2").unwrap();
    engine.start_edit("r2", Field::Carat).unwrap();

    assert_eq!(engine.delete_selected(), GridNotice::RowsDeleted { count: 1 });
    assert_eq!(ids(&engine), vec!["r1", "r3"]);
    assert!(engine.selection().is_empty());
    assert!(!engine.is_dirty("r2"));
    assert!(engine.cursor().is_none());
}

#[test]
fn test_duplicate_three_selected() {
    let mut engine = engine();
    for id in ["r1", "r2", "r3"] {
        engine.toggle_select(id).unwrap();
    }

    assert_eq!(engine.duplicate_selected(), GridNotice::RowsDuplicated { count: 3 });
    assert_eq!(engine.len(), 6);
    assert!(engine.selection().is_empty());

    let copies = &engine.records()[..3];
    let originals: HashSet<&str> = ["r1", "r2", "r3"].into_iter().collect();
    for copy in copies {
        assert!(!originals.contains(copy.id.as_str()));
    }
    assert_eq!(copies[0].laboratory, "GIA");
    assert_eq!(copies[0].product_id, "000004");
    assert_eq!(copies[2].product_id, "000006");
    assert_eq!(&ids(&engine)[3..], &["r1", "r2", "r3"]);
}

#[test]
fn test_copy_then_mutate_then_paste_twice() {
    let mut engine = engine();
    engine.toggle_select("r1").unwrap();
    assert_eq!(engine.copy_selected(), GridNotice::RowsCopied { count: 1 });

    engine.set_cell_value("r1", Field::Carat, "7").unwrap();
    assert_eq!(engine.paste(), GridNotice::RowsPasted { count: 1 });
    assert_eq!(engine.paste(), GridNotice::RowsPasted { count: 1 });

    assert_eq!(engine.clipboard().len(), 1);
    assert_eq!(engine.records()[0].carat, 1.5);
    assert_eq!(engine.records()[1].carat, 1.5);
    assert_ne!(engine.records()[0].id, engine.records()[1].id);
    assert_eq!(engine.records()[1].product_id, "000004");
    assert_eq!(engine.records()[0].product_id, "000005");
}

#[test]
fn test_paste_with_empty_clipboard() {
    let mut engine = engine();
    assert_eq!(engine.paste(), GridNotice::ClipboardEmpty);
}

#[test]
fn test_select_all_visible_respects_filter() {
    let mut engine = engine();
    engine.set_search("igi");
    assert_eq!(engine.select_all_visible(), 1);
    assert!(engine.is_selected("r2"));
    engine.clear_selection();
    assert!(engine.selection().is_empty());
}

#[test]
fn test_save_returns_dirty_snapshot_and_clears() {
    let mut engine = engine();
    engine.set_cell_value("r3", Field::Cut, "Ideal").unwrap();
    engine.start_edit("r1", Field::Polish).unwrap();
    engine.input("Good").unwrap();

    let saved = engine.save();
    let saved_ids: Vec<&str> = saved.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(saved_ids, vec!["r1", "r3"]);
    assert!(!engine.has_unsaved_changes());
}

#[test]
fn test_apply_import_replace_and_prepend() {
    let mut engine = engine();
    engine.toggle_select("r1").unwrap();
    let imported = ImportResult {
        records: vec![InventoryRecord::blank("imported_1_0")],
        total_rows: 1,
        error_count: 0,
        errors: Vec::new(),
    };

    let notice = engine.apply_import(imported.clone(), ImportApplyMode::Replace);
    assert_eq!(notice, GridNotice::RowsImported { count: 1, errors: 0 });
    assert_eq!(ids(&engine), vec!["imported_1_0"]);
    assert!(engine.selection().is_empty());

    engine.apply_import(imported, ImportApplyMode::Prepend);
    assert_eq!(engine.len(), 2);
    let unique: HashSet<String> = ids(&engine).into_iter().collect();
    assert_eq!(unique.len(), 2);
}

// ==========================================
// 附件上传
// ==========================================

#[test]
fn test_upload_success_sets_reference() {
    let mut engine = engine();
    let ticket = engine.begin_upload("r1", Field::ImageUrl).unwrap();
    assert!(engine.is_busy("r1", Field::ImageUrl));

    engine
        .finish_upload(ticket, Ok("https://cdn/r1.jpg".to_string()))
        .unwrap();
    assert!(!engine.is_busy("r1", Field::ImageUrl));
    assert_eq!(
        engine.record("r1").unwrap().get(Field::ImageUrl),
        FieldValue::Text("https://cdn/r1.jpg".to_string())
    );
    assert!(engine.is_dirty("r1"));
}

#[test]
fn test_upload_same_key_rejected() {
    let mut engine = engine();
    let _ticket = engine.begin_upload("r1", Field::VideoUrl).unwrap();
    assert!(matches!(
        engine.begin_upload("r1", Field::VideoUrl),
        Err(GridError::UploadInProgress { .. })
    ));
    assert!(engine.begin_upload("r2", Field::VideoUrl).is_ok());
}

#[test]
fn test_upload_failure_keeps_value() {
    let mut engine = engine();
    let ticket = engine.begin_upload("r1", Field::CertificateUrl).unwrap();
    engine.finish_upload(ticket, Ok("old-ref".to_string())).unwrap();
    engine.save();

    let ticket = engine.begin_upload("r1", Field::CertificateUrl).unwrap();
    let failure = UploadFailure::new("r1", Field::CertificateUrl, "timeout");
    let result = engine.finish_upload(ticket, Err(failure.clone()));

    assert_eq!(result, Err(GridError::Upload(failure)));
    assert_eq!(engine.record("r1").unwrap().certificate_url, "old-ref");
    assert!(!engine.is_busy("r1", Field::CertificateUrl));
    assert!(!engine.is_dirty("r1"));
}

#[test]
fn test_upload_rejects_non_attachment() {
    let mut engine = engine();
    assert_eq!(
        engine.begin_upload("r1", Field::Carat).err(),
        Some(GridError::NotAnAttachmentField(Field::Carat))
    );
}
