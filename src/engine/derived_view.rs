// ==========================================
// 宝石库存表格管理 - 派生视图
// ==========================================
// 职责: 记录序列 → 搜索/列过滤/排序后的投影
// 红线: 纯函数，每次全量重算；排序稳定
// ==========================================

use crate::domain::field::Field;
use crate::domain::record::InventoryRecord;
use crate::domain::types::{SortDirection, SortSpec};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ==========================================
// ViewQuery - 视图查询条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    /// 全字段搜索词（大小写不敏感，空串匹配全部）
    pub search: String,
    /// 列过滤（字段 → 子串），多个条件取交集
    pub column_filters: BTreeMap<Field, String>,
    pub sort: Option<SortSpec>,
}

impl ViewQuery {
    /// 是否为恒等查询
    pub fn is_identity(&self) -> bool {
        self.search.is_empty()
            && self.column_filters.values().all(|v| v.is_empty())
            && self.sort.is_none()
    }
}

/// 计算派生视图
///
/// # 参数
/// - records: 权威记录序列
/// - query: 搜索词 + 列过滤 + 排序规格
///
/// # 返回
/// 过滤后（保持原相对顺序）再稳定排序的记录引用
pub fn compute_view<'a>(records: &'a [InventoryRecord], query: &ViewQuery) -> Vec<&'a InventoryRecord> {
    let search = query.search.to_lowercase();
    let filters: Vec<(Field, String)> = query
        .column_filters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(field, value)| (*field, value.to_lowercase()))
        .collect();

    let mut view: Vec<&InventoryRecord> = records
        .iter()
        .filter(|record| matches_search(record, &search))
        .filter(|record| {
            filters
                .iter()
                .all(|(field, needle)| record.get(*field).to_string().to_lowercase().contains(needle))
        })
        .collect();

    if let Some(spec) = query.sort {
        // slice::sort_by 为稳定排序
        view.sort_by(|a, b| {
            let ordering = compare_field(a, b, spec.field);
            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    view
}

fn matches_search(record: &InventoryRecord, lowered_term: &str) -> bool {
    lowered_term.is_empty() || record.search_text().to_lowercase().contains(lowered_term)
}

/// 按字段比较两条记录：数值字段按数值，其他字段按本地化字符串顺序
pub fn compare_field(a: &InventoryRecord, b: &InventoryRecord, field: Field) -> Ordering {
    let (left, right) = (a.get(field), b.get(field));
    match (left.as_number(), right.as_number()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => locale_compare(&left.to_string(), &right.to_string()),
    }
}

/// 近似本地化排序：先忽略大小写比较，相同时小写在前
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
