// ==========================================
// 宝石库存表格管理 - 编辑光标导航
// ==========================================
// 职责: 根据按键计算下一个光标位置（纯函数）
// 输入: 当前光标 + 视图行序 + 可导航列序
// 红线: 可导航列 = 可见 且 可编辑；不环绕
// ==========================================

use crate::domain::field::{is_editable, Field};
use crate::domain::types::CellPosition;
use crate::engine::column_layout::ColumnLayout;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKey {
    /// 行内前进，行尾转到下一行首列（Tab）
    Advance,
    /// 行内后退，行首转到上一行末列（Shift+Tab）
    ReverseAdvance,
    /// 同列下一行（Enter）
    RowConfirm,
    /// 关闭光标并丢弃未提交的输入（Escape）
    Cancel,
}

impl NavigationKey {
    /// 该按键是否先提交草稿再移动
    pub fn commits(&self) -> bool {
        !matches!(self, NavigationKey::Cancel)
    }
}

/// 可导航列（可见 且 可编辑，规范顺序）
pub fn navigable_fields(layout: &ColumnLayout) -> Vec<Field> {
    layout
        .visible_fields()
        .into_iter()
        .filter(|field| is_editable(*field))
        .collect()
}

/// 计算下一个光标位置
///
/// # 参数
/// - cursor: 当前光标
/// - key: 导航按键
/// - rows: 当前视图中的记录标识（过滤/排序后）
/// - columns: 可导航列
///
/// # 返回
/// - Some(CellPosition): 新光标
/// - None: 光标关闭（到达边界、取消、或当前位置已不在视图中）
pub fn next_position(
    cursor: &CellPosition,
    key: NavigationKey,
    rows: &[String],
    columns: &[Field],
) -> Option<CellPosition> {
    if key == NavigationKey::Cancel {
        return None;
    }

    let row = rows.iter().position(|id| *id == cursor.record_id)?;
    let col = columns.iter().position(|f| *f == cursor.field)?;

    match key {
        NavigationKey::Advance => {
            if col + 1 < columns.len() {
                Some(CellPosition::new(rows[row].clone(), columns[col + 1]))
            } else if row + 1 < rows.len() {
                Some(CellPosition::new(rows[row + 1].clone(), columns[0]))
            } else {
                None
            }
        }
        NavigationKey::ReverseAdvance => {
            if col > 0 {
                Some(CellPosition::new(rows[row].clone(), columns[col - 1]))
            } else if row > 0 {
                Some(CellPosition::new(rows[row - 1].clone(), columns[columns.len() - 1]))
            } else {
                None
            }
        }
        NavigationKey::RowConfirm => rows
            .get(row + 1)
            .map(|next| CellPosition::new(next.clone(), cursor.field)),
        NavigationKey::Cancel => None,
    }
}
