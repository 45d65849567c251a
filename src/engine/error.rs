// ==========================================
// 宝石库存表格管理 - 表格引擎错误与通知
// ==========================================
// 工具: thiserror 派生宏
// 红线: 引擎错误不改变任何表格状态（失败即无操作）
// ==========================================

use crate::domain::field::Field;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// UploadFailure - 附件上传失败
// ==========================================
// 只影响单个 (记录, 字段)，忙碌标记清除，原值保留
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("附件上传失败（记录 {record_id}，字段 {field}）: {reason}")]
pub struct UploadFailure {
    pub record_id: String,
    pub field: Field,
    pub reason: String,
}

impl UploadFailure {
    pub fn new(record_id: impl Into<String>, field: Field, reason: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            field,
            reason: reason.into(),
        }
    }
}

// ==========================================
// GridError - 表格引擎错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("记录不存在: {0}")]
    RecordNotFound(String),

    #[error("字段不可直接编辑: {0}")]
    FieldNotEditable(Field),

    #[error("字段不是附件字段: {0}")]
    NotAnAttachmentField(Field),

    /// 单元格附件上传进行中，拒绝编辑
    #[error("单元格正忙（记录 {record_id}，字段 {field}）")]
    CellBusy { record_id: String, field: Field },

    /// 同一单元格已有上传在途
    #[error("该单元格已有上传任务（记录 {record_id}，字段 {field}）")]
    UploadInProgress { record_id: String, field: Field },

    #[error("值 \"{value}\" 不在字段 {field} 的候选列表中")]
    InvalidOption { field: Field, value: String },

    #[error("当前没有正在编辑的单元格")]
    NoActiveEdit,

    #[error(transparent)]
    Upload(#[from] UploadFailure),
}

/// Result 类型别名
pub type GridResult<T> = Result<T, GridError>;

// ==========================================
// GridNotice - 批量操作结果通知
// ==========================================
// 交给外部提示组件展示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridNotice {
    RowsAdded { count: usize },
    RowsDeleted { count: usize },
    RowsDuplicated { count: usize },
    RowsCopied { count: usize },
    RowsPasted { count: usize },
    RowsImported { count: usize, errors: usize },
    Saved { count: usize },
    NothingSelected,
    ClipboardEmpty,
}

impl GridNotice {
    /// 是否为无操作提示（状态未改变）
    pub fn is_noop(&self) -> bool {
        matches!(self, GridNotice::NothingSelected | GridNotice::ClipboardEmpty)
    }

    pub fn message(&self) -> String {
        match self {
            GridNotice::RowsAdded { count } => format!("已新增 {} 行", count),
            GridNotice::RowsDeleted { count } => format!("已删除 {} 行", count),
            GridNotice::RowsDuplicated { count } => format!("已复制出 {} 行新记录", count),
            GridNotice::RowsCopied { count } => format!("已复制 {} 行到剪贴板", count),
            GridNotice::RowsPasted { count } => format!("已粘贴 {} 行", count),
            GridNotice::RowsImported { count, errors } => {
                format!("已导入 {} 行，{} 个字段需要修正", count, errors)
            }
            GridNotice::Saved { count } => format!("已保存 {} 条记录的修改", count),
            GridNotice::NothingSelected => "请先选择要操作的行".to_string(),
            GridNotice::ClipboardEmpty => "剪贴板为空".to_string(),
        }
    }
}
