// ==========================================
// 宝石库存表格管理 - 领域模型层
// ==========================================
// 职责: 字段模式注册表、库存记录、导入结果
// 红线: 不含解析逻辑，不含网格交互状态
// ==========================================

pub mod field;
pub mod import;
pub mod record;
pub mod types;

// 重导出核心类型
pub use field::{allowed_values, field_kind, is_editable, Field, FieldKind, FieldSchema};
pub use import::{ImportResult, ValidationError};
pub use record::InventoryRecord;
pub use types::{parse_numeric, CellPosition, FieldValue, SortDirection, SortSpec};
