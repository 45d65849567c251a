// ==========================================
// 宝石库存表格管理 - 引擎层
// ==========================================
// 职责: 记录仓、派生视图、表格交互状态机
// 红线: 引擎只做内存状态变更，不做持久化与渲染
// ==========================================

pub mod column_layout;
pub mod derived_view;
pub mod error;
pub mod grid_engine;
pub mod id_generator;
pub mod navigation;
pub mod record_store;
pub mod upload_tracker;

// 重导出核心引擎
pub use column_layout::{ColumnConfig, ColumnLayout};
pub use derived_view::{compute_view, ViewQuery};
pub use error::{GridError, GridNotice, GridResult, UploadFailure};
pub use grid_engine::{EditSession, EditorKind, GridEngine};
pub use id_generator::IdGenerator;
pub use navigation::{navigable_fields, next_position, NavigationKey};
pub use record_store::RecordStore;
pub use upload_tracker::{UploadTicket, UploadTracker};
