// ==========================================
// 宝石库存表格管理 - 应用层
// ==========================================
// 职责: 装配各层组件，供外部展示层持有
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
