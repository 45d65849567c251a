// ==========================================
// 宝石库存表格管理 - 核心库
// ==========================================
// 职责: 表格导入校验管道 + 交互式表格引擎
// 系统定位: 会话内存中的库存编辑（持久化由外部协作者负责）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 字段表、记录、导入结果
pub mod domain;

// 导入层 - 外部表格
pub mod importer;

// 引擎层 - 记录仓、派生视图、表格交互
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组件装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellPosition, Field, FieldKind, FieldValue, ImportResult, InventoryRecord, SortDirection,
    SortSpec, ValidationError,
};

// 导入
pub use importer::{ImportError, InventoryImporter, InventoryImporterImpl};

// 引擎
pub use engine::{GridEngine, GridError, GridNotice, NavigationKey, UploadFailure, ViewQuery};

// API
pub use api::{ApiError, InventoryApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "宝石库存表格管理";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
