// ==========================================
// 宝石库存表格管理 - 配置层
// ==========================================
// 职责: 系统配置管理（导入策略、业务编号、附件地址）
// 存储: 进程内 key-value，可从 JSON 文件加载
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager};
pub use import_config_trait::{
    DuplicateHeaderPolicy, HeaderMatchPolicy, ImportApplyMode, ImportConfigReader, ImportPolicy,
};
