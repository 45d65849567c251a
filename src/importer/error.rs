// ==========================================
// 宝石库存表格管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 导入级错误中止整次导入，单元格校验错误只收集不抛出
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.xlsm/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    /// 载荷不是有效的表格文档
    #[error("表格解析失败: {0}")]
    Unreadable(String),

    /// 缺少表头行或数据行
    #[error("表格至少需要包含表头行和一行数据")]
    Empty,

    // ===== 并发控制 =====
    #[error("已有导入任务正在进行，请等待其完成")]
    ImportInProgress,

    // ===== 配置错误 =====
    #[error("导入配置读取失败: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    Internal(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Unreadable(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Unreadable(err.to_string())
    }
}

/// Result 类型别名
pub type ImporterResult<T> = Result<T, ImportError>;
