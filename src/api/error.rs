// ==========================================
// 宝石库存表格管理 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为面向操作员的错误消息
// 红线: 错误信息必须包含出错的值或标识
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::{GridError, UploadFailure};
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 导入错误
    // ==========================================
    /// 载荷不是有效的表格文档
    #[error("文件无法读取: {0}")]
    Unreadable(String),

    /// 表格没有数据行
    #[error("表格中没有数据行")]
    EmptySheet,

    #[error("已有导入任务正在进行")]
    ImportInProgress,

    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 表格操作错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("单元格正忙: {0}")]
    CellBusy(String),

    // ==========================================
    // 附件上传错误
    // ==========================================
    #[error(transparent)]
    UploadFailed(#[from] UploadFailure),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Unreadable(msg) => ApiError::Unreadable(msg),
            ImportError::Empty => ApiError::EmptySheet,
            ImportError::ImportInProgress => ApiError::ImportInProgress,
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件 {}", path)),
            ImportError::UnsupportedFormat(ext) => {
                ApiError::InvalidInput(format!("不支持的文件格式: {}", ext))
            }
            ImportError::ConfigError(e) => ApiError::ConfigError(e.to_string()),
            ImportError::Internal(msg) => ApiError::InternalError(msg),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 GridError 转换
// ==========================================
impl From<GridError> for ApiError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::RecordNotFound(id) => ApiError::NotFound(format!("记录 {}", id)),
            GridError::Upload(failure) => ApiError::UploadFailed(failure),
            GridError::CellBusy { .. } | GridError::UploadInProgress { .. } => {
                ApiError::CellBusy(err.to_string())
            }
            other => ApiError::InvalidInput(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
