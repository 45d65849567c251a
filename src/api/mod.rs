// ==========================================
// 宝石库存表格管理 - API 层
// ==========================================
// 职责: 提供异步业务接口，供外部展示层调用
// ==========================================

pub mod attachment_uploader;
pub mod error;
pub mod inventory_api;

// 重导出核心类型
pub use attachment_uploader::{AttachmentFile, AttachmentUploader, GeneratedReferenceUploader};
pub use error::{ApiError, ApiResult};
pub use inventory_api::{
    AttachmentRequest, ImportState, ImportStatus, InventoryApi, SaveResponse,
};
