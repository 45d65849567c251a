// ==========================================
// 宝石库存表格管理 - 附件上传协作者
// ==========================================
// 职责: 接收 (记录, 字段, 文件)，异步返回引用地址
// 说明: 核心把上传视为不透明的外部调用
// ==========================================

use crate::domain::field::Field;
use crate::engine::error::UploadFailure;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// 待上传文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

// ==========================================
// AttachmentUploader Trait
// ==========================================
#[async_trait]
pub trait AttachmentUploader: Send + Sync {
    /// 上传附件
    ///
    /// # 返回
    /// - Ok(String): URL 形式的引用地址
    /// - Err(UploadFailure): 上传失败
    async fn upload(
        &self,
        record_id: &str,
        field: Field,
        file: AttachmentFile,
    ) -> Result<String, UploadFailure>;
}

// ==========================================
// GeneratedReferenceUploader - 本地生成引用地址
// ==========================================
// 不做网络传输，按 {base}/{field}/{record_id}/{uuid}-{file_name} 生成地址
#[derive(Debug, Clone)]
pub struct GeneratedReferenceUploader {
    base_url: String,
}

impl GeneratedReferenceUploader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn sanitize(file_name: &str) -> String {
        file_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }
}

#[async_trait]
impl AttachmentUploader for GeneratedReferenceUploader {
    async fn upload(
        &self,
        record_id: &str,
        field: Field,
        file: AttachmentFile,
    ) -> Result<String, UploadFailure> {
        if file.bytes.is_empty() {
            return Err(UploadFailure::new(
                record_id,
                field,
                format!("文件 {} 为空", file.file_name),
            ));
        }

        let reference = format!(
            "{}/{}/{}/{}-{}",
            self.base_url,
            field.as_str(),
            record_id,
            Uuid::new_v4(),
            Self::sanitize(&file.file_name)
        );
        debug!(record_id = %record_id, field = %field, reference = %reference, "生成附件引用地址");
        Ok(reference)
    }
}
