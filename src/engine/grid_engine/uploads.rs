// ==========================================
// 附件字段上传: 占用 → 外部上传 → 回填
// ==========================================

use super::core::GridEngine;
use crate::domain::field::Field;
use crate::domain::types::FieldValue;
use crate::engine::error::{GridError, GridResult, UploadFailure};
use crate::engine::upload_tracker::UploadTicket;
use tracing::{info, warn};

impl GridEngine {
    /// 开始附件上传，占用 (记录, 字段)
    ///
    /// # 返回
    /// - Err(NotAnAttachmentField): 非附件字段
    /// - Err(RecordNotFound): 记录不存在
    /// - Err(UploadInProgress): 同一单元格已有上传在途
    pub fn begin_upload(&mut self, record_id: &str, field: Field) -> GridResult<UploadTicket> {
        if !field.is_attachment() {
            return Err(GridError::NotAnAttachmentField(field));
        }
        if !self.store.contains(record_id) {
            return Err(GridError::RecordNotFound(record_id.to_string()));
        }
        if !self.uploads.try_begin(record_id, field) {
            return Err(GridError::UploadInProgress {
                record_id: record_id.to_string(),
                field,
            });
        }

        info!(record_id = %record_id, field = %field, "附件上传开始");
        Ok(UploadTicket::new(record_id.to_string(), field))
    }

    /// 结束附件上传（无论成功失败都释放占用）
    ///
    /// # 参数
    /// - outcome: Ok(引用地址) 写入字段并标记未保存；Err 保留原值
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        outcome: Result<String, UploadFailure>,
    ) -> GridResult<()> {
        let record_id = ticket.record_id();
        let field = ticket.field();
        self.uploads.finish(record_id, field);

        let reference = match outcome {
            Ok(reference) => reference,
            Err(failure) => {
                warn!(record_id = %record_id, field = %field, reason = %failure.reason, "附件上传失败");
                return Err(GridError::Upload(failure));
            }
        };

        let record = self
            .store
            .get_mut(record_id)
            .ok_or_else(|| GridError::RecordNotFound(record_id.to_string()))?;
        record.set(field, FieldValue::Text(reference));
        record.set_invalid(field, false);
        self.dirty.insert(record_id.to_string());

        info!(record_id = %record_id, field = %field, "附件上传完成");
        Ok(())
    }

    /// 放弃在途上传：只释放占用，字段保留原值
    pub fn abandon_upload(&mut self, ticket: UploadTicket) {
        let record_id = ticket.record_id();
        let field = ticket.field();
        if self.uploads.finish(record_id, field) {
            warn!(record_id = %record_id, field = %field, "附件上传被中途放弃，释放占用");
        }
    }
}
