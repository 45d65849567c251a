// ==========================================
// 宝石库存表格管理 - 附件上传忙碌跟踪
// ==========================================
// 职责: 记录在途上传的 (记录, 字段) 键
// 红线: 同一键至多一个在途上传；与记录数据分离存放
// ==========================================

use crate::domain::field::Field;
use std::collections::HashSet;

/// 在途上传凭据，由 begin_upload 发放、finish_upload 回收
#[derive(Debug, PartialEq, Eq)]
pub struct UploadTicket {
    record_id: String,
    field: Field,
}

impl UploadTicket {
    pub(crate) fn new(record_id: String, field: Field) -> Self {
        Self { record_id, field }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn field(&self) -> Field {
        self.field
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    busy: HashSet<(String, Field)>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试占用，已占用返回 false
    pub fn try_begin(&mut self, record_id: &str, field: Field) -> bool {
        self.busy.insert((record_id.to_string(), field))
    }

    /// 释放占用，返回之前是否占用
    pub fn finish(&mut self, record_id: &str, field: Field) -> bool {
        self.busy.remove(&(record_id.to_string(), field))
    }

    pub fn is_busy(&self, record_id: &str, field: Field) -> bool {
        self.busy.contains(&(record_id.to_string(), field))
    }

    pub fn in_flight(&self) -> usize {
        self.busy.len()
    }
}
