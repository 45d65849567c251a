// ==========================================
// 宝石库存表格管理 - 记录仓
// ==========================================
// 职责: 持有权威记录序列（新增/复制/粘贴的记录在最前）
// 红线: 只由表格引擎同步修改
// ==========================================

use crate::domain::record::InventoryRecord;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<InventoryRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<InventoryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&InventoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut InventoryRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.product_id.as_str())
    }

    /// 批量插入到最前，保持入参内部顺序
    pub fn prepend(&mut self, records: Vec<InventoryRecord>) {
        self.records.splice(0..0, records);
    }

    /// 删除指定标识的记录
    ///
    /// # 返回
    /// 实际删除条数
    pub fn remove_ids(&mut self, ids: &HashSet<String>) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        before - self.records.len()
    }

    pub fn replace_all(&mut self, records: Vec<InventoryRecord>) {
        self.records = records;
    }

    /// 按存储顺序克隆指定记录
    pub fn snapshot_of(&self, ids: &HashSet<String>) -> Vec<InventoryRecord> {
        self.records
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect()
    }
}
