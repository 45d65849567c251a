// ==========================================
// 宝石库存表格管理 - 导入结果领域模型
// ==========================================
// 用途: 导入管道产出，交由调用方展示并写入记录仓
// 生命周期: 产出后不可变
// ==========================================

use crate::domain::field::Field;
use crate::domain::record::InventoryRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// ValidationError - 单元格校验错误
// ==========================================
// 不阻断导入，仅收集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub row: usize, // 表格行号（1 起，含表头行）
    pub field: Field,
    pub value: String, // 原始单元格文本
    pub message: String,
}

// ==========================================
// ImportResult - 导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub records: Vec<InventoryRecord>,
    pub total_rows: usize,  // 实际产出记录数（跳过的空行不计）
    pub error_count: usize, // 无效单元格事件总数（非去重行数）
    pub errors: Vec<ValidationError>,
}

impl ImportResult {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// 指定表格行的全部错误
    pub fn errors_for_row(&self, row: usize) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.row == row).collect()
    }

    /// 出现过错误的字段集合
    pub fn error_fields(&self) -> BTreeSet<Field> {
        self.errors.iter().map(|e| e.field).collect()
    }

    /// 面向操作员的汇总文案
    pub fn summary_message(&self) -> String {
        format!(
            "已处理 {} 行，{} 个字段需要修正",
            self.total_rows, self.error_count
        )
    }
}
