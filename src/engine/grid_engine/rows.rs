// ==========================================
// 批量行操作: 新增 / 删除 / 复制 / 剪贴板 / 保存 / 导入落表
// ==========================================

use super::core::{EditSession, GridEngine};
use crate::config::ImportApplyMode;
use crate::domain::import::ImportResult;
use crate::domain::record::InventoryRecord;
use crate::domain::types::CellPosition;
use crate::engine::error::GridNotice;
use std::collections::HashSet;
use tracing::{info, instrument};

impl GridEngine {
    /// 新增一行（置顶）并在首个可导航列打开光标
    #[instrument(skip(self))]
    pub fn add_row(&mut self) -> GridNotice {
        self.blur();
        let notice = self.add_rows(1);

        if let Some(record) = self.store.records().first() {
            let id = record.id.clone();
            let visible = self.view().iter().any(|r| r.id == id);
            if let (true, Some(field)) = (visible, self.navigable_columns().first().copied()) {
                self.cursor = Some(EditSession::open(CellPosition::new(id, field)));
            }
        }
        notice
    }

    /// 新增 N 行空白记录（置顶），业务编号连续且不与现有冲突
    #[instrument(skip(self))]
    pub fn add_rows(&mut self, count: usize) -> GridNotice {
        let business_ids = self.ids.next_business_ids(self.store.product_ids(), count);
        let records: Vec<InventoryRecord> = business_ids
            .into_iter()
            .map(|product_id| {
                let mut record = InventoryRecord::blank(self.ids.record_id());
                record.product_id = product_id;
                record
            })
            .collect();

        self.dirty.extend(records.iter().map(|r| r.id.clone()));
        self.store.prepend(records);

        info!(count, "新增空白行");
        GridNotice::RowsAdded { count }
    }

    /// 删除选中记录；选择为空时无操作
    #[instrument(skip(self))]
    pub fn delete_selected(&mut self) -> GridNotice {
        if self.selection.is_empty() {
            return GridNotice::NothingSelected;
        }

        let selected = std::mem::take(&mut self.selection);
        let count = self.store.remove_ids(&selected);
        for id in &selected {
            self.dirty.remove(id);
        }
        self.prune_dangling();

        info!(count, "删除选中行");
        GridNotice::RowsDeleted { count }
    }

    /// 复制选中记录为新记录（置顶），完成后清空选择
    #[instrument(skip(self))]
    pub fn duplicate_selected(&mut self) -> GridNotice {
        if self.selection.is_empty() {
            return GridNotice::NothingSelected;
        }

        let sources = self.store.snapshot_of(&self.selection);
        let count = self.prepend_fresh_copies(&sources);
        self.selection.clear();

        info!(count, "复制选中行");
        GridNotice::RowsDuplicated { count }
    }

    /// 值拷贝选中记录到剪贴板（与后续修改无关）
    pub fn copy_selected(&mut self) -> GridNotice {
        if self.selection.is_empty() {
            return GridNotice::NothingSelected;
        }

        self.clipboard = self.store.snapshot_of(&self.selection);
        let count = self.clipboard.len();
        info!(count, "复制到剪贴板");
        GridNotice::RowsCopied { count }
    }

    /// 粘贴剪贴板记录为新记录（置顶）；剪贴板保留
    #[instrument(skip(self))]
    pub fn paste(&mut self) -> GridNotice {
        if self.clipboard.is_empty() {
            return GridNotice::ClipboardEmpty;
        }

        let sources = self.clipboard.clone();
        let count = self.prepend_fresh_copies(&sources);
        info!(count, "粘贴剪贴板");
        GridNotice::RowsPasted { count }
    }

    /// 保存：返回未保存记录的快照，并原子清空未保存集合
    #[instrument(skip(self))]
    pub fn save(&mut self) -> Vec<InventoryRecord> {
        self.blur();
        let saved = self.store.snapshot_of(&self.dirty);
        self.dirty.clear();
        info!(count = saved.len(), "保存修改");
        saved
    }

    /// 将导入结果写入记录仓（单次原子更新）
    ///
    /// # 参数
    /// - mode: Replace 替换全部记录 / Prepend 置顶追加
    #[instrument(skip(self, result), fields(rows = result.total_rows, errors = result.error_count))]
    pub fn apply_import(&mut self, result: ImportResult, mode: ImportApplyMode) -> GridNotice {
        self.blur();
        let errors = result.error_count;
        let mut records = result.records;

        match mode {
            ImportApplyMode::Replace => {
                self.store.replace_all(Vec::new());
            }
            ImportApplyMode::Prepend => {
                // 同一毫秒内的两次导入可能产生相同标识
                for record in records.iter_mut() {
                    if self.store.contains(&record.id) {
                        record.id = self.ids.record_id();
                    }
                }
            }
        }

        let count = records.len();
        self.dirty.extend(records.iter().map(|r| r.id.clone()));
        self.store.prepend(records);
        self.prune_dangling();

        info!(count, errors, mode = %mode, "导入结果已写入表格");
        GridNotice::RowsImported { count, errors }
    }

    /// 以新标识、新业务编号克隆记录并置顶
    fn prepend_fresh_copies(&mut self, sources: &[InventoryRecord]) -> usize {
        let business_ids = self
            .ids
            .next_business_ids(self.store.product_ids(), sources.len());

        let copies: Vec<InventoryRecord> = sources
            .iter()
            .zip(business_ids)
            .map(|(source, product_id)| source.duplicate_as(self.ids.record_id(), product_id))
            .collect();

        let new_ids: HashSet<String> = copies.iter().map(|r| r.id.clone()).collect();
        self.dirty.extend(new_ids);
        let count = copies.len();
        self.store.prepend(copies);
        count
    }
}
