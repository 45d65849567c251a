// ==========================================
// 宝石库存表格管理 - 库存导入器实现
// ==========================================
// 职责: 整合导入流程，从文档字节到导入结果
// 流程: 解码 → 表头映射 → 逐行建记录 → 逐格校验 → 汇总
// 红线: 导入级错误中止整次导入；单元格错误只标记、置默认值并收集
// ==========================================

use crate::config::ImportPolicy;
use crate::domain::import::{ImportResult, ValidationError};
use crate::domain::record::InventoryRecord;
use crate::domain::types::FieldValue;
use crate::importer::cell_validator::FieldValidator;
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::file_parser::{ExcelParser, UniversalFileParser};
use crate::importer::header_mapping::HeaderMappingTable;
use crate::importer::inventory_importer_trait::{
    CellGrid, CellValidator, FileParser, InventoryImporter,
};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

// ==========================================
// InventoryImporterImpl - 库存导入器实现
// ==========================================
pub struct InventoryImporterImpl {
    // 导入组件
    file_parser: Box<dyn FileParser>,
    header_table: HeaderMappingTable,
    validator: Box<dyn CellValidator>,

    // 启动时读取的策略快照
    policy: ImportPolicy,
}

impl InventoryImporterImpl {
    /// 创建新的 InventoryImporter 实例
    ///
    /// # 参数
    /// - file_parser: 表格文档解码器
    /// - validator: 单元格校验器
    /// - policy: 导入策略（表头匹配、空行、默认卖家编号等）
    pub fn new(
        file_parser: Box<dyn FileParser>,
        validator: Box<dyn CellValidator>,
        policy: ImportPolicy,
    ) -> Self {
        let header_table = HeaderMappingTable::new(policy.header_match, policy.duplicate_header);
        Self {
            file_parser,
            header_table,
            validator,
            policy,
        }
    }

    /// 使用默认组件（ExcelParser + FieldValidator）
    pub fn with_policy(policy: ImportPolicy) -> Self {
        Self::new(Box::new(ExcelParser), Box::new(FieldValidator::new()), policy)
    }

    pub fn policy(&self) -> &ImportPolicy {
        &self.policy
    }

    /// 由数据行序号生成业务编号（1 起，左侧补零）
    fn business_id(&self, row_index: usize) -> String {
        format!(
            "{:0width$}",
            row_index + 1,
            width = self.policy.business_id_width
        )
    }

    fn is_blank_row(row: &[String]) -> bool {
        row.iter().all(|cell| cell.trim().is_empty())
    }
}

impl Default for InventoryImporterImpl {
    fn default() -> Self {
        Self::with_policy(ImportPolicy::default())
    }
}

impl InventoryImporter for InventoryImporterImpl {
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    fn import(&self, bytes: &[u8]) -> ImporterResult<ImportResult> {
        info!("开始导入库存表格");

        // === 步骤 1: 解码 ===
        debug!("步骤 1: 解码表格文档");
        let grid = self.file_parser.parse_bytes(bytes).map_err(|e| {
            warn!(error = %e, "表格解码失败");
            e
        })?;

        self.import_grid(grid)
    }

    #[instrument(skip(self))]
    fn import_file(&self, file_path: &Path) -> ImporterResult<ImportResult> {
        info!(file_path = %file_path.display(), "开始导入库存文件");
        let grid = UniversalFileParser.parse_path(file_path)?;
        self.import_grid(grid)
    }

    #[instrument(skip(self, grid), fields(rows = grid.len()))]
    fn import_grid(&self, grid: CellGrid) -> ImporterResult<ImportResult> {
        if grid.len() < 2 {
            warn!(rows = grid.len(), "缺少表头行或数据行");
            return Err(ImportError::Empty);
        }

        let mut rows = grid.into_iter();
        let headers = rows.next().ok_or(ImportError::Empty)?;

        // === 步骤 2: 表头映射 ===
        let bindings = self.header_table.bind_columns(&headers);
        debug!(mapped_columns = bindings.len(), total_columns = headers.len(), "表头映射完成");

        // === 步骤 3: 逐行建记录 + 校验 ===
        let timestamp = Utc::now().timestamp_millis();
        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut skipped = 0usize;

        for (row_index, row) in rows.enumerate() {
            if self.policy.skip_blank_rows && Self::is_blank_row(&row) {
                skipped += 1;
                continue;
            }

            let mut record = InventoryRecord::blank(format!("imported_{}_{}", timestamp, row_index));
            record.product_id = self.business_id(row_index);
            record.seller_id = self.policy.default_seller_id.clone();

            for binding in &bindings {
                let raw = match row.get(binding.column) {
                    Some(cell) if !cell.trim().is_empty() => cell.trim(),
                    _ => continue,
                };

                if self.validator.validate(binding.field, raw) {
                    record.set(binding.field, FieldValue::coerce(binding.field, raw));
                } else {
                    let header = headers
                        .get(binding.column)
                        .map(String::as_str)
                        .unwrap_or_else(|| binding.field.label());
                    record.reset(binding.field);
                    record.set_invalid(binding.field, true);
                    errors.push(ValidationError {
                        row: row_index + 2,
                        field: binding.field,
                        value: raw.to_string(),
                        message: self.validator.describe_violation(binding.field, raw, header),
                    });
                }
            }

            records.push(record);
        }

        // === 步骤 4: 汇总 ===
        let result = ImportResult {
            total_rows: records.len(),
            error_count: errors.len(),
            records,
            errors,
        };

        info!(
            rows = result.total_rows,
            errors = result.error_count,
            skipped_blank_rows = skipped,
            "库存导入完成"
        );
        Ok(result)
    }
}
