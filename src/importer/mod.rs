// ==========================================
// 宝石库存表格管理 - 导入层
// ==========================================
// 职责: 外部表格 → 库存记录 + 校验错误报告
// 支持: Excel 系列表格文档, CSV
// ==========================================

// 模块声明
pub mod cell_validator;
pub mod error;
pub mod file_parser;
pub mod header_mapping;
pub mod inventory_importer_impl;
pub mod inventory_importer_trait;

// 重导出核心类型
pub use cell_validator::FieldValidator;
pub use error::{ImportError, ImporterResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use header_mapping::{ColumnBinding, HeaderMappingTable};
pub use inventory_importer_impl::InventoryImporterImpl;

// 重导出 Trait 接口
pub use inventory_importer_trait::{CellGrid, CellValidator, FileParser, InventoryImporter};
