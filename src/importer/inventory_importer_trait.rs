// ==========================================
// 宝石库存表格管理 - 库存导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::field::Field;
use crate::domain::import::ImportResult;
use crate::importer::error::ImporterResult;
use std::path::Path;

/// 解码后的表格：行 × 单元格文本（已去除首尾空白）
pub type CellGrid = Vec<Vec<String>>;

// ==========================================
// InventoryImporter Trait
// ==========================================
// 用途: 库存导入主接口
// 实现者: InventoryImporterImpl
pub trait InventoryImporter: Send + Sync {
    /// 从表格文档字节导入库存记录
    ///
    /// # 参数
    /// - bytes: 表格文档内容（仅读取第一个工作表）
    ///
    /// # 返回
    /// - Ok(ImportResult): 记录 + 校验错误报告
    /// - Err(ImportError::Unreadable): 载荷无法解码
    /// - Err(ImportError::Empty): 缺少表头行或数据行
    ///
    /// # 导入流程
    /// 1. 解码为单元格网格
    /// 2. 表头映射
    /// 3. 逐行建记录 + 逐格校验
    /// 4. 汇总导入结果
    fn import(&self, bytes: &[u8]) -> ImporterResult<ImportResult>;

    /// 从文件导入（按扩展名选择解码器）
    fn import_file(&self, file_path: &Path) -> ImporterResult<ImportResult>;

    /// 从已解码的单元格网格建立导入结果（阶段 2-4）
    fn import_grid(&self, grid: CellGrid) -> ImporterResult<ImportResult>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解码接口（阶段 1）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 将文档字节解码为单元格网格
    ///
    /// # 返回
    /// - Ok(CellGrid): 第 0 行为表头行
    /// - Err(ImportError::Unreadable): 解码失败或结构缺失
    fn parse_bytes(&self, bytes: &[u8]) -> ImporterResult<CellGrid>;
}

// ==========================================
// CellValidator Trait
// ==========================================
// 用途: 单元格校验接口（阶段 3）
// 实现者: FieldValidator
pub trait CellValidator: Send + Sync {
    /// 判断原始文本对该字段是否有效（纯函数，无副作用）
    fn validate(&self, field: Field, raw_value: &str) -> bool;

    /// 生成面向操作员的错误描述
    ///
    /// # 参数
    /// - header: 源文件中的列名（原样展示）
    fn describe_violation(&self, field: Field, raw_value: &str, header: &str) -> String;
}
