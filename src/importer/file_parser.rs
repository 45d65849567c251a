// ==========================================
// 宝石库存表格管理 - 文件解析器实现
// ==========================================
// 职责: 文档字节 → 单元格网格（阶段 1）
// 支持: 表格文档 (.xlsx/.xls/.xlsm/.ods) / CSV (.csv)
// 红线: 只读第一个工作表；单元格一律去除首尾空白
// ==========================================

use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::inventory_importer_trait::{CellGrid, FileParser};
use calamine::{open_workbook_auto_from_rs, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "ods"];

// ==========================================
// Excel Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImporterResult<CellGrid> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::Unreadable("文档中没有工作表".to_string()))??;

        let grid: CellGrid = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
            .collect();

        debug!(rows = grid.len(), "工作表解码完成");
        Ok(grid)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImporterResult<CellGrid> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头行由导入器统一处理
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let mut grid = CellGrid::new();
        for result in reader.records() {
            let record = result?;
            grid.push(record.iter().map(|value| value.trim().to_string()).collect());
        }

        debug!(rows = grid.len(), "CSV 解码完成");
        Ok(grid)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 按扩展名选择解码器并读取文件
    ///
    /// # 返回
    /// - Err(FileNotFound): 路径不存在
    /// - Err(UnsupportedFormat): 扩展名不在支持列表中
    pub fn parse_path<P: AsRef<Path>>(&self, file_path: P) -> ImporterResult<CellGrid> {
        let path = file_path.as_ref();

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = Self::extension_of(path);
        let parser: Box<dyn FileParser> = if ext == "csv" {
            Box::new(CsvParser)
        } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
            Box::new(ExcelParser)
        } else {
            return Err(ImportError::UnsupportedFormat(ext));
        };

        let bytes = std::fs::read(path)?;
        parser.parse_bytes(&bytes)
    }

    /// 是否为受支持的表格文档扩展名（不含 CSV）
    pub fn is_spreadsheet(path: &Path) -> bool {
        SPREADSHEET_EXTENSIONS.contains(&Self::extension_of(path).as_str())
    }

    fn extension_of(path: &Path) -> String {
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}
