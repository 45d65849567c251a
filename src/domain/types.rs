// ==========================================
// 宝石库存表格管理 - 领域类型定义
// ==========================================
// 职责: 单元格值、排序规格、编辑光标位置
// ==========================================

use crate::domain::field::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// FieldValue - 单元格值
// ==========================================
// 红线: 数值字段只能持有 Number，文本/下拉字段只能持有 Text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// 字段类型默认值（数值 → 0，文本 → 空串）
    pub fn default_for(field: Field) -> Self {
        if field.is_numeric() {
            FieldValue::Number(0.0)
        } else {
            FieldValue::Text(String::new())
        }
    }

    /// 按字段类型强制转换原始文本（数值解析失败回落 0）
    pub fn coerce(field: Field, raw: &str) -> Self {
        if field.is_numeric() {
            FieldValue::Number(parse_numeric(raw).unwrap_or(0.0))
        } else {
            FieldValue::Text(raw.to_string())
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// 解析浮点数（去除首尾空白，只接受有限值）
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

// ==========================================
// 排序规格
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortSpec {
    /// 三态循环: 未排序 → 升序 → 降序 → 未排序；切换到其他列时重置为升序
    pub fn cycle(current: Option<SortSpec>, field: Field) -> Option<SortSpec> {
        match current {
            Some(spec) if spec.field == field => match spec.direction {
                SortDirection::Asc => Some(SortSpec {
                    field,
                    direction: SortDirection::Desc,
                }),
                SortDirection::Desc => None,
            },
            _ => Some(SortSpec {
                field,
                direction: SortDirection::Asc,
            }),
        }
    }
}

// ==========================================
// CellPosition - 编辑光标
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    pub record_id: String,
    pub field: Field,
}

impl CellPosition {
    pub fn new(record_id: impl Into<String>, field: Field) -> Self {
        Self {
            record_id: record_id.into(),
            field,
        }
    }
}
