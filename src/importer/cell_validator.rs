// ==========================================
// 宝石库存表格管理 - 单元格校验器实现
// ==========================================
// 职责: 按字段能力判断原始文本是否有效
// 规则:
// - 空值/纯空白 → 有效（字段均为可选）
// - 下拉字段 → 去空白后须精确（区分大小写）命中候选集
// - 邮箱 / 电话字段 → 须匹配对应格式
// - 数值字段 → 须可解析为浮点数
// - 其他字段 → 恒有效
// ==========================================

use crate::domain::field::{Field, FieldKind};
use crate::domain::types::parse_numeric;
use crate::importer::inventory_importer_trait::CellValidator;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("邮箱正则应可编译")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("电话正则应可编译"));

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }
}

impl CellValidator for FieldValidator {
    fn validate(&self, field: Field, raw_value: &str) -> bool {
        let value = raw_value.trim();
        if value.is_empty() {
            return true;
        }

        match field.kind() {
            FieldKind::Enumerated(allowed) => allowed.iter().any(|option| *option == value),
            FieldKind::Numeric => parse_numeric(value).is_some(),
            FieldKind::Text => match field {
                Field::SellerEmail => EMAIL_PATTERN.is_match(value),
                Field::SellerPhone | Field::SellerWhatsapp => PHONE_PATTERN.is_match(value),
                _ => true,
            },
        }
    }

    fn describe_violation(&self, field: Field, raw_value: &str, header: &str) -> String {
        match field.kind() {
            FieldKind::Enumerated(_) => {
                format!("无效值 \"{}\"（列 {}）: 不在候选值列表中", raw_value, header)
            }
            FieldKind::Numeric => {
                format!("无效值 \"{}\"（列 {}）: 无法解析为数字", raw_value, header)
            }
            FieldKind::Text => match field {
                Field::SellerEmail => {
                    format!("无效值 \"{}\"（列 {}）: 邮箱格式错误", raw_value, header)
                }
                Field::SellerPhone | Field::SellerWhatsapp => {
                    format!("无效值 \"{}\"（列 {}）: 电话格式错误", raw_value, header)
                }
                _ => format!("无效值 \"{}\"（列 {}）", raw_value, header),
            },
        }
    }
}
