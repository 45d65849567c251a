// ==========================================
// 宝石库存表格管理 - 表头映射表
// ==========================================
// 职责: 外部列名（多种拼写）→ 规范字段，多对一
// 说明: 未匹配的列直接忽略，不视为错误
// ==========================================

use crate::config::{DuplicateHeaderPolicy, HeaderMatchPolicy};
use crate::domain::field::Field;
use std::collections::HashMap;
use tracing::debug;

/// 表头拼写 → 规范字段
const HEADER_ALIASES: &[(&str, Field)] = &[
    ("Seller ID", Field::SellerId),
    ("Product ID", Field::ProductId),
    ("Shape", Field::Shape),
    ("Carat", Field::Carat),
    ("Color", Field::Color),
    ("Clarity", Field::Clarity),
    ("Cut", Field::Cut),
    ("Polish", Field::Polish),
    ("Symmetry", Field::Symmetry),
    ("Fluorescence", Field::Fluorescence),
    ("Laboratory", Field::Laboratory),
    ("Certificate Number", Field::CertificateNumber),
    ("Certificate #", Field::CertificateNumber),
    ("Measurements", Field::Measurements),
    ("Depth %", Field::DepthPercentage),
    ("Depth Percentage", Field::DepthPercentage),
    ("Table %", Field::TablePercentage),
    ("Table Percentage", Field::TablePercentage),
    ("Price/Carat", Field::PricePerCarat),
    ("Price Per Carat", Field::PricePerCarat),
    ("Total Price", Field::TotalPrice),
    ("Growth Type", Field::GrowthType),
    ("Fancy Color", Field::FancyColor),
    ("FC Intensity", Field::FancyColorIntensity),
    ("Fancy Color Intensity", Field::FancyColorIntensity),
    ("FC Overtone", Field::FancyColorOvertone),
    ("Fancy Color Overtone", Field::FancyColorOvertone),
    ("Eye Clean", Field::EyeClean),
    ("Seller Name", Field::SellerName),
    ("Seller Company", Field::SellerCompany),
    ("Seller Location", Field::SellerLocation),
    ("Seller Phone", Field::SellerPhone),
    ("Seller WhatsApp", Field::SellerWhatsapp),
    ("Seller Email", Field::SellerEmail),
    ("Video URL", Field::VideoUrl),
    ("Image URL", Field::ImageUrl),
    ("Certificate URL", Field::CertificateUrl),
];

// ==========================================
// ColumnBinding - 已映射列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBinding {
    pub column: usize,
    pub field: Field,
}

// ==========================================
// HeaderMappingTable - 表头映射表
// ==========================================
#[derive(Debug, Clone)]
pub struct HeaderMappingTable {
    match_policy: HeaderMatchPolicy,
    duplicate_policy: DuplicateHeaderPolicy,
    aliases: HashMap<String, Field>,
}

impl HeaderMappingTable {
    pub fn new(match_policy: HeaderMatchPolicy, duplicate_policy: DuplicateHeaderPolicy) -> Self {
        let aliases = HEADER_ALIASES
            .iter()
            .map(|(header, field)| (Self::key(match_policy, header), *field))
            .collect();

        Self {
            match_policy,
            duplicate_policy,
            aliases,
        }
    }

    /// 查找列名对应的规范字段
    pub fn resolve(&self, header: &str) -> Option<Field> {
        self.aliases
            .get(&Self::key(self.match_policy, header))
            .copied()
    }

    /// 映射整行表头
    ///
    /// # 返回
    /// - 每个规范字段至多绑定一列，按列序排列
    ///
    /// # 规则
    /// - last_wins: 从左到右覆盖，同一字段取最后一个匹配列
    /// - first_wins: 同一字段取第一个匹配列
    pub fn bind_columns(&self, headers: &[String]) -> Vec<ColumnBinding> {
        let mut by_field: HashMap<Field, usize> = HashMap::new();

        for (column, header) in headers.iter().enumerate() {
            let Some(field) = self.resolve(header) else {
                debug!(column, header = %header, "未识别的列名，忽略");
                continue;
            };

            match self.duplicate_policy {
                DuplicateHeaderPolicy::LastWins => {
                    by_field.insert(field, column);
                }
                DuplicateHeaderPolicy::FirstWins => {
                    by_field.entry(field).or_insert(column);
                }
            }
        }

        let mut bindings: Vec<ColumnBinding> = by_field
            .into_iter()
            .map(|(field, column)| ColumnBinding { column, field })
            .collect();
        bindings.sort_by_key(|b| b.column);
        bindings
    }

    fn key(policy: HeaderMatchPolicy, header: &str) -> String {
        match policy {
            HeaderMatchPolicy::Exact => header.to_string(),
            HeaderMatchPolicy::Normalized => header
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase(),
        }
    }
}

impl Default for HeaderMappingTable {
    fn default() -> Self {
        Self::new(HeaderMatchPolicy::Exact, DuplicateHeaderPolicy::LastWins)
    }
}
