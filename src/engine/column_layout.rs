// ==========================================
// 宝石库存表格管理 - 列展示配置
// ==========================================
// 职责: 按字段维护可见性与自定义列名（展示层覆盖）
// 红线: 不修改字段表、不改变规范字段顺序与校验行为
// ==========================================

use crate::domain::field::Field;
use serde::{Deserialize, Serialize};

/// 默认隐藏的列
const HIDDEN_BY_DEFAULT: [Field; 4] = [
    Field::SellerWhatsapp,
    Field::VideoUrl,
    Field::ImageUrl,
    Field::CertificateUrl,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub field: Field,
    pub visible: bool,
    pub label_override: Option<String>,
}

impl ColumnConfig {
    /// 展示名（有覆盖用覆盖，否则用字段表中的标签）
    pub fn display_label(&self) -> &str {
        self.label_override
            .as_deref()
            .unwrap_or_else(|| self.field.label())
    }
}

// ==========================================
// ColumnLayout - 列布局（规范字段顺序）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    columns: Vec<ColumnConfig>,
}

impl ColumnLayout {
    /// 全部列可见
    pub fn all_visible() -> Self {
        Self {
            columns: Field::ALL
                .iter()
                .map(|field| ColumnConfig {
                    field: *field,
                    visible: true,
                    label_override: None,
                })
                .collect(),
        }
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    /// 可见字段（规范顺序）
    pub fn visible_fields(&self) -> Vec<Field> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.field)
            .collect()
    }

    pub fn is_visible(&self, field: Field) -> bool {
        self.config(field).map(|c| c.visible).unwrap_or(false)
    }

    pub fn set_visible(&mut self, field: Field, visible: bool) {
        if let Some(column) = self.config_mut(field) {
            column.visible = visible;
        }
    }

    /// 切换可见性，返回切换后的状态
    pub fn toggle(&mut self, field: Field) -> bool {
        let visible = !self.is_visible(field);
        self.set_visible(field, visible);
        visible
    }

    /// 设置自定义列名；None 或空白恢复默认
    pub fn rename(&mut self, field: Field, label: Option<String>) {
        if let Some(column) = self.config_mut(field) {
            column.label_override = label
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty());
        }
    }

    pub fn label(&self, field: Field) -> String {
        self.config(field)
            .map(|c| c.display_label().to_string())
            .unwrap_or_else(|| field.label().to_string())
    }

    fn config(&self, field: Field) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.field == field)
    }

    fn config_mut(&mut self, field: Field) -> Option<&mut ColumnConfig> {
        self.columns.iter_mut().find(|c| c.field == field)
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        let mut layout = Self::all_visible();
        for field in HIDDEN_BY_DEFAULT {
            layout.set_visible(field, false);
        }
        layout
    }
}
