// ==========================================
// 宝石库存表格管理 - 库存记录领域模型
// ==========================================
// 红线: 每个字段始终持有与其类型一致的值（数值默认 0，文本默认空串）
// 用途: 导入层创建，网格引擎原地修改
// ==========================================

use crate::domain::field::Field;
use crate::domain::types::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// InventoryRecord - 库存记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryRecord {
    // ===== 主键 =====
    pub id: String, // 记录唯一标识（生成器分配，不复用）

    // ===== 业务编号 =====
    pub seller_id: String,
    pub product_id: String, // 业务编号（定宽顺序号）

    // ===== 4C 分级 =====
    pub shape: String,
    pub carat: f64,
    pub color: String,
    pub clarity: String,
    pub cut: String,
    pub polish: String,
    pub symmetry: String,
    pub fluorescence: String,

    // ===== 证书 =====
    pub laboratory: String,
    pub certificate_number: String,

    // ===== 尺寸与价格 =====
    pub measurements: String,
    pub depth_percentage: f64,
    pub table_percentage: f64,
    pub price_per_carat: f64,
    pub total_price: f64,
    pub growth_type: String,

    // ===== 彩钻 =====
    pub fancy_color: String,
    pub fancy_color_intensity: String,
    pub fancy_color_overtone: String,
    pub eye_clean: String,

    // ===== 卖家信息 =====
    pub seller_name: String,
    pub seller_company: String,
    pub seller_location: String,
    pub seller_phone: String,
    pub seller_whatsapp: String,
    pub seller_email: String,

    // ===== 附件（URL）=====
    pub video_url: String,
    pub image_url: String,
    pub certificate_url: String,

    // ===== 校验标记 =====
    // 存在 = 当前无效；缺省 = 有效
    #[serde(default)]
    pub validation_errors: BTreeSet<Field>,
}

impl InventoryRecord {
    /// 创建全部字段为类型默认值的空白记录
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// 读取字段值
    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::SellerId => FieldValue::Text(self.seller_id.clone()),
            Field::ProductId => FieldValue::Text(self.product_id.clone()),
            Field::Shape => FieldValue::Text(self.shape.clone()),
            Field::Carat => FieldValue::Number(self.carat),
            Field::Color => FieldValue::Text(self.color.clone()),
            Field::Clarity => FieldValue::Text(self.clarity.clone()),
            Field::Cut => FieldValue::Text(self.cut.clone()),
            Field::Polish => FieldValue::Text(self.polish.clone()),
            Field::Symmetry => FieldValue::Text(self.symmetry.clone()),
            Field::Fluorescence => FieldValue::Text(self.fluorescence.clone()),
            Field::Laboratory => FieldValue::Text(self.laboratory.clone()),
            Field::CertificateNumber => FieldValue::Text(self.certificate_number.clone()),
            Field::Measurements => FieldValue::Text(self.measurements.clone()),
            Field::DepthPercentage => FieldValue::Number(self.depth_percentage),
            Field::TablePercentage => FieldValue::Number(self.table_percentage),
            Field::PricePerCarat => FieldValue::Number(self.price_per_carat),
            Field::TotalPrice => FieldValue::Number(self.total_price),
            Field::GrowthType => FieldValue::Text(self.growth_type.clone()),
            Field::FancyColor => FieldValue::Text(self.fancy_color.clone()),
            Field::FancyColorIntensity => FieldValue::Text(self.fancy_color_intensity.clone()),
            Field::FancyColorOvertone => FieldValue::Text(self.fancy_color_overtone.clone()),
            Field::EyeClean => FieldValue::Text(self.eye_clean.clone()),
            Field::SellerName => FieldValue::Text(self.seller_name.clone()),
            Field::SellerCompany => FieldValue::Text(self.seller_company.clone()),
            Field::SellerLocation => FieldValue::Text(self.seller_location.clone()),
            Field::SellerPhone => FieldValue::Text(self.seller_phone.clone()),
            Field::SellerWhatsapp => FieldValue::Text(self.seller_whatsapp.clone()),
            Field::SellerEmail => FieldValue::Text(self.seller_email.clone()),
            Field::VideoUrl => FieldValue::Text(self.video_url.clone()),
            Field::ImageUrl => FieldValue::Text(self.image_url.clone()),
            Field::CertificateUrl => FieldValue::Text(self.certificate_url.clone()),
        }
    }

    /// 写入字段值
    ///
    /// 值类型与字段类型不一致时按字段类型转换，保证记录不变量
    pub fn set(&mut self, field: Field, value: FieldValue) {
        let value = match (field.is_numeric(), value) {
            (true, FieldValue::Text(raw)) => FieldValue::coerce(field, &raw),
            (false, FieldValue::Number(n)) => FieldValue::Text(n.to_string()),
            (_, v) => v,
        };

        match value {
            FieldValue::Number(n) => match field {
                Field::Carat => self.carat = n,
                Field::DepthPercentage => self.depth_percentage = n,
                Field::TablePercentage => self.table_percentage = n,
                Field::PricePerCarat => self.price_per_carat = n,
                Field::TotalPrice => self.total_price = n,
                _ => {}
            },
            FieldValue::Text(s) => {
                if let Some(slot) = self.text_slot(field) {
                    *slot = s;
                }
            }
        }
    }

    fn text_slot(&mut self, field: Field) -> Option<&mut String> {
        let slot = match field {
            Field::SellerId => &mut self.seller_id,
            Field::ProductId => &mut self.product_id,
            Field::Shape => &mut self.shape,
            Field::Color => &mut self.color,
            Field::Clarity => &mut self.clarity,
            Field::Cut => &mut self.cut,
            Field::Polish => &mut self.polish,
            Field::Symmetry => &mut self.symmetry,
            Field::Fluorescence => &mut self.fluorescence,
            Field::Laboratory => &mut self.laboratory,
            Field::CertificateNumber => &mut self.certificate_number,
            Field::Measurements => &mut self.measurements,
            Field::GrowthType => &mut self.growth_type,
            Field::FancyColor => &mut self.fancy_color,
            Field::FancyColorIntensity => &mut self.fancy_color_intensity,
            Field::FancyColorOvertone => &mut self.fancy_color_overtone,
            Field::EyeClean => &mut self.eye_clean,
            Field::SellerName => &mut self.seller_name,
            Field::SellerCompany => &mut self.seller_company,
            Field::SellerLocation => &mut self.seller_location,
            Field::SellerPhone => &mut self.seller_phone,
            Field::SellerWhatsapp => &mut self.seller_whatsapp,
            Field::SellerEmail => &mut self.seller_email,
            Field::VideoUrl => &mut self.video_url,
            Field::ImageUrl => &mut self.image_url,
            Field::CertificateUrl => &mut self.certificate_url,
            Field::Carat
            | Field::DepthPercentage
            | Field::TablePercentage
            | Field::PricePerCarat
            | Field::TotalPrice => return None,
        };
        Some(slot)
    }

    /// 重置字段为类型默认值
    pub fn reset(&mut self, field: Field) {
        self.set(field, FieldValue::default_for(field));
    }

    // ===== 校验标记 =====

    pub fn is_invalid(&self, field: Field) -> bool {
        self.validation_errors.contains(&field)
    }

    pub fn set_invalid(&mut self, field: Field, invalid: bool) {
        if invalid {
            self.validation_errors.insert(field);
        } else {
            self.validation_errors.remove(&field);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    /// 全字段值拼接（搜索用，按规范字段顺序，空格分隔）
    pub fn search_text(&self) -> String {
        Field::ALL
            .iter()
            .map(|field| self.get(*field).to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 复制为新记录：替换标识与业务编号，其余值原样拷贝
    pub fn duplicate_as(&self, id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            ..self.clone()
        }
    }
}
