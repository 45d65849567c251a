// ==========================================
// 宝石库存表格管理 - 字段模式注册表
// ==========================================
// 职责: 描述库存记录的全部字段（类型、候选值、可编辑性、显示名）
// 红线: 模式只读，列显示偏好不得回写到此处
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 候选值集合（下拉字段）
// ==========================================

pub const SHAPES: &[&str] = &[
    "Round", "Pear", "Oval", "Marquise", "Heart", "Radiant", "Princess", "Emerald",
    "Asscher", "Sq. Emerald", "Asscher & Sq. Emerald", "Square Radiant", "Cushion (All)",
    "Cushion Brilliant", "Cushion Modified", "Baguette", "European Cut", "Old Miner",
    "Briolette", "Bullets", "Calf", "Circular Brilliant", "Epaulette", "Flanders",
    "Half Moon", "Hexagonal", "Kite", "Lozenge", "Octagonal", "Pentagonal", "Rose",
    "Shield", "Square", "Star", "Tapered Baguette", "Tapered Bullet", "Trapezoid",
    "Triangular", "Trilliant", "Other",
];

pub const CLARITIES: &[&str] = &[
    "FL", "IF", "VVS1", "VVS2", "VS1", "VS2", "SI1", "SI2", "SI3", "I1", "I2", "I3",
];

/// 彩钻颜色与伴色共用同一集合
pub const FANCY_COLORS: &[&str] = &[
    "Black", "Brown", "Brownish", "Champagne", "Cognac", "Chameleon", "Violetish",
    "White", "Brown-Greenish", "Green", "Greenish", "Purple", "Purplish", "Orange",
    "Orangey", "Violet", "Gray", "Grayish", "None", "Yellow", "Yellowish", "Pink",
    "Pinkish", "Blue", "Bluish", "Red", "Reddish", "Gray-Greenish", "Gray-Yellowish",
    "Orange-Brown", "Other",
];

pub const COLORS: &[&str] = &[
    "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T",
    "U", "V", "W", "X", "Y", "Z",
];

pub const FLUORESCENCES: &[&str] = &["FL", "IF", "VVS1", "VVS2", "VS1", "VS2", "SI1", "SI2", "SI3"];

/// 切工、抛光、对称共用
pub const FINISH_GRADES: &[&str] = &["Excellent", "Very Good", "Good", "Poor", "Fair", "Ideal"];

pub const FANCY_COLOR_INTENSITIES: &[&str] = &[
    "Faint", "Very Light", "Fancy Light", "Light", "Fancy", "Dark Fancy", "Fancy Intense",
    "Fancy Deep", "Other",
];

pub const EYE_CLEAN_GRADES: &[&str] = &["Yes", "Border Line", "E1", "E2(No)"];

pub const LABORATORIES: &[&str] = &[
    "GIA", "GIA DOR", "HRD", "IGI", "AGS", "CGL", "DBIOD", "GCAL", "GII", "GHI", "GSI",
    "NGTC", "PGS", "RAP", "RDC", "SGL", "NONE",
];

// ==========================================
// FieldKind - 字段能力
// ==========================================
// 校验器与网格编辑器共用同一份能力描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Numeric,
    Enumerated(&'static [&'static str]),
}

// ==========================================
// FieldSchema - 单字段模式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub field: Field,
    pub kind: FieldKind,
    pub editable: bool,
    pub label: &'static str,
}

// ==========================================
// Field - 规范字段标识
// ==========================================
// 序列化格式: snake_case（与导入错误报告中的 field 一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    SellerId,
    ProductId,
    Shape,
    Carat,
    Color,
    Clarity,
    Cut,
    Polish,
    Symmetry,
    Fluorescence,
    Laboratory,
    CertificateNumber,
    Measurements,
    DepthPercentage,
    TablePercentage,
    PricePerCarat,
    TotalPrice,
    GrowthType,
    FancyColor,
    FancyColorIntensity,
    FancyColorOvertone,
    EyeClean,
    SellerName,
    SellerCompany,
    SellerLocation,
    SellerPhone,
    SellerWhatsapp,
    SellerEmail,
    VideoUrl,
    ImageUrl,
    CertificateUrl,
}

impl Field {
    /// 规范字段顺序（导航、搜索拼接均以此为准）
    pub const ALL: [Field; 31] = [
        Field::SellerId,
        Field::ProductId,
        Field::Shape,
        Field::Carat,
        Field::Color,
        Field::Clarity,
        Field::Cut,
        Field::Polish,
        Field::Symmetry,
        Field::Fluorescence,
        Field::Laboratory,
        Field::CertificateNumber,
        Field::Measurements,
        Field::DepthPercentage,
        Field::TablePercentage,
        Field::PricePerCarat,
        Field::TotalPrice,
        Field::GrowthType,
        Field::FancyColor,
        Field::FancyColorIntensity,
        Field::FancyColorOvertone,
        Field::EyeClean,
        Field::SellerName,
        Field::SellerCompany,
        Field::SellerLocation,
        Field::SellerPhone,
        Field::SellerWhatsapp,
        Field::SellerEmail,
        Field::VideoUrl,
        Field::ImageUrl,
        Field::CertificateUrl,
    ];

    /// 附件字段（仅能通过上传动作写入）
    pub const ATTACHMENTS: [Field; 3] = [Field::VideoUrl, Field::ImageUrl, Field::CertificateUrl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::SellerId => "seller_id",
            Field::ProductId => "product_id",
            Field::Shape => "shape",
            Field::Carat => "carat",
            Field::Color => "color",
            Field::Clarity => "clarity",
            Field::Cut => "cut",
            Field::Polish => "polish",
            Field::Symmetry => "symmetry",
            Field::Fluorescence => "fluorescence",
            Field::Laboratory => "laboratory",
            Field::CertificateNumber => "certificate_number",
            Field::Measurements => "measurements",
            Field::DepthPercentage => "depth_percentage",
            Field::TablePercentage => "table_percentage",
            Field::PricePerCarat => "price_per_carat",
            Field::TotalPrice => "total_price",
            Field::GrowthType => "growth_type",
            Field::FancyColor => "fancy_color",
            Field::FancyColorIntensity => "fancy_color_intensity",
            Field::FancyColorOvertone => "fancy_color_overtone",
            Field::EyeClean => "eye_clean",
            Field::SellerName => "seller_name",
            Field::SellerCompany => "seller_company",
            Field::SellerLocation => "seller_location",
            Field::SellerPhone => "seller_phone",
            Field::SellerWhatsapp => "seller_whatsapp",
            Field::SellerEmail => "seller_email",
            Field::VideoUrl => "video_url",
            Field::ImageUrl => "image_url",
            Field::CertificateUrl => "certificate_url",
        }
    }

    /// 查询字段模式
    pub fn schema(&self) -> FieldSchema {
        FieldSchema {
            field: *self,
            kind: self.kind(),
            editable: !self.is_attachment(),
            label: self.label(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Carat
            | Field::DepthPercentage
            | Field::TablePercentage
            | Field::PricePerCarat
            | Field::TotalPrice => FieldKind::Numeric,
            Field::Shape => FieldKind::Enumerated(SHAPES),
            Field::Color => FieldKind::Enumerated(COLORS),
            Field::Clarity => FieldKind::Enumerated(CLARITIES),
            Field::Cut | Field::Polish | Field::Symmetry => FieldKind::Enumerated(FINISH_GRADES),
            Field::Fluorescence => FieldKind::Enumerated(FLUORESCENCES),
            Field::Laboratory => FieldKind::Enumerated(LABORATORIES),
            Field::FancyColor | Field::FancyColorOvertone => FieldKind::Enumerated(FANCY_COLORS),
            Field::FancyColorIntensity => FieldKind::Enumerated(FANCY_COLOR_INTENSITIES),
            Field::EyeClean => FieldKind::Enumerated(EYE_CLEAN_GRADES),
            _ => FieldKind::Text,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::SellerId => "Seller ID",
            Field::ProductId => "Product ID",
            Field::Shape => "Shape",
            Field::Carat => "Carat",
            Field::Color => "Color",
            Field::Clarity => "Clarity",
            Field::Cut => "Cut",
            Field::Polish => "Polish",
            Field::Symmetry => "Symmetry",
            Field::Fluorescence => "Fluorescence",
            Field::Laboratory => "Laboratory",
            Field::CertificateNumber => "Certificate #",
            Field::Measurements => "Measurements",
            Field::DepthPercentage => "Depth %",
            Field::TablePercentage => "Table %",
            Field::PricePerCarat => "Price/Carat",
            Field::TotalPrice => "Total Price",
            Field::GrowthType => "Growth Type",
            Field::FancyColor => "Fancy Color",
            Field::FancyColorIntensity => "FC Intensity",
            Field::FancyColorOvertone => "FC Overtone",
            Field::EyeClean => "Eye Clean",
            Field::SellerName => "Seller Name",
            Field::SellerCompany => "Seller Company",
            Field::SellerLocation => "Seller Location",
            Field::SellerPhone => "Seller Phone",
            Field::SellerWhatsapp => "Seller WhatsApp",
            Field::SellerEmail => "Seller Email",
            Field::VideoUrl => "Video URL",
            Field::ImageUrl => "Image URL",
            Field::CertificateUrl => "Certificate URL",
        }
    }

    pub fn is_attachment(&self) -> bool {
        Field::ATTACHMENTS.contains(self)
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == FieldKind::Numeric
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("未知字段: {}", s))
    }
}

// ==========================================
// 注册表查询函数
// ==========================================

pub fn field_kind(field: Field) -> FieldKind {
    field.kind()
}

pub fn allowed_values(field: Field) -> Option<&'static [&'static str]> {
    match field.kind() {
        FieldKind::Enumerated(values) => Some(values),
        _ => None,
    }
}

pub fn is_editable(field: Field) -> bool {
    field.schema().editable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_field_once() {
        let mut seen = std::collections::HashSet::new();
        for field in Field::ALL {
            assert!(seen.insert(field.as_str()), "字段重复: {}", field);
        }
        assert_eq!(seen.len(), 31);
    }

    #[test]
    fn test_numeric_fields() {
        let numeric: Vec<Field> = Field::ALL.iter().copied().filter(|f| f.is_numeric()).collect();
        assert_eq!(
            numeric,
            vec![
                Field::Carat,
                Field::DepthPercentage,
                Field::TablePercentage,
                Field::PricePerCarat,
                Field::TotalPrice
            ]
        );
    }

    #[test]
    fn test_attachments_not_editable() {
        for field in Field::ATTACHMENTS {
            assert!(!is_editable(field));
            assert_eq!(field_kind(field), FieldKind::Text);
        }
        assert!(is_editable(Field::Carat));
        assert!(is_editable(Field::ProductId));
    }

    #[test]
    fn test_allowed_values_lookup() {
        assert_eq!(allowed_values(Field::Color).map(|v| v.len()), Some(23));
        assert!(allowed_values(Field::Laboratory).unwrap().contains(&"GIA DOR"));
        assert_eq!(allowed_values(Field::SellerEmail), None);
    }

    #[test]
    fn test_field_from_str_roundtrip() {
        assert_eq!("fancy_color_overtone".parse::<Field>(), Ok(Field::FancyColorOvertone));
        assert!("Carat".parse::<Field>().is_err());
    }
}
