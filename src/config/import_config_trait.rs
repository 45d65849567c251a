// ==========================================
// 宝石库存表格管理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道与网格引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::config_manager::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 表头匹配策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatchPolicy {
    /// 仅接受映射表中列出的精确拼写
    Exact,
    /// 忽略大小写与多余空白
    Normalized,
}

// ==========================================
// 重复表头处理策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateHeaderPolicy {
    /// 从左到右覆盖，最后一列生效
    LastWins,
    /// 第一列生效，后续同名列忽略
    FirstWins,
}

// ==========================================
// 导入结果写入记录仓的方式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportApplyMode {
    /// 以导入结果替换全部记录
    Replace,
    /// 导入记录置顶，保留已有记录
    Prepend,
}

impl HeaderMatchPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            HeaderMatchPolicy::Exact => "exact",
            HeaderMatchPolicy::Normalized => "normalized",
        }
    }
}

impl FromStr for HeaderMatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(HeaderMatchPolicy::Exact),
            "normalized" => Ok(HeaderMatchPolicy::Normalized),
            other => Err(format!("无法识别的表头匹配策略: {}", other)),
        }
    }
}

impl DuplicateHeaderPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            DuplicateHeaderPolicy::LastWins => "last_wins",
            DuplicateHeaderPolicy::FirstWins => "first_wins",
        }
    }
}

impl FromStr for DuplicateHeaderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last_wins" => Ok(DuplicateHeaderPolicy::LastWins),
            "first_wins" => Ok(DuplicateHeaderPolicy::FirstWins),
            other => Err(format!("无法识别的重复表头策略: {}", other)),
        }
    }
}

impl ImportApplyMode {
    pub fn as_str(&self) -> &str {
        match self {
            ImportApplyMode::Replace => "replace",
            ImportApplyMode::Prepend => "prepend",
        }
    }
}

impl FromStr for ImportApplyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(ImportApplyMode::Replace),
            "prepend" => Ok(ImportApplyMode::Prepend),
            other => Err(format!("无法识别的导入写入方式: {}", other)),
        }
    }
}

impl fmt::Display for ImportApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager
pub trait ImportConfigReader: Send + Sync {
    /// 是否跳过全空白数据行
    ///
    /// # 默认值
    /// - true
    fn get_skip_blank_rows(&self) -> Result<bool, ConfigError>;

    /// 表头匹配策略
    ///
    /// # 默认值
    /// - exact
    fn get_header_match_policy(&self) -> Result<HeaderMatchPolicy, ConfigError>;

    /// 多列映射到同一字段时的取舍
    ///
    /// # 默认值
    /// - last_wins
    fn get_duplicate_header_policy(&self) -> Result<DuplicateHeaderPolicy, ConfigError>;

    /// 导入记录的默认卖家编号
    ///
    /// # 默认值
    /// - "SD"
    fn get_default_seller_id(&self) -> Result<String, ConfigError>;

    /// 导入完成后写入记录仓的方式
    ///
    /// # 默认值
    /// - replace
    fn get_import_apply_mode(&self) -> Result<ImportApplyMode, ConfigError>;

    /// 业务编号位数（左侧补零）
    ///
    /// # 默认值
    /// - 6
    fn get_business_id_width(&self) -> Result<usize, ConfigError>;

    /// 附件引用地址前缀
    ///
    /// # 默认值
    /// - https://assets.gem-inventory.local
    fn get_reference_base_url(&self) -> Result<String, ConfigError>;
}

// ==========================================
// 导入策略快照
// ==========================================
// 导入管道在后台线程中运行，启动前一次性读取全部策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPolicy {
    pub skip_blank_rows: bool,
    pub header_match: HeaderMatchPolicy,
    pub duplicate_header: DuplicateHeaderPolicy,
    pub default_seller_id: String,
    pub business_id_width: usize,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            skip_blank_rows: true,
            header_match: HeaderMatchPolicy::Exact,
            duplicate_header: DuplicateHeaderPolicy::LastWins,
            default_seller_id: "SD".to_string(),
            business_id_width: 6,
        }
    }
}

impl ImportPolicy {
    pub fn from_reader<C: ImportConfigReader + ?Sized>(config: &C) -> Result<Self, ConfigError> {
        Ok(Self {
            skip_blank_rows: config.get_skip_blank_rows()?,
            header_match: config.get_header_match_policy()?,
            duplicate_header: config.get_duplicate_header_policy()?,
            default_seller_id: config.get_default_seller_id()?,
            business_id_width: config.get_business_id_width()?,
        })
    }
}
