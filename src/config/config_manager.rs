// ==========================================
// 宝石库存表格管理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 进程内 key-value 表，可从 JSON 文件加载
// ==========================================

use crate::config::import_config_trait::{
    DuplicateHeaderPolicy, HeaderMatchPolicy, ImportApplyMode, ImportConfigReader,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 配置文件路径覆写环境变量
pub const CONFIG_PATH_ENV: &str = "GEM_INVENTORY_CONFIG";

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const SKIP_BLANK_ROWS: &str = "import.skip_blank_rows";
    pub const HEADER_MATCH: &str = "import.header_match";
    pub const DUPLICATE_HEADER: &str = "import.duplicate_header";
    pub const DEFAULT_SELLER_ID: &str = "import.default_seller_id";
    pub const APPLY_MODE: &str = "import.apply_mode";
    pub const BUSINESS_ID_WIDTH: &str = "grid.business_id_width";
    pub const REFERENCE_BASE_URL: &str = "upload.reference_base_url";
}

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    #[error("配置文件格式错误: {0}")]
    FormatError(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("锁获取失败: {0}")]
    LockError(String),
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Default)]
pub struct ConfigManager {
    values: Mutex<HashMap<String, String>>,
}

impl ConfigManager {
    /// 创建空配置（所有读取均回落默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有键值创建
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            values: Mutex::new(values),
        }
    }

    /// 默认配置文件路径: <config_dir>/gem-inventory/config.json
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gem-inventory").join("config.json"))
    }

    /// 加载默认位置的配置
    ///
    /// 优先读取环境变量 GEM_INVENTORY_CONFIG 指定的文件；
    /// 文件不存在时使用内置默认值
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(Self::default_config_path);

        match path {
            Some(path) if path.exists() => Self::load_from_file(&path),
            Some(path) => {
                debug!(path = %path.display(), "配置文件不存在，使用默认配置");
                Ok(Self::new())
            }
            None => Ok(Self::new()),
        }
    }

    /// 从 JSON 文件加载配置
    ///
    /// 文件格式: 扁平对象 { "import.skip_blank_rows": true, ... }
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let manager = Self::new();
        manager.restore_config_from_snapshot(&content)?;
        info!(path = %path.display(), "配置文件加载完成");
        Ok(manager)
    }

    /// 写入配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// 读取配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let values = self
            .values
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置值
    fn parse_config<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get_config_or_default(key, default)?;
        raw.trim().parse::<T>().map_err(|e| ConfigError::ValueError {
            key: key.to_string(),
            value: raw.clone(),
            message: e.to_string(),
        })
    }

    /// 获取全部配置的快照（JSON 格式，键有序）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let values = self
            .values
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        let ordered: BTreeMap<&String, &String> = values.iter().collect();
        serde_json::to_string(&ordered).map_err(|e| ConfigError::FormatError(e.to_string()))
    }

    /// 从配置快照恢复配置
    ///
    /// 标量值统一转为字符串存储；嵌套对象/数组视为格式错误
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, ConfigError> {
        let parsed: Value = serde_json::from_str(snapshot_json)
            .map_err(|e| ConfigError::FormatError(e.to_string()))?;

        let object = parsed
            .as_object()
            .ok_or_else(|| ConfigError::FormatError("顶层必须为 JSON 对象".to_string()))?;

        let mut restored = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Null => continue,
                _ => {
                    return Err(ConfigError::FormatError(format!(
                        "配置项 {} 不是标量值",
                        key
                    )))
                }
            };
            restored.insert(key.clone(), text);
        }

        let mut values = self
            .values
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        let count = restored.len();
        values.extend(restored);
        Ok(count)
    }
}

impl ImportConfigReader for ConfigManager {
    fn get_skip_blank_rows(&self) -> Result<bool, ConfigError> {
        self.parse_config(config_keys::SKIP_BLANK_ROWS, "true")
    }

    fn get_header_match_policy(&self) -> Result<HeaderMatchPolicy, ConfigError> {
        self.parse_config(config_keys::HEADER_MATCH, "exact")
    }

    fn get_duplicate_header_policy(&self) -> Result<DuplicateHeaderPolicy, ConfigError> {
        self.parse_config(config_keys::DUPLICATE_HEADER, "last_wins")
    }

    fn get_default_seller_id(&self) -> Result<String, ConfigError> {
        self.get_config_or_default(config_keys::DEFAULT_SELLER_ID, "SD")
    }

    fn get_import_apply_mode(&self) -> Result<ImportApplyMode, ConfigError> {
        self.parse_config(config_keys::APPLY_MODE, "replace")
    }

    fn get_business_id_width(&self) -> Result<usize, ConfigError> {
        let width: usize = self.parse_config(config_keys::BUSINESS_ID_WIDTH, "6")?;
        if width == 0 || width > 18 {
            warn!(width, "业务编号位数超出范围，回落默认值 6");
            return Ok(6);
        }
        Ok(width)
    }

    fn get_reference_base_url(&self) -> Result<String, ConfigError> {
        let base = self.get_config_or_default(
            config_keys::REFERENCE_BASE_URL,
            "https://assets.gem-inventory.local",
        )?;
        Ok(base.trim_end_matches('/').to_string())
    }
}
