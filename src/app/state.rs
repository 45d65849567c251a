// ==========================================
// 宝石库存表格管理 - 应用状态
// ==========================================
// 职责: 由配置装配导入器、表格引擎、附件上传协作者与 API
// ==========================================

use std::sync::Arc;

use crate::api::{AttachmentUploader, GeneratedReferenceUploader, InventoryApi};
use crate::config::{ConfigManager, ImportApplyMode, ImportConfigReader, ImportPolicy};
use crate::engine::GridEngine;
use crate::importer::InventoryImporterImpl;

/// 应用状态
///
/// 包含共享配置与 API 实例
pub struct AppState {
    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 库存表格API
    pub inventory_api: Arc<InventoryApi>,
}

impl AppState {
    /// 使用默认配置文件位置创建 AppState
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 配置加载或装配失败
    pub fn new() -> Result<Self, String> {
        let config = ConfigManager::load_default().map_err(|e| format!("无法加载配置: {}", e))?;
        Self::from_config(config)
    }

    /// 使用给定配置装配
    ///
    /// # 说明
    /// 1. 读取导入策略快照
    /// 2. 创建导入器与表格引擎
    /// 3. 创建附件上传协作者与 API 实例
    pub fn from_config(config: ConfigManager) -> Result<Self, String> {
        let policy =
            ImportPolicy::from_reader(&config).map_err(|e| format!("导入配置无效: {}", e))?;
        let apply_mode = config
            .get_import_apply_mode()
            .map_err(|e| format!("导入配置无效: {}", e))?;
        let base_url = config
            .get_reference_base_url()
            .map_err(|e| format!("上传配置无效: {}", e))?;
        let uploader: Arc<dyn AttachmentUploader> =
            Arc::new(GeneratedReferenceUploader::new(base_url));

        Self::assemble(config, policy, apply_mode, uploader)
    }

    /// 使用自定义附件上传协作者装配
    pub fn with_uploader(
        config: ConfigManager,
        uploader: Arc<dyn AttachmentUploader>,
    ) -> Result<Self, String> {
        let policy =
            ImportPolicy::from_reader(&config).map_err(|e| format!("导入配置无效: {}", e))?;
        let apply_mode = config
            .get_import_apply_mode()
            .map_err(|e| format!("导入配置无效: {}", e))?;
        Self::assemble(config, policy, apply_mode, uploader)
    }

    fn assemble(
        config: ConfigManager,
        policy: ImportPolicy,
        apply_mode: ImportApplyMode,
        uploader: Arc<dyn AttachmentUploader>,
    ) -> Result<Self, String> {
        tracing::info!(
            skip_blank_rows = policy.skip_blank_rows,
            header_match = policy.header_match.as_str(),
            duplicate_header = policy.duplicate_header.as_str(),
            apply_mode = apply_mode.as_str(),
            "初始化AppState"
        );

        let engine = GridEngine::from_policy(&policy);
        let importer = Arc::new(InventoryImporterImpl::with_policy(policy));
        let inventory_api = Arc::new(InventoryApi::new(engine, importer, uploader, apply_mode));

        Ok(Self {
            config: Arc::new(config),
            inventory_api,
        })
    }
}
