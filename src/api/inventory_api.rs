// ==========================================
// 宝石库存表格管理 - 库存表格 API
// ==========================================
// 职责: 串行化表格引擎访问、后台导入、附件异步上传
// 红线: 引擎状态只在锁内同步修改，锁不跨 await
// 红线: 同时至多一个导入任务；导入失败不改动记录仓
// ==========================================

use crate::api::attachment_uploader::{AttachmentFile, AttachmentUploader};
use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportApplyMode;
use crate::domain::field::Field;
use crate::domain::import::ImportResult;
use crate::domain::record::InventoryRecord;
use crate::engine::{GridEngine, GridNotice, UploadTicket};
use crate::importer::{
    CsvParser, FileParser, ImportError, ImporterResult, InventoryImporter,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, instrument, warn};

// ==========================================
// ImportStatus - 导入状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportState {
    Idle,
    Processing,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatus {
    pub state: ImportState,
    pub message: Option<String>,
    pub file_name: Option<String>,
}

impl ImportStatus {
    pub fn idle() -> Self {
        Self {
            state: ImportState::Idle,
            message: None,
            file_name: None,
        }
    }
}

impl Default for ImportStatus {
    fn default() -> Self {
        Self::idle()
    }
}

/// 保存响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// 已保存记录快照（交由外部持久化）
    pub records: Vec<InventoryRecord>,
    pub notice: GridNotice,
}

/// 批量上传请求项
#[derive(Debug, Clone)]
pub struct AttachmentRequest {
    pub record_id: String,
    pub field: Field,
    pub file: AttachmentFile,
}

// 导入占用标记，离开作用域自动释放
struct ImportGuard {
    flag: Arc<AtomicBool>,
}

impl ImportGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> ImporterResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ImportError::ImportInProgress)?;
        Ok(Self { flag: flag.clone() })
    }
}

impl Drop for ImportGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 附件上传在途凭证；未交还就被丢弃时释放单元格占用
struct UploadGuard {
    engine: Arc<Mutex<GridEngine>>,
    ticket: Option<UploadTicket>,
}

impl UploadGuard {
    fn new(engine: &Arc<Mutex<GridEngine>>, ticket: UploadTicket) -> Self {
        Self {
            engine: engine.clone(),
            ticket: Some(ticket),
        }
    }

    fn redeem(mut self) -> Option<UploadTicket> {
        self.ticket.take()
    }
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            let mut engine = match self.engine.lock() {
                Ok(engine) => engine,
                Err(poisoned) => poisoned.into_inner(),
            };
            engine.abandon_upload(ticket);
        }
    }
}

// ==========================================
// InventoryApi - 库存表格 API
// ==========================================
pub struct InventoryApi {
    engine: Arc<Mutex<GridEngine>>,
    importer: Arc<dyn InventoryImporter>,
    uploader: Arc<dyn AttachmentUploader>,
    apply_mode: ImportApplyMode,
    import_running: Arc<AtomicBool>,
    import_status: Mutex<ImportStatus>,
}

impl InventoryApi {
    /// 创建新的 InventoryApi 实例
    ///
    /// # 参数
    /// - engine: 表格引擎
    /// - importer: 导入器（在阻塞线程池中运行）
    /// - uploader: 附件上传协作者
    /// - apply_mode: 导入结果写入记录仓的方式
    pub fn new(
        engine: GridEngine,
        importer: Arc<dyn InventoryImporter>,
        uploader: Arc<dyn AttachmentUploader>,
        apply_mode: ImportApplyMode,
    ) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            importer,
            uploader,
            apply_mode,
            import_running: Arc::new(AtomicBool::new(false)),
            import_status: Mutex::new(ImportStatus::idle()),
        }
    }

    // ==========================================
    // 表格引擎访问
    // ==========================================

    /// 在锁内对表格引擎执行一次原子操作
    pub fn with_engine<R>(&self, op: impl FnOnce(&mut GridEngine) -> R) -> ApiResult<R> {
        let mut engine = self.lock_engine()?;
        Ok(op(&mut engine))
    }

    /// 当前派生视图快照
    pub fn view_snapshot(&self) -> ApiResult<Vec<InventoryRecord>> {
        self.with_engine(|engine| engine.view().into_iter().cloned().collect())
    }

    /// 保存修改：返回未保存记录快照并清空未保存集合
    pub fn save_changes(&self) -> ApiResult<SaveResponse> {
        self.with_engine(|engine| {
            let records = engine.save();
            let notice = GridNotice::Saved {
                count: records.len(),
            };
            SaveResponse { records, notice }
        })
    }

    pub fn is_import_running(&self) -> bool {
        self.import_running.load(Ordering::Acquire)
    }

    // ==========================================
    // 导入
    // ==========================================

    /// 导入表格文档
    ///
    /// # 参数
    /// - bytes: 文档内容
    /// - file_name: 文件名（仅用于状态展示）
    ///
    /// # 返回
    /// - Ok(ImportResult): 已写入记录仓
    /// - Err(ApiError::ImportInProgress): 已有导入在途
    /// - Err(ApiError::Unreadable / EmptySheet): 记录仓不变
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn import_spreadsheet(&self, bytes: Vec<u8>, file_name: &str) -> ApiResult<ImportResult> {
        self.run_import(file_name, move |importer| importer.import(&bytes))
            .await
    }

    /// 导入 CSV 文本
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn import_csv(&self, bytes: Vec<u8>, file_name: &str) -> ApiResult<ImportResult> {
        self.run_import(file_name, move |importer| {
            let grid = CsvParser.parse_bytes(&bytes)?;
            importer.import_grid(grid)
        })
        .await
    }

    /// 按扩展名导入本地文件
    #[instrument(skip(self))]
    pub async fn import_file(&self, path: PathBuf) -> ApiResult<ImportResult> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.run_import(&file_name, move |importer| importer.import_file(&path))
            .await
    }

    pub fn import_status(&self) -> ApiResult<ImportStatus> {
        Ok(self.lock_status()?.clone())
    }

    pub fn reset_import_status(&self) -> ApiResult<()> {
        *self.lock_status()? = ImportStatus::idle();
        Ok(())
    }

    // ==========================================
    // 附件上传
    // ==========================================

    /// 上传单个附件并回填引用地址
    ///
    /// # 返回
    /// - Err(ApiError::CellBusy): 同一单元格已有上传在途
    /// - Err(ApiError::UploadFailed): 上传失败，字段保留原值
    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub async fn upload_attachment(
        &self,
        record_id: &str,
        field: Field,
        file: AttachmentFile,
    ) -> ApiResult<String> {
        let ticket = self.with_engine(|engine| engine.begin_upload(record_id, field))??;
        let guard = UploadGuard::new(&self.engine, ticket);

        let outcome = self.uploader.upload(record_id, field, file).await;
        let reference = outcome.as_ref().ok().cloned();

        let ticket = guard
            .redeem()
            .ok_or_else(|| ApiError::InternalError("上传凭证缺失".to_string()))?;
        self.with_engine(move |engine| engine.finish_upload(ticket, outcome))??;
        reference.ok_or_else(|| ApiError::InternalError("上传结果缺失".to_string()))
    }

    /// 并发上传多个附件（不同单元格互不影响）
    pub async fn upload_attachments(
        &self,
        requests: Vec<AttachmentRequest>,
    ) -> Vec<ApiResult<String>> {
        info!(count = requests.len(), "开始批量上传附件");
        let tasks = requests.into_iter().map(|request| async move {
            self.upload_attachment(&request.record_id, request.field, request.file)
                .await
        });
        join_all(tasks).await
    }

    // ==========================================
    // 内部工具
    // ==========================================

    async fn run_import<F>(&self, file_name: &str, job: F) -> ApiResult<ImportResult>
    where
        F: FnOnce(&dyn InventoryImporter) -> ImporterResult<ImportResult> + Send + 'static,
    {
        let _guard = ImportGuard::acquire(&self.import_running).map_err(|e| {
            warn!(file_name = %file_name, "已有导入在途，拒绝新的导入");
            ApiError::from(e)
        })?;
        self.set_status(ImportState::Processing, None, file_name)?;

        let importer = self.importer.clone();
        let joined = tokio::task::spawn_blocking(move || job(importer.as_ref())).await;

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(join_err) => {
                error!(error = %join_err, "导入任务异常终止");
                let message = format!("导入任务异常终止: {}", join_err);
                self.set_status(ImportState::Error, Some(message.clone()), file_name)?;
                return Err(ApiError::InternalError(message));
            }
        };

        match outcome {
            Ok(result) => {
                let notice = self.with_engine(|engine| {
                    engine.apply_import(result.clone(), self.apply_mode)
                })?;
                self.set_status(ImportState::Success, Some(result.summary_message()), file_name)?;
                info!(file_name = %file_name, notice = %notice.message(), "导入完成");
                Ok(result)
            }
            Err(e) => {
                warn!(file_name = %file_name, error = %e, "导入失败，记录仓不变");
                self.set_status(ImportState::Error, Some(e.to_string()), file_name)?;
                Err(e.into())
            }
        }
    }

    fn set_status(&self, state: ImportState, message: Option<String>, file_name: &str) -> ApiResult<()> {
        *self.lock_status()? = ImportStatus {
            state,
            message,
            file_name: Some(file_name.to_string()),
        };
        Ok(())
    }

    fn lock_engine(&self) -> ApiResult<MutexGuard<'_, GridEngine>> {
        self.engine
            .lock()
            .map_err(|e| ApiError::InternalError(format!("表格状态锁获取失败: {}", e)))
    }

    fn lock_status(&self) -> ApiResult<MutexGuard<'_, ImportStatus>> {
        self.import_status
            .lock()
            .map_err(|e| ApiError::InternalError(format!("导入状态锁获取失败: {}", e)))
    }
}
