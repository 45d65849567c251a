// ==========================================
// 库存表格 API 集成测试
// ==========================================
// 测试目标: 后台导入互斥、导入失败不改动记录仓、附件上传占用标记
// ==========================================


use async_trait::async_trait;
use gem_inventory::api::{
    ApiError, AttachmentFile, AttachmentRequest, AttachmentUploader, GeneratedReferenceUploader,
    ImportState, InventoryApi,
};
use gem_inventory::config::{ImportApplyMode, ImportPolicy};
use gem_inventory::domain::Field;
use gem_inventory::engine::{GridEngine, GridNotice, UploadFailure};
use gem_inventory::importer::{
    CellGrid, FieldValidator, FileParser, ImporterResult, InventoryImporter,
    InventoryImporterImpl,
};
use gem_inventory::logging;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use test_helpers::{csv_bytes, sample_records, write_csv};

// ==========================================
// 测试替身
// ==========================================

/// 解码开始时发出信号，并阻塞到测试放行
struct GatedParser {
    started: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl FileParser for GatedParser {
    fn parse_bytes(&self, _bytes: &[u8]) -> ImporterResult<CellGrid> {
        let _ = self.started.lock().unwrap().send(());
        let _ = self.release.lock().unwrap().recv();
        Ok(vec![
            vec!["Carat".to_string(), "Laboratory".to_string()],
            vec!["1.1".to_string(), "GIA".to_string()],
        ])
    }
}

/// 可选闸门 + 可选失败的上传协作者
struct MockUploader {
    gate: Option<Arc<Notify>>,
    fail: bool,
}

#[async_trait]
impl AttachmentUploader for MockUploader {
    async fn upload(
        &self,
        record_id: &str,
        field: Field,
        file: AttachmentFile,
    ) -> Result<String, UploadFailure> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(UploadFailure::new(record_id, field, "网络中断"));
        }
        Ok(format!("https://cdn.example/{}/{}", record_id, file.file_name))
    }
}

fn api_with(
    importer: Arc<dyn InventoryImporter>,
    uploader: Arc<dyn AttachmentUploader>,
) -> InventoryApi {
    InventoryApi::new(
        GridEngine::with_records(sample_records(), 6),
        importer,
        uploader,
        ImportApplyMode::Replace,
    )
}

fn default_api() -> InventoryApi {
    api_with(
        Arc::new(InventoryImporterImpl::with_policy(ImportPolicy::default())),
        Arc::new(GeneratedReferenceUploader::new("https://assets.example")),
    )
}

fn cell_busy(api: &InventoryApi, record_id: &str, field: Field) -> bool {
    api.with_engine(|engine| engine.is_busy(record_id, field))
        .unwrap()
}

// ==========================================
// 导入
// ==========================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_second_import_rejected_while_first_running() {
    logging::init_test();

    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let parser = GatedParser {
        started: Mutex::new(started_tx),
        release: Mutex::new(release_rx),
    };
    let importer = InventoryImporterImpl::new(
        Box::new(parser),
        Box::new(FieldValidator::new()),
        ImportPolicy::default(),
    );
    let api = Arc::new(api_with(
        Arc::new(importer),
        Arc::new(GeneratedReferenceUploader::new("https://assets.example")),
    ));

    let first = tokio::spawn({
        let api = api.clone();
        async move { api.import_spreadsheet(vec![0u8; 8], "first.xlsx").await }
    });

    // 等待第一个导入进入解码阶段
    tokio::task::spawn_blocking(move || started_rx.recv())
        .await
        .unwrap()
        .unwrap();

    assert!(api.is_import_running());
    let status = api.import_status().unwrap();
    assert_eq!(status.state, ImportState::Processing);
    assert_eq!(status.file_name.as_deref(), Some("first.xlsx"));

    let second = api.import_spreadsheet(vec![0u8; 8], "second.xlsx").await;
    assert!(matches!(second, Err(ApiError::ImportInProgress)));

    // 导入在途时记录仓仍可编辑
    api.with_engine(|engine| engine.set_cell_value("r1", Field::Shape, "Heart"))
        .unwrap()
        .unwrap();

    release_tx.send(()).unwrap();
    let result = first.await.unwrap().unwrap();
    assert_eq!(result.total_rows, 1);

    assert!(!api.is_import_running());
    let records = api.view_snapshot().unwrap();
    assert_eq!(records.len(), 1, "replace 模式替换全部记录");
    assert_eq!(records[0].laboratory, "GIA");
    assert_eq!(api.import_status().unwrap().state, ImportState::Success);
}

#[tokio::test]
async fn test_failed_import_leaves_store_unchanged() {
    let api = default_api();
    let before = api.view_snapshot().unwrap();

    let result = api
        .import_spreadsheet(b"not a workbook".to_vec(), "broken.xlsx")
        .await;
    assert!(matches!(result, Err(ApiError::Unreadable(_))));

    assert_eq!(api.view_snapshot().unwrap(), before);
    let status = api.import_status().unwrap();
    assert_eq!(status.state, ImportState::Error);
    assert!(status.message.is_some());
    assert!(!api.is_import_running(), "失败后释放导入占用");
}

#[tokio::test]
async fn test_empty_sheet_reported() {
    let api = default_api();
    let bytes = csv_bytes(&[vec!["Carat", "Color"]]);
    let result = api.import_csv(bytes, "empty.csv").await;
    assert!(matches!(result, Err(ApiError::EmptySheet)));
    assert_eq!(api.view_snapshot().unwrap().len(), 3);
}

#[tokio::test]
async fn test_import_status_lifecycle() {
    let api = default_api();
    assert_eq!(api.import_status().unwrap().state, ImportState::Idle);

    let file = write_csv(&[vec!["Carat", "Color"], vec!["0.7", "F"], vec!["bad", "F"]])
        .expect("Failed to write csv");
    let result = api.import_file(file.path().to_path_buf()).await.unwrap();
    assert_eq!(result.error_count, 1);

    let status = api.import_status().unwrap();
    assert_eq!(status.state, ImportState::Success);
    assert_eq!(status.message.as_deref(), Some("已处理 2 行，1 个字段需要修正"));

    api.reset_import_status().unwrap();
    assert_eq!(api.import_status().unwrap().state, ImportState::Idle);
}

#[tokio::test]
async fn test_save_changes_after_import() {
    let api = default_api();
    let bytes = csv_bytes(&[vec!["Carat"], vec!["0.4"], vec!["0.6"]]);
    api.import_csv(bytes, "two.csv").await.unwrap();

    let response = api.save_changes().unwrap();
    assert_eq!(response.records.len(), 2);
    assert_eq!(response.notice, GridNotice::Saved { count: 2 });

    let again = api.save_changes().unwrap();
    assert!(again.records.is_empty());
}

// ==========================================
// 附件上传
// ==========================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_same_cell_upload_rejected_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(api_with(
        Arc::new(InventoryImporterImpl::with_policy(ImportPolicy::default())),
        Arc::new(MockUploader {
            gate: Some(gate.clone()),
            fail: false,
        }),
    ));

    let first = tokio::spawn({
        let api = api.clone();
        async move {
            api.upload_attachment("r1", Field::ImageUrl, AttachmentFile::new("a.jpg", vec![1, 2]))
                .await
        }
    });

    while !cell_busy(&api, "r1", Field::ImageUrl) {
        tokio::task::yield_now().await;
    }

    let second = api
        .upload_attachment("r1", Field::ImageUrl, AttachmentFile::new("b.jpg", vec![3]))
        .await;
    assert!(matches!(second, Err(ApiError::CellBusy(_))));

    gate.notify_one();
    let reference = first.await.unwrap().unwrap();
    assert_eq!(reference, "https://cdn.example/r1/a.jpg");

    let record = api
        .with_engine(|engine| engine.record("r1").cloned())
        .unwrap()
        .unwrap();
    assert_eq!(record.image_url, reference);
    assert!(!cell_busy(&api, "r1", Field::ImageUrl));
}

#[tokio::test]
async fn test_upload_failure_keeps_previous_value() {
    let api = api_with(
        Arc::new(InventoryImporterImpl::with_policy(ImportPolicy::default())),
        Arc::new(MockUploader {
            gate: None,
            fail: true,
        }),
    );
    api.with_engine(|engine| {
        engine
            .begin_upload("r2", Field::CertificateUrl)
            .and_then(|ticket| engine.finish_upload(ticket, Ok("https://old.example/c.pdf".into())))
    })
    .unwrap()
    .unwrap();

    let result = api
        .upload_attachment("r2", Field::CertificateUrl, AttachmentFile::new("c.pdf", vec![9]))
        .await;
    match result {
        Err(ApiError::UploadFailed(failure)) => {
            assert_eq!(failure.record_id, "r2");
            assert_eq!(failure.field, Field::CertificateUrl);
        }
        other => panic!("应该上传失败: {:?}", other),
    }

    let record = api.view_snapshot().unwrap().into_iter().find(|r| r.id == "r2").unwrap();
    assert_eq!(record.certificate_url, "https://old.example/c.pdf");
    assert!(!cell_busy(&api, "r2", Field::CertificateUrl));
}

#[tokio::test]
async fn test_abandoned_upload_releases_cell() {
    let gate = Arc::new(Notify::new());
    let api = api_with(
        Arc::new(InventoryImporterImpl::with_policy(ImportPolicy::default())),
        Arc::new(MockUploader {
            gate: Some(gate.clone()),
            fail: false,
        }),
    );
    let before = api.view_snapshot().unwrap();

    // 上传方迟迟不返回，调用方超时放弃
    let abandoned = tokio::time::timeout(
        Duration::from_millis(50),
        api.upload_attachment("r1", Field::ImageUrl, AttachmentFile::new("a.jpg", vec![1])),
    )
    .await;
    assert!(abandoned.is_err());
    assert!(!cell_busy(&api, "r1", Field::ImageUrl), "放弃后释放占用");
    assert_eq!(api.view_snapshot().unwrap(), before);

    gate.notify_one();
    let reference = api
        .upload_attachment("r1", Field::ImageUrl, AttachmentFile::new("b.jpg", vec![2]))
        .await
        .unwrap();
    assert_eq!(reference, "https://cdn.example/r1/b.jpg");
    assert!(!cell_busy(&api, "r1", Field::ImageUrl));
}

#[tokio::test]
async fn test_batch_uploads_to_distinct_cells() {
    let api = default_api();
    let requests = vec![
        AttachmentRequest {
            record_id: "r1".to_string(),
            field: Field::VideoUrl,
            file: AttachmentFile::new("clip.mp4", vec![1]),
        },
        AttachmentRequest {
            record_id: "r1".to_string(),
            field: Field::ImageUrl,
            file: AttachmentFile::new("photo.jpg", vec![2]),
        },
        AttachmentRequest {
            record_id: "missing".to_string(),
            field: Field::ImageUrl,
            file: AttachmentFile::new("x.jpg", vec![3]),
        },
    ];

    let results = api.upload_attachments(requests).await;
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(ApiError::NotFound(_))));

    let record = api
        .with_engine(|engine| engine.record("r1").cloned())
        .unwrap()
        .unwrap();
    assert!(record.video_url.starts_with("https://assets.example/video_url/r1/"));
    assert!(record.image_url.ends_with("-photo.jpg"));
}
