// ==========================================
// 宝石库存表格管理 - 命令行入口
// ==========================================
// 用法: gem-inventory <文件路径>
// 输出: 导入结果 JSON（stdout），日志（stderr）
// ==========================================

use anyhow::{bail, Context};
use gem_inventory::config::{ConfigManager, ImportPolicy};
use gem_inventory::importer::{InventoryImporter, InventoryImporterImpl};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    gem_inventory::logging::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("用法: gem-inventory <文件路径>");
    };

    tracing::info!("{} v{}", gem_inventory::APP_NAME, gem_inventory::VERSION);

    let config = ConfigManager::load_default().context("无法加载配置")?;
    let policy = ImportPolicy::from_reader(&config).context("导入配置无效")?;
    let importer = InventoryImporterImpl::with_policy(policy);

    let result = importer
        .import_file(&path)
        .with_context(|| format!("导入失败: {}", path.display()))?;

    tracing::info!("{}", result.summary_message());
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
