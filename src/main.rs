// ==========================================
// 设备台账系统 - 控制台入口
// ==========================================
// 职责: 初始化日志，打开台账，输出四表概况
// ==========================================

use asset_ledger::api::{LedgerApi, OpenGate};
use asset_ledger::config::StorePaths;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    asset_ledger::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", asset_ledger::APP_NAME, asset_ledger::VERSION);
    tracing::info!("==================================================");

    let paths = StorePaths::resolve_default();
    tracing::info!("数据目录: {}", paths.data_dir.display());

    // 只读概况，无需认证闸门
    let api = LedgerApi::new(&paths, Arc::new(OpenGate));

    let counts = api.dashboard().inventory_counts()?;
    let decommissioned = api.dashboard().decommissioned_count()?;

    tracing::info!("库存总数: {}", counts.total);
    tracing::info!("可用: {}", counts.available);
    tracing::info!("借出中: {}", counts.on_loan);
    tracing::info!("已报废: {}", decommissioned);

    Ok(())
}
