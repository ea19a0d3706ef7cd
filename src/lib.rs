// ==========================================
// 设备台账系统 - 核心库
// ==========================================
// 技术栈: Rust + CSV 登记表文件
// 系统定位: 库存/借出/维修/报废四表的生命周期与一致性引擎
// 执行模型: 同步调用-返回，单写者约定
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与数据约定
pub mod domain;

// 存储层 - 表文件整读整写
pub mod storage;

// 数据仓储层 - 每表一仓储
pub mod repository;

// 引擎层 - 生命周期业务规则
pub mod engine;

// 导入层 - 候选文件与批量校验
pub mod importer;

// 配置层 - 数据目录与表文件路径
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 认证闸门与操作入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    Asset, Borrower, DecommissionRecord, LoanRecord, MaintenanceEntry, MaintenanceKind,
    MaintenanceRecord, MaintenanceTaskFlags, NewAsset, RepairEntry,
};

// 引擎
pub use engine::{
    AssetStore, DecommissionProcessor, EngineError, LoanLifecycleManager,
    MaintenanceLifecycleManager,
};

// 导入
pub use importer::{BatchImportValidator, ImportError, ImportReport, RowViolation};

// API
pub use api::{
    ApiError, AssetStatus, AssetSummary, AuthGate, DashboardApi, FileHashGate, InventoryCounts,
    LedgerApi, OpenGate,
};

// 配置
pub use config::{LedgerConfig, StorePaths};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备台账系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
