// ==========================================
// 设备台账系统 - API 层
// ==========================================
// 职责: 认证闸门、写锁与调用方工作流规则；对外的操作入口
// ==========================================

pub mod auth;
pub mod dashboard_api;
pub mod error;
pub mod ledger_api;

pub use auth::{AuthGate, FileHashGate, OpenGate, DEFAULT_AUTH_WINDOW_SECS};
pub use dashboard_api::{AssetStatus, AssetSummary, DashboardApi, InventoryCounts};
pub use error::{ApiError, ApiResult};
pub use ledger_api::LedgerApi;
