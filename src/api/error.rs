// ==========================================
// 设备台账系统 - API 层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 职责: 授权失败与调用方工作流规则，其余错误透传下层
// ==========================================

use crate::engine::EngineError;
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("操作受保护，需要先通过认证")]
    Unauthorized,

    #[error("资产不在库存中，无法登记: {0}")]
    NotInInventory(String),

    #[error("该资产已有待件维修，应先完结既有维修: {0}")]
    PendingRepairOpen(String),

    #[error("写锁获取失败: {0}")]
    LockFailure(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
