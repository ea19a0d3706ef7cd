// ==========================================
// 设备台账系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 职责: 生命周期操作的前置条件违规与校验失败
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
///
/// 除 Repository（存储故障，当次操作致命）外均为可恢复的
/// 前置条件违规；引擎先校验后改写，失败不会留下跨表的不一致。
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 校验失败（逐项列出） =====
    #[error("数据校验失败: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("；"))]
    Validation(Vec<crate::domain::CandidateIssue>),

    // ===== 前置条件违规 =====
    #[error("资产不在库存中: {0}")]
    NotFound(String),

    #[error("资产已报废，禁止该操作: {0}")]
    Decommissioned(String),

    #[error("资产已在报废登记表中: {0}")]
    AlreadyDecommissioned(String),

    #[error("资产当前已借出: {0}")]
    AlreadyOnLoan(String),

    #[error("没有未归还的借出记录: {0}")]
    NoOpenLoan(String),

    #[error("没有待完结的维修记录: {0}")]
    NoPendingRepair(String),

    // ===== 存储故障 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
