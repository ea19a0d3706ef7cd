// ==========================================
// 设备台账系统 - 存储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 存储层错误类型
///
/// 对当前操作是致命的：读失败不产生表，写失败不留下半成品文件。
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("表文件读取失败: {path}: {message}")]
    ReadFailure { path: String, message: String },

    #[error("表文件格式损坏: {path}: {message}")]
    MalformedTable { path: String, message: String },

    #[error("表文件写入失败: {path}: {message}")]
    WriteFailure { path: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type StorageResult<T> = Result<T, StorageError>;
