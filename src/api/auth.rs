// ==========================================
// 设备台账系统 - 认证闸门
// ==========================================
// 职责: 受保护操作（入库/报废/批量导入）前的授权判定
// 说明: 引擎只消费 AuthGate 契约；密钥文件实现随库附带
// ==========================================

use chrono::{DateTime, Duration, Local};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Mutex;

/// 默认授权窗口（秒）
pub const DEFAULT_AUTH_WINDOW_SECS: i64 = 15 * 60;

/// 授权判定契约
pub trait AuthGate: Send + Sync {
    fn is_authorized(&self) -> bool;
}

/// 常开闸门（嵌入式调用与测试）
pub struct OpenGate;

impl AuthGate for OpenGate {
    fn is_authorized(&self) -> bool {
        true
    }
}

/// 密钥文件闸门
///
/// 出示的文件内容 SHA-256 摘要与配置值一致时，开启一段
/// 固定时长的授权窗口；摘要不符则立即收回授权。
pub struct FileHashGate {
    expected_digest: String,
    window: Duration,
    authorized_until: Mutex<Option<DateTime<Local>>>,
}

impl FileHashGate {
    pub fn new(expected_digest: impl Into<String>, window_secs: i64) -> Self {
        Self {
            expected_digest: expected_digest.into(),
            window: Duration::seconds(window_secs),
            authorized_until: Mutex::new(None),
        }
    }

    fn until(&self) -> std::sync::MutexGuard<'_, Option<DateTime<Local>>> {
        match self.authorized_until.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 出示密钥文件；返回是否通过
    pub fn present_key_file(&self, path: &Path) -> std::io::Result<bool> {
        let content = std::fs::read(path)?;
        let digest = format!("{:x}", Sha256::digest(&content));

        let mut until = self.until();
        if digest.eq_ignore_ascii_case(&self.expected_digest) {
            *until = Some(Local::now() + self.window);
            Ok(true)
        } else {
            *until = None;
            Ok(false)
        }
    }

    /// 剩余授权秒数（未授权时 None）
    pub fn remaining_secs(&self) -> Option<i64> {
        let until = (*self.until())?;
        let remaining = (until - Local::now()).num_seconds();
        (remaining > 0).then_some(remaining)
    }
}

impl AuthGate for FileHashGate {
    fn is_authorized(&self) -> bool {
        self.until().is_some_and(|until| Local::now() < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn digest_of(content: &[u8]) -> String {
        format!("{:x}", Sha256::digest(content))
    }

    #[test]
    fn test_matching_key_file_opens_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"clave secreta").unwrap();

        let gate = FileHashGate::new(digest_of(b"clave secreta"), 60);
        assert!(!gate.is_authorized());

        assert!(gate.present_key_file(file.path()).unwrap());
        assert!(gate.is_authorized());
        assert!(gate.remaining_secs().unwrap() <= 60);
    }

    #[test]
    fn test_wrong_key_file_revokes_authorization() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        good.write_all(b"clave secreta").unwrap();
        let mut bad = tempfile::NamedTempFile::new().unwrap();
        bad.write_all(b"otra cosa").unwrap();

        let gate = FileHashGate::new(digest_of(b"clave secreta"), 60);
        gate.present_key_file(good.path()).unwrap();
        assert!(gate.is_authorized());

        assert!(!gate.present_key_file(bad.path()).unwrap());
        assert!(!gate.is_authorized());
    }

    #[test]
    fn test_digest_comparison_ignores_case() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"clave").unwrap();

        let gate = FileHashGate::new(digest_of(b"clave").to_uppercase(), 60);
        assert!(gate.present_key_file(file.path()).unwrap());
    }
}
