// ==========================================
// 设备台账系统 - 配置层
// ==========================================
// 职责: 数据目录解析与四个登记表的文件路径
// 说明: 文件名沿用既有登记表（便携模式：数据随程序走）
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 数据目录的环境变量覆盖
pub const DATA_DIR_ENV: &str = "ASSET_LEDGER_DATA_DIR";

/// 四个登记表的固定文件名（沿用既有数据文件的命名）
pub const INVENTORY_FILE: &str = "Registro Laptops.csv";
pub const LOANS_FILE: &str = "Registro_Prestamos_Laptop.csv";
pub const MAINTENANCE_FILE: &str = "Registro_Mantenimiento_Reparacion_Laptop.csv";
pub const DECOMMISSIONS_FILE: &str = "Registro_Decomisados.csv";

/// 登记表路径集合
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorePaths {
    pub data_dir: PathBuf,
}

impl StorePaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// 默认数据目录：环境变量 → 用户数据目录 → 便携式 ./data
    pub fn resolve_default() -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Self::new(dir);
            }
        }
        if let Some(base) = dirs::data_dir() {
            return Self::new(base.join("asset-ledger"));
        }
        Self::new("data")
    }

    fn join(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn inventory(&self) -> PathBuf {
        self.join(INVENTORY_FILE)
    }

    pub fn loans(&self) -> PathBuf {
        self.join(LOANS_FILE)
    }

    pub fn maintenance(&self) -> PathBuf {
        self.join(MAINTENANCE_FILE)
    }

    pub fn decommissions(&self) -> PathBuf {
        self.join(DECOMMISSIONS_FILE)
    }
}

/// 应用级配置（数据目录 + 认证闸门参数）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub data_dir: PathBuf,
    /// 密钥文件内容的 SHA-256 摘要（十六进制）；None = 不启用闸门
    pub auth_digest: Option<String>,
    /// 授权窗口秒数
    pub auth_window_secs: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: StorePaths::resolve_default().data_dir,
            auth_digest: None,
            auth_window_secs: crate::api::auth::DEFAULT_AUTH_WINDOW_SECS,
        }
    }
}

impl LedgerConfig {
    pub fn store_paths(&self) -> StorePaths {
        StorePaths::new(&self.data_dir)
    }

    /// 从 JSON 配置文件加载；文件不存在时取默认值
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
