// ==========================================
// 设备台账系统 - 库存管理
// ==========================================
// 职责: 新增校验（格式/唯一性/报废拒绝）与可用标志维护
// 红线: 三个标识符在活动库存内全局唯一；
//       报废登记表中的编号永不可再入库
// ==========================================

use crate::domain::asset::{Asset, NewAsset};
use crate::domain::dates::today;
use crate::domain::validation::{conflict_issues, validate_new_asset};
use crate::domain::types::canonical_key;
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::{AssetRepository, DecommissionRepository};
use std::sync::Arc;

pub struct AssetStore {
    assets: Arc<AssetRepository>,
    decommissions: Arc<DecommissionRepository>,
}

impl AssetStore {
    pub fn new(assets: Arc<AssetRepository>, decommissions: Arc<DecommissionRepository>) -> Self {
        Self {
            assets,
            decommissions,
        }
    }

    /// 活动资产是否存在
    pub fn exists(&self, property_number: &str) -> EngineResult<bool> {
        Ok(self.assets.exists(property_number)?)
    }

    /// 按财产编号取活动资产
    pub fn get(&self, property_number: &str) -> EngineResult<Option<Asset>> {
        Ok(self.assets.find(property_number)?)
    }

    /// 全部活动资产
    pub fn list(&self) -> EngineResult<Vec<Asset>> {
        Ok(self.assets.list()?)
    }

    /// 新增一台资产
    ///
    /// 格式、日期、唯一性与报废拒绝的全部问题逐项累积后一次
    /// 报告；通过后以可用状态追加并整表持久化。
    pub fn add(&self, candidate: &NewAsset) -> EngineResult<Asset> {
        let mut issues = Vec::new();

        let normalized = match validate_new_asset(candidate, today()) {
            Ok(asset) => Some(asset),
            Err(errs) => {
                issues.extend(errs);
                None
            }
        };

        // 唯一性与报废拒绝用规范形键检查，与格式问题并列报告
        let property_number = canonical_key(&candidate.property_number);
        let existing = self.assets.list()?;
        issues.extend(conflict_issues(
            &property_number,
            &canonical_key(&candidate.asset_id),
            &canonical_key(&candidate.service_tag),
            &existing,
            &[],
            self.decommissions.contains(&property_number)?,
        ));

        let asset = match normalized {
            Some(asset) if issues.is_empty() => asset,
            _ => return Err(EngineError::Validation(issues)),
        };

        self.assets.append(&asset)?;
        tracing::info!(property_number = %asset.property_number, "资产已入库");
        Ok(asset)
    }

    /// 改写可用标志；资产不存在时为无操作（调用方应已检查存在性）
    pub fn set_availability(&self, property_number: &str, available: bool) -> EngineResult<()> {
        self.assets.set_availability(property_number, available)?;
        Ok(())
    }
}
