// ==========================================
// 设备台账系统 - 报废处理
// ==========================================
// 职责: 终态化资产：冻结三类历史计数快照，可选地移出库存
// 红线: 报废快照与库存移除是两次独立提交；
//       "已退役"判定以报废登记表为准，不以库存缺席为准
// ==========================================

use crate::domain::dates::now_timestamp;
use crate::domain::decommission::DecommissionRecord;
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::{
    AssetRepository, DecommissionRepository, LoanRepository, MaintenanceRepository,
};
use std::sync::Arc;

pub struct DecommissionProcessor {
    assets: Arc<AssetRepository>,
    loans: Arc<LoanRepository>,
    maintenance: Arc<MaintenanceRepository>,
    decommissions: Arc<DecommissionRepository>,
}

impl DecommissionProcessor {
    pub fn new(
        assets: Arc<AssetRepository>,
        loans: Arc<LoanRepository>,
        maintenance: Arc<MaintenanceRepository>,
        decommissions: Arc<DecommissionRepository>,
    ) -> Self {
        Self {
            assets,
            loans,
            maintenance,
            decommissions,
        }
    }

    /// 报废一台资产
    ///
    /// 快照口径：保养/维修计数按记录种类，借出计数为全部记录
    /// （含未归还）。快照写入后，remove_from_inventory 决定是否
    /// 紧接着把资产移出库存——两步独立提交，快照一旦写入即生效。
    pub fn decommission(
        &self,
        property_number: &str,
        remove_from_inventory: bool,
    ) -> EngineResult<DecommissionRecord> {
        if self.decommissions.contains(property_number)? {
            return Err(EngineError::AlreadyDecommissioned(
                property_number.to_string(),
            ));
        }
        let asset = self
            .assets
            .find(property_number)?
            .ok_or_else(|| EngineError::NotFound(property_number.to_string()))?;

        let (maintenance_count, repair_count) =
            self.maintenance.counts_for(&asset.property_number)?;
        let loan_count = self.loans.count_for(&asset.property_number)?;

        let record = DecommissionRecord {
            property_number: asset.property_number.clone(),
            asset_id: asset.asset_id.clone(),
            service_tag: asset.service_tag.clone(),
            model: asset.model.clone(),
            maintenance_count,
            repair_count,
            loan_count,
            decommissioned_at: now_timestamp(),
        };
        self.decommissions.append(&record)?;
        tracing::info!(
            property_number = %record.property_number,
            maintenance_count,
            repair_count,
            loan_count,
            "报废快照已写入"
        );

        if remove_from_inventory {
            self.assets.remove(&asset.property_number)?;
            tracing::info!(property_number = %record.property_number, "资产已移出库存");
        }

        Ok(record)
    }
}
