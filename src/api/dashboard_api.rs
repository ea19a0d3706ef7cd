// ==========================================
// 设备台账系统 - 台账概览 API
// ==========================================
// 职责: 库存统计（总数/借出/可用）与单机汇总查询
// 说明: 只读聚合，不做任何写出
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::dates::fmt_date_only;
use crate::repository::{
    AssetRepository, DecommissionRepository, LoanRepository, MaintenanceRepository,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 资产当前状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    Available,      // 在库可用
    OnLoan,         // 已借出
    Decommissioned, // 已报废（终态）
}

/// 库存计数
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InventoryCounts {
    pub total: usize,
    pub available: usize,
    pub on_loan: usize,
}

/// 单机汇总
///
/// 活动资产的计数为实时聚合；已报废资产取报废时冻结的快照。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSummary {
    pub property_number: String,
    pub asset_id: String,
    pub service_tag: String,
    pub model: String,
    pub status: AssetStatus,
    pub maintenance_count: u32,
    pub repair_count: u32,
    pub loan_count: u32,
    pub last_service_date: Option<String>, // 最近一次维修/保养日期（快照不含）
    pub warranty_date: Option<String>,
    pub purchase_date: Option<String>,
}

pub struct DashboardApi {
    assets: Arc<AssetRepository>,
    loans: Arc<LoanRepository>,
    maintenance: Arc<MaintenanceRepository>,
    decommissions: Arc<DecommissionRepository>,
}

impl DashboardApi {
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

    /// 库存计数：总数 = 可用 + 借出
    pub fn inventory_counts(&self) -> ApiResult<InventoryCounts> {
        let assets = self.assets.list()?;
        let available = assets.iter().filter(|a| a.available).count();
        Ok(InventoryCounts {
            total: assets.len(),
            available,
            on_loan: assets.len() - available,
        })
    }

    /// 报废登记表的记录数
    pub fn decommissioned_count(&self) -> ApiResult<usize> {
        Ok(self.decommissions.list()?.len())
    }

    /// 单机汇总；库存与报废登记表均无此编号时返回 None
    ///
    /// 报废判定优先：快照在册的资产一律以报废状态呈现，
    /// 即便其库存行尚未移除。
    pub fn asset_summary(&self, property_number: &str) -> ApiResult<Option<AssetSummary>> {
        if let Some(snapshot) = self.decommissions.find(property_number)? {
            return Ok(Some(AssetSummary {
                property_number: snapshot.property_number,
                asset_id: snapshot.asset_id,
                service_tag: snapshot.service_tag,
                model: snapshot.model,
                status: AssetStatus::Decommissioned,
                maintenance_count: snapshot.maintenance_count,
                repair_count: snapshot.repair_count,
                loan_count: snapshot.loan_count,
                last_service_date: None,
                warranty_date: None,
                purchase_date: None,
            }));
        }

        let asset = match self.assets.find(property_number)? {
            Some(asset) => asset,
            None => return Ok(None),
        };

        let (maintenance_count, repair_count) =
            self.maintenance.counts_for(&asset.property_number)?;
        let loan_count = self.loans.count_for(&asset.property_number)?;
        let last_service_date = self.maintenance.last_event_date_for(&asset.property_number)?;

        Ok(Some(AssetSummary {
            status: if asset.available {
                AssetStatus::Available
            } else {
                AssetStatus::OnLoan
            },
            property_number: asset.property_number,
            asset_id: asset.asset_id,
            service_tag: asset.service_tag,
            model: asset.model,
            maintenance_count,
            repair_count,
            loan_count,
            last_service_date,
            warranty_date: Some(fmt_date_only(&asset.warranty_date)),
            purchase_date: Some(fmt_date_only(&asset.purchase_date)),
        }))
    }
}
