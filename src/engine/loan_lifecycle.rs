// ==========================================
// 设备台账系统 - 借出生命周期
// ==========================================
// 职责: 借出/归还状态机（可用 ⇄ 借出，报废为终态闸门）
// 红线: 可用标志是借出日志的派生缓存，改变借出状态的
//       每条路径必须在同一逻辑操作内同步该标志
// ==========================================

use crate::domain::dates::now_timestamp;
use crate::domain::loan::{Borrower, LoanRecord};
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::{AssetRepository, DecommissionRepository, LoanRepository};
use std::sync::Arc;

pub struct LoanLifecycleManager {
    assets: Arc<AssetRepository>,
    loans: Arc<LoanRepository>,
    decommissions: Arc<DecommissionRepository>,
}

impl LoanLifecycleManager {
    pub fn new(
        assets: Arc<AssetRepository>,
        loans: Arc<LoanRepository>,
        decommissions: Arc<DecommissionRepository>,
    ) -> Self {
        Self {
            assets,
            loans,
            decommissions,
        }
    }

    /// 登记借出
    ///
    /// 报废判定优先于库存判定（报废登记表是"已退役"的权威来源）。
    /// 成功时先追加未归还记录（事实来源），再翻转可用标志。
    pub fn open_loan(&self, property_number: &str, borrower: &Borrower) -> EngineResult<()> {
        if self.decommissions.contains(property_number)? {
            return Err(EngineError::Decommissioned(property_number.to_string()));
        }
        let asset = self
            .assets
            .find(property_number)?
            .ok_or_else(|| EngineError::NotFound(property_number.to_string()))?;
        if !asset.available {
            return Err(EngineError::AlreadyOnLoan(property_number.to_string()));
        }

        self.loans
            .append_open(&asset.property_number, borrower, &now_timestamp())?;
        self.assets.set_availability(&asset.property_number, false)?;
        tracing::info!(
            property_number = %asset.property_number,
            borrower = %borrower.name,
            "借出已登记"
        );
        Ok(())
    }

    /// 登记归还
    ///
    /// 回填最近追加的未归还记录；无未归还记录时失败。
    /// 归还后资产恢复可用（资产已不在库存时该步为无操作）。
    pub fn close_loan(&self, property_number: &str) -> EngineResult<LoanRecord> {
        let closed = self
            .loans
            .close_latest_open(property_number, &now_timestamp())?
            .ok_or_else(|| EngineError::NoOpenLoan(property_number.to_string()))?;

        self.assets.set_availability(property_number, true)?;
        tracing::info!(property_number = %property_number, "归还已登记");
        Ok(closed)
    }
}
