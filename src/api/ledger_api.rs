// ==========================================
// 设备台账系统 - 台账操作 API
// ==========================================
// 职责: 组装四个生命周期组件，套上认证闸门与进程级写锁，
//       并落实调用方工作流规则（存在性闸门、待件维修路由）
// 红线: 底层存储不支持并发写者；一切改写操作经由同一把写锁
// ==========================================

use crate::api::auth::AuthGate;
use crate::api::dashboard_api::DashboardApi;
use crate::api::error::{ApiError, ApiResult};
use crate::config::StorePaths;
use crate::domain::asset::{Asset, NewAsset};
use crate::domain::decommission::DecommissionRecord;
use crate::domain::loan::{Borrower, LoanRecord};
use crate::domain::maintenance::{MaintenanceEntry, RepairEntry};
use crate::engine::{
    AssetStore, DecommissionProcessor, LoanLifecycleManager, MaintenanceLifecycleManager,
};
use crate::importer::{BatchImportValidator, ImportReport};
use crate::repository::{
    AssetRepository, DecommissionRepository, LoanRepository, MaintenanceRepository, PendingRepair,
};
use crate::storage::CsvTableStore;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct LedgerApi {
    gate: Arc<dyn AuthGate>,
    write_lock: Mutex<()>,

    decommission_repo: Arc<DecommissionRepository>,

    asset_store: AssetStore,
    loan_manager: LoanLifecycleManager,
    maintenance_manager: MaintenanceLifecycleManager,
    decommission_processor: DecommissionProcessor,
    batch_importer: BatchImportValidator,
    dashboard: DashboardApi,
}

impl LedgerApi {
    /// 在给定数据目录上组装全部组件
    pub fn new(paths: &StorePaths, gate: Arc<dyn AuthGate>) -> Self {
        let store: Arc<CsvTableStore> = Arc::new(CsvTableStore::new());

        let assets = Arc::new(AssetRepository::new(store.clone(), paths.inventory()));
        let loans = Arc::new(LoanRepository::new(store.clone(), paths.loans()));
        let maintenance = Arc::new(MaintenanceRepository::new(store.clone(), paths.maintenance()));
        let decommissions = Arc::new(DecommissionRepository::new(store, paths.decommissions()));

        Self {
            gate,
            write_lock: Mutex::new(()),
            decommission_repo: decommissions.clone(),
            asset_store: AssetStore::new(assets.clone(), decommissions.clone()),
            loan_manager: LoanLifecycleManager::new(
                assets.clone(),
                loans.clone(),
                decommissions.clone(),
            ),
            maintenance_manager: MaintenanceLifecycleManager::new(
                maintenance.clone(),
                decommissions.clone(),
            ),
            decommission_processor: DecommissionProcessor::new(
                assets.clone(),
                loans.clone(),
                maintenance.clone(),
                decommissions.clone(),
            ),
            batch_importer: BatchImportValidator::new(assets.clone(), decommissions.clone()),
            dashboard: DashboardApi::new(assets, loans, maintenance, decommissions),
        }
    }

    pub fn dashboard(&self) -> &DashboardApi {
        &self.dashboard
    }

    fn require_auth(&self) -> ApiResult<()> {
        if self.gate.is_authorized() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    fn write_guard(&self) -> ApiResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| ApiError::LockFailure(e.to_string()))
    }

    /// 登记前的通用闸门：报废判定优先于库存存在性
    fn require_active_in_inventory(&self, property_number: &str) -> ApiResult<()> {
        if self.decommission_repo.contains(property_number)? {
            return Err(ApiError::Engine(crate::engine::EngineError::Decommissioned(
                property_number.to_string(),
            )));
        }
        if !self.asset_store.exists(property_number)? {
            return Err(ApiError::NotInInventory(property_number.to_string()));
        }
        Ok(())
    }

    // ==========================================
    // 受保护操作（先过认证闸门）
    // ==========================================

    /// 新增一台资产（受保护）
    pub fn add_asset(&self, candidate: &NewAsset) -> ApiResult<Asset> {
        self.require_auth()?;
        let _guard = self.write_guard()?;
        Ok(self.asset_store.add(candidate)?)
    }

    /// 报废一台资产（受保护）
    pub fn decommission(
        &self,
        property_number: &str,
        remove_from_inventory: bool,
    ) -> ApiResult<DecommissionRecord> {
        self.require_auth()?;
        let _guard = self.write_guard()?;
        Ok(self
            .decommission_processor
            .decommission(property_number, remove_from_inventory)?)
    }

    /// 批量导入候选清单（受保护，全有或全无）
    pub fn import_candidates(&self, candidates: &[NewAsset]) -> ApiResult<ImportReport> {
        self.require_auth()?;
        let _guard = self.write_guard()?;
        Ok(self.batch_importer.commit(candidates)?)
    }

    /// 从候选文件批量导入（受保护，全有或全无）
    pub fn import_file(&self, path: &Path) -> ApiResult<ImportReport> {
        self.require_auth()?;
        let _guard = self.write_guard()?;
        Ok(self.batch_importer.import_file(path)?)
    }

    // ==========================================
    // 借出生命周期
    // ==========================================

    pub fn open_loan(&self, property_number: &str, borrower: &Borrower) -> ApiResult<()> {
        let _guard = self.write_guard()?;
        Ok(self.loan_manager.open_loan(property_number, borrower)?)
    }

    pub fn close_loan(&self, property_number: &str) -> ApiResult<LoanRecord> {
        let _guard = self.write_guard()?;
        Ok(self.loan_manager.close_loan(property_number)?)
    }

    // ==========================================
    // 维修/保养生命周期
    // ==========================================

    pub fn find_pending_repair(&self, property_number: &str) -> ApiResult<Option<PendingRepair>> {
        Ok(self.maintenance_manager.find_pending_repair(property_number)?)
    }

    pub fn register_maintenance(
        &self,
        property_number: &str,
        entry: &MaintenanceEntry,
    ) -> ApiResult<()> {
        let _guard = self.write_guard()?;
        self.require_active_in_inventory(property_number)?;
        Ok(self
            .maintenance_manager
            .register_maintenance(property_number, entry)?)
    }

    /// 登记维修；已存在待件维修时拒绝，调用方应转去完结
    pub fn register_repair(&self, property_number: &str, entry: &RepairEntry) -> ApiResult<()> {
        let _guard = self.write_guard()?;
        self.require_active_in_inventory(property_number)?;
        if self
            .maintenance_manager
            .find_pending_repair(property_number)?
            .is_some()
        {
            return Err(ApiError::PendingRepairOpen(property_number.to_string()));
        }
        Ok(self
            .maintenance_manager
            .register_repair(property_number, entry)?)
    }

    pub fn finalize_repair(
        &self,
        property_number: &str,
        technician: &str,
        final_description: &str,
    ) -> ApiResult<()> {
        let _guard = self.write_guard()?;
        self.require_active_in_inventory(property_number)?;
        Ok(self.maintenance_manager.finalize_pending(
            property_number,
            technician,
            final_description,
        )?)
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn list_assets(&self) -> ApiResult<Vec<Asset>> {
        Ok(self.asset_store.list()?)
    }

    pub fn get_asset(&self, property_number: &str) -> ApiResult<Option<Asset>> {
        Ok(self.asset_store.get(property_number)?)
    }

    pub fn is_decommissioned(&self, property_number: &str) -> ApiResult<bool> {
        Ok(self.decommission_repo.contains(property_number)?)
    }

    pub fn list_decommissioned(&self) -> ApiResult<Vec<DecommissionRecord>> {
        Ok(self.decommission_repo.list()?)
    }
}
