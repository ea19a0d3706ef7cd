// ==========================================
// 设备台账系统 - 维修/保养生命周期
// ==========================================
// 职责: 维修状态机（无 ⇄ 待件 ⇄ 已完结；完结后方可再次待件）
// 红线: 同一资产至多一条待件维修；待件完结改写原记录，不另起新行
// ==========================================

use crate::domain::dates::now_timestamp;
use crate::domain::maintenance::{
    MaintenanceEntry, MaintenanceKind, MaintenanceRecord, RepairEntry,
};
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::{DecommissionRepository, MaintenanceRepository, PendingRepair};
use std::sync::Arc;

pub struct MaintenanceLifecycleManager {
    maintenance: Arc<MaintenanceRepository>,
    decommissions: Arc<DecommissionRepository>,
}

impl MaintenanceLifecycleManager {
    pub fn new(
        maintenance: Arc<MaintenanceRepository>,
        decommissions: Arc<DecommissionRepository>,
    ) -> Self {
        Self {
            maintenance,
            decommissions,
        }
    }

    fn reject_decommissioned(&self, property_number: &str) -> EngineResult<()> {
        if self.decommissions.contains(property_number)? {
            return Err(EngineError::Decommissioned(property_number.to_string()));
        }
        Ok(())
    }

    /// 查找待件维修记录（无则 None）
    pub fn find_pending_repair(
        &self,
        property_number: &str,
    ) -> EngineResult<Option<PendingRepair>> {
        Ok(self.maintenance.find_pending_repair(property_number)?)
    }

    /// 登记一次保养：完成时刻即当下，任务勾选项随行存储
    pub fn register_maintenance(
        &self,
        property_number: &str,
        entry: &MaintenanceEntry,
    ) -> EngineResult<()> {
        self.reject_decommissioned(property_number)?;

        let record = MaintenanceRecord {
            property_number: property_number.trim().to_uppercase(),
            event_date: now_timestamp(),
            technician: entry.technician.trim().to_string(),
            kind: Some(MaintenanceKind::Maintenance),
            repair_description: String::new(),
            owner_name: entry.owner_name.trim().to_string(),
            description: entry.description.trim().to_string(),
            domain: entry.domain.trim().to_string(),
            tasks: entry.tasks,
        };
        self.maintenance.append(&record, false)?;
        tracing::info!(property_number = %record.property_number, "保养已登记");
        Ok(())
    }

    /// 登记一次维修
    ///
    /// 待件时完成时刻留空、部件说明缀入描述、标志列（若有）打标记；
    /// 否则完成时刻即当下。已存在待件维修时的路由（转去完结而非
    /// 再登记）由调用方工作流先行保证，此处不重复校验。
    pub fn register_repair(
        &self,
        property_number: &str,
        entry: &RepairEntry,
    ) -> EngineResult<()> {
        self.reject_decommissioned(property_number)?;

        let mut description = entry.description.trim().to_string();
        let event_date = if entry.awaiting_part {
            if let Some(part) = entry.part_note.as_deref().map(str::trim) {
                if !part.is_empty() {
                    if !description.is_empty() {
                        description.push('\n');
                    }
                    description.push_str(&format!("Pieza en espera: {part}"));
                }
            }
            String::new()
        } else {
            now_timestamp()
        };

        let record = MaintenanceRecord {
            property_number: property_number.trim().to_uppercase(),
            event_date,
            technician: entry.technician.trim().to_string(),
            kind: Some(MaintenanceKind::Repair),
            repair_description: description,
            owner_name: String::new(),
            description: String::new(),
            domain: String::new(),
            tasks: Default::default(),
        };
        self.maintenance.append(&record, entry.awaiting_part)?;
        tracing::info!(
            property_number = %record.property_number,
            awaiting_part = entry.awaiting_part,
            "维修已登记"
        );
        Ok(())
    }

    /// 完结待件维修
    ///
    /// 原地改写定位到的记录：回填完成时刻、覆写技术员与最终描述、
    /// 清除标志。无待件记录时失败。
    pub fn finalize_pending(
        &self,
        property_number: &str,
        technician: &str,
        final_description: &str,
    ) -> EngineResult<()> {
        let finalized = self.maintenance.finalize_pending(
            property_number,
            technician.trim(),
            final_description.trim(),
            &now_timestamp(),
        )?;
        if !finalized {
            return Err(EngineError::NoPendingRepair(property_number.to_string()));
        }
        tracing::info!(property_number = %property_number, "待件维修已完结");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CsvTableStore, TableStore};
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        mant_path: PathBuf,
        store: Arc<CsvTableStore>,
        maintenance: Arc<MaintenanceRepository>,
        manager: MaintenanceLifecycleManager,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store: Arc<CsvTableStore> = Arc::new(CsvTableStore::new());
        let mant_path = dir.path().join("mant.csv");
        let maintenance = Arc::new(MaintenanceRepository::new(store.clone(), mant_path.clone()));
        let decommissions = Arc::new(DecommissionRepository::new(
            store.clone(),
            dir.path().join("dec.csv"),
        ));
        let manager = MaintenanceLifecycleManager::new(maintenance.clone(), decommissions);
        Fixture {
            _dir: dir,
            mant_path,
            store,
            maintenance,
            manager,
        }
    }

    fn repair_entry(awaiting: bool) -> RepairEntry {
        RepairEntry {
            technician: "Luis".to_string(),
            description: "pantalla dañada".to_string(),
            awaiting_part: awaiting,
            part_note: awaiting.then(|| "battery".to_string()),
        }
    }

    #[test]
    fn test_register_repair_completed_has_event_date() {
        let f = fixture();
        f.manager
            .register_repair("R40022104", &repair_entry(false))
            .unwrap();

        let records = f.maintenance.list_for("R40022104").unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].event_date.is_empty());
        assert!(f.manager.find_pending_repair("R40022104").unwrap().is_none());
    }

    #[test]
    fn test_awaiting_part_appends_part_note() {
        let f = fixture();
        f.manager
            .register_repair("R40022104", &repair_entry(true))
            .unwrap();

        let pending = f.manager.find_pending_repair("R40022104").unwrap().unwrap();
        assert!(pending.description.contains("Pieza en espera: battery"));
        assert!(pending.description.starts_with("pantalla dañada"));
    }

    #[test]
    fn test_pending_round_trip_yields_single_record() {
        let f = fixture();
        f.manager
            .register_repair("R40022104", &repair_entry(true))
            .unwrap();
        f.manager
            .finalize_pending("R40022104", "Luis", "replaced battery")
            .unwrap();

        let records = f.maintenance.list_for("R40022104").unwrap();
        assert_eq!(records.len(), 1, "finalize must mutate, not append");
        assert!(!records[0].event_date.is_empty());
        assert_eq!(records[0].repair_description, "replaced battery");
        assert!(f.manager.find_pending_repair("R40022104").unwrap().is_none());
    }

    #[test]
    fn test_finalize_without_pending_fails() {
        let f = fixture();
        let err = f
            .manager
            .finalize_pending("R40022104", "Luis", "nada")
            .unwrap_err();
        assert!(matches!(err, EngineError::NoPendingRepair(_)));
    }

    #[test]
    fn test_pending_flag_column_is_set_and_cleared() {
        let f = fixture();
        // 预置带标志列的旧表结构
        let mut table = crate::storage::Table::new(
            crate::repository::MAINTENANCE_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>(),
        );
        table.ensure_column("Esperando_Pieza");
        let order: Vec<String> = table.columns().to_vec();
        f.store.save(&f.mant_path, &table, &order).unwrap();

        f.manager
            .register_repair("R40022104", &repair_entry(true))
            .unwrap();
        let loaded = f
            .store
            .load(&f.mant_path, &crate::repository::MAINTENANCE_COLUMNS)
            .unwrap();
        assert_eq!(loaded.cell(0, "Esperando_Pieza"), "X");

        f.manager
            .finalize_pending("R40022104", "Luis", "listo")
            .unwrap();
        let loaded = f
            .store
            .load(&f.mant_path, &crate::repository::MAINTENANCE_COLUMNS)
            .unwrap();
        assert_eq!(loaded.cell(0, "Esperando_Pieza"), "");
        assert!(loaded.has_column("Esperando_Pieza"), "flag column must survive saves");
    }

    #[test]
    fn test_decommissioned_asset_rejects_maintenance() {
        let f = fixture();
        let decommissions = Arc::new(DecommissionRepository::new(
            f.store.clone(),
            f._dir.path().join("dec.csv"),
        ));
        decommissions
            .append(&crate::domain::DecommissionRecord {
                property_number: "R40022104".to_string(),
                asset_id: "UIPRA-EST-L045".to_string(),
                service_tag: "4TR2M53".to_string(),
                model: "5510".to_string(),
                maintenance_count: 0,
                repair_count: 0,
                loan_count: 0,
                decommissioned_at: "2026-01-01 00:00:00".to_string(),
            })
            .unwrap();

        let err = f
            .manager
            .register_maintenance("R40022104", &MaintenanceEntry::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Decommissioned(_)));
    }
}
