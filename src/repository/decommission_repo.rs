// ==========================================
// 设备台账系统 - 报废登记表仓储
// ==========================================
// 职责: 报废快照的列契约、存在性判定与一次性追加
// 红线: 报废记录写入后不可变；该表是"已退役"判定的权威来源
// ==========================================

use crate::domain::decommission::DecommissionRecord;
use crate::domain::types::same_key;
use crate::repository::error::RepositoryResult;
use crate::storage::{Table, TableStore};
use std::path::PathBuf;
use std::sync::Arc;

/// 报废登记表的固定列（兼容契约，不得改动）
pub const DECOMMISSION_COLUMNS: [&str; 8] = [
    "Num_Propiedad",
    "ID_Laptop",
    "Service_Tag",
    "Modelo",
    "Num_Mantenimiento",
    "Num_Reparaciones",
    "Num_Prestamos",
    "Fecha_Dec",
];

pub struct DecommissionRepository {
    store: Arc<dyn TableStore + Send + Sync>,
    path: PathBuf,
}

impl DecommissionRepository {
    pub fn new(store: Arc<dyn TableStore + Send + Sync>, path: PathBuf) -> Self {
        Self { store, path }
    }

    fn load_table(&self) -> RepositoryResult<Table> {
        Ok(self.store.load(&self.path, &DECOMMISSION_COLUMNS)?)
    }

    fn save_table(&self, table: &Table) -> RepositoryResult<()> {
        let order: Vec<String> = DECOMMISSION_COLUMNS.iter().map(|c| c.to_string()).collect();
        Ok(self.store.save(&self.path, table, &order)?)
    }

    fn record_from_row(table: &Table, row: usize) -> DecommissionRecord {
        let count = |column: &str| {
            table
                .cell(row, column)
                .trim()
                .parse::<u32>()
                .unwrap_or_default()
        };
        DecommissionRecord {
            property_number: table.cell(row, "Num_Propiedad").trim().to_string(),
            asset_id: table.cell(row, "ID_Laptop").trim().to_string(),
            service_tag: table.cell(row, "Service_Tag").trim().to_string(),
            model: table.cell(row, "Modelo").trim().to_string(),
            maintenance_count: count("Num_Mantenimiento"),
            repair_count: count("Num_Reparaciones"),
            loan_count: count("Num_Prestamos"),
            decommissioned_at: table.cell(row, "Fecha_Dec").trim().to_string(),
        }
    }

    /// 财产编号是否已退役（不区分大小写）
    pub fn contains(&self, property_number: &str) -> RepositoryResult<bool> {
        Ok(self.find(property_number)?.is_some())
    }

    /// 按财产编号取报废快照
    pub fn find(&self, property_number: &str) -> RepositoryResult<Option<DecommissionRecord>> {
        let table = self.load_table()?;
        Ok((0..table.row_count())
            .find(|&row| same_key(table.cell(row, "Num_Propiedad"), property_number))
            .map(|row| Self::record_from_row(&table, row)))
    }

    /// 全部报废快照
    pub fn list(&self) -> RepositoryResult<Vec<DecommissionRecord>> {
        let table = self.load_table()?;
        Ok((0..table.row_count())
            .map(|row| Self::record_from_row(&table, row))
            .collect())
    }

    /// 追加一条报废快照并整表持久化
    pub fn append(&self, record: &DecommissionRecord) -> RepositoryResult<()> {
        let mut table = self.load_table()?;
        table.push_row(&[
            ("Num_Propiedad", record.property_number.clone()),
            ("ID_Laptop", record.asset_id.clone()),
            ("Service_Tag", record.service_tag.clone()),
            ("Modelo", record.model.clone()),
            ("Num_Mantenimiento", record.maintenance_count.to_string()),
            ("Num_Reparaciones", record.repair_count.to_string()),
            ("Num_Prestamos", record.loan_count.to_string()),
            ("Fecha_Dec", record.decommissioned_at.clone()),
        ]);
        self.save_table(&table)
    }
}
