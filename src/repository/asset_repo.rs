// ==========================================
// 设备台账系统 - 库存登记表仓储
// ==========================================
// 职责: 库存表的列契约、行⇄实体映射与整读整写
// 红线: Repository 不含业务逻辑；列名与列序不得改动
// ==========================================

use crate::domain::asset::Asset;
use crate::domain::types::{is_marked, same_key, PRESENCE_MARK};
use crate::repository::error::RepositoryResult;
use crate::storage::{Table, TableStore};
use std::path::PathBuf;
use std::sync::Arc;

/// 库存登记表的固定列（兼容契约，不得改动）
pub const INVENTORY_COLUMNS: [&str; 7] = [
    "Num_Propiedad",
    "ID_Laptop",
    "Service_Tag",
    "Modelo",
    "Disponible",
    "Garantía",
    "Fecha_Compra",
];

pub struct AssetRepository {
    store: Arc<dyn TableStore + Send + Sync>,
    path: PathBuf,
}

impl AssetRepository {
    pub fn new(store: Arc<dyn TableStore + Send + Sync>, path: PathBuf) -> Self {
        Self { store, path }
    }

    fn load_table(&self) -> RepositoryResult<Table> {
        Ok(self.store.load(&self.path, &INVENTORY_COLUMNS)?)
    }

    fn save_table(&self, table: &Table) -> RepositoryResult<()> {
        let order: Vec<String> = INVENTORY_COLUMNS.iter().map(|c| c.to_string()).collect();
        Ok(self.store.save(&self.path, table, &order)?)
    }

    fn asset_from_row(table: &Table, row: usize) -> Asset {
        Asset {
            property_number: table.cell(row, "Num_Propiedad").trim().to_string(),
            asset_id: table.cell(row, "ID_Laptop").trim().to_string(),
            service_tag: table.cell(row, "Service_Tag").trim().to_string(),
            model: table.cell(row, "Modelo").trim().to_string(),
            available: is_marked(table.cell(row, "Disponible")),
            warranty_date: table.cell(row, "Garantía").trim().to_string(),
            purchase_date: table.cell(row, "Fecha_Compra").trim().to_string(),
        }
    }

    fn row_cells(asset: &Asset) -> Vec<(&'static str, String)> {
        vec![
            ("Num_Propiedad", asset.property_number.clone()),
            ("ID_Laptop", asset.asset_id.clone()),
            ("Service_Tag", asset.service_tag.clone()),
            ("Modelo", asset.model.clone()),
            (
                "Disponible",
                if asset.available {
                    PRESENCE_MARK.to_string()
                } else {
                    String::new()
                },
            ),
            ("Garantía", asset.warranty_date.clone()),
            ("Fecha_Compra", asset.purchase_date.clone()),
        ]
    }

    /// 全部活动资产
    pub fn list(&self) -> RepositoryResult<Vec<Asset>> {
        let table = self.load_table()?;
        Ok((0..table.row_count())
            .map(|row| Self::asset_from_row(&table, row))
            .collect())
    }

    /// 按财产编号查找（不区分大小写）
    pub fn find(&self, property_number: &str) -> RepositoryResult<Option<Asset>> {
        let table = self.load_table()?;
        Ok((0..table.row_count())
            .find(|&row| same_key(table.cell(row, "Num_Propiedad"), property_number))
            .map(|row| Self::asset_from_row(&table, row)))
    }

    pub fn exists(&self, property_number: &str) -> RepositoryResult<bool> {
        Ok(self.find(property_number)?.is_some())
    }

    /// 追加一台资产并整表持久化
    pub fn append(&self, asset: &Asset) -> RepositoryResult<()> {
        self.append_all(std::slice::from_ref(asset))
    }

    /// 追加一批资产，单次整表写出（批量导入的原子提交点）
    pub fn append_all(&self, assets: &[Asset]) -> RepositoryResult<()> {
        let mut table = self.load_table()?;
        for asset in assets {
            table.push_row(&Self::row_cells(asset));
        }
        self.save_table(&table)
    }

    /// 改写可用标志；资产不存在时为无操作（幂等，不触发写出）
    ///
    /// 返回是否有行被改写。
    pub fn set_availability(&self, property_number: &str, available: bool) -> RepositoryResult<bool> {
        let mut table = self.load_table()?;
        let rows = table.rows_where(|row| same_key(table.cell(row, "Num_Propiedad"), property_number));
        if rows.is_empty() {
            return Ok(false);
        }
        let mark = if available { PRESENCE_MARK } else { "" };
        for row in rows {
            table.set_cell(row, "Disponible", mark);
        }
        self.save_table(&table)?;
        Ok(true)
    }

    /// 从库存移除（报废的第二步，独立提交）
    ///
    /// 返回是否有行被移除。
    pub fn remove(&self, property_number: &str) -> RepositoryResult<bool> {
        let mut table = self.load_table()?;
        let keep: Vec<bool> = (0..table.row_count())
            .map(|row| !same_key(table.cell(row, "Num_Propiedad"), property_number))
            .collect();
        if keep.iter().all(|&k| k) {
            return Ok(false);
        }
        table.retain_rows(|row| keep[row]);
        self.save_table(&table)?;
        Ok(true)
    }
}
