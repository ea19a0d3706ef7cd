// ==========================================
// 设备台账系统 - 借出登记表仓储
// ==========================================
// 职责: 借出日志的列契约、追加与归还回填
// 红线: 日志只追加；归还只回填 Dia_Entr，从不删行
// ==========================================

use crate::domain::loan::{Borrower, LoanRecord};
use crate::domain::types::same_key;
use crate::repository::error::RepositoryResult;
use crate::storage::{is_blank, Table, TableStore};
use std::path::PathBuf;
use std::sync::Arc;

/// 借出登记表的固定列（兼容契约，不得改动）
pub const LOAN_COLUMNS: [&str; 6] = [
    "Num_Propiedad",
    "Nombre",
    "Identificador",
    "Num_Tele",
    "Dia_Pres",
    "Dia_Entr",
];

pub struct LoanRepository {
    store: Arc<dyn TableStore + Send + Sync>,
    path: PathBuf,
}

impl LoanRepository {
    pub fn new(store: Arc<dyn TableStore + Send + Sync>, path: PathBuf) -> Self {
        Self { store, path }
    }

    fn load_table(&self) -> RepositoryResult<Table> {
        Ok(self.store.load(&self.path, &LOAN_COLUMNS)?)
    }

    fn save_table(&self, table: &Table) -> RepositoryResult<()> {
        let order: Vec<String> = LOAN_COLUMNS.iter().map(|c| c.to_string()).collect();
        Ok(self.store.save(&self.path, table, &order)?)
    }

    fn record_from_row(table: &Table, row: usize) -> LoanRecord {
        LoanRecord {
            property_number: table.cell(row, "Num_Propiedad").trim().to_string(),
            borrower_name: table.cell(row, "Nombre").trim().to_string(),
            borrower_identifier: table.cell(row, "Identificador").trim().to_string(),
            borrower_phone: table.cell(row, "Num_Tele").trim().to_string(),
            loaned_at: table.cell(row, "Dia_Pres").trim().to_string(),
            returned_at: table.cell(row, "Dia_Entr").trim().to_string(),
        }
    }

    /// 某资产的全部借出记录（含已归还）
    pub fn list_for(&self, property_number: &str) -> RepositoryResult<Vec<LoanRecord>> {
        let table = self.load_table()?;
        Ok((0..table.row_count())
            .filter(|&row| same_key(table.cell(row, "Num_Propiedad"), property_number))
            .map(|row| Self::record_from_row(&table, row))
            .collect())
    }

    /// 某资产的借出总次数（含未归还，报废快照口径）
    pub fn count_for(&self, property_number: &str) -> RepositoryResult<u32> {
        Ok(self.list_for(property_number)?.len() as u32)
    }

    /// 是否存在未归还记录
    pub fn has_open(&self, property_number: &str) -> RepositoryResult<bool> {
        Ok(self
            .list_for(property_number)?
            .iter()
            .any(LoanRecord::is_open))
    }

    /// 追加一条未归还的借出记录
    pub fn append_open(
        &self,
        property_number: &str,
        borrower: &Borrower,
        loaned_at: &str,
    ) -> RepositoryResult<()> {
        let mut table = self.load_table()?;
        table.push_row(&[
            ("Num_Propiedad", property_number.to_string()),
            ("Nombre", borrower.name.clone()),
            ("Identificador", borrower.identifier.clone()),
            ("Num_Tele", borrower.phone.clone()),
            ("Dia_Pres", loaned_at.to_string()),
            ("Dia_Entr", String::new()),
        ]);
        self.save_table(&table)
    }

    /// 回填最近追加的一条未归还记录的归还时刻
    ///
    /// 多条未归还记录并存时（历史数据不一致），取追加顺序最靠后的一条。
    /// 无未归还记录时不写出，返回 None。
    pub fn close_latest_open(
        &self,
        property_number: &str,
        returned_at: &str,
    ) -> RepositoryResult<Option<LoanRecord>> {
        let mut table = self.load_table()?;
        let open_row = (0..table.row_count())
            .filter(|&row| {
                same_key(table.cell(row, "Num_Propiedad"), property_number)
                    && is_blank(table.cell(row, "Dia_Entr"))
            })
            .next_back();

        let row = match open_row {
            Some(row) => row,
            None => return Ok(None),
        };

        table.set_cell(row, "Dia_Entr", returned_at);
        self.save_table(&table)?;
        Ok(Some(Self::record_from_row(&table, row)))
    }
}
