// ==========================================
// 设备台账系统 - 维修/保养登记表仓储
// ==========================================
// 职责: 维修日志的列契约、待件标志列识别、追加与待件完结
// 红线: 待件标志列只识别，不创建、不改名；保存时原样保留
// ==========================================

use crate::domain::dates::normalize_date;
use crate::domain::keys::normkey;
use crate::domain::maintenance::{MaintenanceKind, MaintenanceRecord, MaintenanceTaskFlags};
use crate::domain::types::{is_marked, same_key, PRESENCE_MARK};
use crate::repository::error::RepositoryResult;
use crate::storage::{is_blank, Table, TableStore};
use std::path::PathBuf;
use std::sync::Arc;

/// 维修登记表的固定列（兼容契约，不得改动）
pub const MAINTENANCE_COLUMNS: [&str; 15] = [
    "Num_Propiedad",
    "Dia",
    "tecnico",
    "Tipo",
    "Desc_Reparacion",
    "Nombre",
    "Descripcion",
    "Dominio",
    "Check Update",
    "Dell Command Updates",
    "Bios Update",
    "Upgrade Windows 10 - 11",
    "Office 2019 Installed",
    "PatchMyPC Installed",
    "Dell Support Assist Installed",
];

/// 七个保养任务列（与 MaintenanceTaskFlags 一一对应）
const TASK_COLUMNS: [&str; 7] = [
    "Check Update",
    "Dell Command Updates",
    "Bios Update",
    "Upgrade Windows 10 - 11",
    "Office 2019 Installed",
    "PatchMyPC Installed",
    "Dell Support Assist Installed",
];

/// 待件标志列的可识别别名（已按 normkey 规范化存放）
const PENDING_FLAG_ALIASES: [&str; 7] = [
    "esperandopieza",
    "pendientepieza",
    "pendiente",
    "enespera",
    "enesperapieza",
    "piezapendiente",
    "piezaespera",
];

/// 待件维修记录的定位引用
#[derive(Debug, Clone)]
pub struct PendingRepair {
    pub row_index: usize,    // 表内行号（追加顺序）
    pub technician: String,  // 登记时填写的技术员
    pub description: String, // 既有维修描述（完结时预填）
}

/// 识别待件标志列；返回文件中的准确列名
pub fn detect_pending_flag_column(table: &Table) -> Option<String> {
    table
        .columns()
        .iter()
        .find(|col| PENDING_FLAG_ALIASES.contains(&normkey(col).as_str()))
        .cloned()
}

pub struct MaintenanceRepository {
    store: Arc<dyn TableStore + Send + Sync>,
    path: PathBuf,
}

impl MaintenanceRepository {
    pub fn new(store: Arc<dyn TableStore + Send + Sync>, path: PathBuf) -> Self {
        Self { store, path }
    }

    fn load_table(&self) -> RepositoryResult<Table> {
        Ok(self.store.load(&self.path, &MAINTENANCE_COLUMNS)?)
    }

    /// 保存列序：固定 15 列在前，文件中识别到的额外列（含待件标志列）
    /// 按原顺序缀后，保证标志列经读写循环后仍然存在。
    fn save_table(&self, table: &Table) -> RepositoryResult<()> {
        let mut order: Vec<String> = MAINTENANCE_COLUMNS.iter().map(|c| c.to_string()).collect();
        for col in table.columns() {
            if !order.iter().any(|c| c == col) {
                order.push(col.clone());
            }
        }
        Ok(self.store.save(&self.path, table, &order)?)
    }

    fn record_from_row(table: &Table, row: usize) -> MaintenanceRecord {
        let mut tasks = MaintenanceTaskFlags::default();
        let fields: [&mut bool; 7] = [
            &mut tasks.check_update,
            &mut tasks.dell_command_updates,
            &mut tasks.bios_update,
            &mut tasks.upgrade_windows,
            &mut tasks.office_installed,
            &mut tasks.patch_my_pc_installed,
            &mut tasks.support_assist_installed,
        ];
        for (column, field) in TASK_COLUMNS.iter().zip(fields) {
            *field = is_marked(table.cell(row, column));
        }

        MaintenanceRecord {
            property_number: table.cell(row, "Num_Propiedad").trim().to_string(),
            event_date: table.cell(row, "Dia").trim().to_string(),
            technician: table.cell(row, "tecnico").trim().to_string(),
            kind: MaintenanceKind::parse(table.cell(row, "Tipo")),
            repair_description: table.cell(row, "Desc_Reparacion").trim().to_string(),
            owner_name: table.cell(row, "Nombre").trim().to_string(),
            description: table.cell(row, "Descripcion").trim().to_string(),
            domain: table.cell(row, "Dominio").trim().to_string(),
            tasks,
        }
    }

    fn row_cells(record: &MaintenanceRecord) -> Vec<(&'static str, String)> {
        let tasks = &record.tasks;
        let task_values: [bool; 7] = [
            tasks.check_update,
            tasks.dell_command_updates,
            tasks.bios_update,
            tasks.upgrade_windows,
            tasks.office_installed,
            tasks.patch_my_pc_installed,
            tasks.support_assist_installed,
        ];

        let mut cells: Vec<(&'static str, String)> = vec![
            ("Num_Propiedad", record.property_number.clone()),
            ("Dia", record.event_date.clone()),
            ("tecnico", record.technician.clone()),
            (
                "Tipo",
                record.kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
            ),
            ("Desc_Reparacion", record.repair_description.clone()),
            ("Nombre", record.owner_name.clone()),
            ("Descripcion", record.description.clone()),
            ("Dominio", record.domain.clone()),
        ];
        for (column, on) in TASK_COLUMNS.iter().copied().zip(task_values) {
            cells.push((column, if on { PRESENCE_MARK.to_string() } else { String::new() }));
        }
        cells
    }

    /// 某资产的全部维修/保养记录
    pub fn list_for(&self, property_number: &str) -> RepositoryResult<Vec<MaintenanceRecord>> {
        let table = self.load_table()?;
        Ok((0..table.row_count())
            .filter(|&row| same_key(table.cell(row, "Num_Propiedad"), property_number))
            .map(|row| Self::record_from_row(&table, row))
            .collect())
    }

    /// 某资产的 (保养次数, 维修次数)（报废快照口径）
    pub fn counts_for(&self, property_number: &str) -> RepositoryResult<(u32, u32)> {
        let mut maintenance = 0;
        let mut repairs = 0;
        for record in self.list_for(property_number)? {
            match record.kind {
                Some(MaintenanceKind::Maintenance) => maintenance += 1,
                Some(MaintenanceKind::Repair) => repairs += 1,
                None => {}
            }
        }
        Ok((maintenance, repairs))
    }

    /// 某资产最近一次维修/保养的日期（忽略待件的空日期行）
    pub fn last_event_date_for(&self, property_number: &str) -> RepositoryResult<Option<String>> {
        Ok(self
            .list_for(property_number)?
            .iter()
            .filter(|r| !is_blank(&r.event_date))
            .filter_map(|r| normalize_date(&r.event_date).ok())
            .max())
    }

    /// 追加一条记录；mark_pending 时对识别到的标志列打 "X"
    ///
    /// 标志列不存在时，待件状态仅由空的 Dia 表达。
    pub fn append(&self, record: &MaintenanceRecord, mark_pending: bool) -> RepositoryResult<()> {
        let mut table = self.load_table()?;
        table.push_row(&Self::row_cells(record));
        if mark_pending {
            if let Some(flag_col) = detect_pending_flag_column(&table) {
                let last = table.row_count() - 1;
                table.set_cell(last, &flag_col, PRESENCE_MARK);
            }
        }
        self.save_table(&table)
    }

    /// 查找待件维修记录
    ///
    /// 过滤条件: 本资产 + 维修种类 + (Dia 为空 或 标志列带标记)。
    /// 多条并存时取追加顺序最靠后的一条（待件行无日期可比）。
    pub fn find_pending_repair(
        &self,
        property_number: &str,
    ) -> RepositoryResult<Option<PendingRepair>> {
        let table = self.load_table()?;
        Ok(Self::pending_row(&table, property_number).map(|row| PendingRepair {
            row_index: row,
            technician: table.cell(row, "tecnico").trim().to_string(),
            description: table.cell(row, "Desc_Reparacion").trim().to_string(),
        }))
    }

    fn pending_row(table: &Table, property_number: &str) -> Option<usize> {
        let flag_col = detect_pending_flag_column(table);
        (0..table.row_count())
            .filter(|&row| {
                same_key(table.cell(row, "Num_Propiedad"), property_number)
                    && MaintenanceKind::parse(table.cell(row, "Tipo"))
                        == Some(MaintenanceKind::Repair)
                    && (is_blank(table.cell(row, "Dia"))
                        || flag_col
                            .as_deref()
                            .is_some_and(|col| is_marked(table.cell(row, col))))
            })
            .next_back()
    }

    /// 原地完结待件维修：回填完成时刻，覆写技术员与描述，清除标志
    ///
    /// 这是追加式日志上唯一的原地改写。无待件记录时不写出，返回 false。
    pub fn finalize_pending(
        &self,
        property_number: &str,
        technician: &str,
        description: &str,
        finished_at: &str,
    ) -> RepositoryResult<bool> {
        let mut table = self.load_table()?;
        let row = match Self::pending_row(&table, property_number) {
            Some(row) => row,
            None => return Ok(false),
        };

        table.set_cell(row, "Dia", finished_at);
        table.set_cell(row, "tecnico", technician);
        table.set_cell(row, "Desc_Reparacion", description);
        if let Some(flag_col) = detect_pending_flag_column(&table) {
            table.set_cell(row, &flag_col, "");
        }
        self.save_table(&table)?;
        Ok(true)
    }
}
