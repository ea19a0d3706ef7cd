// ==========================================
// 设备台账系统 - 维修/保养记录领域模型
// ==========================================
// 红线: 同一资产任意时刻至多一条"未完成"的维修记录
//       （未完成 = 完成日期为空，或待件标志列带标记）
// 对齐: 维修登记表 15 列（追加式日志，仅待件完结时原地改写）
// ==========================================

use serde::{Deserialize, Serialize};

/// 记录种类
///
/// Tipo 列的存储值是与既有数据文件的兼容契约，读取时
/// 做去空白 + Unicode 小写匹配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceKind {
    Maintenance, // 保养
    Repair,      // 维修
}

impl MaintenanceKind {
    /// 写入 Tipo 列的规范值
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceKind::Maintenance => "Mantenimiento",
            MaintenanceKind::Repair => "Reparación",
        }
    }

    /// 从单元格解析；未知值返回 None
    pub fn parse(cell: &str) -> Option<Self> {
        let normalized = cell.trim().to_lowercase();
        match normalized.as_str() {
            "mantenimiento" => Some(MaintenanceKind::Maintenance),
            "reparación" | "reparacion" => Some(MaintenanceKind::Repair),
            _ => None,
        }
    }
}

/// 保养任务勾选项（七个任务列，存储为 "X" / 空）
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MaintenanceTaskFlags {
    pub check_update: bool,
    pub dell_command_updates: bool,
    pub bios_update: bool,
    pub upgrade_windows: bool,
    pub office_installed: bool,
    pub patch_my_pc_installed: bool,
    pub support_assist_installed: bool,
}

/// 维修/保养日志中的一条记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub property_number: String,
    pub event_date: String, // 完成时刻；空 = 待件未完成
    pub technician: String,
    pub kind: Option<MaintenanceKind>, // None = 旧数据中的未知种类
    pub repair_description: String,
    pub owner_name: String,  // Nombre 列
    pub description: String, // Descripcion 列
    pub domain: String,      // Dominio 列
    pub tasks: MaintenanceTaskFlags,
}

/// 保养登记输入
#[derive(Debug, Clone, Default)]
pub struct MaintenanceEntry {
    pub technician: String,
    pub owner_name: String,
    pub description: String,
    pub domain: String,
    pub tasks: MaintenanceTaskFlags,
}

/// 维修登记输入
#[derive(Debug, Clone, Default)]
pub struct RepairEntry {
    pub technician: String,
    pub description: String,
    pub awaiting_part: bool,        // true ⇒ 留作待件（无完成日期）
    pub part_note: Option<String>,  // 等待的部件说明，追加到描述
}
