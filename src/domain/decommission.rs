// ==========================================
// 设备台账系统 - 报废记录领域模型
// ==========================================
// 红线: 出现在报废登记表中的财产编号永久退役，
//       不得再出现新的库存/借出/维修记录
// 对齐: 报废登记表 8 列（一次写入，此后不可变）
// ==========================================

use serde::{Deserialize, Serialize};

/// 报废快照
///
/// 报废时冻结资产标识与三类历史计数；借出计数含已归还与未归还。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecommissionRecord {
    pub property_number: String,
    pub asset_id: String,
    pub service_tag: String,
    pub model: String,
    pub maintenance_count: u32,   // 保养次数快照
    pub repair_count: u32,        // 维修次数快照
    pub loan_count: u32,          // 借出总次数快照（含未归还）
    pub decommissioned_at: String, // 报废时刻（YYYY-MM-DD HH:MM:SS）
}
