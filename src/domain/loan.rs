// ==========================================
// 设备台账系统 - 借出记录领域模型
// ==========================================
// 红线: 同一资产任意时刻至多一条未归还记录
// 对齐: 借出登记表 6 列（追加式日志）
// ==========================================

use crate::storage::is_blank;
use serde::{Deserialize, Serialize};

/// 借用人信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borrower {
    pub name: String,       // 姓名
    pub identifier: String, // 证件/工号
    pub phone: String,      // 联系电话
}

/// 借出日志中的一条记录
///
/// 记录只追加；归还时回填 returned_at，从不删除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    pub property_number: String,
    pub borrower_name: String,
    pub borrower_identifier: String,
    pub borrower_phone: String,
    pub loaned_at: String,   // 借出时刻（YYYY-MM-DD HH:MM:SS）
    pub returned_at: String, // 归还时刻；空 = 未归还
}

impl LoanRecord {
    /// 是否未归还
    pub fn is_open(&self) -> bool {
        is_blank(&self.returned_at)
    }
}
