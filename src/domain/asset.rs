// ==========================================
// 设备台账系统 - 库存资产领域模型
// ==========================================
// 红线: 财产编号/资产ID/Service Tag 在活动库存内全局唯一
// 对齐: 库存登记表 7 列
// ==========================================

use serde::{Deserialize, Serialize};

/// 活动库存中的一台设备
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub property_number: String, // 财产编号（主键，R + 8 位数字）
    pub asset_id: String,        // 资产 ID（UIPRA-(EST|FAC)-L###）
    pub service_tag: String,     // Service Tag（7 位大写字母数字）
    pub model: String,           // 型号（自由文本）
    pub available: bool,         // 可用标志（派生缓存，与借出日志同步维护）
    pub warranty_date: String,   // 保修到期日（YYYY-MM-DD）
    pub purchase_date: String,   // 购入日期（YYYY-MM-DD）
}

/// 新增候选（未校验的原始输入）
///
/// 单台新增与批量导入共用同一校验规则集。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAsset {
    pub property_number: String,
    pub asset_id: String,
    pub service_tag: String,
    pub model: String,
    pub warranty_date: String, // 原始输入，接受多种格式
    pub purchase_date: String, // 原始输入，接受多种格式
}
