// ==========================================
// 设备台账系统 - 基础类型与标识符格式
// ==========================================
// 依据: 既有登记文件的数据约定（"X" 标记、标识符格式）
// ==========================================

use once_cell::sync::Lazy;
use regex::Regex;

/// 布尔列的存在标记（可用 / 任务已做 / 待件）
pub const PRESENCE_MARK: &str = "X";

/// 财产编号格式: R + 8 位数字
pub static PROPERTY_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^R\d{8}$").expect("property number pattern"));

/// 资产 ID 格式: UIPRA-(EST|FAC)-L###
pub static ASSET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^UIPRA-(EST|FAC)-L\d{3}$").expect("asset id pattern"));

/// Service Tag 格式: 7 位大写字母或数字
pub static SERVICE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{7}$").expect("service tag pattern"));

/// 单元格是否带 "X" 标记（读取时容忍大小写与前后空白）
pub fn is_marked(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case(PRESENCE_MARK)
}

/// 键比较：财产编号等标识符不区分大小写
pub fn same_key(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// 标识符入库前的规范形：去空白并转大写
pub fn canonical_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}
