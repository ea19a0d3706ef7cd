// ==========================================
// 设备台账系统 - 新增候选校验
// ==========================================
// 职责: 格式/日期校验 + 重复/报废冲突校验
// 红线: 单台新增与批量导入共用同一规则集
// ==========================================

use crate::domain::asset::{Asset, NewAsset};
use crate::domain::dates::parse_date;
use crate::domain::types::{
    canonical_key, same_key, ASSET_ID_RE, PROPERTY_NUMBER_RE, SERVICE_TAG_RE,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 候选资产上的一条校验问题（按字段定位）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateIssue {
    pub field: &'static str,
    pub message: String,
}

impl CandidateIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for CandidateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 格式与日期校验
///
/// 全部问题累积返回；通过时产出规范化资产
/// （标识符转大写、日期规范化为 ISO、可用标志置位）。
pub fn validate_new_asset(
    candidate: &NewAsset,
    today: NaiveDate,
) -> Result<Asset, Vec<CandidateIssue>> {
    let mut issues = Vec::new();

    let property_number = canonical_key(&candidate.property_number);
    let asset_id = canonical_key(&candidate.asset_id);
    let service_tag = canonical_key(&candidate.service_tag);

    if !PROPERTY_NUMBER_RE.is_match(&property_number) {
        issues.push(CandidateIssue::new(
            "Num_Propiedad",
            "格式无效（应为 R + 8 位数字）",
        ));
    }
    if !ASSET_ID_RE.is_match(&asset_id) {
        issues.push(CandidateIssue::new(
            "ID_Laptop",
            "格式无效（应为 UIPRA-(EST|FAC)-L###）",
        ));
    }
    if !SERVICE_TAG_RE.is_match(&service_tag) {
        issues.push(CandidateIssue::new(
            "Service_Tag",
            "格式无效（应为 7 位大写字母或数字）",
        ));
    }

    let warranty_date = match parse_date(&candidate.warranty_date) {
        Ok(d) if d <= today => {
            issues.push(CandidateIssue::new("Garantía", "保修到期日必须晚于今天"));
            None
        }
        Ok(d) => Some(d),
        Err(_) => {
            issues.push(CandidateIssue::new("Garantía", "日期无效"));
            None
        }
    };

    let purchase_date = match parse_date(&candidate.purchase_date) {
        Ok(d) => Some(d),
        Err(_) => {
            issues.push(CandidateIssue::new("Fecha_Compra", "日期无效"));
            None
        }
    };

    if !issues.is_empty() {
        return Err(issues);
    }

    Ok(Asset {
        property_number,
        asset_id,
        service_tag,
        model: candidate.model.trim().to_string(),
        available: true,
        warranty_date: warranty_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        purchase_date: purchase_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    })
}

/// 重复与报废冲突校验
///
/// 三个标识符分别对既有库存与本批次已接受的候选查重；
/// 报废登记表中的财产编号一律拒绝。
pub fn conflict_issues(
    property_number: &str,
    asset_id: &str,
    service_tag: &str,
    existing: &[Asset],
    pending: &[Asset],
    decommissioned: bool,
) -> Vec<CandidateIssue> {
    let mut issues = Vec::new();
    let all = existing.iter().chain(pending.iter());

    let mut dup_property = false;
    let mut dup_asset_id = false;
    let mut dup_service_tag = false;
    for asset in all {
        dup_property |= same_key(&asset.property_number, property_number);
        dup_asset_id |= same_key(&asset.asset_id, asset_id);
        dup_service_tag |= same_key(&asset.service_tag, service_tag);
    }

    if dup_property {
        issues.push(CandidateIssue::new("Num_Propiedad", "与既有资产重复"));
    }
    if dup_asset_id {
        issues.push(CandidateIssue::new("ID_Laptop", "与既有资产重复"));
    }
    if dup_service_tag {
        issues.push(CandidateIssue::new("Service_Tag", "与既有资产重复"));
    }
    if decommissioned {
        issues.push(CandidateIssue::new("Num_Propiedad", "已在报废登记表中"));
    }

    issues
}
