// ==========================================
// 设备台账系统 - 领域层
// ==========================================
// 职责: 四个登记表的实体、数据约定与候选校验规则
// ==========================================

pub mod asset;
pub mod dates;
pub mod decommission;
pub mod keys;
pub mod loan;
pub mod maintenance;
pub mod types;
pub mod validation;

pub use asset::{Asset, NewAsset};
pub use decommission::DecommissionRecord;
pub use loan::{Borrower, LoanRecord};
pub use maintenance::{
    MaintenanceEntry, MaintenanceKind, MaintenanceRecord, MaintenanceTaskFlags, RepairEntry,
};
pub use validation::{conflict_issues, validate_new_asset, CandidateIssue};
