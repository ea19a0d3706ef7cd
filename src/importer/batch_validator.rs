// ==========================================
// 设备台账系统 - 批量导入校验器
// ==========================================
// 职责: 候选清单的逐行独立校验 + 全有或全无提交
// 红线: 任一行违规则整批不落盘；查重须同时对既有库存
//       与本批次先行通过的候选生效
// ==========================================

use crate::domain::asset::{Asset, NewAsset};
use crate::domain::dates::{now_timestamp, today};
use crate::domain::validation::{conflict_issues, validate_new_asset};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{candidates_from_rows, UniversalFileParser};
use crate::repository::{AssetRepository, DecommissionRepository};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// 一条行级违规（行号按候选文件计，首行为表头，数据从第 2 行起）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowViolation {
    pub row_number: usize,
    pub field: String,
    pub message: String,
}

impl fmt::Display for RowViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第 {} 行: {}: {}", self.row_number, self.field, self.message)
    }
}

/// 导入结果报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,          // 批次 ID（UUID）
    pub total_rows: usize,         // 候选总行数
    pub accepted_rows: usize,      // 实际写入行数
    pub violations: Vec<RowViolation>, // 提交成功时恒为空
    pub imported_at: String,       // 提交时刻
}

pub struct BatchImportValidator {
    assets: Arc<AssetRepository>,
    decommissions: Arc<DecommissionRepository>,
}

impl BatchImportValidator {
    pub fn new(assets: Arc<AssetRepository>, decommissions: Arc<DecommissionRepository>) -> Self {
        Self {
            assets,
            decommissions,
        }
    }

    /// 逐行独立校验
    ///
    /// 每行按"格式/日期 → 查重/报废"顺序检查，记录第一条问题后
    /// 转入下一行——一行的失败不阻断其余行的校验。查重对既有库存
    /// 与本批次已通过的候选同时生效，批内重复同样会被捕获。
    pub fn validate_all(
        &self,
        candidates: &[NewAsset],
    ) -> ImportResult<(Vec<Asset>, Vec<RowViolation>)> {
        let existing = self.assets.list()?;
        let today = today();

        let mut accepted: Vec<Asset> = Vec::new();
        let mut violations: Vec<RowViolation> = Vec::new();

        for (idx, candidate) in candidates.iter().enumerate() {
            let row_number = idx + 2;

            let asset = match validate_new_asset(candidate, today) {
                Ok(asset) => asset,
                Err(issues) => {
                    if let Some(issue) = issues.into_iter().next() {
                        violations.push(RowViolation {
                            row_number,
                            field: issue.field.to_string(),
                            message: issue.message,
                        });
                    }
                    continue;
                }
            };

            let conflicts = conflict_issues(
                &asset.property_number,
                &asset.asset_id,
                &asset.service_tag,
                &existing,
                &accepted,
                self.decommissions.contains(&asset.property_number)?,
            );
            if let Some(issue) = conflicts.into_iter().next() {
                violations.push(RowViolation {
                    row_number,
                    field: issue.field.to_string(),
                    message: issue.message,
                });
                continue;
            }

            accepted.push(asset);
        }

        Ok((accepted, violations))
    }

    /// 原子提交
    ///
    /// 有任何违规则整批拒绝、不写入任何行；干净批次以单次整表
    /// 写出落盘。
    pub fn commit(&self, candidates: &[NewAsset]) -> ImportResult<ImportReport> {
        if candidates.is_empty() {
            return Err(ImportError::EmptyBatch);
        }

        let (accepted, violations) = self.validate_all(candidates)?;
        if !violations.is_empty() {
            tracing::warn!(rejected = violations.len(), "批量导入被拒绝");
            return Err(ImportError::BatchRejected { violations });
        }

        self.assets.append_all(&accepted)?;
        let report = ImportReport {
            batch_id: Uuid::new_v4().to_string(),
            total_rows: candidates.len(),
            accepted_rows: accepted.len(),
            violations: Vec::new(),
            imported_at: now_timestamp(),
        };
        tracing::info!(
            batch_id = %report.batch_id,
            accepted = report.accepted_rows,
            "批量导入已提交"
        );
        Ok(report)
    }

    /// 从候选文件（.xlsx/.xls/.csv）解析并提交
    pub fn import_file(&self, path: &Path) -> ImportResult<ImportReport> {
        let rows = UniversalFileParser.parse(path)?;
        let candidates = candidates_from_rows(&rows);
        self.commit(&candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CsvTableStore;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        assets: Arc<AssetRepository>,
        validator: BatchImportValidator,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store: Arc<CsvTableStore> = Arc::new(CsvTableStore::new());
        let assets = Arc::new(AssetRepository::new(
            store.clone(),
            dir.path().join("inv.csv"),
        ));
        let decommissions = Arc::new(DecommissionRepository::new(
            store,
            dir.path().join("dec.csv"),
        ));
        let validator = BatchImportValidator::new(assets.clone(), decommissions);
        Fixture {
            _dir: dir,
            assets,
            validator,
        }
    }

    fn candidate(n: u32) -> NewAsset {
        NewAsset {
            property_number: format!("R400221{n:02}"),
            asset_id: format!("UIPRA-EST-L{n:03}"),
            service_tag: format!("4TR2M{n:02}"),
            model: "5510".to_string(),
            warranty_date: "2099-01-01".to_string(),
            purchase_date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn test_commit_clean_batch() {
        let f = fixture();
        let candidates: Vec<_> = (1..=5).map(candidate).collect();

        let report = f.validator.commit(&candidates).unwrap();
        assert_eq!(report.accepted_rows, 5);
        assert!(report.violations.is_empty());
        assert_eq!(f.assets.list().unwrap().len(), 5);
    }

    #[test]
    fn test_one_bad_row_rejects_whole_batch() {
        let f = fixture();
        let mut candidates: Vec<_> = (1..=10).map(candidate).collect();
        candidates[4].service_tag = "mal".to_string();

        let err = f.validator.commit(&candidates).unwrap_err();
        match err {
            ImportError::BatchRejected { violations } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].row_number, 6); // 第 5 个候选 = 文件第 6 行
                assert_eq!(violations[0].field, "Service_Tag");
            }
            other => panic!("expected BatchRejected, got {other:?}"),
        }
        assert!(f.assets.list().unwrap().is_empty(), "nothing may be written");
    }

    #[test]
    fn test_intra_batch_duplicate_is_caught() {
        let f = fixture();
        let mut candidates: Vec<_> = (1..=3).map(candidate).collect();
        candidates[2].property_number = candidates[0].property_number.clone();

        let (accepted, violations) = f.validator.validate_all(&candidates).unwrap();
        assert_eq!(accepted.len(), 2);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].row_number, 4);
        assert_eq!(violations[0].field, "Num_Propiedad");
    }

    #[test]
    fn test_violations_do_not_short_circuit() {
        let f = fixture();
        let mut candidates: Vec<_> = (1..=4).map(candidate).collect();
        candidates[0].property_number = "malo".to_string();
        candidates[2].warranty_date = "2000-01-01".to_string();

        let (accepted, violations) = f.validator.validate_all(&candidates).unwrap();
        assert_eq!(accepted.len(), 2);
        let rows: Vec<_> = violations.iter().map(|v| v.row_number).collect();
        assert_eq!(rows, vec![2, 4]);
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let f = fixture();
        assert!(matches!(
            f.validator.commit(&[]),
            Err(ImportError::EmptyBatch)
        ));
    }

    #[test]
    fn test_import_csv_file_end_to_end() {
        let f = fixture();
        let file_path = f._dir.path().join("lote.csv");
        std::fs::write(
            &file_path,
            "Num_Propiedad,ID_Laptop,Service_Tag,Modelo,Garantía,Fecha_Compra\n\
             R40022101,UIPRA-EST-L001,4TR2M01,5510,2099-01-01,2024-01-01\n\
             R40022102,UIPRA-EST-L002,4TR2M02,5510,2099/01/01,01/15/2024\n",
        )
        .unwrap();

        let report = f.validator.import_file(&file_path).unwrap();
        assert_eq!(report.accepted_rows, 2);

        // 多种输入格式统一规范化为 ISO
        let assets = f.assets.list().unwrap();
        assert_eq!(assets[1].warranty_date, "2099-01-01");
        assert_eq!(assets[1].purchase_date, "2024-01-15");
    }
}
