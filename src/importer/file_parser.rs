// ==========================================
// 设备台账系统 - 候选文件解析器
// ==========================================
// 职责: 把批量导入的候选文件读成表头键控的行
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::domain::asset::NewAsset;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 候选文件的期望列（缺列按空值处理，额外列忽略）
pub const CANDIDATE_COLUMNS: [&str; 6] = [
    "Num_Propiedad",
    "ID_Laptop",
    "Service_Tag",
    "Modelo",
    "Garantía",
    "Fecha_Compra",
];

/// 文件解析契约：一行 = 表头 → 单元格 的映射
pub trait FileParser {
    fn parse(&self, path: &Path) -> ImportResult<Vec<HashMap<String, String>>>;
}

// ==========================================
// CSV 解析器
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 容忍行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = HashMap::new();
            for (idx, cell) in record.iter().enumerate() {
                if let Some(header) = headers.get(idx) {
                    row.insert(header.clone(), cell.trim().to_string());
                }
            }
            // 跳过完全空白的行
            if row.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// Excel 解析器
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse(&self, path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("文件无工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut row_iter = range.rows();
        let header_row = row_iter
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in row_iter {
            let mut row = HashMap::new();
            for (idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(idx) {
                    // 日期单元格以 Excel 序列日数呈现，由日期规范化统一处理
                    row.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }
            if row.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// 按扩展名自动派发
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<HashMap<String, String>>> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse(path),
            "xlsx" | "xls" => ExcelParser.parse(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

/// 把表头键控的行映射为新增候选（缺列取空串）
pub fn candidates_from_rows(rows: &[HashMap<String, String>]) -> Vec<NewAsset> {
    rows.iter()
        .map(|row| {
            let [property_number, asset_id, service_tag, model, warranty_date, purchase_date] =
                CANDIDATE_COLUMNS.map(|name| row.get(name).cloned().unwrap_or_default());
            NewAsset {
                property_number,
                asset_id,
                service_tag,
                model,
                warranty_date,
                purchase_date,
            }
        })
        .collect()
}
