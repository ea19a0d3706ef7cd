// ==========================================
// 设备台账系统 - 表文件存取适配器
// ==========================================
// 契约: load 缺文件 ⇒ 返回仅含期望列的空表；文件损坏 ⇒ 读错误
//       save 以给定列序整表写出，缺失列补空
// 红线: 文件中多出的列（如维修待件标志列）必须原样保留
// ==========================================

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::table::Table;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// 表文件存取契约
///
/// 四个登记表都经由该契约整读整写；没有部分行更新原语。
pub trait TableStore {
    /// 整表读取
    ///
    /// - 文件不存在 ⇒ 返回仅含期望列的空表
    /// - 期望列在文件中缺失 ⇒ 补为空列
    /// - 文件中额外的列保留在表尾（按文件内顺序）
    fn load(&self, path: &Path, expected_columns: &[&str]) -> StorageResult<Table>;

    /// 整表写出
    ///
    /// 列严格按 column_order 给定的顺序写出，表中缺失的列写为空。
    /// 写入是整文件原子替换：要么完成，要么磁盘保持原状。
    fn save(&self, path: &Path, table: &Table, column_order: &[String]) -> StorageResult<()>;
}

/// CSV 表文件适配器
pub struct CsvTableStore;

impl CsvTableStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvTableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TableStore for CsvTableStore {
    fn load(&self, path: &Path, expected_columns: &[&str]) -> StorageResult<Table> {
        if !path.exists() {
            return Ok(Table::new(expected_columns.to_vec()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 容忍行长度不一致
            .from_path(path)
            .map_err(|e| StorageError::ReadFailure {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| StorageError::MalformedTable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut table = Table::new(headers);
        for record in reader.records() {
            let record = record.map_err(|e| StorageError::MalformedTable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            table.push_raw_row(record.iter().map(|c| c.to_string()).collect());
        }

        // 期望列缺失时补空列；文件中的额外列已随表头保留
        for col in expected_columns {
            table.ensure_column(col);
        }

        Ok(table)
    }

    fn save(&self, path: &Path, table: &Table, column_order: &[String]) -> StorageResult<()> {
        let write_failure = |message: String| StorageError::WriteFailure {
            path: path.display().to_string(),
            message,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| write_failure(e.to_string()))?;
            }
        }

        // 先写临时文件，成功后原子替换目标文件
        let tmp_path = path.with_extension("csv.tmp");
        {
            let mut writer = WriterBuilder::new()
                .from_path(&tmp_path)
                .map_err(|e| write_failure(e.to_string()))?;

            writer
                .write_record(column_order)
                .map_err(|e| write_failure(e.to_string()))?;

            for row in 0..table.row_count() {
                let cells: Vec<&str> = column_order
                    .iter()
                    .map(|col| table.cell(row, col))
                    .collect();
                writer
                    .write_record(&cells)
                    .map_err(|e| write_failure(e.to_string()))?;
            }

            writer.flush().map_err(|e| write_failure(e.to_string()))?;
        }

        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            write_failure(e.to_string())
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const COLS: &[&str] = &["Num_Propiedad", "Modelo", "Disponible"];

    #[test]
    fn test_load_missing_file_returns_empty_table() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new();

        let table = store.load(&dir.path().join("no_such.csv"), COLS).unwrap();

        assert!(table.is_empty());
        assert_eq!(table.columns(), COLS);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.csv");
        let store = CsvTableStore::new();

        let mut table = Table::new(COLS.to_vec());
        table.push_row(&[
            ("Num_Propiedad", "R40022104".to_string()),
            ("Modelo", "5510".to_string()),
            ("Disponible", "X".to_string()),
        ]);
        let order: Vec<String> = COLS.iter().map(|c| c.to_string()).collect();
        store.save(&path, &table, &order).unwrap();

        let loaded = store.load(&path, COLS).unwrap();
        assert_eq!(loaded.row_count(), 1);
        assert_eq!(loaded.cell(0, "Num_Propiedad"), "R40022104");
        assert_eq!(loaded.cell(0, "Disponible"), "X");
    }

    #[test]
    fn test_load_adds_missing_expected_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.csv");
        fs::write(&path, "Num_Propiedad,Modelo\nR40022104,5510\n").unwrap();

        let store = CsvTableStore::new();
        let table = store.load(&path, COLS).unwrap();

        assert!(table.has_column("Disponible"));
        assert_eq!(table.cell(0, "Disponible"), "");
    }

    #[test]
    fn test_load_preserves_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mant.csv");
        fs::write(
            &path,
            "Num_Propiedad,Modelo,Esperando_Pieza\nR40022104,5510,X\n",
        )
        .unwrap();

        let store = CsvTableStore::new();
        let table = store.load(&path, &["Num_Propiedad", "Modelo"]).unwrap();

        assert!(table.has_column("Esperando_Pieza"));
        assert_eq!(table.cell(0, "Esperando_Pieza"), "X");
    }

    #[test]
    fn test_save_writes_exact_column_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.csv");
        let store = CsvTableStore::new();

        let mut table = Table::new(vec!["B", "A"]);
        table.push_row(&[("A", "1".to_string()), ("B", "2".to_string())]);
        let order = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        store.save(&path, &table, &order).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), "A,B,C");
        assert_eq!(lines.next().unwrap(), "1,2,");
    }
}
