// ==========================================
// 设备台账系统 - 内存表模型
// ==========================================
// 职责: 固定列序 + 字符串单元格的整表模型
// 红线: 列名与列序是与既有登记文件的兼容契约
// ==========================================

/// 空白单元格判定
///
/// 旧系统导出的文件中，空单元格可能残留 "NaT" / "nan" 字面量，
/// 一律视为空白。
pub fn is_blank(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || trimmed == "NaT" || trimmed == "nan"
}

/// 内存中的整表
///
/// 每次操作都对表做整读-计算-整写循环，不存在部分行更新原语。
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// 创建空表（仅表头）
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按列名查列号
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// 追加列（已存在则不变）；既有行补空值
    pub fn ensure_column(&mut self, name: &str) {
        if self.has_column(name) {
            return;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
    }

    /// 读单元格；行列不存在时返回空串
    pub fn cell(&self, row: usize, column: &str) -> &str {
        match (self.rows.get(row), self.column_index(column)) {
            (Some(cells), Some(idx)) => cells.get(idx).map(String::as_str).unwrap_or(""),
            _ => "",
        }
    }

    /// 写单元格；列不存在时为无操作
    pub fn set_cell(&mut self, row: usize, column: &str, value: impl Into<String>) {
        if let Some(idx) = self.column_index(column) {
            if let Some(cells) = self.rows.get_mut(row) {
                if idx < cells.len() {
                    cells[idx] = value.into();
                }
            }
        }
    }

    /// 追加一行；未给出的列填空串，未知列名忽略
    pub fn push_row(&mut self, cells: &[(&str, String)]) {
        let mut row = vec![String::new(); self.columns.len()];
        for (name, value) in cells {
            if let Some(idx) = self.column_index(name) {
                row[idx] = value.clone();
            }
        }
        self.rows.push(row);
    }

    /// 追加一行原始单元格（与当前列序对齐，多截少补）
    pub fn push_raw_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.columns.len(), String::new());
        cells.truncate(self.columns.len());
        self.rows.push(cells);
    }

    /// 保留满足谓词的行
    pub fn retain_rows<F: FnMut(usize) -> bool>(&mut self, mut keep: F) {
        let mut idx = 0;
        self.rows.retain(|_| {
            let k = keep(idx);
            idx += 1;
            k
        });
    }

    /// 满足谓词的行号（按追加顺序）
    pub fn rows_where<F: Fn(usize) -> bool>(&self, pred: F) -> Vec<usize> {
        (0..self.row_count()).filter(|&i| pred(i)).collect()
    }
}
