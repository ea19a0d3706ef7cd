// ==========================================
// 设备台账系统 - 日期规范化
// ==========================================
// 契约: 接受的输入格式是一个显式有序清单，统一规范化为
//       YYYY-MM-DD；解析失败只有一种结果
// ==========================================

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// 日期列的规范存储格式
pub const DATE_FMT: &str = "%Y-%m-%d";

/// 时间戳列（借出/归还/维修/报废时刻）的存储格式
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// 接受的日期输入格式（按顺序尝试）
const ACCEPTED_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Excel 序列日期的起算日
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Excel 序列日期的合理上限（约公元 2500 年）
const EXCEL_SERIAL_MAX: f64 = 220_000.0;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("无法解析日期: {0:?}")]
pub struct DateParseError(pub String);

/// 当前本地时间戳，用于借出/归还/维修/报废时刻
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FMT).to_string()
}

/// 当前本地日期
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 把任意接受形式的日期输入规范化为 YYYY-MM-DD
///
/// 依次尝试：带时间的时间戳、有序日期格式清单、Excel 序列日数。
pub fn normalize_date(raw: &str) -> Result<String, DateParseError> {
    parse_date(raw).map(|d| d.format(DATE_FMT).to_string())
}

/// 把任意接受形式的日期输入解析为 NaiveDate
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(DateParseError(raw.to_string()));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FMT) {
        return Ok(dt.date());
    }

    for fmt in ACCEPTED_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }

    // Excel 序列日数（整数天，起算 1899-12-30）
    if let Ok(serial) = s.parse::<f64>() {
        if serial > 0.0 && serial < EXCEL_SERIAL_MAX {
            let (y, m, d) = EXCEL_EPOCH;
            if let Some(epoch) = NaiveDate::from_ymd_opt(y, m, d) {
                return Ok(epoch + Duration::days(serial.trunc() as i64));
            }
        }
    }

    Err(DateParseError(raw.to_string()))
}

/// 展示用日期截取：能解析则取日期部分，空白归空串，否则原样返回
pub fn fmt_date_only(raw: &str) -> String {
    let s = raw.trim();
    if crate::storage::is_blank(s) {
        return String::new();
    }
    match parse_date(s) {
        Ok(d) => d.format(DATE_FMT).to_string(),
        Err(_) => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_iso_and_slash_forms() {
        assert_eq!(normalize_date("2026-09-01").unwrap(), "2026-09-01");
        assert_eq!(normalize_date("2026/09/01").unwrap(), "2026-09-01");
        assert_eq!(normalize_date("09/01/2026").unwrap(), "2026-09-01");
    }

    #[test]
    fn test_day_first_form_is_last_resort() {
        // 13 无法当月份，落到 %d/%m/%Y
        assert_eq!(normalize_date("13/09/2026").unwrap(), "2026-09-13");
    }

    #[test]
    fn test_normalize_timestamp_keeps_date_part() {
        assert_eq!(normalize_date("2026-09-01 10:30:00").unwrap(), "2026-09-01");
    }

    #[test]
    fn test_normalize_excel_serial() {
        // 45292 = 2024-01-01
        assert_eq!(normalize_date("45292").unwrap(), "2024-01-01");
        assert_eq!(normalize_date("45292.5").unwrap(), "2024-01-01");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_date("").is_err());
        assert!(normalize_date("mañana").is_err());
        assert!(normalize_date("2026-13-01").is_err());
        assert!(normalize_date("-5").is_err());
    }

    #[test]
    fn test_fmt_date_only() {
        assert_eq!(fmt_date_only("2026-09-01 10:30:00"), "2026-09-01");
        assert_eq!(fmt_date_only("NaT"), "");
        assert_eq!(fmt_date_only(""), "");
        assert_eq!(fmt_date_only("no-es-fecha"), "no-es-fecha");
    }
}
