//! Target date parsing and date-derived names

use crate::error::{ZaikoError, ZaikoResult};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};

const JST_OFFSET_HOURS: i64 = 9;

/// Parse `YYYY-MM-DD` or `YYYY/MM/DD`
pub fn parse_target_date(input: &str) -> ZaikoResult<NaiveDate> {
    let trimmed = input.trim();
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ZaikoError::InvalidDate(input.to_string()))
}

/// Today's date in Japan, the default collection date
pub fn today_in_japan() -> NaiveDate {
    (Utc::now() + Duration::hours(JST_OFFSET_HOURS)).date_naive()
}

/// `在庫集計結果_YYYYMMDD.xlsx`
pub fn output_file_name(date: NaiveDate) -> String {
    format!("在庫集計結果_{}.xlsx", date.format("%Y%m%d"))
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月曜日",
        Weekday::Tue => "火曜日",
        Weekday::Wed => "水曜日",
        Weekday::Thu => "木曜日",
        Weekday::Fri => "金曜日",
        Weekday::Sat => "土曜日",
        Weekday::Sun => "日曜日",
    }
}

pub fn date_label(date: NaiveDate) -> String {
    format!("{}（{}）", date.format("%Y-%m-%d"), weekday_label(date.weekday()))
}
