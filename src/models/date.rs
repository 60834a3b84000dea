use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// `YYYY-MM-DD` 形式の日付（`due_on` など）
///
/// 構築後は不変。文字列化は常にゼロ埋めされるため、
/// `"2012-03-26"` は同じ文字列に戻る。`"2012-3-26"` のような入力は正規化される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDate {
    year: i64,
    month: u32,
    day: u32,
}

impl CalendarDate {
    pub fn new(year: i64, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// 暦として有効な日付であれば `NaiveDate` に変換する
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(self.year).ok()?;
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.year() as i64, date.month(), date.day())
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() < 3 {
            return Err(Error::InvalidData(format!("expecting YYYY-MM-DD, got {:?}", s)));
        }

        let invalid = |part: &str| Error::InvalidData(format!("invalid date component {:?} in {:?}", part, s));
        let year = parts[0].parse::<i64>().map_err(|_| invalid(parts[0]))?;
        let month = parts[1].parse::<u32>().map_err(|_| invalid(parts[1]))?;
        let day = parts[2].parse::<u32>().map_err(|_| invalid(parts[2]))?;

        Ok(Self::new(year, month, day))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_round_trip() {
        let date: CalendarDate = "2012-03-26".parse().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2012, 3, 26));
        assert_eq!(date.to_string(), "2012-03-26");
    }

    #[test]
    fn test_unpadded_input_is_normalized() {
        let date: CalendarDate = "2012-3-6".parse().unwrap();
        assert_eq!(date.to_string(), "2012-03-06");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("2012-03".parse::<CalendarDate>(), Err(Error::InvalidData(_))));
        assert!(matches!("2012-xx-01".parse::<CalendarDate>(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let date: CalendarDate = serde_json::from_str("\"2019-11-05\"").unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2019-11-05\"");

        let bad: std::result::Result<CalendarDate, _> = serde_json::from_str("\"tomorrow\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_naive_date_conversion() {
        let date = CalendarDate::new(2024, 2, 29);
        assert_eq!(date.to_naive_date(), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert!(CalendarDate::new(2023, 2, 29).to_naive_date().is_none());

        let from_chrono = CalendarDate::from(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(from_chrono.to_string(), "2020-01-02");
    }
}
