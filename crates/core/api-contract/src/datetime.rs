//! ISO-8601 日期编解码。
//!
//! 编码固定到秒并带 `Z`；解码接受 RFC 3339（含小数秒、任意时区），
//! 也接受不带时区的时间并按 UTC 处理。

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer, de};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn format(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Ok(date.with_timezone(&Utc)),
        Err(err) => NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
            .ok_or(err),
    }
}

pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(date))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|err| de::Error::custom(format!("invalid date {raw:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_drops_fractional_seconds() {
        let date = Utc.with_ymd_and_hms(2025, 5, 1, 12, 34, 56).unwrap()
            + chrono::Duration::milliseconds(789);
        assert_eq!(format(&date), "2025-05-01T12:34:56Z");
    }

    #[test]
    fn parse_accepts_offsets_and_naive_times() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 1, 3, 0, 0).unwrap();
        assert_eq!(parse("2025-05-01T12:00:00+09:00").unwrap(), expected);
        assert_eq!(parse("2025-05-01T03:00:00").unwrap(), expected);
        assert_eq!(parse("2025-05-01 03:00:00.000").unwrap(), expected);
        assert!(parse("yesterday").is_err());
    }
}
