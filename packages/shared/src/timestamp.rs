//! # タイムスタンプ表現
//!
//! API レスポンスで使う ISO-8601 文字列（UTC・ミリ秒精度・`Z` 終端）を生成する。

use chrono::{DateTime, SecondsFormat, Utc};

/// `2026-01-01T00:00:00.000Z` 形式の文字列に変換する
pub fn to_iso_string(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 現在時刻を ISO-8601 文字列で返す
pub fn now_iso_string() -> String {
    to_iso_string(Utc::now())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_to_iso_stringはミリ秒精度とz終端で出力する() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(to_iso_string(at), "2026-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_now_iso_stringはパース可能な文字列を返す() {
        let s = now_iso_string();

        assert!(DateTime::parse_from_rfc3339(&s).is_ok());
        assert!(s.ends_with('Z'));
    }
}
