/*
 * Responsibility
 * - ISO-8601 の日付/日時文字列を DateTime<Utc> に変換する
 * - 受け付ける形式:
 *   - 2024-01-15
 *   - 2024-01-15T10:30 / 2024-01-15T10:30:00 / 2024-01-15T10:30:00.250
 *   - 上記 + Z または +09:00 のような offset
 * - offset 無しの値は UTC として扱う
 */
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // RFC 3339 requires seconds; ISO-8601 also allows "HH:MM" with an offset.
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    let without_zulu = raw.strip_suffix('Z').unwrap_or(raw);
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(without_zulu, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
