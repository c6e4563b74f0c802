//! Unit status classification.
//!
//! The CRM reports a unit's situation either as a small numeric code or as
//! free text, in Portuguese or English, with inconsistent casing and
//! accents. A separate "blocked since" timestamp marks administrative
//! blocks and takes precedence over anything the status field says.

use chrono::NaiveDateTime;

use super::inventory_model::UnitCondition;

/// Numeric code table used by the CRM.
const CODE_SOLD: i32 = 3;
const CODE_RESERVED: i32 = 2;
const CODE_RESERVED_TECHNICAL: i32 = 5;
const CODE_BLOCKED: i32 = 4;

/// Classifies a raw unit status into exactly one condition.
///
/// A non-null `blocked_since` always forces `Blocked`, even when the status
/// code or text says sold or reserved.
pub fn classify_unit_status(
    status: Option<&str>,
    blocked_since: Option<NaiveDateTime>,
) -> UnitCondition {
    if blocked_since.is_some() {
        return UnitCondition::Blocked;
    }

    let raw = match status.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return UnitCondition::Available,
    };

    if let Ok(code) = raw.parse::<i32>() {
        return match code {
            CODE_SOLD => UnitCondition::Sold,
            CODE_RESERVED | CODE_RESERVED_TECHNICAL => UnitCondition::Reserved,
            CODE_BLOCKED => UnitCondition::Blocked,
            _ => UnitCondition::Available,
        };
    }

    let normalized = normalize_status_text(raw);
    if normalized.contains("vendid") || normalized.contains("sold") {
        UnitCondition::Sold
    } else if normalized.contains("reserv") {
        UnitCondition::Reserved
    } else if normalized.contains("bloq") || normalized.contains("block") {
        UnitCondition::Blocked
    } else {
        UnitCondition::Available
    }
}

/// Lowercases and folds the accented characters the CRM feeds us.
fn normalize_status_text(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'â' | 'ã' | 'à' | 'ä' => 'a',
            'é' | 'ê' | 'è' | 'ë' => 'e',
            'í' | 'î' | 'ì' | 'ï' => 'i',
            'ó' | 'ô' | 'õ' | 'ò' | 'ö' => 'o',
            'ú' | 'û' | 'ù' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn numeric_codes_follow_the_fixed_table() {
        assert_eq!(classify_unit_status(Some("3"), None), UnitCondition::Sold);
        assert_eq!(classify_unit_status(Some("2"), None), UnitCondition::Reserved);
        assert_eq!(classify_unit_status(Some("5"), None), UnitCondition::Reserved);
        assert_eq!(classify_unit_status(Some("4"), None), UnitCondition::Blocked);
        assert_eq!(classify_unit_status(Some("1"), None), UnitCondition::Available);
        assert_eq!(classify_unit_status(Some("99"), None), UnitCondition::Available);
    }

    #[test]
    fn text_statuses_match_case_and_accent_insensitively() {
        assert_eq!(classify_unit_status(Some("VENDIDO"), None), UnitCondition::Sold);
        assert_eq!(classify_unit_status(Some("Sold"), None), UnitCondition::Sold);
        assert_eq!(
            classify_unit_status(Some("Reservada"), None),
            UnitCondition::Reserved
        );
        assert_eq!(
            classify_unit_status(Some("BLOQUEADA"), None),
            UnitCondition::Blocked
        );
        assert_eq!(
            classify_unit_status(Some("Disponível"), None),
            UnitCondition::Available
        );
    }

    #[test]
    fn blocked_since_beats_a_sold_status() {
        // precedence rule: the timestamp wins over code and text alike
        assert_eq!(
            classify_unit_status(Some("3"), Some(timestamp())),
            UnitCondition::Blocked
        );
        assert_eq!(
            classify_unit_status(Some("vendido"), Some(timestamp())),
            UnitCondition::Blocked
        );
        assert_eq!(
            classify_unit_status(None, Some(timestamp())),
            UnitCondition::Blocked
        );
    }

    #[test]
    fn missing_or_blank_status_is_available() {
        assert_eq!(classify_unit_status(None, None), UnitCondition::Available);
        assert_eq!(classify_unit_status(Some(""), None), UnitCondition::Available);
        assert_eq!(classify_unit_status(Some("   "), None), UnitCondition::Available);
    }
}
