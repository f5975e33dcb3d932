//! Normalizes raw contact observations into a uniform shape.
//!
//! All downstream logic (similarity, dedup, categorization) operates on
//! [`FormattedContact`], so every list-or-scalar quirk of the upstream
//! datasets is absorbed here, at the system boundary.

use crate::models::{FieldValue, FormattedContact, RawContact};
use phonenumber::country::Id as CountryId;
use phonenumber::Mode;

/// Normalizes one list-or-scalar field: flatten, trim, drop blanks, and
/// remove exact (case-sensitive) duplicates preserving first occurrence.
fn format_field(value: FieldValue) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for element in value.into_vec() {
        let trimmed = element.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.iter().any(|s| s == trimmed) {
            continue;
        }
        seen.push(trimmed.to_string());
    }
    seen
}

/// Validate and normalize a US phone number.
///
/// Uses the phonenumber library (port of Google's libphonenumber) to:
/// - Parse the number with the US region
/// - Check it is a valid US number
/// - Return the normalized E.164 form (+12125550100)
///
/// Returns: (is_valid, normalized_phone_or_error_msg)
pub fn validate_us_phone(raw: &str) -> (bool, String) {
    // Skip empty or obviously short strings
    if raw.trim().is_empty() || raw.trim().len() < 10 {
        return (false, "Phone too short".to_string());
    }

    match phonenumber::parse(Some(CountryId::US), raw) {
        Ok(number) => {
            if phonenumber::is_valid(&number) {
                let formatted = number.format().mode(Mode::E164).to_string();
                tracing::debug!("✓ Valid US phone: {} → {}", raw, formatted);
                (true, formatted)
            } else {
                tracing::debug!("Invalid US phone number: {}", raw);
                (false, "Invalid US phone number".to_string())
            }
        }
        Err(e) => {
            tracing::debug!("Failed to parse US phone '{}': {:?}", raw, e);
            (false, format!("Parse error: {:?}", e))
        }
    }
}

/// Normalizes the phone field: elements that validate as US numbers are
/// rewritten to E.164, the rest are kept verbatim after trimming. Duplicate
/// removal runs on the rewritten values so "(212) 555-0100" and
/// "+12125550100" collapse to one entry.
fn format_phone_field(value: FieldValue) -> Vec<String> {
    let rewritten: Vec<String> = value
        .into_vec()
        .into_iter()
        .map(|element| {
            let trimmed = element.trim().to_string();
            let (valid, normalized) = validate_us_phone(&trimmed);
            if valid {
                normalized
            } else {
                trimmed
            }
        })
        .collect();
    format_field(FieldValue::Many(rewritten))
}

/// Normalizes one raw observation. Scalar fields pass through unchanged.
///
/// Never errors: malformed fields have already been coerced by the
/// deserialization layer, and blank elements simply disappear.
pub fn format_contact(raw: RawContact) -> FormattedContact {
    FormattedContact {
        bbl: raw.bbl,
        bucket_name: raw.bucket_name,
        status: raw.status,
        owner_business_name: format_field(raw.owner_business_name),
        owner_full_address: format_field(raw.owner_full_address),
        owner_title: format_field(raw.owner_title),
        owner_phone: format_phone_field(raw.owner_phone),
        owner_full_name: format_field(raw.owner_full_name),
        owner_master_full_name: raw.owner_master_full_name,
        date: raw.date,
        source: raw.source,
        agency: raw.agency,
        merged_count: raw.merged_count,
    }
}

/// Normalizes a batch of raw observations, preserving input order.
pub fn format_contacts(raw: Vec<RawContact>) -> Vec<FormattedContact> {
    raw.into_iter().map(format_contact).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_wraps_as_single_element() {
        let formatted = format_field(FieldValue::One("ACME LLC".to_string()));
        assert_eq!(formatted, vec!["ACME LLC".to_string()]);
    }

    #[test]
    fn test_missing_becomes_empty() {
        assert!(format_field(FieldValue::Missing).is_empty());
    }

    #[test]
    fn test_trim_and_drop_blanks() {
        let formatted = format_field(FieldValue::Many(vec![
            "  123 MAIN ST  ".to_string(),
            "   ".to_string(),
            "".to_string(),
            "456 OAK AVE".to_string(),
        ]));
        assert_eq!(
            formatted,
            vec!["123 MAIN ST".to_string(), "456 OAK AVE".to_string()]
        );
    }

    #[test]
    fn test_exact_duplicates_removed_first_wins() {
        let formatted = format_field(FieldValue::Many(vec![
            "JOHN SMITH".to_string(),
            "John Smith".to_string(),
            "JOHN SMITH ".to_string(),
        ]));
        // Case-sensitive: "John Smith" survives, the re-trimmed repeat does not
        assert_eq!(
            formatted,
            vec!["JOHN SMITH".to_string(), "John Smith".to_string()]
        );
    }

    #[test]
    fn test_phone_normalized_to_e164() {
        let formatted = format_phone_field(FieldValue::Many(vec![
            "(212) 555-0100".to_string(),
            "+12125550100".to_string(),
        ]));
        assert_eq!(formatted, vec!["+12125550100".to_string()]);
    }

    #[test]
    fn test_invalid_phone_kept_verbatim() {
        let formatted = format_phone_field(FieldValue::One("CALL SUPER".to_string()));
        assert_eq!(formatted, vec!["CALL SUPER".to_string()]);
    }

    #[test]
    fn test_format_is_idempotent() {
        let raw = RawContact {
            owner_full_address: FieldValue::Many(vec![
                " 123 MAIN ST ".to_string(),
                "123 MAIN ST".to_string(),
            ]),
            owner_phone: FieldValue::One("212-555-0100".to_string()),
            owner_master_full_name: Some("JOHN SMITH".to_string()),
            ..Default::default()
        };
        let once = format_contact(raw);
        let twice = format_contact(once.clone().into());
        assert_eq!(once, twice);
    }
}
