//! Assigns display categories from `(agency, source)` metadata.

use crate::models::CategoryTag;

/// Classifies a contact's agency/source pair against the fixed precedence
/// table. First match wins; comparison is case-insensitive on both sides.
///
/// DOB records categorize as permits regardless of the specific source
/// string. Unmatched pairs default to the assessment roll with a warning,
/// so upstream dataset drift is observable without breaking rendering.
pub fn categorize(agency: Option<&str>, source: Option<&str>) -> CategoryTag {
    let agency_lc = agency.map(str::to_lowercase);
    let source_lc = source.map(str::to_lowercase);

    match (agency_lc.as_deref(), source_lc.as_deref()) {
        (Some("dof"), Some("property_valuation")) => CategoryTag::AssessmentRoll,
        (Some("hpd"), Some("multiple_dwelling_registrations")) => CategoryTag::HpdRegistration,
        (Some("dob"), _) => CategoryTag::Permits,
        (Some("dof"), Some("latest_sale")) => CategoryTag::Sale,
        (Some("dof"), Some("latest_mortgage")) => CategoryTag::Mortgage,
        (Some("dof"), Some("prior_sale")) => CategoryTag::PriorSale,
        (Some("dof"), Some("prior_mortgage")) => CategoryTag::PriorMortgage,
        _ => {
            tracing::warn!(
                "Unmatched agency/source pair (agency: {:?}, source: {:?}), defaulting to assessment-roll",
                agency,
                source
            );
            CategoryTag::AssessmentRoll
        }
    }
}
