use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============ Raw Source Models ============

/// A field that may arrive from an upstream dataset as a single string,
/// an array of strings, or null/absent.
///
/// Municipal aggregations are inconsistent about this: the same column is a
/// scalar in one source and an array in another. Anything that is not a
/// string or an array of strings (numbers, objects) coerces to `Missing`
/// rather than failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Field was null or absent.
    #[default]
    Missing,
    /// Field arrived as a single scalar string.
    One(String),
    /// Field arrived as an array of strings.
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => FieldValue::One(s),
            serde_json::Value::Array(items) => FieldValue::Many(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            // Unexpected shape (number, object, bool, null) degrades to Missing
            _ => FieldValue::Missing,
        })
    }
}

impl FieldValue {
    /// Flattens the field into a plain vector, preserving source order.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            FieldValue::Missing => Vec::new(),
            FieldValue::One(s) => vec![s],
            FieldValue::Many(items) => items,
        }
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::Many(items)
    }
}

/// One observation of a property owner/contact from one data source.
///
/// This is the shape delivered by the data-fetching collaborator, keyed by a
/// BBL-style parcel identifier. The list-or-scalar fields are absorbed by
/// [`FieldValue`]; everything else passes through the formatter unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContact {
    /// Borough-Block-Lot parcel identifier.
    #[serde(default)]
    pub bbl: Option<String>,
    /// Display bucket the observation was fetched under.
    #[serde(default)]
    pub bucket_name: Option<String>,
    /// Registration/record status as reported by the source.
    #[serde(default)]
    pub status: Option<String>,
    /// Business name(s) associated with the owner.
    #[serde(default)]
    pub owner_business_name: FieldValue,
    /// Mailing address(es) on file for the owner.
    #[serde(default)]
    pub owner_full_address: FieldValue,
    /// Title(s) held by the contact (e.g. "OFFICER", "AGENT").
    #[serde(default)]
    pub owner_title: FieldValue,
    /// Phone number(s) on file for the contact.
    #[serde(default)]
    pub owner_phone: FieldValue,
    /// Person name(s) as recorded by the source.
    #[serde(default)]
    pub owner_full_name: FieldValue,
    /// Canonical owner name chosen by the upstream aggregation, if any.
    #[serde(default)]
    pub owner_master_full_name: Option<String>,
    /// Observation date, when the source reports one.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Source dataset identifier (e.g. "latest_sale").
    #[serde(default)]
    pub source: Option<String>,
    /// Reporting agency (e.g. "DOF", "HPD", "DOB").
    #[serde(default)]
    pub agency: Option<String>,
    /// How many raw observations this record already represents.
    #[serde(default = "default_merged_count")]
    pub merged_count: u32,
}

fn default_merged_count() -> u32 {
    1
}

impl Default for RawContact {
    fn default() -> Self {
        Self {
            bbl: None,
            bucket_name: None,
            status: None,
            owner_business_name: FieldValue::Missing,
            owner_full_address: FieldValue::Missing,
            owner_title: FieldValue::Missing,
            owner_phone: FieldValue::Missing,
            owner_full_name: FieldValue::Missing,
            owner_master_full_name: None,
            date: None,
            source: None,
            agency: None,
            merged_count: 1,
        }
    }
}

// ============ Formatted Models ============

/// A [`RawContact`] after normalization.
///
/// Every list-or-scalar field is guaranteed to be a vector (never null),
/// with elements trimmed, exact duplicates removed, and first-occurrence
/// order preserved. Phone elements that validate as US numbers are rewritten
/// to E.164.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedContact {
    /// Borough-Block-Lot parcel identifier.
    pub bbl: Option<String>,
    /// Display bucket the observation was fetched under.
    pub bucket_name: Option<String>,
    /// Registration/record status as reported by the source.
    pub status: Option<String>,
    /// Business names, normalized.
    pub owner_business_name: Vec<String>,
    /// Mailing addresses, normalized.
    pub owner_full_address: Vec<String>,
    /// Contact titles, normalized.
    pub owner_title: Vec<String>,
    /// Phone numbers, normalized (E.164 where they validate).
    pub owner_phone: Vec<String>,
    /// Person names, normalized.
    pub owner_full_name: Vec<String>,
    /// Canonical owner name, if the aggregation supplied one.
    pub owner_master_full_name: Option<String>,
    /// Observation date.
    pub date: Option<NaiveDate>,
    /// Source dataset identifier.
    pub source: Option<String>,
    /// Reporting agency.
    pub agency: Option<String>,
    /// How many raw source observations this record represents.
    pub merged_count: u32,
}

impl From<FormattedContact> for RawContact {
    /// Re-wraps a formatted contact in the raw shape. Formatting is
    /// idempotent, so formatting the result reproduces the input.
    fn from(c: FormattedContact) -> Self {
        Self {
            bbl: c.bbl,
            bucket_name: c.bucket_name,
            status: c.status,
            owner_business_name: c.owner_business_name.into(),
            owner_full_address: c.owner_full_address.into(),
            owner_title: c.owner_title.into(),
            owner_phone: c.owner_phone.into(),
            owner_full_name: c.owner_full_name.into(),
            owner_master_full_name: c.owner_master_full_name,
            date: c.date,
            source: c.source,
            agency: c.agency,
            merged_count: c.merged_count,
        }
    }
}

// ============ Category Model ============

/// Display category for an owner card, derived from `(agency, source)`.
///
/// Closed set; never stored. Unmatched pairs fall back to `AssessmentRoll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryTag {
    /// DOF assessment-roll owner.
    AssessmentRoll,
    /// HPD multiple-dwelling registration contact.
    HpdRegistration,
    /// DOB permit applicant/contact.
    Permits,
    /// Buyer/seller party on the latest recorded sale.
    Sale,
    /// Party on the latest recorded mortgage.
    Mortgage,
    /// Party on a prior recorded sale.
    PriorSale,
    /// Party on a prior recorded mortgage.
    PriorMortgage,
}

impl CategoryTag {
    /// Kebab-case wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::AssessmentRoll => "assessment-roll",
            CategoryTag::HpdRegistration => "hpd-registration",
            CategoryTag::Permits => "permits",
            CategoryTag::Sale => "sale",
            CategoryTag::Mortgage => "mortgage",
            CategoryTag::PriorSale => "prior-sale",
            CategoryTag::PriorMortgage => "prior-mortgage",
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============ Output Boundary ============

/// The output boundary object: one merged contact annotated with its
/// display category, ready for the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerCard {
    /// The merged, formatted contact.
    #[serde(flatten)]
    pub contact: FormattedContact,
    /// Display category derived from agency/source.
    pub category: CategoryTag,
}
