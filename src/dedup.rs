//! Similarity clustering and cluster merging.
//!
//! Contacts are nodes; every pair scoring at or above the configured
//! threshold is unioned into the same cluster. The pair grid is O(n²), which
//! is fine at per-parcel scale (tens of records). Each cluster then merges
//! into one representative card.

use crate::config::DedupConfig;
use crate::models::FormattedContact;
use crate::similarity::similarity;
use indexmap::IndexMap;
use petgraph::unionfind::UnionFind;
use std::collections::HashSet;

/// Ordered union of list fields across cluster members.
///
/// First-seen order is preserved (members are visited in original input
/// order). Names and addresses fold case when de-duplicating; titles and
/// phones compare exactly.
fn union_lists(lists: &[&Vec<String>], fold_case: bool) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<String> = Vec::new();
    for list in lists {
        for element in list.iter() {
            let key = if fold_case {
                element.to_lowercase()
            } else {
                element.clone()
            };
            if seen.insert(key) {
                merged.push(element.clone());
            }
        }
    }
    merged
}

/// Merges one cluster into a representative contact.
///
/// Members arrive in original input order, which drives every tie-break:
/// scalars take the first non-null value, list unions keep first-seen
/// elements, and the master name prefers a value actually present over one
/// derived from a member's business name.
fn merge_cluster(contacts: &[FormattedContact], members: &[usize]) -> FormattedContact {
    if members.len() == 1 {
        return contacts[members[0]].clone();
    }

    let member_contacts: Vec<&FormattedContact> = members.iter().map(|&i| &contacts[i]).collect();

    let first_scalar = |get: fn(&FormattedContact) -> Option<&String>| -> Option<String> {
        member_contacts.iter().find_map(|&c| get(c).cloned())
    };

    let owner_master_full_name = member_contacts
        .iter()
        .find_map(|c| {
            c.owner_master_full_name
                .clone()
                .filter(|name| !name.trim().is_empty())
        })
        .or_else(|| {
            member_contacts
                .iter()
                .find_map(|c| c.owner_business_name.first().cloned())
        });

    FormattedContact {
        bbl: first_scalar(|c| c.bbl.as_ref()),
        bucket_name: first_scalar(|c| c.bucket_name.as_ref()),
        status: first_scalar(|c| c.status.as_ref()),
        owner_business_name: union_lists(
            &member_contacts
                .iter()
                .map(|c| &c.owner_business_name)
                .collect::<Vec<_>>(),
            true,
        ),
        owner_full_address: union_lists(
            &member_contacts
                .iter()
                .map(|c| &c.owner_full_address)
                .collect::<Vec<_>>(),
            true,
        ),
        owner_title: union_lists(
            &member_contacts
                .iter()
                .map(|c| &c.owner_title)
                .collect::<Vec<_>>(),
            false,
        ),
        owner_phone: union_lists(
            &member_contacts
                .iter()
                .map(|c| &c.owner_phone)
                .collect::<Vec<_>>(),
            false,
        ),
        owner_full_name: union_lists(
            &member_contacts
                .iter()
                .map(|c| &c.owner_full_name)
                .collect::<Vec<_>>(),
            true,
        ),
        owner_master_full_name,
        date: member_contacts.iter().filter_map(|c| c.date).max(),
        source: first_scalar(|c| c.source.as_ref()),
        agency: first_scalar(|c| c.agency.as_ref()),
        merged_count: member_contacts.iter().map(|c| c.merged_count).sum(),
    }
}

/// Clusters contacts by pairwise similarity and merges each cluster.
///
/// Clusters are emitted in order of the lowest original index among their
/// members, so the first-seen contact anchors its cluster's position.
/// Singleton clusters pass through unchanged, `merged_count` included.
pub fn deduplicate(contacts: Vec<FormattedContact>, config: &DedupConfig) -> Vec<FormattedContact> {
    if contacts.len() <= 1 {
        return contacts;
    }

    let mut union_find: UnionFind<usize> = UnionFind::new(contacts.len());
    for i in 0..contacts.len() {
        for j in (i + 1)..contacts.len() {
            let score = similarity(&contacts[i], &contacts[j], config);
            if score >= config.threshold {
                tracing::debug!("Contacts {} and {} scored {:.3}, clustering", i, j, score);
                union_find.union(i, j);
            }
        }
    }

    // IndexMap keyed by cluster root: insertion order is first-seen order,
    // which is exactly the lowest-original-index ordering we emit
    let mut clusters: IndexMap<usize, Vec<usize>> = IndexMap::new();
    for index in 0..contacts.len() {
        clusters.entry(union_find.find(index)).or_default().push(index);
    }

    tracing::debug!(
        "Clustered {} contacts into {} groups at threshold {}",
        contacts.len(),
        clusters.len(),
        config.threshold
    );

    clusters
        .into_values()
        .map(|members| merge_cluster(&contacts, &members))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn contact(master: &str, addresses: &[&str]) -> FormattedContact {
        FormattedContact {
            owner_master_full_name: Some(master.to_string()),
            owner_full_address: addresses.iter().map(|s| s.to_string()).collect(),
            merged_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_matching_contacts_merge() {
        let config = DedupConfig::default();
        let merged = deduplicate(
            vec![
                contact("JOHN SMITH", &["123 MAIN STREET"]),
                contact("JOHN SMITH", &["123 MAIN ST"]),
            ],
            &config,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].merged_count, 2);
    }

    #[test]
    fn test_different_addresses_do_not_merge() {
        let config = DedupConfig::default();
        let merged = deduplicate(
            vec![
                contact("JOHN SMITH", &["123 MAIN ST"]),
                contact("JOHN SMITH", &["456 OAK AVE"]),
            ],
            &config,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_transitive_clustering() {
        // A matches B, B matches C: all three land in one cluster even if
        // A and C would not match directly
        let config = DedupConfig::default();
        let a = contact("JOHN SMITH", &["123 MAIN ST"]);
        let b = contact("JOHN SMITH", &["123 MAIN ST", "456 OAK AVE"]);
        let c = contact("JOHN SMITH", &["456 OAK AVE"]);
        let merged = deduplicate(vec![a, b, c], &config);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].merged_count, 3);
    }

    #[test]
    fn test_merge_unions_addresses_case_insensitively() {
        let config = DedupConfig::default();
        let mut a = contact("JOHN SMITH", &["123 Main St"]);
        a.owner_phone = vec!["+12125550100".to_string()];
        let mut b = contact("JOHN SMITH", &["123 MAIN ST"]);
        b.owner_phone = vec!["+12125550199".to_string()];

        let merged = deduplicate(vec![a, b], &config);
        assert_eq!(merged.len(), 1);
        // Case-folded duplicate address collapses, first spelling wins
        assert_eq!(merged[0].owner_full_address, vec!["123 Main St".to_string()]);
        // Phones compare exactly, both survive in first-seen order
        assert_eq!(
            merged[0].owner_phone,
            vec!["+12125550100".to_string(), "+12125550199".to_string()]
        );
    }

    #[test]
    fn test_merge_prefers_first_non_null_scalars_and_latest_date() {
        let config = DedupConfig::default();
        let mut a = contact("JOHN SMITH", &["123 MAIN ST"]);
        a.date = Some(NaiveDate::from_ymd_opt(2019, 5, 1).unwrap());
        a.status = None;
        let mut b = contact("JOHN SMITH", &["123 MAIN ST"]);
        b.date = Some(NaiveDate::from_ymd_opt(2023, 2, 14).unwrap());
        b.status = Some("ACTIVE".to_string());

        let merged = deduplicate(vec![a, b], &config);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].date, Some(NaiveDate::from_ymd_opt(2023, 2, 14).unwrap()));
        assert_eq!(merged[0].status.as_deref(), Some("ACTIVE"));
    }

    #[test]
    fn test_master_name_prefers_present_value() {
        let config = DedupConfig::default();
        let mut a = contact("", &["123 MAIN ST"]);
        a.owner_master_full_name = None;
        a.owner_business_name = vec!["ACME REALTY LLC".to_string()];
        let mut b = contact("ACME REALTY LLC", &["123 MAIN ST"]);
        b.owner_business_name = vec!["ACME REALTY LLC".to_string()];

        let merged = deduplicate(vec![a, b], &config);
        assert_eq!(merged.len(), 1);
        // b's actual master name wins over a's business-name-derived one
        assert_eq!(merged[0].owner_master_full_name.as_deref(), Some("ACME REALTY LLC"));
    }

    #[test]
    fn test_cluster_anchors_at_lowest_original_index() {
        let config = DedupConfig::default();
        let merged = deduplicate(
            vec![
                contact("JOHN SMITH", &["123 MAIN ST"]),
                contact("JANE DOE", &["789 BROADWAY"]),
                contact("JOHN SMITH", &["123 MAIN STREET"]),
            ],
            &config,
        );
        assert_eq!(merged.len(), 2);
        // The SMITH cluster anchors at index 0, DOE stays second
        assert_eq!(merged[0].owner_master_full_name.as_deref(), Some("JOHN SMITH"));
        assert_eq!(merged[0].merged_count, 2);
        assert_eq!(merged[1].owner_master_full_name.as_deref(), Some("JANE DOE"));
    }

    #[test]
    fn test_empty_input() {
        let config = DedupConfig::default();
        assert!(deduplicate(Vec::new(), &config).is_empty());
    }

    #[test]
    fn test_merged_count_conserved() {
        let config = DedupConfig::default();
        let mut a = contact("JOHN SMITH", &["123 MAIN ST"]);
        a.merged_count = 3;
        let b = contact("JOHN SMITH", &["123 MAIN ST"]);
        let c = contact("JANE DOE", &["789 BROADWAY"]);

        let merged = deduplicate(vec![a, b, c], &config);
        let total: u32 = merged.iter().map(|m| m.merged_count).sum();
        assert_eq!(total, 5);
    }
}
