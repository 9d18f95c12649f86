//! The registry of datasets the PPMI portal serves.
//!
//! File ids are the opaque numeric identifiers the download endpoint expects;
//! names are the on-disk file names the portal produces for each dataset.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Deserialize;

/// One downloadable dataset as the portal knows it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetRecord {
    /// Numeric file id used in download query strings.
    pub id: String,
    /// File name the dataset lands under once downloaded or extracted.
    pub name: String,
}

/// Genetics datasets are grouped into numbered projects; requesting a project
/// expands to every file belonging to it.
const GENETIC_PROJECTS: [u16; 7] = [107, 108, 115, 116, 118, 120, 133];

static STUDYDATA: LazyLock<BTreeMap<String, DatasetRecord>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../../data/studydata.json"))
        .expect("bundled studydata manifest is valid JSON")
});

static GENETICS: LazyLock<BTreeMap<String, DatasetRecord>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../../data/genetics.json"))
        .expect("bundled genetics manifest is valid JSON")
});

/// Lists study data available to download from the PPMI.
pub fn fetchable_studydata() -> Vec<&'static str> {
    STUDYDATA.keys().map(String::as_str).collect()
}

/// Lists genetics data files available to download from the PPMI.
pub fn fetchable_genetics() -> Vec<&'static str> {
    GENETICS.keys().map(String::as_str).collect()
}

/// Lists the genetics project designations accepted by
/// [`IdaClient::fetch_genetics`](crate::fetch::IdaClient::fetch_genetics).
pub fn fetchable_genetic_projects() -> Vec<String> {
    GENETIC_PROJECTS
        .iter()
        .map(|p| format!("project {p}"))
        .collect()
}

pub(crate) fn studydata_record(key: &str) -> Option<&'static DatasetRecord> {
    STUDYDATA.get(key)
}

pub(crate) fn genetics_record(key: &str) -> Option<&'static DatasetRecord> {
    GENETICS.get(key)
}

/// Expands `"all"` and `"project NNN"` designations into concrete dataset keys.
pub(crate) fn expand_genetics_request(datasets: &[&str]) -> Vec<String> {
    let mut keys: Vec<String> = if datasets.iter().any(|d| *d == "all") {
        GENETICS.keys().cloned().collect()
    } else {
        datasets.iter().map(|d| (*d).to_string()).collect()
    };

    for project in fetchable_genetic_projects() {
        if let Some(pos) = keys.iter().position(|k| *k == project) {
            keys.remove(pos);
            keys.extend(
                GENETICS
                    .keys()
                    .filter(|k| k.to_lowercase().contains(&project))
                    .cloned(),
            );
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_studydata_registry_parses_and_lists() {
        let available = fetchable_studydata();
        assert!(!available.is_empty());
        assert!(available.contains(&"Vital Signs"));
        assert!(available.contains(&"Montreal Cognitive Assessment (MoCA)"));
    }

    #[test]
    fn test_every_studydata_record_names_a_csv() {
        for key in fetchable_studydata() {
            let record = studydata_record(key).unwrap();
            assert!(record.name.ends_with(".csv"), "{key} -> {}", record.name);
            assert!(record.id.parse::<u32>().is_ok(), "{key} -> {}", record.id);
        }
    }

    #[test]
    fn test_genetics_projects_cover_registry() {
        // every genetics key belongs to exactly one known project
        for key in fetchable_genetics() {
            let owners = fetchable_genetic_projects()
                .into_iter()
                .filter(|p| key.to_lowercase().contains(p.as_str()))
                .count();
            assert_eq!(owners, 1, "{key}");
        }
    }

    #[test]
    fn test_expand_genetics_project_designation() {
        let expanded = expand_genetics_request(&["project 107"]);
        assert!(!expanded.is_empty());
        assert!(expanded.iter().all(|k| k.contains("project 107")));
    }

    #[test]
    fn test_expand_genetics_all() {
        let expanded = expand_genetics_request(&["all"]);
        assert_eq!(expanded.len(), fetchable_genetics().len());
    }

    #[test]
    fn test_expand_genetics_passes_plain_keys_through() {
        let expanded =
            expand_genetics_request(&["project 108: rna sequencing counts (baseline)"]);
        assert_eq!(
            expanded,
            vec!["project 108: rna sequencing counts (baseline)".to_string()]
        );
    }
}
