use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{error, info};

use crate::{record::PromoRecord, Result};

/// Discovered promos keyed by code, backed by a single JSON file.
///
/// The file is always rewritten as a whole, never merged.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    records: BTreeMap<String, PromoRecord>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
        }
    }

    /// Loads the store from `path`. A missing file gives an empty store,
    /// an unreadable one is logged and also gives an empty store.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);
        if !tokio::fs::try_exists(&store.path).await.unwrap_or(false) {
            return store;
        }

        match read_records(&store.path).await {
            Ok(records) => {
                info!("Loaded {} existing results", records.len());
                store.records = records;
            }
            Err(err) => error!("Error loading results: {err}"),
        }
        store
    }

    /// Overwrites the backing file with every record in memory.
    pub async fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        tokio::fs::write(&self.path, json).await?;
        info!(
            "Saved {} results to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.records.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<&PromoRecord> {
        self.records.get(code)
    }

    /// Existing records are kept: a code is only recorded the first time it's found.
    pub fn insert(&mut self, record: PromoRecord) -> bool {
        if self.records.contains_key(&record.code) {
            return false;
        }
        self.records.insert(record.code.clone(), record);
        true
    }

    /// Records ordered by code.
    pub fn records(&self) -> impl Iterator<Item = &PromoRecord> {
        self.records.values()
    }

    /// Case-insensitive substring search over organization names.
    /// Records without a name never match.
    pub fn search_by_organization(&self, query: &str) -> Vec<&PromoRecord> {
        let query = query.to_lowercase();
        self.records()
            .filter(|record| {
                record
                    .organization_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&query))
            })
            .collect()
    }
}

async fn read_records(path: &Path) -> Result<BTreeMap<String, PromoRecord>> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::record::PromoStatus;

    fn record(code: &str, organization: Option<&str>) -> PromoRecord {
        PromoRecord {
            code: code.into(),
            url: format!("https://www.alaskaair.com/promo/{code}"),
            organization_name: organization.map(Into::into),
            discovered_at: NaiveDateTime::parse_from_str(
                "2024-05-01T12:30:45.250",
                "%Y-%m-%dT%H:%M:%S%.f",
            )
            .unwrap(),
            status: PromoStatus::Active,
            expiration_date: None,
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promos.json");

        let mut store = RecordStore::new(&path);
        store.insert(record("CS2344", Some("University of Washington")));
        let mut expired = record("AS2401", Some("Zürich Ä.G."));
        expired.status = PromoStatus::Expired;
        expired.expiration_date = Some("1/2/2024".into());
        store.insert(expired);
        store.insert(record("AS2302", None));
        store.save().await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Zürich"));
        assert!(raw.contains("\n  \"AS2302\""));

        let loaded = RecordStore::load(&path).await;
        assert_eq!(loaded.records, store.records);
    }

    #[tokio::test]
    async fn missing_or_broken_file_gives_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let missing = RecordStore::load(dir.path().join("nope.json")).await;
        assert!(missing.is_empty());

        let broken_path = dir.path().join("broken.json");
        std::fs::write(&broken_path, "{ not json").unwrap();
        let broken = RecordStore::load(&broken_path).await;
        assert!(broken.is_empty());
    }

    #[test]
    fn insert_keeps_first_record() {
        let mut store = RecordStore::new("unused.json");
        assert!(store.insert(record("AS2300", Some("Acme Corp"))));
        assert!(!store.insert(record("AS2300", Some("Other"))));
        assert_eq!(
            store.get("AS2300").unwrap().organization_name.as_deref(),
            Some("Acme Corp")
        );
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut store = RecordStore::new("unused.json");
        store.insert(record("CS2344", Some("University of Washington")));
        store.insert(record("AS2300", Some("Acme Corp")));
        store.insert(record("AS2301", None));
        store.insert(record("AS2399", Some("Western University")));

        let codes: Vec<_> = store
            .search_by_organization("university")
            .into_iter()
            .map(|r| r.code.as_str())
            .collect();
        assert_eq!(codes, vec!["AS2399", "CS2344"]);
        assert!(store.search_by_organization("ACME").len() == 1);
        assert!(store.search_by_organization("initech").is_empty());
    }
}
