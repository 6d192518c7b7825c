//! The record store: owns the six collections, generates ids, persists the
//! whole document set through a [`BlobStore`], and answers queries.
//!
//! Every mutation synchronously writes the full store back under
//! [`DATA_KEY`]. A failed write is logged and absorbed: the in-memory state
//! stays authoritative for the rest of the session and simply will not
//! survive a restart. Not-found and parse failures, by contrast, surface as
//! explicit `Err` results.

use chrono::{Duration, Local, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{PharmaError, Result};
use crate::model::{Customer, Doctor, Document, Medication, Prescription, Report, StoreData, Supplier};
use crate::seed;
use crate::store::{BlobStore, DATA_KEY};

pub struct RecordStore<B: BlobStore> {
    blob: B,
    data: StoreData,
}

impl<B: BlobStore> RecordStore<B> {
    /// Load the store from the blob under [`DATA_KEY`]. An absent or
    /// malformed blob falls back to the seed defaults (malformed content is
    /// logged, not surfaced).
    pub fn open(blob: B) -> Self {
        let data = match blob.get(DATA_KEY) {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(data) => data,
                Err(e) => {
                    log::warn!("stored data is malformed, starting from defaults: {}", e);
                    seed::default_data()
                }
            },
            Ok(None) => seed::default_data(),
            Err(e) => {
                log::warn!("could not read stored data, starting from defaults: {}", e);
                seed::default_data()
            }
        };
        Self { blob, data }
    }

    /// Full collection in insertion order. Returns owned clones; mutations
    /// must go through [`RecordStore::update`].
    pub fn get_all<D: Document>(&self) -> Vec<D> {
        D::records(&self.data).clone()
    }

    /// Assign an id and creation time to `draft`, append it, persist, and
    /// return the stored record.
    pub fn add<D: Document>(&mut self, mut draft: D) -> D {
        draft.assign(next_id(D::COLLECTION.id_prefix()), Utc::now());
        D::records_mut(&mut self.data).push(draft.clone());
        self.persist();
        draft
    }

    /// Apply `patch` to the record with the given id. The id and creation
    /// time are restored afterwards, so a patch cannot change identity.
    pub fn update<D, F>(&mut self, id: &str, patch: F) -> Result<D>
    where
        D: Document,
        F: FnOnce(&mut D),
    {
        let records = D::records_mut(&mut self.data);
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Err(PharmaError::not_found(D::COLLECTION, id));
        };
        let keep_id = record.id().to_string();
        let keep_created = record.created_at();
        patch(record);
        record.assign(keep_id, keep_created);
        let updated = record.clone();
        self.persist();
        Ok(updated)
    }

    /// Remove the first record with the given id. Returns whether anything
    /// was removed; a miss leaves the collection untouched.
    pub fn delete<D: Document>(&mut self, id: &str) -> bool {
        let records = D::records_mut(&mut self.data);
        match records.iter().position(|r| r.id() == id) {
            Some(pos) => {
                records.remove(pos);
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Case-insensitive substring match over the collection's fixed search
    /// fields. No ranking; results keep insertion order.
    pub fn search<D: Document>(&self, query: &str) -> Vec<D> {
        let needle = query.to_lowercase();
        D::records(&self.data)
            .iter()
            .filter(|r| r.matches(&needle))
            .cloned()
            .collect()
    }

    /// Medications at or below their minimum stock level.
    pub fn low_stock(&self) -> Vec<Medication> {
        self.data
            .medications
            .iter()
            .filter(|m| m.quantity <= m.min_stock_level)
            .cloned()
            .collect()
    }

    /// Medications expiring within the next `within_days` days, counted
    /// from the local calendar date.
    pub fn expiring(&self, within_days: u32) -> Vec<Medication> {
        self.expiring_from(Local::now().date_naive(), within_days)
    }

    /// Medications whose expiration date falls in `[today, today + within_days]`,
    /// both bounds inclusive. Already-expired stock is not listed.
    pub fn expiring_from(&self, today: NaiveDate, within_days: u32) -> Vec<Medication> {
        let horizon = today + Duration::days(i64::from(within_days));
        self.data
            .medications
            .iter()
            .filter(|m| m.expiration_date >= today && m.expiration_date <= horizon)
            .cloned()
            .collect()
    }

    /// Serialize the whole store as pretty-printed JSON.
    pub fn export_snapshot(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.data).map_err(PharmaError::Serialization)
    }

    /// Replace the store with the parsed snapshot, overlaid on the seed
    /// defaults: collections present in the text win, absent ones fall back
    /// to their defaults. On parse failure the store is unchanged.
    pub fn import_snapshot(&mut self, text: &str) -> Result<()> {
        let snapshot: SnapshotPatch =
            serde_json::from_str(text).map_err(PharmaError::Serialization)?;
        self.data = snapshot.overlay(seed::default_data());
        self.persist();
        Ok(())
    }

    fn persist(&mut self) {
        let text = match serde_json::to_string_pretty(&self.data) {
            Ok(text) => text,
            Err(e) => {
                log::error!("could not serialize record store: {}", e);
                return;
            }
        };
        if let Err(e) = self.blob.put(DATA_KEY, &text) {
            log::error!(
                "could not persist record store, changes live in memory only: {}",
                e
            );
        }
    }
}

fn next_id(prefix: &str) -> String {
    // Random suffix. The previous scheme (last six digits of the wall
    // clock in millis) collided under rapid successive adds.
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

/// A snapshot may carry any subset of the collections.
#[derive(Default, Deserialize)]
#[serde(default)]
struct SnapshotPatch {
    medications: Option<Vec<Medication>>,
    customers: Option<Vec<Customer>>,
    doctors: Option<Vec<Doctor>>,
    suppliers: Option<Vec<Supplier>>,
    prescriptions: Option<Vec<Prescription>>,
    reports: Option<Vec<Report>>,
}

impl SnapshotPatch {
    fn overlay(self, mut base: StoreData) -> StoreData {
        if let Some(medications) = self.medications {
            base.medications = medications;
        }
        if let Some(customers) = self.customers {
            base.customers = customers;
        }
        if let Some(doctors) = self.doctors {
            base.doctors = doctors;
        }
        if let Some(suppliers) = self.suppliers {
            base.suppliers = suppliers;
        }
        if let Some(prescriptions) = self.prescriptions {
            base.prescriptions = prescriptions;
        }
        if let Some(reports) = self.reports {
            base.reports = reports;
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::FailingBlobStore;
    use crate::store::memory::MemoryBlobStore;

    fn open_store() -> RecordStore<MemoryBlobStore> {
        RecordStore::open(MemoryBlobStore::new())
    }

    fn med(name: &str, quantity: u32, min_stock_level: u32, expires: NaiveDate) -> Medication {
        Medication {
            id: String::new(),
            name: name.to_string(),
            dosage: "10mg".to_string(),
            quantity,
            expiration_date: expires,
            price: 1.0,
            supplier: "Acme Pharma".to_string(),
            description: String::new(),
            category: "General".to_string(),
            min_stock_level,
            created_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_assigns_a_fresh_unique_id() {
        let mut store = open_store();
        let a = store.add(med("Ibuprofen", 10, 5, date(2026, 1, 1)));
        let b = store.add(med("Ibuprofen", 10, 5, date(2026, 1, 1)));

        assert!(!a.id.is_empty());
        assert!(a.id.starts_with("MED"));
        assert_ne!(a.id, b.id);

        let all: Vec<Medication> = store.get_all();
        assert!(all.iter().any(|m| m.id == a.id));
        assert!(all.iter().any(|m| m.id == b.id));
    }

    #[test]
    fn update_changes_only_the_patched_fields() {
        let mut store = open_store();
        let created = store.add(med("Aspirin", 40, 20, date(2026, 6, 1)));

        let updated = store
            .update::<Medication, _>(&created.id, |m| m.quantity = 12)
            .unwrap();

        assert_eq!(updated.quantity, 12);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.price, created.price);
        assert_eq!(updated.expiration_date, created.expiration_date);
    }

    #[test]
    fn update_cannot_change_id_or_creation_time() {
        let mut store = open_store();
        let created = store.add(med("Aspirin", 40, 20, date(2026, 6, 1)));

        let updated = store
            .update::<Medication, _>(&created.id, |m| {
                m.id = "MED-forged".to_string();
                m.created_at = Utc::now() + Duration::days(99);
            })
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn update_on_a_missing_id_is_not_found() {
        let mut store = open_store();
        let err = store
            .update::<Medication, _>("MED-missing", |m| m.quantity = 0)
            .unwrap_err();
        assert!(matches!(err, PharmaError::NotFound { .. }));
    }

    #[test]
    fn delete_removes_exactly_one_record() {
        let mut store = open_store();
        let created = store.add(med("Aspirin", 40, 20, date(2026, 6, 1)));
        let before = store.get_all::<Medication>().len();

        assert!(store.delete::<Medication>(&created.id));
        assert_eq!(store.get_all::<Medication>().len(), before - 1);
    }

    #[test]
    fn delete_on_a_missing_id_leaves_the_collection_alone() {
        let mut store = open_store();
        let before = store.get_all::<Medication>().len();

        assert!(!store.delete::<Medication>("MED-missing"));
        assert_eq!(store.get_all::<Medication>().len(), before);
    }

    #[test]
    fn seeded_search_finds_lisinopril_by_category() {
        let store = open_store();
        let hits: Vec<Medication> = store.search("cardio");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Lisinopril");
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let store = open_store();
        let by_supplier: Vec<Medication> = store.search("MEDISOURCE");
        assert_eq!(by_supplier.len(), 1);

        let by_name: Vec<Customer> = store.search("johnson");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].first_name, "Sarah");
    }

    #[test]
    fn low_stock_includes_the_boundary() {
        let mut store = open_store();
        store.add(med("AtMinimum", 30, 30, date(2026, 1, 1)));
        store.add(med("BelowMinimum", 5, 30, date(2026, 1, 1)));
        store.add(med("Plenty", 31, 30, date(2026, 1, 1)));

        let low = store.low_stock();
        let names: Vec<&str> = low.iter().map(|m| m.name.as_str()).collect();
        assert!(names.contains(&"AtMinimum"));
        assert!(names.contains(&"BelowMinimum"));
        assert!(!names.contains(&"Plenty"));
    }

    #[test]
    fn expiring_window_is_inclusive_on_both_ends() {
        let mut store = RecordStore::open(MemoryBlobStore::new());
        // Drop the seed medications to keep the assertions exact
        for m in store.get_all::<Medication>() {
            store.delete::<Medication>(&m.id);
        }
        store.add(med("TwentyDaysOut", 10, 5, date(2025, 5, 10)));
        store.add(med("ThirtyFiveDaysOut", 10, 5, date(2025, 5, 25)));
        store.add(med("ExpiredYesterday", 10, 5, date(2025, 4, 19)));
        store.add(med("ExpiresToday", 10, 5, date(2025, 4, 20)));
        store.add(med("ExactlyThirty", 10, 5, date(2025, 5, 20)));

        let today = date(2025, 4, 20);
        let expiring = store.expiring_from(today, 30);
        let names: Vec<&str> = expiring.iter().map(|m| m.name.as_str()).collect();

        assert!(names.contains(&"TwentyDaysOut"));
        assert!(names.contains(&"ExpiresToday"));
        assert!(names.contains(&"ExactlyThirty"));
        assert!(!names.contains(&"ThirtyFiveDaysOut"));
        assert!(!names.contains(&"ExpiredYesterday"));
    }

    #[test]
    fn snapshot_round_trips_the_whole_store() {
        let mut store = open_store();
        store.add(med("Extra", 10, 5, date(2026, 1, 1)));
        let snapshot = store.export_snapshot().unwrap();
        let before_meds = store.get_all::<Medication>();
        let before_customers = store.get_all::<Customer>();

        store.import_snapshot(&snapshot).unwrap();

        assert_eq!(store.get_all::<Medication>(), before_meds);
        assert_eq!(store.get_all::<Customer>(), before_customers);
    }

    #[test]
    fn partial_snapshot_restores_seed_defaults_for_missing_collections() {
        let mut store = open_store();
        // Snapshot listing only medications: every other collection should
        // come back as its seed default.
        let snapshot = r#"{ "medications": [] }"#;
        store.import_snapshot(snapshot).unwrap();

        assert!(store.get_all::<Medication>().is_empty());
        let customers = store.get_all::<Customer>();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].id, "CUST001");
    }

    #[test]
    fn malformed_snapshot_leaves_the_store_unchanged() {
        let mut store = open_store();
        store.add(med("Survivor", 10, 5, date(2026, 1, 1)));
        let before = store.get_all::<Medication>();

        assert!(store.import_snapshot("{ not json").is_err());
        assert_eq!(store.get_all::<Medication>(), before);
    }

    #[test]
    fn persistence_failure_is_absorbed() {
        let mut store = RecordStore::open(FailingBlobStore);
        let created = store.add(med("Ephemeral", 10, 5, date(2026, 1, 1)));

        // The write failed, but the in-memory state is authoritative for
        // the session.
        let all: Vec<Medication> = store.get_all();
        assert!(all.iter().any(|m| m.id == created.id));

        let updated = store
            .update::<Medication, _>(&created.id, |m| m.quantity = 1)
            .unwrap();
        assert_eq!(updated.quantity, 1);
    }

    #[test]
    fn open_falls_back_to_seed_on_malformed_blob() {
        let mut blob = MemoryBlobStore::new();
        blob.put(DATA_KEY, "definitely not json").unwrap();
        let store = RecordStore::open(blob);

        let meds: Vec<Medication> = store.get_all();
        assert_eq!(meds.len(), 2);
        assert_eq!(meds[0].id, "MED001");
    }

    #[test]
    fn reopening_the_same_blob_sees_persisted_records() {
        let mut first = RecordStore::open(MemoryBlobStore::new());
        let created = first.add(med("Durable", 10, 5, date(2026, 1, 1)));
        let RecordStore { blob, .. } = first;

        let second = RecordStore::open(blob);
        let all: Vec<Medication> = second.get_all();
        assert!(all.iter().any(|m| m.id == created.id));
    }
}
