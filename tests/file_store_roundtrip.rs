use chrono::{NaiveDate, Utc};
use pharmsys::model::Medication;
use pharmsys::records::RecordStore;
use pharmsys::store::fs::FileBlobStore;

fn med(name: &str) -> Medication {
    Medication {
        id: String::new(),
        name: name.to_string(),
        dosage: "20mg".to_string(),
        quantity: 60,
        expiration_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        price: 0.80,
        supplier: "Acme Pharma".to_string(),
        description: String::new(),
        category: "General".to_string(),
        min_stock_level: 20,
        created_at: Utc::now(),
    }
}

#[test]
fn records_survive_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    let created = {
        let mut store = RecordStore::open(FileBlobStore::new(dir.path().to_path_buf()));
        store.add(med("Atorvastatin"))
    };

    let store = RecordStore::open(FileBlobStore::new(dir.path().to_path_buf()));
    let all: Vec<Medication> = store.get_all();
    assert!(all.iter().any(|m| m.id == created.id));
}

#[test]
fn exported_snapshot_file_imports_into_a_fresh_store() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = RecordStore::open(FileBlobStore::new(dir.path().join("a")));
    let created = first.add(med("Metformin"));
    let snapshot = first.export_snapshot().unwrap();

    let snapshot_path = dir.path().join("backup.json");
    std::fs::write(&snapshot_path, &snapshot).unwrap();

    let mut second = RecordStore::open(FileBlobStore::new(dir.path().join("b")));
    let text = std::fs::read_to_string(&snapshot_path).unwrap();
    second.import_snapshot(&text).unwrap();

    let all: Vec<Medication> = second.get_all();
    assert!(all.iter().any(|m| m.id == created.id));
    assert_eq!(all.len(), first.get_all::<Medication>().len());
}
