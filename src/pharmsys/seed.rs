//! Fixed default data set used when nothing has been persisted yet, and as
//! the base layer when importing a partial snapshot.

use chrono::NaiveDate;
use chrono::Utc;
use std::collections::BTreeMap;

use crate::model::{
    AccountStatus, Customer, Doctor, Medication, Prescription, PrescriptionItem,
    PrescriptionStatus, Report, StoreData, Supplier,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("seed dates are valid")
}

pub fn default_data() -> StoreData {
    let now = Utc::now();

    StoreData {
        medications: vec![
            Medication {
                id: "MED001".into(),
                name: "Amoxicillin".into(),
                dosage: "500mg".into(),
                quantity: 100,
                expiration_date: date(2025, 12, 31),
                price: 0.50,
                supplier: "PharmaCorp Inc.".into(),
                description: "Antibiotic used to treat a number of bacterial infections.".into(),
                category: "Antibiotics".into(),
                min_stock_level: 50,
                created_at: now,
            },
            Medication {
                id: "MED002".into(),
                name: "Lisinopril".into(),
                dosage: "10mg".into(),
                quantity: 75,
                expiration_date: date(2025, 11, 15),
                price: 0.35,
                supplier: "MediSource Ltd.".into(),
                description: "ACE inhibitor used to treat high blood pressure.".into(),
                category: "Cardiovascular".into(),
                min_stock_level: 30,
                created_at: now,
            },
        ],
        customers: vec![Customer {
            id: "CUST001".into(),
            first_name: "Sarah".into(),
            last_name: "Johnson".into(),
            phone: "(555) 123-4567".into(),
            email: "sarah.j@example.com".into(),
            address: "123 Main St, Anytown, USA".into(),
            status: AccountStatus::Active,
            prescriptions: 5,
            created_at: now,
        }],
        doctors: vec![Doctor {
            id: "DOC001".into(),
            first_name: "Dr.".into(),
            last_name: "Miller".into(),
            specialty: "Cardiologist".into(),
            phone: "(555) 111-2222".into(),
            email: "dr.miller@example.com".into(),
            prescriptions: 15,
            created_at: now,
        }],
        suppliers: vec![Supplier {
            id: "SUPP001".into(),
            name: "PharmaCorp Inc.".into(),
            phone: "(555) 111-0000".into(),
            email: "contact@pharmacorp.com".into(),
            address: "500 Corporate Way, Business Park, CA 90001".into(),
            website: "https://www.pharmacorp.com".into(),
            status: AccountStatus::Active,
            products: 120,
            created_at: now,
        }],
        prescriptions: vec![Prescription {
            id: "PRE0023".into(),
            customer_id: "CUST001".into(),
            doctor_id: "DOC001".into(),
            date_issued: date(2025, 4, 12),
            items: vec![
                PrescriptionItem {
                    medication_id: "MED001".into(),
                    dosage: "500mg".into(),
                    quantity: 2,
                    price: 1.00,
                },
                PrescriptionItem {
                    medication_id: "MED002".into(),
                    dosage: "10mg".into(),
                    quantity: 1,
                    price: 0.35,
                },
            ],
            total: 1.35,
            notes: "Take as directed".into(),
            status: PrescriptionStatus::Completed,
            created_at: now,
        }],
        reports: vec![Report {
            id: "REP0015".into(),
            kind: "Inventory Status".into(),
            date_range: "Apr 1 - Apr 15, 2025".into(),
            generated_by: "John Doe".into(),
            format: "PDF".into(),
            filters: BTreeMap::new(),
            created_at: now,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_are_unique_per_collection() {
        let data = default_data();
        assert_eq!(data.medications.len(), 2);
        assert_ne!(data.medications[0].id, data.medications[1].id);
    }

    #[test]
    fn seed_prescription_keeps_its_stored_total() {
        // total is stored at issue time, never recomputed
        let data = default_data();
        assert_eq!(data.prescriptions[0].total, 1.35);
    }
}
