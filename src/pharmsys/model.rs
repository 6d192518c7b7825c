use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PharmaError;

/// The named record sets the store owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Medications,
    Customers,
    Doctors,
    Suppliers,
    Prescriptions,
    Reports,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Medications => "medications",
            Collection::Customers => "customers",
            Collection::Doctors => "doctors",
            Collection::Suppliers => "suppliers",
            Collection::Prescriptions => "prescriptions",
            Collection::Reports => "reports",
        }
    }

    /// Type code prepended to every generated id in this collection.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Collection::Medications => "MED",
            Collection::Customers => "CUST",
            Collection::Doctors => "DOC",
            Collection::Suppliers => "SUPP",
            Collection::Prescriptions => "PRE",
            Collection::Reports => "REP",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All six collections, persisted and snapshotted as one JSON document.
///
/// Field names stay camelCase on the wire for compatibility with snapshots
/// produced by earlier versions of the product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    pub medications: Vec<Medication>,
    pub customers: Vec<Customer>,
    pub doctors: Vec<Doctor>,
    pub suppliers: Vec<Supplier>,
    pub prescriptions: Vec<Prescription>,
    pub reports: Vec<Report>,
}

/// Ties a record type to its collection inside [`StoreData`].
///
/// The store is generic over this trait, so one set of CRUD operations
/// serves every collection. `matches` implements the fixed per-collection
/// search fields; the needle it receives is already lowercased.
pub trait Document: Clone + Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn records(data: &StoreData) -> &Vec<Self>;
    fn records_mut(data: &mut StoreData) -> &mut Vec<Self>;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;

    /// Set the identity fields. Only the store calls this: once on `add`,
    /// and on `update` to restore id and created_at after a patch.
    fn assign(&mut self, id: String, created_at: DateTime<Utc>);

    fn matches(&self, needle: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountStatus::Active => f.write_str("active"),
            AccountStatus::Inactive => f.write_str("inactive"),
        }
    }
}

impl FromStr for AccountStatus {
    type Err = PharmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            other => Err(PharmaError::Invalid(format!(
                "unknown status '{}', expected active or inactive",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrescriptionStatus::Pending => f.write_str("pending"),
            PrescriptionStatus::Completed => f.write_str("completed"),
            PrescriptionStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl FromStr for PrescriptionStatus {
    type Err = PharmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PrescriptionStatus::Pending),
            "completed" => Ok(PrescriptionStatus::Completed),
            "cancelled" => Ok(PrescriptionStatus::Cancelled),
            other => Err(PharmaError::Invalid(format!(
                "unknown prescription status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub quantity: u32,
    pub expiration_date: NaiveDate,
    pub price: f64,
    pub supplier: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub min_stock_level: u32,
    pub created_at: DateTime<Utc>,
}

impl Document for Medication {
    const COLLECTION: Collection = Collection::Medications;

    fn records(data: &StoreData) -> &Vec<Self> {
        &data.medications
    }

    fn records_mut(data: &mut StoreData) -> &mut Vec<Self> {
        &mut data.medications
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assign(&mut self, id: String, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
            || self.supplier.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub status: AccountStatus,
    /// Running count of prescriptions filled for this customer.
    #[serde(default)]
    pub prescriptions: u32,
    pub created_at: DateTime<Utc>,
}

impl Document for Customer {
    const COLLECTION: Collection = Collection::Customers;

    fn records(data: &StoreData) -> &Vec<Self> {
        &data.customers
    }

    fn records_mut(data: &mut StoreData) -> &mut Vec<Self> {
        &mut data.customers
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assign(&mut self, id: String, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn matches(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.phone.contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub prescriptions: u32,
    pub created_at: DateTime<Utc>,
}

impl Document for Doctor {
    const COLLECTION: Collection = Collection::Doctors;

    fn records(data: &StoreData) -> &Vec<Self> {
        &data.doctors
    }

    fn records_mut(data: &mut StoreData) -> &mut Vec<Self> {
        &mut data.doctors
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assign(&mut self, id: String, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn matches(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
            || self.specialty.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub status: AccountStatus,
    /// Number of distinct products sourced from this supplier.
    #[serde(default)]
    pub products: u32,
    pub created_at: DateTime<Utc>,
}

impl Document for Supplier {
    const COLLECTION: Collection = Collection::Suppliers;

    fn records(data: &StoreData) -> &Vec<Self> {
        &data.suppliers
    }

    fn records_mut(data: &mut StoreData) -> &mut Vec<Self> {
        &mut data.suppliers
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assign(&mut self, id: String, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.phone.contains(needle)
    }
}

/// One line item on a prescription. The medication reference is advisory;
/// nothing checks that the id still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionItem {
    pub medication_id: String,
    pub dosage: String,
    pub quantity: u32,
    pub price: f64,
}

impl PrescriptionItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Parses the CLI item spec `MEDICATION_ID:DOSAGE:QUANTITY:PRICE`,
/// e.g. `MED001:500mg:2:0.50`.
impl FromStr for PrescriptionItem {
    type Err = PharmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [medication_id, dosage, quantity, price] = parts.as_slice() else {
            return Err(PharmaError::Invalid(format!(
                "bad item spec '{}', expected MEDICATION_ID:DOSAGE:QUANTITY:PRICE",
                s
            )));
        };
        let quantity: u32 = quantity
            .parse()
            .map_err(|_| PharmaError::Invalid(format!("bad item quantity '{}'", quantity)))?;
        let price: f64 = price
            .parse()
            .map_err(|_| PharmaError::Invalid(format!("bad item price '{}'", price)))?;
        if price < 0.0 {
            return Err(PharmaError::Invalid(format!(
                "item price must not be negative: {}",
                price
            )));
        }
        Ok(Self {
            medication_id: medication_id.to_string(),
            dosage: dosage.to_string(),
            quantity,
            price,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    #[serde(default)]
    pub id: String,
    pub customer_id: String,
    pub doctor_id: String,
    pub date_issued: NaiveDate,
    #[serde(rename = "medications")]
    pub items: Vec<PrescriptionItem>,
    /// Sum of the line totals at issue time. Stored, not recomputed when
    /// items change afterwards.
    pub total: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: PrescriptionStatus,
    pub created_at: DateTime<Utc>,
}

impl Prescription {
    pub fn items_total(items: &[PrescriptionItem]) -> f64 {
        items.iter().map(PrescriptionItem::line_total).sum()
    }
}

impl Document for Prescription {
    const COLLECTION: Collection = Collection::Prescriptions;

    fn records(data: &StoreData) -> &Vec<Self> {
        &data.prescriptions
    }

    fn records_mut(data: &mut StoreData) -> &mut Vec<Self> {
        &mut data.prescriptions
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assign(&mut self, id: String, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn matches(&self, needle: &str) -> bool {
        self.id.to_lowercase().contains(needle)
            || self.customer_id.to_lowercase().contains(needle)
            || self.doctor_id.to_lowercase().contains(needle)
            || self.status.to_string().contains(needle)
            || self.notes.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date_range: String,
    pub generated_by: String,
    pub format: String,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

impl Document for Report {
    const COLLECTION: Collection = Collection::Reports;

    fn records(data: &StoreData) -> &Vec<Self> {
        &data.reports
    }

    fn records_mut(data: &mut StoreData) -> &mut Vec<Self> {
        &mut data.reports
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assign(&mut self, id: String, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn matches(&self, needle: &str) -> bool {
        self.kind.to_lowercase().contains(needle)
            || self.generated_by.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_spec() {
        let item: PrescriptionItem = "MED001:500mg:2:0.50".parse().unwrap();
        assert_eq!(item.medication_id, "MED001");
        assert_eq!(item.dosage, "500mg");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, 0.50);
        assert_eq!(item.line_total(), 1.0);
    }

    #[test]
    fn rejects_malformed_item_specs() {
        assert!("MED001:500mg:2".parse::<PrescriptionItem>().is_err());
        assert!("MED001:500mg:two:0.50".parse::<PrescriptionItem>().is_err());
        assert!("MED001:500mg:2:-1.0".parse::<PrescriptionItem>().is_err());
    }

    #[test]
    fn statuses_round_trip_through_strings() {
        assert_eq!(
            "Active".parse::<AccountStatus>().unwrap(),
            AccountStatus::Active
        );
        assert_eq!(
            "completed".parse::<PrescriptionStatus>().unwrap(),
            PrescriptionStatus::Completed
        );
        assert!("done".parse::<PrescriptionStatus>().is_err());
    }

    #[test]
    fn medication_uses_camel_case_on_the_wire() {
        let med = Medication {
            id: "MED001".into(),
            name: "Amoxicillin".into(),
            dosage: "500mg".into(),
            quantity: 100,
            expiration_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            price: 0.50,
            supplier: "PharmaCorp Inc.".into(),
            description: String::new(),
            category: "Antibiotics".into(),
            min_stock_level: 50,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&med).unwrap();
        assert!(json.contains("\"expirationDate\""));
        assert!(json.contains("\"minStockLevel\""));
        assert!(json.contains("\"createdAt\""));
    }
}
