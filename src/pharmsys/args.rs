use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pharmsys::model::{AccountStatus, PrescriptionItem, PrescriptionStatus};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pharmsys")]
#[command(about = "Pharmacy record management on local storage", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage medications
    #[command(subcommand, alias = "m")]
    Med(MedCmd),

    /// Manage customers
    #[command(subcommand, alias = "c")]
    Customer(CustomerCmd),

    /// Manage doctors
    #[command(subcommand, alias = "d")]
    Doctor(DoctorCmd),

    /// Manage suppliers
    #[command(subcommand, alias = "s")]
    Supplier(SupplierCmd),

    /// Manage prescriptions
    #[command(subcommand, alias = "rx")]
    Prescription(PrescriptionCmd),

    /// List generated reports
    Reports,

    /// Write a JSON snapshot of every collection to a file
    Export {
        /// Output file (defaults to pharmsys-<timestamp>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the store with a snapshot file. Collections missing from
    /// the snapshot are reset to their defaults.
    Import { file: PathBuf },

    /// Start a demo session
    Login {
        username: String,

        #[arg(long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the current session
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum MedCmd {
    /// List all medications
    #[command(alias = "ls")]
    List,

    /// Add a medication
    Add {
        name: String,

        #[arg(long)]
        dosage: String,

        #[arg(long)]
        quantity: u32,

        /// Expiration date (YYYY-MM-DD)
        #[arg(long)]
        expires: NaiveDate,

        /// Unit price
        #[arg(long)]
        price: f64,

        #[arg(long)]
        supplier: String,

        #[arg(long)]
        category: String,

        /// Reorder point: stock at or below this level counts as low
        #[arg(long)]
        min_stock: u32,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Update fields of a medication
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        dosage: Option<String>,

        #[arg(long)]
        quantity: Option<u32>,

        /// Expiration date (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<NaiveDate>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        supplier: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        min_stock: Option<u32>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a medication
    #[command(alias = "rm")]
    Delete { id: String },

    /// Search medications by name, category, or supplier
    Search { query: String },

    /// Medications at or below their minimum stock level
    LowStock,

    /// Medications expiring soon
    Expiring {
        /// Window in days (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCmd {
    /// List all customers
    #[command(alias = "ls")]
    List,

    /// Add a customer
    Add {
        first_name: String,
        last_name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        address: String,
    },

    /// Update fields of a customer
    Update {
        id: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// active or inactive
        #[arg(long)]
        status: Option<AccountStatus>,
    },

    /// Delete a customer
    #[command(alias = "rm")]
    Delete { id: String },

    /// Search customers by name, email, or phone
    Search { query: String },
}

#[derive(Subcommand, Debug)]
pub enum DoctorCmd {
    /// List all doctors
    #[command(alias = "ls")]
    List,

    /// Add a doctor
    Add {
        first_name: String,
        last_name: String,

        #[arg(long)]
        specialty: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,
    },

    /// Delete a doctor
    #[command(alias = "rm")]
    Delete { id: String },

    /// Search doctors by name, specialty, or email
    Search { query: String },
}

#[derive(Subcommand, Debug)]
pub enum SupplierCmd {
    /// List all suppliers
    #[command(alias = "ls")]
    List,

    /// Add a supplier
    Add {
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        address: String,

        #[arg(long, default_value = "")]
        website: String,
    },

    /// Delete a supplier
    #[command(alias = "rm")]
    Delete { id: String },

    /// Search suppliers by name, email, or phone
    Search { query: String },
}

#[derive(Subcommand, Debug)]
pub enum PrescriptionCmd {
    /// List all prescriptions
    #[command(alias = "ls")]
    List,

    /// Add a prescription. The total is computed from the items once, at
    /// issue time.
    Add {
        /// Customer id
        #[arg(long)]
        customer: String,

        /// Doctor id
        #[arg(long)]
        doctor: String,

        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Line item as MEDICATION_ID:DOSAGE:QUANTITY:PRICE (repeatable)
        #[arg(long = "item", required = true)]
        items: Vec<PrescriptionItem>,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Set the status of a prescription
    Status {
        id: String,

        /// pending, completed, or cancelled
        status: PrescriptionStatus,
    },

    /// Delete a prescription
    #[command(alias = "rm")]
    Delete { id: String },

    /// Search prescriptions by id, customer, doctor, status, or notes
    Search { query: String },
}
