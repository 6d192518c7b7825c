use chrono::{DateTime, Utc};
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use pharmsys::config::PharmaConfig;
use pharmsys::error::{PharmaError, Result};
use pharmsys::model::{
    AccountStatus, Customer, Doctor, Medication, Prescription, PrescriptionStatus, Report,
    Supplier,
};
use pharmsys::records::RecordStore;
use pharmsys::session::SessionManager;
use pharmsys::store::fs::FileBlobStore;
use pharmsys::validate;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, CustomerCmd, DoctorCmd, MedCmd, PrescriptionCmd, SupplierCmd};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    records: RecordStore<FileBlobStore>,
    sessions: SessionManager<FileBlobStore>,
    config: PharmaConfig,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Med(cmd) => handle_med(&mut ctx, cmd),
        Commands::Customer(cmd) => handle_customer(&mut ctx, cmd),
        Commands::Doctor(cmd) => handle_doctor(&mut ctx, cmd),
        Commands::Supplier(cmd) => handle_supplier(&mut ctx, cmd),
        Commands::Prescription(cmd) => handle_prescription(&mut ctx, cmd),
        Commands::Reports => handle_reports(&ctx),
        Commands::Export { out } => handle_export(&ctx, out),
        Commands::Import { file } => handle_import(&mut ctx, file),
        Commands::Login { username, password } => handle_login(&mut ctx, &username, &password),
        Commands::Logout => handle_logout(&mut ctx),
        Commands::Whoami => handle_whoami(&ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("com", "pharmsys", "pharmsys")
            .ok_or_else(|| PharmaError::Storage("could not determine data directory".into()))?
            .data_dir()
            .to_path_buf(),
    };

    let config = PharmaConfig::load(&data_dir).unwrap_or_default();
    let records = RecordStore::open(FileBlobStore::new(data_dir.clone()));
    let sessions = SessionManager::new(FileBlobStore::new(data_dir));

    Ok(AppContext {
        records,
        sessions,
        config,
    })
}

fn handle_med(ctx: &mut AppContext, cmd: MedCmd) -> Result<()> {
    match cmd {
        MedCmd::List => print_rows(&ctx.records.get_all::<Medication>().iter().map(med_row).collect::<Vec<_>>()),
        MedCmd::Add {
            name,
            dosage,
            quantity,
            expires,
            price,
            supplier,
            category,
            min_stock,
            description,
        } => {
            if price < 0.0 {
                return Err(PharmaError::Invalid(format!(
                    "price must not be negative: {}",
                    price
                )));
            }
            let created = ctx.records.add(Medication {
                id: String::new(),
                name,
                dosage,
                quantity,
                expiration_date: expires,
                price,
                supplier,
                description,
                category,
                min_stock_level: min_stock,
                created_at: Utc::now(),
            });
            success(format!("Medication added: {}", created.id));
        }
        MedCmd::Update {
            id,
            name,
            dosage,
            quantity,
            expires,
            price,
            supplier,
            category,
            min_stock,
            description,
        } => {
            if let Some(price) = price {
                if price < 0.0 {
                    return Err(PharmaError::Invalid(format!(
                        "price must not be negative: {}",
                        price
                    )));
                }
            }
            let updated = ctx.records.update::<Medication, _>(&id, |m| {
                if let Some(v) = name {
                    m.name = v;
                }
                if let Some(v) = dosage {
                    m.dosage = v;
                }
                if let Some(v) = quantity {
                    m.quantity = v;
                }
                if let Some(v) = expires {
                    m.expiration_date = v;
                }
                if let Some(v) = price {
                    m.price = v;
                }
                if let Some(v) = supplier {
                    m.supplier = v;
                }
                if let Some(v) = category {
                    m.category = v;
                }
                if let Some(v) = min_stock {
                    m.min_stock_level = v;
                }
                if let Some(v) = description {
                    m.description = v;
                }
            })?;
            success(format!("Medication updated: {}", updated.id));
        }
        MedCmd::Delete { id } => {
            if ctx.records.delete::<Medication>(&id) {
                success(format!("Medication deleted: {}", id));
            } else {
                warning(format!("No medication with id {}", id));
            }
        }
        MedCmd::Search { query } => {
            print_rows(&ctx.records.search::<Medication>(&query).iter().map(med_row).collect::<Vec<_>>())
        }
        MedCmd::LowStock => {
            let low = ctx.records.low_stock();
            if low.is_empty() {
                info("No medications at or below their minimum stock level.");
            } else {
                print_rows(&low.iter().map(med_row).collect::<Vec<_>>());
            }
        }
        MedCmd::Expiring { days } => {
            let window = days.unwrap_or(ctx.config.expiring_window_days);
            let expiring = ctx.records.expiring(window);
            if expiring.is_empty() {
                info(format!("Nothing expires in the next {} days.", window));
            } else {
                print_rows(&expiring.iter().map(med_row).collect::<Vec<_>>());
            }
        }
    }
    Ok(())
}

fn handle_customer(ctx: &mut AppContext, cmd: CustomerCmd) -> Result<()> {
    match cmd {
        CustomerCmd::List => {
            print_rows(&ctx.records.get_all::<Customer>().iter().map(customer_row).collect::<Vec<_>>())
        }
        CustomerCmd::Add {
            first_name,
            last_name,
            phone,
            email,
            address,
        } => {
            warn_on_odd_contact(&email, &phone);
            let created = ctx.records.add(Customer {
                id: String::new(),
                first_name,
                last_name,
                phone,
                email,
                address,
                status: AccountStatus::Active,
                prescriptions: 0,
                created_at: Utc::now(),
            });
            success(format!("Customer added: {}", created.id));
        }
        CustomerCmd::Update {
            id,
            first_name,
            last_name,
            phone,
            email,
            address,
            status,
        } => {
            let updated = ctx.records.update::<Customer, _>(&id, |c| {
                if let Some(v) = first_name {
                    c.first_name = v;
                }
                if let Some(v) = last_name {
                    c.last_name = v;
                }
                if let Some(v) = phone {
                    c.phone = v;
                }
                if let Some(v) = email {
                    c.email = v;
                }
                if let Some(v) = address {
                    c.address = v;
                }
                if let Some(v) = status {
                    c.status = v;
                }
            })?;
            success(format!("Customer updated: {}", updated.id));
        }
        CustomerCmd::Delete { id } => {
            if ctx.records.delete::<Customer>(&id) {
                success(format!("Customer deleted: {}", id));
            } else {
                warning(format!("No customer with id {}", id));
            }
        }
        CustomerCmd::Search { query } => {
            print_rows(&ctx.records.search::<Customer>(&query).iter().map(customer_row).collect::<Vec<_>>())
        }
    }
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext, cmd: DoctorCmd) -> Result<()> {
    match cmd {
        DoctorCmd::List => {
            print_rows(&ctx.records.get_all::<Doctor>().iter().map(doctor_row).collect::<Vec<_>>())
        }
        DoctorCmd::Add {
            first_name,
            last_name,
            specialty,
            phone,
            email,
        } => {
            warn_on_odd_contact(&email, &phone);
            let created = ctx.records.add(Doctor {
                id: String::new(),
                first_name,
                last_name,
                specialty,
                phone,
                email,
                prescriptions: 0,
                created_at: Utc::now(),
            });
            success(format!("Doctor added: {}", created.id));
        }
        DoctorCmd::Delete { id } => {
            if ctx.records.delete::<Doctor>(&id) {
                success(format!("Doctor deleted: {}", id));
            } else {
                warning(format!("No doctor with id {}", id));
            }
        }
        DoctorCmd::Search { query } => {
            print_rows(&ctx.records.search::<Doctor>(&query).iter().map(doctor_row).collect::<Vec<_>>())
        }
    }
    Ok(())
}

fn handle_supplier(ctx: &mut AppContext, cmd: SupplierCmd) -> Result<()> {
    match cmd {
        SupplierCmd::List => {
            print_rows(&ctx.records.get_all::<Supplier>().iter().map(supplier_row).collect::<Vec<_>>())
        }
        SupplierCmd::Add {
            name,
            phone,
            email,
            address,
            website,
        } => {
            warn_on_odd_contact(&email, &phone);
            let created = ctx.records.add(Supplier {
                id: String::new(),
                name,
                phone,
                email,
                address,
                website,
                status: AccountStatus::Active,
                products: 0,
                created_at: Utc::now(),
            });
            success(format!("Supplier added: {}", created.id));
        }
        SupplierCmd::Delete { id } => {
            if ctx.records.delete::<Supplier>(&id) {
                success(format!("Supplier deleted: {}", id));
            } else {
                warning(format!("No supplier with id {}", id));
            }
        }
        SupplierCmd::Search { query } => {
            print_rows(&ctx.records.search::<Supplier>(&query).iter().map(supplier_row).collect::<Vec<_>>())
        }
    }
    Ok(())
}

fn handle_prescription(ctx: &mut AppContext, cmd: PrescriptionCmd) -> Result<()> {
    match cmd {
        PrescriptionCmd::List => {
            print_rows(&ctx.records.get_all::<Prescription>().iter().map(prescription_row).collect::<Vec<_>>())
        }
        PrescriptionCmd::Add {
            customer,
            doctor,
            date,
            items,
            notes,
        } => {
            // References are advisory, but a typo is worth flagging.
            if !ctx.records.get_all::<Customer>().iter().any(|c| c.id == customer) {
                warning(format!("Customer {} is not on file", customer));
            }
            if !ctx.records.get_all::<Doctor>().iter().any(|d| d.id == doctor) {
                warning(format!("Doctor {} is not on file", doctor));
            }
            let total = Prescription::items_total(&items);
            let created = ctx.records.add(Prescription {
                id: String::new(),
                customer_id: customer,
                doctor_id: doctor,
                date_issued: date,
                items,
                total,
                notes,
                status: PrescriptionStatus::Pending,
                created_at: Utc::now(),
            });
            success(format!(
                "Prescription added: {} (total ${:.2})",
                created.id, created.total
            ));
        }
        PrescriptionCmd::Status { id, status } => {
            let updated = ctx
                .records
                .update::<Prescription, _>(&id, |p| p.status = status)?;
            success(format!("Prescription {} is now {}", updated.id, updated.status));
        }
        PrescriptionCmd::Delete { id } => {
            if ctx.records.delete::<Prescription>(&id) {
                success(format!("Prescription deleted: {}", id));
            } else {
                warning(format!("No prescription with id {}", id));
            }
        }
        PrescriptionCmd::Search { query } => {
            print_rows(&ctx.records.search::<Prescription>(&query).iter().map(prescription_row).collect::<Vec<_>>())
        }
    }
    Ok(())
}

fn handle_reports(ctx: &AppContext) -> Result<()> {
    print_rows(&ctx.records.get_all::<Report>().iter().map(report_row).collect::<Vec<_>>());
    Ok(())
}

fn handle_export(ctx: &AppContext, out: Option<PathBuf>) -> Result<()> {
    let snapshot = ctx.records.export_snapshot()?;
    let path = out.unwrap_or_else(|| {
        PathBuf::from(format!(
            "pharmsys-{}.json",
            Utc::now().format("%Y-%m-%d_%H-%M-%S")
        ))
    });
    std::fs::write(&path, snapshot).map_err(PharmaError::Io)?;
    success(format!("Exported to {}", path.display()));
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&file).map_err(PharmaError::Io)?;
    ctx.records.import_snapshot(&text)?;
    success(format!("Imported {}", file.display()));
    Ok(())
}

fn handle_login(ctx: &mut AppContext, username: &str, password: &str) -> Result<()> {
    let session = ctx.sessions.login(username, password)?;
    success(format!("Logged in as {} ({})", session.name, session.role));
    Ok(())
}

fn handle_logout(ctx: &mut AppContext) -> Result<()> {
    ctx.sessions.logout();
    info("Logged out.");
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> Result<()> {
    match ctx.sessions.current() {
        Some(session) => {
            println!(
                "{} ({}) since {}",
                session.name.bold(),
                session.role,
                session.logged_in_at.format("%Y-%m-%d %H:%M")
            );
        }
        None => info("Not logged in."),
    }
    Ok(())
}

// --- Output formatting ---

const SUMMARY_WIDTH: usize = 52;
const STATUS_WIDTH: usize = 10;
const TIME_WIDTH: usize = 14;

struct Row {
    id: String,
    summary: String,
    status: Option<String>,
    created_at: DateTime<Utc>,
}

fn med_row(m: &Medication) -> Row {
    Row {
        id: m.id.clone(),
        summary: format!(
            "{} {} | qty {}/{} | exp {} | ${:.2}",
            m.name, m.dosage, m.quantity, m.min_stock_level, m.expiration_date, m.price
        ),
        status: (m.quantity <= m.min_stock_level).then(|| "low".to_string()),
        created_at: m.created_at,
    }
}

fn customer_row(c: &Customer) -> Row {
    Row {
        id: c.id.clone(),
        summary: format!("{} {} | {} | {}", c.first_name, c.last_name, c.phone, c.email),
        status: Some(c.status.to_string()),
        created_at: c.created_at,
    }
}

fn doctor_row(d: &Doctor) -> Row {
    Row {
        id: d.id.clone(),
        summary: format!("{} {} | {} | {}", d.first_name, d.last_name, d.specialty, d.email),
        status: None,
        created_at: d.created_at,
    }
}

fn supplier_row(s: &Supplier) -> Row {
    Row {
        id: s.id.clone(),
        summary: format!("{} | {} | {}", s.name, s.phone, s.email),
        status: Some(s.status.to_string()),
        created_at: s.created_at,
    }
}

fn prescription_row(p: &Prescription) -> Row {
    Row {
        id: p.id.clone(),
        summary: format!(
            "{} by {} | {} items | ${:.2} | issued {}",
            p.customer_id,
            p.doctor_id,
            p.items.len(),
            p.total,
            p.date_issued
        ),
        status: Some(p.status.to_string()),
        created_at: p.created_at,
    }
}

fn report_row(r: &Report) -> Row {
    Row {
        id: r.id.clone(),
        summary: format!("{} | {} | {} | by {}", r.kind, r.date_range, r.format, r.generated_by),
        status: None,
        created_at: r.created_at,
    }
}

fn print_rows(rows: &[Row]) {
    if rows.is_empty() {
        println!("No records found.");
        return;
    }

    let id_width = rows.iter().map(|r| r.id.width()).max().unwrap_or(0);

    for row in rows {
        let id = format!("{:<width$}", row.id, width = id_width);
        let summary = truncate_to_width(&row.summary, SUMMARY_WIDTH);
        let summary_pad = " ".repeat(SUMMARY_WIDTH.saturating_sub(summary.width()));
        let status = row.status.clone().unwrap_or_default();
        let status_padded = format!("{:<width$}", status, width = STATUS_WIDTH);

        println!(
            "{}  {}{}  {}{}",
            id.yellow(),
            summary,
            summary_pad,
            status_badge(&status, status_padded),
            format_time_ago(row.created_at).dimmed()
        );
    }
}

fn status_badge(status: &str, padded: String) -> ColoredString {
    match status {
        "active" | "completed" => padded.green(),
        "pending" => padded.yellow(),
        "cancelled" | "low" => padded.red(),
        "inactive" => padded.dimmed(),
        _ => padded.normal(),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

fn warn_on_odd_contact(email: &str, phone: &str) {
    if !validate::is_valid_email(email) {
        warning(format!("'{}' does not look like a valid email", email));
    }
    if !validate::is_valid_phone(phone) {
        warning(format!("'{}' does not look like a valid phone number", phone));
    }
}

fn success(message: impl AsRef<str>) {
    println!("{}", message.as_ref().green());
}

fn warning(message: impl AsRef<str>) {
    println!("{}", message.as_ref().yellow());
}

fn info(message: impl AsRef<str>) {
    println!("{}", message.as_ref().dimmed());
}
