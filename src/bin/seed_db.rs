use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use luka_points::initialize_db;

/// A utility for creating a database pre-populated with demo accounts for
/// the Luka Points API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// The demo accounts, matching the balances handed out in the pilot.
const DEMO_ACCOUNTS: [(&str, &str, &str, i64); 4] = [
    ("admin@luka.com", "Administrador Luka", "admin", 1500),
    ("empresa@luka.com", "Empresa Demo", "company", 1200),
    ("estudiante1@luka.com", "Estudiante 1", "student", 897),
    ("estudiante2@luka.com", "Estudiante 2", "student", 1250),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating demo accounts...");

    for (email, name, role, balance) in DEMO_ACCOUNTS {
        conn.execute(
            "INSERT INTO account (email, name, role, balance) VALUES (?1, ?2, ?3, ?4)",
            (email, name, role, balance),
        )?;
    }

    println!("Success!");

    Ok(())
}
