use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use splitwithme::{initialize_db, seed_if_empty};

/// A utility for creating a test database for the SplitWithMe REST API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'expenses.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Adding sample friends and expenses...");
    seed_if_empty(&conn)?;

    println!("Success!");

    Ok(())
}
