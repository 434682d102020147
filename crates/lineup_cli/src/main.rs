//! Lineup CLI
//!
//! JSON ↔ roster file conversion, integrity checks and a text view of the board

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "lineup_cli")]
#[command(about = "Inspect and convert lineup roster files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build a roster file from JSON
    Import {
        /// Input JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output roster file path
        #[arg(long)]
        out: PathBuf,

        /// Owner key stored in the document
        #[arg(long)]
        owner: String,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Write the default starting lineup for a new owner
    Init {
        /// Output roster file path
        #[arg(long)]
        out: PathBuf,

        /// Owner key stored in the document
        #[arg(long)]
        owner: String,
    },

    /// Dump a roster file as JSON
    Export {
        /// Input roster file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output JSON file path
        #[arg(long)]
        out: PathBuf,
    },

    /// Print grouped lists and marker positions
    Show {
        /// Input roster file path
        #[arg(long)]
        r#in: PathBuf,

        /// vertical | horizontal
        #[arg(long, default_value = "vertical")]
        orientation: String,
    },

    /// Check checksum, decoding and document version
    Verify {
        /// Input roster file path
        #[arg(long)]
        r#in: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import { r#in, out, owner, metadata } => {
            println!("🔨 Importing roster...");
            println!("   Input:  {}", r#in.display());
            println!("   Output: {}", out.display());
            println!("   Owner:  {}", owner);

            let meta = lineup_cli::import_roster(&r#in, &out, &owner)?;
            print_metadata(&meta);

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &meta)?;
            }
        }

        Commands::Init { out, owner } => {
            println!("🔨 Writing starting lineup for {}...", owner);
            let meta = lineup_cli::init_roster(&out, &owner)?;
            print_metadata(&meta);
        }

        Commands::Export { r#in, out } => {
            println!("📤 Exporting roster...");
            let count = lineup_cli::export_roster(&r#in, &out)?;
            println!("✅ {} entries written to {}", count, out.display());
        }

        Commands::Show { r#in, orientation } => {
            let Some(orientation) = lineup_core::engine::Orientation::from_name(&orientation) else {
                anyhow::bail!("Unknown orientation '{}' (expected vertical or horizontal)", orientation);
            };
            let board = lineup_cli::load_board(&r#in, orientation)?;
            print!("{}", lineup_cli::render_board(&board));
        }

        Commands::Verify { r#in } => {
            println!("🔍 Verifying roster file...");
            let report = lineup_cli::verify_roster(&r#in)?;
            println!("✅ Roster verification passed");
            println!("   Owner:    {}", report.owner);
            println!("   Entries:  {}", report.entries);
            println!("   Version:  {}", report.version);
            println!("   Written:  {}", report.written_at);
            if report.needs_migration {
                println!("   ⚠️  Older document version; it will be migrated on next load");
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &lineup_cli::RosterMetadata) {
    println!("\n✅ Roster written successfully!");
    println!("   Entries:         {} ({} on field)", meta.entries, meta.on_field);
    println!("   Original size:   {} bytes", meta.original_size);
    println!("   Compressed size: {} bytes", meta.compressed_size);
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn save_metadata(path: &PathBuf, meta: &lineup_cli::RosterMetadata) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, metadata_json)?;
    println!("\n📄 Metadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("lineup_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
