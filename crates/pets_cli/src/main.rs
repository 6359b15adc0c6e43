//! `pets` command line front end.
//!
//! # Responsibility
//! - Stand in for the list and editor screens on top of `pets_core`.
//! - Keep output deterministic for scripting.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::debug;
use pets_core::{
    init_logging, Gender, PetForm, PetProvider, PetRepository, PetService, PetUri, SaveOutcome,
    StoreConfig,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about = "Track pets in a local SQLite store", long_about = None)]
struct Cli {
    /// Database file.
    #[arg(long, env = "PETS_DB", default_value = "Pets.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "PETS_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[arg(long, env = "PETS_LOG_LEVEL", default_value_t = pets_core::default_log_level().to_string())]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all pets
    List {
        /// Print full records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one pet
    Show { id: i64 },
    /// Add a new pet
    Add(PetArgs),
    /// Replace every field of an existing pet
    Edit {
        id: i64,
        #[command(flatten)]
        pet: PetArgs,
    },
    /// Delete one pet
    Delete { id: i64 },
    /// Delete every pet
    DeleteAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Print the resource type of an identifier
    Type { identifier: String },
}

#[derive(Args)]
struct PetArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    breed: String,
    /// Whole kilograms; empty means 0
    #[arg(long, default_value = "")]
    weight: String,
    /// unknown, male or female
    #[arg(long, default_value = "unknown")]
    gender: Gender,
}

impl From<PetArgs> for PetForm {
    fn from(args: PetArgs) -> Self {
        PetForm {
            name: args.name,
            breed: args.breed,
            weight: args.weight,
            gender: args.gender,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(&cli.log_level, log_dir).context("failed to initialize logging")?;
    }

    let provider = PetProvider::new(StoreConfig::file(&cli.db));
    let service = PetService::new(&provider);
    debug!("event=cli_command module=cli status=start db={}", cli.db.display());

    match cli.command {
        Commands::List { json } => {
            if json {
                let pets = service.list_pets()?;
                println!("{}", serde_json::to_string_pretty(&pets)?);
            } else {
                for summary in service.list_summaries()? {
                    let id = summary.uri.parse_id().unwrap_or_default();
                    println!("{id}\t{}\t{}", summary.name, summary.summary);
                }
            }
        }
        Commands::Show { id } => match service.load_pet(&PetUri::item(id))? {
            Some(pet) => {
                println!("id: {}", pet.id);
                println!("name: {}", pet.name);
                println!("breed: {}", pet.breed_or_unknown());
                println!("gender: {}", pet.gender);
                println!("weight: {}", pet.weight);
            }
            None => bail!("no pet with id {id}"),
        },
        Commands::Add(args) => match service.save_pet(None, &args.into())? {
            SaveOutcome::Inserted(uri) => println!("Pet saved: {uri}"),
            SaveOutcome::Skipped => println!("Nothing to save."),
            SaveOutcome::InsertFailed => bail!("error with saving pet"),
            other => bail!("unexpected add outcome: {other:?}"),
        },
        Commands::Edit { id, pet } => {
            let uri = PetUri::item(id);
            match service.save_pet(Some(&uri), &pet.into())? {
                SaveOutcome::Updated(0) => bail!("no pet with id {id}"),
                SaveOutcome::Updated(_) => println!("Pet updated: {uri}"),
                other => bail!("unexpected edit outcome: {other:?}"),
            }
        }
        Commands::Delete { id } => {
            if service.delete_pet(&PetUri::item(id))? == 0 {
                bail!("no pet with id {id}");
            }
            println!("Pet deleted.");
        }
        Commands::DeleteAll { yes } => {
            if !yes {
                bail!("refusing to delete every pet without --yes");
            }
            let deleted = service.delete_all_pets()?;
            println!("Deleted {deleted} pet(s).");
        }
        Commands::Type { identifier } => {
            println!("{}", provider.resource_type(&PetUri::new(identifier))?);
        }
    }

    Ok(())
}
