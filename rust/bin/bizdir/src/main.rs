//! `bizdir`: administration CLI for the company directory.
//!
//! Works directly against the storage named in the settings file, so it
//! can run while `bizdird` is stopped.

mod commands;
mod context;

use std::path::PathBuf;

use bizdir_core::Settings;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use context::Context;

/// Company directory administration.
#[derive(Parser, Debug)]
#[command(name = "bizdir", about = "Company directory administration")]
struct Cli {
    /// Settings file: a path, or a bare name under /etc/bizdir.
    #[arg(short = 'c', long = "config", global = true, default_value = "bizdir.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract embedded images from an xlsx workbook.
    #[command(name = "extract-images")]
    ExtractImages {
        /// Workbook to read.
        xlsx: PathBuf,
        #[arg(long, default_value = "extracted_logos")]
        output_dir: PathBuf,
    },

    /// Import companies and logos from an xlsx workbook.
    Import {
        /// Workbook to read.
        xlsx: PathBuf,
        /// Directory written by `extract-images`.
        #[arg(long, default_value = "extracted_logos")]
        logos_dir: PathBuf,
        /// Import rows without attaching logos.
        #[arg(long)]
        skip_logos: bool,
    },

    /// Copy accounts from the legacy user table.
    #[command(name = "migrate-users")]
    MigrateUsers,

    /// Create a superuser account.
    #[command(name = "create-superuser")]
    CreateSuperuser {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        /// Password (prompted for when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Grant a `resource:action` permission to a user or group.
    Grant {
        /// Username, or group name with --group.
        name: String,
        permission: String,
        #[arg(long)]
        group: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let load_settings = || -> anyhow::Result<Settings> {
        Ok(Settings::load_or_default(&Settings::resolve_path(&cli.config))?)
    };

    match cli.command {
        Commands::ExtractImages { xlsx, output_dir } => {
            commands::extract::run(&xlsx, &output_dir)?;
        }
        Commands::Import { xlsx, logos_dir, skip_logos } => {
            let ctx = Context::open(load_settings()?)?;
            commands::import::run(&ctx, &xlsx, &logos_dir, skip_logos)?;
        }
        Commands::MigrateUsers => {
            let ctx = Context::open(load_settings()?)?;
            commands::users::migrate(&ctx)?;
        }
        Commands::CreateSuperuser { username, email, password } => {
            let password = commands::users::read_password(password)?;
            let ctx = Context::open(load_settings()?)?;
            commands::users::create_superuser(&ctx, &username, &email, &password)?;
        }
        Commands::Grant { name, permission, group } => {
            let ctx = Context::open(load_settings()?)?;
            commands::users::grant(&ctx, &name, &permission, group)?;
        }
    }

    Ok(())
}
