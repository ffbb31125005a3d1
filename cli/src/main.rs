use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use sparkify::{load_env_from_project_path, setup_debug_logger, setup_info_logger, EtlOptions};

use crate::{
    cli_interface::{Commands, CLI},
    commands::{
        create_tables::handle_create_tables_command, etl::handle_etl_command,
        init::handle_init_command, sql::handle_sql_command,
    },
    console::print_error_message,
};

mod cli_interface;
mod commands;
mod console;
mod sparkify_yaml;

fn resolve_path(override_path: &Option<String>) -> Result<PathBuf, String> {
    match override_path {
        Some(path) => {
            let path = PathBuf::from_str(path).map_err(|_| "Invalid path provided.".to_string())?;
            Ok(path)
        }
        None => {
            Ok(std::env::current_dir().map_err(|_| "Failed to get current directory.".to_string())?)
        }
    }
}

fn resolve_project_path(override_path: &Option<String>) -> Result<PathBuf, String> {
    let resolved_path = resolve_path(override_path).map_err(|e| {
        print_error_message(&e);
        e
    })?;
    load_env_from_project_path(&resolved_path);
    Ok(resolved_path)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CLI::parse();

    if cli.verbose {
        setup_debug_logger();
    } else {
        setup_info_logger();
    }

    match &cli.command {
        Commands::Init { path } => {
            let resolved_path = resolve_project_path(path)?;
            handle_init_command(resolved_path)
        }
        Commands::CreateTables { path } => {
            let resolved_path = resolve_project_path(path)?;
            handle_create_tables_command(resolved_path).await
        }
        Commands::Etl { skip_staging_load, no_report, path } => {
            let resolved_path = resolve_project_path(path)?;
            let options = EtlOptions {
                skip_staging_load: *skip_staging_load,
                report_row_counts: !*no_report,
            };
            handle_etl_command(resolved_path, options).await
        }
        Commands::Sql { subcommand, path } => {
            let resolved_path = resolve_project_path(path)?;
            handle_sql_command(resolved_path, subcommand)
        }
    }
}
