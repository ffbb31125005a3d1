use std::path::PathBuf;

use sparkify::{
    manifest::yaml::{read_manifest, YAML_CONFIG_NAME},
    plan_statements, EtlOptions, Stage,
};

use crate::{
    cli_interface::SqlSubcommands, console::print_error_message,
    sparkify_yaml::validate_sparkify_yaml_exist,
};

pub fn handle_sql_command(
    project_path: PathBuf,
    command: &SqlSubcommands,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_sparkify_yaml_exist(&project_path)?;

    let manifest = read_manifest(&project_path.join(YAML_CONFIG_NAME)).map_err(|e| {
        print_error_message(&format!("Could not read the {} file: {}", YAML_CONFIG_NAME, e));
        e
    })?;

    let (stage, options) = match command {
        SqlSubcommands::CreateTables => (Stage::CreateTables, EtlOptions::default()),
        SqlSubcommands::Etl { skip_staging_load } => (
            Stage::Etl,
            EtlOptions { skip_staging_load: *skip_staging_load, report_row_counts: false },
        ),
    };

    let statements = plan_statements(&manifest, stage, &options).map_err(|e| {
        print_error_message(&e.to_string());
        e
    })?;

    for statement in statements {
        println!("{}\n", statement);
    }

    Ok(())
}
