use std::path::PathBuf;

use sparkify::{manifest::yaml::YAML_CONFIG_NAME, start_create_tables, CreateTablesDetails};

use crate::{
    console::{print_error_message, print_success_message, print_warn_message},
    sparkify_yaml::validate_sparkify_yaml_exist,
};

pub async fn handle_create_tables_command(
    project_path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_sparkify_yaml_exist(&project_path)?;

    print_warn_message("Dropping and recreating every warehouse table, existing rows are lost.");

    start_create_tables(CreateTablesDetails { manifest_path: project_path.join(YAML_CONFIG_NAME) })
        .await
        .map_err(|e| {
            print_error_message(&format!("Could not create the tables: {}", e));
            e
        })?;

    print_success_message("Successfully created all tables.");

    Ok(())
}
