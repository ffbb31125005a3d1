use std::path::PathBuf;

use sparkify::{
    manifest::yaml::YAML_CONFIG_NAME, start_etl, EtlDetails, EtlOptions, EtlSummary,
};

use crate::{
    console::{print_error_message, print_success_message},
    sparkify_yaml::validate_sparkify_yaml_exist,
};

fn print_summary(summary: &EtlSummary) {
    for inserted in &summary.inserted {
        println!("  inserted {:>10} rows into {}", inserted.rows, inserted.table);
    }

    if let Some(counts) = &summary.row_counts {
        println!();
        for count in counts {
            println!("  {:<16} {:>10} rows", count.table.name(), count.rows);
        }
    }
}

pub async fn handle_etl_command(
    project_path: PathBuf,
    options: EtlOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_sparkify_yaml_exist(&project_path)?;

    let summary =
        start_etl(EtlDetails { manifest_path: project_path.join(YAML_CONFIG_NAME), options })
            .await
            .map_err(|e| {
                print_error_message(&format!("ETL failed: {}", e));
                e
            })?;

    print_success_message("Successfully loaded the warehouse.");
    print_summary(&summary);

    Ok(())
}
