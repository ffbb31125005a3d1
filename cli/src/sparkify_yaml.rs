use std::path::Path;

use sparkify::manifest::yaml::YAML_CONFIG_NAME;

use crate::console::print_error_message;

pub fn sparkify_yaml_exists(project_path: &Path) -> bool {
    project_path.join(YAML_CONFIG_NAME).is_file()
}

pub fn validate_sparkify_yaml_exist(project_path: &Path) -> Result<(), String> {
    if sparkify_yaml_exists(project_path) {
        return Ok(());
    }

    let error = format!(
        "{} does not exist in {}. Please use sparkify init to create one.",
        YAML_CONFIG_NAME,
        project_path.display()
    );
    print_error_message(&error);
    Err(error)
}
