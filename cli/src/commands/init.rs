use std::path::{Path, PathBuf};

use sparkify::{
    manifest::{
        cluster::{ClusterDetails, ClusterSslMode},
        core::{Dialect, Manifest},
        iam::IamRoleDetails,
        s3::S3Details,
        yaml::{write_manifest, YAML_CONFIG_NAME},
    },
    write_file, WriteFileError,
};

use crate::{
    console::{print_error_message, print_success_message, prompt_for_input_list},
    sparkify_yaml::sparkify_yaml_exists,
};

const ENV_EXAMPLE: &str = r#"DWH_HOST=dwhcluster.xxxxxxxxxxxx.us-west-2.redshift.amazonaws.com
DWH_USER=dwhuser
DWH_PASSWORD=
DWH_ROLE_ARN=arn:aws:iam::000000000000:role/dwhRole
"#;

fn template_manifest(dialect: Dialect) -> Manifest {
    let (s3, iam_role) = match dialect {
        Dialect::Redshift => (
            Some(S3Details {
                log_data: "s3://udacity-dend/log_data".to_string(),
                log_jsonpath: "s3://udacity-dend/log_json_path.json".to_string(),
                song_data: "s3://udacity-dend/song_data".to_string(),
                region: "us-west-2".to_string(),
            }),
            Some(IamRoleDetails { arn: "${DWH_ROLE_ARN}".to_string() }),
        ),
        Dialect::Postgres => (None, None),
    };

    Manifest {
        name: "sparkify".to_string(),
        description: Some("Sparkify song play analytics warehouse".to_string()),
        dialect,
        cluster: ClusterDetails {
            host: "${DWH_HOST}".to_string(),
            db_name: "dwh".to_string(),
            user: "${DWH_USER}".to_string(),
            password: "${DWH_PASSWORD}".to_string(),
            port: match dialect {
                Dialect::Redshift => 5439,
                Dialect::Postgres => 5432,
            },
            ssl_mode: ClusterSslMode::Prefer,
        },
        s3,
        iam_role,
    }
}

fn write_env_example(path: &Path) -> Result<(), WriteFileError> {
    write_file(&path.join(".env.example"), ENV_EXAMPLE)
}

fn write_gitignore(path: &Path) -> Result<(), WriteFileError> {
    write_file(&path.join(".gitignore"), ".env\n")
}

pub fn handle_init_command(project_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if sparkify_yaml_exists(&project_path) {
        let error = format!("{} already exists in {}", YAML_CONFIG_NAME, project_path.display());
        print_error_message(&error);
        return Err(error.into());
    }

    let dialect = prompt_for_input_list(
        "Which warehouse will you load into?",
        &["redshift".to_string(), "postgres".to_string()],
    )?;
    let dialect = if dialect == "postgres" { Dialect::Postgres } else { Dialect::Redshift };

    write_manifest(&template_manifest(dialect), &project_path.join(YAML_CONFIG_NAME)).map_err(
        |e| {
            print_error_message(&format!("Could not write {}: {}", YAML_CONFIG_NAME, e));
            e
        },
    )?;

    write_env_example(&project_path).map_err(|e| {
        print_error_message(&format!("Could not write .env.example: {}", e));
        e
    })?;

    write_gitignore(&project_path).map_err(|e| {
        print_error_message(&format!("Could not write .gitignore: {}", e));
        e
    })?;

    print_success_message(&format!(
        "Created {} in {}. Copy .env.example to .env and fill in the cluster details.",
        YAML_CONFIG_NAME,
        project_path.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_template_has_no_s3_section() {
        let manifest = template_manifest(Dialect::Postgres);

        assert!(manifest.s3.is_none());
        assert!(manifest.iam_role.is_none());
        assert_eq!(manifest.cluster.port, 5432);
    }

    #[test]
    fn test_redshift_template_reads_secrets_from_env() {
        let manifest = template_manifest(Dialect::Redshift);

        assert_eq!(manifest.cluster.port, 5439);
        assert_eq!(manifest.cluster.password, "${DWH_PASSWORD}");
        assert_eq!(manifest.iam_role.map(|r| r.arn), Some("${DWH_ROLE_ARN}".to_string()));
    }
}
