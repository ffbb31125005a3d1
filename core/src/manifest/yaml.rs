use std::{
    env,
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use regex::{Captures, Regex};
use tracing::error;

use crate::{
    helpers::load_env_from_full_path,
    manifest::core::{Dialect, Manifest},
};

pub const YAML_CONFIG_NAME: &str = "sparkify.yaml";

const S3_URI_PREFIX: &str = "s3://";
const IAM_ROLE_ARN_PREFIX: &str = "arn:aws:iam::";

/// Replaces every `${NAME}` with the value of the environment variable `NAME`.
fn substitute_env_variables(contents: &str) -> Result<String, ReadManifestError> {
    let re = Regex::new(r"\$\{([^}]+)\}")?;
    let mut missing: Option<String> = None;

    let result = re.replace_all(contents, |caps: &Captures| {
        let var_name = &caps[1];
        match env::var(var_name) {
            Ok(val) => val,
            Err(_) => {
                error!("Environment variable {} not found", var_name);
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    if let Some(var_name) = missing {
        return Err(ReadManifestError::EnvironmentVariableNotFound(var_name));
    }

    Ok(result.into_owned())
}

fn extract_environment_path(contents: &str, file_path: &Path) -> Option<PathBuf> {
    let re = Regex::new(r"(?m)^environment_path:\s*(.+)$").ok()?;
    re.captures(contents).and_then(|cap| cap.get(1)).map(|m| {
        let path_str = m.as_str().trim().replace('\"', "");
        let base_dir = file_path.parent().unwrap_or(Path::new(""));
        let full_path = base_dir.join(path_str);
        full_path.canonicalize().unwrap_or(full_path)
    })
}

#[derive(thiserror::Error, Debug)]
pub enum ValidateManifestError {
    #[error("cluster.{0} can not be empty")]
    ClusterFieldEmpty(&'static str),

    #[error("cluster.port must be greater than 0")]
    InvalidClusterPort,

    #[error("The {0} dialect needs the `{1}` section to load the staging tables")]
    MissingSection(Dialect, &'static str),

    #[error("s3.{0} must be an s3:// uri but was '{1}'")]
    InvalidS3Uri(&'static str, String),

    #[error("s3.region can not be empty")]
    S3RegionEmpty,

    #[error("iam_role.arn must start with arn:aws:iam:: but was '{0}'")]
    InvalidIamRoleArn(String),
}

fn validate_manifest(manifest: &Manifest) -> Result<(), ValidateManifestError> {
    let cluster = &manifest.cluster;
    for (field, value) in [
        ("host", &cluster.host),
        ("db_name", &cluster.db_name),
        ("user", &cluster.user),
    ] {
        if value.trim().is_empty() {
            return Err(ValidateManifestError::ClusterFieldEmpty(field));
        }
    }

    if cluster.port == 0 {
        return Err(ValidateManifestError::InvalidClusterPort);
    }

    if manifest.dialect.supports_s3_copy() {
        if manifest.s3.is_none() {
            return Err(ValidateManifestError::MissingSection(manifest.dialect, "s3"));
        }
        if manifest.iam_role.is_none() {
            return Err(ValidateManifestError::MissingSection(manifest.dialect, "iam_role"));
        }
    }

    if let Some(s3) = &manifest.s3 {
        for (field, value) in [
            ("log_data", &s3.log_data),
            ("log_jsonpath", &s3.log_jsonpath),
            ("song_data", &s3.song_data),
        ] {
            if !value.starts_with(S3_URI_PREFIX) {
                return Err(ValidateManifestError::InvalidS3Uri(field, value.clone()));
            }
        }

        if s3.region.trim().is_empty() {
            return Err(ValidateManifestError::S3RegionEmpty);
        }
    }

    if let Some(iam_role) = &manifest.iam_role {
        if !iam_role.arn.starts_with(IAM_ROLE_ARN_PREFIX) {
            return Err(ValidateManifestError::InvalidIamRoleArn(iam_role.arn.clone()));
        }
    }

    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum ReadManifestError {
    #[error("Could not open file: {0}")]
    CouldNotOpenFile(#[from] std::io::Error),

    #[error("Could not parse manifest: {0}")]
    CouldNotParseManifest(#[from] serde_yaml::Error),

    #[error("Could not build the environment variable matcher: {0}")]
    InvalidEnvironmentVariableMatcher(#[from] regex::Error),

    #[error("Environment variable {0} not found")]
    EnvironmentVariableNotFound(String),

    #[error("Manifest is invalid: {0}")]
    InvalidManifest(#[from] ValidateManifestError),
}

pub fn read_manifest(file_path: &PathBuf) -> Result<Manifest, ReadManifestError> {
    let mut file = File::open(file_path)?;
    let mut contents = String::new();

    file.read_to_string(&mut contents)?;

    if let Some(path) = extract_environment_path(&contents, file_path) {
        load_env_from_full_path(&path);
    }

    let contents = substitute_env_variables(&contents)?;

    let manifest: Manifest = serde_yaml::from_str(&contents)?;

    validate_manifest(&manifest)?;

    Ok(manifest)
}

#[derive(thiserror::Error, Debug)]
pub enum WriteManifestError {
    #[error("Could not parse manifest to string: {0}")]
    CouldNotTurnManifestToString(serde_yaml::Error),

    #[error("Could not create file: {0}")]
    CouldNotCreateFile(std::io::Error),

    #[error("Could not write to file: {0}")]
    CouldNotWriteToFile(std::io::Error),
}

pub fn write_manifest(data: &Manifest, file_path: &PathBuf) -> Result<(), WriteManifestError> {
    let yaml_string =
        serde_yaml::to_string(data).map_err(WriteManifestError::CouldNotTurnManifestToString)?;

    let mut file = File::create(file_path).map_err(WriteManifestError::CouldNotCreateFile)?;
    file.write_all(yaml_string.as_bytes()).map_err(WriteManifestError::CouldNotWriteToFile)?;
    Ok(())
}
