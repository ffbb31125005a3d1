use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::manifest::{cluster::ClusterDetails, iam::IamRoleDetails, s3::S3Details};

/// Which SQL flavour the DDL is rendered for.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Redshift,

    /// Plain PostgreSQL, used to exercise the schema and transforms locally. Bulk copies from S3
    /// are not available.
    Postgres,
}

impl Dialect {
    pub fn supports_s3_copy(&self) -> bool {
        matches!(self, Dialect::Redshift)
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Redshift => write!(f, "redshift"),
            Dialect::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Manifest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub dialect: Dialect,

    pub cluster: ClusterDetails,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Details>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_role: Option<IamRoleDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_defaults_to_redshift() {
        let yaml = r#"
          name: sparkify
          cluster:
            host: localhost
            db_name: dwh
            user: admin
            password: secret
        "#;

        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(manifest.dialect, Dialect::Redshift);
        assert!(manifest.s3.is_none());
        assert!(manifest.iam_role.is_none());
    }

    #[test]
    fn test_dialect_postgres() {
        let dialect: Dialect = serde_yaml::from_str("postgres").unwrap();

        assert_eq!(dialect, Dialect::Postgres);
        assert!(!dialect.supports_s3_copy());
        assert_eq!(dialect.to_string(), "postgres");
    }

    #[test]
    fn test_unknown_dialect_is_rejected() {
        let dialect: Result<Dialect, _> = serde_yaml::from_str("snowflake");

        assert!(dialect.is_err());
    }
}
