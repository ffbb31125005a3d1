use serde::{Deserialize, Serialize};
use tokio_postgres::Config;

fn default_port() -> u16 {
    5439
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSslMode {
    Disable,

    /// Try TLS first and fall back to a plain connection if the handshake fails.
    #[default]
    Prefer,

    Require,
}

/// Connection details for the warehouse cluster.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClusterDetails {
    pub host: String,

    pub db_name: String,

    pub user: String,

    pub password: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub ssl_mode: ClusterSslMode,
}

impl ClusterDetails {
    pub fn to_config(&self) -> Config {
        let mut config = Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.db_name)
            .user(&self.user)
            .password(&self.password)
            .application_name("sparkify");
        config
    }

    /// `host:port/db_name`, safe to log.
    pub fn target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.db_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_defaults() {
        let yaml = r#"
          host: example.redshift.amazonaws.com
          db_name: dwh
          user: dwhuser
          password: Passw0rd
        "#;

        let cluster: ClusterDetails = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cluster.port, 5439);
        assert_eq!(cluster.ssl_mode, ClusterSslMode::Prefer);
        assert_eq!(cluster.target(), "example.redshift.amazonaws.com:5439/dwh");
    }

    #[test]
    fn test_cluster_to_config() {
        let yaml = r#"
          host: localhost
          db_name: sparkify
          user: postgres
          password: postgres
          port: 5432
          ssl_mode: disable
        "#;

        let cluster: ClusterDetails = serde_yaml::from_str(yaml).unwrap();
        let config = cluster.to_config();

        assert_eq!(config.get_ports(), &[5432]);
        assert_eq!(config.get_dbname(), Some("sparkify"));
        assert_eq!(config.get_user(), Some("postgres"));
        assert_eq!(config.get_password(), Some("postgres".as_bytes()));
        assert_eq!(cluster.ssl_mode, ClusterSslMode::Disable);
    }
}
