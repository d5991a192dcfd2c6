use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database engines DMS can connect an endpoint to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineName {
    #[default]
    Mysql,
    Oracle,
    AuroraPostgresql,
    Sqlserver,
    Postgres,
}

impl EngineName {
    pub const ALL: [EngineName; 5] = [
        Self::Mysql,
        Self::Oracle,
        Self::AuroraPostgresql,
        Self::Sqlserver,
        Self::Postgres,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Oracle => "oracle",
            Self::AuroraPostgresql => "aurora-postgresql",
            Self::Sqlserver => "sqlserver",
            Self::Postgres => "postgres",
        }
    }

    /// Prefix used when deriving an endpoint's construct path.
    pub fn construct_prefix(&self) -> &'static str {
        match self {
            Self::Postgres => "postgresql",
            other => other.as_str(),
        }
    }

    /// Name of the engine-specific settings block on `AWS::DMS::Endpoint`.
    pub fn settings_key(&self) -> &'static str {
        match self {
            Self::Mysql => "MySqlSettings",
            Self::Oracle => "OracleSettings",
            Self::AuroraPostgresql | Self::Postgres => "PostgreSqlSettings",
            Self::Sqlserver => "MicrosoftSqlServerSettings",
        }
    }

    /// Whether endpoints for this engine are bound to a database name.
    pub fn requires_database_name(&self) -> bool {
        !matches!(self, Self::Mysql)
    }

    pub fn extra_connection_attributes(&self, endpoint_type: EndpointType) -> Option<&'static str> {
        match (self, endpoint_type) {
            (Self::Mysql, EndpointType::Source) => Some("parallelLoadThreads=1"),
            (Self::Mysql, EndpointType::Target) => Some("parallelLoadThreads=1 maxFileSize=512"),
            (Self::Oracle, EndpointType::Source) => Some("addSupplementalLogging=true"),
            (Self::Oracle, EndpointType::Target) => Some(
                "useLogMinerReader=N;useBfile=Y;failTasksOnLobTruncation=true;numberDataTypeScale=-2",
            ),
            (Self::AuroraPostgresql | Self::Postgres, EndpointType::Source) => {
                Some("heartbeatFrequency=5")
            }
            (Self::AuroraPostgresql | Self::Postgres, EndpointType::Target) => {
                Some("executeTimeout=180")
            }
            (Self::Sqlserver, _) => None,
        }
    }
}

impl fmt::Display for EngineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EngineName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|engine| engine.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<_> = Self::ALL.iter().map(|e| e.as_str()).collect();
                format!("unknown engine '{s}' (allowed: {})", allowed.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    Source,
    Target,
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MigrationType {
    Cdc,
    #[default]
    FullLoad,
    FullLoadAndCdc,
}

impl fmt::Display for MigrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cdc => write!(f, "cdc"),
            Self::FullLoad => write!(f, "full-load"),
            Self::FullLoadAndCdc => write!(f, "full-load-and-cdc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_names_round_trip_through_serde() {
        let parsed: EngineName = serde_json::from_str("\"aurora-postgresql\"").unwrap();
        assert_eq!(parsed, EngineName::AuroraPostgresql);
        assert_eq!(
            serde_json::to_string(&EngineName::Sqlserver).unwrap(),
            "\"sqlserver\""
        );
    }

    #[test]
    fn from_str_rejects_unknown_engine() {
        assert_eq!("oracle".parse::<EngineName>(), Ok(EngineName::Oracle));
        let err = "db2".parse::<EngineName>().unwrap_err();
        assert!(err.contains("db2"));
        assert!(err.contains("aurora-postgresql"));
    }

    #[test]
    fn sqlserver_has_no_extra_connection_attributes() {
        assert_eq!(
            EngineName::Sqlserver.extra_connection_attributes(EndpointType::Source),
            None
        );
        assert_eq!(
            EngineName::Postgres.extra_connection_attributes(EndpointType::Target),
            Some("executeTimeout=180")
        );
    }

    #[test]
    fn postgres_family_shares_settings_key() {
        assert_eq!(EngineName::Postgres.settings_key(), "PostgreSqlSettings");
        assert_eq!(EngineName::AuroraPostgresql.settings_key(), "PostgreSqlSettings");
        assert_eq!(EngineName::Postgres.construct_prefix(), "postgresql");
    }

    #[test]
    fn migration_type_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&MigrationType::FullLoadAndCdc).unwrap(),
            "\"full-load-and-cdc\""
        );
        assert_eq!(MigrationType::default().to_string(), "full-load");
    }
}
