//! Property schemas of the provider resources this crate emits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::{EndpointType, EngineName, MigrationType};

pub const REPLICATION_SUBNET_GROUP: &str = "AWS::DMS::ReplicationSubnetGroup";
pub const REPLICATION_INSTANCE: &str = "AWS::DMS::ReplicationInstance";
pub const ENDPOINT: &str = "AWS::DMS::Endpoint";
pub const REPLICATION_TASK: &str = "AWS::DMS::ReplicationTask";
pub const IAM_ROLE: &str = "AWS::IAM::Role";
pub const IAM_POLICY: &str = "AWS::IAM::Policy";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplicationSubnetGroupProperties {
    pub replication_subnet_group_identifier: String,
    pub replication_subnet_group_description: String,
    pub subnet_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplicationInstanceProperties {
    pub replication_instance_class: String,
    pub replication_subnet_group_identifier: String,
    pub replication_instance_identifier: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vpc_security_group_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocated_storage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publicly_accessible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EndpointProperties {
    pub endpoint_identifier: String,
    pub endpoint_type: EndpointType,
    pub engine_name: EngineName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_connection_attributes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_sql_settings: Option<SecretsManagerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_settings: Option<SecretsManagerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgre_sql_settings: Option<SecretsManagerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microsoft_sql_server_settings: Option<SecretsManagerSettings>,
}

impl EndpointProperties {
    /// Places `settings` in the engine's own settings block.
    pub fn with_engine_settings(mut self, settings: SecretsManagerSettings) -> Self {
        match self.engine_name {
            EngineName::Mysql => self.my_sql_settings = Some(settings),
            EngineName::Oracle => self.oracle_settings = Some(settings),
            EngineName::AuroraPostgresql | EngineName::Postgres => {
                self.postgre_sql_settings = Some(settings)
            }
            EngineName::Sqlserver => self.microsoft_sql_server_settings = Some(settings),
        }
        self
    }
}

/// Credentials DMS reads from Secrets Manager through an assumed role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretsManagerSettings {
    pub secrets_manager_access_role_arn: Value,
    pub secrets_manager_secret_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplicationTaskProperties {
    pub replication_instance_arn: Value,
    pub replication_task_identifier: String,
    pub migration_type: MigrationType,
    pub source_endpoint_arn: Value,
    pub target_endpoint_arn: Value,
    pub replication_task_settings: String,
    pub table_mappings: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleProperties {
    pub assume_role_policy_document: PolicyDocument,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyProperties {
    pub policy_name: String,
    pub policy_document: PolicyDocument,
    pub roles: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    pub fn new(statement: Vec<PolicyStatement>) -> Self {
        Self {
            version: "2012-10-17".to_string(),
            statement,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Value>,
    pub action: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

impl PolicyStatement {
    pub fn allow(actions: &[&str]) -> Self {
        Self {
            effect: "Allow".to_string(),
            principal: None,
            action: actions.iter().map(|a| a.to_string()).collect(),
            resource: None,
        }
    }
}
