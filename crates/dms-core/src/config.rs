use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::engine::{EngineName, MigrationType};
use crate::error::{DmsError, DmsResult};
use crate::mapping::{generate_table_mappings, TableDescriptor, TableMappings};
use crate::settings::TaskSettings;
use crate::template;

/// Context file: one [`ContextConfig`] per environment name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextFile {
    pub environments: BTreeMap<String, ContextConfig>,
}

impl ContextFile {
    pub fn from_file(path: &Path) -> DmsResult<Self> {
        read_document(path)
    }

    /// Picks one environment and stamps its name onto the config.
    pub fn into_environment(mut self, environment: &str) -> DmsResult<ContextConfig> {
        let mut context = self.environments.remove(environment).ok_or_else(|| {
            let known: Vec<_> = self.environments.keys().map(String::as_str).collect();
            DmsError::Config(format!(
                "Environment '{environment}' not found (available: {})",
                known.join(", ")
            ))
        })?;
        context.environment = environment.to_string();
        Ok(context)
    }
}

/// Everything needed to synthesize one environment's DMS stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextConfig {
    /// Set from the selected environment key.
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub account: Option<String>,
    /// Unresolved regions are left to the deployment (`AWS::Region`).
    #[serde(default)]
    pub region: Option<String>,
    /// Informational; the VPC itself is not managed here.
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub vpc_security_group_ids: Vec<String>,
    #[serde(default)]
    pub replication_instance_class: Option<String>,
    #[serde(default)]
    pub replication_instance_identifier: String,
    #[serde(default)]
    pub replication_subnet_group_identifier: String,
    #[serde(default)]
    pub publicly_accessible: Option<bool>,
    #[serde(default)]
    pub engine_version: Option<String>,
    #[serde(default)]
    pub allocated_storage: Option<u32>,
    /// Default migration type for tasks that do not set one.
    #[serde(default)]
    pub migration_type: Option<MigrationType>,
    /// Task settings shared by every task, merged over the built-in defaults.
    #[serde(default)]
    pub replication_task_settings: Option<TaskSettings>,
    #[serde(default, alias = "schemas")]
    pub tasks: Vec<TaskConfig>,
}

impl ContextConfig {
    /// Loads `path` and selects `environment` from it.
    pub fn load(path: &Path, environment: &str) -> DmsResult<Self> {
        let context = ContextFile::from_file(path)?.into_environment(environment)?;
        tracing::info!(
            environment,
            tasks = context.tasks.len(),
            path = %path.display(),
            "Loaded context"
        );
        Ok(context)
    }

    pub fn task(&self, name: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Task settings for `task` after layering defaults, context and task overrides.
    pub fn resolved_task_settings(&self, task: Option<&TaskConfig>) -> TaskSettings {
        TaskSettings::resolve([
            self.replication_task_settings.as_ref(),
            task.and_then(|t| t.replication_task_settings.as_ref()),
        ])
    }

    /// Checks everything the template needs to deploy, collecting every problem.
    pub fn validate(&self) -> DmsResult<()> {
        let mut errors = Vec::new();

        if self.subnet_ids.is_empty() {
            errors.push("subnetIds must list at least one subnet".to_string());
        }
        if self.replication_instance_identifier.trim().is_empty() {
            errors.push("replicationInstanceIdentifier is required".to_string());
        }
        if self.replication_subnet_group_identifier.trim().is_empty() {
            errors.push("replicationSubnetGroupIdentifier is required".to_string());
        }

        let mut names = HashSet::new();
        for task in &self.tasks {
            if !names.insert(template::logical_id(&task.endpoint_name())) {
                errors.push(format!("task '{}' is duplicated", task.name));
            }
            task.collect_errors(&mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DmsError::Validation(errors))
        }
    }
}

/// One migration unit: a source, a target, and the task between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    pub name: String,
    pub source_secrets_manager_secret_id: String,
    /// Role DMS assumes to read the source secret; defaults to the stack's role.
    #[serde(default)]
    pub source_secrets_manager_role_arn: Option<String>,
    pub target_secrets_manager_secret_id: String,
    #[serde(default)]
    pub target_secrets_manager_role_arn: Option<String>,
    #[serde(default)]
    pub migration_type: Option<MigrationType>,
    #[serde(default)]
    pub engine_name: Option<EngineName>,
    #[serde(default)]
    pub target_engine_name: Option<EngineName>,
    /// Database name for Oracle, PostgreSQL and SQL Server endpoints.
    #[serde(default)]
    pub database_name: Option<String>,
    /// Explicit mapping document, used as-is.
    #[serde(default)]
    pub table_mappings: Option<TableMappings>,
    /// Tables to generate mapping rules for when no explicit document is given.
    #[serde(default)]
    pub tables: Vec<TableDescriptor>,
    #[serde(default)]
    pub replication_task_settings: Option<TaskSettings>,
}

impl TaskConfig {
    pub fn source_engine(&self) -> EngineName {
        self.engine_name.unwrap_or_default()
    }

    pub fn target_engine(&self) -> EngineName {
        self.target_engine_name.unwrap_or_default()
    }

    /// Task name as used in endpoint and task identifiers, which cannot contain `_`.
    pub fn endpoint_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// Explicit mappings, else generated from `tables`, else the whole schema.
    pub fn resolved_table_mappings(&self) -> TableMappings {
        if let Some(mappings) = &self.table_mappings {
            mappings.clone()
        } else if !self.tables.is_empty() {
            generate_table_mappings(&self.tables)
        } else {
            TableMappings::include_schema(&self.name)
        }
    }

    fn collect_errors(&self, errors: &mut Vec<String>) {
        if self.name.trim().is_empty() {
            errors.push("task name is required".to_string());
        }
        if self.source_secrets_manager_secret_id.trim().is_empty() {
            errors.push(format!(
                "task '{}': sourceSecretsManagerSecretId is required",
                self.name
            ));
        }
        if self.target_secrets_manager_secret_id.trim().is_empty() {
            errors.push(format!(
                "task '{}': targetSecretsManagerSecretId is required",
                self.name
            ));
        }
        for engine in [self.source_engine(), self.target_engine()] {
            if engine.requires_database_name() && self.database_name.is_none() {
                errors.push(format!(
                    "task '{}': databaseName is required for {engine} endpoints",
                    self.name
                ));
            }
        }
    }
}

/// Reads a JSON (`.json`) or YAML (anything else) document.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> DmsResult<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| DmsError::Config(format!("Cannot read {}: {e}", path.display())))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content)
            .map_err(|e| DmsError::Config(format!("Invalid JSON in {}: {e}", path.display())))
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| DmsError::Config(format!("Invalid YAML in {}: {e}", path.display())))
    }
}
