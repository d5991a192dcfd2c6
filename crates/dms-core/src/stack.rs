use crate::config::{ContextConfig, TaskConfig};
use crate::engine::EndpointType;
use crate::error::DmsResult;
use crate::replication::{DmsReplication, EndpointOptions, EndpointRef, ReplicationProps};
use crate::template::{self, Output, Template};

pub const DEFAULT_STACK_NAME: &str = "DmsStack";

/// Construct scope every DMS resource of the stack lives under.
const REPLICATION_SCOPE: &str = "Replication";

/// A synthesized DMS stack for one environment.
#[derive(Debug)]
pub struct DmsStack {
    pub name: String,
    pub environment: String,
    pub account: Option<String>,
    pub region: Option<String>,
    template: Template,
}

impl DmsStack {
    /// Composes the stack: subnet group, role and instance first, then one
    /// source endpoint, target endpoint and replication task per task config.
    pub fn new(name: &str, context: &ContextConfig) -> DmsResult<Self> {
        tracing::info!(
            stack = name,
            environment = %context.environment,
            tasks = context.tasks.len(),
            "Composing DMS stack"
        );

        let mut replication = DmsReplication::new(REPLICATION_SCOPE, replication_props(context))?;
        let suffix = &context.replication_instance_identifier;

        let mut task_ids = Vec::with_capacity(context.tasks.len());
        for task in &context.tasks {
            let (source, target) = create_endpoints(&mut replication, task, suffix)?;
            let schema_name = task.endpoint_name();
            let task_id = replication.create_replication_task(
                &format!("{schema_name}-replication-{suffix}"),
                &source,
                &target,
                task.migration_type.or(context.migration_type),
                &task.resolved_table_mappings(),
                &context.resolved_task_settings(Some(task)),
            )?;
            task_ids.push(task_id);
        }

        let instance_id = replication.instance_logical_id().to_string();
        let mut template = replication.into_template();
        let label = if context.environment.is_empty() {
            name
        } else {
            context.environment.as_str()
        };
        template.description = Some(format!("DMS replication stack ({label})"));
        add_outputs(&mut template, &instance_id, &task_ids)?;

        Ok(Self {
            name: name.to_string(),
            environment: context.environment.clone(),
            account: context.account.clone(),
            region: context.region.clone(),
            template,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    pub fn to_json_pretty(&self) -> DmsResult<String> {
        self.template.to_json_pretty()
    }

    pub fn to_yaml(&self) -> DmsResult<String> {
        self.template.to_yaml()
    }
}

fn replication_props(context: &ContextConfig) -> ReplicationProps {
    ReplicationProps {
        subnet_ids: context.subnet_ids.clone(),
        replication_instance_class: context.replication_instance_class.clone(),
        replication_instance_identifier: context.replication_instance_identifier.clone(),
        replication_subnet_group_identifier: context.replication_subnet_group_identifier.clone(),
        vpc_security_group_ids: context.vpc_security_group_ids.clone(),
        allocated_storage: context.allocated_storage,
        publicly_accessible: context.publicly_accessible,
        region: context.region.clone(),
        engine_version: context.engine_version.clone(),
    }
}

fn create_endpoints(
    replication: &mut DmsReplication,
    task: &TaskConfig,
    suffix: &str,
) -> DmsResult<(EndpointRef, EndpointRef)> {
    let schema_name = task.endpoint_name();
    let database_name = task.database_name.as_deref();

    let source_id = format!("source-{schema_name}-{suffix}");
    let source = replication.create_endpoint(
        task.source_engine(),
        EndpointOptions::new(
            &source_id,
            EndpointType::Source,
            &task.source_secrets_manager_secret_id,
        )
        .access_role_arn(task.source_secrets_manager_role_arn.as_deref())
        .database_name(database_name),
    )?;

    let target_id = format!("target-{schema_name}-{suffix}");
    let target = replication.create_endpoint(
        task.target_engine(),
        EndpointOptions::new(
            &target_id,
            EndpointType::Target,
            &task.target_secrets_manager_secret_id,
        )
        .access_role_arn(task.target_secrets_manager_role_arn.as_deref())
        .database_name(database_name),
    )?;

    Ok((source, target))
}

fn add_outputs(template: &mut Template, instance_id: &str, task_ids: &[String]) -> DmsResult<()> {
    template.add_output(
        "ReplicationInstanceArn",
        Output {
            description: Some("ARN of the DMS replication instance".to_string()),
            value: template::reference(instance_id),
        },
    )?;
    for task_id in task_ids {
        template.add_output(
            &format!("{task_id}Arn"),
            Output {
                description: None,
                value: template::reference(task_id),
            },
        )?;
    }
    Ok(())
}
