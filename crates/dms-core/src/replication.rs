use serde_json::{json, Value};

use crate::engine::{EndpointType, EngineName, MigrationType};
use crate::error::DmsResult;
use crate::mapping::TableMappings;
use crate::resources::{
    self, EndpointProperties, PolicyDocument, PolicyProperties, PolicyStatement,
    ReplicationInstanceProperties, ReplicationSubnetGroupProperties, ReplicationTaskProperties,
    RoleProperties, SecretsManagerSettings,
};
use crate::settings::TaskSettings;
use crate::template::{self, Resource, Template};

pub const DEFAULT_INSTANCE_CLASS: &str = "dms.t3.medium";
pub const DEFAULT_ALLOCATED_STORAGE: u32 = 50;
pub const DEFAULT_ENGINE_VERSION: &str = "3.4.6";

const SUBNET_GROUP_DESCRIPTION: &str =
    "Private subnets that have access to my data source and target";

const SECRETS_MANAGER_ACTIONS: [&str; 4] = [
    "secretsmanager:GetSecretValue",
    "secretsmanager:DescribeSecret",
    "secretsmanager:ListSecretVersionIds",
    "secretsmanager:ListSecrets",
];

/// Inputs of the replication construct. Unset optionals take the defaults above.
#[derive(Debug, Clone, Default)]
pub struct ReplicationProps {
    pub subnet_ids: Vec<String>,
    pub replication_instance_class: Option<String>,
    pub replication_instance_identifier: String,
    pub replication_subnet_group_identifier: String,
    pub vpc_security_group_ids: Vec<String>,
    pub allocated_storage: Option<u32>,
    pub publicly_accessible: Option<bool>,
    /// `None` leaves the service principal region to the deployment.
    pub region: Option<String>,
    pub engine_version: Option<String>,
}

impl ReplicationProps {
    pub fn with_defaults(self) -> Self {
        Self {
            replication_instance_class: self
                .replication_instance_class
                .or_else(|| Some(DEFAULT_INSTANCE_CLASS.to_string())),
            allocated_storage: self.allocated_storage.or(Some(DEFAULT_ALLOCATED_STORAGE)),
            publicly_accessible: self.publicly_accessible.or(Some(false)),
            engine_version: self
                .engine_version
                .or_else(|| Some(DEFAULT_ENGINE_VERSION.to_string())),
            ..self
        }
    }
}

/// Connection details for one endpoint.
#[derive(Debug, Clone, Copy)]
pub struct EndpointOptions<'a> {
    pub identifier: &'a str,
    pub endpoint_type: EndpointType,
    pub secret_id: &'a str,
    /// Overrides the construct's Secrets Manager access role.
    pub access_role_arn: Option<&'a str>,
    pub database_name: Option<&'a str>,
}

impl<'a> EndpointOptions<'a> {
    pub fn new(identifier: &'a str, endpoint_type: EndpointType, secret_id: &'a str) -> Self {
        Self {
            identifier,
            endpoint_type,
            secret_id,
            access_role_arn: None,
            database_name: None,
        }
    }

    pub fn database_name(mut self, database_name: Option<&'a str>) -> Self {
        self.database_name = database_name;
        self
    }

    pub fn access_role_arn(mut self, access_role_arn: Option<&'a str>) -> Self {
        self.access_role_arn = access_role_arn;
        self
    }
}

/// Handle to an endpoint created by [`DmsReplication`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRef {
    pub logical_id: String,
    pub identifier: String,
    pub engine: EngineName,
    pub endpoint_type: EndpointType,
}

impl EndpointRef {
    pub fn arn(&self) -> Value {
        template::reference(&self.logical_id)
    }
}

/// Builds the replication instance, its subnet group and access role, and
/// then any endpoints and tasks requested on it.
#[derive(Debug)]
pub struct DmsReplication {
    scope: String,
    template: Template,
    instance_id: String,
    role_id: String,
}

impl DmsReplication {
    /// Creates the subnet group, the Secrets Manager access role and the
    /// replication instance, in that order.
    pub fn new(scope: &str, props: ReplicationProps) -> DmsResult<Self> {
        let props = props.with_defaults();
        let mut replication = Self {
            scope: scope.to_string(),
            template: Template::new(),
            instance_id: String::new(),
            role_id: String::new(),
        };

        let subnet_group_id = replication.create_subnet_group(&props)?;
        replication.role_id = replication.create_role_for_secrets_manager_access(&props)?;
        replication.instance_id = replication.create_replication_instance(&props, &subnet_group_id)?;

        tracing::info!(
            instance = %props.replication_instance_identifier,
            class = props.replication_instance_class.as_deref().unwrap_or_default(),
            "Replication instance defined"
        );
        Ok(replication)
    }

    pub fn instance_logical_id(&self) -> &str {
        &self.instance_id
    }

    pub fn role_logical_id(&self) -> &str {
        &self.role_id
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    fn path(&self, id: &str) -> String {
        format!("{}/{}", self.scope, id)
    }

    fn create_subnet_group(&mut self, props: &ReplicationProps) -> DmsResult<String> {
        let resource = Resource::new(
            resources::REPLICATION_SUBNET_GROUP,
            &ReplicationSubnetGroupProperties {
                replication_subnet_group_identifier: props
                    .replication_subnet_group_identifier
                    .clone(),
                replication_subnet_group_description: SUBNET_GROUP_DESCRIPTION.to_string(),
                subnet_ids: props.subnet_ids.clone(),
            },
        )?;
        let path = self.path("dms-subnet-group");
        self.template.add_resource(&path, resource)
    }

    fn create_role_for_secrets_manager_access(
        &mut self,
        props: &ReplicationProps,
    ) -> DmsResult<String> {
        let service = match &props.region {
            Some(region) => Value::String(format!("dms.{region}.amazonaws.com")),
            None => template::sub("dms.${AWS::Region}.amazonaws.com"),
        };
        let assume = PolicyStatement {
            principal: Some(json!({ "Service": service })),
            ..PolicyStatement::allow(&["sts:AssumeRole"])
        };
        let role = Resource::new(
            resources::IAM_ROLE,
            &RoleProperties {
                assume_role_policy_document: PolicyDocument::new(vec![assume]),
            },
        )?;
        let role_path = self.path("dms-secretsmgr-access-role");
        let role_id = self.template.add_resource(&role_path, role)?;

        let read_secrets = PolicyStatement {
            resource: Some(json!("*")),
            ..PolicyStatement::allow(&SECRETS_MANAGER_ACTIONS)
        };
        let policy_name = template::logical_id(&format!("{role_path}/DefaultPolicy"));
        let policy = Resource::new(
            resources::IAM_POLICY,
            &PolicyProperties {
                policy_name,
                policy_document: PolicyDocument::new(vec![read_secrets]),
                roles: vec![template::reference(&role_id)],
            },
        )?;
        self.template
            .add_resource(&format!("{role_path}/DefaultPolicy"), policy)?;

        Ok(role_id)
    }

    fn create_replication_instance(
        &mut self,
        props: &ReplicationProps,
        subnet_group_id: &str,
    ) -> DmsResult<String> {
        let resource = Resource::new(
            resources::REPLICATION_INSTANCE,
            &ReplicationInstanceProperties {
                replication_instance_class: props
                    .replication_instance_class
                    .clone()
                    .unwrap_or_else(|| DEFAULT_INSTANCE_CLASS.to_string()),
                replication_subnet_group_identifier: props
                    .replication_subnet_group_identifier
                    .clone(),
                replication_instance_identifier: props.replication_instance_identifier.clone(),
                vpc_security_group_ids: props.vpc_security_group_ids.clone(),
                allocated_storage: props.allocated_storage,
                publicly_accessible: props.publicly_accessible,
                engine_version: props.engine_version.clone(),
            },
        )?
        .depends_on(subnet_group_id);
        let path = self.path("dms-replication-instance");
        self.template.add_resource(&path, resource)
    }

    /// Creates an endpoint for any supported engine.
    pub fn create_endpoint(
        &mut self,
        engine: EngineName,
        options: EndpointOptions<'_>,
    ) -> DmsResult<EndpointRef> {
        match engine {
            EngineName::Mysql => self.create_mysql_endpoint(options),
            EngineName::Oracle => self.create_oracle_endpoint(options),
            EngineName::AuroraPostgresql => self.create_aurora_postgres_endpoint(options),
            EngineName::Postgres => self.create_postgres_endpoint(options),
            EngineName::Sqlserver => self.create_sqlserver_endpoint(options),
        }
    }

    /// MySQL endpoints are not bound to a database name.
    pub fn create_mysql_endpoint(&mut self, options: EndpointOptions<'_>) -> DmsResult<EndpointRef> {
        self.add_endpoint(EngineName::Mysql, options.database_name(None))
    }

    pub fn create_oracle_endpoint(&mut self, options: EndpointOptions<'_>) -> DmsResult<EndpointRef> {
        self.add_endpoint(EngineName::Oracle, options)
    }

    pub fn create_aurora_postgres_endpoint(
        &mut self,
        options: EndpointOptions<'_>,
    ) -> DmsResult<EndpointRef> {
        self.add_endpoint(EngineName::AuroraPostgresql, options)
    }

    pub fn create_postgres_endpoint(
        &mut self,
        options: EndpointOptions<'_>,
    ) -> DmsResult<EndpointRef> {
        self.add_endpoint(EngineName::Postgres, options)
    }

    pub fn create_sqlserver_endpoint(
        &mut self,
        options: EndpointOptions<'_>,
    ) -> DmsResult<EndpointRef> {
        self.add_endpoint(EngineName::Sqlserver, options)
    }

    fn add_endpoint(
        &mut self,
        engine: EngineName,
        options: EndpointOptions<'_>,
    ) -> DmsResult<EndpointRef> {
        let access_role_arn = match options.access_role_arn {
            Some(arn) => Value::String(arn.to_string()),
            None => template::get_att(&self.role_id, "Arn"),
        };
        let properties = EndpointProperties {
            endpoint_identifier: options.identifier.to_string(),
            endpoint_type: options.endpoint_type,
            engine_name: engine,
            database_name: options.database_name.map(str::to_string),
            extra_connection_attributes: engine
                .extra_connection_attributes(options.endpoint_type)
                .map(str::to_string),
            my_sql_settings: None,
            oracle_settings: None,
            postgre_sql_settings: None,
            microsoft_sql_server_settings: None,
        }
        .with_engine_settings(SecretsManagerSettings {
            secrets_manager_access_role_arn: access_role_arn,
            secrets_manager_secret_id: options.secret_id.to_string(),
        });

        let path = self.path(&format!(
            "{}-{}-{}",
            engine.construct_prefix(),
            options.endpoint_type,
            options.identifier
        ));
        let logical_id = self
            .template
            .add_resource(&path, Resource::new(resources::ENDPOINT, &properties)?)?;

        tracing::debug!(
            endpoint = options.identifier,
            engine = %engine,
            endpoint_type = %options.endpoint_type,
            "Endpoint defined"
        );

        Ok(EndpointRef {
            logical_id,
            identifier: options.identifier.to_string(),
            engine,
            endpoint_type: options.endpoint_type,
        })
    }

    /// Creates a replication task on this instance between two endpoints.
    pub fn create_replication_task(
        &mut self,
        replication_task_identifier: &str,
        source: &EndpointRef,
        target: &EndpointRef,
        migration_type: Option<MigrationType>,
        table_mappings: &TableMappings,
        task_settings: &TaskSettings,
    ) -> DmsResult<String> {
        let migration_type = migration_type.unwrap_or_default();
        let properties = ReplicationTaskProperties {
            replication_instance_arn: template::reference(&self.instance_id),
            replication_task_identifier: replication_task_identifier.to_string(),
            migration_type,
            source_endpoint_arn: source.arn(),
            target_endpoint_arn: target.arn(),
            replication_task_settings: task_settings.to_json()?,
            table_mappings: table_mappings.to_json()?,
        };
        let path = self.path(replication_task_identifier);
        let logical_id = self
            .template
            .add_resource(&path, Resource::new(resources::REPLICATION_TASK, &properties)?)?;

        tracing::info!(
            task = replication_task_identifier,
            %migration_type,
            rules = table_mappings.rules.len(),
            source = %source.engine,
            target = %target.engine,
            "Replication task defined"
        );
        Ok(logical_id)
    }
}
