//! Minimal CloudFormation template model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::error::{DmsError, DmsResult};

pub const FORMAT_VERSION: &str = "2010-09-09";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Resources", default)]
    pub resources: BTreeMap<String, Resource>,
    #[serde(rename = "Outputs", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            description: None,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource under the logical id derived from its construct path.
    /// Returns the logical id.
    pub fn add_resource(&mut self, path: &str, resource: Resource) -> DmsResult<String> {
        let id = logical_id(path);
        if self.resources.contains_key(&id) {
            return Err(DmsError::DuplicateConstruct {
                logical_id: id,
                path: path.to_string(),
            });
        }
        tracing::debug!(logical_id = %id, resource_type = %resource.resource_type, "Adding resource");
        self.resources.insert(id.clone(), resource);
        Ok(id)
    }

    pub fn add_output(&mut self, path: &str, output: Output) -> DmsResult<String> {
        let id = logical_id(path);
        if self.outputs.contains_key(&id) {
            return Err(DmsError::DuplicateConstruct {
                logical_id: id,
                path: path.to_string(),
            });
        }
        self.outputs.insert(id.clone(), output);
        Ok(id)
    }

    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
    }

    pub fn count_of_type(&self, resource_type: &str) -> usize {
        self.resources_of_type(resource_type).count()
    }

    pub fn to_json_pretty(&self) -> DmsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> DmsResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DmsError::Config(format!("Cannot render template as YAML: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "Properties")]
    pub properties: Value,
    #[serde(rename = "DependsOn", default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn new<P: Serialize>(resource_type: &str, properties: &P) -> DmsResult<Self> {
        Ok(Self {
            resource_type: resource_type.to_string(),
            properties: serde_json::to_value(properties)?,
            depends_on: Vec::new(),
        })
    }

    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Value")]
    pub value: Value,
}

/// `{"Ref": id}`
pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [id, attribute]}`
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::Sub": template}`
pub fn sub(template: &str) -> Value {
    json!({ "Fn::Sub": template })
}

/// Turns a construct path such as `Replication/dms-subnet-group` into a
/// template-safe logical id (`ReplicationDmsSubnetGroup`).
pub fn logical_id(path: &str) -> String {
    path.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_ids_drop_separators() {
        assert_eq!(logical_id("Replication/dms-subnet-group"), "ReplicationDmsSubnetGroup");
        assert_eq!(
            logical_id("Replication/mysql-source-source-demo-test-repl_01"),
            "ReplicationMysqlSourceSourceDemoTestRepl01"
        );
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let mut template = Template::new();
        let resource = Resource {
            resource_type: "AWS::DMS::Endpoint".to_string(),
            properties: json!({}),
            depends_on: Vec::new(),
        };
        template.add_resource("a/b-c", resource.clone()).unwrap();
        let err = template.add_resource("a-b/c", resource).unwrap_err();
        assert!(matches!(err, DmsError::DuplicateConstruct { ref logical_id, .. } if logical_id == "ABC"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let json: Value = serde_json::from_str(&Template::new().to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["AWSTemplateFormatVersion"], FORMAT_VERSION);
        assert!(json.get("Outputs").is_none());
        assert!(json.get("Description").is_none());
    }

    #[test]
    fn intrinsics_have_provider_shape() {
        assert_eq!(reference("Instance"), json!({"Ref": "Instance"}));
        assert_eq!(
            get_att("Role", "Arn"),
            json!({"Fn::GetAtt": ["Role", "Arn"]})
        );
    }
}
