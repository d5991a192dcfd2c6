use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DmsResult;

/// Top-level table-mapping document consumed by a replication task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMappings {
    pub rules: Vec<Rule>,
}

impl TableMappings {
    /// Selects every table (`%`) of one schema.
    pub fn include_schema(schema_name: impl Into<String>) -> Self {
        Self {
            rules: vec![Rule::Selection(SelectionRule {
                rule_id: "1".to_string(),
                rule_name: "1".to_string(),
                object_locator: Some(ObjectLocator::table(schema_name, "%")),
                rule_action: Some(SelectionAction::Include),
                load_order: None,
                filters: Vec::new(),
            })],
        }
    }

    /// Compact JSON, the form embedded in `AWS::DMS::ReplicationTask`.
    pub fn to_json(&self) -> DmsResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule-type", rename_all = "kebab-case")]
pub enum Rule {
    Selection(SelectionRule),
    Transformation(TransformationRule),
    TableSettings(TableSettingsRule),
}

impl Rule {
    pub fn rule_id(&self) -> &str {
        match self {
            Self::Selection(rule) => &rule.rule_id,
            Self::Transformation(rule) => &rule.rule_id,
            Self::TableSettings(rule) => &rule.rule_id,
        }
    }

    pub fn object_locator(&self) -> Option<&ObjectLocator> {
        match self {
            Self::Selection(rule) => rule.object_locator.as_ref(),
            Self::Transformation(rule) => rule.object_locator.as_ref(),
            Self::TableSettings(rule) => rule.object_locator.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelectionRule {
    #[serde(deserialize_with = "rule_id_from_number_or_string")]
    pub rule_id: String,
    pub rule_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_locator: Option<ObjectLocator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_action: Option<SelectionAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionAction {
    Include,
    Exclude,
    Explicit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransformationRule {
    #[serde(deserialize_with = "rule_id_from_number_or_string")]
    pub rule_id: String,
    pub rule_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_action: Option<TransformationAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_target: Option<RuleTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_locator: Option<ObjectLocator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Passed through untouched; DMS accepts either a name or a definition object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key_def: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_image_def: Option<BeforeImageDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformationAction {
    AddColumn,
    IncludeColumn,
    RemoveColumn,
    Rename,
    ConvertLowercase,
    ConvertUppercase,
    AddPrefix,
    RemovePrefix,
    ReplacePrefix,
    AddSuffix,
    RemoveSuffix,
    ReplaceSuffix,
    DefinePrimaryKey,
    ChangeDataType,
    AddBeforeImageColumns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleTarget {
    Schema,
    Table,
    Column,
    TableTablespace,
    IndexTablespace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableSettingsRule {
    #[serde(deserialize_with = "rule_id_from_number_or_string")]
    pub rule_id: String,
    pub rule_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_locator: Option<ObjectLocator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_load: Option<ParallelLoad>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ObjectLocator {
    pub schema_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_tablespace_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_tablespace_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_type: Option<TableType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
}

impl ObjectLocator {
    pub fn table(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: Some(table_name.into()),
            ..Self::default()
        }
    }

    pub fn column(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            column_name: Some(column_name.into()),
            ..Self::table(schema_name, table_name)
        }
    }

    /// True when both locators address the same schema and table.
    pub fn same_table(&self, other: &ObjectLocator) -> bool {
        self.schema_name == other.schema_name && self.table_name == other.table_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    Table,
    View,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataType {
    #[serde(rename = "type")]
    pub type_name: DataTypeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
}

impl DataType {
    pub fn string(length: u32) -> Self {
        Self {
            type_name: DataTypeName::String,
            length: Some(length),
            precision: None,
            scale: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataTypeName {
    Date,
    Time,
    Datetime,
    Int1,
    Int2,
    Int4,
    Int8,
    Numeric,
    Real4,
    Real8,
    String,
    Uint1,
    Uint2,
    Uint4,
    Uint8,
    Wstring,
    Blob,
    Nclob,
    Clob,
    Boolean,
    Set,
    List,
    Map,
    Tuple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Filter {
    pub filter_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_conditions: Vec<FilterCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_operator: Option<FilterOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Lte,
    Ste,
    Gte,
    Eq,
    Noteq,
    Between,
    Notbetween,
    Null,
    Notnull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BeforeImageDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_filter: Option<ColumnFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnFilter {
    PkOnly,
    NonBlob,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParallelLoad {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub load_type: Option<ParallelLoadType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitions: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subpartitions: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_partitions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_count_from_metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_records_skip_per_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lob_settings: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<LobMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_max_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParallelLoadType {
    PartitionsAuto,
    SubpartitionsAuto,
    PartitionsList,
    Ranges,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LobMode {
    Limited,
    Unlimited,
    None,
}

/// Hand-written documents may use numeric rule ids; they are kept as strings.
fn rule_id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRuleId {
        Number(u64),
        Text(String),
    }

    Ok(match RawRuleId::deserialize(deserializer)? {
        RawRuleId::Number(id) => id.to_string(),
        RawRuleId::Text(id) => id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_schema_matches_provider_layout() {
        let json = TableMappings::include_schema("platform").to_json().unwrap();
        assert_eq!(
            json,
            r#"{"rules":[{"rule-type":"selection","rule-id":"1","rule-name":"1","object-locator":{"schema-name":"platform","table-name":"%"},"rule-action":"include"}]}"#
        );
    }

    #[test]
    fn empty_mappings_serialize_to_empty_rule_list() {
        assert_eq!(TableMappings::default().to_json().unwrap(), r#"{"rules":[]}"#);
    }

    #[test]
    fn parses_hand_written_table_settings_rule() {
        let raw = r#"{
            "rules": [
                {
                    "rule-type": "table-settings",
                    "rule-id": "7",
                    "rule-name": "parallel orders",
                    "object-locator": {"schema-name": "sales", "table-name": "orders"},
                    "parallel-load": {"type": "partitions-auto"}
                },
                {
                    "rule-type": "transformation",
                    "rule-id": "8",
                    "rule-name": "lower schema",
                    "rule-action": "convert-lowercase",
                    "rule-target": "schema",
                    "object-locator": {"schema-name": "%"}
                }
            ]
        }"#;
        let mappings: TableMappings = serde_json::from_str(raw).unwrap();
        assert_eq!(mappings.rules.len(), 2);

        match &mappings.rules[0] {
            Rule::TableSettings(rule) => {
                let load = rule.parallel_load.as_ref().unwrap();
                assert_eq!(load.load_type, Some(ParallelLoadType::PartitionsAuto));
            }
            other => panic!("expected table-settings rule, got {other:?}"),
        }
        match &mappings.rules[1] {
            Rule::Transformation(rule) => {
                assert_eq!(rule.rule_action, Some(TransformationAction::ConvertLowercase));
                assert_eq!(rule.rule_target, Some(RuleTarget::Schema));
            }
            other => panic!("expected transformation rule, got {other:?}"),
        }
        assert_eq!(mappings.rules[1].rule_id(), "8");
    }

    #[test]
    fn numeric_rule_ids_are_read_as_strings() {
        let raw = r#"{
            "rules": [
                {
                    "rule-type": "selection",
                    "rule-id": 1,
                    "rule-name": "1",
                    "object-locator": {"schema-name": "platform", "table-name": "%"},
                    "rule-action": "include"
                },
                {
                    "rule-type": "transformation",
                    "rule-id": "2",
                    "rule-name": "lower schema",
                    "rule-action": "convert-lowercase",
                    "rule-target": "schema",
                    "object-locator": {"schema-name": "%"}
                }
            ]
        }"#;
        let mappings: TableMappings = serde_json::from_str(raw).unwrap();
        assert_eq!(mappings.rules[0].rule_id(), "1");
        assert_eq!(mappings.rules[1].rule_id(), "2");
        assert_eq!(mappings.rules[0], TableMappings::include_schema("platform").rules[0]);
        assert!(mappings.to_json().unwrap().contains(r#""rule-id":"1""#));
    }

    #[test]
    fn filters_keep_their_operator_names() {
        let filter = Filter {
            filter_type: "source".to_string(),
            column_name: Some("region".to_string()),
            filter_conditions: vec![FilterCondition {
                filter_operator: Some(FilterOperator::Noteq),
                value: Some("eu".to_string()),
                start_value: None,
                end_value: None,
            }],
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["filter-conditions"][0]["filter-operator"], "noteq");
        assert_eq!(json["column-name"], "region");
    }
}
