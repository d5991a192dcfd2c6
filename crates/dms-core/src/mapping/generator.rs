use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::read_document;
use crate::error::DmsResult;
use crate::mapping::rules::{
    DataType, ObjectLocator, Rule, RuleTarget, SelectionAction, SelectionRule, TableMappings,
    TransformationAction, TransformationRule,
};

/// Width of the string column DMS creates for derived values.
const DERIVED_COLUMN_LENGTH: u32 = 64;

/// Declarative description of one table to replicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    pub schema_name: String,
    pub table_name: String,
    /// Columns copied as-is.
    #[serde(default)]
    pub include_columns: Vec<String>,
    /// Columns replaced by a `<column>_hashed` SHA-256 digest.
    #[serde(default)]
    pub hash_columns: Vec<String>,
    /// Columns derived from a CASE-style expression, added as `<column>_case`.
    #[serde(default)]
    pub case_columns: Vec<CaseColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseColumn {
    pub column_name: String,
    pub statement: String,
}

/// On-disk layout of a mapping rules file: `{ "tables": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingRulesFile {
    #[serde(default)]
    pub tables: Vec<TableDescriptor>,
}

impl MappingRulesFile {
    pub fn from_file(path: &Path) -> DmsResult<Self> {
        read_document(path)
    }
}

/// Builds table-mapping rules for a set of tables.
///
/// Rule ids are assigned from a counter owned by the generator, so every call
/// to [`MappingGenerator::generate`] numbers its rules from 1.
#[derive(Debug, Default)]
pub struct MappingGenerator {
    counter: u32,
    rules: Vec<Rule>,
}

impl MappingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, tables: &[TableDescriptor]) -> TableMappings {
        self.counter = 0;
        self.rules.clear();

        for table in tables {
            self.push_table(table);
        }

        tracing::debug!(
            tables = tables.len(),
            rules = self.rules.len(),
            "Generated table mapping rules"
        );

        TableMappings {
            rules: std::mem::take(&mut self.rules),
        }
    }

    fn push_table(&mut self, table: &TableDescriptor) {
        let schema = table.schema_name.to_lowercase();
        let name = table.table_name.to_lowercase();

        let id = self.next_id();
        self.rules.push(Rule::Selection(SelectionRule {
            rule_id: id,
            rule_name: format!("include table {name}"),
            object_locator: Some(ObjectLocator::table(&schema, &name)),
            rule_action: Some(SelectionAction::Include),
            load_order: None,
            filters: Vec::new(),
        }));

        for column in &table.include_columns {
            let rule = self.column_rule(
                format!("insert column {name}:{column}"),
                TransformationAction::IncludeColumn,
                ObjectLocator::column(&schema, &name, column),
            );
            self.rules.push(rule);
        }

        for column in &table.hash_columns {
            let remove = self.column_rule(
                format!("remove column {name}:{column}"),
                TransformationAction::RemoveColumn,
                ObjectLocator::column(&schema, &name, column),
            );
            self.rules.push(remove);

            let column = column.to_lowercase();
            let add = self.add_column_rule(
                &schema,
                &name,
                format!("{column}_hashed"),
                format!("hash_sha256(${column})"),
            );
            self.rules.push(add);
        }

        for case in &table.case_columns {
            let add = self.add_column_rule(
                &schema,
                &name,
                format!("{}_case", case.column_name.to_lowercase()),
                case.statement.clone(),
            );
            self.rules.push(add);
        }
    }

    fn column_rule(
        &mut self,
        rule_name: String,
        action: TransformationAction,
        locator: ObjectLocator,
    ) -> Rule {
        Rule::Transformation(TransformationRule {
            rule_action: Some(action),
            rule_target: Some(RuleTarget::Column),
            object_locator: Some(locator),
            ..self.transformation(rule_name)
        })
    }

    fn add_column_rule(
        &mut self,
        schema: &str,
        table: &str,
        column: String,
        expression: String,
    ) -> Rule {
        let rule_name = format!("add column {table}:{column}");
        Rule::Transformation(TransformationRule {
            rule_action: Some(TransformationAction::AddColumn),
            rule_target: Some(RuleTarget::Column),
            object_locator: Some(ObjectLocator::table(schema, table)),
            value: Some(column),
            expression: Some(expression),
            data_type: Some(DataType::string(DERIVED_COLUMN_LENGTH)),
            ..self.transformation(rule_name)
        })
    }

    fn transformation(&mut self, rule_name: String) -> TransformationRule {
        TransformationRule {
            rule_id: self.next_id(),
            rule_name,
            rule_action: None,
            rule_target: None,
            object_locator: None,
            value: None,
            old_value: None,
            expression: None,
            data_type: None,
            primary_key_def: None,
            before_image_def: None,
            filters: Vec::new(),
        }
    }

    fn next_id(&mut self) -> String {
        self.counter += 1;
        self.counter.to_string()
    }
}

/// Convenience wrapper for a single generation pass.
pub fn generate_table_mappings(tables: &[TableDescriptor]) -> TableMappings {
    MappingGenerator::new().generate(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers() -> TableDescriptor {
        TableDescriptor {
            schema_name: "Sales".to_string(),
            table_name: "Customers".to_string(),
            include_columns: vec!["id".to_string(), "name".to_string()],
            hash_columns: vec!["Email".to_string()],
            case_columns: vec![CaseColumn {
                column_name: "Tier".to_string(),
                statement: "CASE WHEN $spend > 1000 THEN 'gold' ELSE 'basic' END".to_string(),
            }],
        }
    }

    fn orders() -> TableDescriptor {
        TableDescriptor {
            schema_name: "sales".to_string(),
            table_name: "orders".to_string(),
            include_columns: vec!["order_id".to_string()],
            hash_columns: vec!["card_number".to_string(), "cvv".to_string()],
            case_columns: Vec::new(),
        }
    }

    fn transformation(rule: &Rule) -> &TransformationRule {
        match rule {
            Rule::Transformation(rule) => rule,
            other => panic!("expected transformation rule, got {other:?}"),
        }
    }

    #[test]
    fn zero_tables_yield_empty_rules() {
        let mappings = generate_table_mappings(&[]);
        assert!(mappings.rules.is_empty());
        assert_eq!(mappings.to_json().unwrap(), r#"{"rules":[]}"#);
    }

    #[test]
    fn rule_ids_are_sequential_from_one() {
        let mappings = generate_table_mappings(&[customers(), orders()]);
        // customers: 1 + 2 + 2 + 1, orders: 1 + 1 + 4
        assert_eq!(mappings.rules.len(), 12);
        for (i, rule) in mappings.rules.iter().enumerate() {
            assert_eq!(rule.rule_id(), (i + 1).to_string());
        }
    }

    #[test]
    fn counter_resets_between_passes() {
        let mut generator = MappingGenerator::new();
        let first = generator.generate(&[orders()]);
        let second = generator.generate(&[orders()]);
        assert_eq!(first, second);
        assert_eq!(second.rules[0].rule_id(), "1");
    }

    #[test]
    fn table_rule_comes_first_and_lowercases_names() {
        let mappings = generate_table_mappings(&[customers()]);
        match &mappings.rules[0] {
            Rule::Selection(rule) => {
                assert_eq!(rule.rule_name, "include table customers");
                assert_eq!(rule.rule_action, Some(SelectionAction::Include));
                let locator = rule.object_locator.as_ref().unwrap();
                assert_eq!(locator.schema_name, "sales");
                assert_eq!(locator.table_name.as_deref(), Some("customers"));
            }
            other => panic!("expected selection rule, got {other:?}"),
        }
    }

    #[test]
    fn included_columns_become_include_column_rules() {
        let mappings = generate_table_mappings(&[customers()]);
        let rule = transformation(&mappings.rules[1]);
        assert_eq!(rule.rule_name, "insert column customers:id");
        assert_eq!(rule.rule_action, Some(TransformationAction::IncludeColumn));
        assert_eq!(rule.rule_target, Some(RuleTarget::Column));
        assert_eq!(
            rule.object_locator.as_ref().unwrap().column_name.as_deref(),
            Some("id")
        );
    }

    #[test]
    fn hashed_column_produces_remove_then_add() {
        let mappings = generate_table_mappings(&[orders()]);
        let hashed: Vec<_> = mappings.rules[2..].iter().map(transformation).collect();
        assert_eq!(hashed.len(), 4);

        let removes = hashed
            .iter()
            .filter(|r| r.rule_action == Some(TransformationAction::RemoveColumn))
            .count();
        let adds = hashed
            .iter()
            .filter(|r| r.rule_action == Some(TransformationAction::AddColumn))
            .count();
        assert_eq!((removes, adds), (2, 2));
        assert!(!hashed
            .iter()
            .any(|r| r.rule_action == Some(TransformationAction::IncludeColumn)));

        assert_eq!(hashed[0].rule_name, "remove column orders:card_number");
        assert_eq!(hashed[1].rule_name, "add column orders:card_number_hashed");
        assert_eq!(hashed[1].value.as_deref(), Some("card_number_hashed"));
        assert_eq!(hashed[1].expression.as_deref(), Some("hash_sha256($card_number)"));
        assert_eq!(hashed[1].data_type, Some(DataType::string(64)));
        assert_eq!(hashed[1].object_locator.as_ref().unwrap().column_name, None);
    }

    #[test]
    fn case_column_adds_derived_column_with_statement() {
        let mappings = generate_table_mappings(&[customers()]);
        let rule = transformation(mappings.rules.last().unwrap());
        assert_eq!(rule.rule_name, "add column customers:tier_case");
        assert_eq!(rule.value.as_deref(), Some("tier_case"));
        assert_eq!(
            rule.expression.as_deref(),
            Some("CASE WHEN $spend > 1000 THEN 'gold' ELSE 'basic' END")
        );
    }

    #[test]
    fn every_rule_points_at_a_selected_table() {
        let mappings = generate_table_mappings(&[customers(), orders()]);
        let selected: Vec<&ObjectLocator> = mappings
            .rules
            .iter()
            .filter_map(|r| match r {
                Rule::Selection(rule) => rule.object_locator.as_ref(),
                _ => None,
            })
            .collect();

        for rule in &mappings.rules {
            let locator = rule.object_locator().unwrap();
            assert!(selected.iter().any(|s| s.same_table(locator)));
        }
    }

    #[test]
    fn descriptor_lists_are_optional_in_files() {
        let file: MappingRulesFile = serde_json::from_str(
            r#"{"tables": [{"schemaName": "hr", "tableName": "staff", "hashColumns": ["ssn"]}]}"#,
        )
        .unwrap();
        let table = &file.tables[0];
        assert!(table.include_columns.is_empty());
        assert_eq!(table.hash_columns, vec!["ssn".to_string()]);
        assert!(table.case_columns.is_empty());
    }
}
