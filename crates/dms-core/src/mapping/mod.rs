//! Table-mapping documents and the rule generator that builds them.

pub mod generator;
pub mod rules;

pub use generator::{
    generate_table_mappings, CaseColumn, MappingGenerator, MappingRulesFile, TableDescriptor,
};
pub use rules::{ObjectLocator, Rule, TableMappings};
