//! Replication task settings and their defaults.
//!
//! User settings are merged over [`TaskSettings::defaults`] one section at a
//! time. Inside a section every key the user supplied wins and every missing
//! key falls back; values are never merged deeper than that, so a list such as
//! `Logging.LogComponents` replaces the default list as a whole.

mod defaults;
pub mod sections;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DmsResult;
pub use sections::{
    ChangeProcessingDdlHandlingPolicy, ChangeProcessingTuning, ControlTablesSettings,
    ErrorBehavior, FullLoadSettings, LogComponent, LoggingSettings, Section,
    StreamBufferSettings, TargetMetadata, ValidationSettings,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_metadata: Option<TargetMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_load_settings: Option<FullLoadSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_tables_settings: Option<ControlTablesSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_buffer_settings: Option<StreamBufferSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_processing_ddl_handling_policy: Option<ChangeProcessingDdlHandlingPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_behavior: Option<ErrorBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_processing_tuning: Option<ChangeProcessingTuning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_settings: Option<ValidationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_task_when_clean_task_resource_failed: Option<bool>,
    /// Sections without a typed model (e.g. `BeforeImageSettings`), kept verbatim.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl TaskSettings {
    /// Merges `self` over `defaults`, section by section.
    pub fn merged_over(self, defaults: &TaskSettings) -> TaskSettings {
        let mut other = defaults.other.clone();
        other.extend(self.other);

        TaskSettings {
            target_metadata: merge_section(self.target_metadata, &defaults.target_metadata),
            full_load_settings: merge_section(
                self.full_load_settings,
                &defaults.full_load_settings,
            ),
            logging: merge_section(self.logging, &defaults.logging),
            control_tables_settings: merge_section(
                self.control_tables_settings,
                &defaults.control_tables_settings,
            ),
            stream_buffer_settings: merge_section(
                self.stream_buffer_settings,
                &defaults.stream_buffer_settings,
            ),
            change_processing_ddl_handling_policy: merge_section(
                self.change_processing_ddl_handling_policy,
                &defaults.change_processing_ddl_handling_policy,
            ),
            error_behavior: merge_section(self.error_behavior, &defaults.error_behavior),
            change_processing_tuning: merge_section(
                self.change_processing_tuning,
                &defaults.change_processing_tuning,
            ),
            validation_settings: merge_section(
                self.validation_settings,
                &defaults.validation_settings,
            ),
            fail_task_when_clean_task_resource_failed: self
                .fail_task_when_clean_task_resource_failed
                .or(defaults.fail_task_when_clean_task_resource_failed),
            other,
        }
    }

    /// Fills a partial settings object from the built-in defaults.
    pub fn with_defaults(partial: Option<TaskSettings>) -> TaskSettings {
        partial
            .unwrap_or_default()
            .merged_over(&TaskSettings::defaults())
    }

    /// Resolves settings through each override layer, most general first.
    pub fn resolve<'a>(layers: impl IntoIterator<Item = Option<&'a TaskSettings>>) -> TaskSettings {
        layers
            .into_iter()
            .flatten()
            .fold(TaskSettings::defaults(), |resolved, layer| {
                layer.clone().merged_over(&resolved)
            })
    }

    /// Compact JSON, the form embedded in `AWS::DMS::ReplicationTask`.
    pub fn to_json(&self) -> DmsResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn merge_section<T: Section>(user: Option<T>, defaults: &Option<T>) -> Option<T> {
    match (user, defaults) {
        (Some(user), Some(defaults)) => Some(user.merged_over(defaults)),
        (Some(user), None) => Some(user),
        (None, defaults) => defaults.clone(),
    }
}
