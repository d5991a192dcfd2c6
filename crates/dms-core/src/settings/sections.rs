use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A task-settings section whose keys fall back to a default section one by one.
pub trait Section: Clone {
    /// Keys present in `self` win; absent keys are taken from `defaults`.
    fn merged_over(self, defaults: &Self) -> Self;
}

/// Declares a settings section: every field becomes optional, is skipped when
/// unset, and takes part in the key-level merge. Keys the section does not
/// model are kept in `other` and merged the same way.
macro_rules! settings_section {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident: $ty:ty,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "PascalCase")]
        pub struct $name {
            $(
                $(#[$field_meta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
            #[serde(flatten)]
            pub other: BTreeMap<String, Value>,
        }

        impl Section for $name {
            fn merged_over(self, defaults: &Self) -> Self {
                let mut other = defaults.other.clone();
                other.extend(self.other);
                Self {
                    $($field: self.$field.or_else(|| defaults.$field.clone()),)*
                    other,
                }
            }
        }
    };
}

settings_section! {
    /// How DMS writes to the target: LOB handling, batch apply, parallelism.
    pub struct TargetMetadata {
        pub target_schema: String,
        pub support_lobs: bool,
        pub full_lob_mode: bool,
        pub lob_chunk_size: i64,
        pub limited_size_lob_mode: bool,
        pub lob_max_size: i64,
        pub inline_lob_max_size: i64,
        pub load_max_file_size: i64,
        pub parallel_load_threads: i64,
        pub parallel_load_buffer_size: i64,
        pub batch_apply_enabled: bool,
        pub task_recovery_table_enabled: bool,
        pub parallel_load_queues_per_thread: i64,
        pub parallel_apply_threads: i64,
        pub parallel_apply_buffer_size: i64,
        pub parallel_apply_queues_per_thread: i64,
    }
}

settings_section! {
    pub struct FullLoadSettings {
        /// `DO_NOTHING`, `DROP_AND_CREATE` or `TRUNCATE_BEFORE_LOAD`.
        pub target_table_prep_mode: String,
        pub create_pk_after_full_load: bool,
        pub stop_task_cached_changes_applied: bool,
        pub stop_task_cached_changes_not_applied: bool,
        pub max_full_load_sub_tasks: i64,
        pub transaction_consistency_timeout: i64,
        pub commit_rate: i64,
    }
}

settings_section! {
    pub struct LoggingSettings {
        pub enable_logging: bool,
        pub log_components: Vec<LogComponent>,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogComponent {
    pub id: String,
    pub severity: String,
}

impl LogComponent {
    pub fn new(id: &str, severity: &str) -> Self {
        Self {
            id: id.to_string(),
            severity: severity.to_string(),
        }
    }
}

settings_section! {
    pub struct ControlTablesSettings {
        pub control_schema: String,
        pub history_timeslot_in_minutes: i64,
        pub history_table_enabled: bool,
        pub suspended_tables_table_enabled: bool,
        pub status_table_enabled: bool,
        pub full_load_exception_table_enabled: bool,
    }
}

settings_section! {
    pub struct StreamBufferSettings {
        pub stream_buffer_count: i64,
        #[serde(rename = "StreamBufferSizeInMB")]
        pub stream_buffer_size_in_mb: i64,
        #[serde(rename = "CtrlStreamBufferSizeInMB")]
        pub ctrl_stream_buffer_size_in_mb: i64,
    }
}

settings_section! {
    pub struct ChangeProcessingDdlHandlingPolicy {
        pub handle_source_table_dropped: bool,
        pub handle_source_table_truncated: bool,
        pub handle_source_table_altered: bool,
    }
}

settings_section! {
    pub struct ErrorBehavior {
        pub data_error_policy: String,
        pub data_truncation_error_policy: String,
        pub data_error_escalation_policy: String,
        pub data_error_escalation_count: i64,
        pub table_error_policy: String,
        pub table_error_escalation_policy: String,
        pub table_error_escalation_count: i64,
        /// `-1` retries forever.
        pub recoverable_error_count: i64,
        pub recoverable_error_interval: i64,
        pub recoverable_error_throttling: bool,
        pub recoverable_error_throttling_max: i64,
        pub recoverable_error_stop_retry_after_throttling_max: bool,
        pub apply_error_delete_policy: String,
        pub apply_error_insert_policy: String,
        pub apply_error_update_policy: String,
        pub apply_error_escalation_policy: String,
        pub apply_error_escalation_count: i64,
        pub apply_error_fail_on_truncation_ddl: bool,
        pub full_load_ignore_conflicts: bool,
        pub fail_on_transaction_consistency_breached: bool,
        pub fail_on_no_tables_captured: bool,
    }
}

settings_section! {
    pub struct ChangeProcessingTuning {
        pub batch_apply_preserve_transaction: bool,
        pub batch_apply_timeout_min: i64,
        pub batch_apply_timeout_max: i64,
        pub batch_apply_memory_limit: i64,
        pub batch_split_size: i64,
        pub min_transaction_size: i64,
        pub commit_timeout: i64,
        pub memory_limit_total: i64,
        pub memory_keep_time: i64,
        pub statement_cache_size: i64,
    }
}

settings_section! {
    pub struct ValidationSettings {
        pub enable_validation: bool,
        pub validation_mode: String,
        pub thread_count: i64,
        pub partition_size: i64,
        pub failure_max_count: i64,
        pub record_failure_delay_in_minutes: i64,
        pub record_suspend_delay_in_minutes: i64,
        pub max_key_column_size: i64,
        pub table_failure_max_count: i64,
        pub validation_only: bool,
        pub handle_collation_diff: bool,
        pub record_failure_delay_limit_in_minutes: i64,
        pub skip_lob_columns: bool,
        pub validation_partial_lob_size: i64,
        pub validation_query_cdc_delay_seconds: i64,
    }
}
