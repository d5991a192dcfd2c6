use super::sections::*;
use super::TaskSettings;

const DEFAULT_SEVERITY: &str = "LOGGER_SEVERITY_DEFAULT";

const LOGGED_COMPONENTS: [&str; 5] = [
    "SOURCE_UNLOAD",
    "SOURCE_CAPTURE",
    "TARGET_LOAD",
    "TARGET_APPLY",
    "TASK_MANAGER",
];

impl TaskSettings {
    /// Settings applied to every replication task unless overridden.
    pub fn defaults() -> Self {
        Self {
            target_metadata: Some(TargetMetadata::defaults()),
            full_load_settings: Some(FullLoadSettings::defaults()),
            logging: Some(LoggingSettings::defaults()),
            control_tables_settings: Some(ControlTablesSettings::defaults()),
            stream_buffer_settings: Some(StreamBufferSettings::defaults()),
            change_processing_ddl_handling_policy: Some(
                ChangeProcessingDdlHandlingPolicy::defaults(),
            ),
            error_behavior: Some(ErrorBehavior::defaults()),
            change_processing_tuning: Some(ChangeProcessingTuning::defaults()),
            validation_settings: Some(ValidationSettings::defaults()),
            fail_task_when_clean_task_resource_failed: Some(false),
            other: Default::default(),
        }
    }
}

impl TargetMetadata {
    pub fn defaults() -> Self {
        Self {
            target_schema: Some(String::new()),
            support_lobs: Some(true),
            full_lob_mode: Some(false),
            lob_chunk_size: Some(64),
            limited_size_lob_mode: Some(true),
            lob_max_size: Some(32),
            inline_lob_max_size: Some(0),
            load_max_file_size: Some(0),
            parallel_load_threads: Some(0),
            parallel_load_buffer_size: Some(0),
            batch_apply_enabled: Some(false),
            task_recovery_table_enabled: Some(false),
            parallel_load_queues_per_thread: Some(0),
            parallel_apply_threads: Some(0),
            parallel_apply_buffer_size: Some(0),
            parallel_apply_queues_per_thread: Some(0),
            ..Self::default()
        }
    }
}

impl FullLoadSettings {
    pub fn defaults() -> Self {
        Self {
            target_table_prep_mode: Some("DROP_AND_CREATE".to_string()),
            create_pk_after_full_load: Some(false),
            stop_task_cached_changes_applied: Some(false),
            stop_task_cached_changes_not_applied: Some(false),
            max_full_load_sub_tasks: Some(8),
            transaction_consistency_timeout: Some(600),
            commit_rate: Some(10000),
            ..Self::default()
        }
    }
}

impl LoggingSettings {
    pub fn defaults() -> Self {
        Self {
            enable_logging: Some(true),
            log_components: Some(
                LOGGED_COMPONENTS
                    .iter()
                    .map(|id| LogComponent::new(id, DEFAULT_SEVERITY))
                    .collect(),
            ),
            ..Self::default()
        }
    }
}

impl ControlTablesSettings {
    pub fn defaults() -> Self {
        Self {
            control_schema: Some(String::new()),
            history_timeslot_in_minutes: Some(5),
            history_table_enabled: Some(false),
            suspended_tables_table_enabled: Some(false),
            status_table_enabled: Some(false),
            full_load_exception_table_enabled: Some(false),
            ..Self::default()
        }
    }
}

impl StreamBufferSettings {
    pub fn defaults() -> Self {
        Self {
            stream_buffer_count: Some(3),
            stream_buffer_size_in_mb: Some(8),
            ctrl_stream_buffer_size_in_mb: Some(5),
            ..Self::default()
        }
    }
}

impl ChangeProcessingDdlHandlingPolicy {
    pub fn defaults() -> Self {
        Self {
            handle_source_table_dropped: Some(true),
            handle_source_table_truncated: Some(true),
            handle_source_table_altered: Some(true),
            ..Self::default()
        }
    }
}

impl ErrorBehavior {
    pub fn defaults() -> Self {
        Self {
            data_error_policy: Some("LOG_ERROR".to_string()),
            data_truncation_error_policy: Some("LOG_ERROR".to_string()),
            data_error_escalation_policy: Some("SUSPEND_TABLE".to_string()),
            data_error_escalation_count: Some(0),
            table_error_policy: Some("SUSPEND_TABLE".to_string()),
            table_error_escalation_policy: Some("STOP_TASK".to_string()),
            table_error_escalation_count: Some(0),
            recoverable_error_count: Some(-1),
            recoverable_error_interval: Some(5),
            recoverable_error_throttling: Some(true),
            recoverable_error_throttling_max: Some(1800),
            recoverable_error_stop_retry_after_throttling_max: Some(true),
            apply_error_delete_policy: Some("IGNORE_RECORD".to_string()),
            apply_error_insert_policy: Some("LOG_ERROR".to_string()),
            apply_error_update_policy: Some("LOG_ERROR".to_string()),
            apply_error_escalation_policy: Some("LOG_ERROR".to_string()),
            apply_error_escalation_count: Some(0),
            apply_error_fail_on_truncation_ddl: Some(false),
            full_load_ignore_conflicts: Some(true),
            fail_on_transaction_consistency_breached: Some(false),
            fail_on_no_tables_captured: Some(true),
            ..Self::default()
        }
    }
}

impl ChangeProcessingTuning {
    pub fn defaults() -> Self {
        Self {
            batch_apply_preserve_transaction: Some(true),
            batch_apply_timeout_min: Some(1),
            batch_apply_timeout_max: Some(30),
            batch_apply_memory_limit: Some(500),
            batch_split_size: Some(0),
            min_transaction_size: Some(1000),
            commit_timeout: Some(1),
            memory_limit_total: Some(1024),
            memory_keep_time: Some(60),
            statement_cache_size: Some(50),
            ..Self::default()
        }
    }
}

impl ValidationSettings {
    pub fn defaults() -> Self {
        Self {
            enable_validation: Some(true),
            validation_mode: Some("ROW_LEVEL".to_string()),
            thread_count: Some(5),
            partition_size: Some(10000),
            failure_max_count: Some(10000),
            record_failure_delay_in_minutes: Some(5),
            record_suspend_delay_in_minutes: Some(30),
            max_key_column_size: Some(8096),
            table_failure_max_count: Some(1000),
            validation_only: Some(false),
            handle_collation_diff: Some(false),
            record_failure_delay_limit_in_minutes: Some(0),
            skip_lob_columns: Some(false),
            validation_partial_lob_size: Some(0),
            validation_query_cdc_delay_seconds: Some(0),
            ..Self::default()
        }
    }
}
