//! Tests for db::repository::error module.

use ecocollect_rust::db::repository::{ErrorContext, RepositoryError};

#[test]
fn test_error_context_new() {
    let ctx = ErrorContext::new("insert_stop");
    assert_eq!(ctx.operation, Some("insert_stop".to_string()));
    assert!(ctx.entity.is_none());
    assert!(ctx.entity_id.is_none());
    assert!(ctx.details.is_none());
    assert!(!ctx.retryable);
}

#[test]
fn test_error_context_chaining() {
    let ctx = ErrorContext::new("update_stop_status")
        .with_entity("stop")
        .with_entity_id(42)
        .with_details("timeout occurred")
        .retryable();

    assert_eq!(ctx.operation, Some("update_stop_status".to_string()));
    assert_eq!(ctx.entity, Some("stop".to_string()));
    assert_eq!(ctx.entity_id, Some("42".to_string()));
    assert_eq!(ctx.details, Some("timeout occurred".to_string()));
    assert!(ctx.retryable);
}

#[test]
fn test_error_context_display() {
    let ctx = ErrorContext::new("upcoming_in_zone")
        .with_entity("schedule")
        .with_entity_id("s-123");

    let display = format!("{}", ctx);
    assert!(display.contains("operation=upcoming_in_zone"));
    assert!(display.contains("entity=schedule"));
    assert!(display.contains("id=s-123"));
    assert!(!display.contains("retryable"));
}

#[test]
fn test_connection_errors_are_retryable() {
    let err = RepositoryError::connection("pool exhausted");
    assert!(err.is_retryable());
}

#[test]
fn test_timeout_errors_are_retryable() {
    let err = RepositoryError::timeout("query exceeded deadline");
    assert!(err.is_retryable());
}

#[test]
fn test_not_found_is_not_retryable() {
    let err = RepositoryError::not_found("no such stop");
    assert!(!err.is_retryable());
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_query_error_retryable_only_with_flag() {
    let plain = RepositoryError::query("syntax error");
    assert!(!plain.is_retryable());
}

#[test]
fn test_error_display_includes_context() {
    let err = RepositoryError::not_found_with_context(
        "Stop not found",
        ErrorContext::new("update_stop_status").with_entity_id("stop-9"),
    );
    let text = err.to_string();
    assert!(text.contains("Stop not found"));
    assert!(text.contains("operation=update_stop_status"));
    assert!(text.contains("id=stop-9"));
}

#[test]
fn test_context_accessor() {
    let err = RepositoryError::internal_with_context(
        "boom",
        ErrorContext::new("health_check").with_details("probe failed"),
    );
    let ctx = err.context();
    assert_eq!(ctx.operation, Some("health_check".to_string()));
    assert_eq!(ctx.details, Some("probe failed".to_string()));
}

#[test]
fn test_constructor_variants() {
    assert!(matches!(
        RepositoryError::validation("bad category"),
        RepositoryError::ValidationError { .. }
    ));
    assert!(matches!(
        RepositoryError::configuration("missing DATABASE_URL"),
        RepositoryError::ConfigurationError { .. }
    ));
    assert!(matches!(
        RepositoryError::internal("unexpected"),
        RepositoryError::InternalError { .. }
    ));
}
