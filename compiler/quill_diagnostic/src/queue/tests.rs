use super::*;
use pretty_assertions::assert_eq;

fn error_at(start: u32, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6090)
        .with_message(message)
        .with_label(Span::new(start, start + 1), "here")
}

#[test]
fn test_flush_orders_by_primary_span() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.push(error_at(30, "third"));
    queue.push(error_at(10, "first"));
    queue.push(error_at(20, "second"));

    let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
    assert!(queue.is_empty());
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn test_deduplicates_identical_diagnostics() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.push(error_at(5, "same")));
    assert!(!queue.push(error_at(5, "same")));
    assert!(queue.push(error_at(6, "same")));
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_error_limit_truncates_and_reports() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    assert!(queue.push(error_at(1, "a")));
    assert!(queue.push(error_at(2, "b")));
    assert!(queue.limit_reached());
    assert!(!queue.push(error_at(3, "c")));

    let flushed = queue.flush();
    assert_eq!(flushed.len(), 3);
    assert_eq!(flushed[2].code, ErrorCode::E9002);
}

#[test]
fn test_warnings_do_not_count_toward_errors() {
    let mut queue = DiagnosticQueue::new();
    queue.push(Diagnostic::warning(ErrorCode::E6090).with_message("just a warning"));
    assert_eq!(queue.error_count(), 0);
    assert!(queue.has_errors().is_none());
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_emit_error_returns_guarantee() {
    let mut queue = DiagnosticQueue::new();
    let _guarantee = queue.emit_error(error_at(0, "boom"));
    assert!(queue.has_errors().is_some());
    assert_eq!(queue.peek().count(), 1);
}
