use std::sync::{Arc, Mutex};
use unblas_logging::{
    dispatch_span, init_logging, set_log_hook, set_trace_hook, BlasLogRecord, LoggingOptions,
    TraceEvent,
};

#[test]
fn log_hook_receives_structured_record() {
    let captured: Arc<Mutex<Vec<BlasLogRecord>>> = Arc::new(Mutex::new(Vec::new()));
    let c = captured.clone();
    set_log_hook(move |rec: &BlasLogRecord| c.lock().unwrap().push(rec.clone()));
    let _guard = init_logging(LoggingOptions {
        filter: Some("info".to_string()),
        enable_traces: false,
        pid: 1,
    });

    tracing::info!(kernel = "dgemm", "host library loaded");

    let items = captured.lock().unwrap();
    let record = items
        .iter()
        .find(|r| r.message.contains("host library loaded"))
        .expect("record captured");
    assert_eq!(record.level, "INFO");
    assert_eq!(
        record.fields.as_ref().and_then(|f| f.get("kernel")).and_then(|v| v.as_str()),
        Some("dgemm")
    );
}

#[test]
fn dispatch_span_emits_begin_and_end() {
    let captured: Arc<Mutex<Vec<TraceEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let c = captured.clone();
    set_trace_hook(move |events: &[TraceEvent]| c.lock().unwrap().extend_from_slice(events));
    let _guard = init_logging(LoggingOptions {
        filter: Some("debug".to_string()),
        enable_traces: true,
        pid: 7,
    });

    {
        let span = dispatch_span("sdot", "in-process");
        let _enter = span.enter();
    }

    let items = captured.lock().unwrap();
    let phases: Vec<&str> = items
        .iter()
        .filter(|e| e.name == "blas_dispatch")
        .map(|e| e.ph.as_str())
        .collect();
    assert!(phases.contains(&"B"));
    assert!(phases.contains(&"E"));
    assert!(items.iter().all(|e| e.pid == Some(7)));
}
