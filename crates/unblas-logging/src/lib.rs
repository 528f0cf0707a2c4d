//! Logging for unblas.
//!
//! [`init_logging`] installs a `tracing` registry filtered by `RUST_LOG` (or
//! `UNBLAS_LOG`), bridges the `log` records every unblas crate emits, and
//! hands each record to an optional hook as a structured [`BlasLogRecord`].
//! With traces enabled, [`dispatch_span`] begin/end pairs reach the trace
//! hook as Chrome-trace style [`TraceEvent`]s.

use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

/// Filter used when neither `RUST_LOG` nor `UNBLAS_LOG` parse.
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Serialize)]
pub struct BlasLogRecord {
    pub ts: String,
    pub level: String,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub name: String,
    pub cat: String,
    /// `B`/`E` for span begin/end, `i` for instant events.
    pub ph: String,
    pub ts: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<JsonValue>,
}

type LogHook = Arc<dyn Fn(&BlasLogRecord) + Send + Sync>;
type TraceHook = Arc<dyn Fn(&[TraceEvent]) + Send + Sync>;

static LOG_HOOK: OnceCell<LogHook> = OnceCell::new();
static TRACE_HOOK: OnceCell<TraceHook> = OnceCell::new();

/// Keeps a thread-scoped subscriber alive when a global one already exists.
pub struct LoggingGuard {
    _guard: Option<DefaultGuard>,
}

#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Explicit filter directive; the environment is consulted when `None`.
    pub filter: Option<String>,
    pub enable_traces: bool,
    pub pid: i64,
}

pub fn set_log_hook<F>(hook: F)
where
    F: Fn(&BlasLogRecord) + Send + Sync + 'static,
{
    let _ = LOG_HOOK.set(Arc::new(hook));
}

pub fn set_trace_hook<F>(hook: F)
where
    F: Fn(&[TraceEvent]) + Send + Sync + 'static,
{
    let _ = TRACE_HOOK.set(Arc::new(hook));
}

fn env_filter(opts: &LoggingOptions) -> EnvFilter {
    if let Some(directive) = opts.filter.as_deref() {
        if let Ok(filter) = EnvFilter::try_new(directive) {
            return filter;
        }
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("UNBLAS_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_logging(opts: LoggingOptions) -> LoggingGuard {
    // Route log:: macros into tracing.
    let _ = LogTracer::init();

    let filter = env_filter(&opts);
    let build_subscriber = || {
        let trace_layer = opts.enable_traces.then_some(TraceBridgeLayer { pid: opts.pid });
        tracing_subscriber::registry()
            .with(filter.clone())
            .with(LogBridgeLayer)
            .with(trace_layer)
    };

    let guard = match tracing::subscriber::set_global_default(build_subscriber()) {
        Ok(()) => None,
        Err(_) => Some(tracing::subscriber::set_default(build_subscriber())),
    };

    LoggingGuard { _guard: guard }
}

/// Span around one dispatched kernel call.
pub fn dispatch_span(op: &str, backend: &str) -> tracing::Span {
    tracing::debug_span!("blas_dispatch", op = op, backend = backend)
}

struct LogBridgeLayer;

#[derive(Clone)]
struct TraceBridgeLayer {
    pid: i64,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn now_timestamp_micros() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

fn current_span_id() -> Option<String> {
    tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string())
}

impl<S> Layer<S> for LogBridgeLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let hook = match LOG_HOOK.get() {
            Some(h) => h,
            None => return,
        };
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let record = BlasLogRecord {
            ts: now_rfc3339(),
            level: event.metadata().level().to_string(),
            target: event.metadata().target().to_string(),
            message: visitor
                .message
                .unwrap_or_else(|| event.metadata().name().to_string()),
            span_id: current_span_id(),
            fields: visitor.fields.filter(|v| {
                v.as_object().map(|m| !m.is_empty()).unwrap_or(false)
            }),
        };
        hook(&record);
    }
}

impl<S> Layer<S> for TraceBridgeLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_enter(&self, id: &tracing::span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            emit_span_event(span.metadata(), id, "B", self.pid);
        }
    }

    fn on_exit(&self, id: &tracing::span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            emit_span_event(span.metadata(), id, "E", self.pid);
        }
    }
}

fn emit_span_event(
    meta: &'static tracing::Metadata<'static>,
    id: &tracing::span::Id,
    phase: &str,
    pid: i64,
) {
    let hook = match TRACE_HOOK.get() {
        Some(h) => h,
        None => return,
    };
    let ev = TraceEvent {
        name: meta.name().to_string(),
        cat: meta.target().to_string(),
        ph: phase.to_string(),
        ts: now_timestamp_micros(),
        pid: Some(pid),
        span_id: Some(id.into_u64().to_string()),
        args: None,
    };
    hook(&[ev]);
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Option<JsonValue>,
}

impl JsonVisitor {
    fn insert(&mut self, name: &str, value: JsonValue) {
        let obj = self
            .fields
            .get_or_insert_with(|| JsonValue::Object(Default::default()));
        if let JsonValue::Object(map) = obj {
            map.insert(name.to_string(), value);
        }
    }
}

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.insert(field.name(), JsonValue::String(text));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field.name(), JsonValue::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.insert(field.name(), JsonValue::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.insert(field.name(), JsonValue::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.insert(field.name(), JsonValue::Bool(value));
    }
}
