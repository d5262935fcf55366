//! Tracing layer that streams interview turn events to an outer surface.
//!
//! Events emitted under the `intervue::turn` target (session opened, turn
//! applied) are captured with their structured fields and forwarded over a
//! tokio channel, e.g. to a websocket or a progress view.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Target used by the application layer for per-turn events.
pub const TURN_TARGET: &str = "intervue::turn";

/// A captured turn event.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TurnEvent {
    /// Event target (e.g., "intervue::turn")
    pub target: String,
    /// Log level (INFO, DEBUG, WARN, ERROR)
    pub level: String,
    /// Human-readable message
    pub message: String,
    /// Structured fields from the event (session_id, phase, cursor, total, ...)
    pub fields: HashMap<String, Value>,
    /// Fields of the enclosing span, if any
    pub span: HashMap<String, Value>,
    /// Timestamp
    pub timestamp: String,
}

impl TurnEvent {
    pub fn session_id(&self) -> Option<&str> {
        self.fields.get("session_id").and_then(Value::as_str)
    }

    pub fn phase(&self) -> Option<&str> {
        self.fields.get("phase").and_then(Value::as_str)
    }
}

/// A tracing layer that sends turn events to a channel.
pub struct TurnEventLayer {
    sender: mpsc::UnboundedSender<TurnEvent>,
    target_prefix: String,
}

impl TurnEventLayer {
    /// Create a new layer with the given channel sender
    pub fn new(sender: mpsc::UnboundedSender<TurnEvent>) -> Self {
        Self {
            sender,
            target_prefix: TURN_TARGET.to_string(),
        }
    }

    /// Creates a layer together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TurnEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Captures events whose target starts with `prefix` instead.
    pub fn with_target_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target_prefix = prefix.into();
        self
    }
}

impl<S> Layer<S> for TurnEventLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        attrs.record(&mut FieldVisitor(&mut fields));
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !target.starts_with(&self.target_prefix) {
            return;
        }

        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let mut span = HashMap::new();
        if let Some(current) = ctx.event_span(event) {
            if let Some(stored) = current.extensions().get::<HashMap<String, Value>>() {
                span = stored.clone();
            }
        }

        let turn_event = TurnEvent {
            target: target.to_string(),
            level: event.metadata().level().to_string(),
            message: fields
                .remove("message")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            fields,
            span,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // A dropped receiver only means nobody is listening.
        let _ = self.sender.send(turn_event);
    }
}

/// Field visitor that extracts tracing fields into a HashMap
struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}
