//! Render `tracing` events as logfmt lines.
//!
//! [`render_event`] extracts level, target, message and the remaining fields of an event;
//! [`LogfmtLayer`] writes one `level=... target=... msg=... key=value` line per event.

use std::{
    fmt::{Debug, Write as _},
    io::{self, Write as _},
};

use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    fmt::MakeWriter,
    layer::{Context, Layer},
};

/// Fields extracted from a tracing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLog {
    /// Severity level, lowercase (`info`, `debug`, ...).
    pub level: String,
    /// Event target, usually the module path.
    pub target: String,
    /// The `message` field, empty when the event has none.
    pub message: String,
    /// Remaining fields as space-separated `key=value` pairs.
    pub fields: String,
}

impl RenderedLog {
    /// The logfmt line for this event, without a trailing newline.
    pub fn line(&self) -> String {
        let mut line = format!("level={} target={}", self.level, self.target);
        if !self.message.is_empty() {
            let _ignored = write!(line, " msg={}", quote(&self.message));
        }
        if !self.fields.is_empty() {
            line.push(' ');
            line.push_str(&self.fields);
        }
        line
    }
}

/// Quote `value` when it contains spaces, quotes or `=`.
fn quote(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=']) {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}

/// Collects the message and the other fields of an event.
struct FieldVisitor {
    /// Captured `message` field, if present.
    message: Option<String>,
    /// Accumulated non-message fields.
    fields: String,
}

impl FieldVisitor {
    /// Append one `key=value` pair.
    fn push(&mut self, name: &str, value: &str) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ignored = write!(self.fields, "{}={}", name, quote(value));
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.push(field.name(), &rendered);
        }
    }
}

/// Extract level, target, message and fields from `event`.
pub fn render_event(event: &Event<'_>) -> RenderedLog {
    let meta = event.metadata();
    let mut visitor = FieldVisitor {
        message: None,
        fields: String::new(),
    };
    event.record(&mut visitor);
    RenderedLog {
        level: meta.level().as_str().to_ascii_lowercase(),
        target: meta.target().to_string(),
        message: visitor.message.unwrap_or_default(),
        fields: visitor.fields,
    }
}

/// Tracing layer writing logfmt lines to a writer (stderr by default).
#[derive(Debug)]
pub struct LogfmtLayer<W = fn() -> io::Stderr> {
    /// Produces the writer for each line.
    make_writer: W,
}

impl LogfmtLayer {
    /// A layer writing to stderr.
    pub fn new() -> Self {
        Self {
            make_writer: io::stderr,
        }
    }
}

impl Default for LogfmtLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> LogfmtLayer<W> {
    /// A layer writing to `make_writer`.
    pub fn with_writer<W2>(self, make_writer: W2) -> LogfmtLayer<W2> {
        LogfmtLayer { make_writer }
    }
}

impl<S, W> Layer<S> for LogfmtLayer<W>
where
    S: Subscriber,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let line = render_event(event).line();
        let mut writer = self.make_writer.make_writer();
        let _ignored = writeln!(writer, "{line}");
    }
}

/// Create a logfmt layer writing to stderr.
pub fn layer() -> LogfmtLayer {
    LogfmtLayer::new()
}
