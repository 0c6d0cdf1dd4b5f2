//! Telemetry exporters bridging turret snapshots to external consumers.

use std::io::Write;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, warn};

use bulwark_core::telemetry::TurretTelemetry;
use bulwark_turret::hooks::TelemetrySink;

/// Default RPC method name for telemetry pushes.
pub const TELEMETRY_METHOD: &str = "telemetry.update";

/// Writes one JSON object per tick, newline separated.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn send(&mut self, telemetry: &TurretTelemetry) {
        let result = serde_json::to_writer(&mut self.writer, telemetry)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            warn!(tick = telemetry.tick, %err, "failed to write telemetry line");
        }
    }

    fn close(&mut self) {
        if let Err(err) = self.writer.flush() {
            warn!(%err, "failed to flush telemetry output");
        }
    }
}

/// Hands each snapshot to a dispatcher as `(method, payload)`.
pub struct RpcSink<F> {
    dispatcher: F,
    method: String,
}

impl<F> RpcSink<F>
where
    F: FnMut(&str, serde_json::Value),
{
    pub fn new(dispatcher: F) -> Self {
        Self {
            dispatcher,
            method: TELEMETRY_METHOD.to_string(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl<F> TelemetrySink for RpcSink<F>
where
    F: FnMut(&str, serde_json::Value),
{
    fn send(&mut self, telemetry: &TurretTelemetry) {
        match serde_json::to_value(telemetry) {
            Ok(payload) => (self.dispatcher)(&self.method, payload),
            Err(err) => warn!(tick = telemetry.tick, %err, "failed to encode telemetry payload"),
        }
    }
}

/// Forwards snapshots over a channel, e.g. to a UI thread.
pub struct ChannelSink {
    sender: Sender<TurretTelemetry>,
}

impl ChannelSink {
    pub fn new(sender: Sender<TurretTelemetry>) -> Self {
        Self { sender }
    }
}

impl TelemetrySink for ChannelSink {
    fn send(&mut self, telemetry: &TurretTelemetry) {
        if self.sender.send(telemetry.clone()).is_err() {
            debug!(tick = telemetry.tick, "telemetry receiver dropped");
        }
    }
}

/// A connected channel sink and its receiver.
pub fn channel() -> (ChannelSink, Receiver<TurretTelemetry>) {
    let (sender, receiver) = mpsc::channel();
    (ChannelSink::new(sender), receiver)
}
