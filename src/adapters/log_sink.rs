//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).  Each line carries a
//! fixed tag so serial captures can be grepped per subsystem.

use embedded_hal::digital::PinState;
use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::PulseEdge;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn level_str(level: PinState) -> &'static str {
    match level {
        PinState::High => "HIGH",
        PinState::Low => "LOW",
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | up={}s | mode={} | out={} | link={} | \
                     polls={}/{} | connects={} | edges={}",
                    t.uptime_ms / 1000,
                    t.mode.as_wire(),
                    level_str(t.level),
                    if t.link_ready { "UP" } else { "DOWN" },
                    t.polls_ok,
                    t.polls_ok.saturating_add(t.polls_failed),
                    t.connect_attempts,
                    t.output_edges,
                );
            }
            AppEvent::Started(level) => {
                info!("START | output={}", level_str(*level));
            }
            AppEvent::LinkUp(Some(ip)) => info!("LINK | up, ip={}", ip),
            AppEvent::LinkUp(None) => info!("LINK | up"),
            AppEvent::LinkFailed(e) => warn!("LINK | {}", e),
            AppEvent::PollSucceeded(s) => {
                info!(
                    "POLL | mode={} interval={}s on={}ms valid_until={}",
                    s.mode.as_wire(),
                    s.pulse_interval_secs,
                    s.pulse_on_ms,
                    s.valid_until.as_deref().unwrap_or("-"),
                );
            }
            AppEvent::PollFailed(e) => warn!("POLL | {}", e),
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from.as_wire(), to.as_wire());
            }
            AppEvent::Pulse(PulseEdge::Start) => info!("PULSE | start"),
            AppEvent::Pulse(PulseEdge::End) => info!("PULSE | end"),
            AppEvent::OutputChanged(level) => {
                info!("OUT | {}", level_str(*level));
            }
        }
    }
}
