//! LiftSwitch Firmware: Main Entry Point
//!
//! Hexagonal architecture driven by a single cooperative scheduler loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  WifiAdapter      EspHttpTransport  RelayOutput   LogEventSink │
//! │  (Connectivity)   (HttpTransport)   (OutputPort)  (EventSink)  │
//! │  Esp32TimeAdapter (Clock)                                      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           ControllerService (pure logic)               │    │
//! │  │  Poll cadence · PollClient · ModeMachine               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler loop: tick · feed watchdog · sleep                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;
use log::{error, info};

use liftswitch::adapters::hardware::RelayOutput;
use liftswitch::adapters::http::EspHttpTransport;
use liftswitch::adapters::log_sink::LogEventSink;
use liftswitch::adapters::time::Esp32TimeAdapter;
use liftswitch::adapters::wifi::{EspStation, RetryPolicy, WifiAdapter};
use liftswitch::app::service::ControllerService;
use liftswitch::config::DeviceConfig;
use liftswitch::drivers::watchdog::Watchdog;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LiftSwitch v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Build-time configuration ───────────────────────────
    let config = DeviceConfig::from_build_env()
        .inspect_err(|e| error!("Config invalid: {}, halting", e))?;
    info!(
        "Config: ssid='{}' device='{}' server={}",
        config.wifi.ssid, config.device_id, config.server_url
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // SAFETY: the relay GPIO is not claimed anywhere else in the firmware.
    let relay_pin = unsafe { AnyOutputPin::new(config.relay_gpio) };
    let mut output = RelayOutput::new(PinDriver::output(relay_pin)?);

    let wifi = EspWifi::new(peripherals.modem, sysloop, Some(nvs))?;
    let mut link = WifiAdapter::new(
        EspStation::new(wifi),
        FreeRtos,
        RetryPolicy::from_config(&config),
    );

    let mut transport = EspHttpTransport::new(&config);
    let clock = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();

    // ── 4. Controller + watchdog ──────────────────────────────
    let mut service = ControllerService::new(&config)?;
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    service.start(&clock, &mut output, &mut sink);
    info!("System ready. Entering scheduler loop.");

    // ── 5. Scheduler loop ─────────────────────────────────────
    loop {
        service.tick(&clock, &mut link, &mut transport, &mut output, &mut sink);
        watchdog.feed();
        FreeRtos::delay_ms(config.tick_interval_ms);
    }
}
