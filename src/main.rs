//! PetFeeder Firmware: Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  ServoDoor ×2      CoolerDriver   TemperatureSensor          │
//! │  (DoorActuator)    (DutyOutput)   (TemperatureSource)        │
//! │  EepromAdapter     LogEventSink   Esp32TimeAdapter           │
//! │  (PersistentStore) (EventSink)    (Clock)                    │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │             FeederService (pure logic)                 │  │
//! │  │  ScheduledDoor ×2 · ThermalRegulator                   │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use petfeeder::adapters::eeprom::EepromAdapter;
use petfeeder::adapters::log_sink::LogEventSink;
use petfeeder::adapters::time::Esp32TimeAdapter;
use petfeeder::app::commands::AppCommand;
use petfeeder::app::service::FeederService;
use petfeeder::config::SystemConfig;
use petfeeder::drivers::cooler::CoolerDriver;
use petfeeder::drivers::hw_init;
use petfeeder::drivers::servo::ServoDoor;
use petfeeder::drivers::watchdog::Watchdog;
use petfeeder::error::Error;
use petfeeder::pins;
use petfeeder::sensors::temperature::TemperatureSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PetFeeder v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(|e| {
        error!("HAL init failed: {}", e);
        Error::from(e)
    })?;
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 4. Adapters ───────────────────────────────────────────
    let mut store = match EepromAdapter::new() {
        Ok(s) => s,
        Err(e) => {
            warn!("EEPROM init failed ({}), running without persistence", e);
            EepromAdapter::with_capacity(petfeeder::adapters::eeprom::EEPROM_SIZE)
        }
    };
    let clock = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();

    let servos = [
        ServoDoor::new(hw_init::LEDC_CH_SERVO1),
        ServoDoor::new(hw_init::LEDC_CH_SERVO2),
    ];
    let sensor = TemperatureSensor::new(pins::TEMP_ADC_GPIO);
    let cooler = CoolerDriver::new();

    // ── 5. Domain core ────────────────────────────────────────
    let mut app = FeederService::new(&config, servos, sensor, cooler);
    app.begin(&clock, &mut store, &mut sink);
    app.handle_command(AppCommand::EnableCooler, &mut store, &mut sink);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        app.tick(&clock, &mut store, &mut sink);
        watchdog.feed();
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(config.control_loop_interval_ms);
    }
}
