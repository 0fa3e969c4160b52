//! Enclosure cooler regulator.
//!
//! A thermo-electric cooler is driven from a filtered temperature reading:
//! fully on well above the setpoint, off well below it, and proportionally
//! modulated inside a band of ±[`TC_PWM_DELTA_DEG`] around it.
//!
//! ```text
//!  duty %
//!   100 ┤                         ┌───────────
//!       │                       ╱
//!    50 ┤             ╱
//!       │       ╱
//!     0 ┼──────┘
//!       └──────┬────────┬────────┬───────────▶ filtered °F
//!          set−Δ       set      set+Δ
//! ```

use log::{info, warn};

use crate::app::events::{AppEvent, LoadOutcome};
use crate::app::ports::{DutyOutput, EventSink, PersistentStore, StoreError, TemperatureSource};
use crate::storage;

use super::settings::{DEFAULT_SETPOINT_F, ThermalSettings};

/// Half-width of the proportional band, degrees Fahrenheit.
pub const TC_PWM_DELTA_DEG: f64 = 5.0;

/// What the cooler output should do this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drive {
    Off,
    Full,
    /// 8-bit PWM drive value.
    Pwm(u8),
}

impl Drive {
    pub fn percent(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Full => 100,
            Self::Pwm(drive) => (f64::from(drive) * 100.0 / 255.0).round() as u8,
        }
    }
}

/// Output decision for a filtered reading.
pub fn drive_for(filtered_f: f64, setpoint_f: f64, band: f64, enabled: bool) -> Drive {
    if !enabled {
        Drive::Off
    } else if filtered_f > setpoint_f + band {
        Drive::Full
    } else if filtered_f > setpoint_f - band {
        let delta = filtered_f - setpoint_f;
        let drive = (128.0 + 127.0 * delta / band).round().clamp(0.0, 255.0);
        Drive::Pwm(drive as u8)
    } else {
        Drive::Off
    }
}

pub struct ThermalRegulator<S: TemperatureSource, O: DutyOutput> {
    slot_offset: usize,
    settings: ThermalSettings,
    sensor: S,
    output: O,
    filtered_temp: f64,
    enabled: bool,
    duty_percent: u8,
}

impl<S: TemperatureSource, O: DutyOutput> ThermalRegulator<S, O> {
    /// The regulator starts disabled with the output off.
    pub fn new(slot_offset: usize, sensor: S, output: O) -> Self {
        let mut output = output;
        output.set_digital(false);
        Self {
            slot_offset,
            settings: ThermalSettings::default(),
            sensor,
            output,
            filtered_temp: 0.0,
            enabled: false,
            duty_percent: 0,
        }
    }

    /// Restore the setpoint (or fall back to the default) and run one pass.
    pub fn begin(&mut self, store: &mut impl PersistentStore, sink: &mut impl EventSink) {
        let outcome = match storage::load::<ThermalSettings>(store, self.slot_offset) {
            Ok(settings) => {
                self.settings = settings;
                LoadOutcome::Restored
            }
            Err(e) => {
                self.filtered_temp = 0.0;
                self.settings = ThermalSettings {
                    setpoint_f: DEFAULT_SETPOINT_F,
                };
                if let Err(save_err) = storage::save(store, self.slot_offset, &self.settings) {
                    warn!("Cooler: failed to persist default setpoint: {}", save_err);
                }
                LoadOutcome::Defaulted(e)
            }
        };
        sink.emit(&AppEvent::ThermalSettingsLoaded {
            setpoint_f: self.settings.setpoint_f,
            outcome,
        });
        self.service();
    }

    /// Sample, filter, and drive the output.
    pub fn service(&mut self) {
        let sample = self.sensor.read_temperature();
        let current = if sample.is_finite() {
            (sample + self.filtered_temp) / 2.0
        } else {
            warn!("Cooler: discarding non-finite temperature sample");
            self.filtered_temp
        };

        let drive = drive_for(
            current,
            f64::from(self.settings.setpoint_f),
            TC_PWM_DELTA_DEG,
            self.enabled,
        );
        match drive {
            Drive::Off => self.output.set_digital(false),
            Drive::Full => self.output.set_digital(true),
            Drive::Pwm(duty) => self.output.set_analog_duty(duty),
        }

        self.duty_percent = drive.percent();
        self.filtered_temp = current;
    }

    /// Change and persist the setpoint.
    pub fn set_temp(
        &mut self,
        setpoint_f: i16,
        store: &mut impl PersistentStore,
    ) -> Result<(), StoreError> {
        self.settings.setpoint_f = setpoint_f;
        storage::save(store, self.slot_offset, &self.settings)?;
        info!("Cooler: set temp {}F", setpoint_f);
        Ok(())
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Takes effect on the next [`service`](Self::service) call.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Duty applied on the last pass, 0–100.
    pub fn pwm_percent(&self) -> u8 {
        self.duty_percent
    }

    /// Filtered temperature, degrees Fahrenheit.
    pub fn temp(&self) -> f64 {
        self.filtered_temp
    }

    pub fn setpoint(&self) -> i16 {
        self.settings.setpoint_f
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
