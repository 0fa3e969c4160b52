//! NTC thermistor enclosure sensor (10 kOhm @ 25 C, B = 3950).
//!
//! Wired in a voltage-divider with a fixed 10 kOhm resistor, read via
//! the ESP32-S3 ADC. The simplified Beta (Steinhart-Hart) equation
//! converts resistance to temperature, reported in Fahrenheit.
//!
//! A reading pinned at either ADC rail (open or shorted thermistor)
//! yields `NaN`, which the regulator discards.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH8 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use crate::app::ports::TemperatureSource;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(2048);

/// Inject the raw ADC value the host build reads back.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

const R25: f64 = 10_000.0;
const BETA: f64 = 3950.0;
const T25_K: f64 = 298.15;
const R_DIVIDER: f64 = 10_000.0;
const ADC_MAX: f64 = 4095.0;
const V_REF: f64 = 3.3;

/// Convert a raw 12-bit reading to degrees Fahrenheit.
pub fn adc_to_fahrenheit(raw: u16) -> f64 {
    let voltage = (f64::from(raw) / ADC_MAX) * V_REF;
    if voltage <= 0.01 || voltage >= (V_REF - 0.01) {
        return f64::NAN;
    }
    let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return f64::NAN;
    }
    let celsius = (1.0 / inv_t) - 273.15;
    celsius * 9.0 / 5.0 + 32.0
}

pub struct TemperatureSensor {
    _adc_gpio: i32,
}

impl TemperatureSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            _adc_gpio: adc_gpio,
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_TEMP)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_TEMP_ADC.load(Ordering::Relaxed)
    }
}

impl TemperatureSource for TemperatureSensor {
    fn read_temperature(&mut self) -> f64 {
        adc_to_fahrenheit(self.read_adc())
    }
}
