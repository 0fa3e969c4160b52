//! Thermo-electric cooler driver (logic-level MOSFET on LEDC ch2).
//!
//! This is a dumb actuator.  The on/off/proportional decision belongs to
//! [`ThermalRegulator`](crate::control::thermal::ThermalRegulator).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::app::ports::DutyOutput;
use crate::drivers::hw_init;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoolerState {
    Off,
    FullOn,
    /// 8-bit duty.
    Modulated(u8),
}

pub struct CoolerDriver {
    state: CoolerState,
}

impl Default for CoolerDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl CoolerDriver {
    pub fn new() -> Self {
        Self {
            state: CoolerState::Off,
        }
    }

    pub fn state(&self) -> CoolerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, CoolerState::Off)
    }

    fn set_duty_hw(&self, duty: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_COOLER, u32::from(duty));
    }
}

impl DutyOutput for CoolerDriver {
    fn set_digital(&mut self, on: bool) {
        if on {
            self.set_duty_hw(u8::MAX);
            self.state = CoolerState::FullOn;
        } else {
            self.set_duty_hw(0);
            self.state = CoolerState::Off;
        }
    }

    fn set_analog_duty(&mut self, duty: u8) {
        self.set_duty_hw(duty);
        self.state = match duty {
            0 => CoolerState::Off,
            u8::MAX => CoolerState::FullOn,
            d => CoolerState::Modulated(d),
        };
    }
}
