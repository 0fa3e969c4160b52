//! Hobby-servo door actuator on an LEDC channel.
//!
//! The servo timer runs at 50 Hz with 14-bit resolution; an angle maps
//! linearly onto a 500–2500 µs pulse.  Detaching drops the duty to zero so
//! the servo stops holding torque.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes LEDC duty via hw_init helpers.
//! On host/test: tracks the commanded angle only.

use crate::app::ports::DoorActuator;
use crate::door::motion::MAX_SERVO_DEG;
use crate::drivers::hw_init;
use crate::pins;

const FRAME_US: u32 = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;
const DUTY_FULL_SCALE: u32 = 1 << pins::SERVO_PWM_RESOLUTION_BITS;

/// LEDC duty for a pulse width in microseconds.
pub fn pulse_to_duty(pulse_us: u32) -> u32 {
    pulse_us * DUTY_FULL_SCALE / FRAME_US
}

/// Pulse width for an angle, clamped to the mechanical range.
pub fn angle_to_pulse_us(degrees: u16) -> u32 {
    let degrees = u32::from(degrees.min(MAX_SERVO_DEG));
    let span = pins::SERVO_MAX_PULSE_US - pins::SERVO_MIN_PULSE_US;
    pins::SERVO_MIN_PULSE_US + span * degrees / u32::from(MAX_SERVO_DEG)
}

pub struct ServoDoor {
    channel: u32,
    angle: u16,
    attached: bool,
}

impl ServoDoor {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            angle: 0,
            attached: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn apply(&self) {
        let duty = if self.attached {
            pulse_to_duty(angle_to_pulse_us(self.angle))
        } else {
            0
        };
        hw_init::ledc_set(self.channel, duty);
    }
}

impl DoorActuator for ServoDoor {
    fn attach(&mut self) {
        self.attached = true;
        self.apply();
    }

    fn detach(&mut self) {
        self.attached = false;
        self.apply();
    }

    fn write_position(&mut self, degrees: u16) {
        self.angle = degrees.min(MAX_SERVO_DEG);
        self.apply();
    }

    fn read_position(&self) -> u16 {
        self.angle
    }
}
