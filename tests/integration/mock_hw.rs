//! Mock hardware adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real PWM registers.

use std::cell::Cell;
use std::collections::VecDeque;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use petfeeder::app::events::AppEvent;
use petfeeder::app::ports::{Clock, DoorActuator, DutyOutput, EventSink, TemperatureSource};

// ── Servo ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoCall {
    Attach,
    Detach,
    Write(u16),
}

pub struct MockServo {
    pub calls: Vec<ServoCall>,
    angle: u16,
}

#[allow(dead_code)]
impl MockServo {
    pub fn at(angle: u16) -> Self {
        Self {
            calls: Vec::new(),
            angle,
        }
    }

    pub fn writes(&self) -> Vec<u16> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ServoCall::Write(a) => Some(*a),
                _ => None,
            })
            .collect()
    }
}

impl DoorActuator for MockServo {
    fn attach(&mut self) {
        self.calls.push(ServoCall::Attach);
    }

    fn detach(&mut self) {
        self.calls.push(ServoCall::Detach);
    }

    fn write_position(&mut self, degrees: u16) {
        self.angle = degrees.min(180);
        self.calls.push(ServoCall::Write(self.angle));
    }

    fn read_position(&self) -> u16 {
        self.angle
    }
}

// ── Cooler output ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCall {
    Digital(bool),
    Analog(u8),
}

#[derive(Default)]
pub struct MockOutput {
    pub calls: Vec<OutputCall>,
}

#[allow(dead_code)]
impl MockOutput {
    pub fn last(&self) -> Option<OutputCall> {
        self.calls.last().copied()
    }
}

impl DutyOutput for MockOutput {
    fn set_digital(&mut self, on: bool) {
        self.calls.push(OutputCall::Digital(on));
    }

    fn set_analog_duty(&mut self, duty: u8) {
        self.calls.push(OutputCall::Analog(duty));
    }
}

// ── Temperature ───────────────────────────────────────────────

/// Plays back a script of samples, then repeats the last one.
pub struct ScriptedTemp {
    samples: VecDeque<f64>,
    last: f64,
}

#[allow(dead_code)]
impl ScriptedTemp {
    pub fn new(samples: &[f64]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
            last: samples.last().copied().unwrap_or(0.0),
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(&[value])
    }
}

impl TemperatureSource for ScriptedTemp {
    fn read_temperature(&mut self) -> f64 {
        match self.samples.pop_front() {
            Some(v) => v,
            None => self.last,
        }
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Manually advanced wall clock plus wrapping millisecond counter.
pub struct MockClock {
    now: Cell<NaiveDateTime>,
    ms: Cell<u32>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
            ms: Cell::new(0),
        }
    }

    pub fn with_ms(self, ms: u32) -> Self {
        self.ms.set(ms);
        self
    }

    pub fn advance_ms(&self, ms: u32) {
        self.ms.set(self.ms.get().wrapping_add(ms));
        self.now
            .set(self.now.get() + TimeDelta::milliseconds(i64::from(ms)));
    }

    /// Move the wall clock without touching the monotonic counter (RTC resync).
    pub fn set_wall(&self, now: NaiveDateTime) {
        self.now.set(now);
    }
}

impl Clock for MockClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }

    fn monotonic_ms(&self) -> u32 {
        self.ms.get()
    }
}

/// 2024-01-07 was a Sunday (weekday 1); `weekday` 1..=7 picks the day.
pub fn week_day(weekday: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 6 + weekday)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
