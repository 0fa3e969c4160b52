//! Cooler regulator integration tests: setpoint persistence, filtering,
//! and the band-to-output mapping seen at the output port.

use petfeeder::adapters::eeprom::EepromAdapter;
use petfeeder::app::events::{AppEvent, LoadOutcome};
use petfeeder::app::ports::PersistentStore;
use petfeeder::control::settings::{DEFAULT_SETPOINT_F, ThermalSettings};
use petfeeder::control::thermal::ThermalRegulator;
use petfeeder::pins;
use petfeeder::sensors::temperature::{TemperatureSensor, sim_set_temp_adc};
use petfeeder::storage::{self, Record};

use crate::mock_hw::{MockOutput, OutputCall, RecordingSink, ScriptedTemp};

const SLOT: usize = 18;

fn regulator(samples: &[f64]) -> ThermalRegulator<ScriptedTemp, MockOutput> {
    ThermalRegulator::new(SLOT, ScriptedTemp::new(samples), MockOutput::default())
}

/// Boot with a stored setpoint and settle the filter at `temp`.
fn settled_at(
    store: &mut EepromAdapter,
    setpoint: i16,
    temp: f64,
) -> ThermalRegulator<ScriptedTemp, MockOutput> {
    storage::save(store, SLOT, &ThermalSettings { setpoint_f: setpoint }).unwrap();
    let mut reg = regulator(&[temp]);
    reg.enable();
    reg.begin(store, &mut RecordingSink::default());
    // Fourteen passes in all settle the half-step filter to within 0.01F.
    for _ in 0..13 {
        reg.service();
    }
    reg
}

#[test]
fn output_starts_off() {
    let reg = regulator(&[80.0]);
    assert_eq!(reg.output().calls, vec![OutputCall::Digital(false)]);
    assert!(!reg.is_enabled());
}

#[test]
fn corrupt_slot_falls_back_to_default_and_repersists() {
    let mut store = EepromAdapter::with_capacity(64);
    let mut sink = RecordingSink::default();
    let mut reg = regulator(&[50.0]);
    reg.begin(&mut store, &mut sink);

    assert_eq!(reg.setpoint(), DEFAULT_SETPOINT_F);
    assert_eq!(
        storage::load::<ThermalSettings>(&store, SLOT),
        Ok(ThermalSettings {
            setpoint_f: DEFAULT_SETPOINT_F
        })
    );
    assert!(matches!(
        sink.events[0],
        AppEvent::ThermalSettingsLoaded {
            setpoint_f: DEFAULT_SETPOINT_F,
            outcome: LoadOutcome::Defaulted(_),
        }
    ));
}

#[test]
fn stored_setpoint_is_restored() {
    let mut store = EepromAdapter::with_capacity(64);
    storage::save(&mut store, SLOT, &ThermalSettings { setpoint_f: 37 }).unwrap();
    let mut sink = RecordingSink::default();
    let mut reg = regulator(&[50.0]);
    reg.begin(&mut store, &mut sink);
    assert_eq!(reg.setpoint(), 37);
    assert!(matches!(
        sink.events[0],
        AppEvent::ThermalSettingsLoaded {
            setpoint_f: 37,
            outcome: LoadOutcome::Restored,
        }
    ));
}

#[test]
fn begin_runs_one_filter_pass() {
    let mut store = EepromAdapter::with_capacity(64);
    let mut reg = regulator(&[60.0]);
    reg.begin(&mut store, &mut RecordingSink::default());
    assert!((reg.temp() - 30.0).abs() < f64::EPSILON);
}

#[test]
fn filter_halves_the_step() {
    let mut store = EepromAdapter::with_capacity(64);
    let mut reg = regulator(&[40.0, 40.0, 80.0]);
    reg.begin(&mut store, &mut RecordingSink::default());
    reg.service();
    assert!((reg.temp() - 30.0).abs() < 1e-9);
    reg.service();
    assert!((reg.temp() - 55.0).abs() < 1e-9);
}

#[test]
fn well_above_band_is_fully_on() {
    let mut store = EepromAdapter::with_capacity(64);
    let reg = settled_at(&mut store, 40, 46.0);
    assert_eq!(reg.pwm_percent(), 100);
    assert_eq!(reg.output().last(), Some(OutputCall::Digital(true)));
}

#[test]
fn well_below_band_is_off() {
    let mut store = EepromAdapter::with_capacity(64);
    let reg = settled_at(&mut store, 40, 34.0);
    assert_eq!(reg.pwm_percent(), 0);
    assert_eq!(reg.output().last(), Some(OutputCall::Digital(false)));
}

#[test]
fn at_setpoint_is_half_duty() {
    let mut store = EepromAdapter::with_capacity(64);
    let reg = settled_at(&mut store, 40, 40.0);
    assert_eq!(reg.pwm_percent(), 50);
    assert_eq!(reg.output().last(), Some(OutputCall::Analog(128)));
}

#[test]
fn disable_turns_output_off_on_next_pass() {
    let mut store = EepromAdapter::with_capacity(64);
    let mut reg = settled_at(&mut store, 40, 60.0);
    assert_eq!(reg.pwm_percent(), 100);
    reg.disable();
    reg.service();
    assert_eq!(reg.pwm_percent(), 0);
    assert_eq!(reg.output().last(), Some(OutputCall::Digital(false)));
}

#[test]
fn non_finite_samples_hold_the_filter() {
    let mut store = EepromAdapter::with_capacity(64);
    let mut reg = regulator(&[40.0, f64::NAN, f64::INFINITY, 40.0]);
    reg.begin(&mut store, &mut RecordingSink::default());
    let before = reg.temp();
    reg.service();
    reg.service();
    assert!((reg.temp() - before).abs() < f64::EPSILON);
    assert!(reg.temp().is_finite());
    reg.service();
    assert!((reg.temp() - 30.0).abs() < 1e-9);
}

#[test]
fn set_temp_persists_and_survives_reboot() {
    let mut store = EepromAdapter::with_capacity(64);
    let mut reg = regulator(&[40.0]);
    reg.begin(&mut store, &mut RecordingSink::default());
    reg.set_temp(45, &mut store).unwrap();

    let mut rebooted = regulator(&[40.0]);
    rebooted.begin(&mut store, &mut RecordingSink::default());
    assert_eq!(rebooted.setpoint(), 45);
}

#[test]
fn corrupted_setpoint_byte_is_detected() {
    let mut store = EepromAdapter::with_capacity(64);
    storage::save(&mut store, SLOT, &ThermalSettings { setpoint_f: 42 }).unwrap();
    let byte = store.read_byte(SLOT + 1).unwrap();
    store.write_byte(SLOT + 1, byte ^ 0x01).unwrap();
    assert!(storage::load::<ThermalSettings>(&store, SLOT).is_err());
    assert_eq!(ThermalSettings::SLOT_LEN, 7);
}

// The simulated ADC value is process-global; only this test writes it.
#[test]
fn thermistor_readings_drive_the_cooler() {
    let mut store = EepromAdapter::with_capacity(64);
    storage::save(&mut store, SLOT, &ThermalSettings { setpoint_f: 40 }).unwrap();
    let mut reg = ThermalRegulator::new(
        SLOT,
        TemperatureSensor::new(pins::TEMP_ADC_GPIO),
        MockOutput::default(),
    );
    reg.enable();

    // Mid-scale is about 77F: far above the band.
    sim_set_temp_adc(2048);
    reg.begin(&mut store, &mut RecordingSink::default());
    for _ in 0..20 {
        reg.service();
    }
    assert!((reg.temp() - 77.0).abs() < 1.0, "got {}F", reg.temp());
    assert_eq!(reg.pwm_percent(), 100);

    // An open thermistor pins the ADC at the rail; the filter holds.
    sim_set_temp_adc(4095);
    let held = reg.temp();
    reg.service();
    assert!((reg.temp() - held).abs() < f64::EPSILON);
    assert_eq!(reg.pwm_percent(), 100);

    // Roughly 14F: well below the band.
    sim_set_temp_adc(3500);
    for _ in 0..20 {
        reg.service();
    }
    assert!(reg.temp() < 20.0, "got {}F", reg.temp());
    assert_eq!(reg.pwm_percent(), 0);
    assert_eq!(reg.output().last(), Some(OutputCall::Digital(false)));
}

