//! FeederService integration tests: slot assignment, command routing,
//! and end-to-end feeding through the orchestrator.

use petfeeder::adapters::eeprom::EepromAdapter;
use petfeeder::app::commands::AppCommand;
use petfeeder::app::events::AppEvent;
use petfeeder::app::service::FeederService;
use petfeeder::config::SystemConfig;
use petfeeder::control::settings::ThermalSettings;
use petfeeder::door::schedule::ScheduleRecord;
use petfeeder::door::{DoorId, DoorPhase};
use petfeeder::storage::{self, layout};

use crate::mock_hw::{MockClock, MockOutput, MockServo, RecordingSink, ScriptedTemp, week_day};

type Service = FeederService<MockServo, ScriptedTemp, MockOutput>;

fn service(temp: f64) -> Service {
    FeederService::new(
        &SystemConfig::default(),
        [MockServo::at(0), MockServo::at(0)],
        ScriptedTemp::constant(temp),
        MockOutput::default(),
    )
}

#[test]
fn first_boot_writes_every_slot() {
    let mut store = EepromAdapter::with_capacity(512);
    let mut sink = RecordingSink::default();
    let clock = MockClock::at(week_day(2, 9, 30));
    let mut svc = service(70.0);
    svc.begin(&clock, &mut store, &mut sink);

    for offset in layout::DOOR_SLOT_OFFSETS {
        let rec = storage::load::<ScheduleRecord>(&store, offset).unwrap();
        assert_eq!(rec, ScheduleRecord::new(2, 9, 30, false));
    }
    assert!(storage::load::<ThermalSettings>(&store, layout::THERMAL_SLOT_OFFSET).is_ok());
    assert!(store.image()[layout::LAYOUT_END..].iter().all(|&b| b == 0xFF));
    assert!(matches!(sink.events.last(), Some(AppEvent::Started)));
}

#[test]
fn second_door_homes_to_its_own_closed_angle() {
    let mut store = EepromAdapter::with_capacity(512);
    let mut sink = RecordingSink::default();
    let clock = MockClock::at(week_day(2, 9, 30));
    let mut svc = service(70.0);
    svc.begin(&clock, &mut store, &mut sink);

    let second = svc.door(DoorId(2)).unwrap();
    assert_eq!(second.actuator().writes(), vec![90]);
}

#[test]
fn commanded_schedule_feeds_once_through_tick() {
    let mut store = EepromAdapter::with_capacity(512);
    let mut sink = RecordingSink::default();
    let clock = MockClock::at(week_day(6, 17, 59)).with_ms(1_000);
    let mut svc = service(70.0);
    svc.begin(&clock, &mut store, &mut sink);

    svc.handle_command(
        AppCommand::SetSchedule {
            door: DoorId(1),
            weekday: 6,
            hour: 18,
            minute: 0,
        },
        &mut store,
        &mut sink,
    );
    svc.handle_command(AppCommand::EnableDoor(DoorId(1)), &mut store, &mut sink);

    // 50 ms ticks for five minutes of wall time.
    for _ in 0..(5 * 60 * 20) {
        clock.advance_ms(50);
        svc.tick(&clock, &mut store, &mut sink);
    }

    let door = svc.door(DoorId(1)).unwrap();
    assert_eq!(door.phase(), DoorPhase::Closed);
    assert!(!door.is_enabled());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FeedingComplete(DoorId(1)))),
        1
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FeedingComplete(DoorId(2)))),
        0
    );
    assert!(door.actuator().writes().contains(&90));
    assert_eq!(svc.door(DoorId(2)).unwrap().phase(), DoorPhase::Closed);
}

#[test]
fn thermostat_command_persists_to_thermal_slot() {
    let mut store = EepromAdapter::with_capacity(512);
    let mut sink = RecordingSink::default();
    let clock = MockClock::at(week_day(1, 12, 0));
    let mut svc = service(70.0);
    svc.begin(&clock, &mut store, &mut sink);

    svc.handle_command(AppCommand::SetThermostat(38), &mut store, &mut sink);
    assert_eq!(svc.regulator().setpoint(), 38);
    assert_eq!(
        storage::load::<ThermalSettings>(&store, layout::THERMAL_SLOT_OFFSET),
        Ok(ThermalSettings { setpoint_f: 38 })
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::SetpointChanged(38))),
        1
    );
}

#[test]
fn cooler_commands_toggle_regulation() {
    let mut store = EepromAdapter::with_capacity(512);
    let mut sink = RecordingSink::default();
    let clock = MockClock::at(week_day(1, 12, 0));
    let mut svc = service(90.0);
    svc.begin(&clock, &mut store, &mut sink);

    svc.handle_command(AppCommand::EnableCooler, &mut store, &mut sink);
    for _ in 0..5 {
        clock.advance_ms(50);
        svc.tick(&clock, &mut store, &mut sink);
    }
    assert_eq!(svc.regulator().pwm_percent(), 100);

    svc.handle_command(AppCommand::DisableCooler, &mut store, &mut sink);
    clock.advance_ms(50);
    svc.tick(&clock, &mut store, &mut sink);
    assert_eq!(svc.regulator().pwm_percent(), 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::CoolerToggled(_))),
        2
    );
}

#[test]
fn status_snapshot_serialises() {
    let mut store = EepromAdapter::with_capacity(512);
    let mut sink = RecordingSink::default();
    let clock = MockClock::at(week_day(4, 7, 5));
    let mut svc = service(70.0);
    svc.begin(&clock, &mut store, &mut sink);

    let status = svc.build_status();
    assert_eq!(status.doors.len(), 2);
    assert_eq!(status.doors[0].trigger.as_str(), "Wed 07:05");
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"phase\":\"Closed\""));
    assert!(json.contains("\"setpoint_f\":40"));
}

#[test]
fn shutdown_leaves_everything_closed_and_off() {
    let mut store = EepromAdapter::with_capacity(512);
    let mut sink = RecordingSink::default();
    let clock = MockClock::at(week_day(1, 12, 0));
    let mut svc = service(90.0);
    svc.begin(&clock, &mut store, &mut sink);
    svc.handle_command(AppCommand::EnableCooler, &mut store, &mut sink);
    svc.tick(&clock, &mut store, &mut sink);

    svc.shutdown(&mut store);
    assert!(!svc.regulator().is_enabled());
    assert_eq!(svc.regulator().pwm_percent(), 0);
    for id in [DoorId(1), DoorId(2)] {
        assert_eq!(svc.door(id).unwrap().phase(), DoorPhase::Closed);
    }
}
