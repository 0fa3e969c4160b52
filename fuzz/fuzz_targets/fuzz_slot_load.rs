//! Fuzz target: checksummed slot loader
//!
//! Fills the EEPROM image with arbitrary bytes and loads every slot of
//! the layout, verifying:
//! - No panics under arbitrary images
//! - Anything that loads is already clamped into range
//! - Re-saving a loaded record and loading it again is stable
//!
//! cargo fuzz run fuzz_slot_load

#![no_main]

use libfuzzer_sys::fuzz_target;
use petfeeder::adapters::eeprom::{EEPROM_SIZE, EepromAdapter};
use petfeeder::app::ports::PersistentStore;
use petfeeder::control::settings::ThermalSettings;
use petfeeder::door::schedule::ScheduleRecord;
use petfeeder::storage::{self, layout};

fuzz_target!(|data: &[u8]| {
    let mut store = EepromAdapter::with_capacity(EEPROM_SIZE);
    let n = data.len().min(layout::LAYOUT_END);
    if store.write(0, &data[..n]).is_err() {
        return;
    }

    for offset in layout::DOOR_SLOT_OFFSETS {
        if let Ok(rec) = storage::load::<ScheduleRecord>(&store, offset) {
            assert_eq!(rec, rec.clamped());
            storage::save(&mut store, offset, &rec).expect("slot inside layout");
            assert_eq!(storage::load::<ScheduleRecord>(&store, offset), Ok(rec));
        }
    }

    if let Ok(settings) = storage::load::<ThermalSettings>(&store, layout::THERMAL_SLOT_OFFSET) {
        storage::save(&mut store, layout::THERMAL_SLOT_OFFSET, &settings)
            .expect("slot inside layout");
        assert_eq!(
            storage::load::<ThermalSettings>(&store, layout::THERMAL_SLOT_OFFSET),
            Ok(settings)
        );
    }
});
