//! Time-based door trajectory.

/// Mechanical range of the door servos.
pub const MAX_SERVO_DEG: u16 = 180;

/// Milliseconds elapsed on a wrapping `u32` counter.
pub fn elapsed_ms(now_ms: u32, since_ms: u32) -> u32 {
    now_ms.wrapping_sub(since_ms)
}

/// Linear position between `from_deg` and `to_deg` after `elapsed_ms` of a
/// `travel_ms` move.  Holds at `to_deg` once the travel time has passed.
pub fn interpolate(elapsed_ms: u32, travel_ms: u32, from_deg: u16, to_deg: u16) -> u16 {
    if travel_ms == 0 {
        return to_deg.min(MAX_SERVO_DEG);
    }
    let t = i64::from(elapsed_ms.min(travel_ms));
    let from = i64::from(from_deg);
    let to = i64::from(to_deg);
    let pos = from + (to - from) * t / i64::from(travel_ms);
    pos.clamp(0, i64::from(MAX_SERVO_DEG)) as u16
}
