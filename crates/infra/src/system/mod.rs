use chrono::Utc;

/// Clock behind the context. The sweep window is defined by "now", so
/// tests pin it to a fixed instant instead of reading the wall clock.
pub trait ISys: Send + Sync {
    /// Current unix timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

pub struct WallClockSys {}
impl ISys for WallClockSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
