use chrono::{SecondsFormat, Utc};
use tokio::time::Instant;

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn get_instant() -> Instant {
    Instant::now()
}
