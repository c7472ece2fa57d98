//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web)
//! - Wall-clock time and seeds

pub mod storage;

/// Seed for a new run
#[cfg(target_arch = "wasm32")]
pub fn random_seed() -> u64 {
    js_sys::Date::now() as u64 ^ (js_sys::Math::random() * u32::MAX as f64) as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn random_seed() -> u64 {
    rand::random()
}

/// Current time as an ISO-8601 UTC string (`2024-05-01T10:00:00.000Z`)
#[cfg(target_arch = "wasm32")]
pub fn now_iso8601() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
