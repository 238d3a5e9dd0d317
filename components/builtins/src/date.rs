//! Date namespace operations

use chrono::Utc;

/// Date namespace methods
pub struct DateObject;

impl DateObject {
    /// Date.now(); milliseconds since the Unix epoch
    pub fn now() -> f64 {
        Utc::now().timestamp_millis() as f64
    }
}
