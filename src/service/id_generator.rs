//! `LVR_NNN` identifiers for new leave requests.

use chrono::Utc;
use tracing::{debug, warn};

use crate::store::LeaveRepository;

pub const ID_PREFIX: &str = "LVR_";

pub fn format_leave_id(number: u64) -> String {
    format!("{ID_PREFIX}{number:03}")
}

/// Numeric suffix of an `LVR_<digits>` identifier.
pub fn parse_leave_number(id: &str) -> Option<u64> {
    let digits = id.strip_prefix(ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Last-resort ID from the trailing six digits of a millisecond timestamp.
/// Does not follow the three-digit format.
pub fn timestamp_leave_id(now_millis: i64) -> String {
    format!("{ID_PREFIX}{:06}", now_millis.rem_euclid(1_000_000))
}

/// Next leave request ID: sequence, else highest existing suffix + 1, else timestamp.
pub async fn next_leave_id(repo: &dyn LeaveRepository) -> String {
    match repo.next_sequence_value().await {
        Ok(n) => {
            let id = format_leave_id(n);
            debug!(id = %id, "Generated leave id from sequence");
            return id;
        }
        Err(e) => warn!(error = %e, "Sequence unavailable, deriving id from existing rows"),
    }

    match repo.max_leave_number().await {
        Ok(max) => {
            let id = format_leave_id(max.map_or(1, |m| m + 1));
            debug!(id = %id, "Generated leave id from max existing");
            id
        }
        Err(e) => {
            let id = timestamp_leave_id(Utc::now().timestamp_millis());
            warn!(error = %e, id = %id, "Store unreachable, using timestamp id");
            id
        }
    }
}
