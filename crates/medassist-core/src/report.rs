// Diagnosis report entity
//
// Reports carry an arbitrary caller-supplied payload. `id` is a per-owner
// insertion sequence number, not a global identifier; `(user_id, id)` is the
// unique key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored report. The payload fields are flattened alongside the assigned
/// `id` and `user_id` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i32,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Keys the server assigns; caller-supplied values for them are discarded so a
/// payload can never spoof ownership or collide with the flattened fields.
pub const RESERVED_REPORT_KEYS: [&str; 2] = ["id", "user_id"];

/// Strip reserved keys from an incoming payload.
pub fn sanitize_payload(mut payload: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_REPORT_KEYS {
        payload.remove(key);
    }
    payload
}
