// Report service: ownership-scoped creation and listing
//
// The owner id always comes from the auth gate; there is no path that accepts
// a caller-supplied owner.

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use medassist_core::{sanitize_payload, Report, ReportStore, Result};

pub struct ReportService {
    store: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Append a report to the owner's collection. Reserved keys in the
    /// payload are dropped before the store assigns them.
    pub async fn create(&self, user_id: Uuid, payload: Map<String, Value>) -> Result<Report> {
        self.store.create(user_id, sanitize_payload(payload)).await
    }

    /// The owner's reports, in creation order.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Report>> {
        self.store.list(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_core::memory::MemoryReportStore;
    use serde_json::json;

    fn service() -> ReportService {
        ReportService::new(Arc::new(MemoryReportStore::new()))
    }

    fn object(value: Value) -> Map<String, Value> {
        let Value::Object(map) = value else {
            unreachable!()
        };
        map
    }

    #[tokio::test]
    async fn spoofed_owner_keys_are_overwritten() {
        let reports = service();
        let owner = Uuid::now_v7();
        let report = reports
            .create(
                owner,
                object(json!({"id": 99, "user_id": "someone-else", "symptom": "fever"})),
            )
            .await
            .unwrap();
        assert_eq!(report.id, 1);
        assert_eq!(report.user_id, owner);
        assert_eq!(report.payload.get("symptom"), Some(&json!("fever")));
    }

    #[tokio::test]
    async fn listing_preserves_creation_order() {
        let reports = service();
        let owner = Uuid::now_v7();
        reports
            .create(owner, object(json!({"symptom": "fever"})))
            .await
            .unwrap();
        reports
            .create(owner, object(json!({"symptom": "cough"})))
            .await
            .unwrap();

        let listed = reports.list(owner).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, 1);
        assert_eq!(listed[0].payload.get("symptom"), Some(&json!("fever")));
        assert_eq!(listed[1].id, 2);
    }
}
