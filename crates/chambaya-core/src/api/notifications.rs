//! Notification endpoints. All answer with the `{ok, data?, message?}` envelope.

use chambaya_types::{Notification, NotificationStats};
use reqwest::Method;
use serde_json::Value;

use super::{ApiClient, ApiError, ApiResult};

/// Age threshold used by [`ApiClient::clean_old_notifications`] when none is given.
pub const DEFAULT_CLEAN_DAYS: u32 = 30;

impl ApiClient {
    /// Recent notifications, newest first, optionally capped at `limit`.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or `ok: false`.
    pub async fn notifications(&self, limit: Option<u32>) -> ApiResult<Vec<Notification>> {
        let mut request = self.request(Method::GET, "/notifications");
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        Ok(self.send_envelope(request).await?.unwrap_or_default())
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or `ok: false`.
    pub async fn unread_notifications(&self) -> ApiResult<Vec<Notification>> {
        let request = self.request(Method::GET, "/notifications/unread");
        Ok(self.send_envelope(request).await?.unwrap_or_default())
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status, `ok: false`
    /// or a missing payload.
    pub async fn notification_stats(&self) -> ApiResult<NotificationStats> {
        let request = self.request(Method::GET, "/notifications/stats");
        self.send_envelope(request)
            .await?
            .ok_or_else(|| ApiError::api(Some("Notification stats missing from response")))
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or `ok: false`.
    pub async fn mark_read(&self, id: &str) -> ApiResult<Option<Notification>> {
        let request = self.request(Method::PATCH, &format!("/notifications/{id}/read"));
        self.send_envelope(request).await
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or `ok: false`.
    pub async fn mark_all_read(&self) -> ApiResult<Option<Value>> {
        let request = self.request(Method::PATCH, "/notifications/read-all");
        self.send_envelope(request).await
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or `ok: false`.
    pub async fn delete_notification(&self, id: &str) -> ApiResult<Option<Value>> {
        let request = self.request(Method::DELETE, &format!("/notifications/{id}"));
        self.send_envelope(request).await
    }

    /// Deletes notifications older than `days` (default 30).
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or `ok: false`.
    pub async fn clean_old_notifications(&self, days: Option<u32>) -> ApiResult<Option<Value>> {
        let days = days.unwrap_or(DEFAULT_CLEAN_DAYS);
        let request = self
            .request(Method::DELETE, "/notifications/clean/old")
            .query(&[("days", days)]);
        self.send_envelope(request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::tests::logged_in_client;
    use super::*;

    fn notification(id: &str, is_read: bool) -> Value {
        json!({
            "_id": id,
            "userId": "U1",
            "type": "new_application",
            "title": "Nueva postulación",
            "message": "Alguien postuló a tu trabajo",
            "isRead": is_read,
            "relatedModel": "Work",
            "relatedId": "W1",
            "priority": "high",
            "createdAt": "2026-01-05T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_notifications_passes_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "data": [notification("N1", false), notification("N2", true)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server, "tok");
        let list = client.notifications(Some(5)).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "N1");
        assert!(list[1].is_read);
    }

    #[tokio::test]
    async fn test_unread_missing_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications/unread"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = logged_in_client(&server, "tok");
        assert!(client.unread_notifications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_read_uses_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/notifications/N1/read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "data": notification("N1", true)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server, "tok");
        let updated = client.mark_read("N1").await.unwrap().unwrap();
        assert!(updated.is_read);
    }

    #[tokio::test]
    async fn test_clean_defaults_to_thirty_days() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/notifications/clean/old"))
            .and(query_param("days", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "message": "Notificaciones eliminadas"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server, "tok");
        client.clean_old_notifications(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_stats_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "data": {"total": 12, "unread": 3, "byType": {"new_rating": 2}}
            })))
            .mount(&server)
            .await;

        let client = logged_in_client(&server, "tok");
        let stats = client.notification_stats().await.unwrap();
        assert_eq!(stats.total, 12);
        assert_eq!(stats.unread, 3);
        assert_eq!(stats.by_type.get("new_rating"), Some(&2));
    }
}
