//! Ratings left after a finished work.

use chambaya_types::{MessageResponse, NewRating};
use reqwest::Method;

use super::{ApiClient, ApiError, ApiResult};

impl ApiClient {
    /// Rates the counterpart of a finished work.
    ///
    /// # Errors
    /// Returns a request error for a score outside 1..=5 (nothing is sent),
    /// otherwise any transport or status error.
    pub async fn submit_rating(&self, rating: &NewRating) -> ApiResult<MessageResponse> {
        if !rating.has_valid_score() {
            return Err(ApiError::request(format!(
                "Score must be between {} and {}, got {}",
                NewRating::MIN_SCORE,
                NewRating::MAX_SCORE,
                rating.score
            )));
        }
        self.send(self.request(Method::POST, "/ratings/").json(rating))
            .await
    }
}

#[cfg(test)]
mod tests {
    use chambaya_types::RatingTarget;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::ApiErrorKind;
    use super::super::tests::logged_in_client;
    use super::*;

    fn rating(score: u8) -> NewRating {
        NewRating {
            user_id: "E1".to_string(),
            work_id: "W1".to_string(),
            score,
            comment: Some("Muy puntual".to_string()),
            target: RatingTarget::Employer,
        }
    }

    #[tokio::test]
    async fn test_submit_rating_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ratings/"))
            .and(body_json(json!({
                "userId": "E1",
                "workId": "W1",
                "score": 4,
                "comment": "Muy puntual",
                "type": "employer"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"message": "Calificación registrada"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server, "tok");
        let ack = client.submit_rating(&rating(4)).await.unwrap();
        assert_eq!(ack.message, "Calificación registrada");
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ratings/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let client = logged_in_client(&server, "tok");
        let err = client.submit_rating(&rating(6)).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Request);
    }
}
