//! A `Json`-like extractor that enforces `Content-Type: application/json`
//! and maps every failure onto the 422 class required by §7, rather than
//! axum's default split across 415/400/422.

use axum::extract::{Bytes, FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use exprsched_core::error::SchedulerError;
use serde::de::DeserializeOwned;

use crate::http_error::ApiError;

pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);

        if !is_json {
            return Err(ApiError(SchedulerError::InvalidContentType));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError(SchedulerError::InvalidBody(e.to_string())))?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError(SchedulerError::InvalidJson(e)))?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        value: u32,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = HttpRequest::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn missing_content_type_is_rejected() {
        let req = request(None, r#"{"value":1}"#);
        let result = ValidatedJson::<Payload>::from_request(req, &()).await;
        assert!(matches!(result, Err(ApiError(SchedulerError::InvalidContentType))));
    }

    #[tokio::test]
    async fn wrong_content_type_is_rejected() {
        let req = request(Some("text/plain"), r#"{"value":1}"#);
        let result = ValidatedJson::<Payload>::from_request(req, &()).await;
        assert!(matches!(result, Err(ApiError(SchedulerError::InvalidContentType))));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let req = request(Some("application/json"), "not json");
        let result = ValidatedJson::<Payload>::from_request(req, &()).await;
        assert!(matches!(result, Err(ApiError(SchedulerError::InvalidJson(_)))));
    }

    #[tokio::test]
    async fn valid_json_is_accepted() {
        let req = request(Some("application/json"), r#"{"value":7}"#);
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(req, &()).await.unwrap();
        assert_eq!(payload, Payload { value: 7 });
    }
}
