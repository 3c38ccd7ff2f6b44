use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Wrapper for API responses that automatically adds the success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: Option<String>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data,
            message: None,
            status_code: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status_code: Some(StatusCode::CREATED),
            ..Self::success(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        let mut envelope = json!({
            "success": true,
            "data": serde_json::to_value(&self.data)?
        });
        if let Some(message) = &self.message {
            envelope["message"] = json!(message);
        }
        Ok(envelope)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        match self.to_json() {
            Ok(envelope) => (status, Json(envelope)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                crate::error::ApiError::internal_server_error("Failed to serialize response data").into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_data_and_message() {
        let body = ApiResponse::success(json!({ "like": true })).with_message("ok").to_json().unwrap();
        assert_eq!(body, json!({ "success": true, "data": { "like": true }, "message": "ok" }));
    }

    #[test]
    fn message_is_omitted_when_absent() {
        let body = ApiResponse::success(3).to_json().unwrap();
        assert_eq!(body, json!({ "success": true, "data": 3 }));
        assert_eq!(ApiResponse::created(()).status_code, Some(StatusCode::CREATED));
    }
}
