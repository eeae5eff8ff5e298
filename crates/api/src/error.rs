use actix_web::{
    http::{header, StatusCode},
    HttpResponse,
};
use frontdesk_api_structs::APIErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontdeskError {
    #[error("Internal server error")]
    InternalError,
    /// A trigger endpoint could not complete its run
    #[error("{error}: {details}")]
    TriggerFailed { error: String, details: String },
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
    #[error("404 Not found. Error message: `{0}`")]
    NotFound(String),
}

impl FrontdeskError {
    pub fn trigger_failed(error: impl Into<String>, details: impl ToString) -> Self {
        Self::TriggerFailed {
            error: error.into(),
            details: details.to_string(),
        }
    }
}

impl actix_web::error::ResponseError for FrontdeskError {
    fn status_code(&self) -> StatusCode {
        match *self {
            Self::InternalError | Self::TriggerFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadClientData(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::TriggerFailed { error, details } => HttpResponse::build(self.status_code())
                .json(APIErrorResponse::new(error.clone(), Some(details.clone()))),
            _ => HttpResponse::build(self.status_code())
                .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
                .body(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, ResponseError};

    #[actix_web::main]
    #[test]
    async fn trigger_failures_are_reported_as_json() {
        let err = FrontdeskError::trigger_failed("Failed to send reminders", "record store is down");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let body: APIErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "Failed to send reminders");
        assert_eq!(body.details.as_deref(), Some("record store is down"));
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            FrontdeskError::BadClientData("".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FrontdeskError::NotFound("".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
