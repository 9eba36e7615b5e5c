use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use error_stack::Report;
use tracing::warn;

use super::Error;
use crate::database;
use crate::types::Error as ErrorType;

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::UnknownFlag { .. } | ErrorType::InvalidForm { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if let Some(report) = &self.report {
            warn!(?report, "request failed");
        }
        HttpResponse::build(self.status_code()).json(&self.error_type)
    }
}

impl From<ErrorType> for Error {
    fn from(value: ErrorType) -> Self {
        Error::new(value)
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        Error::from_report(ErrorType::Internal, value)
    }
}
