//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::domain::DomainError;
use crate::engine::MeetingError;
use crate::providers::ProviderError;
use crate::share::ShareError;

use super::dto::ErrorResponse;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or invalid input
    BadRequest {
        kind: &'static str,
        message: String,
    },

    NotFound { message: String },

    /// Valid input with no answer (travelers too far apart)
    Unprocessable {
        kind: &'static str,
        message: String,
        data_incomplete: bool,
    },

    /// An upstream provider did not deliver data
    BadGateway {
        kind: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Machine-readable class sent as `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest { kind, .. }
            | AppError::Unprocessable { kind, .. }
            | AppError::BadGateway { kind, .. } => kind,
            AppError::NotFound { .. } => "not_found",
        }
    }

    /// Whether some provider data behind the answer was missing.
    pub fn data_incomplete(&self) -> bool {
        match self {
            AppError::Unprocessable {
                data_incomplete, ..
            } => *data_incomplete,
            AppError::BadGateway { .. } => true,
            _ => false,
        }
    }
}

impl From<MeetingError> for AppError {
    fn from(e: MeetingError) -> Self {
        let message = e.to_string();
        let data_incomplete = e.is_data_problem();
        match e {
            MeetingError::TooFewTravelers { .. } => AppError::BadRequest {
                kind: "too_few_travelers",
                message,
            },
            MeetingError::InvalidBudget(_) => AppError::BadRequest {
                kind: "invalid_budget",
                message,
            },
            MeetingError::DecodeRejected(_) => AppError::BadRequest {
                kind: "decode_rejected",
                message,
            },
            MeetingError::InsufficientData { .. } => AppError::BadGateway {
                kind: "insufficient_data",
                message,
            },
            MeetingError::NoOverlap { .. } => AppError::Unprocessable {
                kind: "no_overlap",
                message,
                data_incomplete: false,
            },
            // 502 only when no tried budget had a full set of isochrones.
            ref infeasible @ MeetingError::Infeasible { .. } => {
                if infeasible.is_starved() {
                    AppError::BadGateway {
                        kind: "infeasible",
                        message,
                    }
                } else {
                    AppError::Unprocessable {
                        kind: "infeasible",
                        message,
                        data_incomplete,
                    }
                }
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UnknownTraveler(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                kind: "invalid_input",
                message: e.to_string(),
            },
        }
    }
}

impl From<ShareError> for AppError {
    fn from(e: ShareError) -> Self {
        MeetingError::DecodeRejected(e).into()
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::BadGateway {
            kind: "provider_error",
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let data_incomplete = self.data_incomplete();
        let message = match self {
            AppError::BadRequest { message, .. }
            | AppError::Unprocessable { message, .. }
            | AppError::BadGateway { message, .. }
            | AppError::NotFound { message } => message,
        };

        if status.is_server_error() {
            warn!(%status, kind, %message, "Request failed");
        } else {
            debug!(%status, kind, %message, data_incomplete, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: message,
            kind,
            data_incomplete,
        });
        (status, body).into_response()
    }
}
