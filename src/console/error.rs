// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;

use crate::{context, types};

/// Console API errors
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Not found: {}", resource))]
    NotFound { resource: String },

    #[snafu(display("Missing bearer token"))]
    Unauthorized,

    #[snafu(display("Bad request: {}", message))]
    BadRequest { message: String },

    #[snafu(display("{}", source))]
    Context { source: context::Error },
}

impl From<types::error::Error> for Error {
    fn from(source: types::error::Error) -> Self {
        Error::BadRequest {
            message: source.to_string(),
        }
    }
}

/// Error body returned by the API
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match &self {
            Error::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NotFound",
                format!("Resource not found: {}", resource),
                None,
            ),
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "an Authorization: Bearer token is required".to_string(),
                None,
            ),
            Error::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "BadRequest", message.clone(), None)
            }
            Error::Context {
                source:
                    context::Error::Kube {
                        source: kube::Error::Api(api_error),
                    },
            } => (
                StatusCode::from_u16(api_error.code).unwrap_or(StatusCode::BAD_GATEWAY),
                "KubeApiError",
                api_error.message.clone(),
                None,
            ),
            Error::Context {
                source: context::Error::Types { source },
            } => (StatusCode::BAD_REQUEST, "BadRequest", source.to_string(), None),
            Error::Context { source } => (
                StatusCode::BAD_GATEWAY,
                "KubeApiError",
                "Kubernetes API error".to_string(),
                Some(source.to_string()),
            ),
        };

        if status.is_server_error() {
            tracing::warn!("console request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type for Console API
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let not_found = Error::NotFound {
            resource: "poddisruptionbudgets/web".to_owned(),
        }
        .into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let unauthorized = Error::Unauthorized.into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let bad_request: Error = types::error::Error::NoNamespace.into();
        assert_eq!(bad_request.into_response().status(), StatusCode::BAD_REQUEST);

        let no_namespace = Error::Context {
            source: context::Error::Types {
                source: types::error::Error::NoNamespace,
            },
        };
        assert_eq!(no_namespace.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
