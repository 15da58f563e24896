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

use axum::{extract::Request, middleware::Next, response::Response};
use http::{HeaderMap, header};
use snafu::{OptionExt, ResultExt};

use crate::console::error::{self, Result};
use crate::context::Context;

/// Bearer token of the caller. Every Kubernetes request made on behalf of an
/// API call runs as this identity.
#[derive(Clone, Debug)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Kubernetes context bound to this identity.
    pub async fn context(&self) -> Result<Context> {
        Context::infer(Some(&self.token))
            .await
            .context(error::ContextSnafu)
    }
}

/// Injects the caller's [`Credentials`] into the request extensions.
///
/// Health probes are public. Any other request without a bearer token is
/// rejected with 401.
pub async fn credentials_middleware(mut request: Request, next: Next) -> Result<Response> {
    let path = request.uri().path();
    if path == "/healthz" || path == "/readyz" {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers()).context(error::UnauthorizedSnafu)?;
    request.extensions_mut().insert(Credentials { token });

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_owned())
    } else {
        None
    }
}
