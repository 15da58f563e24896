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

use axum::{Router, routing::get};

use crate::console::{handlers, state::AppState};

/// PodDisruptionBudget routes
pub fn pdb_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/namespaces/{namespace}/poddisruptionbudgets",
            get(handlers::pdb::list_pdbs).post(handlers::pdb::create_pdb),
        )
        .route(
            "/namespaces/{namespace}/poddisruptionbudgets/{name}",
            get(handlers::pdb::get_pdb)
                .patch(handlers::pdb::patch_pdb)
                .delete(handlers::pdb::delete_pdb),
        )
        .route(
            "/namespaces/{namespace}/violations",
            get(handlers::pdb::get_violations),
        )
}

/// Workload routes
pub fn workload_routes() -> Router<AppState> {
    Router::new().route(
        "/namespaces/{namespace}/workloads/{kind}/{name}/pdb",
        get(handlers::workloads::get_workload_pdb),
    )
}
