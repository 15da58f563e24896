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
    Extension, Json,
    extract::{Path, Query},
};
use kube::ResourceExt;
use snafu::ResultExt;

use crate::console::{
    error::{self, Error, Result},
    middleware::credentials::Credentials,
    models::pdb::*,
};
use crate::pdb::{self, PdbMatch, PdbStatusSummary};
use crate::types::workload::{Workload, WorkloadKind};

/// PDB panel of a workload: the PDB covering its pods, conflicting PDBs and
/// the actions the caller is allowed to take
pub async fn get_workload_pdb(
    Path((namespace, kind, name)): Path<(String, String, String)>,
    Query(query): Query<ActionsQuery>,
    Extension(credentials): Extension<Credentials>,
) -> Result<Json<WorkloadPdbResponse>> {
    let kind: WorkloadKind = kind.parse()?;

    let ctx = credentials.context().await?;
    let workload = ctx
        .get_workload(kind, &name, &namespace)
        .await
        .context(error::ContextSnafu)?
        .ok_or_else(|| Error::NotFound {
            resource: format!("{}/{}/{}", kind, namespace, name),
        })?;

    let pdbs = ctx.list_pdbs(&namespace).await.context(error::ContextSnafu)?;
    let matched = pdb::resolve_pdb_match(&pdbs, &workload);
    let resolved = matched.as_ref().map(|m| m.pdb);

    let pdb_name = resolved.map(|p| p.name_any());
    let verbs = ctx
        .review_capabilities(&namespace, pdb_name.as_deref())
        .await
        .context(error::ContextSnafu)?;

    let filter = query.filter();
    let mut actions = pdb::derive_pdb_actions(&workload, resolved, &verbs, filter.as_deref());
    actions.retain(|action| action.allowed);

    let form = match resolved {
        Some(p) => pdb::initial_values_from_k8s_resource(p),
        None => pdb::initial_values_for_workload(&workload),
    };

    Ok(Json(WorkloadPdbResponse {
        workload: WorkloadRef {
            kind: workload.kind().to_owned(),
            name,
            namespace,
        },
        pdb: resolved.map(PdbStatusSummary::from),
        warning: matched.as_ref().and_then(conflict_warning),
        conflicts: matched.map(|m| m.conflicts).unwrap_or_default(),
        actions,
        form,
    }))
}

fn conflict_warning(matched: &PdbMatch<'_>) -> Option<String> {
    if !matched.is_ambiguous() {
        return None;
    }

    Some(format!(
        "pods are selected by more than one PodDisruptionBudget: {} and {}; \
         eviction requests will fail",
        matched.pdb.name_any(),
        matched.conflicts.join(", ")
    ))
}
