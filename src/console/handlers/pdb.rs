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

use axum::{Extension, Json, extract::Path, http::StatusCode};
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use snafu::ResultExt;

use crate::console::{
    error::{self, Error, Result},
    middleware::credentials::Credentials,
    models::pdb::*,
};
use crate::context::Context;
use crate::pdb::{self, PdbStatusSummary, ViolationSummary};
use crate::types::form::FormValues;

/// List the PDBs of a namespace with their status and the violation summary
pub async fn list_pdbs(
    Path(namespace): Path<String>,
    Extension(credentials): Extension<Credentials>,
) -> Result<Json<PdbListResponse>> {
    let ctx = credentials.context().await?;
    let pdbs = ctx.list_pdbs(&namespace).await.context(error::ContextSnafu)?;

    Ok(Json(PdbListResponse {
        items: pdbs.iter().map(PdbStatusSummary::from).collect(),
        violations: pdb::check_pod_disruption_budgets(&pdbs),
    }))
}

/// Create a PDB from form values
pub async fn create_pdb(
    Path(namespace): Path<String>,
    Extension(credentials): Extension<Credentials>,
    Json(mut values): Json<FormValues>,
) -> Result<(StatusCode, Json<PdbDetailsResponse>)> {
    scope_to_namespace(&mut values, &namespace)?;

    let ctx = credentials.context().await?;
    let created = ctx.create_pdb(&values).await.context(error::ContextSnafu)?;

    Ok((StatusCode::CREATED, Json(details(&created))))
}

/// Form values and status of one PDB
pub async fn get_pdb(
    Path((namespace, name)): Path<(String, String)>,
    Extension(credentials): Extension<Credentials>,
) -> Result<Json<PdbDetailsResponse>> {
    let ctx = credentials.context().await?;
    let pdb = fetch(&ctx, &namespace, &name).await?;

    Ok(Json(details(&pdb)))
}

/// Update a PDB from form values with a JSON Patch
pub async fn patch_pdb(
    Path((namespace, name)): Path<(String, String)>,
    Extension(credentials): Extension<Credentials>,
    Json(mut values): Json<FormValues>,
) -> Result<Json<PdbDetailsResponse>> {
    scope_to_namespace(&mut values, &namespace)?;

    let ctx = credentials.context().await?;
    let existing = fetch(&ctx, &namespace, &name).await?;
    let patched = ctx
        .patch_pdb(&values, &existing)
        .await
        .context(error::ContextSnafu)?;

    Ok(Json(details(&patched)))
}

pub async fn delete_pdb(
    Path((namespace, name)): Path<(String, String)>,
    Extension(credentials): Extension<Credentials>,
) -> Result<Json<DeletePdbResponse>> {
    let ctx = credentials.context().await?;
    ctx.delete_pdb(&name, &namespace)
        .await
        .context(error::ContextSnafu)?;

    Ok(Json(DeletePdbResponse {
        success: true,
        message: format!("PodDisruptionBudget {} deleted", name),
    }))
}

/// Violation summary of a namespace
pub async fn get_violations(
    Path(namespace): Path<String>,
    Extension(credentials): Extension<Credentials>,
) -> Result<Json<ViolationSummary>> {
    let ctx = credentials.context().await?;
    let pdbs = ctx.list_pdbs(&namespace).await.context(error::ContextSnafu)?;

    Ok(Json(pdb::check_pod_disruption_budgets(&pdbs)))
}

async fn fetch(ctx: &Context, namespace: &str, name: &str) -> Result<PodDisruptionBudget> {
    ctx.get_pdb(name, namespace)
        .await
        .context(error::ContextSnafu)?
        .ok_or_else(|| Error::NotFound {
            resource: format!("poddisruptionbudgets/{}/{}", namespace, name),
        })
}

fn details(pdb: &PodDisruptionBudget) -> PdbDetailsResponse {
    PdbDetailsResponse {
        form: pdb::initial_values_from_k8s_resource(pdb),
        status: PdbStatusSummary::from(pdb),
    }
}

/// The path namespace wins; a form naming another namespace is rejected.
fn scope_to_namespace(values: &mut FormValues, namespace: &str) -> Result<()> {
    if values.namespace.is_empty() {
        values.namespace = namespace.to_owned();
    }

    if values.namespace != namespace {
        return error::BadRequestSnafu {
            message: format!(
                "form namespace '{}' does not match '{}'",
                values.namespace, namespace
            ),
        }
        .fail();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_pdb, with_max_unavailable};
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

    #[test]
    fn test_scope_to_namespace() {
        let mut values = FormValues::default();
        scope_to_namespace(&mut values, "prod").unwrap();
        assert_eq!(values.namespace, "prod");

        let mut other = FormValues {
            namespace: "dev".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            scope_to_namespace(&mut other, "prod"),
            Err(Error::BadRequest { .. })
        ));
    }

    #[test]
    fn test_details_carries_form_and_status() {
        let pdb = with_max_unavailable(
            create_test_pdb("web-pdb", [("app", "web")]),
            IntOrString::Int(1),
        );
        let details = details(&pdb);

        assert_eq!(details.form.name, "web-pdb");
        assert_eq!(details.form.requirement.max_unavailable(), "1");
        assert_eq!(details.status.max_unavailable.as_deref(), Some("1"));
    }
}
