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

use crate::types::form::form_value;
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use kube::ResourceExt;
use serde::Serialize;

pub const DISRUPTION_ALLOWED: &str = "DisruptionAllowed";

/// A PDB is violated when the cluster reports `DisruptionAllowed=False`.
///
/// A missing condition, `True` or `Unknown` is not a violation.
pub fn is_disruption_violated(pdb: &PodDisruptionBudget) -> bool {
    pdb.status
        .as_ref()
        .and_then(|status| status.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == DISRUPTION_ALLOWED && c.status == "False")
        })
}

/// Violated PDBs in a namespace. `name` is only present when exactly one PDB
/// is violated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ViolationSummary {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Counts the PDBs that are violated and protect at least one pod. PDBs
/// without status or with no expected pods do not apply yet.
pub fn check_pod_disruption_budgets(pdbs: &[PodDisruptionBudget]) -> ViolationSummary {
    let violated: Vec<&PodDisruptionBudget> = pdbs
        .iter()
        .filter(|pdb| {
            is_disruption_violated(pdb)
                && pdb
                    .status
                    .as_ref()
                    .is_some_and(|status| status.expected_pods > 0)
        })
        .collect();

    match violated.as_slice() {
        [only] => ViolationSummary {
            count: 1,
            name: Some(only.name_any()),
        },
        rest => ViolationSummary {
            count: rest.len(),
            name: None,
        },
    }
}

/// Numbers shown on the PDB detail view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdbStatusSummary {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_available: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<String>,
    pub current_healthy: i32,
    pub desired_healthy: i32,
    pub expected_pods: i32,
    pub disruptions_allowed: i32,
    pub violated: bool,
}

impl From<&PodDisruptionBudget> for PdbStatusSummary {
    fn from(pdb: &PodDisruptionBudget) -> Self {
        let spec = pdb.spec.as_ref();
        let mut summary = Self {
            name: pdb.name_any(),
            namespace: pdb.namespace().unwrap_or_default(),
            min_available: spec
                .and_then(|s| s.min_available.as_ref())
                .map(form_value),
            max_unavailable: spec
                .and_then(|s| s.max_unavailable.as_ref())
                .map(form_value),
            violated: is_disruption_violated(pdb),
            ..Default::default()
        };

        if let Some(status) = &pdb.status {
            summary.current_healthy = status.current_healthy;
            summary.desired_healthy = status.desired_healthy;
            summary.expected_pods = status.expected_pods;
            summary.disruptions_allowed = status.disruptions_allowed;
        }

        summary
    }
}
