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

use super::selector::LabelSelectorExt;
use crate::types::workload::Workload;
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use kube::ResourceExt;
use std::collections::BTreeMap;
use tracing::debug;

/// A PDB selecting a workload, along with any other PDB in the namespace that
/// selects the same pods.
#[derive(Clone, Debug)]
pub struct PdbMatch<'a> {
    pub pdb: &'a PodDisruptionBudget,
    pub conflicts: Vec<String>,
}

impl PdbMatch<'_> {
    /// The workload is covered by more than one PDB.
    pub fn is_ambiguous(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Whether `pdb` selects pods carrying `labels`. A PDB without a selector
/// selects nothing.
pub fn selects(pdb: &PodDisruptionBudget, labels: &BTreeMap<String, String>) -> bool {
    pdb.spec
        .as_ref()
        .and_then(|spec| spec.selector.as_ref())
        .is_some_and(|selector| selector.matches(labels))
}

/// Returns the first PDB, in list order, whose selector covers the workload's
/// pods. `pdbs` must already be scoped to the workload's namespace.
pub fn resolve_pdb_for_workload<'a, W>(
    pdbs: &'a [PodDisruptionBudget],
    workload: &W,
) -> Option<&'a PodDisruptionBudget>
where
    W: Workload + ?Sized,
{
    let labels = workload.pod_labels();
    pdbs.iter().find(|pdb| selects(pdb, &labels))
}

/// Like [`resolve_pdb_for_workload`], and also reports every other PDB that
/// selects the workload. The first match is kept; no tie-break is attempted.
pub fn resolve_pdb_match<'a, W>(
    pdbs: &'a [PodDisruptionBudget],
    workload: &W,
) -> Option<PdbMatch<'a>>
where
    W: Workload + ?Sized,
{
    let labels = workload.pod_labels();
    let mut matching = pdbs.iter().filter(|pdb| selects(pdb, &labels));

    let pdb = matching.next()?;
    let conflicts: Vec<String> = matching.map(|other| other.name_any()).collect();

    if !conflicts.is_empty() {
        debug!(
            "{} {:?} is covered by {} and also by {:?}",
            workload.kind(),
            workload.name(),
            pdb.name_any(),
            conflicts
        );
    }

    Some(PdbMatch { pdb, conflicts })
}
