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

use serde::{Deserialize, Serialize};

use crate::pdb::{PdbAction, PdbStatusSummary, ViolationSummary};
use crate::types::form::FormValues;

/// PDB list response
#[derive(Debug, Serialize)]
pub struct PdbListResponse {
    pub items: Vec<PdbStatusSummary>,
    pub violations: ViolationSummary,
}

/// PDB details: the edit form and the live status
#[derive(Debug, Serialize)]
pub struct PdbDetailsResponse {
    pub form: FormValues,
    pub status: PdbStatusSummary,
}

#[derive(Debug, Serialize)]
pub struct DeletePdbResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct WorkloadRef {
    pub kind: String,
    pub name: String,
    pub namespace: String,
}

/// Everything the workload detail page needs to render its PDB panel.
#[derive(Debug, Serialize)]
pub struct WorkloadPdbResponse {
    pub workload: WorkloadRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdb: Option<PdbStatusSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub actions: Vec<PdbAction>,
    /// Form for the resolved PDB, or a blank one seeded from the pod labels.
    pub form: FormValues,
}

/// `?actions=AddPDB,EditPDB` narrows the actions returned.
#[derive(Debug, Default, Deserialize)]
pub struct ActionsQuery {
    pub actions: Option<String>,
}

impl ActionsQuery {
    pub fn filter(&self) -> Option<Vec<&str>> {
        self.actions.as_deref().map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_query_filter() {
        let query = ActionsQuery {
            actions: Some("EditPDB, DeletePDB,,".to_owned()),
        };
        assert_eq!(query.filter(), Some(vec!["EditPDB", "DeletePDB"]));
        assert_eq!(ActionsQuery::default().filter(), None);
    }
}
