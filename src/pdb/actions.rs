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

//! Contextual PodDisruptionBudget actions for a workload.

use crate::types::workload::Workload;
use k8s_openapi::Resource as _;
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use serde::Serialize;
use std::collections::BTreeSet;
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display, EnumString)]
pub enum PdbActionCreator {
    #[serde(rename = "AddPDB")]
    #[strum(serialize = "AddPDB")]
    AddPdb,

    #[serde(rename = "EditPDB")]
    #[strum(serialize = "EditPDB")]
    EditPdb,

    #[serde(rename = "DeletePDB")]
    #[strum(serialize = "DeletePDB")]
    DeletePdb,
}

impl PdbActionCreator {
    /// Creators that make sense with or without a PDB covering the workload.
    pub fn available(has_pdb: bool) -> &'static [PdbActionCreator] {
        if has_pdb {
            &[PdbActionCreator::EditPdb, PdbActionCreator::DeletePdb]
        } else {
            &[PdbActionCreator::AddPdb]
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            PdbActionCreator::AddPdb => "create",
            PdbActionCreator::EditPdb => "patch",
            PdbActionCreator::DeletePdb => "delete",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PdbActionCreator::AddPdb => "Add PodDisruptionBudget",
            PdbActionCreator::EditPdb => "Edit PodDisruptionBudget",
            PdbActionCreator::DeletePdb => "Delete PodDisruptionBudget",
        }
    }
}

/// Resource attributes of the access review an action is gated by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessReview {
    pub group: String,
    pub resource: String,
    pub verb: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AccessReview {
    pub fn pdb(verb: &str, namespace: &str, name: Option<&str>) -> Self {
        Self {
            group: PodDisruptionBudget::GROUP.to_owned(),
            resource: PodDisruptionBudget::URL_PATH_SEGMENT.to_owned(),
            verb: verb.to_owned(),
            namespace: namespace.to_owned(),
            name: name.map(str::to_owned),
        }
    }
}

/// Answers access reviews. Computing the answer is up to the implementor.
pub trait Capabilities {
    fn allows(&self, review: &AccessReview) -> bool;
}

impl<F> Capabilities for F
where
    F: Fn(&AccessReview) -> bool,
{
    fn allows(&self, review: &AccessReview) -> bool {
        self(review)
    }
}

/// Verbs already granted on PodDisruptionBudgets in one namespace.
#[derive(Clone, Debug, Default)]
pub struct AllowedVerbs(BTreeSet<String>);

impl AllowedVerbs {
    pub fn new<I, S>(verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(verbs.into_iter().map(Into::into).collect())
    }
}

impl Capabilities for AllowedVerbs {
    fn allows(&self, review: &AccessReview) -> bool {
        self.0.contains(&review.verb)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActionEffect {
    /// Open a form.
    Navigate { href: String },
    /// Ask for confirmation, then delete the PDB.
    ConfirmDelete { namespace: String, name: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdbAction {
    pub id: PdbActionCreator,
    pub label: String,
    pub effect: ActionEffect,
    pub access_review: AccessReview,
    pub allowed: bool,
}

/// Derives the PDB actions for `workload`.
///
/// Without a PDB the only action is AddPDB; with one it is EditPDB then
/// DeletePDB. `filter` narrows the set to the listed creators, in the listed
/// order. Unknown identifiers, creators that do not fit the current state and
/// creators missing the data they need are dropped.
pub fn derive_pdb_actions<W, C>(
    workload: &W,
    pdb: Option<&PodDisruptionBudget>,
    capabilities: &C,
    filter: Option<&[&str]>,
) -> Vec<PdbAction>
where
    W: Workload + ?Sized,
    C: Capabilities + ?Sized,
{
    let available = PdbActionCreator::available(pdb.is_some());

    let creators: Vec<PdbActionCreator> = match filter {
        Some(ids) => {
            let mut seen = BTreeSet::new();
            ids.iter()
                .filter_map(|id| id.parse::<PdbActionCreator>().ok())
                .filter(|creator| available.contains(creator))
                .filter(|creator| seen.insert(creator.to_string()))
                .collect()
        }
        None => available.to_vec(),
    };

    creators
        .into_iter()
        .filter_map(|creator| build_action(creator, workload, pdb))
        .map(|mut action| {
            action.allowed = capabilities.allows(&action.access_review);
            action
        })
        .collect()
}

fn build_action<W>(
    creator: PdbActionCreator,
    workload: &W,
    pdb: Option<&PodDisruptionBudget>,
) -> Option<PdbAction>
where
    W: Workload + ?Sized,
{
    let (effect, access_review) = match creator {
        PdbActionCreator::AddPdb => {
            let namespace = workload.namespace().ok()?;
            let name = workload.name()?;
            (
                ActionEffect::Navigate {
                    href: format!(
                        "/k8s/ns/{namespace}/{}/~new/form?name={name}&kind={}",
                        PodDisruptionBudget::URL_PATH_SEGMENT,
                        workload.kind()
                    ),
                },
                AccessReview::pdb(creator.verb(), namespace, None),
            )
        }
        PdbActionCreator::EditPdb | PdbActionCreator::DeletePdb => {
            let pdb = pdb?;
            let namespace = pdb.metadata.namespace.as_deref()?;
            let name = pdb.metadata.name.as_deref()?;
            let effect = if creator == PdbActionCreator::EditPdb {
                ActionEffect::Navigate {
                    href: format!(
                        "/k8s/ns/{namespace}/{}/{name}/form",
                        PodDisruptionBudget::URL_PATH_SEGMENT
                    ),
                }
            } else {
                ActionEffect::ConfirmDelete {
                    namespace: namespace.to_owned(),
                    name: name.to_owned(),
                }
            };
            (effect, AccessReview::pdb(creator.verb(), namespace, Some(name)))
        }
    };

    Some(PdbAction {
        id: creator,
        label: creator.label().to_owned(),
        effect,
        access_review,
        allowed: false,
    })
}
