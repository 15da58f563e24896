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

//! PodDisruptionBudget resolution, violation evaluation, form mapping and
//! action derivation.

pub mod actions;
pub mod mapper;
pub mod resolver;
pub mod selector;
pub mod violation;

pub use actions::{
    AccessReview, ActionEffect, AllowedVerbs, Capabilities, PdbAction, PdbActionCreator,
    derive_pdb_actions,
};
pub use mapper::{
    initial_values_for_workload, initial_values_from_k8s_resource, pdb_patch,
    pdb_to_k8s_resource,
};
pub use resolver::{PdbMatch, resolve_pdb_for_workload, resolve_pdb_match};
pub use selector::{LabelSelectorExt, is_valid_label_name, selector_for_labels};
pub use violation::{
    PdbStatusSummary, ViolationSummary, check_pod_disruption_budgets, is_disruption_violated,
};
