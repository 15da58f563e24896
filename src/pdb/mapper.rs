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

//! Mapping between [`FormValues`] and PodDisruptionBudget resources.
//!
//! All functions here are pure and total: malformed input degrades to empty
//! values instead of failing.

use super::selector::selector_for_labels;
use crate::types::form::{FormValues, Requirement, form_value, int_or_string};
use crate::types::workload::Workload;
use json_patch::{AddOperation, Patch, PatchOperation, RemoveOperation};
use jsonptr::PointerBuf;
use k8s_openapi::api::policy::v1 as policyv1;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use serde::Serialize;

/// Form values for editing an existing PDB.
pub fn initial_values_from_k8s_resource(pdb: &policyv1::PodDisruptionBudget) -> FormValues {
    let spec = pdb.spec.as_ref();

    let requirement = match spec {
        Some(policyv1::PodDisruptionBudgetSpec {
            min_available: Some(min),
            ..
        }) => Requirement::MinAvailable(form_value(min)),
        Some(policyv1::PodDisruptionBudgetSpec {
            max_unavailable: Some(max),
            ..
        }) => Requirement::MaxUnavailable(form_value(max)),
        _ => Requirement::Unset,
    };

    FormValues {
        name: pdb.metadata.name.clone().unwrap_or_default(),
        namespace: pdb.metadata.namespace.clone().unwrap_or_default(),
        requirement,
        selector: spec
            .and_then(|s| s.selector.clone())
            .unwrap_or_default(),
    }
}

/// Form values for adding a PDB to a workload, pre-seeded with the labels of
/// the workload's pods.
pub fn initial_values_for_workload<W>(workload: &W) -> FormValues
where
    W: Workload + ?Sized,
{
    FormValues {
        name: String::new(),
        namespace: workload.metadata().namespace.clone().unwrap_or_default(),
        requirement: Requirement::Unset,
        selector: selector_for_labels(workload.pod_labels()),
    }
}

/// Builds the PDB described by the form.
///
/// When a budget is chosen the existing resource is kept as the base, with
/// both budget fields cleared before the chosen one is set. Without a budget
/// only the selector is carried.
pub fn pdb_to_k8s_resource(
    values: &FormValues,
    existing: Option<&policyv1::PodDisruptionBudget>,
) -> policyv1::PodDisruptionBudget {
    let Some(budget) = values.requirement.value().map(int_or_string) else {
        return policyv1::PodDisruptionBudget {
            metadata: metav1::ObjectMeta {
                name: non_empty(&values.name),
                namespace: non_empty(&values.namespace),
                ..Default::default()
            },
            spec: Some(policyv1::PodDisruptionBudgetSpec {
                selector: Some(values.selector.clone()),
                ..Default::default()
            }),
            status: None,
        };
    };

    let mut pdb = existing.cloned().unwrap_or_default();
    pdb.status = None;
    if let Some(name) = non_empty(&values.name) {
        pdb.metadata.name = Some(name);
    }
    if let Some(namespace) = non_empty(&values.namespace) {
        pdb.metadata.namespace = Some(namespace);
    }

    let spec = pdb.spec.get_or_insert_with(Default::default);
    spec.min_available = None;
    spec.max_unavailable = None;
    spec.selector = Some(values.selector.clone());

    match values.requirement {
        Requirement::MinAvailable(_) => spec.min_available = Some(budget),
        Requirement::MaxUnavailable(_) => spec.max_unavailable = Some(budget),
        Requirement::Unset => {}
    }

    pdb
}

/// JSON Patch updating `existing` to match the form.
///
/// When the budget switches between `minAvailable` and `maxUnavailable` the
/// vacated field is removed before the new one is added, within the same
/// patch.
pub fn pdb_patch(values: &FormValues, existing: &policyv1::PodDisruptionBudget) -> Patch {
    let Some(existing_spec) = existing.spec.as_ref() else {
        let spec = pdb_to_k8s_resource(values, None).spec.unwrap_or_default();
        return Patch(vec![add(["spec"], to_json(&spec))]);
    };

    let mut ops = Vec::new();

    let match_labels = values
        .selector
        .match_labels
        .as_ref()
        .filter(|labels| !labels.is_empty());
    let match_expressions = values
        .selector
        .match_expressions
        .as_ref()
        .filter(|expressions| !expressions.is_empty());

    if existing_spec.selector.is_none() {
        if match_labels.is_some() || match_expressions.is_some() {
            let selector = metav1::LabelSelector {
                match_labels: match_labels.cloned(),
                match_expressions: match_expressions.cloned(),
            };
            ops.push(add(["spec", "selector"], to_json(&selector)));
        }
    } else {
        if let Some(labels) = match_labels {
            ops.push(add(["spec", "selector", "matchLabels"], to_json(labels)));
        }
        if let Some(expressions) = match_expressions {
            ops.push(add(
                ["spec", "selector", "matchExpressions"],
                to_json(expressions),
            ));
        }
    }

    match &values.requirement {
        Requirement::MinAvailable(v) if !v.is_empty() => {
            if existing_spec.max_unavailable.is_some() {
                ops.push(remove(["spec", "maxUnavailable"]));
            }
            ops.push(add(["spec", "minAvailable"], to_json(&int_or_string(v))));
        }
        Requirement::MaxUnavailable(v) if !v.is_empty() => {
            if existing_spec.min_available.is_some() {
                ops.push(remove(["spec", "minAvailable"]));
            }
            ops.push(add(["spec", "maxUnavailable"], to_json(&int_or_string(v))));
        }
        _ => {}
    }

    Patch(ops)
}

fn add<const N: usize>(path: [&str; N], value: serde_json::Value) -> PatchOperation {
    PatchOperation::Add(AddOperation {
        path: PointerBuf::from_tokens(path),
        value,
    })
}

fn remove<const N: usize>(path: [&str; N]) -> PatchOperation {
    PatchOperation::Remove(RemoveOperation {
        path: PointerBuf::from_tokens(path),
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_default()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{
        create_test_deployment, create_test_pdb, labels, with_disruption_status,
        with_max_unavailable, with_min_available,
    };
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
    use serde_json::json;

    fn form(requirement: Requirement) -> FormValues {
        FormValues {
            name: "web-pdb".to_owned(),
            namespace: "default".to_owned(),
            requirement,
            selector: selector_for_labels(labels([("app", "web")])),
        }
    }

    fn op_paths(patch: &Patch) -> Vec<(String, String)> {
        patch
            .0
            .iter()
            .map(|op| match op {
                PatchOperation::Add(a) => ("add".to_owned(), a.path.to_string()),
                PatchOperation::Remove(r) => ("remove".to_owned(), r.path.to_string()),
                other => ("other".to_owned(), format!("{other:?}")),
            })
            .collect()
    }

    #[test]
    fn test_initial_values_min_available() {
        let pdb = with_min_available(
            create_test_pdb("web-pdb", [("app", "web")]),
            IntOrString::Int(2),
        );
        let values = initial_values_from_k8s_resource(&pdb);

        assert_eq!(values.name, "web-pdb");
        assert_eq!(values.namespace, "default");
        assert_eq!(values.requirement, Requirement::MinAvailable("2".to_owned()));
        assert_eq!(values.selector, selector_for_labels(labels([("app", "web")])));
    }

    #[test]
    fn test_initial_values_max_unavailable_and_unset() {
        let pdb = with_max_unavailable(
            create_test_pdb("web-pdb", [("app", "web")]),
            IntOrString::String("25%".to_owned()),
        );
        assert_eq!(
            initial_values_from_k8s_resource(&pdb).requirement,
            Requirement::MaxUnavailable("25%".to_owned())
        );

        let bare = policyv1::PodDisruptionBudget::default();
        let values = initial_values_from_k8s_resource(&bare);
        assert_eq!(values, FormValues::default());
    }

    #[test]
    fn test_initial_values_for_workload_seeds_selector() {
        let deployment = create_test_deployment("web", [("app", "web"), ("tier", "fe")]);
        let values = initial_values_for_workload(&deployment);

        assert_eq!(values.namespace, "default");
        assert_eq!(values.requirement, Requirement::Unset);
        assert_eq!(
            values.selector.match_labels,
            Some(labels([("app", "web"), ("tier", "fe")]))
        );
    }

    #[test]
    fn test_round_trip_preserves_budget_and_selector() {
        for pdb in [
            with_min_available(create_test_pdb("a", [("app", "a")]), IntOrString::Int(3)),
            with_max_unavailable(
                create_test_pdb("b", [("app", "b")]),
                IntOrString::String("50%".to_owned()),
            ),
        ] {
            let rebuilt = pdb_to_k8s_resource(&initial_values_from_k8s_resource(&pdb), None);
            let (original, rebuilt) = (pdb.spec.unwrap(), rebuilt.spec.unwrap());

            assert_eq!(rebuilt.selector, original.selector);
            assert_eq!(rebuilt.min_available, original.min_available);
            assert_eq!(rebuilt.max_unavailable, original.max_unavailable);
        }
    }

    #[test]
    fn test_to_resource_keeps_fields_exclusive() {
        let existing = with_min_available(
            with_disruption_status(create_test_pdb("web-pdb", [("app", "old")]), "True", 2),
            IntOrString::Int(1),
        );
        let pdb = pdb_to_k8s_resource(
            &form(Requirement::MaxUnavailable("50%".to_owned())),
            Some(&existing),
        );
        let spec = pdb.spec.unwrap();

        assert_eq!(spec.min_available, None);
        assert_eq!(spec.max_unavailable, Some(IntOrString::String("50%".to_owned())));
        assert_eq!(spec.selector, Some(selector_for_labels(labels([("app", "web")]))));
        assert!(pdb.status.is_none());
    }

    #[test]
    fn test_to_resource_unset_requirement_omits_budget() {
        let existing = with_min_available(
            create_test_pdb("web-pdb", [("app", "web")]),
            IntOrString::Int(1),
        );
        let pdb = pdb_to_k8s_resource(&form(Requirement::Unset), Some(&existing));
        let spec = pdb.spec.unwrap();

        assert_eq!(spec.min_available, None);
        assert_eq!(spec.max_unavailable, None);
        assert!(spec.selector.is_some());

        let fresh = pdb_to_k8s_resource(&form(Requirement::Unset), None);
        let wire = serde_json::to_value(fresh).unwrap();
        assert_eq!(wire["kind"], "PodDisruptionBudget");
        assert_eq!(wire["apiVersion"], "policy/v1");
        assert_eq!(wire["metadata"]["name"], "web-pdb");
    }

    #[test]
    fn test_patch_switch_min_to_max_removes_before_adding() {
        let existing = with_min_available(
            create_test_pdb("web-pdb", [("app", "web")]),
            IntOrString::Int(2),
        );
        let patch = pdb_patch(&form(Requirement::MaxUnavailable("1".to_owned())), &existing);

        assert_eq!(
            op_paths(&patch),
            vec![
                ("add".to_owned(), "/spec/selector/matchLabels".to_owned()),
                ("remove".to_owned(), "/spec/minAvailable".to_owned()),
                ("add".to_owned(), "/spec/maxUnavailable".to_owned()),
            ]
        );

        let mut doc = serde_json::to_value(&existing).unwrap();
        json_patch::patch(&mut doc, &patch.0).unwrap();
        assert_eq!(doc["spec"]["maxUnavailable"], json!(1));
        assert!(doc["spec"].get("minAvailable").is_none());
    }

    #[test]
    fn test_patch_switch_max_to_min() {
        let existing = with_max_unavailable(
            create_test_pdb("web-pdb", [("app", "web")]),
            IntOrString::Int(1),
        );
        let patch = pdb_patch(&form(Requirement::MinAvailable("80%".to_owned())), &existing);

        let mut doc = serde_json::to_value(&existing).unwrap();
        json_patch::patch(&mut doc, &patch.0).unwrap();
        assert_eq!(doc["spec"]["minAvailable"], json!("80%"));
        assert!(doc["spec"].get("maxUnavailable").is_none());
    }

    #[test]
    fn test_patch_same_field_only_adds() {
        let existing = with_min_available(
            create_test_pdb("web-pdb", [("app", "web")]),
            IntOrString::Int(1),
        );
        let patch = pdb_patch(&form(Requirement::MinAvailable("3".to_owned())), &existing);

        assert_eq!(
            op_paths(&patch),
            vec![
                ("add".to_owned(), "/spec/selector/matchLabels".to_owned()),
                ("add".to_owned(), "/spec/minAvailable".to_owned()),
            ]
        );
    }

    #[test]
    fn test_patch_empty_values_emit_nothing() {
        let existing = with_min_available(
            create_test_pdb("web-pdb", [("app", "web")]),
            IntOrString::Int(1),
        );
        let values = FormValues {
            selector: metav1::LabelSelector::default(),
            ..form(Requirement::MaxUnavailable(String::new()))
        };
        assert!(pdb_patch(&values, &existing).0.is_empty());
    }

    #[test]
    fn test_patch_adds_whole_selector_when_missing() {
        let mut existing = create_test_pdb("web-pdb", []);
        if let Some(spec) = existing.spec.as_mut() {
            spec.selector = None;
        }
        let patch = pdb_patch(&form(Requirement::MinAvailable("1".to_owned())), &existing);

        let mut doc = serde_json::to_value(&existing).unwrap();
        json_patch::patch(&mut doc, &patch.0).unwrap();
        assert_eq!(doc["spec"]["selector"]["matchLabels"]["app"], "web");
        assert_eq!(doc["spec"]["minAvailable"], json!(1));
    }
}
