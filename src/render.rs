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

use k8s_openapi::api::policy::v1::PodDisruptionBudget;

use crate::pdb;
use crate::types::error::Error;
use crate::types::form::FormValues;

/// Renders form values offline.
///
/// Without `patch` the result is the PDB as YAML, built on top of `existing`
/// when given. With `patch` it is the JSON Patch that turns `existing` into
/// that PDB.
pub fn render_form(
    form_json: &str,
    existing_yaml: Option<&str>,
    patch: bool,
) -> Result<String, Error> {
    let values: FormValues = serde_json::from_str(form_json)?;
    let existing: Option<PodDisruptionBudget> = existing_yaml
        .map(serde_yaml_ng::from_str)
        .transpose()?;

    if patch {
        let existing = existing.ok_or(Error::NoExistingPdb)?;
        let ops = pdb::pdb_patch(&values, &existing);
        return Ok(serde_json::to_string_pretty(&ops)?);
    }

    let resource = pdb::pdb_to_k8s_resource(&values, existing.as_ref());
    Ok(serde_yaml_ng::to_string(&resource)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"{
        "name": "web-pdb",
        "namespace": "default",
        "requirement": "maxUnavailable",
        "maxUnavailable": 1,
        "selector": { "matchLabels": { "app": "web" } }
    }"#;

    const EXISTING: &str = r#"
apiVersion: policy/v1
kind: PodDisruptionBudget
metadata:
  name: web-pdb
  namespace: default
spec:
  minAvailable: 2
  selector:
    matchLabels:
      app: web
"#;

    #[test]
    fn test_render_resource() {
        let yaml = render_form(FORM, None, false).unwrap();
        let pdb: PodDisruptionBudget = serde_yaml_ng::from_str(&yaml).unwrap();
        let spec = pdb.spec.unwrap();

        assert_eq!(pdb.metadata.name.as_deref(), Some("web-pdb"));
        assert_eq!(
            spec.max_unavailable,
            Some(k8s_openapi::apimachinery::pkg::util::intstr::IntOrString::Int(1))
        );
        assert_eq!(spec.min_available, None);
    }

    #[test]
    fn test_render_patch_switches_requirement() {
        let json = render_form(FORM, Some(EXISTING), true).unwrap();
        let ops: serde_json::Value = serde_json::from_str(&json).unwrap();
        let ops = ops.as_array().unwrap();

        assert!(ops.iter().any(|op| op["op"] == "remove" && op["path"] == "/spec/minAvailable"));
        assert!(ops.iter().any(|op| op["op"] == "add"
            && op["path"] == "/spec/maxUnavailable"
            && op["value"] == 1));
    }

    #[test]
    fn test_patch_needs_existing() {
        assert!(matches!(render_form(FORM, None, true), Err(Error::NoExistingPdb)));
    }

    #[test]
    fn test_invalid_form() {
        assert!(matches!(
            render_form("{", None, false),
            Err(Error::SerdeJson { .. })
        ));
    }
}
