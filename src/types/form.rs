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

//! Form value model used by the create/edit PodDisruptionBudget forms.

use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_AVAILABLE: &str = "minAvailable";
pub const MAX_UNAVAILABLE: &str = "maxUnavailable";

/// Discriminator value the form sends while no budget field is chosen.
pub const REQUIREMENT_UNSET: &str = "Requirement";

/// The disruption budget chosen in the form.
///
/// `minAvailable` and `maxUnavailable` are mutually exclusive on a
/// PodDisruptionBudget, so only one value can ever be carried.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub enum Requirement {
    #[default]
    Unset,
    MinAvailable(String),
    MaxUnavailable(String),
}

impl Requirement {
    /// Builds the requirement from the flat form fields. Only the value of the
    /// selected branch is kept.
    pub fn from_parts(requirement: &str, min_available: String, max_unavailable: String) -> Self {
        match requirement {
            MIN_AVAILABLE => Requirement::MinAvailable(min_available),
            MAX_UNAVAILABLE => Requirement::MaxUnavailable(max_unavailable),
            _ => Requirement::Unset,
        }
    }

    /// PDB spec field name, `None` while unset.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Requirement::Unset => None,
            Requirement::MinAvailable(_) => Some(MIN_AVAILABLE),
            Requirement::MaxUnavailable(_) => Some(MAX_UNAVAILABLE),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Requirement::Unset => None,
            Requirement::MinAvailable(v) | Requirement::MaxUnavailable(v) => Some(v),
        }
    }

    pub fn min_available(&self) -> &str {
        match self {
            Requirement::MinAvailable(v) => v,
            _ => "",
        }
    }

    pub fn max_unavailable(&self) -> &str {
        match self {
            Requirement::MaxUnavailable(v) => v,
            _ => "",
        }
    }
}

/// Values edited by the PodDisruptionBudget form.
///
/// Serialized flat (`requirement`, `minAvailable`, `maxUnavailable`) for
/// clients, held as a [`Requirement`] in memory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFormValues", into = "RawFormValues")]
pub struct FormValues {
    pub name: String,
    pub namespace: String,
    pub requirement: Requirement,
    pub selector: metav1::LabelSelector,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawFormValues {
    name: String,
    namespace: String,
    requirement: String,
    #[serde(deserialize_with = "deserialize_form_scalar")]
    min_available: String,
    #[serde(deserialize_with = "deserialize_form_scalar")]
    max_unavailable: String,
    selector: metav1::LabelSelector,
}

impl From<RawFormValues> for FormValues {
    fn from(raw: RawFormValues) -> Self {
        Self {
            name: raw.name,
            namespace: raw.namespace,
            requirement: Requirement::from_parts(
                &raw.requirement,
                raw.min_available,
                raw.max_unavailable,
            ),
            selector: raw.selector,
        }
    }
}

impl From<FormValues> for RawFormValues {
    fn from(values: FormValues) -> Self {
        Self {
            requirement: values
                .requirement
                .field()
                .unwrap_or(REQUIREMENT_UNSET)
                .to_owned(),
            min_available: values.requirement.min_available().to_owned(),
            max_unavailable: values.requirement.max_unavailable().to_owned(),
            name: values.name,
            namespace: values.namespace,
            selector: values.selector,
        }
    }
}

// clients send budgets either as numbers or as strings
fn deserialize_form_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IntOrString>::deserialize(deserializer)?
        .map(|v| form_value(&v))
        .unwrap_or_default())
}

/// Conversion into the Kubernetes `IntOrString` wire convention.
pub trait IntoIntOrString {
    fn into_int_or_string(self) -> IntOrString;
}

impl IntoIntOrString for &str {
    fn into_int_or_string(self) -> IntOrString {
        if self.is_empty() || !self.bytes().all(|b| b.is_ascii_digit()) {
            return IntOrString::String(self.to_owned());
        }

        match self.parse::<i32>() {
            Ok(i) => IntOrString::Int(i),
            Err(_) => IntOrString::String(self.to_owned()),
        }
    }
}

impl IntoIntOrString for &String {
    fn into_int_or_string(self) -> IntOrString {
        self.as_str().into_int_or_string()
    }
}

impl IntoIntOrString for String {
    fn into_int_or_string(self) -> IntOrString {
        self.as_str().into_int_or_string()
    }
}

impl IntoIntOrString for i32 {
    fn into_int_or_string(self) -> IntOrString {
        IntOrString::Int(self)
    }
}

impl IntoIntOrString for IntOrString {
    fn into_int_or_string(self) -> IntOrString {
        self
    }
}

/// Numeric strings become integers, everything else (`"50%"`, `""`) stays a string.
pub fn int_or_string(value: impl IntoIntOrString) -> IntOrString {
    value.into_int_or_string()
}

/// Renders an `IntOrString` the way the form displays it.
pub fn form_value(value: &IntOrString) -> String {
    match value {
        IntOrString::Int(i) => i.to_string(),
        IntOrString::String(s) => s.clone(),
    }
}
