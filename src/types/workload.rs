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

//! Workloads a PodDisruptionBudget can cover.

use crate::types;
use crate::types::error::{NoNamespaceSnafu, UnsupportedWorkloadKindSnafu};
use k8s_openapi::api::apps::v1 as appsv1;
use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use snafu::OptionExt;
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::Display;

/// Read-only view of a workload used to resolve its PodDisruptionBudget.
pub trait Workload {
    fn kind(&self) -> &'static str;

    fn metadata(&self) -> &metav1::ObjectMeta;

    /// Labels of the pod template, `None` for bare pods.
    fn template_labels(&self) -> Option<&BTreeMap<String, String>>;

    /// Labels the pods of this workload carry: the pod template labels, falling
    /// back to the object labels.
    fn pod_labels(&self) -> BTreeMap<String, String> {
        self.template_labels()
            .or(self.metadata().labels.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    fn name(&self) -> Option<&str> {
        self.metadata().name.as_deref()
    }

    fn namespace(&self) -> Result<&str, types::error::Error> {
        self.metadata().namespace.as_deref().context(NoNamespaceSnafu)
    }
}

macro_rules! templated_workload {
    ($ty:ty, $kind:literal) => {
        impl Workload for $ty {
            fn kind(&self) -> &'static str {
                $kind
            }

            fn metadata(&self) -> &metav1::ObjectMeta {
                &self.metadata
            }

            fn template_labels(&self) -> Option<&BTreeMap<String, String>> {
                self.spec
                    .as_ref()?
                    .template
                    .metadata
                    .as_ref()?
                    .labels
                    .as_ref()
            }
        }
    };
}

templated_workload!(appsv1::Deployment, "Deployment");
templated_workload!(appsv1::StatefulSet, "StatefulSet");
templated_workload!(appsv1::DaemonSet, "DaemonSet");

impl Workload for corev1::Pod {
    fn kind(&self) -> &'static str {
        "Pod"
    }

    fn metadata(&self) -> &metav1::ObjectMeta {
        &self.metadata
    }

    fn template_labels(&self) -> Option<&BTreeMap<String, String>> {
        None
    }
}

/// Workload kinds accepted by the console and CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Pod,
}

impl FromStr for WorkloadKind {
    type Err = types::error::Error;

    /// Accepts the kind or its resource name, singular or plural, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deployment" | "deployments" => Ok(WorkloadKind::Deployment),
            "statefulset" | "statefulsets" => Ok(WorkloadKind::StatefulSet),
            "daemonset" | "daemonsets" => Ok(WorkloadKind::DaemonSet),
            "pod" | "pods" => Ok(WorkloadKind::Pod),
            _ => UnsupportedWorkloadKindSnafu { kind: s }.fail(),
        }
    }
}

/// A workload fetched by kind at runtime.
#[derive(Clone, Debug)]
pub enum AnyWorkload {
    Deployment(appsv1::Deployment),
    StatefulSet(appsv1::StatefulSet),
    DaemonSet(appsv1::DaemonSet),
    Pod(corev1::Pod),
}

impl AnyWorkload {
    fn inner(&self) -> &dyn Workload {
        match self {
            AnyWorkload::Deployment(w) => w,
            AnyWorkload::StatefulSet(w) => w,
            AnyWorkload::DaemonSet(w) => w,
            AnyWorkload::Pod(w) => w,
        }
    }
}

impl Workload for AnyWorkload {
    fn kind(&self) -> &'static str {
        self.inner().kind()
    }

    fn metadata(&self) -> &metav1::ObjectMeta {
        self.inner().metadata()
    }

    fn template_labels(&self) -> Option<&BTreeMap<String, String>> {
        self.inner().template_labels()
    }
}
