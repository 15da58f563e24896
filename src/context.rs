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

use crate::pdb::{self, AccessReview, AllowedVerbs, PdbActionCreator};
use crate::types;
use crate::types::error::NoNamespaceSnafu;
use crate::types::form::FormValues;
use crate::types::workload::{AnyWorkload, WorkloadKind};
use futures::future::try_join_all;
use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::api::apps::v1 as appsv1;
use k8s_openapi::api::authorization::v1 as authv1;
use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams, PostParams};
use kube::{Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use snafu::futures::TryFutureExt;
use snafu::{OptionExt, ResultExt, Snafu};
use std::fmt::Debug;
use tracing::{debug, info};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to load kubeconfig: {}", source))]
    Kubeconfig {
        source: kube::config::InferConfigError,
    },

    #[snafu(display("failed to create Kubernetes client: {}", source))]
    CreateClient { source: kube::Error },

    #[snafu(display("Kubernetes API error: {}", source))]
    Kube { source: kube::Error },

    #[snafu(display("access review error: {}", source))]
    AccessReviewFailed { source: kube::Error },

    #[snafu(transparent)]
    Types { source: types::error::Error },
}

/// Kubernetes access used by the console, bound to one identity.
#[derive(Clone)]
pub struct Context {
    pub(crate) client: kube::Client,
}

impl Context {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    /// Builds a context from the inferred kubeconfig. A bearer `token`, when
    /// given, replaces the configured credentials so requests run as the caller.
    pub async fn infer(token: Option<&str>) -> Result<Self, Error> {
        let mut config = kube::Config::infer().await.context(KubeconfigSnafu)?;

        if let Some(token) = token {
            config.auth_info.token = Some(token.to_owned().into());
        }

        let client = kube::Client::try_from(config).context(CreateClientSnafu)?;
        Ok(Self::new(client))
    }

    pub async fn get_opt<T>(&self, name: &str, namespace: &str) -> Result<Option<T>, Error>
    where
        T: Clone + DeserializeOwned + Debug + Resource<Scope = NamespaceResourceScope>,
        <T as kube::Resource>::DynamicType: Default,
    {
        let api: Api<T> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name).context(KubeSnafu).await
    }

    pub async fn list<T>(&self, namespace: &str) -> Result<Vec<T>, Error>
    where
        T: Clone + DeserializeOwned + Debug + Resource<Scope = NamespaceResourceScope>,
        <T as kube::Resource>::DynamicType: Default,
    {
        let api: Api<T> = Api::namespaced(self.client.clone(), namespace);
        Ok(api
            .list(&ListParams::default())
            .context(KubeSnafu)
            .await?
            .items)
    }

    pub async fn create<T>(&self, resource: &T, namespace: &str) -> Result<T, Error>
    where
        T: Clone + Serialize + DeserializeOwned + Debug + Resource<Scope = NamespaceResourceScope>,
        <T as kube::Resource>::DynamicType: Default,
    {
        let api: Api<T> = Api::namespaced(self.client.clone(), namespace);
        api.create(&PostParams::default(), resource)
            .context(KubeSnafu)
            .await
    }

    pub async fn delete<T>(&self, name: &str, namespace: &str) -> Result<(), Error>
    where
        T: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        <T as kube::Resource>::DynamicType: Default,
    {
        let api: Api<T> = Api::namespaced(self.client.clone(), namespace);
        api.delete(name, &DeleteParams::default())
            .context(KubeSnafu)
            .await?;
        Ok(())
    }

    /// PodDisruptionBudgets of a namespace, in the order the API server lists them.
    pub async fn list_pdbs(&self, namespace: &str) -> Result<Vec<PodDisruptionBudget>, Error> {
        self.list::<PodDisruptionBudget>(namespace).await
    }

    pub async fn get_pdb(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<PodDisruptionBudget>, Error> {
        self.get_opt::<PodDisruptionBudget>(name, namespace).await
    }

    pub async fn get_workload(
        &self,
        kind: WorkloadKind,
        name: &str,
        namespace: &str,
    ) -> Result<Option<AnyWorkload>, Error> {
        Ok(match kind {
            WorkloadKind::Deployment => self
                .get_opt::<appsv1::Deployment>(name, namespace)
                .await?
                .map(AnyWorkload::Deployment),
            WorkloadKind::StatefulSet => self
                .get_opt::<appsv1::StatefulSet>(name, namespace)
                .await?
                .map(AnyWorkload::StatefulSet),
            WorkloadKind::DaemonSet => self
                .get_opt::<appsv1::DaemonSet>(name, namespace)
                .await?
                .map(AnyWorkload::DaemonSet),
            WorkloadKind::Pod => self
                .get_opt::<corev1::Pod>(name, namespace)
                .await?
                .map(AnyWorkload::Pod),
        })
    }

    /// Creates the PDB described by `values` in `values.namespace`.
    pub async fn create_pdb(&self, values: &FormValues) -> Result<PodDisruptionBudget, Error> {
        if values.namespace.is_empty() {
            return Err(types::error::Error::NoNamespace.into());
        }
        if values.name.is_empty() {
            return Err(types::error::Error::NoName.into());
        }

        let pdb = pdb::pdb_to_k8s_resource(values, None);
        let created = self.create(&pdb, &values.namespace).await?;
        info!(
            "created PodDisruptionBudget {}/{}",
            values.namespace,
            created.name_any()
        );
        Ok(created)
    }

    /// Updates `existing` to match `values` with a single JSON Patch request.
    pub async fn patch_pdb(
        &self,
        values: &FormValues,
        existing: &PodDisruptionBudget,
    ) -> Result<PodDisruptionBudget, Error> {
        let namespace = existing.namespace().context(NoNamespaceSnafu)?;
        let name = existing.name_any();
        let patch = pdb::pdb_patch(values, existing);

        if patch.0.is_empty() {
            debug!("nothing to patch on PodDisruptionBudget {}/{}", namespace, name);
            return Ok(existing.clone());
        }

        debug!(
            "patching PodDisruptionBudget {}/{} with {} operations",
            namespace,
            name,
            patch.0.len()
        );

        let api: Api<PodDisruptionBudget> = Api::namespaced(self.client.clone(), &namespace);
        let patched = api
            .patch(&name, &PatchParams::default(), &Patch::Json::<()>(patch))
            .context(KubeSnafu)
            .await?;

        info!("patched PodDisruptionBudget {}/{}", namespace, name);
        Ok(patched)
    }

    pub async fn delete_pdb(&self, name: &str, namespace: &str) -> Result<(), Error> {
        self.delete::<PodDisruptionBudget>(name, namespace).await?;
        info!("deleted PodDisruptionBudget {}/{}", namespace, name);
        Ok(())
    }

    /// Asks the API server whether the current identity may perform `review`.
    pub async fn access_review(&self, review: &AccessReview) -> Result<bool, Error> {
        let request = authv1::SelfSubjectAccessReview {
            spec: authv1::SelfSubjectAccessReviewSpec {
                resource_attributes: Some(authv1::ResourceAttributes {
                    group: Some(review.group.clone()),
                    resource: Some(review.resource.clone()),
                    verb: Some(review.verb.clone()),
                    namespace: Some(review.namespace.clone()),
                    name: review.name.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let api: Api<authv1::SelfSubjectAccessReview> = Api::all(self.client.clone());
        let response = api
            .create(&PostParams::default(), &request)
            .context(AccessReviewFailedSnafu)
            .await?;

        let allowed = response.status.is_some_and(|s| s.allowed);
        debug!(
            "access review {} {}/{} in {}: {}",
            review.verb, review.group, review.resource, review.namespace, allowed
        );
        Ok(allowed)
    }

    /// Reviews the verbs the actions for a workload are gated by. Only verbs
    /// relevant to whether a PDB exists are checked.
    pub async fn review_capabilities(
        &self,
        namespace: &str,
        pdb_name: Option<&str>,
    ) -> Result<AllowedVerbs, Error> {
        let reviews: Vec<AccessReview> = PdbActionCreator::available(pdb_name.is_some())
            .iter()
            .map(|creator| AccessReview::pdb(creator.verb(), namespace, pdb_name))
            .collect();

        let answers = try_join_all(reviews.iter().map(|review| self.access_review(review))).await?;

        Ok(AllowedVerbs::new(
            reviews
                .iter()
                .zip(answers)
                .filter(|(_, allowed)| *allowed)
                .map(|(review, _)| review.verb.clone()),
        ))
    }
}
