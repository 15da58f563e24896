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

use crate::config::ConsoleConfig;
use crate::context::Context;
use crate::pdb::{PdbStatusSummary, ViolationSummary};
use crate::types::workload::{Workload, WorkloadKind};
use futures::StreamExt;
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use kube::ResourceExt;
use kube::runtime::{WatchStreamExt, reflector, watcher};
use kube::{Api, Client};
use serde::Serialize;
use std::pin::Pin;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod console;
pub mod context;
pub mod pdb;
pub mod render;
pub mod types;


/// Installs the fmt subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();
}

/// Runs the HTTP console.
pub async fn run(config: ConsoleConfig) -> Result<(), Box<dyn std::error::Error>> {
    console::server::run(config).await
}

/// Prints the violation summary of `namespace`.
pub async fn violations(namespace: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::infer(None).await?;
    let pdbs = ctx.list_pdbs(namespace).await?;

    let summary = pdb::check_pod_disruption_budgets(&pdbs);
    write_output(None, &serde_json::to_string_pretty(&summary)?).await
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolution {
    kind: String,
    name: String,
    namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pdb: Option<PdbStatusSummary>,
    conflicts: Vec<String>,
    actions: Vec<pdb::PdbAction>,
}

/// Prints the PDB covering a workload, conflicting PDBs and the actions the
/// current identity may take.
pub async fn resolve(
    namespace: &str,
    kind: &str,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: WorkloadKind = kind.parse()?;
    let ctx = Context::infer(None).await?;

    let Some(workload) = ctx.get_workload(kind, name, namespace).await? else {
        return Err(format!("{} {}/{} not found", kind, namespace, name).into());
    };

    let pdbs = ctx.list_pdbs(namespace).await?;
    let matched = pdb::resolve_pdb_match(&pdbs, &workload);
    let resolved = matched.as_ref().map(|m| m.pdb);

    if let Some(m) = matched.as_ref().filter(|m| m.is_ambiguous()) {
        warn!(
            "{} {} is selected by {} and also by {:?}",
            kind,
            name,
            m.pdb.name_any(),
            m.conflicts
        );
    }

    let pdb_name = resolved.map(|p| p.name_any());
    let verbs = ctx
        .review_capabilities(namespace, pdb_name.as_deref())
        .await?;

    let resolution = Resolution {
        kind: workload.kind().to_owned(),
        name: name.to_owned(),
        namespace: namespace.to_owned(),
        pdb: resolved.map(PdbStatusSummary::from),
        actions: pdb::derive_pdb_actions(&workload, resolved, &verbs, None),
        conflicts: matched.map(|m| m.conflicts).unwrap_or_default(),
    };

    write_output(None, &serde_json::to_string_pretty(&resolution)?).await
}

/// Renders a form file as a PDB manifest or, with `patch`, as a JSON Patch
/// against `existing`.
pub async fn render(
    file: &str,
    existing: Option<&str>,
    patch: bool,
    output: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let form = tokio::fs::read_to_string(file).await?;
    let existing = match existing {
        Some(path) => Some(tokio::fs::read_to_string(path).await?),
        None => None,
    };

    let rendered = render::render_form(&form, existing.as_deref(), patch)?;
    write_output(output, &rendered).await
}

/// Keeps a reflector store of the PDBs in `namespace` and logs the violation
/// summary whenever it changes. Stops on Ctrl-C.
pub async fn watch(namespace: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::try_default().await?;
    let api: Api<PodDisruptionBudget> = Api::namespaced(client, namespace);

    let (reader, writer) = reflector::store();
    let mut stream = reflector(writer, watcher(api, watcher::Config::default()))
        .default_backoff()
        .boxed();

    info!("watching PodDisruptionBudgets in {}", namespace);

    let mut last: Option<ViolationSummary> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("watch stopped");
                break;
            }
            event = stream.next() => {
                match event {
                    Some(Ok(watcher::Event::Init | watcher::Event::InitApply(_))) => {}
                    Some(Ok(_)) => {
                        let pdbs: Vec<PodDisruptionBudget> =
                            reader.state().iter().map(|pdb| pdb.as_ref().clone()).collect();
                        let summary = pdb::check_pod_disruption_budgets(&pdbs);

                        if last.as_ref() != Some(&summary) {
                            info!(
                                count = summary.count,
                                name = summary.name.as_deref().unwrap_or_default(),
                                "violated PodDisruptionBudgets in {}",
                                namespace
                            );
                            last = Some(summary);
                        }
                    }
                    Some(Err(e)) => error!(error = %e, "PodDisruptionBudget watcher error"),
                    None => {
                        warn!("PodDisruptionBudget watcher stream ended");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

async fn write_output(
    file: Option<String>,
    content: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer: Pin<Box<dyn AsyncWrite + Send>> = if let Some(file) = file {
        Box::pin(
            tokio::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(file)
                .await?,
        )
    } else {
        Box::pin(tokio::io::stdout())
    };

    writer.write_all(content.as_bytes()).await?;
    if !content.ends_with('\n') {
        writer.write_all(b"\n").await?;
    }
    writer.flush().await?;

    Ok(())
}
