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

use clap::{Parser, Subcommand};
use pdb_console::config::ConsoleConfig;

shadow_rs::shadow!(build);

#[derive(Parser)]
#[command(name = "pdb-console")]
#[command(about = "PodDisruptionBudget console and CLI", long_about = None)]
#[command(version = build::PKG_VERSION, long_version = build::CLAP_LONG_VERSION)]
struct Cli {
    /// Default log filter, overridden by RUST_LOG
    #[arg(long, global = true, env = "PDB_CONSOLE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP console
    Server {
        #[command(flatten)]
        config: ConsoleConfig,
    },

    /// Print the violated PodDisruptionBudgets of a namespace
    Violations {
        #[arg(short, long, default_value = "default")]
        namespace: String,
    },

    /// Print the PodDisruptionBudget covering a workload and the actions on it
    Resolve {
        #[arg(short, long, default_value = "default")]
        namespace: String,

        /// Deployment, StatefulSet, DaemonSet or Pod
        #[arg(short, long)]
        kind: String,

        #[arg(long)]
        name: String,
    },

    /// Render form values as a PodDisruptionBudget manifest
    Render {
        /// Form values in JSON
        #[arg(short, long)]
        file: String,

        /// Existing PodDisruptionBudget in YAML to build on
        #[arg(short, long)]
        existing: Option<String>,

        /// Print the JSON Patch against --existing instead of the manifest
        #[arg(long, requires = "existing")]
        patch: bool,

        /// Optional output path. If not set, the output will be written to stdout.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Log the violation summary of a namespace as it changes
    Watch {
        #[arg(short, long, default_value = "default")]
        namespace: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    pdb_console::init_tracing(&cli.log_level);

    match cli.command {
        Commands::Server { config } => pdb_console::run(config).await?,
        Commands::Violations { namespace } => pdb_console::violations(&namespace).await?,
        Commands::Resolve {
            namespace,
            kind,
            name,
        } => pdb_console::resolve(&namespace, &kind, &name).await?,
        Commands::Render {
            file,
            existing,
            patch,
            output,
        } => pdb_console::render(&file, existing.as_deref(), patch, output).await?,
        Commands::Watch { namespace } => pdb_console::watch(&namespace).await?,
    }

    Ok(())
}
