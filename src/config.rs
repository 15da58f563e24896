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

use clap::Args;

pub const DEFAULT_PORT: u16 = 9090;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Console server settings. Every flag falls back to a `PDB_CONSOLE_*`
/// environment variable.
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Port the HTTP console listens on
    #[arg(long, env = "PDB_CONSOLE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Origin allowed to call the API from a browser
    #[arg(long, env = "PDB_CONSOLE_ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConsoleConfig,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["pdb-console"]);
        // The environment may override defaults on a developer machine.
        if std::env::var_os("PDB_CONSOLE_PORT").is_none() {
            assert_eq!(cli.config.port, DEFAULT_PORT);
        }
        if std::env::var_os("PDB_CONSOLE_ALLOWED_ORIGIN").is_none() {
            assert_eq!(cli.config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
        }
    }

    #[test]
    fn test_flags_override() {
        let cli = TestCli::parse_from([
            "pdb-console",
            "--port",
            "8081",
            "--allowed-origin",
            "https://console.example.com",
        ]);
        assert_eq!(cli.config.port, 8081);
        assert_eq!(cli.config.allowed_origin, "https://console.example.com");
    }
}
