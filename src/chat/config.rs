//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and resolves the
//! arguments, the YAML configuration file, and the environment into one
//! [`ChatConfig`].

use std::env;
use std::path::Path;

use arrrg_derive::CommandLine;

use crate::config::FlowConfig;
use crate::error::Result;

/// Configuration file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "flowchat.yaml";

/// Title shown when none is configured.
pub const DEFAULT_TITLE: &str = "Langflow Chat";

/// Command-line arguments for the flowchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Path to the YAML configuration file.
    #[arrrg(optional, "YAML configuration file (default: ./flowchat.yaml)", "FILE")]
    pub config: Option<String>,

    /// Flow endpoint id to run.
    #[arrrg(optional, "Flow endpoint id", "ENDPOINT")]
    pub endpoint: Option<String>,

    /// Base URL of the flow service.
    #[arrrg(optional, "Base URL of the flow service", "URL")]
    pub base_url: Option<String>,

    /// Title printed when the chat starts.
    #[arrrg(optional, "Title printed at startup", "TITLE")]
    pub title: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat run.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// How to reach the flow.
    pub flow: FlowConfig,

    /// Title printed when the chat starts.
    pub title: String,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Resolves arguments into a validated configuration.
    ///
    /// Precedence, lowest to highest: built-in defaults, the configuration
    /// file, the environment (via `lookup`), then command-line arguments.
    pub fn resolve<F>(args: ChatArgs, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flow = match Self::config_path(&args) {
            Some(path) => FlowConfig::from_file(path)?,
            None => FlowConfig::new(""),
        };
        let mut flow = flow.with_env_overrides(lookup);
        if let Some(endpoint) = args.endpoint {
            flow = flow.with_endpoint(endpoint);
        }
        if let Some(base_url) = args.base_url {
            flow = flow.with_base_url(base_url);
        }

        Ok(ChatConfig {
            flow: flow.validated()?,
            title: args.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            use_color: !args.no_color,
        })
    }

    /// Resolves arguments against the process environment.
    pub fn from_args(args: ChatArgs) -> Result<Self> {
        Self::resolve(args, |key| env::var(key).ok())
    }

    /// The configuration file that would be read for `args`, if any.
    pub fn config_path(args: &ChatArgs) -> Option<&Path> {
        match &args.config {
            Some(path) => Some(Path::new(path)),
            None => Some(Path::new(DEFAULT_CONFIG_FILE)).filter(|path| path.exists()),
        }
    }
}
