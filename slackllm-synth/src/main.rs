//! Synthesizes the Slackllm deployment template
//!
//! Resolves the deploy-time parameters, synthesizes the template for the
//! requested revision, and writes `template.json` plus `assets.json` for
//! the packager and the provisioning engine.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use slackllm_stack::parameters::{DEFAULT_MEMORY_SIZE, DEFAULT_SECRETS_NAME};
use slackllm_stack::{StackConfig, StackParameters, TemplateRevision};

/// Template revision to synthesize.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RevisionArg {
    /// Superseded first design
    Initial,
    /// Canonical revised design
    Revised,
}

impl From<RevisionArg> for TemplateRevision {
    fn from(arg: RevisionArg) -> Self {
        match arg {
            RevisionArg::Initial => Self::Initial,
            RevisionArg::Revised => Self::Revised,
        }
    }
}

/// Synthesizes the provisioning artifact for the Slackllm chat bot.
#[derive(Debug, Parser)]
#[command(name = "slackllm-synth", version, about)]
struct Cli {
    /// Secret-bundle name the bot credentials resolve against
    #[arg(long, env = "SLACK_SECRETS_NAME", default_value = DEFAULT_SECRETS_NAME)]
    secrets_name: String,

    /// Function memory size in MB
    #[arg(long, env = "SLACKLLM_MEMORY_SIZE", default_value_t = DEFAULT_MEMORY_SIZE)]
    memory_size: u32,

    /// Template revision to synthesize
    #[arg(long, value_enum, default_value = "revised")]
    revision: RevisionArg,

    /// Directory holding the function source tree
    #[arg(long, default_value = "lambda")]
    code_dir: PathBuf,

    /// Directory the artifacts are written into
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Print the template to stdout instead of writing files
    #[arg(long)]
    stdout: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Resolve the configuration and parameters
    let mut config = StackConfig::for_revision(cli.revision.into());
    config.code_dir = cli.code_dir;
    let parameters = StackParameters {
        secrets_name: cli.secrets_name,
        memory_size: cli.memory_size,
    };

    let stack = config
        .synthesize(&parameters)
        .context("failed to synthesize stack")?;
    let template = stack.template_json()?;

    if cli.stdout {
        println!("{template}");
        return Ok(());
    }

    // Write the artifacts
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;
    let template_path = cli.out_dir.join("template.json");
    fs::write(&template_path, &template)
        .with_context(|| format!("failed to write {}", template_path.display()))?;
    let assets_path = cli.out_dir.join("assets.json");
    fs::write(&assets_path, stack.assets_json()?)
        .with_context(|| format!("failed to write {}", assets_path.display()))?;

    info!(
        "wrote {} and {} for stack {}",
        template_path.display(),
        assets_path.display(),
        stack.stack_name
    );
    Ok(())
}
