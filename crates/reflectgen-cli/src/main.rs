//! `reflectgen`: CLI surface over the `binding` pipeline (spec §6), plus the
//! `module-list` and `clean` subcommands carried over from the original
//! tool's surface (SPEC_FULL §11).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reflectgen_model::config::{set_global_config, ReflectConfig};

#[derive(Parser)]
#[command(name = "reflectgen", about = "C++ build-time reflection code generator")]
struct Cli {
    /// Optional sidecar config file (ambient; see reflectgen_model::config).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a header and emit the reflection binding header/source pair.
    Binding {
        /// Build directory; reserved, unused by the core pipeline.
        #[arg(long)]
        binary_dir: Option<PathBuf>,
        #[arg(long)]
        input_header: PathBuf,
        #[arg(long)]
        out_header: PathBuf,
        #[arg(long)]
        out_source: PathBuf,
        /// `;`-separated include paths; empty entries are discarded.
        #[arg(long, default_value = "")]
        include_path: String,
    },
    /// Write a small header declaring `avalanche::generated::enabled_modules::value[]`.
    ModuleList {
        #[arg(long)]
        binary_dir: Option<PathBuf>,
        #[arg(long)]
        out_header: PathBuf,
        /// `;`-separated module names.
        #[arg(long, default_value = "")]
        modules: String,
    },
    /// No-op placeholder, carried over from the original tool's surface.
    Clean {
        #[arg(long)]
        binary_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Some(config_path) = &cli.config {
        let config = ReflectConfig::load(config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?;
        set_global_config(config);
    }

    match cli.command {
        Command::Binding {
            binary_dir: _,
            input_header,
            out_header,
            out_source,
            include_path,
        } => {
            let include_paths: Vec<String> = include_path.split(';').map(str::to_string).collect();
            reflectgen_codegen::run_binding(&input_header, &out_header, &out_source, &include_paths)
                .with_context(|| format!("binding failed for {}", input_header.display()))?;
        }
        Command::ModuleList {
            binary_dir: _,
            out_header,
            modules,
        } => {
            write_module_list(&out_header, &modules)
                .with_context(|| format!("module-list failed for {}", out_header.display()))?;
        }
        Command::Clean { binary_dir: _ } => {
            // No-op, per spec §6: `clean` is an out-of-core-scope placeholder.
        }
    }

    Ok(())
}

fn write_module_list(out_header: &std::path::Path, modules: &str) -> Result<()> {
    let names: Vec<&str> = modules.split(';').filter(|m| !m.is_empty()).collect();
    let entries = names
        .iter()
        .map(|m| format!("    \"{m}\","))
        .collect::<Vec<_>>()
        .join("\n");
    let text = format!(
        "#pragma once\n#include <string_view>\n\nnamespace avalanche::generated::enabled_modules {{\nstatic constexpr std::string_view value[] = {{\n{entries}\n}};\n}} // namespace avalanche::generated::enabled_modules\n"
    );
    std::fs::write(out_header, text).with_context(|| format!("writing {}", out_header.display()))
}
