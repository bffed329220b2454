pub mod api;
pub mod cli;
pub mod toml_config;

use crate::config::api::DEFAULT_BASE_URL;
use crate::core::llm::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};

pub use api::ApiConfig;
pub use toml_config::TomlConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "blueant-export")]
#[command(about = "Exports Blue Ant project data to JSON/CSV and derives project health metrics")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Optional TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Full JSON export: projects, master data and the combined join result
    Export,
    /// Flat CSV export with one row per project/invoice pair
    Csv {
        #[arg(long, default_value = "blueant_projects_invoices.csv")]
        filename: String,
    },
    /// Derive plan/actual metrics and criticality from a combined export file
    Report {
        /// Path to a combined JSON file produced by `export`
        file: String,

        #[arg(long, help = "Send critical projects to the local LLM for a short assessment")]
        analyze: bool,

        #[arg(long, default_value = DEFAULT_OLLAMA_URL)]
        ollama_url: String,

        #[arg(long, default_value = DEFAULT_OLLAMA_MODEL)]
        model: String,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_path("output_path", &self.output_path)?;
        if let Command::Report { ollama_url, .. } = &self.command {
            validation::validate_url("ollama_url", ollama_url)?;
        }
        Ok(())
    }
}
