pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{api::ApiConfig, cli::LocalStorage, CliConfig, TomlConfig};
pub use core::client::ApiClient;
pub use core::combine::combine;
pub use core::export::{export_all_masterdata, export_all_projects};
pub use core::llm::OllamaClient;
pub use core::metrics::{criticality, CriticalityScore, ProjectMetrics, StatusIndicator};
pub use domain::model::{CombinedRecord, MasterData, ProjectBundle, ProjectExport};
pub use domain::ports::{ProjectApi, Storage};
pub use utils::error::{ExportError, Result};
