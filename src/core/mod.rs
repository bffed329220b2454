pub mod client;
pub mod combine;
pub mod csv_export;
pub mod export;
pub mod llm;
pub mod metrics;
pub mod persist;

pub use crate::domain::model::{
    CombinedRecord, Invoice, Kpi, MasterData, PlanningEntry, Project, ProjectBundle,
    ProjectExport, StatusDefinition,
};
pub use crate::domain::ports::{ProjectApi, Storage};
pub use crate::utils::error::Result;
