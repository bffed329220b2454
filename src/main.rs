use blueant_export::config::api::{DEFAULT_BASE_URL, DEFAULT_RISK_KEYWORDS};
use blueant_export::config::Command;
use blueant_export::core::csv_export::{collect_invoice_rows, write_invoice_csv};
use blueant_export::core::llm::analysis_prompt;
use blueant_export::core::metrics::criticality;
use blueant_export::core::persist;
use blueant_export::utils::{logger, validation::Validate};
use blueant_export::{
    combine, export_all_masterdata, export_all_projects, ApiClient, ApiConfig, CliConfig,
    CombinedRecord, LocalStorage, OllamaClient, ProjectMetrics, Result, Storage, TomlConfig,
};
use clap::Parser;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting blueant-export CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ Command failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &CliConfig) -> Result<()> {
    let storage = LocalStorage::new(cli.output_path.clone());

    match &cli.command {
        Command::Export => run_export(cli, &storage).await,
        Command::Csv { filename } => run_csv(cli, &storage, filename).await,
        Command::Report {
            file,
            analyze,
            ollama_url,
            model,
        } => run_report(cli, file, *analyze, ollama_url, model).await,
    }
}

/// API key 來自 TOML 檔或環境變數，缺少時在任何網路操作前就中止。
fn load_api_config(cli: &CliConfig) -> Result<ApiConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let toml_config = TomlConfig::from_file(path)?;
            toml_config.validate()?;
            toml_config.into_api_config()?
        }
        None => ApiConfig::from_env()?,
    };

    if cli.base_url != DEFAULT_BASE_URL {
        config = config.with_base_url(cli.base_url.clone());
    }

    config.validate()?;
    Ok(config)
}

async fn run_export(cli: &CliConfig, storage: &LocalStorage) -> Result<()> {
    let api_config = load_api_config(cli)?;
    let client = ApiClient::new(&api_config)?;
    let timestamp = persist::run_timestamp();

    println!("🚀 Starting Blue Ant data export");

    let project_export = export_all_projects(
        &client,
        Duration::from_millis(api_config.project_delay_ms),
    )
    .await;
    let projects_file = persist::timestamped_filename("blueant_projects", &timestamp, "json");
    persist::save_json(storage, &projects_file, &project_export).await?;
    println!("✅ {} projects exported", project_export.len());

    let masterdata = export_all_masterdata(
        &client,
        &api_config.context_types,
        Duration::from_millis(api_config.masterdata_delay_ms),
    )
    .await;
    let masterdata_file = persist::timestamped_filename("blueant_masterdata", &timestamp, "json");
    persist::save_json(storage, &masterdata_file, &masterdata).await?;
    println!("✅ Master data exported");

    let combined = combine(&project_export, &masterdata);
    let combined_file = persist::timestamped_filename("blueant_combined", &timestamp, "json");
    persist::save_json(storage, &combined_file, &combined).await?;
    println!("✅ {} combined records written", combined.len());

    println!("✨ Export finished");
    println!("📁 Created in {}:", storage.base_path().display());
    println!("   1. {}", projects_file);
    println!("   2. {}", masterdata_file);
    println!("   3. {}", combined_file);

    Ok(())
}

async fn run_csv(cli: &CliConfig, storage: &LocalStorage, filename: &str) -> Result<()> {
    let api_config = load_api_config(cli)?;
    let client = ApiClient::new(&api_config)?;

    println!("🚀 Starting invoice CSV export");

    let rows = collect_invoice_rows(
        &client,
        Duration::from_millis(api_config.project_delay_ms),
    )
    .await;

    let mut buffer = Vec::new();
    write_invoice_csv(&rows, &mut buffer)?;
    storage.write_file(filename, &buffer).await?;

    println!("✅ CSV export finished: {} ({} rows)", filename, rows.len());
    Ok(())
}

async fn run_report(
    cli: &CliConfig,
    file: &str,
    analyze: bool,
    ollama_url: &str,
    model: &str,
) -> Result<()> {
    let risk_keywords: Vec<String> = match &cli.config {
        Some(path) => TomlConfig::from_file(path)?
            .analysis
            .risk_keywords
            .unwrap_or_else(default_risk_keywords),
        None => default_risk_keywords(),
    };

    let data = tokio::fs::read(file).await?;
    let records: Vec<CombinedRecord> = serde_json::from_slice(&data)?;

    if records.is_empty() {
        println!("⚠️ No projects in {}", file);
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();

    println!("📊 Project health report ({} projects)", records.len());
    let mut critical = Vec::new();
    for record in &records {
        let metrics = ProjectMetrics::from_kpis(&record.kpis);
        let score = criticality(record, &metrics, &risk_keywords, today);
        let display_name = record
            .project_data
            .as_ref()
            .map(|p| p.display_name())
            .unwrap_or_else(|| format!("Projekt {}", record.project_id));

        println!(
            "{} {:<40} plan {:>8.1} h  actual {:>8.1} h  variance {:>8.1} h ({:>6.1} %)  score {}",
            metrics.indicator.symbol(),
            display_name,
            metrics.work_plan,
            metrics.work_actual,
            metrics.variance,
            metrics.variance_pct,
            score.score
        );

        if score.is_critical {
            critical.push((display_name, metrics, score));
        }
    }

    if critical.is_empty() {
        println!("✅ No critical projects");
        return Ok(());
    }

    println!("🚨 {} critical project(s):", critical.len());
    for (name, _, score) in &critical {
        println!(
            "   - {} (score {}, {} overdue planning entries)",
            name, score.score, score.overdue_entries
        );
    }

    if analyze {
        let llm = OllamaClient::new(ollama_url, model)?;
        for (name, metrics, _) in &critical {
            println!("\n🤖 Analyzing {} ...", name);
            match llm.generate(&analysis_prompt(name, metrics)).await {
                Ok(text) => println!("{}", text.trim()),
                Err(e) => tracing::error!("❌ LLM analysis failed for {}: {}", name, e),
            }
        }
    }

    Ok(())
}

fn default_risk_keywords() -> Vec<String> {
    DEFAULT_RISK_KEYWORDS.iter().map(|s| s.to_string()).collect()
}
