use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Serialize;

/// 每次執行共用同一個 timestamp，輸出檔案互相對得起來
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn timestamped_filename(prefix: &str, timestamp: &str, extension: &str) -> String {
    format!("{}_{}.{}", prefix, timestamp, extension)
}

pub async fn save_json<S, T>(storage: &S, filename: &str, data: &T) -> Result<()>
where
    S: Storage,
    T: Serialize,
{
    let json = serde_json::to_vec_pretty(data)?;
    storage.write_file(filename, &json).await?;
    tracing::info!("💾 Saved: {}", filename);
    Ok(())
}
