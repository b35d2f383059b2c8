use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Write `value` to `path` atomically: write a sibling `.tmp` file, sync it,
/// then rename over the target.
pub async fn write_atomic(path: &Path, value: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let tmp_path = path.with_extension("tmp");
    let result = async {
        let mut f = fs::File::create(&tmp_path).await?;
        f.write_all(value).await?;
        f.flush().await?;
        f.sync_all().await?;
        fs::rename(&tmp_path, path).await
    }
    .await;
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path).await;
    }
    result
}

/// Read `path`, returning `None` if it does not exist.
pub async fn read_optional(path: &Path) -> std::io::Result<Option<Vec<u8>>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
