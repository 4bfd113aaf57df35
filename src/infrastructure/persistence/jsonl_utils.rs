use crate::domain::errors::DomainError;
use crate::infrastructure::logging::logger;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

/// Read a JSONL file into typed records.
///
/// A missing file reads as empty. Lines that fail to parse are logged and skipped.
pub async fn read_jsonl_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DomainError> {
    logger::debug(&format!("Reading JSONL file: {:?}", path));

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path).await.map_err(|e| {
        logger::error(&format!("Failed to open JSONL file: {}", e));
        DomainError::Internal(format!("Failed to open JSONL file: {}", e))
    })?;

    let reader = BufReader::new(file);
    let mut lines = reader.lines();
    let mut records = Vec::new();

    while let Some(line) = lines.next_line().await.map_err(|e| {
        logger::error(&format!("Failed to read line from JSONL file: {}", e));
        DomainError::Internal(format!("Failed to read line from JSONL file: {}", e))
    })? {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => logger::warn(&format!("Failed to parse JSON line: {}", e)),
        }
    }

    Ok(records)
}

/// Append one record as a single line.
pub async fn append_jsonl_line<T: Serialize>(path: &Path, record: &T) -> Result<(), DomainError> {
    let mut line = serde_json::to_vec(record).map_err(|e| {
        logger::error(&format!("Failed to serialize JSON: {}", e));
        DomainError::Internal(format!("Failed to serialize JSON: {}", e))
    })?;
    line.push(b'\n');

    ensure_parent(path).await?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| {
            logger::error(&format!("Failed to open JSONL file for append: {}", e));
            DomainError::Internal(format!("Failed to open JSONL file: {}", e))
        })?;

    file.write_all(&line).await.map_err(|e| {
        logger::error(&format!("Failed to append to JSONL file: {}", e));
        DomainError::Internal(format!("Failed to append to JSONL file: {}", e))
    })?;

    file.flush().await.map_err(|e| {
        DomainError::Internal(format!("Failed to flush JSONL file: {}", e))
    })
}

/// Atomically rewrite a JSONL file with `records`.
pub async fn write_jsonl_file<T: Serialize>(path: &Path, records: &[T]) -> Result<(), DomainError> {
    logger::debug(&format!("Writing JSONL file: {:?}", path));

    let mut serialized = Vec::new();
    for record in records {
        let line = serde_json::to_vec(record).map_err(|e| {
            logger::error(&format!("Failed to serialize JSON: {}", e));
            DomainError::Internal(format!("Failed to serialize JSON: {}", e))
        })?;
        serialized.extend_from_slice(&line);
        serialized.push(b'\n');
    }

    ensure_parent(path).await?;

    let temp_path = path.with_extension("jsonl.tmp");
    let file = File::create(&temp_path).await.map_err(|e| {
        logger::error(&format!("Failed to create temporary file: {}", e));
        DomainError::Internal(format!("Failed to create temporary file: {}", e))
    })?;

    let mut writer = BufWriter::new(file);
    writer.write_all(&serialized).await.map_err(|e| {
        logger::error(&format!("Failed to write to temporary file: {}", e));
        DomainError::Internal(format!("Failed to write to temporary file: {}", e))
    })?;

    writer.flush().await.map_err(|e| {
        logger::error(&format!("Failed to flush temporary file: {}", e));
        DomainError::Internal(format!("Failed to flush temporary file: {}", e))
    })?;

    fs::rename(&temp_path, path).await.map_err(|e| {
        logger::error(&format!("Failed to rename temporary file: {}", e));
        DomainError::Internal(format!("Failed to rename temporary file: {}", e))
    })?;

    Ok(())
}

async fn ensure_parent(path: &Path) -> Result<(), DomainError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await.map_err(|e| {
                logger::error(&format!("Failed to create directory: {}", e));
                DomainError::Internal(format!("Failed to create directory: {}", e))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::random;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        action: String,
    }

    fn entry(action: &str) -> Entry {
        Entry {
            action: action.to_string(),
        }
    }

    #[tokio::test]
    async fn append_then_rewrite_skips_corrupt_lines() {
        let root = std::env::temp_dir().join(format!("reviewer-jsonl-{}", random::<u64>()));
        let path = root.join("log.jsonl");

        assert!(read_jsonl_file::<Entry>(&path).await.unwrap().is_empty());

        append_jsonl_line(&path, &entry("login")).await.unwrap();
        append_jsonl_line(&path, &entry("logout")).await.unwrap();
        fs::write(
            &path,
            format!("{}not json\n", fs::read_to_string(&path).await.unwrap()),
        )
        .await
        .unwrap();

        let records: Vec<Entry> = read_jsonl_file(&path).await.unwrap();
        assert_eq!(records, vec![entry("login"), entry("logout")]);

        write_jsonl_file(&path, &records[1..]).await.unwrap();
        let records: Vec<Entry> = read_jsonl_file(&path).await.unwrap();
        assert_eq!(records, vec![entry("logout")]);

        let _ = fs::remove_dir_all(&root).await;
    }
}
