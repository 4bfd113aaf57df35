use crate::domain::errors::DomainError;
use crate::infrastructure::logging::logger;
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::fs::{self as tokio_fs, create_dir_all, read_to_string};

/// On-disk layout under `DATA_DIR`: one directory per record kind, a single
/// settings document and an append-only audit log.
#[derive(Debug, Clone)]
pub struct DataDirectory {
    root: PathBuf,
    users: PathBuf,
    student_profiles: PathBuf,
    instructor_profiles: PathBuf,
    questions: PathBuf,
    exam_results: PathBuf,
    settings_file: PathBuf,
    audit_log_file: PathBuf,
}

impl DataDirectory {
    pub fn new(root: PathBuf) -> Self {
        let profiles = root.join("profiles");
        Self {
            users: root.join("users"),
            student_profiles: profiles.join("students"),
            instructor_profiles: profiles.join("instructors"),
            questions: root.join("questions"),
            exam_results: root.join("exam_results"),
            settings_file: root.join("settings.json"),
            audit_log_file: root.join("audit_logs.jsonl"),
            root,
        }
    }

    /// Creates every record directory that does not exist yet.
    pub async fn initialize(&self) -> Result<(), DomainError> {
        tracing::info!("Preparing data directory at {:?}", self.root);

        let record_dirs = [
            &self.root,
            &self.users,
            &self.student_profiles,
            &self.instructor_profiles,
            &self.questions,
            &self.exam_results,
        ];
        for dir in record_dirs.into_iter().filter(|dir| !dir.exists()) {
            tracing::debug!("Creating {:?}", dir);
            create_dir_all(dir)
                .await
                .map_err(io_failure("create directory", dir))?;
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn users(&self) -> &Path {
        &self.users
    }

    pub fn student_profiles(&self) -> &Path {
        &self.student_profiles
    }

    pub fn instructor_profiles(&self) -> &Path {
        &self.instructor_profiles
    }

    pub fn questions(&self) -> &Path {
        &self.questions
    }

    pub fn exam_results(&self) -> &Path {
        &self.exam_results
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    pub fn audit_log_file(&self) -> &Path {
        &self.audit_log_file
    }
}

/// Logs an I/O failure on `path` and wraps it as an internal error.
fn io_failure<'a>(
    action: &'static str,
    path: &'a Path,
) -> impl FnOnce(std::io::Error) -> DomainError + 'a {
    move |error| {
        logger::error(&format!("Failed to {} {:?}: {}", action, path, error));
        DomainError::Internal(format!("Failed to {}: {}", action, error))
    }
}

/// Reads one JSON record. A missing file is `RecordNotFound`; bad JSON is `MalformedRecord`.
pub async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, DomainError> {
    logger::debug(&format!("Reading record {:?}", path));

    let contents = match read_to_string(path).await {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(DomainError::RecordNotFound(format!(
                "File not found: {}",
                path.display()
            )));
        }
        Err(error) => return Err(io_failure("read file", path)(error)),
    };

    serde_json::from_str(&contents).map_err(|error| {
        logger::error(&format!("Corrupt record {:?}: {}", path, error));
        DomainError::MalformedRecord(format!("Invalid JSON: {}", error))
    })
}

/// Writes pretty JSON through a sibling `.json.tmp` file and renames it into place,
/// so readers never observe a half-written record.
pub async fn write_json_file<T: Serialize>(path: &Path, data: &T) -> Result<(), DomainError> {
    logger::debug(&format!("Writing record {:?}", path));

    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .await
            .map_err(io_failure("create directory", parent))?;
    }

    let json = serde_json::to_string_pretty(data)
        .map_err(|error| DomainError::MalformedRecord(format!("Failed to encode record: {}", error)))?;

    let temp_path = path.with_extension("json.tmp");
    tokio_fs::write(&temp_path, json)
        .await
        .map_err(io_failure("write file", &temp_path))?;
    tokio_fs::rename(&temp_path, path)
        .await
        .map_err(io_failure("replace file", path))
}

/// Files in `dir` ending in `.extension`, sorted by path. A missing directory yields none.
pub async fn list_files_with_extension(
    dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, DomainError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = tokio_fs::read_dir(dir)
        .await
        .map_err(io_failure("list directory", dir))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(io_failure("list directory", dir))?
    {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Removes a record file; a missing file is not an error.
pub async fn delete_file(path: &Path) -> Result<(), DomainError> {
    logger::debug(&format!("Deleting record {:?}", path));

    match tokio_fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(io_failure("delete file", path)(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::random;
    use serde_json::{Value, json};

    fn unique_temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("reviewer-fs-{}", random::<u64>()))
    }

    #[tokio::test]
    async fn write_then_read_json_leaves_no_temp_file() {
        let root = unique_temp_root();
        let path = root.join("nested").join("value.json");

        write_json_file(&path, &json!({"answer": "B"})).await.unwrap();
        let value: Value = read_json_file(&path).await.unwrap();

        assert_eq!(value["answer"], "B");
        assert!(!path.with_extension("json.tmp").exists());

        let listed = list_files_with_extension(&root.join("nested"), "json")
            .await
            .unwrap();
        assert_eq!(listed, vec![path.clone()]);

        delete_file(&path).await.unwrap();
        delete_file(&path).await.unwrap();
        let _ = tokio_fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn reading_missing_file_is_not_found() {
        let root = unique_temp_root();
        let result = read_json_file::<Value>(&root.join("missing.json")).await;
        assert!(matches!(result, Err(DomainError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn initialize_creates_layout() {
        let root = unique_temp_root();
        let data_directory = DataDirectory::new(root.clone());
        data_directory.initialize().await.unwrap();

        assert!(data_directory.users().is_dir());
        assert!(data_directory.student_profiles().is_dir());
        assert!(data_directory.instructor_profiles().is_dir());
        assert!(data_directory.questions().is_dir());
        assert!(data_directory.exam_results().is_dir());
        let _ = tokio_fs::remove_dir_all(&root).await;
    }
}
