//! File I/O utilities
//!
//! Atomic JSON document writes plus append-only JSON-lines files. A document
//! is either completely written or not modified at all; a JSON-lines file is
//! flushed after every append.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AuditError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, AuditError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| AuditError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| AuditError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), AuditError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AuditError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| AuditError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| AuditError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| AuditError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| AuditError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        AuditError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Append one value as a single JSON line and flush
pub fn append_json_line<T, P>(path: P, value: &T) -> Result<(), AuditError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    append_json_lines(path, std::slice::from_ref(value))
}

/// Append several values, one JSON line each, in a single write
///
/// Every value is serialized before the file is touched, so a value that
/// fails to serialize leaves the file unchanged.
pub fn append_json_lines<T, P>(path: P, values: &[T]) -> Result<(), AuditError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let mut buffer = String::new();
    for value in values {
        let json = serde_json::to_string(value)
            .map_err(|e| AuditError::Json(format!("Failed to serialize record: {}", e)))?;
        buffer.push_str(&json);
        buffer.push('\n');
    }

    if buffer.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AuditError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AuditError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    file.write_all(buffer.as_bytes())
        .map_err(|e| AuditError::Io(format!("Failed to write records: {}", e)))?;

    file.flush()
        .map_err(|e| AuditError::Io(format!("Failed to flush {}: {}", path.display(), e)))?;

    Ok(())
}

/// Read every line of a JSON-lines file, oldest first
///
/// A missing file reads as empty. Blank lines are skipped.
pub fn read_json_lines<T, P>(path: P) -> Result<Vec<T>, AuditError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| AuditError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    let mut values = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            AuditError::Io(format!(
                "Failed to read {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let value: T = serde_json::from_str(&line).map_err(|e| {
            AuditError::Json(format!(
                "Failed to parse {} at line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;

        values.push(value);
    }

    Ok(values)
}
