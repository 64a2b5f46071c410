//! WAV download artifacts named `<prefix>-<timestamp>.wav`.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::codec::WavBytes;
use crate::{Error, ErrorContext, Result};

/// Numbered fallbacks tried when a name taken in the same millisecond exists.
const MAX_NAME_ATTEMPTS: u32 = 100;

fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// File name for a download taken at `millis` since the Unix epoch.
///
/// Path separators and whitespace in the prefix are replaced with `_` so the
/// name always stays inside the target directory.
pub fn artifact_file_name_at(prefix: &str, millis: u128) -> String {
    let prefix: String = prefix
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{}-{}.wav", prefix, millis)
}

/// `attempt` 0 is the plain artifact name; later attempts append `-<attempt>`.
fn candidate_file_name(prefix: &str, millis: u128, attempt: u32) -> String {
    let name = artifact_file_name_at(prefix, millis);
    match attempt {
        0 => name,
        n => format!("{}-{}.wav", name.trim_end_matches(".wav"), n),
    }
}

pub fn artifact_file_name(prefix: &str) -> String {
    artifact_file_name_at(prefix, timestamp_millis())
}

/// Writes `wav` into `dir` under a fresh artifact name and returns the full path.
///
/// Existing files are never overwritten: when two saves land in the same
/// millisecond the later one gets a `-<n>` suffix.
pub fn save_wav(dir: impl AsRef<Path>, prefix: &str, wav: &WavBytes) -> Result<PathBuf> {
    save_wav_at(dir.as_ref(), prefix, wav, timestamp_millis())
}

fn save_wav_at(dir: &Path, prefix: &str, wav: &WavBytes, millis: u128) -> Result<PathBuf> {
    if prefix.trim().is_empty() {
        return Err(Error::invalid_parameter_with_context(
            "download prefix must not be empty",
            ErrorContext::new().with_field_path("output_prefix"),
        ));
    }
    std::fs::create_dir_all(dir)?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(candidate_file_name(prefix, millis, attempt));
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(path = %path.display(), "download name taken, trying next");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(wav.as_bytes())?;
        tracing::info!(path = %path.display(), bytes = wav.len(), "saved WAV download");
        return Ok(path);
    }

    Err(Error::invalid_parameter_with_context(
        "no free download name",
        ErrorContext::new()
            .with_field_path("output_prefix")
            .with_details(format!(
                "{} names for {}-{} already exist",
                MAX_NAME_ATTEMPTS, prefix, millis
            )),
    ))
}
