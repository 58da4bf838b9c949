//! Upload boundary.
//!
//! Accepts a single named file payload, checks it against the
//! [`UploadPolicy`], stages it in the upload directory, runs the pipeline on
//! it and removes the staged file again whatever the outcome.

use crate::config::{BiasBusterConfig, UploadPolicy};
use crate::error::{BiasBusterError, Result, ResultExt};
use crate::pipeline::BiasPipeline;
use crate::reporting::BiasReport;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

impl UploadPolicy {
    /// True if the name has a `.` and its last suffix is an allowed extension.
    pub fn allows(&self, filename: &str) -> bool {
        filename.rsplit_once('.').is_some_and(|(_, ext)| {
            let ext = ext.to_lowercase();
            self.allowed_extensions.iter().any(|allowed| *allowed == ext)
        })
    }

    /// Reject a request that cannot be processed, before anything is written.
    pub fn check(&self, filename: &str, size: u64) -> Result<()> {
        if filename.trim().is_empty() {
            return Err(BiasBusterError::NoFileSelected);
        }
        if !self.allows(filename) {
            return Err(BiasBusterError::UnsupportedExtension {
                filename: filename.to_string(),
                allowed: self.allowed_extensions.join(", "),
            });
        }
        if size > self.max_upload_bytes {
            return Err(BiasBusterError::UploadTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }
        Ok(())
    }
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Keeps the last path component, turns whitespace into `_`, drops anything
/// outside `[A-Za-z0-9._-]` and strips leading `.` and `_`. Returns `None`
/// when nothing is left.
pub fn secure_filename(filename: &str) -> Option<String> {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = last
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = cleaned.trim_start_matches(['.', '_']);
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A file staged in the upload directory, removed on drop.
///
/// The temp file owns the path from the moment it is created, so a failed or
/// partial write is removed as well.
#[derive(Debug)]
struct StagedUpload {
    path: PathBuf,
    file: Option<NamedTempFile>,
}

impl StagedUpload {
    fn stage(dir: &Path, safe_name: &str, mut source: impl Read) -> Result<Self> {
        fs::create_dir_all(dir).context("Creating upload directory")?;

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!("-{safe_name}"))
            .tempfile_in(dir)
            .context("Creating staged upload")?;
        io::copy(&mut source, file.as_file_mut()).context("Saving uploaded file")?;
        file.as_file_mut().flush().context("Saving uploaded file")?;

        let path = file.path().to_path_buf();
        debug!("Staged upload at {}", path.display());

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        match file.close() {
            Ok(()) => debug!("Removed staged upload {}", self.path.display()),
            Err(e) => warn!(
                "Failed to remove staged upload {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Processes uploaded files end to end.
#[derive(Debug, Clone)]
pub struct UploadHandler {
    policy: UploadPolicy,
    pipeline: BiasPipeline,
}

impl UploadHandler {
    pub fn new(config: BiasBusterConfig) -> Result<Self> {
        Ok(Self {
            policy: config.upload.clone(),
            pipeline: BiasPipeline::new(config)?,
        })
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Check, stage, analyse and clean up one upload.
    ///
    /// On failure no partial result is returned and the staged file is gone.
    pub fn process(&self, filename: &str, bytes: &[u8]) -> Result<BiasReport> {
        self.policy.check(filename, bytes.len() as u64)?;
        let safe_name = secure_filename(filename).ok_or(BiasBusterError::NoFileSelected)?;
        info!("Processing upload '{}' ({} bytes)", safe_name, bytes.len());

        let staged = StagedUpload::stage(&self.policy.upload_dir, &safe_name, bytes)?;
        let (table, validation_info) = self.pipeline.loader().load(staged.path())?;
        let report = self
            .pipeline
            .analyze_table(safe_name, &table, validation_info);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(dir: &Path, limit: u64) -> UploadHandler {
        let config = BiasBusterConfig::builder()
            .upload_dir(dir)
            .max_upload_bytes(limit)
            .build()
            .unwrap();
        UploadHandler::new(config).unwrap()
    }

    fn dir_is_empty(dir: &Path) -> bool {
        fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(true)
    }

    #[test]
    fn test_allows_extension() {
        let policy = UploadPolicy::default();
        assert!(policy.allows("data.csv"));
        assert!(policy.allows("DATA.CSV"));
        assert!(policy.allows("archive.tar.csv"));
        assert!(!policy.allows("data.xlsx"));
        assert!(!policy.allows("csv"));
        assert!(!policy.allows("data."));
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("my data.csv").as_deref(), Some("my_data.csv"));
        assert_eq!(
            secure_filename("../../etc/passwd.csv").as_deref(),
            Some("passwd.csv")
        );
        assert_eq!(
            secure_filename("C:\\Users\\x\\report.csv").as_deref(),
            Some("report.csv")
        );
        assert_eq!(secure_filename(".hidden.csv").as_deref(), Some("hidden.csv"));
        assert_eq!(secure_filename("日本.csv").as_deref(), Some("csv"));
        assert_eq!(secure_filename("..."), None);
    }

    #[test]
    fn test_check_rejections() {
        let policy = UploadPolicy {
            max_upload_bytes: 10,
            ..UploadPolicy::default()
        };

        assert!(matches!(
            policy.check("", 1),
            Err(BiasBusterError::NoFileSelected)
        ));
        assert!(matches!(
            policy.check("notes.txt", 1),
            Err(BiasBusterError::UnsupportedExtension { .. })
        ));
        assert!(matches!(
            policy.check("data.csv", 11),
            Err(BiasBusterError::UploadTooLarge { size: 11, limit: 10 })
        ));
        assert!(policy.check("data.csv", 10).is_ok());
    }

    #[test]
    fn test_process_success_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let handler = handler(dir.path(), 1024);

        let report = handler
            .process("loans.csv", b"label\nyes\nyes\nyes\nyes\nyes\nyes\nyes\nyes\nyes\nyes\nno\n")
            .unwrap();

        assert_eq!(report.filename, "loans.csv");
        assert_eq!(report.bias_results.imbalance_analysis.len(), 1);
        assert_eq!(report.suggestions.resampling.len(), 1);
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_process_failure_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let handler = handler(dir.path(), 1024);

        let err = handler.process("bad.csv", b"a,b\n1,2\n3,4,5\n").unwrap_err();

        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(dir_is_empty(dir.path()));
    }

    /// Yields `ok` bytes, then fails.
    struct InterruptedSource {
        ok: usize,
    }

    impl Read for InterruptedSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.ok == 0 {
                return Err(io::Error::other("disk full"));
            }
            let n = self.ok.min(buf.len());
            buf[..n].fill(b'x');
            self.ok -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_partial_write_is_removed() {
        let dir = tempfile::tempdir().unwrap();

        let err = StagedUpload::stage(dir.path(), "big.csv", InterruptedSource { ok: 4096 })
            .unwrap_err();

        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("Saving uploaded file"));
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_staged_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        let staged = StagedUpload::stage(dir.path(), "data.csv", &b"a\n1\n"[..]).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with("-data.csv"));

        drop(staged);
        assert!(!path.exists());
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_process_empty_upload() {
        let dir = tempfile::tempdir().unwrap();
        let err = handler(dir.path(), 1024).process("empty.csv", b"").unwrap_err();

        assert_eq!(err.error_code(), "EMPTY_FILE");
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_process_rejects_oversize_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("uploads");
        let err = handler(&upload_dir, 4)
            .process("big.csv", b"a\n1\n2\n")
            .unwrap_err();

        assert!(err.is_rejected_upload());
        assert!(!upload_dir.exists());
    }
}
