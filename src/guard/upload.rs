use std::fmt;

use crate::page::page_model::Control;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

const MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError {
    pub max_bytes: u64,
    pub total_bytes: u64,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max_mb = (self.max_bytes as f64 / MIB).round() as u64;
        write!(f, "Dosya boyutu çok büyük. En fazla {}MB olabilir.", max_mb)
    }
}

impl std::error::Error for UploadError {}

/// Limit from `data-max-size`, else the configured default.
pub fn max_upload_bytes(control: &Control, default_max: u64) -> u64 {
    control
        .data_attr("max-size")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default_max)
}

/// Total size of the selection, or the error to alert with.
pub fn check_upload(control: &Control, default_max: u64) -> Result<u64, UploadError> {
    let max_bytes = max_upload_bytes(control, default_max);
    let total_bytes: u64 = control.files.iter().sum();

    if total_bytes > max_bytes {
        Err(UploadError {
            max_bytes,
            total_bytes,
        })
    } else {
        Ok(total_bytes)
    }
}
