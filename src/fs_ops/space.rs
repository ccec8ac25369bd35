//! Free-space precheck before copying into a destination directory.

use std::path::Path;
use tracing::debug;

use super::helpers::transfer_io;
use crate::errors::TransferError;

/// Format bytes using binary units (KiB, MiB, GiB, TiB).
pub fn format_bytes(n: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", n, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Fail with `InsufficientSpace` when `dest_dir`'s filesystem cannot hold
/// `required` more bytes.
pub fn ensure_space_for_copy(dest_dir: &Path, required: u64) -> Result<(), TransferError> {
    if required == 0 {
        return Ok(());
    }
    let available = fs2::available_space(dest_dir).map_err(transfer_io("query free space", dest_dir))?;
    debug!(
        dest = %dest_dir.display(),
        required = %format_bytes(required),
        available = %format_bytes(available),
        "space: precheck"
    );
    if required > available {
        return Err(TransferError::InsufficientSpace {
            required,
            available,
            dest: dest_dir.to_path_buf(),
        });
    }
    Ok(())
}
