//! Snapshot loading — saved `getstatus`/`getcontrol` bodies, or the demo set.

use std::path::{Path, PathBuf};

use hslink_adapter_virtual::demo;
use hslink_domain::control::DeviceControls;
use hslink_domain::error::PayloadError;
use hslink_domain::payload::{parse_control, parse_status};
use hslink_domain::record::DeviceRecord;

use crate::config::SnapshotConfig;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode snapshot")]
    Payload(#[from] PayloadError),
    #[error("status_path and control_path must be set together")]
    Incomplete,
}

pub type Snapshot = (Vec<DeviceRecord>, Vec<DeviceControls>);

/// Load the configured snapshot files, or the demo set when none are configured.
///
/// # Errors
///
/// Returns an error when only one path is configured, a file cannot be
/// read, or its content is not a valid payload.
pub fn load(config: &SnapshotConfig) -> Result<Snapshot, SnapshotError> {
    match (&config.status_path, &config.control_path) {
        (Some(status), Some(control)) => {
            let status = parse_status(&read(status)?)?;
            let controls = parse_control(&read(control)?)?;
            tracing::info!(
                hub = %status.name,
                version = %status.version,
                devices = status.devices.len(),
                "loaded snapshot from files"
            );
            Ok((status.devices, controls))
        }
        (None, None) => {
            tracing::info!("no snapshot configured, using demo devices");
            Ok(demo::snapshot())
        }
        _ => Err(SnapshotError::Incomplete),
    }
}

fn read(path: &Path) -> Result<String, SnapshotError> {
    std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fall_back_to_demo_set() {
        let (records, controls) = load(&SnapshotConfig::default()).unwrap();
        assert!(!records.is_empty());
        assert!(!controls.is_empty());
    }

    #[test]
    fn should_reject_half_configured_snapshot() {
        let config = SnapshotConfig {
            status_path: Some("status.json".into()),
            control_path: None,
        };
        assert!(matches!(load(&config), Err(SnapshotError::Incomplete)));
    }

    #[test]
    fn should_report_missing_file() {
        let config = SnapshotConfig {
            status_path: Some("does-not-exist-status.json".into()),
            control_path: Some("does-not-exist-control.json".into()),
        };
        let err = load(&config).unwrap_err();
        assert_eq!(err.to_string(), "failed to read does-not-exist-status.json");
    }
}
