use kinema_core::{
    Dataset, GenerationConfig, KinemaError, KinemaResult, PositionArray, TrajectoryMetadata,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bumped whenever the artifact layout changes
pub const FORMAT_VERSION: u32 = 1;

/// On-disk layout: version, then data [N, T, 2], metadata, config
#[derive(Serialize)]
struct ArtifactRef<'a> {
    format_version: u32,
    data: &'a PositionArray,
    metadata: &'a [TrajectoryMetadata],
    config: &'a GenerationConfig,
}

#[derive(Deserialize)]
struct Artifact {
    format_version: u32,
    data: PositionArray,
    metadata: Vec<TrajectoryMetadata>,
    config: GenerationConfig,
}

/// Encode a dataset as a bincode artifact
pub fn encode_dataset(dataset: &Dataset) -> KinemaResult<Vec<u8>> {
    dataset.validate()?;
    let artifact = ArtifactRef {
        format_version: FORMAT_VERSION,
        data: &dataset.data,
        metadata: &dataset.metadata,
        config: &dataset.config,
    };
    bincode::serialize(&artifact)
        .map_err(|e| KinemaError::invalid_data(format!("Serialize error: {e}")))
}

/// Decode and validate a bincode artifact
pub fn decode_dataset(bytes: &[u8]) -> KinemaResult<Dataset> {
    let artifact: Artifact = bincode::deserialize(bytes).map_err(|e| {
        // a foreign version may not share our layout; name the version if we can read it
        match bincode::deserialize::<u32>(bytes) {
            Ok(version) if version != FORMAT_VERSION => unsupported_version(version),
            _ => KinemaError::invalid_data(format!("Deserialize error: {e}")),
        }
    })?;
    if artifact.format_version != FORMAT_VERSION {
        return Err(unsupported_version(artifact.format_version));
    }

    let dataset = Dataset {
        data: artifact.data,
        metadata: artifact.metadata,
        config: artifact.config,
    };
    dataset.validate()?;
    Ok(dataset)
}

fn unsupported_version(version: u32) -> KinemaError {
    KinemaError::invalid_data(format!(
        "Unsupported format version {version} (expected {FORMAT_VERSION})"
    ))
}

/// Save a dataset to disk, creating missing parent directories.
/// The dataset is only borrowed; on failure the caller still owns it.
pub fn save_dataset(dataset: &Dataset, path: &Path) -> KinemaResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let bytes = encode_dataset(dataset)?;
    fs::write(path, &bytes)?;

    tracing::info!(
        "Saved {:?} to {:?} ({:.1} MB)",
        dataset.data.shape(),
        path,
        bytes.len() as f64 / 1e6
    );
    Ok(())
}

/// Load a dataset written by `save_dataset`
pub fn load_dataset(path: &Path) -> KinemaResult<Dataset> {
    let bytes = fs::read(path)?;
    let dataset = decode_dataset(&bytes)?;

    tracing::info!("Loaded {:?} from {:?}", dataset.data.shape(), path);
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_sim::generate;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("physics.bin");
        let dataset = generate(6, 12, 0.1).unwrap();

        save_dataset(&dataset, &path).unwrap();
        let loaded = load_dataset(&path).unwrap();

        assert_eq!(loaded, dataset);
        assert_eq!(loaded.data.as_flat(), dataset.data.as_flat());
        assert_eq!(loaded.metadata[4].seed, 4);
        assert_eq!(loaded.config.description, dataset.config.description);
    }

    #[test]
    fn test_round_trip_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.bin");
        let dataset = generate(0, 5, 0.1).unwrap();

        save_dataset(&dataset, &path).unwrap();
        let loaded = load_dataset(&path).unwrap();

        assert!(loaded.is_empty());
        assert_eq!(loaded.data.shape(), [0, 5, 2]);
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("nested").join("physics_v1.bin");
        let dataset = generate(2, 3, 0.1).unwrap();

        save_dataset(&dataset, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_failure_keeps_dataset_usable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let dataset = generate(3, 4, 0.1).unwrap();
        let err = save_dataset(&dataset, &blocker.join("physics.bin")).unwrap_err();
        assert!(err.is_io());

        // Retry at a writable location with the same in-memory dataset
        assert!(dataset.validate().is_ok());
        let path = dir.path().join("physics.bin");
        save_dataset(&dataset, &path).unwrap();
        assert_eq!(load_dataset(&path).unwrap(), dataset);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        match load_dataset(&dir.path().join("absent.bin")).unwrap_err() {
            KinemaError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_load_truncated_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("truncated.bin");
        let bytes = encode_dataset(&generate(2, 3, 0.1).unwrap()).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        match load_dataset(&path).unwrap_err() {
            KinemaError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut bytes = encode_dataset(&generate(1, 2, 0.1).unwrap()).unwrap();
        bytes[..4].copy_from_slice(&99u32.to_le_bytes());
        assert!(decode_dataset(&bytes).unwrap_err().is_io());
    }

    #[test]
    fn test_decode_rejects_misaligned_metadata() {
        let mut dataset = generate(3, 2, 0.1).unwrap();
        dataset.metadata.swap(0, 2);
        assert!(decode_dataset(&write_unchecked(&dataset)).unwrap_err().is_io());
    }

    #[derive(Serialize)]
    struct RawArray {
        num_trajectories: usize,
        seq_len: usize,
        values: Vec<[f64; 2]>,
    }

    #[derive(Serialize)]
    struct RawArtifact {
        format_version: u32,
        data: RawArray,
        metadata: Vec<TrajectoryMetadata>,
        config: GenerationConfig,
    }

    fn raw_bytes(data: RawArray, dataset: &Dataset) -> Vec<u8> {
        bincode::serialize(&RawArtifact {
            format_version: FORMAT_VERSION,
            data,
            metadata: dataset.metadata.clone(),
            config: dataset.config.clone(),
        })
        .unwrap()
    }

    fn write_unchecked(dataset: &Dataset) -> Vec<u8> {
        bincode::serialize(&ArtifactRef {
            format_version: FORMAT_VERSION,
            data: &dataset.data,
            metadata: &dataset.metadata,
            config: &dataset.config,
        })
        .unwrap()
    }

    fn assert_invalid_data(err: KinemaError) {
        match err {
            KinemaError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_overflowing_shape() {
        let dataset = generate(2, 2, 0.1).unwrap();
        let bytes = raw_bytes(
            RawArray {
                num_trajectories: usize::MAX,
                seq_len: 2,
                values: Vec::new(),
            },
            &dataset,
        );
        assert_invalid_data(decode_dataset(&bytes).unwrap_err());
    }

    #[test]
    fn test_decode_rejects_invalid_config() {
        let mut dataset = generate(2, 3, 0.1).unwrap();
        dataset.config.dt = -1.0;
        assert_invalid_data(decode_dataset(&write_unchecked(&dataset)).unwrap_err());

        // zero-length rows with trajectories present
        let mut dataset = generate(2, 3, 0.1).unwrap();
        dataset.config.seq_len = 0;
        let bytes = raw_bytes(
            RawArray {
                num_trajectories: 2,
                seq_len: 0,
                values: Vec::new(),
            },
            &dataset,
        );
        assert_invalid_data(decode_dataset(&bytes).unwrap_err());
    }

    #[test]
    fn test_decode_rejects_non_finite_values() {
        let mut dataset = generate(3, 4, 0.1).unwrap();
        dataset.data.row_mut(2)[1].x = f64::NAN;
        assert_invalid_data(decode_dataset(&write_unchecked(&dataset)).unwrap_err());

        let mut dataset = generate(3, 4, 0.1).unwrap();
        dataset.metadata[1].mass = f64::INFINITY;
        assert_invalid_data(decode_dataset(&write_unchecked(&dataset)).unwrap_err());
    }

    #[test]
    fn test_encode_rejects_invalid_dataset() {
        let mut dataset = generate(2, 2, 0.1).unwrap();
        dataset.metadata.pop();
        assert!(encode_dataset(&dataset).is_err());
    }
}
