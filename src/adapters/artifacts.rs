//! Artifact store: loads the trained model, scaler and feature schema.
//!
//! An artifact directory holds three JSON documents:
//! - `heart_disease_model.json`: the classifier (see [`TrainedModel`])
//! - `scaler.json`: the fitted [`StandardScaler`]
//! - `feature_columns.json`: the ordered feature column names
//!
//! # Integrity
//!
//! An optional `manifest.json` binds the artifacts by SHA-256:
//!
//! ```json
//! { "version": 1, "files": { "scaler.json": "9f86d0..." } }
//! ```
//!
//! When present, every listed file must exist and match its digest, and the
//! three artifacts must all be listed. Set `require_manifest` to refuse
//! directories without one. `seal_artifacts` writes the manifest.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::model::TrainedModel;
use super::scaler::StandardScaler;
use crate::domain::{EncodingError, FeatureSchema};
use crate::ports::{Classifier, Scaler};

pub const MODEL_FILE: &str = "heart_disease_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const SCHEMA_FILE: &str = "feature_columns.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// Which artifact an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Scaler,
    Schema,
    Manifest,
}

impl ArtifactKind {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Model => MODEL_FILE,
            Self::Scaler => SCALER_FILE,
            Self::Schema => SCHEMA_FILE,
            Self::Manifest => MANIFEST_FILE,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Scaler => write!(f, "scaler"),
            Self::Schema => write!(f, "feature schema"),
            Self::Manifest => write!(f, "manifest"),
        }
    }
}

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("Artifact directory not found at {0:?}")]
    MissingDirectory(PathBuf),

    #[error("Missing {kind} artifact at {path:?}")]
    Missing { kind: ArtifactKind, path: PathBuf },

    #[error("Failed to read {kind} artifact {path:?}: {source}")]
    Read {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt {kind} artifact {path:?}: {source}")]
    Corrupt {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed feature schema: {0}")]
    Schema(#[from] EncodingError),

    #[error("Unusable {kind} artifact: {reason}")]
    Invalid { kind: ArtifactKind, reason: String },

    #[error("Manifest required but not found at {0:?}")]
    ManifestRequired(PathBuf),

    #[error("Artifact {file} does not match its manifest digest")]
    DigestMismatch { file: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

/// Options for [`ModelArtifacts::load`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Refuse directories without `manifest.json`.
    pub require_manifest: bool,
    /// Skip manifest verification entirely, for resealing.
    pub ignore_manifest: bool,
}

/// The trained artifacts, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub schema: FeatureSchema,
    pub scaler: StandardScaler,
    pub model: TrainedModel,
}

impl ModelArtifacts {
    /// Load and cross-check the artifacts in `dir`.
    ///
    /// # Errors
    /// Returns `ArtifactLoadError` if any artifact is missing, corrupt,
    /// inconsistent with the others or fails manifest verification.
    pub fn load(dir: &Path, options: LoadOptions) -> Result<Self, ArtifactLoadError> {
        if !dir.is_dir() {
            return Err(ArtifactLoadError::MissingDirectory(dir.to_path_buf()));
        }

        let manifest = if options.ignore_manifest {
            None
        } else {
            read_manifest(dir)?
        };
        match manifest {
            Some(manifest) => verify_manifest(dir, &manifest)?,
            None if options.require_manifest && !options.ignore_manifest => {
                return Err(ArtifactLoadError::ManifestRequired(dir.join(MANIFEST_FILE)))
            }
            None => tracing::warn!("Artifact digests in {:?} not verified", dir),
        }

        let columns: Vec<String> = read_json(dir, ArtifactKind::Schema)?;
        let schema = FeatureSchema::new(columns)?;

        let scaler: StandardScaler = read_json(dir, ArtifactKind::Scaler)?;
        scaler.check().map_err(|reason| ArtifactLoadError::Invalid {
            kind: ArtifactKind::Scaler,
            reason,
        })?;

        let mut model: TrainedModel = read_json(dir, ArtifactKind::Model)?;
        model.prepare().map_err(|reason| ArtifactLoadError::Invalid {
            kind: ArtifactKind::Model,
            reason,
        })?;

        let artifacts = Self {
            schema,
            scaler,
            model,
        };
        artifacts.check_consistency()?;

        tracing::info!(
            "Loaded artifacts from {:?} (model={}, n_features={}, importances={})",
            dir,
            artifacts.model.kind(),
            artifacts.schema.len(),
            artifacts.model.feature_importances().is_some()
        );

        Ok(artifacts)
    }

    fn check_consistency(&self) -> Result<(), ArtifactLoadError> {
        let n = self.schema.len();

        if self.scaler.n_features() != n {
            return Err(ArtifactLoadError::Invalid {
                kind: ArtifactKind::Scaler,
                reason: format!(
                    "fit on {} features but the schema has {n}",
                    self.scaler.n_features()
                ),
            });
        }
        if let Some(names) = &self.scaler.feature_names_in {
            if names.as_slice() != self.schema.columns() {
                return Err(ArtifactLoadError::Invalid {
                    kind: ArtifactKind::Scaler,
                    reason: "feature_names_in differs from the schema order".into(),
                });
            }
        }
        if self.model.n_features() != n {
            return Err(ArtifactLoadError::Invalid {
                kind: ArtifactKind::Model,
                reason: format!(
                    "trained on {} features but the schema has {n}",
                    self.model.n_features()
                ),
            });
        }
        Ok(())
    }
}

fn artifact_path(dir: &Path, kind: ArtifactKind) -> PathBuf {
    dir.join(kind.file_name())
}

fn read_bytes(dir: &Path, kind: ArtifactKind) -> Result<Vec<u8>, ArtifactLoadError> {
    let path = artifact_path(dir, kind);
    fs::read(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactLoadError::Missing { kind, path }
        } else {
            ArtifactLoadError::Read { kind, path, source }
        }
    })
}

fn read_json<T: DeserializeOwned>(dir: &Path, kind: ArtifactKind) -> Result<T, ArtifactLoadError> {
    let bytes = read_bytes(dir, kind)?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Corrupt {
        kind,
        path: artifact_path(dir, kind),
        source,
    })
}

fn read_manifest(dir: &Path) -> Result<Option<ArtifactManifest>, ArtifactLoadError> {
    if !artifact_path(dir, ArtifactKind::Manifest).exists() {
        return Ok(None);
    }
    let manifest: ArtifactManifest = read_json(dir, ArtifactKind::Manifest)?;
    if manifest.version != MANIFEST_VERSION {
        return Err(ArtifactLoadError::Invalid {
            kind: ArtifactKind::Manifest,
            reason: format!("unsupported version {}", manifest.version),
        });
    }
    Ok(Some(manifest))
}

fn verify_manifest(dir: &Path, manifest: &ArtifactManifest) -> Result<(), ArtifactLoadError> {
    for required in [MODEL_FILE, SCALER_FILE, SCHEMA_FILE] {
        if !manifest.files.contains_key(required) {
            return Err(ArtifactLoadError::Invalid {
                kind: ArtifactKind::Manifest,
                reason: format!("{required} is not listed"),
            });
        }
    }

    for (file, expected) in &manifest.files {
        if Path::new(file).components().count() != 1 {
            return Err(ArtifactLoadError::Invalid {
                kind: ArtifactKind::Manifest,
                reason: format!("{file:?} is not a plain file name"),
            });
        }
        let path = dir.join(file);
        let bytes = fs::read(&path).map_err(|source| ArtifactLoadError::Read {
            kind: ArtifactKind::Manifest,
            path: path.clone(),
            source,
        })?;
        if !constant_time_eq_str(&sha256_hex(&bytes), &expected.to_ascii_lowercase()) {
            return Err(ArtifactLoadError::DigestMismatch { file: file.clone() });
        }
    }

    tracing::info!("Verified {} artifact digests", manifest.files.len());
    Ok(())
}

/// Hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Build a manifest binding the three artifacts in `dir`.
///
/// # Errors
/// Returns `ArtifactLoadError` if an artifact cannot be read.
pub fn build_manifest(dir: &Path) -> Result<ArtifactManifest, ArtifactLoadError> {
    let mut files = BTreeMap::new();
    for kind in [ArtifactKind::Model, ArtifactKind::Scaler, ArtifactKind::Schema] {
        let bytes = read_bytes(dir, kind)?;
        files.insert(kind.file_name().to_string(), sha256_hex(&bytes));
    }
    Ok(ArtifactManifest {
        version: MANIFEST_VERSION,
        files,
    })
}

/// Check that `dir` loads, then write its `manifest.json`.
///
/// Any existing manifest is ignored and replaced.
///
/// # Errors
/// `CardioscanError::ArtifactLoad` when the artifacts would be refused at
/// startup, `CardioscanError::Io` when the manifest cannot be written.
pub fn seal(dir: &Path) -> crate::Result<ArtifactManifest> {
    let options = LoadOptions {
        ignore_manifest: true,
        ..LoadOptions::default()
    };
    ModelArtifacts::load(dir, options)?;

    let manifest = build_manifest(dir)?;
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(dir.join(MANIFEST_FILE), json + "\n")?;

    tracing::info!("Sealed {} artifacts in {:?}", manifest.files.len(), dir);
    Ok(manifest)
}

// Constant-time compare for ASCII strings (SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const COLUMNS: &str = r#"["age","sex","cp_asymptomatic"]"#;
    const SCALER: &str = r#"{"feature_names_in":["age","sex","cp_asymptomatic"],"mean":[54.0,0.7,0.5],"scale":[9.0,0.46,0.5]}"#;
    const MODEL: &str = r#"{"kind":"logistic_regression","coefficients":[0.4,0.6,1.1],"intercept":-0.2}"#;

    fn write_artifacts(dir: &Path, columns: &str, scaler: &str, model: &str) {
        fs::write(dir.join(SCHEMA_FILE), columns).expect("write schema");
        fs::write(dir.join(SCALER_FILE), scaler).expect("write scaler");
        fs::write(dir.join(MODEL_FILE), model).expect("write model");
    }

    fn write_manifest(dir: &Path) {
        let manifest = build_manifest(dir).expect("manifest");
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_vec(&manifest).expect("serialize manifest"),
        )
        .expect("write manifest");
    }

    #[test]
    fn test_loads_consistent_artifacts() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), COLUMNS, SCALER, MODEL);

        let artifacts = ModelArtifacts::load(temp.path(), LoadOptions::default()).expect("load");
        assert_eq!(artifacts.schema.len(), 3);
        assert_eq!(artifacts.model.kind(), "logistic_regression");
    }

    #[test]
    fn test_missing_directory() {
        let temp = tempdir().expect("tempdir");
        let err = ModelArtifacts::load(&temp.path().join("nope"), LoadOptions::default())
            .expect_err("must fail");
        assert!(matches!(err, ArtifactLoadError::MissingDirectory(_)));
    }

    #[test]
    fn test_missing_scaler() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), COLUMNS, SCALER, MODEL);
        fs::remove_file(temp.path().join(SCALER_FILE)).expect("remove");

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).expect_err("must fail");
        assert!(matches!(
            err,
            ArtifactLoadError::Missing {
                kind: ArtifactKind::Scaler,
                ..
            }
        ));
    }

    #[test]
    fn test_corrupt_model() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), COLUMNS, SCALER, "{not json");

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).expect_err("must fail");
        assert!(matches!(
            err,
            ArtifactLoadError::Corrupt {
                kind: ArtifactKind::Model,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_schema_is_a_schema_error() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), "[]", SCALER, MODEL);

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).expect_err("must fail");
        assert!(matches!(
            err,
            ArtifactLoadError::Schema(EncodingError::EmptySchema)
        ));
    }

    #[test]
    fn test_width_mismatch() {
        let temp = tempdir().expect("tempdir");
        let model = r#"{"kind":"logistic_regression","coefficients":[0.4,0.6],"intercept":0.0}"#;
        write_artifacts(temp.path(), COLUMNS, SCALER, model);

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).expect_err("must fail");
        assert!(matches!(
            err,
            ArtifactLoadError::Invalid {
                kind: ArtifactKind::Model,
                ..
            }
        ));
    }

    #[test]
    fn test_scaler_order_must_match_schema() {
        let temp = tempdir().expect("tempdir");
        let scaler = r#"{"feature_names_in":["sex","age","cp_asymptomatic"],"mean":[0,0,0],"scale":[1,1,1]}"#;
        write_artifacts(temp.path(), COLUMNS, scaler, MODEL);

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).expect_err("must fail");
        assert!(err.to_string().contains("schema order"));
    }

    #[test]
    fn test_manifest_round_trip_and_tamper() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), COLUMNS, SCALER, MODEL);
        write_manifest(temp.path());

        let options = LoadOptions {
            require_manifest: true,
            ..LoadOptions::default()
        };
        ModelArtifacts::load(temp.path(), options).expect("sealed artifacts load");

        let tampered = r#"{"kind":"logistic_regression","coefficients":[9.0,0.6,1.1],"intercept":-0.2}"#;
        fs::write(temp.path().join(MODEL_FILE), tampered).expect("tamper");

        let err = ModelArtifacts::load(temp.path(), options).expect_err("must fail");
        assert!(matches!(err, ArtifactLoadError::DigestMismatch { ref file } if file == MODEL_FILE));
    }

    #[test]
    fn test_ignore_manifest_allows_resealing() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), COLUMNS, SCALER, MODEL);
        fs::write(
            temp.path().join(MANIFEST_FILE),
            r#"{"version":1,"files":{"scaler.json":"00"}}"#,
        )
        .expect("write stale manifest");

        let options = LoadOptions {
            ignore_manifest: true,
            ..LoadOptions::default()
        };
        ModelArtifacts::load(temp.path(), options).expect("manifest ignored");
    }

    #[test]
    fn test_seal_replaces_stale_manifest() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), COLUMNS, SCALER, MODEL);
        fs::write(
            temp.path().join(MANIFEST_FILE),
            r#"{"version":1,"files":{"scaler.json":"00"}}"#,
        )
        .expect("write stale manifest");

        let manifest = seal(temp.path()).expect("seal");
        assert_eq!(manifest.files.len(), 3);

        let options = LoadOptions {
            require_manifest: true,
            ..LoadOptions::default()
        };
        ModelArtifacts::load(temp.path(), options).expect("sealed artifacts load");
    }

    #[test]
    fn test_seal_refuses_invalid_artifacts() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), COLUMNS, SCALER, "{not json");

        let err = seal(temp.path()).expect_err("must fail");
        assert!(matches!(
            err,
            crate::CardioscanError::ArtifactLoad(ArtifactLoadError::Corrupt { .. })
        ));
        assert!(!temp.path().join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_seal_reports_write_failure() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), COLUMNS, SCALER, MODEL);
        // A directory where the manifest should go makes the write fail.
        fs::create_dir(temp.path().join(MANIFEST_FILE)).expect("mkdir");

        let err = seal(temp.path()).expect_err("must fail");
        assert!(matches!(err, crate::CardioscanError::Io(_)));
    }

    #[test]
    fn test_manifest_required() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path(), COLUMNS, SCALER, MODEL);

        let err = ModelArtifacts::load(
            temp.path(),
            LoadOptions {
                require_manifest: true,
                ..LoadOptions::default()
            },
        )
        .expect_err("must fail");
        assert!(matches!(err, ArtifactLoadError::ManifestRequired(_)));
    }
}
