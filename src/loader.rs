use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::model::{ModelArtifact, ModelError, ModelHandle, ModelSource, PlaceholderModel};

pub struct LoadedModel {
    pub handle: ModelHandle,
    pub kind: &'static str,
}

pub fn load_model(path: &Path) -> Result<LoadedModel, ModelError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelError::Missing(path.to_path_buf())
        } else {
            ModelError::Io { path: path.to_path_buf(), source }
        }
    })?;

    let artifact: ModelArtifact = serde_json::from_str(&text)
        .map_err(|source| ModelError::Parse { path: path.to_path_buf(), source })?;
    artifact.validate()?;

    let kind = artifact.kind();
    Ok(LoadedModel { handle: artifact.into_handle(), kind })
}

/// Loads the artifact once for the interactive app. Never fails: a missing
/// or broken artifact degrades to the placeholder (when allowed) or to no
/// model at all.
pub fn load_for_session(path: &Path, allow_placeholder: bool) -> (Option<ModelHandle>, ModelSource) {
    match load_model(path) {
        Ok(loaded) => {
            tracing::info!(path = %path.display(), kind = loaded.kind, "model loaded");
            (
                Some(loaded.handle),
                ModelSource::Artifact { path: path.to_path_buf(), kind: loaded.kind },
            )
        }
        Err(e) if allow_placeholder => {
            tracing::warn!(error = %e, "falling back to placeholder model");
            let handle: ModelHandle = Arc::new(PlaceholderModel);
            (Some(handle), ModelSource::Placeholder { reason: e.to_string() })
        }
        Err(e) => {
            tracing::warn!(error = %e, "no model available");
            (None, ModelSource::Unavailable { reason: e.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("car_price_loader_{}_{}", std::process::id(), name))
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let path = temp_path("does_not_exist.json");
        assert!(matches!(load_model(&path), Err(ModelError::Missing(_))));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let path = temp_path("garbage.json");
        fs::write(&path, "not json at all").unwrap();
        assert!(matches!(load_model(&path), Err(ModelError::Parse { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalid_artifact_is_rejected() {
        let path = temp_path("short_linear.json");
        fs::write(&path, r#"{"kind":"linear","intercept":0.0,"coefficients":[1.0,2.0]}"#).unwrap();
        assert!(matches!(load_model(&path), Err(ModelError::Invalid(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn linear_artifact_loads() {
        let path = temp_path("linear.json");
        fs::write(
            &path,
            r#"{"kind":"linear","intercept":0.5,"coefficients":[0,0.5,0,0,0,0,0]}"#,
        )
        .unwrap();
        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded.kind, "linear");
        let out = loaded.handle.predict(&[[2014.0, 6.0, 0.0, 0.0, 0.0, 0.0, 0.0]]).unwrap();
        assert_eq!(out, vec![3.5]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn session_load_falls_back_to_placeholder() {
        let path = temp_path("absent_for_session.json");
        let (handle, source) = load_for_session(&path, true);
        assert_eq!(handle.map(|h| h.name().to_string()), Some("placeholder".to_string()));
        assert!(matches!(source, ModelSource::Placeholder { .. }));
        assert!(source.warning().is_some());

        let (handle, source) = load_for_session(&path, false);
        assert!(handle.is_none());
        assert!(matches!(source, ModelSource::Unavailable { .. }));
    }
}
