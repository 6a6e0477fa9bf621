use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid semantic version '{version}'")]
    Parse {
        version: String,
        #[source]
        source: semver::Error,
    },
}
