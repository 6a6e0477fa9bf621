mod context;
mod install;
mod previous_revision;
mod results;
mod scope;
mod select;
mod testing;
mod validation;

pub use context::{Collaborators, HelmArgs};
pub use install::{InstallChain, InstallSettings, UpgradeContext};
pub use previous_revision::PreviousRevision;
pub use results::{TestResult, TestResults};
pub use scope::{CleanupPolicy, InstallParams, InstallScope, MAX_NAME_LENGTH, sanitize_name};
pub use select::{ChartSelector, target_revision};
pub use testing::{TestMode, TestOperation};
pub use validation::{ValidationChain, ValidationCheck};
