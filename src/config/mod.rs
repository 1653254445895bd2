pub mod catalog;
pub mod groups;

pub use catalog::*;
pub use groups::*;

use std::path::{Path, PathBuf};

/// Per-project config directory: `<project>/.treegate/`.
pub fn project_dir(project_root: &Path) -> PathBuf {
    project_root.join(".treegate")
}
