use std::path::Path;

use crate::project::Project;

/// Source of projects: anything that can turn file content into a [`Project`].
pub trait ProjectReader {
    type Error: std::error::Error + From<std::io::Error>;

    fn read_bytes(&self, data: &[u8]) -> Result<Project, Self::Error>;

    fn read_path(&self, path: &Path) -> Result<Project, Self::Error> {
        let data = std::fs::read(path)?;
        self.read_bytes(&data)
    }
}
