use crate::Error;
use std::io::Read;
use std::path::{self, Path, PathBuf};

/// Combination of a module path and the corresponding file contents.
pub struct PathRead {
    pub path: Vec<String>,
    pub read: String,
}

impl PathRead {
    fn from_stdin() -> Result<Self, Error> {
        let mut read = String::new();
        std::io::stdin().read_to_string(&mut read)?;
        let path = Vec::new();
        Ok(Self { path, read })
    }
}

impl core::convert::TryFrom<&PathBuf> for PathRead {
    type Error = Error;

    fn try_from(file: &PathBuf) -> Result<Self, Error> {
        if file.to_str() == Some("-") {
            return Self::from_stdin();
        }
        let path = module_path(file).ok_or(Error::Module)?;
        let read = std::fs::read_to_string(file)?;
        Ok(Self { path, read })
    }
}

/// Return the module path corresponding to a file path.
fn module_path(path: &Path) -> Option<Vec<String>> {
    let components: Vec<_> = path
        .parent()
        .map(|p| p.components().collect())
        .unwrap_or_default();
    let mpath: Option<Vec<_>> = components
        .into_iter()
        .map(|component| match component {
            path::Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect();
    let mut mpath = mpath?;
    mpath.push(path.file_stem()?);
    mpath
        .iter()
        .map(|s| Some(String::from(s.to_str()?)))
        .collect()
}
