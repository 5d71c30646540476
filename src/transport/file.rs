use std::fs::File;
use std::path::Path;

use log::debug;

use crate::error::RelayError;

pub fn open_file(path: &Path) -> Result<File, RelayError> {
    let file = File::open(path).map_err(|source| RelayError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("opened input file {}", path.display());
    Ok(file)
}
