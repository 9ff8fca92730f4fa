//! Locate and parse the `.env` file into a key-value map (nothing is applied here).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directories searched for `.env`, in order.
///
/// With `override_dir` only that directory is searched. Otherwise: the directory of the
/// running executable, its parent, then the current directory. Lookup does not depend on
/// where the program was started from unless nothing is found next to the binary.
pub(crate) fn candidate_dirs(override_dir: Option<&Path>) -> Vec<PathBuf> {
    if let Some(dir) = override_dir {
        return vec![dir.to_path_buf()];
    }
    let mut dirs = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        let parent = exe_dir.parent().map(Path::to_path_buf);
        dirs.push(exe_dir);
        dirs.extend(parent);
    }
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }
    dirs
}

/// First `.env` that exists as a file in `dirs`.
pub(crate) fn find_dotenv(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|d| d.join(".env"))
        .find(|p| p.is_file())
}

/// Parses the file at `path`. Later duplicates of a key win.
pub(crate) fn parse_file(path: &Path) -> Result<HashMap<String, String>, dotenv::Error> {
    let mut out = HashMap::new();
    for item in dotenv::from_path_iter(path)? {
        let (key, value) = item?;
        out.insert(key, value);
    }
    Ok(out)
}

/// Loads the first `.env` found for `override_dir`. Returns the map and the file used;
/// no file yields an empty map.
pub fn load_env_map(
    override_dir: Option<&Path>,
) -> Result<(HashMap<String, String>, Option<PathBuf>), dotenv::Error> {
    match find_dotenv(&candidate_dirs(override_dir)) {
        Some(path) => Ok((parse_file(&path)?, Some(path))),
        None => Ok((HashMap::new(), None)),
    }
}
