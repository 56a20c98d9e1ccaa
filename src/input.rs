//! @ai:module:intent Gather source text from stdin, files and directories into one buffer
//! @ai:module:layer infrastructure
//! @ai:module:public_api read_sources, read_file, collect_files
//! @ai:module:depends_on language, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::language::is_supported_file;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const STDIN_PATH: &str = "-";

/// @ai:intent Read every input into one newline-separated buffer, in argument order
/// @ai:pre an empty list or `-` means stdin
/// @ai:post one scan over the buffer sees the inputs as a single stream
/// @ai:effects fs:read, io:stdin
pub fn read_sources(paths: &[PathBuf]) -> Result<String> {
    if paths.is_empty() {
        return read_stdin();
    }

    let mut buffer = String::new();
    for path in paths {
        let chunks = if path.as_os_str() == STDIN_PATH {
            vec![read_stdin()?]
        } else if path.is_dir() {
            collect_files(path)
                .iter()
                .map(|file| read_file(file))
                .collect::<Result<Vec<_>>>()?
        } else if path.is_file() || !path.exists() {
            vec![read_file(path)?]
        } else {
            return Err(Error::UnsupportedFileType(path.display().to_string()));
        };

        for chunk in chunks {
            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(&chunk);
        }
    }

    Ok(buffer)
}

/// @ai:intent Read one file as UTF-8 text
/// @ai:effects fs:read
pub fn read_file(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "reading source");
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// @ai:intent List supported source files below a directory, sorted by name
/// @ai:effects fs:read
pub fn collect_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            let supported = is_supported_file(path);
            if !supported {
                tracing::trace!(path = %path.display(), "skipping unsupported file");
            }
            supported
        })
        .collect()
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
