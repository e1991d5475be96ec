// ScanLogs - platform/fs.rs
//
// Filesystem access for the CLI: reading a report and creating export files.
// Parsing and CSV rendering stay in the core layer.

use crate::util::constants::MAX_REPORT_FILE_SIZE;
use crate::util::error::{ExportError, InputError};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Read a whole report file as text.
///
/// Files above `MAX_REPORT_FILE_SIZE` are rejected before reading. Invalid
/// UTF-8 is replaced rather than failing the load.
pub fn read_report(path: &Path) -> Result<String, InputError> {
    let io_err = |e: io::Error| InputError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(InputError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(io_err(e)),
    };

    if metadata.len() > MAX_REPORT_FILE_SIZE {
        return Err(InputError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: MAX_REPORT_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Report is not valid UTF-8; decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    tracing::debug!(path = %path.display(), bytes = text.len(), "Report read");
    Ok(text)
}

/// Create `dir/file_name` (creating `dir` if needed) and hand a buffered
/// writer to `write`. Returns the written path and `write`'s row count.
pub fn write_export<F>(
    dir: &Path,
    file_name: &str,
    write: F,
) -> Result<(PathBuf, usize), ExportError>
where
    F: FnOnce(&mut BufWriter<File>, &Path) -> Result<usize, ExportError>,
{
    let path = dir.join(file_name);
    let io_err = |e: io::Error| ExportError::Io {
        path: path.clone(),
        source: e,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;
    let file = File::create(&path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let rows = write(&mut writer, &path)?;
    writer.flush().map_err(io_err)?;

    tracing::info!(path = %path.display(), rows, "Export written");
    Ok((path, rows))
}
