use crate::output::OutputResult;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `value` as pretty-printed JSON, replacing `path` atomically
///
/// The data goes to a temporary file in the destination directory, which is
/// then renamed over `path`. Readers see either the old file or the complete
/// new one.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    Ok(())
}
