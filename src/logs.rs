use std::path::Path;

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    {ContentLimit, FileRotate},
};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Sends `log` records to `<log_dir>/timeline.log`, keeping the 3 latest files
/// of up to 1000 lines each. Fails if a logger was already installed.
pub fn init(log_dir: impl AsRef<Path>, level: LevelFilter) -> Result<()> {
    let path = log_dir.as_ref().join("timeline.log");
    let log = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(3)),
        ContentLimit::Lines(1000),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    log::set_boxed_logger(WriteLogger::new(level, config, log))?;
    log::set_max_level(level);
    Ok(())
}
