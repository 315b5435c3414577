//! Follow a growing log file line by line.

use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::AppResult;

pub const FILE_WAIT_INTERVAL: Duration = Duration::from_secs(2);
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct LogTail {
    reader: BufReader<File>,
    buf: Vec<u8>,
}

impl LogTail {
    /// Wait until `path` exists, then position at its current end.
    /// Falls back to the start when the file cannot be seeked.
    pub async fn open(path: &Path) -> AppResult<Self> {
        loop {
            match File::open(path).await {
                Ok(mut file) => {
                    if let Err(e) = file.seek(SeekFrom::End(0)).await {
                        warn!("File is not seekable ({}), reading from beginning", e);
                    }
                    return Ok(Self {
                        reader: BufReader::new(file),
                        buf: Vec::new(),
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    info!(path = %path.display(), "Waiting for log file...");
                    tokio::time::sleep(FILE_WAIT_INTERVAL).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Next complete line, newline included. Polls at EOF and holds back a
    /// trailing fragment until its newline arrives. Invalid UTF-8 is replaced
    /// with U+FFFD rather than failing the tail.
    pub async fn next_line(&mut self) -> AppResult<String> {
        loop {
            let read = self.reader.read_until(b'\n', &mut self.buf).await?;
            if read == 0 {
                tokio::time::sleep(POLL_INTERVAL).await;
                continue;
            }
            if self.buf.last() != Some(&b'\n') {
                debug!("partial line buffered, waiting for the rest");
                continue;
            }

            let line = String::from_utf8_lossy(&self.buf).into_owned();
            self.buf.clear();
            return Ok(line);
        }
    }
}
