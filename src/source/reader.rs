//! Streaming NDJSON reader

use super::types::Compression;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Read buffer size for source files
const READ_BUFFER_SIZE: usize = 1 << 20;

/// Iterator over the JSON objects of an NDJSON file.
///
/// Yields `(line, object)` with 1-based line numbers. Blank lines are
/// skipped. A line that is not a UTF-8 JSON object yields
/// [`Error::Decode`] and the reader moves on to the next line; an I/O error
/// ends the stream.
pub struct JsonlReader {
    inner: Box<dyn BufRead + Send>,
    buffer: Vec<u8>,
    line: usize,
    path: PathBuf,
    done: bool,
}

impl JsonlReader {
    /// Open a source file, decompressing it if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::source_not_found(path),
            _ => Error::Io(e),
        })?;

        let mut buffered = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let compression = Compression::detect(path, buffered.fill_buf()?);

        let inner: Box<dyn BufRead + Send> = match compression {
            Compression::Gzip => Box::new(BufReader::with_capacity(
                READ_BUFFER_SIZE,
                MultiGzDecoder::new(buffered),
            )),
            Compression::None => Box::new(buffered),
        };

        tracing::debug!(path = %path.display(), ?compression, "Opened source");

        Ok(Self {
            inner,
            buffer: Vec::new(),
            line: 0,
            path: path.to_path_buf(),
            done: false,
        })
    }

    /// The file being read
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last line number read
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Iterator for JsonlReader {
    type Item = Result<(usize, JsonObject)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            self.buffer.clear();
            match self.inner.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::Io(e)));
                }
            }
            self.line += 1;

            if self.buffer.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let parsed = match serde_json::from_slice::<JsonValue>(&self.buffer) {
                Ok(JsonValue::Object(object)) => Ok((self.line, object)),
                Ok(_) => Err(Error::decode(self.line, "line is not a JSON object")),
                Err(e) => Err(Error::decode(self.line, e.to_string())),
            };
            return Some(parsed);
        }
    }
}
