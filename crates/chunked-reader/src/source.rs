//! Byte sources the reader can reopen from offset 0 on every query.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::char_stream::CharStream;
use crate::encoding::TextEncoding;
use crate::ReaderError;

/// A restartable byte stream. Each `open` must start from the first byte.
pub trait ByteSource: Send + Sync {
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;

    /// Display name (file name for files).
    fn name(&self) -> &str;
}

/// A file on disk, reopened for every query.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Bytes already in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl ByteSource for MemorySource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.bytes))))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A byte source plus the encoding chosen for it.
#[derive(Clone)]
pub struct TextSource {
    source: Arc<dyn ByteSource>,
    encoding: TextEncoding,
}

impl TextSource {
    pub fn new(source: Arc<dyn ByteSource>, encoding: TextEncoding) -> Self {
        Self { source, encoding }
    }

    pub fn file(path: impl Into<PathBuf>, encoding: TextEncoding) -> Self {
        Self::new(Arc::new(FileSource::new(path)), encoding)
    }

    pub fn memory(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>, encoding: TextEncoding) -> Self {
        Self::new(Arc::new(MemorySource::new(name, bytes)), encoding)
    }

    /// Same bytes, different encoding.
    pub fn with_encoding(&self, encoding: TextEncoding) -> Self {
        Self {
            source: Arc::clone(&self.source),
            encoding,
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    /// Opens a fresh decoded stream at the start of the source.
    pub fn open_chars(&self) -> Result<CharStream<Box<dyn Read + Send>>, ReaderError> {
        let reader = self
            .source
            .open()
            .map_err(|e| ReaderError::StreamUnavailable(format!("{}: {}", self.source.name(), e)))?;
        Ok(CharStream::new(reader, self.encoding))
    }
}

impl std::fmt::Debug for TextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSource")
            .field("name", &self.source.name())
            .field("encoding", &self.encoding)
            .finish()
    }
}
