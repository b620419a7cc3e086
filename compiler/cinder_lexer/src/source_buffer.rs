//! Source buffers and the filesystem seam they are loaded through.
//!
//! A [`SourceBuffer`] owns one file's bytes for the lifetime of the
//! compilation; everything downstream borrows. Loading goes through the
//! [`Vfs`] trait so drivers and tests can inject their own filesystem.
//! Load failures are reported as diagnostics against the filename and
//! yield `None` — a missing source buffer is fatal for the compilation
//! unit but never a panic.

use std::io::{self, Read};

use cinder_diagnostic::{
    diag_args, diagnostic, DiagnosticBase, DiagnosticConsumer, DiagnosticConverter,
    DiagnosticEmitter, DiagnosticLocation,
};
use tracing::debug;

/// Metadata for an opened file.
#[derive(Clone, Copy, Debug)]
pub struct FileStat {
    pub size: u64,
    pub is_regular_file: bool,
}

/// An opened file handle.
pub trait VfsFile {
    fn stat(&self) -> io::Result<FileStat>;

    fn read(&mut self) -> io::Result<Vec<u8>>;
}

/// Abstract filesystem used by the source loader.
pub trait Vfs {
    fn open_for_read(&self, path: &str) -> io::Result<Box<dyn VfsFile>>;
}

/// The real filesystem.
pub struct OsFs;

struct OsFile(std::fs::File);

impl Vfs for OsFs {
    fn open_for_read(&self, path: &str) -> io::Result<Box<dyn VfsFile>> {
        Ok(Box::new(OsFile(std::fs::File::open(path)?)))
    }
}

impl VfsFile for OsFile {
    fn stat(&self) -> io::Result<FileStat> {
        let metadata = self.0.metadata()?;
        Ok(FileStat {
            size: metadata.len(),
            is_regular_file: metadata.is_file(),
        })
    }

    fn read(&mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.0.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Sources must stay below 2 GiB so byte offsets fit a signed 32-bit
/// handle.
const MAX_SOURCE_SIZE: u64 = 1 << 31;

/// Converter for diagnostics that only have a filename to point at.
struct FilenameConverter;

impl DiagnosticConverter<&str> for FilenameConverter {
    fn convert_loc(
        &self,
        filename: &str,
        _context_fn: &mut dyn FnMut(DiagnosticLocation, &DiagnosticBase),
    ) -> DiagnosticLocation {
        DiagnosticLocation {
            filename: filename.to_string(),
            ..DiagnosticLocation::default()
        }
    }
}

/// An owned in-memory copy of one source file.
#[derive(Debug)]
pub struct SourceBuffer {
    filename: String,
    source: Vec<u8>,
    is_regular_file: bool,
}

impl SourceBuffer {
    /// Wrap in-memory bytes as a source buffer (REPL input, tests).
    #[must_use]
    pub fn from_bytes(filename: impl Into<String>, source: Vec<u8>) -> SourceBuffer {
        SourceBuffer {
            filename: filename.into(),
            source,
            is_regular_file: false,
        }
    }

    /// Load a file through `fs`, reporting failures to `consumer`.
    pub fn from_file(
        fs: &dyn Vfs,
        filename: &str,
        consumer: &mut dyn DiagnosticConsumer,
    ) -> Option<SourceBuffer> {
        let converter = FilenameConverter;
        let mut emitter = DiagnosticEmitter::new(&converter, consumer);

        let mut file = match fs.open_for_read(filename) {
            Ok(file) => file,
            Err(error) => {
                diagnostic!(ErrorOpeningFile, Error, "Error opening file for read: {0}");
                emitter.emit(filename, &ErrorOpeningFile, diag_args![error]);
                return None;
            }
        };

        let stat = match file.stat() {
            Ok(stat) => stat,
            Err(error) => {
                diagnostic!(ErrorStattingFile, Error, "Error statting file: {0}");
                emitter.emit(filename, &ErrorStattingFile, diag_args![error]);
                return None;
            }
        };

        Self::from_read_result(file.read(), filename, stat.is_regular_file, consumer)
    }

    /// Read the whole standard input as a source buffer.
    pub fn from_stdin(consumer: &mut dyn DiagnosticConsumer) -> Option<SourceBuffer> {
        let mut bytes = Vec::new();
        let result = io::stdin().read_to_end(&mut bytes).map(|_| bytes);
        Self::from_read_result(result, "<stdin>", false, consumer)
    }

    fn from_read_result(
        result: io::Result<Vec<u8>>,
        filename: &str,
        is_regular_file: bool,
        consumer: &mut dyn DiagnosticConsumer,
    ) -> Option<SourceBuffer> {
        let converter = FilenameConverter;
        let mut emitter = DiagnosticEmitter::new(&converter, consumer);

        let source = match result {
            Ok(source) => source,
            Err(error) => {
                diagnostic!(ErrorReadingFile, Error, "Error reading file: {0}");
                emitter.emit(filename, &ErrorReadingFile, diag_args![error]);
                return None;
            }
        };

        if source.len() as u64 >= MAX_SOURCE_SIZE {
            diagnostic!(
                FileTooLarge,
                Error,
                "File is over the 2GiB input limit; size is {0} bytes."
            );
            emitter.emit(filename, &FileTooLarge, diag_args![source.len()]);
            return None;
        }

        debug!(filename, size = source.len(), "loaded source file");

        Some(SourceBuffer {
            filename: filename.to_string(),
            source,
            is_regular_file,
        })
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    #[must_use]
    pub fn is_regular_file(&self) -> bool {
        self.is_regular_file
    }
}
