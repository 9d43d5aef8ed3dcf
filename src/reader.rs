use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{GoldError, Result};
use crate::tagged::{parse_tagged_sentences, ParsedSentences};

/// Configuration for file reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 8192, // WHY: 8KB is optimal for most filesystems and network storage
        }
    }
}

/// Statistics for one file read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub bytes_read: u64,
    pub duration_ms: u64,
}

/// Async reader for source documents and tagged-sentence files
///
/// Reads whole files so line terminators survive for verbatim extraction.
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a UTF-8 file exactly as stored
    ///
    /// A missing file is a `MissingCollaborator`; invalid UTF-8 is an `Encoding` error.
    pub async fn read_text<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of file: {}", path.display());

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GoldError::MissingCollaborator { path: path.to_path_buf() });
            }
            Err(e) => {
                warn!("Failed to open file {}: {}", path.display(), e);
                return Err(GoldError::Io(e));
            }
        };

        // WHY: BufReader with custom buffer size reduces syscalls and improves throughput
        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let byte_count = bytes.len() as u64;
        let text = String::from_utf8(bytes).map_err(|_| GoldError::Encoding { path: path.to_path_buf() })?;

        let stats = ReadStats {
            file_path: path.display().to_string(),
            bytes_read: byte_count,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };
        debug!("Read {}: {} bytes in {}ms", stats.file_path, stats.bytes_read, stats.duration_ms);

        Ok((text, stats))
    }

    pub async fn read_document<P: AsRef<Path>>(&self, file_path: P) -> Result<Document> {
        let (text, _stats) = self.read_text(file_path).await?;
        Ok(Document::from_text(&text))
    }

    /// Read and parse a tagged-sentence file; malformed lines are reported, not fatal
    pub async fn read_tagged<P: AsRef<Path>>(&self, file_path: P) -> Result<ParsedSentences> {
        let path = file_path.as_ref();
        let (text, _stats) = self.read_text(path).await?;
        let parsed = parse_tagged_sentences(&text);

        if !parsed.errors.is_empty() {
            warn!("{}: skipped {} malformed lines", path.display(), parsed.errors.len());
        }
        Ok(parsed)
    }
}

impl Default for AsyncFileReader {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    #[tokio::test]
    async fn test_read_preserves_line_endings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("book.txt");
        fs::write(&path, "First line\r\nSecond line\nThird").await.unwrap();

        let reader = AsyncFileReader::default();
        let (text, stats) = reader.read_text(&path).await.unwrap();
        assert_eq!(text, "First line\r\nSecond line\nThird");
        assert_eq!(stats.bytes_read, 29);
    }

    #[tokio::test]
    async fn test_missing_file_is_missing_collaborator() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncFileReader::default();

        let err = reader.read_text(temp_dir.path().join("absent.txt")).await.unwrap_err();
        assert!(matches!(err, GoldError::MissingCollaborator { .. }));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_encoding_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.txt");
        fs::write(&path, [0x48, 0x69, 0xFF, 0xFE]).await.unwrap();

        let err = AsyncFileReader::default().read_document(&path).await.unwrap_err();
        assert!(matches!(err, GoldError::Encoding { .. }));
    }

    #[tokio::test]
    async fn test_small_buffer_reads_everything() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("book_seams.txt");
        let content = "0\tHello world.\t(1,1,1,13)\nbroken\n1\tAgain.\t(2,1,2,7)\n";
        fs::write(&path, content).await.unwrap();

        let reader = AsyncFileReader::new(ReaderConfig { buffer_size: 4 });
        let parsed = reader.read_tagged(&path).await.unwrap();
        assert_eq!(parsed.sentences.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
    }
}
