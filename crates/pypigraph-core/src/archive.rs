//! Remote archive extraction.
//!
//! [`fetch_matching`] downloads an archive over HTTP and returns the
//! concatenated bytes of every entry whose path matches a pattern. The same
//! logical file can appear at multiple paths inside a distribution, so the
//! scan always runs to the end of the archive rather than stopping at the
//! first hit — multiple matches are also a diagnostic signal callers may
//! want.
//!
//! The two formats get different strategies:
//!
//! - **tar.gz** is decoded as it downloads. The HTTP body is copied chunk by
//!   chunk into a bounded channel by a dedicated task, while a blocking stage
//!   (`GzDecoder` feeding `tar::Archive`) consumes the channel's other end.
//!   Both sides run concurrently; the channel is the explicit buffer between
//!   them, so neither side can stall the other indefinitely, and at no point
//!   is the decompressed stream held in memory beyond the matched entries'
//!   own bytes.
//! - **zip** is buffered whole before any parsing: the central directory
//!   sits at the end of the file and cannot be read from a forward-only
//!   stream.

use crate::error::{CoreError, Result};
use crate::http::HttpClient;
use bytes::{Buf, Bytes};
use flate2::read::GzDecoder;
use futures::StreamExt;
use regex::Regex;
use std::io::{Cursor, Read};
use tokio::sync::mpsc;

/// In-flight response chunks between the download task and the decode stage.
const CHUNK_BUFFER: usize = 32;

/// Compression format of a remote archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Gzip-compressed tarball, decoded as a stream.
    TarGz,
    /// Zip archive, fully buffered before decoding.
    Zip,
}

/// Downloads the archive at `url` and returns the concatenated contents of
/// every entry whose path matches `pattern`.
///
/// # Errors
///
/// - [`CoreError::NoMatch`] if the archive was scanned end to end and no
///   entry matched — distinct from every transport and decode failure, so
///   callers can treat it as an expected absence.
/// - [`CoreError::Http`] / [`CoreError::Status`] for transport failures.
/// - [`CoreError::Archive`] / [`CoreError::Zip`] for malformed archives.
pub async fn fetch_matching(
    client: &HttpClient,
    url: &str,
    pattern: &Regex,
    kind: ArchiveKind,
) -> Result<Vec<u8>> {
    match kind {
        ArchiveKind::TarGz => fetch_tar_gz(client, url, pattern).await,
        ArchiveKind::Zip => fetch_zip(client, url, pattern).await,
    }
}

async fn fetch_tar_gz(client: &HttpClient, url: &str, pattern: &Regex) -> Result<Vec<u8>> {
    let mut stream = client.get_stream(url).await?;
    let (tx, rx) = mpsc::channel::<Bytes>(CHUNK_BUFFER);

    // Copy-in task: its only job is to move bytes into the channel and close
    // it when the body is exhausted. Dropping the sender is the end-of-input
    // signal the decode stage sees as EOF.
    let source = url.to_owned();
    let copier = tokio::spawn(async move {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| CoreError::http(source.as_str(), e))?;
            if tx.send(chunk).await.is_err() {
                // Decode stage stopped reading; the archive end marker
                // precedes the end of the download.
                break;
            }
        }
        Ok::<_, CoreError>(())
    });

    let pattern = pattern.clone();
    let scan = tokio::task::spawn_blocking(move || scan_tar(ChannelReader::new(rx), &pattern));

    let scanned = scan.await?;
    let copied = copier.await?;
    match (scanned, copied) {
        // A transport failure explains whatever truncation the decoder saw.
        (Err(_), Err(transport)) => Err(transport),
        (Err(decode), Ok(())) => Err(decode),
        (Ok(data), _) => Ok(data),
    }
}

async fn fetch_zip(client: &HttpClient, url: &str, pattern: &Regex) -> Result<Vec<u8>> {
    let body = client.get_bytes(url).await?;
    let pattern = pattern.clone();
    tokio::task::spawn_blocking(move || scan_zip(body, &pattern)).await?
}

/// Scans a gzip-compressed tar stream, appending every matching entry.
///
/// The entries iterator terminates at the tar end-of-archive marker; reaching
/// it is normal completion, not an error, even if the HTTP body has trailing
/// bytes the decoder never consumes.
fn scan_tar<R: Read>(reader: R, pattern: &Regex) -> Result<Vec<u8>> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));

    let mut data = Vec::new();
    let mut matched = false;
    for entry in archive.entries().map_err(CoreError::archive)? {
        let mut entry = entry.map_err(CoreError::archive)?;
        let path = entry
            .path()
            .map_err(CoreError::archive)?
            .to_string_lossy()
            .into_owned();
        if pattern.is_match(&path) {
            entry.read_to_end(&mut data).map_err(CoreError::archive)?;
            matched = true;
        }
    }

    if !matched {
        return Err(CoreError::NoMatch {
            pattern: pattern.as_str().to_owned(),
        });
    }
    Ok(data)
}

fn scan_zip(body: Bytes, pattern: &Regex) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(body)).map_err(CoreError::zip)?;

    let mut data = Vec::new();
    let mut matched = false;
    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(CoreError::zip)?;
        if pattern.is_match(file.name()) {
            file.read_to_end(&mut data).map_err(CoreError::archive)?;
            matched = true;
        }
    }

    if !matched {
        return Err(CoreError::NoMatch {
            pattern: pattern.as_str().to_owned(),
        });
    }
    Ok(data)
}

/// Blocking `Read` adapter over the chunk channel.
///
/// `read` hands out bytes from the current chunk and blocks on the channel
/// when it runs dry; a closed channel reads as EOF.
struct ChannelReader {
    rx: mpsc::Receiver<Bytes>,
    current: Bytes,
}

impl ChannelReader {
    fn new(rx: mpsc::Receiver<Bytes>) -> Self {
        Self {
            rx,
            current: Bytes::new(),
        }
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while !self.current.has_remaining() {
            match self.rx.blocking_recv() {
                Some(chunk) => self.current = chunk,
                None => return Ok(0),
            }
        }
        let n = buf.len().min(self.current.remaining());
        self.current.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }
}
