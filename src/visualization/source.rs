//! Blocking reader for raw PCM sample blocks.
//!
//! The input is a headerless mono stream of signed 16-bit little-endian samples,
//! usually an MPD fifo. Each call fills a whole block or reports end of stream.

use anyhow::Context;
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;

/// Outcome of a block read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRead {
    /// The destination holds a full block of fresh samples.
    Filled,
    /// The producer closed the stream before a full block arrived.
    EndOfStream,
}

/// Reads fixed-size blocks of little-endian `i16` samples from a byte stream.
pub struct SampleReader<R> {
    inner: R,
    bytes: Vec<u8>,
}

impl SampleReader<BufReader<File>> {
    /// Opens a file or named pipe for reading.
    ///
    /// Opening a fifo blocks until a writer connects.
    ///
    /// # Errors
    /// - If the path cannot be opened for reading
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open PCM source {}", path.display()))?;
        tracing::info!("PCM source opened: {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> SampleReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes: Vec::new(),
        }
    }

    /// Fills `dest` with the next `dest.len()` samples.
    ///
    /// Blocks until the samples are available. A short read caused by the stream
    /// ending yields [`BlockRead::EndOfStream`]; the partial block is discarded.
    ///
    /// # Errors
    /// - Any I/O failure other than end of stream (e.g. a broken pipe)
    pub fn read_block(&mut self, dest: &mut [i16]) -> io::Result<BlockRead> {
        self.bytes.resize(dest.len() * 2, 0);

        match self.inner.read_exact(&mut self.bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(BlockRead::EndOfStream),
            Err(e) => return Err(e),
        }

        for (sample, raw) in dest.iter_mut().zip(self.bytes.chunks_exact(2)) {
            *sample = i16::from_le_bytes([raw[0], raw[1]]);
        }

        Ok(BlockRead::Filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pcm(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "producer went away"))
        }
    }

    #[test]
    fn test_reads_little_endian_samples() {
        let mut reader = SampleReader::new(Cursor::new(pcm(&[1, -1, i16::MAX, i16::MIN])));
        let mut block = [0i16; 4];

        assert_eq!(reader.read_block(&mut block).unwrap(), BlockRead::Filled);
        assert_eq!(block, [1, -1, i16::MAX, i16::MIN]);
    }

    #[test]
    fn test_consecutive_blocks() {
        let mut reader = SampleReader::new(Cursor::new(pcm(&[10, 20, 30, 40])));
        let mut block = [0i16; 2];

        reader.read_block(&mut block).unwrap();
        assert_eq!(block, [10, 20]);
        reader.read_block(&mut block).unwrap();
        assert_eq!(block, [30, 40]);
        assert_eq!(reader.read_block(&mut block).unwrap(), BlockRead::EndOfStream);
    }

    #[test]
    fn test_empty_stream_is_end_of_stream() {
        let mut reader = SampleReader::new(Cursor::new(Vec::new()));
        let mut block = [0i16; 8];

        assert_eq!(reader.read_block(&mut block).unwrap(), BlockRead::EndOfStream);
    }

    #[test]
    fn test_partial_block_is_end_of_stream() {
        // Three samples plus a dangling byte, block wants four.
        let mut bytes = pcm(&[5, 6, 7]);
        bytes.push(0x01);
        let mut reader = SampleReader::new(Cursor::new(bytes));
        let mut block = [0i16; 4];

        assert_eq!(reader.read_block(&mut block).unwrap(), BlockRead::EndOfStream);
    }

    #[test]
    fn test_other_errors_are_fatal() {
        let mut reader = SampleReader::new(BrokenPipe);
        let mut block = [0i16; 4];

        let err = reader.read_block(&mut block).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }
}
