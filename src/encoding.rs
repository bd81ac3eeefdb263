//! Encoding detection and line decoding
//!
//! Combo files come in all sorts of encodings and are frequently damaged.
//! Lines are decoded permissively: a BOM wins, then UTF-8 unless most of the
//! non-ASCII bytes in a sample are not UTF-8, in which case the charset is
//! sniffed. Invalid sequences become U+FFFD.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use memchr::memchr2;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Bytes sampled for encoding detection
const SAMPLE_SIZE: usize = 64 * 1024;

/// Read buffer for the line reader
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    /// Detected encoding name
    pub name: &'static str,
    /// Confidence level (0.0 - 1.0)
    pub confidence: f32,
    /// The encoding_rs Encoding reference
    pub encoding: &'static Encoding,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            confidence: 1.0,
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Detect the encoding of a file by sampling its content
pub fn detect_encoding(path: &Path) -> io::Result<EncodingInfo> {
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    File::open(path)?
        .take(SAMPLE_SIZE as u64)
        .read_to_end(&mut sample)?;

    Ok(detect_sample(&sample))
}

/// Detect the encoding of an in-memory sample
pub fn detect_sample(sample: &[u8]) -> EncodingInfo {
    if sample.is_empty() {
        return EncodingInfo::default();
    }

    if let Some(encoding) = detect_bom(sample) {
        return EncodingInfo {
            name: encoding.name(),
            confidence: 1.0,
            encoding,
        };
    }

    // Damaged UTF-8 stays UTF-8; only invalid sequences get replaced
    let (invalid, non_ascii) = utf8_damage(sample);
    if invalid * 2 <= non_ascii {
        return EncodingInfo {
            name: encoding_rs::UTF_8.name(),
            confidence: if invalid == 0 { 1.0 } else { 0.9 },
            encoding: encoding_rs::UTF_8,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    let encoding = detector.guess(None, true);

    EncodingInfo {
        name: encoding.name(),
        confidence: 0.8,
        encoding,
    }
}

/// Count bytes in invalid UTF-8 sequences and all non-ASCII bytes
///
/// A sequence cut off by the end of the sample is not counted as invalid.
fn utf8_damage(sample: &[u8]) -> (usize, usize) {
    let non_ascii = sample.iter().filter(|b| !b.is_ascii()).count();

    let mut invalid = 0;
    let mut rest = sample;
    while let Err(e) = std::str::from_utf8(rest) {
        match e.error_len() {
            Some(len) => {
                invalid += len;
                rest = &rest[e.valid_up_to() + len..];
            }
            None => break,
        }
    }

    (invalid, non_ascii)
}

/// Detect BOM (Byte Order Mark) at the start of content
fn detect_bom(content: &[u8]) -> Option<&'static Encoding> {
    Encoding::for_bom(content).map(|(encoding, _)| encoding)
}

/// Lazy line iterator that transcodes its input to UTF-8
///
/// Yields one `String` per line. `\n`, `\r\n` and a bare `\r` all end a
/// line and are removed. Decoding never fails; only read errors surface.
pub struct EncodedLineReader<R: Read> {
    reader: BufReader<DecodeReaderBytes<R, Vec<u8>>>,
    line_buffer: Vec<u8>,
    lines_read: u64,
    /// Last line ended in `\r`; a `\n` right after it belongs to that line
    pending_cr: bool,
}

impl EncodedLineReader<File> {
    /// Open a file, detecting its encoding from the first 64KB
    pub fn open(path: &Path) -> io::Result<Self> {
        let info = detect_encoding(path)?;
        log::debug!(
            "Detected encoding {} for {:?} (confidence {:.1})",
            info.name,
            path,
            info.confidence
        );

        let file = File::open(path)?;
        Ok(Self::new(file, Some(info.encoding)))
    }
}

impl<R: Read> EncodedLineReader<R> {
    /// Wrap a reader; `None` means BOM sniffing with UTF-8 passthrough
    pub fn new(inner: R, encoding: Option<&'static Encoding>) -> Self {
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(encoding)
            .bom_override(true)
            .build(inner);

        Self {
            reader: BufReader::with_capacity(READ_BUFFER_SIZE, decoder),
            line_buffer: Vec::with_capacity(4096),
            lines_read: 0,
            pending_cr: false,
        }
    }

    /// Number of lines yielded so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

impl<R: Read> EncodedLineReader<R> {
    /// Read the next line into `line_buffer`, without its terminator
    ///
    /// Returns false at end of input when nothing was read.
    fn read_line(&mut self) -> io::Result<bool> {
        let mut read_any = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(read_any);
            }

            if self.pending_cr {
                self.pending_cr = false;
                if available[0] == b'\n' {
                    self.reader.consume(1);
                    continue;
                }
            }

            match memchr2(b'\n', b'\r', available) {
                Some(pos) => {
                    self.pending_cr = available[pos] == b'\r';
                    self.line_buffer.extend_from_slice(&available[..pos]);
                    self.reader.consume(pos + 1);
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    self.line_buffer.extend_from_slice(available);
                    self.reader.consume(len);
                    read_any = true;
                }
            }
        }
    }
}

impl<R: Read> Iterator for EncodedLineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_buffer.clear();

        match self.read_line() {
            Ok(false) => None,
            Ok(true) => {
                let mut line = String::from_utf8_lossy(&self.line_buffer).into_owned();
                if self.lines_read == 0 && line.starts_with('\u{FEFF}') {
                    line.remove(0);
                }

                self.lines_read += 1;
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
