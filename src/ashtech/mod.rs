//! Ashtech receiver records.
//!
//! Ashtech binary records start with `$PASHR,` followed by a three
//! character identifier and a comma. Binary content is big endian.
use std::io::Read;

use log::{debug, trace};
use thiserror::Error as ThisError;

mod alb;

pub use alb::Alb;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ashtech decoding errors
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("not enough bytes")]
    NotEnoughBytes,
    #[error("missing $PASHR, preamble")]
    InvalidPreamble,
    #[error("invalid record format")]
    InvalidFormat,
    #[error("unexpected record {0}")]
    UnexpectedRecord(String),
    #[error("invalid svid {0}")]
    InvalidSvid(u16),
    #[error("decoding error: {0}")]
    Decode(#[from] crate::error::DecodeError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// `$PASHR,XXX,` record header
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordHeader {
    /// Record identifier
    pub id: String,
}

impl RecordHeader {
    pub const PREAMBLE: &'static [u8] = b"$PASHR,";
    /// Encoded size
    pub const SIZE: usize = 11;

    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < Self::SIZE {
            return Err(Error::NotEnoughBytes);
        }
        if !buf.starts_with(Self::PREAMBLE) {
            return Err(Error::InvalidPreamble);
        }
        if buf[10] != b',' {
            return Err(Error::InvalidFormat);
        }
        let id = std::str::from_utf8(&buf[7..10]).map_err(|_| Error::InvalidFormat)?;
        Ok(Self::new(id))
    }
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.len() < Self::SIZE {
            return Err(Error::NotEnoughBytes);
        }
        let id = self.id.as_bytes();
        if id.len() != 3 {
            return Err(Error::InvalidFormat);
        }
        buf[..7].copy_from_slice(Self::PREAMBLE);
        buf[7..10].copy_from_slice(id);
        buf[10] = b',';
        Ok(Self::SIZE)
    }
}

/// Ashtech record content
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AshtechRecord {
    Alb(Alb),
    /// Record we do not interprete, with its raw content
    Unknown { id: String, raw: Vec<u8> },
}

impl AshtechRecord {
    /// Record identifier
    pub fn id(&self) -> &str {
        match self {
            Self::Alb(_) => Alb::ID,
            Self::Unknown { id, .. } => id,
        }
    }
    /// Unwraps self as [Alb], if possible
    pub fn as_alb(&self) -> Option<&Alb> {
        match self {
            Self::Alb(alb) => Some(alb),
            _ => None,
        }
    }
}

/// Record located in a stream
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AshtechFrame {
    /// Offset of the first header byte in the stream
    pub offset: u64,
    pub record: AshtechRecord,
}

/// Size of a single read
const READ_SIZE: usize = 1024;

/// Ashtech stream decoder: iterates over the records found in
/// a readable interface, skipping any byte that does not belong
/// to a record.
/// ```
/// use gnss_nav::ashtech::{AshtechDecoder, AshtechRecord};
///
/// let bytes = b"garbage$PASHR,XYZ,0123".to_vec();
/// let mut decoder = AshtechDecoder::new(bytes.as_slice());
///
/// let frame = decoder.next().unwrap().unwrap();
/// assert_eq!(frame.offset, 7);
/// assert_eq!(frame.record.id(), "XYZ");
/// assert!(decoder.next().is_none());
/// ```
pub struct AshtechDecoder<R: Read> {
    reader: R,
    /// Pending bytes
    buffer: Vec<u8>,
    /// Stream offset of the first pending byte
    offset: u64,
    eos: bool,
}

fn find_preamble(buf: &[u8], from: usize) -> Option<usize> {
    if buf.len() < from + RecordHeader::PREAMBLE.len() {
        return None;
    }
    buf[from..]
        .windows(RecordHeader::PREAMBLE.len())
        .position(|w| w == RecordHeader::PREAMBLE)
        .map(|pos| pos + from)
}

impl<R: Read> AshtechDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(READ_SIZE),
            offset: 0,
            eos: false,
        }
    }
    /// Reads more bytes. Returns false once the stream is consumed.
    fn fill(&mut self) -> Result<bool, Error> {
        if self.eos {
            return Ok(false);
        }
        let mut chunk = [0_u8; READ_SIZE];
        let size = self.reader.read(&mut chunk)?;
        if size == 0 {
            self.eos = true;
            return Ok(false);
        }
        self.buffer.extend_from_slice(&chunk[..size]);
        Ok(true)
    }
    /// Drops `size` pending bytes
    fn consume(&mut self, size: usize) {
        let size = size.min(self.buffer.len());
        self.buffer.drain(..size);
        self.offset += size as u64;
    }
    fn next_frame(&mut self) -> Result<Option<AshtechFrame>, Error> {
        // synchronize on a header
        loop {
            match find_preamble(&self.buffer, 0) {
                Some(pos) => {
                    if pos > 0 {
                        trace!("ashtech: skipping {} bytes", pos);
                    }
                    self.consume(pos);
                    while self.buffer.len() < RecordHeader::SIZE {
                        if !self.fill()? {
                            return Ok(None);
                        }
                    }
                    if self.buffer[10] == b',' {
                        break;
                    }
                    self.consume(1);
                },
                None => {
                    // keep what could be a partial preamble
                    let keep = RecordHeader::PREAMBLE.len() - 1;
                    let len = self.buffer.len();
                    if len > keep {
                        self.consume(len - keep);
                    }
                    if !self.fill()? {
                        return Ok(None);
                    }
                },
            }
        }

        let offset = self.offset;
        let header = match RecordHeader::decode(&self.buffer) {
            Ok(header) => header,
            Err(e) => {
                debug!("ashtech: invalid header at offset {}", offset);
                self.consume(RecordHeader::SIZE);
                return Err(e);
            },
        };

        if header.id == Alb::ID {
            while self.buffer.len() < Alb::encoding_size() {
                if !self.fill()? {
                    debug!("ashtech: truncated ALB at offset {}", offset);
                    self.consume(self.buffer.len());
                    return Err(Error::NotEnoughBytes);
                }
            }
            let alb = Alb::decode(&self.buffer)?;
            self.consume(Alb::encoding_size());
            return Ok(Some(AshtechFrame {
                offset,
                record: AshtechRecord::Alb(alb),
            }));
        }

        // other records run up to the next header
        let end = loop {
            if let Some(end) = find_preamble(&self.buffer, RecordHeader::SIZE) {
                break end;
            }
            if !self.fill()? {
                break self.buffer.len();
            }
        };
        let raw = self.buffer[RecordHeader::SIZE..end].to_vec();
        self.consume(end);
        Ok(Some(AshtechFrame {
            offset,
            record: AshtechRecord::Unknown { id: header.id, raw },
        }))
    }
}

impl<R: Read> Iterator for AshtechDecoder<R> {
    type Item = Result<AshtechFrame, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
