//! Buffered reading of a single ceremony file with byte-offset tracking, so
//! every failure can point at the exact place in the file.
use crate::{
    decode::{point_from_coordinates, CoordinateDecode, DecodeError, Encoding},
    SetupError, SetupResult,
};
use ark_ec::short_weierstrass::{Affine, SWCurveConfig};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

/// An open ceremony file. The handle is closed when this value is dropped.
pub struct SourceFile {
    path: PathBuf,
    reader: BufReader<File>,
    len: u64,
    offset: u64,
    scratch: Vec<u8>,
}

impl SourceFile {
    pub fn open(path: &Path) -> SetupResult<Self> {
        let file = File::open(path).map_err(|e| SetupError::io(path, e))?;
        let len = file.metadata().map_err(|e| SetupError::io(path, e))?.len();
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            len,
            offset: 0,
            scratch: vec![],
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total size of the file in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current read position
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bytes left between the read position and the end of the file
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.offset)
    }

    /// Reads a big-endian `u32` header field
    pub fn read_u32_be(&mut self, field: &str) -> SetupResult<u32> {
        let value = self
            .reader
            .read_u32::<BigEndian>()
            .map_err(|e| self.header_error(field, e))?;
        self.offset += 4;
        Ok(value)
    }

    /// Reads a little-endian `u64` header field
    pub fn read_u64_le(&mut self, field: &str) -> SetupResult<u64> {
        let value = self
            .reader
            .read_u64::<LittleEndian>()
            .map_err(|e| self.header_error(field, e))?;
        self.offset += 8;
        Ok(value)
    }

    /// Discards `n` bytes, failing if the file ends first
    pub fn skip(&mut self, n: u64) -> SetupResult<()> {
        let start = self.offset;
        let skipped = io::copy(&mut (&mut self.reader).take(n), &mut io::sink())
            .map_err(|e| SetupError::io(&self.path, e))?;
        self.offset += skipped;
        if skipped < n {
            return Err(SetupError::MalformedElement {
                path: self.path.clone(),
                offset: start,
                reason: DecodeError::Truncated,
            });
        }
        Ok(())
    }

    /// Reads exactly `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> SetupResult<Vec<u8>> {
        let start = self.offset;
        let mut buf = vec![0u8; n];
        self.reader
            .read_exact(&mut buf)
            .map_err(|e| self.element_error(start, e))?;
        self.offset += n as u64;
        Ok(buf)
    }

    /// Reads and decodes one coordinate
    pub fn read_element<F: CoordinateDecode>(&mut self, encoding: Encoding) -> SetupResult<F> {
        let start = self.offset;
        let len = F::encoded_len();
        self.scratch.resize(len, 0);
        if let Err(e) = self.reader.read_exact(&mut self.scratch) {
            return Err(self.element_error(start, e));
        }
        self.offset += len as u64;

        F::decode(&self.scratch, encoding).map_err(|reason| SetupError::MalformedElement {
            path: self.path.clone(),
            offset: start,
            reason,
        })
    }

    /// Reads an `x || y` affine point. No curve checks are made.
    pub fn read_point<P: SWCurveConfig>(&mut self, encoding: Encoding) -> SetupResult<Affine<P>>
    where
        P::BaseField: CoordinateDecode,
    {
        let x = self.read_element::<P::BaseField>(encoding)?;
        let y = self.read_element::<P::BaseField>(encoding)?;
        Ok(point_from_coordinates(x, y))
    }

    fn header_error(&self, field: &str, e: io::Error) -> SetupError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            SetupError::header(
                &self.path,
                format!("file ends inside `{}` at byte offset {}", field, self.offset),
            )
        } else {
            SetupError::io(&self.path, e)
        }
    }

    fn element_error(&self, offset: u64, e: io::Error) -> SetupError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            SetupError::MalformedElement {
                path: self.path.clone(),
                offset,
                reason: DecodeError::Truncated,
            }
        } else {
            SetupError::io(&self.path, e)
        }
    }
}
