use std::io::{BufRead, Read};
use std::marker::PhantomData;

use byteorder::ByteOrder;
use byteorder::ReadBytesExt;

use crate::{PlyError, ScalarType, ScalarValue};

/// Reads fixed-width values in byte order `E`.
pub struct BinValReader<R: Read, E: ByteOrder> {
    reader: R,
    _endian: PhantomData<E>,
}

impl<R: Read, E: ByteOrder> BinValReader<R, E> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            _endian: PhantomData,
        }
    }
}

/// Reads whitespace separated tokens. Line breaks carry no meaning.
pub struct AsciiValReader<R: BufRead> {
    reader: R,
    token: Vec<u8>,
}

impl<R: BufRead> AsciiValReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            token: Vec::new(),
        }
    }
}

/// Source of scalar values for the element reader.
///
/// Implemented once for text bodies and once for binary bodies, so the
/// routing of properties never has to know which encoding it is reading.
pub trait ScalarReader {
    /// Decode one value of type `ty`. `Unsupported` values are consumed and
    /// yield `None`.
    fn read_scalar(&mut self, ty: ScalarType) -> Result<Option<ScalarValue>, PlyError>;

    /// Decode an integral value of any width, widened to `i64`.
    fn read_integer(&mut self, ty: ScalarType) -> Result<i64, PlyError> {
        if !ty.is_integral() {
            return Err(PlyError::ValueFormat(format!(
                "Expected an integral type, found {ty}"
            )));
        }
        self.read_scalar(ty)?
            .and_then(|v| v.as_integer())
            .ok_or_else(|| PlyError::ValueFormat(format!("Expected an integral {ty}")))
    }
}

impl<R: Read, E: ByteOrder> ScalarReader for BinValReader<R, E> {
    fn read_scalar(&mut self, ty: ScalarType) -> Result<Option<ScalarValue>, PlyError> {
        let r = &mut self.reader;
        let value = match ty {
            ScalarType::Int8 => ScalarValue::Int8(r.read_i8()?),
            ScalarType::UInt8 => ScalarValue::UInt8(r.read_u8()?),
            ScalarType::Int16 => ScalarValue::Int16(r.read_i16::<E>()?),
            ScalarType::UInt16 => ScalarValue::UInt16(r.read_u16::<E>()?),
            ScalarType::Int32 => ScalarValue::Int32(r.read_i32::<E>()?),
            ScalarType::UInt32 => ScalarValue::UInt32(r.read_u32::<E>()?),
            ScalarType::Float32 => ScalarValue::Float32(r.read_f32::<E>()?),
            ScalarType::Float64 => ScalarValue::Float64(r.read_f64::<E>()?),
            ScalarType::Unsupported => {
                // No width to skip by; binary headers with such types are
                // rejected before the body is touched.
                return Err(PlyError::MalformedHeader(
                    "Unsupported scalar type in binary body".to_string(),
                ));
            }
        };
        Ok(Some(value))
    }
}

impl<R: BufRead> ScalarReader for AsciiValReader<R> {
    fn read_scalar(&mut self, ty: ScalarType) -> Result<Option<ScalarValue>, PlyError> {
        // Unsupported values still occupy one token.
        let token = self.read_ascii_token()?;
        let value = match ty {
            ScalarType::Int8 => ScalarValue::Int8(token.parse()?),
            ScalarType::UInt8 => ScalarValue::UInt8(token.parse()?),
            ScalarType::Int16 => ScalarValue::Int16(token.parse()?),
            ScalarType::UInt16 => ScalarValue::UInt16(token.parse()?),
            ScalarType::Int32 => ScalarValue::Int32(token.parse()?),
            ScalarType::UInt32 => ScalarValue::UInt32(token.parse()?),
            ScalarType::Float32 => ScalarValue::Float32(token.parse()?),
            ScalarType::Float64 => ScalarValue::Float64(token.parse()?),
            ScalarType::Unsupported => return Ok(None),
        };
        Ok(Some(value))
    }
}

impl<R: BufRead> AsciiValReader<R> {
    fn read_ascii_token(&mut self) -> Result<&str, PlyError> {
        self.token.clear();

        // Skip leading whitespace, newlines included.
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let skip = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
            let at_token = skip < buf.len();
            self.reader.consume(skip);
            if at_token {
                break;
            }
        }

        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let len = buf.iter().take_while(|b| !b.is_ascii_whitespace()).count();
            self.token.extend_from_slice(&buf[..len]);
            let complete = len < buf.len();
            self.reader.consume(len);
            if complete {
                break;
            }
        }

        if self.token.is_empty() {
            return Err(PlyError::ValueFormat(
                "Missing value at end of stream".to_string(),
            ));
        }

        std::str::from_utf8(&self.token)
            .map_err(|_| PlyError::ValueFormat("Value is not valid text".to_string()))
    }
}
