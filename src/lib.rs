//! A streaming reader for the PLY (Polygon File Format) mesh format.
//!
//! PLY files carry a textual header describing elements (vertices, faces, ...)
//! and their typed properties, followed by a body encoded as ASCII text or as
//! little/big-endian binary. We parse the header first and use it to decode the
//! body, routing every property by its name to an [`Importer`] call.
//!
//! # Example
//!
//! ```rust
//! use ply_import::{MeshBuffer, PlyReader, ReadOptions};
//!
//! let ply_data = r#"ply
//! format ascii 1.0
//! element vertex 3
//! property float x
//! property float y
//! property float z
//! property uchar red
//! property uchar green
//! property uchar blue
//! element face 1
//! property list uchar int vertex_indices
//! end_header
//! 0 0 0 255 0 0
//! 1 0 0 0 255 0
//! 0 1 0 0 0 255
//! 3 0 1 2
//! "#;
//!
//! let mut mesh = MeshBuffer::default();
//! let summary = PlyReader::new(ReadOptions::all())
//!     .read(ply_data.as_bytes(), &mut mesh)
//!     .unwrap();
//!
//! assert!(summary.available.vertex_colors);
//! assert_eq!(mesh.points.len(), 3);
//! assert_eq!(mesh.colors[0], [255, 0, 0, 255]);
//! assert_eq!(mesh.faces, vec![vec![0, 1, 2]]);
//! ```

pub mod classify;
pub mod de;
mod error;
pub mod importer;
mod options;
pub mod sniff;

pub use classify::{classify, PropertyRole};
pub use de::{read, read_file, PlyReader};
pub use error::PlyError;
pub use importer::{FaceHandle, Importer, MeshBuffer, VertexHandle};
pub use options::{ReadOptions, ReadSummary};
pub use sniff::{can_read_path, has_ply_extension, is_ply};

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;
use tracing::{debug, warn};

/// PLY body encoding (ascii or binary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlyFormat::Ascii => write!(f, "ascii"),
            PlyFormat::BinaryLittleEndian => write!(f, "binary_little_endian"),
            PlyFormat::BinaryBigEndian => write!(f, "binary_big_endian"),
        }
    }
}

/// PLY scalar data types.
///
/// The many type names found in the wild collapse onto these variants in
/// [`ScalarType::parse`]. Names we don't know become `Unsupported`: such
/// values are still consumed from ASCII bodies but never delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Unsupported,
    Int8,
    Int16,
    Int32,
    UInt8,
    UInt16,
    UInt32,
    Float32,
    Float64,
}

impl ScalarType {
    pub fn parse(s: &str) -> Self {
        match s {
            "char" | "int8" => ScalarType::Int8,
            "uchar" | "uint8" => ScalarType::UInt8,
            "short" | "int16" => ScalarType::Int16,
            "ushort" | "uint16" => ScalarType::UInt16,
            "int" | "int32" => ScalarType::Int32,
            "uint" | "uint32" => ScalarType::UInt32,
            "float" | "float32" => ScalarType::Float32,
            "double" | "float64" => ScalarType::Float64,
            _ => ScalarType::Unsupported,
        }
    }

    /// Width of one value in a binary body. `None` for `Unsupported`.
    pub fn size_bytes(&self) -> Option<usize> {
        match self {
            ScalarType::Unsupported => None,
            ScalarType::Int8 | ScalarType::UInt8 => Some(1),
            ScalarType::Int16 | ScalarType::UInt16 => Some(2),
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => Some(4),
            ScalarType::Float64 => Some(8),
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            ScalarType::Int8
                | ScalarType::Int16
                | ScalarType::Int32
                | ScalarType::UInt8
                | ScalarType::UInt16
                | ScalarType::UInt32
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarType::Float32 | ScalarType::Float64)
    }
}

impl FromStr for ScalarType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Unsupported => "unsupported",
            ScalarType::Int8 => "char",
            ScalarType::Int16 => "short",
            ScalarType::Int32 => "int",
            ScalarType::UInt8 => "uchar",
            ScalarType::UInt16 => "ushort",
            ScalarType::UInt32 => "uint",
            ScalarType::Float32 => "float",
            ScalarType::Float64 => "double",
        };
        f.write_str(name)
    }
}

/// A single decoded value, kept at the width the file declared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
}

impl ScalarValue {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarValue::Int8(_) => ScalarType::Int8,
            ScalarValue::Int16(_) => ScalarType::Int16,
            ScalarValue::Int32(_) => ScalarType::Int32,
            ScalarValue::UInt8(_) => ScalarType::UInt8,
            ScalarValue::UInt16(_) => ScalarType::UInt16,
            ScalarValue::UInt32(_) => ScalarType::UInt32,
            ScalarValue::Float32(_) => ScalarType::Float32,
            ScalarValue::Float64(_) => ScalarType::Float64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            ScalarValue::Int8(v) => v as f64,
            ScalarValue::Int16(v) => v as f64,
            ScalarValue::Int32(v) => v as f64,
            ScalarValue::UInt8(v) => v as f64,
            ScalarValue::UInt16(v) => v as f64,
            ScalarValue::UInt32(v) => v as f64,
            ScalarValue::Float32(v) => v as f64,
            ScalarValue::Float64(v) => v,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match *self {
            ScalarValue::Float32(v) => v,
            other => other.as_f64() as f32,
        }
    }

    /// Widens integral values to `i64`, which holds every `int` and `uint`.
    /// Floating values yield `None`.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            ScalarValue::Int8(v) => Some(v as i64),
            ScalarValue::Int16(v) => Some(v as i64),
            ScalarValue::Int32(v) => Some(v as i64),
            ScalarValue::UInt8(v) => Some(v as i64),
            ScalarValue::UInt16(v) => Some(v as i64),
            ScalarValue::UInt32(v) => Some(v as i64),
            ScalarValue::Float32(_) | ScalarValue::Float64(_) => None,
        }
    }

    /// Converts to an 8-bit color channel. Integral values are clamped to
    /// `0..=255`, floating values are treated as normalized and scaled.
    pub fn to_color_channel(&self) -> u8 {
        match *self {
            ScalarValue::UInt8(v) => v,
            ScalarValue::Float32(_) | ScalarValue::Float64(_) => {
                (self.as_f64() * 255.0).round().clamp(0.0, 255.0) as u8
            }
            other => other.as_integer().unwrap_or(0).clamp(0, 255) as u8,
        }
    }
}

/// PLY property type
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    /// A scalar property with a single value
    Scalar(ScalarType),
    /// A list property with variable length
    List {
        count_type: ScalarType,
        data_type: ScalarType,
    },
}

/// PLY property definition
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub role: PropertyRole,
    pub property_type: PropertyType,
}

impl PropertyDef {
    pub fn is_list(&self) -> bool {
        matches!(self.property_type, PropertyType::List { .. })
    }
}

/// PLY element definition (e.g., vertex, face)
#[derive(Debug, Clone)]
pub struct ElementDef {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PropertyDef>,
}

impl ElementDef {
    /// Whether any property of this element is a list (face elements are).
    pub fn is_list(&self) -> bool {
        self.properties.iter().any(PropertyDef::is_list)
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn has_role(&self, pred: impl Fn(&PropertyRole) -> bool) -> bool {
        self.properties.iter().any(|p| pred(&p.role))
    }
}

/// PLY header containing format information and element definitions
#[derive(Debug, Clone)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub version: String,
    pub elements: Vec<ElementDef>,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
}

impl PlyHeader {
    /// Parse a PLY header from a reader.
    ///
    /// Reads line by line up to and including `end_header`, leaving the reader
    /// positioned at the first byte of element data.
    pub fn parse<R: BufRead>(mut reader: R) -> Result<Self, PlyError> {
        let mut buf = Vec::new();

        match read_header_line(&mut reader, &mut buf)? {
            Some(line) if line.eq_ignore_ascii_case("ply") => {}
            _ => {
                return Err(PlyError::MalformedHeader(
                    "File must start with 'ply'".to_string(),
                ))
            }
        }

        let mut format = None;
        let mut version = String::new();
        let mut elements = Vec::new();
        let mut comments = Vec::new();
        let mut obj_info = Vec::new();
        let mut current_element: Option<ElementDef> = None;

        loop {
            let Some(line) = read_header_line(&mut reader, &mut buf)? else {
                return Err(PlyError::MalformedHeader(
                    "Unexpected end of file before end_header".to_string(),
                ));
            };

            if line.is_empty() {
                continue;
            }

            if line == "end_header" {
                break;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();

            match parts[0] {
                "format" => {
                    if parts.len() < 3 {
                        return Err(PlyError::MalformedHeader(format!(
                            "Invalid format line: {line}"
                        )));
                    }
                    format = Some(match parts[1] {
                        "ascii" => PlyFormat::Ascii,
                        "binary_little_endian" => PlyFormat::BinaryLittleEndian,
                        "binary_big_endian" => PlyFormat::BinaryBigEndian,
                        other => return Err(PlyError::UnsupportedEncoding(other.to_string())),
                    });
                    version = parts[2].to_string();
                    if version != "1.0" {
                        warn!(version = %version, "PLY version is not 1.0, reading anyway");
                    }
                }
                "comment" => {
                    comments.push(parts[1..].join(" "));
                }
                "obj_info" => {
                    obj_info.push(parts[1..].join(" "));
                }
                "element" => {
                    if parts.len() < 3 {
                        return Err(PlyError::MalformedHeader(format!(
                            "Invalid element line: {line}"
                        )));
                    }

                    if let Some(element) = current_element.take() {
                        elements.push(element);
                    }

                    let count = parts[2].parse::<usize>().map_err(|_| {
                        PlyError::MalformedHeader(format!("Invalid element count: {}", parts[2]))
                    })?;

                    current_element = Some(ElementDef {
                        name: parts[1].to_string(),
                        count,
                        properties: Vec::new(),
                    });
                }
                "property" => {
                    let element = current_element.as_mut().ok_or_else(|| {
                        PlyError::MalformedHeader("Property without element".to_string())
                    })?;

                    let property = parse_property_line(&parts, &line)?;
                    element.properties.push(property);
                }
                other => {
                    warn!(keyword = other, "Ignoring unknown PLY header line");
                }
            }
        }

        if let Some(element) = current_element {
            elements.push(element);
        }

        let format = format.ok_or_else(|| {
            PlyError::MalformedHeader("Missing format specification".to_string())
        })?;

        debug!(
            %format,
            elements = elements.len(),
            "Parsed PLY header"
        );

        Ok(PlyHeader {
            format,
            version,
            elements,
            comments,
            obj_info,
        })
    }

    /// Get element definition by name
    pub fn get_element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Check if this header defines an element with the given name
    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }

    /// Declared number of vertices, 0 without a vertex element.
    pub fn vertex_count(&self) -> usize {
        self.get_element("vertex").map_or(0, |e| e.count)
    }

    /// Declared number of faces, 0 without a face element.
    pub fn face_count(&self) -> usize {
        self.get_element("face").map_or(0, |e| e.count)
    }
}

/// Reads one header line as raw bytes so that nothing past its newline is
/// consumed. Returns `None` at end of stream.
fn read_header_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> Result<Option<String>, PlyError> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(buf).trim().to_string()))
}

fn parse_property_line(parts: &[&str], line: &str) -> Result<PropertyDef, PlyError> {
    if parts.len() < 3 {
        return Err(PlyError::MalformedHeader(format!(
            "Invalid property line: {line}"
        )));
    }

    if parts[1] == "list" {
        // property list <count_type> <data_type> <name>
        if parts.len() < 5 {
            return Err(PlyError::MalformedHeader(format!(
                "Invalid list property line: {line}"
            )));
        }
        let count_type = ScalarType::parse(parts[2]);
        let data_type = ScalarType::parse(parts[3]);
        let name = parts[4].to_string();
        let role = classify(&name);

        if !count_type.is_integral() {
            return Err(PlyError::MalformedHeader(format!(
                "List count type must be integral: {line}"
            )));
        }
        if role == PropertyRole::VertexIndices && !data_type.is_integral() {
            return Err(PlyError::MalformedHeader(format!(
                "Vertex indices must be integral: {line}"
            )));
        }
        if data_type == ScalarType::Unsupported {
            warn!(property = %name, ty = parts[3], "Unsupported list entry type");
        }

        Ok(PropertyDef {
            name,
            role,
            property_type: PropertyType::List {
                count_type,
                data_type,
            },
        })
    } else {
        // property <type> <name>
        let data_type = ScalarType::parse(parts[1]);
        let name = parts[2].to_string();
        let role = if data_type == ScalarType::Unsupported {
            warn!(property = %name, ty = parts[1], "Unsupported scalar type, values will be skipped");
            PropertyRole::Unknown
        } else {
            classify(&name)
        };

        Ok(PropertyDef {
            name,
            role,
            property_type: PropertyType::Scalar(data_type),
        })
    }
}
