mod element;

pub mod val_reader;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use byteorder::{BigEndian, LittleEndian};
use tracing::debug;

use crate::de::element::read_elements;
use crate::de::val_reader::{AsciiValReader, BinValReader};
use crate::importer::Importer;
use crate::sniff::is_ply;
use crate::{
    PlyError, PlyFormat, PlyHeader, PropertyRole, PropertyType, ReadOptions, ReadSummary,
    ScalarType,
};

/// Upper bound on the counts passed to [`Importer::reserve`]. Header counts
/// are untrusted until the body has actually been read.
const RESERVE_LIMIT: usize = 1 << 20;

/// Reads PLY streams into an [`Importer`].
///
/// A reader only holds the requested [`ReadOptions`]. Everything derived from
/// a file lives inside a single `read` call, so one reader can be reused and
/// shared between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlyReader {
    options: ReadOptions,
}

impl PlyReader {
    pub fn new(options: ReadOptions) -> Self {
        Self { options }
    }

    /// Read a complete PLY stream positioned at its first byte.
    ///
    /// Returns [`PlyError::NotPly`] without consuming anything when the stream
    /// does not start with the `ply` magic.
    pub fn read<R, I>(&self, mut reader: R, importer: &mut I) -> Result<ReadSummary, PlyError>
    where
        R: BufRead,
        I: Importer + ?Sized,
    {
        if !is_ply(&mut reader)? {
            return Err(PlyError::NotPly);
        }

        let header = PlyHeader::parse(&mut reader)?;
        self.read_with_header(&header, reader, importer)
    }

    /// Read the body of a stream whose header was already parsed. `reader`
    /// must be positioned right after `end_header`.
    pub fn read_with_header<R, I>(
        &self,
        header: &PlyHeader,
        reader: R,
        importer: &mut I,
    ) -> Result<ReadSummary, PlyError>
    where
        R: BufRead,
        I: Importer + ?Sized,
    {
        if header.format != PlyFormat::Ascii {
            check_binary_layout(header)?;
        }

        let features = Features::of(header);
        let options = self.options.intersect(&features.available);
        debug!(?options, available = ?features.available, "Reading PLY body");

        importer.reserve(
            header.vertex_count().min(RESERVE_LIMIT),
            header.face_count().min(RESERVE_LIMIT),
        );

        let counts = match header.format {
            PlyFormat::Ascii => {
                read_elements(header, &mut AsciiValReader::new(reader), importer, options)?
            }
            PlyFormat::BinaryLittleEndian => read_elements(
                header,
                &mut BinValReader::<_, LittleEndian>::new(reader),
                importer,
                options,
            )?,
            PlyFormat::BinaryBigEndian => read_elements(
                header,
                &mut BinValReader::<_, BigEndian>::new(reader),
                importer,
                options,
            )?,
        };

        debug!(
            vertices = counts.vertices,
            faces = counts.faces,
            "Finished reading PLY"
        );

        Ok(ReadSummary {
            format: header.format,
            available: features.available,
            color_alpha: features.color_alpha,
            color_float: features.color_float,
            vertex_count: counts.vertices,
            face_count: counts.faces,
        })
    }

    /// Open `path` and read it.
    pub fn read_file<P, I>(&self, path: P, importer: &mut I) -> Result<ReadSummary, PlyError>
    where
        P: AsRef<Path>,
        I: Importer + ?Sized,
    {
        let file = File::open(path.as_ref())?;
        self.read(BufReader::new(file), importer)
    }
}

/// Read a PLY stream with `options`.
pub fn read<R, I>(reader: R, importer: &mut I, options: ReadOptions) -> Result<ReadSummary, PlyError>
where
    R: BufRead,
    I: Importer + ?Sized,
{
    PlyReader::new(options).read(reader, importer)
}

/// Read the PLY file at `path` with `options`.
pub fn read_file<P, I>(path: P, importer: &mut I, options: ReadOptions) -> Result<ReadSummary, PlyError>
where
    P: AsRef<Path>,
    I: Importer + ?Sized,
{
    PlyReader::new(options).read_file(path, importer)
}

/// What the vertex element of a header declares.
struct Features {
    available: ReadOptions,
    color_alpha: bool,
    color_float: bool,
}

impl Features {
    fn of(header: &PlyHeader) -> Self {
        let Some(vertex) = header.get_element("vertex") else {
            return Features {
                available: ReadOptions::default(),
                color_alpha: false,
                color_float: false,
            };
        };

        let scalar = |pred: fn(&PropertyRole) -> bool| {
            vertex
                .properties
                .iter()
                .any(|p| !p.is_list() && pred(&p.role))
        };

        Features {
            available: ReadOptions {
                vertex_normals: scalar(PropertyRole::is_normal),
                vertex_colors: scalar(PropertyRole::is_color),
                vertex_tex_coords: scalar(PropertyRole::is_tex_coord),
                custom_properties: scalar(PropertyRole::is_custom),
            },
            color_alpha: scalar(|r| *r == PropertyRole::ColorA),
            color_float: vertex.properties.iter().any(|p| {
                p.role.is_color()
                    && matches!(p.property_type, PropertyType::Scalar(ty) if ty.is_float())
            }),
        }
    }
}

/// Binary bodies have no separators, so every value needs a known width.
fn check_binary_layout(header: &PlyHeader) -> Result<(), PlyError> {
    for elem_def in &header.elements {
        for prop in &elem_def.properties {
            let unsupported = match prop.property_type {
                PropertyType::Scalar(ty) => ty == ScalarType::Unsupported,
                PropertyType::List { data_type, .. } => data_type == ScalarType::Unsupported,
            };
            if unsupported {
                return Err(PlyError::MalformedHeader(format!(
                    "Property '{}' of element '{}' has an unsupported type in a binary file",
                    prop.name, elem_def.name
                )));
            }
        }
    }
    Ok(())
}
