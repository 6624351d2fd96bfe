use tracing::{debug, warn};

use crate::de::val_reader::ScalarReader;
use crate::importer::{Importer, VertexHandle};
use crate::{ElementDef, PlyError, PlyHeader, PropertyRole, PropertyType, ReadOptions, ScalarType};

/// Number of vertices and faces handed to the importer.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ElementCounts {
    pub vertices: usize,
    pub faces: usize,
}

/// Routes the values of every element in `header` to `importer`.
///
/// `options` must already be limited to what the header declares.
pub(crate) fn read_elements<S, I>(
    header: &PlyHeader,
    val_reader: &mut S,
    importer: &mut I,
    options: ReadOptions,
) -> Result<ElementCounts, PlyError>
where
    S: ScalarReader,
    I: Importer + ?Sized,
{
    let mut reader = ElementReader {
        val_reader,
        importer,
        options,
        counts: ElementCounts::default(),
    };

    for elem_def in &header.elements {
        debug!(element = %elem_def.name, count = elem_def.count, "Reading element");
        match elem_def.name.as_str() {
            "vertex" => reader.read_vertices(elem_def)?,
            "face" => reader.read_faces(elem_def)?,
            _ => reader.skip_element(elem_def)?,
        }
    }

    Ok(reader.counts)
}

struct ElementReader<'a, S, I: ?Sized> {
    val_reader: &'a mut S,
    importer: &'a mut I,
    options: ReadOptions,
    counts: ElementCounts,
}

impl<S: ScalarReader, I: Importer + ?Sized> ElementReader<'_, S, I> {
    fn read_vertices(&mut self, elem_def: &ElementDef) -> Result<(), PlyError> {
        if elem_def.is_list() {
            warn!("Vertex list properties are not supported and will be skipped");
        }

        let mut custom = Vec::new();

        for _ in 0..elem_def.count {
            let mut point = [0.0f32; 3];
            let mut normal = [0.0f32; 3];
            let mut color = [0u8, 0, 0, 255];
            let mut uv = [0.0f32; 2];
            custom.clear();

            for prop in &elem_def.properties {
                let ty = match prop.property_type {
                    PropertyType::Scalar(ty) => ty,
                    PropertyType::List {
                        count_type,
                        data_type,
                    } => {
                        self.skip_list(count_type, data_type)?;
                        continue;
                    }
                };

                let Some(value) = self.val_reader.read_scalar(ty)? else {
                    continue;
                };

                match &prop.role {
                    PropertyRole::XCoord => point[0] = value.as_f32(),
                    PropertyRole::YCoord => point[1] = value.as_f32(),
                    PropertyRole::ZCoord => point[2] = value.as_f32(),
                    PropertyRole::NormX => normal[0] = value.as_f32(),
                    PropertyRole::NormY => normal[1] = value.as_f32(),
                    PropertyRole::NormZ => normal[2] = value.as_f32(),
                    PropertyRole::ColorR => color[0] = value.to_color_channel(),
                    PropertyRole::ColorG => color[1] = value.to_color_channel(),
                    PropertyRole::ColorB => color[2] = value.to_color_channel(),
                    PropertyRole::ColorA => color[3] = value.to_color_channel(),
                    PropertyRole::TexU => uv[0] = value.as_f32(),
                    PropertyRole::TexV => uv[1] = value.as_f32(),
                    PropertyRole::Custom(name) => {
                        if self.options.custom_properties {
                            custom.push((name.as_str(), value));
                        }
                    }
                    PropertyRole::VertexIndices | PropertyRole::Unknown => {}
                }
            }

            let vh = self.importer.add_vertex(point);

            if self.options.vertex_normals {
                self.importer.set_normal(vh, normal);
            }
            if self.options.vertex_colors {
                self.importer.set_color(vh, color);
            }
            if self.options.vertex_tex_coords {
                self.importer.set_tex_coord(vh, uv);
            }
            for (name, value) in &custom {
                self.importer.set_custom_property(vh, name, *value);
            }
        }

        self.counts.vertices += elem_def.count;
        Ok(())
    }

    fn read_faces(&mut self, elem_def: &ElementDef) -> Result<(), PlyError> {
        let has_indices = elem_def
            .properties
            .iter()
            .any(|p| p.is_list() && p.role == PropertyRole::VertexIndices);
        if !has_indices {
            warn!("Face element has no vertex index list, faces will be empty");
        }

        let mut indices = Vec::new();

        for _ in 0..elem_def.count {
            indices.clear();
            for prop in &elem_def.properties {
                match prop.property_type {
                    PropertyType::List {
                        count_type,
                        data_type,
                    } if prop.role == PropertyRole::VertexIndices => {
                        let len = self.read_list_len(count_type)?;
                        for _ in 0..len {
                            let idx = self.val_reader.read_integer(data_type)?;
                            indices.push(vertex_handle(idx)?);
                        }
                    }
                    PropertyType::List {
                        count_type,
                        data_type,
                    } => self.skip_list(count_type, data_type)?,
                    PropertyType::Scalar(ty) => {
                        self.val_reader.read_scalar(ty)?;
                    }
                }
            }

            self.importer.add_face(&indices);
        }

        self.counts.faces += elem_def.count;

        Ok(())
    }

    fn skip_element(&mut self, elem_def: &ElementDef) -> Result<(), PlyError> {
        debug!(element = %elem_def.name, "Skipping element without importer mapping");
        for _ in 0..elem_def.count {
            for prop in &elem_def.properties {
                match prop.property_type {
                    PropertyType::Scalar(ty) => {
                        self.val_reader.read_scalar(ty)?;
                    }
                    PropertyType::List {
                        count_type,
                        data_type,
                    } => self.skip_list(count_type, data_type)?,
                }
            }
        }
        Ok(())
    }

    fn skip_list(&mut self, count_type: ScalarType, data_type: ScalarType) -> Result<(), PlyError> {
        let len = self.read_list_len(count_type)?;
        for _ in 0..len {
            self.val_reader.read_scalar(data_type)?;
        }
        Ok(())
    }

    fn read_list_len(&mut self, count_type: ScalarType) -> Result<usize, PlyError> {
        let len = self.val_reader.read_integer(count_type)?;
        usize::try_from(len)
            .map_err(|_| PlyError::ValueFormat(format!("Invalid list length: {len}")))
    }
}

/// Face indices are passed through as written. Whether they name an existing
/// vertex is up to the importer, so faces may precede their vertices.
fn vertex_handle(idx: i64) -> Result<VertexHandle, PlyError> {
    u32::try_from(idx)
        .map(VertexHandle::new)
        .map_err(|_| PlyError::ValueFormat(format!("Invalid vertex index: {idx}")))
}
