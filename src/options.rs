use serde::{Deserialize, Serialize};

use crate::PlyFormat;

/// Optional vertex data a caller wants delivered.
///
/// Coordinates and faces are always delivered. When used as
/// [`ReadSummary::available`] the same flags instead say what the file declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    pub vertex_normals: bool,
    pub vertex_colors: bool,
    pub vertex_tex_coords: bool,
    pub custom_properties: bool,
}

impl ReadOptions {
    /// Request every optional feature.
    pub fn all() -> Self {
        Self {
            vertex_normals: true,
            vertex_colors: true,
            vertex_tex_coords: true,
            custom_properties: true,
        }
    }

    /// Flags set in both `self` and `other`.
    pub fn intersect(&self, other: &ReadOptions) -> ReadOptions {
        ReadOptions {
            vertex_normals: self.vertex_normals && other.vertex_normals,
            vertex_colors: self.vertex_colors && other.vertex_colors,
            vertex_tex_coords: self.vertex_tex_coords && other.vertex_tex_coords,
            custom_properties: self.custom_properties && other.custom_properties,
        }
    }
}

/// Outcome of a successful read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadSummary {
    pub format: PlyFormat,
    /// Features the file declares, whether or not they were requested.
    pub available: ReadOptions,
    /// The vertex colors carry an alpha channel.
    pub color_alpha: bool,
    /// The vertex colors are stored as floating point values.
    pub color_float: bool,
    pub vertex_count: usize,
    pub face_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_from_config() {
        let opts: ReadOptions = serde_json::from_str(r#"{ "vertex_colors": true }"#).unwrap();
        assert_eq!(
            opts,
            ReadOptions {
                vertex_colors: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_intersect() {
        let requested = ReadOptions {
            vertex_normals: true,
            vertex_colors: true,
            ..Default::default()
        };
        let available = ReadOptions {
            vertex_colors: true,
            vertex_tex_coords: true,
            ..Default::default()
        };
        assert_eq!(
            requested.intersect(&available),
            ReadOptions {
                vertex_colors: true,
                ..Default::default()
            }
        );
    }
}
