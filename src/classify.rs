//! Mapping of property names onto the role they play in a mesh.

/// Semantic role of a property, derived from its declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyRole {
    XCoord,
    YCoord,
    ZCoord,
    TexU,
    TexV,
    ColorR,
    ColorG,
    ColorB,
    ColorA,
    NormX,
    NormY,
    NormZ,
    /// The index list of a face element.
    VertexIndices,
    /// Any other property. Keeps the declared name verbatim.
    Custom(String),
    /// A property whose values can't be decoded; consumed but never routed.
    Unknown,
}

impl PropertyRole {
    pub fn is_coord(&self) -> bool {
        matches!(
            self,
            PropertyRole::XCoord | PropertyRole::YCoord | PropertyRole::ZCoord
        )
    }

    pub fn is_normal(&self) -> bool {
        matches!(
            self,
            PropertyRole::NormX | PropertyRole::NormY | PropertyRole::NormZ
        )
    }

    pub fn is_color(&self) -> bool {
        matches!(
            self,
            PropertyRole::ColorR | PropertyRole::ColorG | PropertyRole::ColorB | PropertyRole::ColorA
        )
    }

    pub fn is_tex_coord(&self) -> bool {
        matches!(self, PropertyRole::TexU | PropertyRole::TexV)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, PropertyRole::Custom(_))
    }
}

/// Classify a property by name.
///
/// Names are compared case-insensitively against a fixed table; new vendor
/// names belong here. Anything not in the table is `Custom`.
pub fn classify(name: &str) -> PropertyRole {
    match name.to_ascii_lowercase().as_str() {
        "x" => PropertyRole::XCoord,
        "y" => PropertyRole::YCoord,
        "z" => PropertyRole::ZCoord,
        "nx" => PropertyRole::NormX,
        "ny" => PropertyRole::NormY,
        "nz" => PropertyRole::NormZ,
        "u" | "s" | "texture_u" | "texture_s" => PropertyRole::TexU,
        "v" | "t" | "texture_v" | "texture_t" => PropertyRole::TexV,
        "red" | "diffuse_red" => PropertyRole::ColorR,
        "green" | "diffuse_green" => PropertyRole::ColorG,
        "blue" | "diffuse_blue" => PropertyRole::ColorB,
        "alpha" | "diffuse_alpha" => PropertyRole::ColorA,
        "vertex_indices" | "vertex_index" => PropertyRole::VertexIndices,
        _ => PropertyRole::Custom(name.to_string()),
    }
}
