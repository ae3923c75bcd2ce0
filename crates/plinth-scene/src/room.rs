//! Parametric room shells

use plinth_core::{Color, Mat4, PlinthError, Result, Vec3};
use plinth_import::{box_part, MeshPart, PartMaterial};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interior style, which only picks the shell color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomStyle {
    #[default]
    Modern,
    Minimalist,
    Industrial,
}

impl RoomStyle {
    pub fn color(&self) -> Color {
        match self {
            Self::Modern => Color::from_hex(0xffffff),
            Self::Minimalist => Color::from_hex(0xf5f5f5),
            Self::Industrial => Color::from_hex(0xe0e0e0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Minimalist => "minimalist",
            Self::Industrial => "industrial",
        }
    }
}

/// Unknown names fall back to modern
impl From<String> for RoomStyle {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&str> for RoomStyle {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "minimalist" => Self::Minimalist,
            "industrial" => Self::Industrial,
            _ => Self::Modern,
        }
    }
}

impl From<RoomStyle> for String {
    fn from(style: RoomStyle) -> Self {
        style.name().to_string()
    }
}

impl fmt::Display for RoomStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dimensions of a generated room: length along x, width along z
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomParams {
    pub length: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub style: RoomStyle,
}

const SHELL_OPACITY: f32 = 0.2;

impl RoomParams {
    pub fn new(length: f32, width: f32, height: f32, style: RoomStyle) -> Self {
        Self {
            length,
            width,
            height,
            style,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let dims = Vec3::new(self.length, self.width, self.height);
        if dims.is_finite() && dims.cmpgt(Vec3::ZERO).all() {
            Ok(())
        } else {
            Err(PlinthError::InvalidTransform(format!(
                "room dimensions must be greater than 0, got {}x{}x{}",
                self.length, self.width, self.height
            )))
        }
    }

    pub fn max_dimension(&self) -> f32 {
        self.length.max(self.width).max(self.height)
    }

    /// Camera spot that frames the whole room
    pub fn viewing_position(&self) -> Vec3 {
        Vec3::splat(self.max_dimension() * 1.5)
    }

    /// Point halfway up the room
    pub fn viewing_target(&self) -> Vec3 {
        Vec3::new(0.0, self.height / 2.0, 0.0)
    }

    /// Translucent double-sided box standing on the ground plane
    pub fn build_part(&self) -> Result<MeshPart> {
        self.validate()?;
        let material = PartMaterial {
            name: Some(format!("room_{}", self.style)),
            color: self.style.color().with_alpha(SHELL_OPACITY),
            double_sided: true,
        };
        let mut part = box_part("room", self.length, self.height, self.width, material);
        part.local = Mat4::from_translation(self.viewing_target());
        Ok(part)
    }
}
