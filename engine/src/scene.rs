//! Renderable scene fragments.
//!
//! A scene is a flat list of simple primitives in world space. Game code builds one per view per
//! frame; renderers decide how to draw them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Sphere {
        center: Vec3,
        radius: f32,
        color: Rgb,
    },
    Cuboid {
        center: Vec3,
        half_extents: Vec3,
        color: Rgb,
    },
}

impl Primitive {
    pub fn center(&self) -> Vec3 {
        match *self {
            Primitive::Sphere { center, .. } | Primitive::Cuboid { center, .. } => center,
        }
    }

    pub fn color(&self) -> Rgb {
        match *self {
            Primitive::Sphere { color, .. } | Primitive::Cuboid { color, .. } => color,
        }
    }

    pub fn translated(self, by: Vec3) -> Self {
        match self {
            Primitive::Sphere {
                center,
                radius,
                color,
            } => Primitive::Sphere {
                center: center + by,
                radius,
                color,
            },
            Primitive::Cuboid {
                center,
                half_extents,
                color,
            } => Primitive::Cuboid {
                center: center + by,
                half_extents,
                color,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitives: Vec::new(),
        }
    }

    pub fn sphere(&mut self, center: Vec3, radius: f32, color: Rgb) -> &mut Self {
        self.primitives.push(Primitive::Sphere {
            center,
            radius,
            color,
        });
        self
    }

    pub fn cuboid(&mut self, center: Vec3, size: Vec3, color: Rgb) -> &mut Self {
        self.primitives.push(Primitive::Cuboid {
            center,
            half_extents: size * 0.5,
            color,
        });
        self
    }

    /// Moves every primitive by `displacement` (scene-local to world space).
    pub fn displaced(mut self, displacement: Vec3) -> Self {
        if displacement != Vec3::ZERO {
            for p in &mut self.primitives {
                *p = p.translated(displacement);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}
