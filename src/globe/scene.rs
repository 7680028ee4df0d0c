//! Scene description of the decorative globe
//!
//! Plain data the frame loop mutates and a [`super::renderer::SceneRenderer`]
//! draws: camera, lights, the globe and its shells, and a starfield.

use crate::layers::vector::Color;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Rotation3, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const STAR_COUNT: usize = 10_000;
pub const STARFIELD_EXTENT: f32 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Option<(Color, f32)>,
    pub shininess: Option<f32>,
    pub opacity: f32,
    pub side: Side,
}

impl Material {
    fn translucent(color: Color, opacity: f32) -> Self {
        Self {
            color,
            emissive: None,
            shininess: None,
            opacity,
            side: Side::Front,
        }
    }
}

/// A UV sphere with its transform
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    pub name: String,
    pub radius: f32,
    pub segments: u32,
    pub material: Material,
    /// Euler angles in radians
    pub rotation: Vector3<f64>,
    pub scale: Vector3<f64>,
}

impl SphereMesh {
    fn new(name: impl Into<String>, radius: f32, material: Material) -> Self {
        Self {
            name: name.into(),
            radius,
            segments: 64,
            material,
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f64> {
        let rotation = Rotation3::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z);
        rotation.to_homogeneous() * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        position: Point3<f64>,
    },
    Point {
        color: Color,
        intensity: f32,
        range: f32,
        position: Point3<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: Point3<f64>,
}

impl PerspectiveCamera {
    pub fn set_aspect(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn projection(&self) -> Matrix4<f64> {
        Perspective3::new(self.aspect, self.fov_deg.to_radians(), self.near, self.far)
            .to_homogeneous()
    }

    /// Looks at the origin with +y up
    pub fn view(&self) -> Matrix4<f64> {
        Isometry3::look_at_rh(&self.position, &Point3::origin(), &Vector3::y()).to_homogeneous()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Starfield {
    pub positions: Vec<Point3<f32>>,
    pub size: f32,
    pub opacity: f32,
}

/// Everything the globe renderer draws
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeScene {
    pub background: Color,
    pub camera: PerspectiveCamera,
    pub lights: Vec<Light>,
    pub globe: SphereMesh,
    pub clouds: SphereMesh,
    pub continents: Vec<SphereMesh>,
    pub atmosphere: SphereMesh,
    pub stars: Starfield,
    /// Whole-scene rotation in radians
    pub rotation: Vector3<f64>,
}

impl GlobeScene {
    pub fn compose(aspect: f64) -> Self {
        Self::compose_with_rng(aspect, &mut StdRng::from_entropy())
    }

    pub fn compose_with_rng<R: Rng>(aspect: f64, rng: &mut R) -> Self {
        let blue = Color::FLOOD_BLUE;

        let globe = SphereMesh::new(
            "globe",
            2.0,
            Material {
                color: blue,
                emissive: Some((Color::from_u32(0x1a5490), 0.2)),
                shininess: Some(100.0),
                opacity: 0.9,
                side: Side::Front,
            },
        );

        let mut clouds = SphereMesh::new(
            "clouds",
            2.02,
            Material {
                side: Side::Double,
                ..Material::translucent(Color::WHITE, 0.3)
            },
        );
        clouds.rotation.y = 0.001;

        let continent_colors = [0x10b981, 0x059669, 0x047857, 0x065f46];
        let continents = continent_colors
            .iter()
            .enumerate()
            .map(|(index, rgb)| {
                let color = Color::from_u32(*rgb);
                let mut mesh = SphereMesh::new(
                    format!("continent-{}", index),
                    2.01,
                    Material {
                        emissive: Some((color, 0.1)),
                        ..Material::translucent(color, 0.6)
                    },
                );
                mesh.rotation.y =
                    index as f64 * std::f64::consts::PI * 2.0 / continent_colors.len() as f64;
                mesh.scale = Vector3::new(1.0, 0.3, 1.0);
                mesh
            })
            .collect();

        let atmosphere = SphereMesh::new(
            "atmosphere",
            2.15,
            Material {
                side: Side::Back,
                ..Material::translucent(blue, 0.15)
            },
        );

        let half = STARFIELD_EXTENT / 2.0;
        let positions = (0..STAR_COUNT)
            .map(|_| {
                Point3::new(
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                )
            })
            .collect();

        Self {
            background: Color::from_u32(0x0a0a0a),
            camera: PerspectiveCamera {
                fov_deg: 45.0,
                aspect,
                near: 0.1,
                far: 1000.0,
                position: Point3::new(0.0, 0.0, 5.0),
            },
            lights: vec![
                Light::Ambient {
                    color: Color::WHITE,
                    intensity: 0.6,
                },
                Light::Directional {
                    color: Color::WHITE,
                    intensity: 0.8,
                    position: Point3::new(5.0, 3.0, 5.0),
                },
                Light::Point {
                    color: blue,
                    intensity: 1.0,
                    range: 100.0,
                    position: Point3::new(10.0, 10.0, 10.0),
                },
            ],
            globe,
            clouds,
            continents,
            atmosphere,
            stars: Starfield {
                positions,
                size: 0.05,
                opacity: 0.8,
            },
            rotation: Vector3::zeros(),
        }
    }

    /// World transform of the globe including the scene drift
    pub fn globe_world_matrix(&self) -> Matrix4<f64> {
        let scene = Rotation3::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z);
        scene.to_homogeneous() * self.globe.model_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition() {
        let scene = GlobeScene::compose_with_rng(1.5, &mut StdRng::seed_from_u64(9));

        assert_eq!(scene.globe.radius, 2.0);
        assert_eq!(scene.continents.len(), 4);
        assert_eq!(scene.continents[2].rotation.y, std::f64::consts::PI);
        assert_eq!(scene.atmosphere.material.side, Side::Back);
        assert_eq!(scene.lights.len(), 3);
        assert_eq!(scene.stars.positions.len(), STAR_COUNT);
        assert!(scene
            .stars
            .positions
            .iter()
            .all(|p| p.x.abs() <= 1000.0 && p.y.abs() <= 1000.0 && p.z.abs() <= 1000.0));
    }

    #[test]
    fn test_camera_projects_origin_to_center() {
        let mut scene = GlobeScene::compose_with_rng(1.0, &mut StdRng::seed_from_u64(1));
        scene.camera.set_aspect(800.0, 400.0);
        assert_eq!(scene.camera.aspect, 2.0);
        scene.camera.set_aspect(0.0, 400.0);
        assert_eq!(scene.camera.aspect, 2.0);

        let clip = scene.camera.projection() * scene.camera.view() * nalgebra::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-12);
        assert!((clip.y / clip.w).abs() < 1e-12);
    }
}
