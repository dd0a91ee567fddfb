use glam::Vec3;

pub const AMBIENT_RATIO: f32 = 0.1;
pub const DIFFUSE_RATIO: f32 = 0.8;
pub const SPECULAR_RATIO: f32 = 1.0;

/// Point light with Phong intensities derived once from its colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            color,
            ambient: AMBIENT_RATIO * color,
            diffuse: DIFFUSE_RATIO * color,
            specular: SPECULAR_RATIO * color,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::new(3.0, 3.0, -3.0), Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_white_light_above_and_behind() {
        let light = Light::default();
        assert_eq!(light.position, Vec3::new(3.0, 3.0, -3.0));
        assert_eq!(light.color, Vec3::ONE);
        assert_eq!(light.ambient, Vec3::splat(0.1));
        assert_eq!(light.diffuse, Vec3::splat(0.8));
        assert_eq!(light.specular, Vec3::ONE);
    }

    #[test]
    fn intensities_scale_with_color() {
        let color = Vec3::new(0.5, 0.25, 1.0);
        let light = Light::new(Vec3::ZERO, color);
        assert_eq!(light.ambient, color * 0.1);
        assert_eq!(light.diffuse, color * 0.8);
        assert_eq!(light.specular, color);
    }
}
