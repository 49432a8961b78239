use glam::{Quat, Vec3};

/// Rotation taking the direction of `from` onto the direction of `to`.
///
/// Zero-length inputs give identity. Opposite directions rotate half a turn
/// about Z (or any axis perpendicular to `from` when `from` lies along Z).
pub fn shortest_arc(from: Vec3, to: Vec3) -> Quat {
    let (Some(a), Some(b)) = (from.try_normalize(), to.try_normalize()) else {
        return Quat::IDENTITY;
    };

    let angle = a.dot(b).clamp(-1.0, 1.0).acos();
    if angle <= f32::EPSILON {
        return Quat::IDENTITY;
    }

    let axis = match a.cross(b).try_normalize() {
        Some(axis) => axis,
        None if a.cross(Vec3::Z).length_squared() > 1e-6 => Vec3::Z,
        None => a.any_orthonormal_vector(),
    };
    Quat::from_axis_angle(axis, angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_from_onto_to() {
        let q = shortest_arc(Vec3::X, Vec3::Y);
        assert!((q * Vec3::X - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn ignores_lengths() {
        let q = shortest_arc(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.5));
        assert!((q * Vec3::X - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn parallel_is_identity() {
        assert_eq!(shortest_arc(Vec3::X, Vec3::X * 2.0), Quat::IDENTITY);
        assert_eq!(shortest_arc(Vec3::ZERO, Vec3::X), Quat::IDENTITY);
    }

    #[test]
    fn opposite_turns_about_z() {
        let q = shortest_arc(Vec3::X, -Vec3::X);
        assert!((q * Vec3::X + Vec3::X).length() < 1e-5);
        assert!((q * Vec3::Z - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn opposite_along_z_still_flips() {
        let q = shortest_arc(Vec3::Z, -Vec3::Z);
        assert!((q * Vec3::Z + Vec3::Z).length() < 1e-5);
    }
}
