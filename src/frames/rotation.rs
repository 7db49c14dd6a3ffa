use nalgebra::{Matrix3, Vector3};

/// Passive rotation of `v` about the x-axis by `angle` radians.
pub fn rotate_x(angle: f64, v: &Vector3<f64>) -> Vector3<f64> {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let r = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0,   c,   s,
        0.0,  -s,   c,
    );
    r * v
}

/// Passive rotation of `v` about the z-axis by `angle` radians.
pub fn rotate_z(angle: f64, v: &Vector3<f64>) -> Vector3<f64> {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let r = Matrix3::new(
          c,   s, 0.0,
         -s,   c, 0.0,
        0.0, 0.0, 1.0,
    );
    r * v
}
