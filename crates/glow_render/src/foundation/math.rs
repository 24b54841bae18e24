//! Math utilities and types
//!
//! Provides the fundamental math types used by the glow pass, plus the small
//! set of matrix helpers the submission loop needs when preparing
//! shader-constant uploads.

pub use nalgebra::{Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Extract the rows of a matrix as upload-ready `[f32; 4]` rows.
///
/// Shader constants travel through the device interface row by row, so a
/// full matrix upload is its four rows in order.
pub fn matrix_rows(m: &Mat4) -> [[f32; 4]; 4] {
    let mut rows = [[0.0f32; 4]; 4];
    for (i, row) in rows.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = m[(i, j)];
        }
    }
    rows
}

/// Extract the first three rows of a matrix (rotation-only uploads).
pub fn matrix_rows3(m: &Mat4) -> [[f32; 4]; 3] {
    let full = matrix_rows(m);
    [full[0], full[1], full[2]]
}

/// Pack a position into a single constant row (`w = 1`).
pub fn position_row(p: &Vec3) -> [f32; 4] {
    [p.x, p.y, p.z, 1.0]
}

/// Pack a direction into a single constant row (`w = 0`).
pub fn direction_row(d: &Vec3) -> [f32; 4] {
    [d.x, d.y, d.z, 0.0]
}

/// Translation component of a transform (fourth column).
pub fn translation_of(m: &Mat4) -> Vec3 {
    Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Copy of a transform with its translation zeroed.
///
/// Used for cubemap transforms, which carry orientation only.
pub fn without_translation(m: &Mat4) -> Mat4 {
    let mut out = *m;
    out[(0, 3)] = 0.0;
    out[(1, 3)] = 0.0;
    out[(2, 3)] = 0.0;
    out
}

/// Inverse of the transposed matrix.
///
/// The glow pass uploads the transposed object transform and then maps the
/// eye position and light direction through the inverse of that transposed
/// matrix. The derived quantity is named here so the pairing stays explicit
/// at the call site. Returns `None` when the matrix is singular.
pub fn inverse_of_transposed(m: &Mat4) -> Option<Mat4> {
    m.transpose().try_inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn matrix_rows_round_trip() {
        let m = Mat4::new(
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            13.0, 14.0, 15.0, 16.0,
        );
        let rows = matrix_rows(&m);
        assert_eq!(rows[0], [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rows[3], [13.0, 14.0, 15.0, 16.0]);
        assert_eq!(matrix_rows3(&m)[2], [9.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn translation_helpers() {
        let m = Mat4::new_translation(&Vec3::new(3.0, -1.0, 7.5));
        assert_relative_eq!(translation_of(&m), Vec3::new(3.0, -1.0, 7.5));
        let stripped = without_translation(&m);
        assert_relative_eq!(translation_of(&stripped), Vec3::zeros());
        // rotation block untouched
        assert_relative_eq!(stripped[(0, 0)], 1.0);
    }

    #[test]
    fn inverse_of_transposed_is_transpose_then_invert() {
        let m = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let inv = inverse_of_transposed(&m).unwrap();
        let expected = m.transpose().try_inverse().unwrap();
        assert_relative_eq!(inv, expected);
    }

    #[test]
    fn inverse_of_transposed_singular_is_none() {
        let m = Mat4::zeros();
        assert!(inverse_of_transposed(&m).is_none());
    }
}
