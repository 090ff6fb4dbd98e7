//! Exact triangle/triangle overlap via the separating axis test.
use glam::Vec3;

const MIN_AXIS_LENGTH_SQ: f32 = 1e-12;

/// Returns true if the two closed triangles share at least one point.
///
/// Touching triangles, including coplanar ones sharing an edge or a face
/// region, count as intersecting.
pub fn triangles_intersect(a: &[Vec3; 3], b: &[Vec3; 3]) -> bool {
    let ea = [a[1] - a[0], a[2] - a[1], a[0] - a[2]];
    let eb = [b[1] - b[0], b[2] - b[1], b[0] - b[2]];
    let na = ea[0].cross(ea[1]);
    let nb = eb[0].cross(eb[1]);

    if is_separating(na, a, b) || is_separating(nb, a, b) {
        return false;
    }

    for &u in &ea {
        for &v in &eb {
            if is_separating(u.cross(v), a, b) {
                return false;
            }
        }
    }

    // In-plane edge normals cover the coplanar case.
    for &u in &ea {
        if is_separating(na.cross(u), a, b) {
            return false;
        }
    }
    for &v in &eb {
        if is_separating(nb.cross(v), a, b) {
            return false;
        }
    }

    true
}

fn is_separating(axis: Vec3, a: &[Vec3; 3], b: &[Vec3; 3]) -> bool {
    if axis.length_squared() <= MIN_AXIS_LENGTH_SQ {
        return false;
    }
    let (a_min, a_max) = project(axis, a);
    let (b_min, b_max) = project(axis, b);
    a_max < b_min || b_max < a_min
}

#[inline]
fn project(axis: Vec3, tri: &[Vec3; 3]) -> (f32, f32) {
    let d0 = axis.dot(tri[0]);
    let d1 = axis.dot(tri[1]);
    let d2 = axis.dot(tri[2]);
    (d0.min(d1).min(d2), d0.max(d1).max(d2))
}
