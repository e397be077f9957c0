use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::types::*;

/// Narrowphase primitive tests used by the reference host's casts.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn ray_aabb(origin: Vec2, dir: Vec2, aabb_min: Vec2, aabb_max: Vec2) -> Option<SweepHit> {
        // Slab method with normal tracking; returns earliest t >= 0
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;
        let mut n_enter = Vec2::ZERO;

        // X axis
        if dir.x.abs() < f32::EPSILON {
            if origin.x < aabb_min.x || origin.x > aabb_max.x {
                return None;
            }
        } else {
            let inv = 1.0 / dir.x;
            let mut t1 = (aabb_min.x - origin.x) * inv;
            let mut t2 = (aabb_max.x - origin.x) * inv;
            let mut nx = -1.0;
            if t1 > t2 {
                core::mem::swap(&mut t1, &mut t2);
                nx = 1.0;
            }
            if t1 > tmin {
                tmin = t1;
                n_enter = Vec2::new(nx, 0.0);
            }
            if t2 < tmax {
                tmax = t2;
            }
            if tmin > tmax {
                return None;
            }
        }

        // Y axis
        if dir.y.abs() < f32::EPSILON {
            if origin.y < aabb_min.y || origin.y > aabb_max.y {
                return None;
            }
        } else {
            let inv = 1.0 / dir.y;
            let mut t1 = (aabb_min.y - origin.y) * inv;
            let mut t2 = (aabb_max.y - origin.y) * inv;
            let mut ny = -1.0;
            if t1 > t2 {
                core::mem::swap(&mut t1, &mut t2);
                ny = 1.0;
            }
            if t1 > tmin {
                tmin = t1;
                n_enter = Vec2::new(0.0, ny);
            }
            if t2 < tmax {
                tmax = t2;
            }
            if tmin > tmax {
                return None;
            }
        }

        // Box entirely behind the origin, or only touched while leaving it.
        if tmax <= 0.0 {
            return None;
        }

        // If origin inside, tmin < 0; treat as immediate hit with no entry normal
        let toi = if tmin < 0.0 { 0.0 } else { tmin };
        let contact = origin + dir * toi;
        let normal = if tmin < 0.0 { Vec2::ZERO } else { n_enter };
        Some(SweepHit { toi, normal, contact })
    }

    fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, r: f32) -> Option<SweepHit> {
        // Solve ||origin + t*dir - center||^2 = r^2 for t >= 0
        let m = origin - center;
        let a = dir.length_squared();
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * m.dot(dir);
        let c = m.length_squared() - r * r;
        // Outside (or on the surface) and heading away.
        if c >= 0.0 && b > 0.0 {
            return None;
        }
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t0 = (-b - sqrt_disc) / (2.0 * a);
        let t1 = (-b + sqrt_disc) / (2.0 * a);
        let t = if t0 >= 0.0 { t0 } else { t1 };
        if t < 0.0 {
            return None;
        }
        let contact = origin + dir * t;
        let n = contact - center;
        let len = n.length();
        let normal = if len > 0.0 { n / len } else { Vec2::ZERO };
        Some(SweepHit { toi: t, normal, contact })
    }

    fn overlap_aabb_aabb(c0: Vec2, h0: Vec2, c1: Vec2, h1: Vec2) -> Option<Overlap> {
        let d = c1 - c0;
        let ox = (h0.x + h1.x) - d.x.abs();
        let oy = (h0.y + h1.y) - d.y.abs();
        if ox <= 0.0 || oy <= 0.0 {
            return None;
        }

        // Axis of minimum penetration
        let (depth, normal, axis_h) = if ox <= oy {
            let nx = if d.x >= 0.0 { -1.0 } else { 1.0 }; // from B into A
            (ox, Vec2::new(nx, 0.0), h0.x)
        } else {
            let ny = if d.y >= 0.0 { -1.0 } else { 1.0 };
            (oy, Vec2::new(0.0, ny), h0.y)
        };

        // Project A's center onto B's box, then step onto A's surface along the normal
        let bmin = c1 - h1;
        let bmax = c1 + h1;
        let mut contact = c0.clamp(bmin, bmax);
        contact -= normal * axis_h;

        Some(Overlap { normal, depth, contact })
    }

    fn overlap_circle_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> Option<Overlap> {
        let delta = c0 - c1;
        let dist2 = delta.length_squared();
        let rsum = r0 + r1;
        if dist2 >= rsum * rsum {
            return None;
        }
        if dist2 == 0.0 {
            // Coincident centers; undefined normal.
            return Some(Overlap { normal: Vec2::ZERO, depth: rsum, contact: c1 });
        }
        let dist = dist2.sqrt();
        let normal = delta / dist; // from B into A
        let depth = rsum - dist;
        let contact = c1 + normal * r1;
        Some(Overlap { normal, depth, contact })
    }

    fn overlap_circle_aabb(c: Vec2, r: f32, box_c: Vec2, box_h: Vec2) -> Option<Overlap> {
        let min = box_c - box_h;
        let max = box_c + box_h;
        let closest = c.clamp(min, max);
        let d = c - closest;
        let dist2 = d.length_squared();
        if dist2 > 0.0 {
            if dist2 >= r * r {
                return None;
            }
            let dist = dist2.sqrt();
            return Some(Overlap { normal: d / dist, depth: r - dist, contact: closest });
        }

        // Center inside the box: leave through the nearest face.
        let to_min = c - min;
        let to_max = max - c;
        let faces = [
            (to_min.x, Vec2::NEG_X),
            (to_max.x, Vec2::X),
            (to_min.y, Vec2::NEG_Y),
            (to_max.y, Vec2::Y),
        ];
        let (gap, normal) = faces
            .into_iter()
            .fold((f32::INFINITY, Vec2::ZERO), |best, f| if f.0 < best.0 { f } else { best });
        if gap + r <= 0.0 {
            return None;
        }
        Some(Overlap { normal, depth: gap + r, contact: c + normal * gap })
    }

    fn sweep_aabb_aabb(
        c0: Vec2,
        h0: Vec2,
        v0: Vec2,
        c1: Vec2,
        h1: Vec2,
        v1: Vec2,
    ) -> Option<SweepHit> {
        let vrel = v0 - v1;
        if vrel.length_squared() <= f32::EPSILON {
            return None;
        }
        let expand = h0 + h1;
        let min = c1 - expand;
        let max = c1 + expand;
        let hit = Self::ray_aabb(c0, vrel, min, max)?;
        if hit.toi < 0.0 || hit.toi > 1.0 {
            return None;
        }
        let center_at_hit = c0 + vrel * hit.toi;
        let normal = hit.normal;
        let contact = center_at_hit - normal * h0;
        Some(SweepHit { toi: hit.toi, normal, contact })
    }

    fn sweep_circle_aabb(
        c: Vec2,
        r: f32,
        v: Vec2,
        box_c: Vec2,
        box_h: Vec2,
        box_v: Vec2,
    ) -> Option<SweepHit> {
        let vrel = v - box_v;
        if vrel.length_squared() <= f32::EPSILON {
            return None;
        }
        // Rounded box: slab test against the box grown by r, then the corner
        // circle decides whenever the entry point lands past a corner.
        let rvec = Vec2::splat(r);
        let bmin = box_c - box_h;
        let bmax = box_c + box_h;
        let hit = Self::ray_aabb(c, vrel, bmin - rvec, bmax + rvec)?;
        if hit.toi < 0.0 || hit.toi > 1.0 {
            return None;
        }
        let center_at_hit = c + vrel * hit.toi;
        let past_x = center_at_hit.x < bmin.x || center_at_hit.x > bmax.x;
        let past_y = center_at_hit.y < bmin.y || center_at_hit.y > bmax.y;
        if past_x && past_y {
            let corner = Vec2::new(
                if center_at_hit.x < bmin.x { bmin.x } else { bmax.x },
                if center_at_hit.y < bmin.y { bmin.y } else { bmax.y },
            );
            let hit = Self::ray_circle(c, vrel, corner, r)?;
            if hit.toi > 1.0 {
                return None;
            }
            return Some(SweepHit { toi: hit.toi, normal: hit.normal, contact: corner });
        }
        let normal = hit.normal;
        let contact = center_at_hit - normal * r;
        Some(SweepHit { toi: hit.toi, normal, contact })
    }

    fn sweep_circle_circle(
        c0: Vec2,
        r0: f32,
        v0: Vec2,
        c1: Vec2,
        r1: f32,
        v1: Vec2,
    ) -> Option<SweepHit> {
        let vrel = v0 - v1;
        if vrel.length_squared() <= f32::EPSILON {
            return None;
        }
        let rsum = r0 + r1;
        let hit = Self::ray_circle(c0, vrel, c1, rsum)?;
        if hit.toi < 0.0 || hit.toi > 1.0 {
            return None;
        }
        let center_at_hit = c0 + vrel * hit.toi;
        let normal = hit.normal; // outward from expanded circle => from B to A
        let contact = center_at_hit - normal * r0;
        Some(SweepHit { toi: hit.toi, normal, contact })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_overlap_aabb_aabb_basic() {
        let o = Narrowphase::overlap_aabb_aabb(
            Vec2::ZERO,
            Vec2::ONE,
            Vec2::new(1.5, 0.0),
            Vec2::ONE,
        )
        .unwrap();
        assert_abs_diff_eq!(o.depth, 0.5, epsilon = 1e-5);
        assert_eq!(o.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_overlap_aabb_aabb_touching_is_not_overlap() {
        assert!(Narrowphase::overlap_aabb_aabb(Vec2::ZERO, Vec2::ONE, Vec2::new(2.0, 0.0), Vec2::ONE).is_none());
        assert!(Narrowphase::overlap_aabb_aabb(Vec2::ZERO, Vec2::ONE, Vec2::new(3.1, 0.0), Vec2::ONE).is_none());
    }

    #[test]
    fn test_overlap_circle_circle_basic() {
        let o = Narrowphase::overlap_circle_circle(Vec2::ZERO, 1.0, Vec2::new(1.0, 0.0), 1.0).unwrap();
        assert_abs_diff_eq!(o.depth, 1.0, epsilon = 1e-5);
        // Normal points from B (c1) into A (c0): (-1, 0)
        assert_abs_diff_eq!(o.normal.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(o.normal.y, 0.0, epsilon = 1e-5);
        // Contact sits on B's surface facing A
        assert_abs_diff_eq!(o.contact.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_overlap_circle_circle_tangent() {
        assert!(Narrowphase::overlap_circle_circle(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_overlap_circle_aabb_outside_and_inside() {
        let o = Narrowphase::overlap_circle_aabb(Vec2::new(1.25, 0.0), 0.5, Vec2::ZERO, Vec2::ONE).unwrap();
        assert_eq!(o.normal, Vec2::X);
        assert_abs_diff_eq!(o.depth, 0.25, epsilon = 1e-5);
        assert_eq!(o.contact, Vec2::new(1.0, 0.0));

        let o = Narrowphase::overlap_circle_aabb(Vec2::new(0.0, 0.75), 0.5, Vec2::ZERO, Vec2::ONE).unwrap();
        assert_eq!(o.normal, Vec2::Y);
        assert_abs_diff_eq!(o.depth, 0.75, epsilon = 1e-5);

        assert!(Narrowphase::overlap_circle_aabb(Vec2::new(1.5, 0.0), 0.5, Vec2::ZERO, Vec2::ONE).is_none());
    }

    // --- Rays ---------------------------------------------------------------

    #[test]
    fn test_ray_aabb_hit() {
        let hit = Narrowphase::ray_aabb(Vec2::new(-5.0, 0.0), Vec2::X, Vec2::NEG_ONE, Vec2::ONE).unwrap();
        assert_abs_diff_eq!(hit.toi, 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_aabb_parallel_miss() {
        assert!(Narrowphase::ray_aabb(Vec2::new(-5.0, 2.0), Vec2::X, Vec2::NEG_ONE, Vec2::ONE).is_none());
    }

    #[test]
    fn test_ray_aabb_box_behind_is_miss() {
        assert!(Narrowphase::ray_aabb(Vec2::new(5.0, 0.0), Vec2::X, Vec2::NEG_ONE, Vec2::ONE).is_none());
        // Touching the face while moving away
        assert!(Narrowphase::ray_aabb(Vec2::new(1.0, 0.0), Vec2::X, Vec2::NEG_ONE, Vec2::ONE).is_none());
    }

    #[test]
    fn test_ray_circle_hit_and_receding() {
        let hit = Narrowphase::ray_circle(Vec2::new(-3.0, 0.0), Vec2::X, Vec2::ZERO, 1.0).unwrap();
        assert_abs_diff_eq!(hit.contact.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
        assert!(Narrowphase::ray_circle(Vec2::new(-1.0, 0.0), Vec2::NEG_X, Vec2::ZERO, 1.0).is_none());
    }

    // --- Sweeps -------------------------------------------------------------

    #[test]
    fn test_sweep_aabb_aabb_head_on() {
        let hit = Narrowphase::sweep_aabb_aabb(
            Vec2::new(-3.0, 0.0),
            Vec2::ONE,
            Vec2::new(5.0, 0.0),
            Vec2::ZERO,
            Vec2::ONE,
            Vec2::ZERO,
        )
        .unwrap();
        assert_abs_diff_eq!(hit.toi, 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.contact.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_sweep_circle_circle_head_on() {
        let hit = Narrowphase::sweep_circle_circle(
            Vec2::new(-3.0, 0.0),
            1.0,
            Vec2::new(5.0, 0.0),
            Vec2::ZERO,
            1.0,
            Vec2::ZERO,
        )
        .unwrap();
        assert_abs_diff_eq!(hit.toi, 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.contact.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_sweep_circle_aabb_head_on() {
        let hit = Narrowphase::sweep_circle_aabb(
            Vec2::new(-3.0, 0.0),
            1.0,
            Vec2::new(5.0, 0.0),
            Vec2::ZERO,
            Vec2::ONE,
            Vec2::ZERO,
        )
        .unwrap();
        assert_abs_diff_eq!(hit.toi, 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.contact.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_sweep_circle_aabb_rounded_corner() {
        // Coming down past the corner: contact on the corner arc, not the square's edge
        let hit = Narrowphase::sweep_circle_aabb(
            Vec2::new(0.9, 3.0),
            0.5,
            Vec2::new(0.0, -5.0),
            Vec2::ZERO,
            Vec2::splat(0.5),
            Vec2::ZERO,
        )
        .unwrap();
        assert_abs_diff_eq!(hit.toi * 5.0, 2.2, epsilon = 1e-4);
        assert_abs_diff_eq!(hit.normal.x, 0.8, epsilon = 1e-4);
        assert_abs_diff_eq!(hit.normal.y, 0.6, epsilon = 1e-4);
        assert_eq!(hit.contact, Vec2::splat(0.5));

        // Inside the grown square but clear of the arc, moving sideways past it
        assert!(
            Narrowphase::sweep_circle_aabb(
                Vec2::new(0.95, 0.95),
                0.5,
                Vec2::new(0.0, 2.0),
                Vec2::ZERO,
                Vec2::splat(0.5),
                Vec2::ZERO,
            )
            .is_none()
        );
    }

    #[test]
    fn test_sweep_out_of_range_misses() {
        assert!(
            Narrowphase::sweep_aabb_aabb(
                Vec2::new(-10.0, 0.0),
                Vec2::ONE,
                Vec2::new(1.0, 0.0),
                Vec2::ZERO,
                Vec2::ONE,
                Vec2::ZERO,
            )
            .is_none()
        );
    }
}
