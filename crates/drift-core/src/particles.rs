//! Particle and connection geometry for the primary field.
//!
//! Built once at startup from a seeded distribution; the CPU buffers are
//! never touched again after upload.

use crate::constants::*;
use fnv::{FnvHashMap, FnvHashSet};
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;

/// Per-particle attributes as laid out in the vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub random: f32,
    pub node_type: f32,
    pub distance: f32,
}

/// One endpoint of a connection line. Carries its particle's attributes so
/// the shader can displace lines exactly like the points they join.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub random: f32,
    pub node_type: f32,
    pub distance: f32,
    /// 0 at the first endpoint, 1 at the second.
    pub along: f32,
    /// Per-line phase for the travelling signal pulse.
    pub seed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: u32,
    pub b: u32,
    pub distance: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleParams {
    pub count: usize,
    pub seed: u64,
    pub field_radius: f32,
    pub clear_radius: f32,
    pub edge_bias: f32,
    pub depth: f32,
    pub neighbors: usize,
    pub connection_distance: f32,
    pub max_connections: usize,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            seed: PARTICLE_SEED,
            field_radius: FIELD_RADIUS,
            clear_radius: CLEAR_RADIUS,
            edge_bias: EDGE_BIAS,
            depth: FIELD_DEPTH,
            neighbors: NEIGHBORS_PER_PARTICLE,
            connection_distance: CONNECTION_DISTANCE,
            max_connections: MAX_CONNECTIONS,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleGeometry {
    pub points: Vec<ParticleVertex>,
    pub connections: Vec<Connection>,
}

impl ParticleGeometry {
    pub fn generate(params: &ParticleParams) -> Self {
        let points = generate_points(params);
        let connections = connect_nearest(&points, params);
        log::info!(
            "[particles] generated {} points, {} connections",
            points.len(),
            connections.len()
        );
        Self {
            points,
            connections,
        }
    }

    /// Two vertices per connection, ready for a line-list draw.
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        let mut out = Vec::with_capacity(self.connections.len() * 2);
        for (i, c) in self.connections.iter().enumerate() {
            let seed = (i as f32 * GOLDEN_ANGLE).fract();
            for (end, idx) in [(0.0, c.a), (1.0, c.b)] {
                let p = &self.points[idx as usize];
                out.push(LineVertex {
                    position: p.position,
                    random: p.random,
                    node_type: p.node_type,
                    distance: p.distance,
                    along: end,
                    seed,
                });
            }
        }
        out
    }
}

/// Edge-biased radial distribution: most points live in an annulus outside
/// `clear_radius`, a sparse few inside it so the centre is not empty.
pub fn generate_points(params: &ParticleParams) -> Vec<ParticleVertex> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let outer = params.field_radius.max(params.clear_radius);
    (0..params.count)
        .map(|_| {
            let theta = rng.gen::<f32>() * std::f32::consts::TAU;
            let u: f32 = rng.gen();
            let r = if rng.gen::<f32>() < 0.08 {
                params.clear_radius * u.sqrt()
            } else {
                params.clear_radius + (outer - params.clear_radius) * u.powf(params.edge_bias)
            };
            let z = (rng.gen::<f32>() - 0.5) * params.depth;
            let pos = Vec3::new(r * theta.cos() * 1.4, r * theta.sin(), z);
            let roll: f32 = rng.gen();
            let node_type = if roll < 0.7 {
                0.0
            } else if roll < 0.92 {
                1.0
            } else {
                (NODE_TYPE_COUNT - 1) as f32
            };
            ParticleVertex {
                position: pos.to_array(),
                random: rng.gen(),
                node_type,
                distance: pos.length(),
            }
        })
        .collect()
}

/// Link each point to its closest neighbours within the threshold, drop
/// duplicates, then keep the shortest `max_connections` lines.
pub fn connect_nearest(points: &[ParticleVertex], params: &ParticleParams) -> Vec<Connection> {
    let cell = params.connection_distance.max(1e-3);
    let key = |p: Vec3| -> (i32, i32, i32) {
        (
            (p.x / cell).floor() as i32,
            (p.y / cell).floor() as i32,
            (p.z / cell).floor() as i32,
        )
    };
    let mut grid: FnvHashMap<(i32, i32, i32), SmallVec<[u32; 8]>> = FnvHashMap::default();
    for (i, p) in points.iter().enumerate() {
        grid.entry(key(Vec3::from(p.position)))
            .or_default()
            .push(i as u32);
    }

    let max_d2 = params.connection_distance * params.connection_distance;
    let mut seen: FnvHashSet<(u32, u32)> = FnvHashSet::default();
    let mut lines = Vec::new();
    for (i, p) in points.iter().enumerate() {
        let pos = Vec3::from(p.position);
        let (cx, cy, cz) = key(pos);
        let mut nearest: SmallVec<[(f32, u32); 4]> = SmallVec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &j in bucket {
                        if j as usize == i {
                            continue;
                        }
                        let d2 = pos.distance_squared(Vec3::from(points[j as usize].position));
                        if d2 <= max_d2 {
                            insert_nearest(&mut nearest, (d2, j), params.neighbors);
                        }
                    }
                }
            }
        }
        for (d2, j) in nearest {
            let pair = ((i as u32).min(j), (i as u32).max(j));
            if seen.insert(pair) {
                lines.push(Connection {
                    a: pair.0,
                    b: pair.1,
                    distance: d2.sqrt(),
                });
            }
        }
    }
    lines.sort_by(|l, r| l.distance.total_cmp(&r.distance));
    lines.truncate(params.max_connections);
    lines
}

fn insert_nearest(list: &mut SmallVec<[(f32, u32); 4]>, item: (f32, u32), keep: usize) {
    if keep == 0 {
        return;
    }
    let at = list
        .iter()
        .position(|&(d, j)| item.0 < d || (item.0 == d && item.1 < j))
        .unwrap_or(list.len());
    if at < keep {
        list.insert(at, item);
        list.truncate(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ParticleParams {
        ParticleParams {
            count: 400,
            max_connections: 150,
            ..Default::default()
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_points(&small());
        let b = generate_points(&small());
        assert_eq!(a, b);
    }

    #[test]
    fn attributes_are_in_range() {
        let pts = generate_points(&small());
        for p in &pts {
            assert!(p.random >= 0.0 && p.random < 1.0);
            assert!(p.node_type >= 0.0 && p.node_type < NODE_TYPE_COUNT as f32);
            assert!((Vec3::from(p.position).length() - p.distance).abs() < 1e-4);
        }
    }

    #[test]
    fn centre_is_sparse() {
        let params = small();
        let pts = generate_points(&params);
        let inner = pts
            .iter()
            .filter(|p| {
                let v = Vec3::from(p.position);
                (v.x / 1.4).hypot(v.y) < params.clear_radius
            })
            .count();
        assert!(inner * 5 < pts.len(), "{} of {} inside", inner, pts.len());
    }

    #[test]
    fn nearest_list_keeps_smallest() {
        let mut l = SmallVec::new();
        for (d, j) in [(5.0, 1), (1.0, 2), (3.0, 3), (0.5, 4)] {
            insert_nearest(&mut l, (d, j), 3);
        }
        let ids: Vec<u32> = l.iter().map(|&(_, j)| j).collect();
        assert_eq!(ids, vec![4, 2, 3]);
    }
}
