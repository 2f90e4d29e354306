// Host-side tests for particle connections and velocity-field sizing.

use drift_core::*;
use glam::Vec3;

#[test]
fn connections_are_bounded_sorted_and_unique() {
    let params = ParticleParams {
        count: 900,
        max_connections: 500,
        ..Default::default()
    };
    let geo = ParticleGeometry::generate(&params);
    assert_eq!(geo.points.len(), 900);
    assert!(geo.connections.len() <= 500);
    assert!(!geo.connections.is_empty());

    let mut pairs = std::collections::HashSet::new();
    for w in geo.connections.windows(2) {
        assert!(w[0].distance <= w[1].distance);
    }
    for c in &geo.connections {
        assert!(c.a < c.b, "self link or unordered pair");
        assert!(pairs.insert((c.a, c.b)), "duplicate line");
        assert!(c.distance <= params.connection_distance + 1e-4);
        let pa = Vec3::from(geo.points[c.a as usize].position);
        let pb = Vec3::from(geo.points[c.b as usize].position);
        assert!((pa.distance(pb) - c.distance).abs() < 1e-4);
    }

    let lines = geo.line_vertices();
    assert_eq!(lines.len(), geo.connections.len() * 2);
    assert_eq!(lines[0].along, 0.0);
    assert_eq!(lines[1].along, 1.0);
    assert_eq!(lines[0].seed, lines[1].seed);
}

#[test]
fn field_targets_track_the_viewport() {
    let r = FieldResolution::for_viewport(1920, 1080);
    assert_eq!((r.hi.0, r.hi.1), (480, 270));
    assert_eq!((r.lo.0, r.lo.1), (240, 135));

    let r = FieldResolution::for_viewport(1001, 603);
    assert_eq!((r.hi.0, r.hi.1), (250, 150));
    assert_eq!((r.lo.0, r.lo.1), (125, 75));

    assert!(!FieldResolution::for_viewport(6, 600).is_renderable());
}

#[test]
fn ping_pong_reads_last_frames_write() {
    let mut pair = PingPong::from_fn(|slot| match slot {
        Slot::A => String::from("a"),
        Slot::B => String::from("b"),
    });
    for _ in 0..5 {
        assert_ne!(pair.read_slot(), pair.write_slot());
        let written = pair.write_slot();
        pair.write_mut().push('+');
        pair.swap();
        assert_eq!(pair.read_slot(), written);
        assert!(pair.read().ends_with('+'));
    }
}
