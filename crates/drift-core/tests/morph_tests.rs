// Host-side tests for keyframe interpolation, the morph driver and the
// generated selection shader.

use drift_core::morph::{scaled_progress, segment, shapes};
use drift_core::*;

fn close(a: &[glam::Vec3], b: &[glam::Vec3]) -> bool {
    a.iter().zip(b).all(|(p, q)| (*p - *q).length() < 1e-4)
}

#[test]
fn scaled_progress_endpoints_hit_keyframes_exactly() {
    let set = shapes::default_set(64).unwrap();
    let k = set.len();
    assert_eq!(scaled_progress(0.5, k), 0.5 * (k - 1) as f32);
    assert_eq!(
        segment(0.0, k),
        Segment {
            from: 0,
            to: 1,
            t: 0.0
        }
    );
    let end = segment(1.0, k);
    assert_eq!((end.from, end.to, end.t), (k - 2, k - 1, 1.0));
    assert!(close(&set.sample(0.0), set.positions(0)));
    assert!(close(&set.sample(1.0), set.positions(k - 1)));
}

#[test]
fn segments_only_ever_join_adjacent_keyframes() {
    for k in 2..=12 {
        let mut last_from = 0;
        for step in 0..=2000 {
            let p = step as f32 / 2000.0;
            let s = segment(p, k);
            assert_eq!(s.to, s.from + 1);
            assert!(s.to < k);
            assert!((0.0..=1.0).contains(&s.t));
            assert!(s.from == last_from || s.from == last_from + 1, "skipped at p={p}");
            last_from = s.from;
        }
    }
}

#[test]
fn branch_chain_agrees_with_floor_selection() {
    for k in 2..=MORPH_BRANCH_CHAIN_MAX {
        let boundaries = (0..k).map(|i| i as f32 / (k - 1) as f32);
        let grid = (0..=997).map(|i| i as f32 / 997.0);
        for p in boundaries.chain(grid) {
            let a = branch_chain_segment(p, k);
            let b = segment(p, k);
            assert_eq!(a.from, b.from, "k={k} p={p}");
            assert!((a.t - b.t).abs() < 1e-6);
        }
    }
}

#[test]
fn branch_chain_is_ordered_low_to_high() {
    let src = morph_select_source(5, MorphShaderStyle::BranchChain).unwrap();
    let first = src.find("if (scaled < 1.0)").unwrap();
    let second = src.find("} else if (scaled < 2.0)").unwrap();
    let third = src.find("} else if (scaled < 3.0)").unwrap();
    let last = src.find("} else {").unwrap();
    assert!(first < second && second < third && third < last);
    assert!(src[last..].contains("from_k = 3u;"));
    assert!(!src.contains("scaled < 4.0"));
}

#[test]
fn indexed_style_uses_clamped_floor() {
    let src = morph_select_source(12, MorphShaderStyle::IndexedArray).unwrap();
    assert!(src.contains("const MORPH_KEYFRAMES: u32 = 12u;"));
    assert!(src.contains("min(u32(floor(scaled)), MORPH_KEYFRAMES - 2u)"));
    assert!(!src.contains("else if"));

    let full = morph_shader_source(12, MorphShaderStyle::IndexedArray, MORPH_WGSL).unwrap();
    assert!(full.starts_with("const MORPH_KEYFRAMES"));
    assert!(full.contains("fn vs_morph"));
}

#[test]
fn wraparound_reaches_duplicate_then_snaps_to_zero() {
    let set = shapes::default_set(32).unwrap();
    let ext = set.with_wraparound();
    let mut d = MorphDriver::new(set.len(), MorphMode::ClickCycle, MORPH_SPEED);
    assert_eq!(d.extended_len(), ext.len());

    let dt = 1.0 / 60.0;
    for _ in 0..set.len() - 1 {
        d.advance();
        for _ in 0..600 {
            d.tick(dt);
        }
    }
    assert_eq!(d.index(), set.len() - 1);
    assert!((d.progress() - (set.len() - 1) as f32).abs() < 1e-2);

    d.advance();
    assert_eq!(d.target(), set.len() as f32);
    let mut prev = d.uniform();
    let mut snapped = false;
    for _ in 0..1000 {
        d.tick(dt);
        if d.progress() == 0.0 {
            snapped = true;
            break;
        }
        // Moving forward into the duplicate, never backwards through shapes.
        assert!(d.uniform() >= prev);
        prev = d.uniform();
    }
    assert!(snapped);
    assert!(prev > 0.99);
    assert_eq!(d.index(), 0);
    assert_eq!(d.target(), 0.0);
    // The duplicate looks exactly like keyframe 0, so the snap is invisible.
    assert!(close(&ext.sample(1.0), set.positions(0)));
}

#[test]
fn oscillator_hops_on_its_own() {
    let mut d = MorphDriver::new(3, MorphMode::Oscillator, MORPH_SPEED);
    let dt = 1.0 / 60.0;
    let frames = (MORPH_OSCILLATOR_PERIOD_SEC / dt) as usize + 2;
    for _ in 0..frames {
        d.tick(dt);
    }
    assert_eq!(d.index(), 1);
    assert!(d.progress() > 0.0);
}
