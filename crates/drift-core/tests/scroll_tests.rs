// Host-side tests for the scroll controller and section mapping.

use drift_core::*;

fn sample(y: f32, t_ms: f64) -> ScrollSample {
    ScrollSample {
        scroll_y: y,
        document_height: 10_000.0,
        viewport_height: 1_000.0,
        time_ms: t_ms,
    }
}

#[test]
fn every_fraction_belongs_to_exactly_one_section() {
    let table = SectionTable::default();
    for step in 0..1000 {
        let f = step as f32 / 1000.0;
        let hits = table.ranges().iter().filter(|r| r.contains(f)).count();
        assert_eq!(hits, 1, "fraction {f} matched {hits} sections");
    }
    assert_eq!(table.locate(1.0), table.len() - 1);
    assert_eq!(Section::from_index(table.locate(1.0)), Section::Contact);
}

#[test]
fn calm_never_decreases_on_a_forward_pass() {
    let mut store = AnimationStore::new();
    let mut ctl = ScrollController::default();
    let mut prev = 0.0;
    for i in 0..=300 {
        let y = i as f32 * 30.0;
        ctl.on_scroll(sample(y, i as f64 * 16.0), &mut store);
        let calm = store.calm_factor();
        assert!(calm + 1e-6 >= prev, "calm fell from {prev} to {calm} at y={y}");
        assert!(calm <= CALM_MAX);
        prev = calm;
    }
    assert_eq!(store.scroll_progress(), 1.0);
    assert_eq!(store.current_section(), Section::Contact);
}

#[test]
fn teleport_to_the_bottom() {
    let mut store = AnimationStore::new();
    let mut ctl = ScrollController::default();
    ctl.on_scroll(sample(0.0, 0.0), &mut store);
    let report = ctl.on_scroll(sample(9_000.0, 16.0), &mut store).unwrap();

    assert_eq!(report.fraction, 1.0);
    assert_eq!(store.current_section(), Section::Contact);
    assert_eq!(store.scroll_progress(), 1.0);
    assert_eq!(store.section_progress(), 1.0);
    assert_eq!(store.scroll_velocity(), 1.0);
    assert!((store.calm_factor() - CALM_MAX).abs() < 1e-6);
    // Last section ends at 1.0, so the transition ramp is back at 0.
    assert_eq!(store.transition_progress(), 0.0);
    assert!(!store.snapshot().is_transitioning());
}

#[test]
fn velocity_decays_to_exactly_zero() {
    let mut store = AnimationStore::new();
    let mut ctl = ScrollController::default();
    ctl.on_scroll(sample(0.0, 0.0), &mut store);
    ctl.on_scroll(sample(9_000.0, 16.0), &mut store);
    assert!(ctl.decay_armed());

    let mut prev = store.scroll_velocity();
    let mut frames = 0;
    while let Some(v) = ctl.decay_tick(&mut store) {
        assert!(v <= prev + 1e-6, "velocity rose from {prev} to {v}");
        prev = v;
        frames += 1;
        assert!(frames < 1000, "decay never settled");
    }
    assert!(!ctl.decay_armed());
    assert_eq!(store.scroll_velocity(), 0.0);
    assert_eq!(ctl.smoothed_velocity(), 0.0);
    // Position state is untouched by decay.
    assert_eq!(store.scroll_progress(), 1.0);
}

#[test]
fn hidden_page_pauses_decay() {
    let mut store = AnimationStore::new();
    let mut ctl = ScrollController::default();
    ctl.on_scroll(sample(0.0, 0.0), &mut store);
    ctl.on_scroll(sample(500.0, 16.0), &mut store);
    let before = store.scroll_velocity();
    ctl.set_visible(false);
    assert_eq!(ctl.decay_tick(&mut store), None);
    assert_eq!(store.scroll_velocity(), before);
    ctl.set_visible(true);
    assert!(ctl.decay_tick(&mut store).is_some());
}

#[test]
fn custom_tables_must_cover_the_unit_interval() {
    let ranges = vec![
        SectionRange {
            section: Section::Home,
            start: 0.0,
            end: 0.5,
        },
        SectionRange {
            section: Section::Contact,
            start: 0.5,
            end: 0.9,
        },
    ];
    let poses = vec![CameraPose::new([0.0, 0.0, 10.0], [0.0; 3]); 2];
    assert!(matches!(
        SectionTable::new(ranges, poses),
        Err(CoreError::SectionTableEnd { .. })
    ));
}

fn range(section: Section, start: f32, end: f32) -> SectionRange {
    SectionRange {
        section,
        start,
        end,
    }
}

#[test]
fn reordered_table_drives_the_camera_by_row() {
    let ranges = vec![
        range(Section::About, 0.0, 0.5),
        range(Section::Home, 0.5, 1.0),
    ];
    let poses = vec![
        CameraPose::new([0.0, 0.0, 10.0], [0.0; 3]),
        CameraPose::new([5.0, 0.0, 30.0], [0.0; 3]),
    ];
    let table = SectionTable::new(ranges, poses).unwrap();
    let mut store = AnimationStore::new();
    let mut ctl = ScrollController::new(table.clone());

    // 900 / (10_000 - 1_000) = 0.1, the first fifth of the first row.
    ctl.on_scroll(sample(900.0, 0.0), &mut store);
    assert_eq!(store.current_section(), Section::About);
    assert_eq!(store.uniforms().section_index, 0.0);

    let mut uniforms = *store.uniforms();
    uniforms.section_progress = 0.0;
    let cam = CameraRig::default().step(&table, &uniforms, 1.0);
    assert_eq!(cam.eye, table.pose(0).position);

    ctl.on_scroll(sample(8_100.0, 16.0), &mut store);
    assert_eq!(store.current_section(), Section::Home);
    assert_eq!(store.uniforms().section_index, 1.0);
}

#[test]
fn a_section_may_appear_only_once() {
    let ranges = vec![
        range(Section::Home, 0.0, 0.5),
        range(Section::Home, 0.5, 1.0),
    ];
    assert_eq!(
        SectionTable::new(ranges, Vec::new()).unwrap_err(),
        CoreError::DuplicateSection {
            section: Section::Home,
            index: 1,
        }
    );
}
