// Host-side tests for frame ordering and loop cancelation.

use drift_core::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn controllers_run_before_renderers() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut s = FrameScheduler::new();
    let l = log.clone();
    s.add("render", Phase::Renderers, move |_| {
        l.borrow_mut().push("render");
        TaskStatus::Ran
    });
    let l = log.clone();
    s.add("cursor", Phase::Controllers, move |_| {
        l.borrow_mut().push("cursor");
        TaskStatus::Ran
    });
    let l = log.clone();
    s.add("scroll-decay", Phase::Controllers, move |_| {
        l.borrow_mut().push("scroll-decay");
        TaskStatus::Ran
    });
    let stats = s.run_frame(0.0);
    assert_eq!(stats.ran, 3);
    assert_eq!(*log.borrow(), vec!["cursor", "scroll-decay", "render"]);
}

#[test]
fn renderer_sees_controller_output_in_the_same_frame() {
    let store = Rc::new(RefCell::new(AnimationStore::new()));
    let field = Rc::new(RefCell::new(CursorField::default()));
    field
        .borrow_mut()
        .set_target_world(glam::Vec2::new(4.0, 0.0));
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mut s = FrameScheduler::new();
    {
        let (store, seen) = (store.clone(), seen.clone());
        s.add("render", Phase::Renderers, move |_| {
            seen.borrow_mut().push(store.borrow().uniforms().cursor_position.x);
            TaskStatus::Ran
        });
    }
    {
        let (store, field) = (store.clone(), field.clone());
        s.add("cursor", Phase::Controllers, move |_| {
            field.borrow_mut().tick(&mut store.borrow_mut());
            TaskStatus::Ran
        });
    }
    s.run_frame(0.0);
    assert!(seen.borrow()[0] > 0.0);
}

#[test]
fn skipped_tasks_are_retried_and_cancelled_tasks_removed() {
    let ready = Rc::new(RefCell::new(false));
    let runs = Rc::new(RefCell::new(0));
    let mut s = FrameScheduler::new();
    let (r, n) = (ready.clone(), runs.clone());
    let handle = s.add("morph", Phase::Renderers, move |_| {
        if !*r.borrow() {
            return TaskStatus::Skipped;
        }
        *n.borrow_mut() += 1;
        TaskStatus::Ran
    });

    assert_eq!(s.run_frame(0.0).skipped, 1);
    *ready.borrow_mut() = true;
    assert_eq!(s.run_frame(0.016).ran, 1);
    handle.cancel();
    let stats = s.run_frame(0.032);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.ran, 0);
    assert!(s.is_empty());
    assert_eq!(*runs.borrow(), 1);
}

#[test]
fn cancel_all_flags_every_handle() {
    let mut s = FrameScheduler::new();
    let a = s.add("a", Phase::Controllers, |_| TaskStatus::Ran);
    let b = s.add("b", Phase::Renderers, |_| TaskStatus::Ran);
    s.cancel_all();
    assert!(a.is_cancelled() && b.is_cancelled());
    assert_eq!(s.run_frame(1.0), FrameStats::default());
}

#[test]
fn dropping_one_task_leaves_the_rest_running() {
    let mut s = FrameScheduler::new();
    let ticks = Rc::new(RefCell::new(0));
    let t = ticks.clone();
    s.add("cursor", Phase::Controllers, move |_| {
        *t.borrow_mut() += 1;
        TaskStatus::Ran
    });
    s.add("scroll-decay", Phase::Controllers, |_| TaskStatus::Ran);
    // A renderer whose device never arrived.
    let render = s.add("render", Phase::Renderers, |_| TaskStatus::Skipped);

    assert_eq!(s.run_frame(0.0).skipped, 1);
    render.cancel();
    let stats = s.run_frame(0.016);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.ran, 2);
    assert_eq!(s.len(), 2);
    assert_eq!(s.run_frame(0.032).ran, 2);
    assert_eq!(*ticks.borrow(), 3);
}
