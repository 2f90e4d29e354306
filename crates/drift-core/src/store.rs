//! Shared animation state.
//!
//! The store keeps two views over the same numbers:
//!
//! - [`AnimationState`], the reactive snapshot UI consumers subscribe to. It is
//!   the system of record.
//! - [`FrameUniforms`], a plain mirror the render loop polls once per tick
//!   without triggering any notifications.
//!
//! Every setter writes both views in the same call, so a renderer running
//! after a controller in the same frame always sees the controller's output.
//!
//! Single writer per field:
//! - scroll controller: section, scroll/section progress, velocity,
//!   transition, calm
//! - cursor controller: cursor position
//! - velocity-field pipeline: field handle

use crate::constants::CALM_MAX;
use crate::section::Section;
use glam::Vec2;

/// Reactive snapshot of the animation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub current_section: Section,
    pub scroll_progress: f32,
    pub section_progress: f32,
    pub cursor_position: Vec2,
    pub scroll_velocity: f32,
    pub transition_progress: f32,
    pub calm_factor: f32,
}

impl AnimationState {
    /// True while near a section boundary (strictly between 0 and 1).
    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transition_progress > 0.0 && self.transition_progress < 1.0
    }
}

/// Opaque id of the most recently published velocity-field texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldHandle(pub u64);

/// Non-reactive mirror read by renderers every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameUniforms {
    pub section_index: f32,
    pub scroll_progress: f32,
    pub section_progress: f32,
    pub cursor_position: Vec2,
    pub scroll_velocity: f32,
    pub transition_progress: f32,
    pub calm_factor: f32,
    pub velocity_field: Option<FieldHandle>,
}

/// Which field a notification is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateField {
    Section,
    ScrollProgress,
    SectionProgress,
    CursorPosition,
    ScrollVelocity,
    TransitionProgress,
    CalmFactor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(StateField, &AnimationState)>;

#[derive(Default)]
pub struct AnimationStore {
    state: AnimationState,
    mirror: FrameUniforms,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl AnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current reactive snapshot.
    #[inline]
    pub fn snapshot(&self) -> AnimationState {
        self.state
    }

    /// Mirror for the render loop.
    #[inline]
    pub fn uniforms(&self) -> &FrameUniforms {
        &self.mirror
    }

    #[inline]
    pub fn current_section(&self) -> Section {
        self.state.current_section
    }

    #[inline]
    pub fn scroll_progress(&self) -> f32 {
        self.state.scroll_progress
    }

    #[inline]
    pub fn section_progress(&self) -> f32 {
        self.state.section_progress
    }

    #[inline]
    pub fn cursor_position(&self) -> Vec2 {
        self.state.cursor_position
    }

    #[inline]
    pub fn scroll_velocity(&self) -> f32 {
        self.state.scroll_velocity
    }

    #[inline]
    pub fn transition_progress(&self) -> f32 {
        self.state.transition_progress
    }

    #[inline]
    pub fn calm_factor(&self) -> f32 {
        self.state.calm_factor
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(StateField, &AnimationState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(i, _)| *i != id);
        self.listeners.len() != before
    }

    /// Set the section by id. The mirrored index is the id's position in
    /// the default page order.
    pub fn set_section(&mut self, section: Section) {
        self.set_section_at(section, section.index());
    }

    /// Set the section together with its row in the active section table.
    /// The mirror carries `table_index`, which is what pose lookup reads.
    pub fn set_section_at(&mut self, section: Section, table_index: usize) {
        self.mirror.section_index = table_index as f32;
        if self.state.current_section != section {
            log::debug!("[store] section -> {}", section.key());
            self.state.current_section = section;
            self.notify(StateField::Section);
        }
    }

    /// Set the section from a DOM key; unknown keys resolve to index 0.
    pub fn set_section_key(&mut self, key: &str) {
        self.set_section(Section::from_key(key));
    }

    pub fn set_scroll_progress(&mut self, value: f32) {
        if let Some(v) = unit(value) {
            self.mirror.scroll_progress = v;
            self.update(StateField::ScrollProgress, v);
        }
    }

    pub fn set_section_progress(&mut self, value: f32) {
        if let Some(v) = unit(value) {
            self.mirror.section_progress = v;
            self.update(StateField::SectionProgress, v);
        }
    }

    pub fn set_scroll_velocity(&mut self, value: f32) {
        if let Some(v) = unit(value) {
            self.mirror.scroll_velocity = v;
            self.update(StateField::ScrollVelocity, v);
        }
    }

    pub fn set_transition_progress(&mut self, value: f32) {
        if let Some(v) = unit(value) {
            self.mirror.transition_progress = v;
            self.update(StateField::TransitionProgress, v);
        }
    }

    pub fn set_calm_factor(&mut self, value: f32) {
        if value.is_finite() {
            let v = value.clamp(0.0, CALM_MAX);
            self.mirror.calm_factor = v;
            self.update(StateField::CalmFactor, v);
        }
    }

    pub fn set_cursor_position(&mut self, pos: Vec2) {
        if !pos.is_finite() {
            return;
        }
        self.mirror.cursor_position = pos;
        if self.state.cursor_position != pos {
            self.state.cursor_position = pos;
            self.notify(StateField::CursorPosition);
        }
    }

    /// Publish (or clear) the velocity-field texture. Render-only, no UI
    /// notification.
    pub fn publish_velocity_field(&mut self, handle: Option<FieldHandle>) {
        self.mirror.velocity_field = handle;
    }

    fn update(&mut self, field: StateField, v: f32) {
        let slot = match field {
            StateField::ScrollProgress => &mut self.state.scroll_progress,
            StateField::SectionProgress => &mut self.state.section_progress,
            StateField::ScrollVelocity => &mut self.state.scroll_velocity,
            StateField::TransitionProgress => &mut self.state.transition_progress,
            StateField::CalmFactor => &mut self.state.calm_factor,
            StateField::Section | StateField::CursorPosition => return,
        };
        if *slot != v {
            *slot = v;
            self.notify(field);
        }
    }

    fn notify(&mut self, field: StateField) {
        let snapshot = self.state;
        for (_, listener) in self.listeners.iter_mut() {
            listener(field, &snapshot);
        }
    }
}

#[inline]
fn unit(value: f32) -> Option<f32> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn setters_mirror_in_the_same_call() {
        let mut store = AnimationStore::new();
        store.set_scroll_progress(0.4);
        store.set_calm_factor(0.3);
        store.set_section(Section::Skills);
        store.set_cursor_position(Vec2::new(1.0, -2.0));
        let u = store.uniforms();
        assert_eq!(u.scroll_progress, store.scroll_progress());
        assert_eq!(u.calm_factor, store.calm_factor());
        assert_eq!(u.section_index, 2.0);
        assert_eq!(u.cursor_position, store.cursor_position());
    }

    #[test]
    fn setting_one_field_leaves_others_alone() {
        let mut store = AnimationStore::new();
        store.set_section_progress(0.6);
        store.set_scroll_velocity(0.2);
        let before = store.snapshot();
        store.set_transition_progress(0.5);
        let after = store.snapshot();
        assert_eq!(before.section_progress, after.section_progress);
        assert_eq!(before.scroll_velocity, after.scroll_velocity);
        assert!(after.is_transitioning());
    }

    #[test]
    fn values_are_clamped_and_nan_ignored() {
        let mut store = AnimationStore::new();
        store.set_calm_factor(3.0);
        assert_eq!(store.calm_factor(), CALM_MAX);
        store.set_scroll_progress(-1.0);
        assert_eq!(store.scroll_progress(), 0.0);
        store.set_scroll_progress(0.3);
        store.set_scroll_progress(f32::NAN);
        assert_eq!(store.scroll_progress(), 0.3);
    }

    #[test]
    fn listeners_hear_only_real_changes() {
        let mut store = AnimationStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(move |field, _| sink.borrow_mut().push(field));
        store.set_scroll_progress(0.5);
        store.set_scroll_progress(0.5);
        store.set_section_key("about");
        store.set_section_key("about");
        assert_eq!(
            *seen.borrow(),
            vec![StateField::ScrollProgress, StateField::Section]
        );
        assert!(store.unsubscribe(id));
        store.set_scroll_progress(0.7);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn velocity_field_handle_is_render_only() {
        let mut store = AnimationStore::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        store.subscribe(move |_, _| *c.borrow_mut() += 1);
        store.publish_velocity_field(Some(FieldHandle(3)));
        assert_eq!(store.uniforms().velocity_field, Some(FieldHandle(3)));
        assert_eq!(*count.borrow(), 0);
    }
}
