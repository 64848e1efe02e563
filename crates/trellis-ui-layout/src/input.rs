//! Pointer input delivered to tagged pointer areas.

use std::cell::RefCell;

use trellis_core::collections::map::HashMap;
use trellis_ui_graphics::{CallOp, FlatOp, IntRect, Point, Tag};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Release,
    Move,
    /// The pointer was released outside the area that received the press.
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Point) -> Self {
        Self { kind, position }
    }
}

/// Supplies events routed to a pointer area.
pub trait InputSource {
    /// Drains the events routed to `tag`.
    fn events(&self, tag: Tag) -> Vec<PointerEvent>;

    /// Called with the layout recording before the pointer phase.
    fn route(&self, _layout: &CallOp) {}

    /// Called once the frame has been drawn.
    fn end_frame(&self) {}
}

/// Source without any input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn events(&self, _tag: Tag) -> Vec<PointerEvent> {
        Vec::new()
    }
}

/// Queue of raw pointer events, routed to areas found in a layout recording.
///
/// Each event goes to the topmost area containing it. A release goes to the
/// area that received the press; if the pointer left that area the press is
/// cancelled instead.
#[derive(Debug, Default)]
pub struct PointerQueue {
    pending: RefCell<Vec<PointerEvent>>,
    routed: RefCell<HashMap<Tag, Vec<PointerEvent>>>,
    pressed: RefCell<Option<Tag>>,
}

impl PointerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, event: PointerEvent) {
        self.pending.borrow_mut().push(event);
    }

    pub fn press(&self, position: Point) {
        self.queue(PointerEvent::new(PointerKind::Press, position));
    }

    pub fn release(&self, position: Point) {
        self.queue(PointerEvent::new(PointerKind::Release, position));
    }

    /// Press followed by release at the same position.
    pub fn click(&self, position: Point) {
        self.press(position);
        self.release(position);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Routes pending events against the pointer areas recorded in `layout`.
    pub fn route(&self, layout: &CallOp) {
        let areas: Vec<(IntRect, Tag)> = layout
            .flatten()
            .into_iter()
            .filter_map(|op| match op {
                FlatOp::PointerArea { rect, tag } => Some((rect, tag)),
                _ => None,
            })
            .collect();
        self.route_areas(&areas);
    }

    /// Routes pending events; later areas are on top of earlier ones.
    pub fn route_areas(&self, areas: &[(IntRect, Tag)]) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        let mut routed = self.routed.borrow_mut();
        let mut pressed = self.pressed.borrow_mut();
        for event in pending {
            let hit = areas
                .iter()
                .rev()
                .find(|(rect, _)| rect.contains(event.position))
                .map(|(_, tag)| *tag);
            match event.kind {
                PointerKind::Press => {
                    if let Some(tag) = hit {
                        routed.entry(tag).or_default().push(event);
                        *pressed = Some(tag);
                    }
                }
                PointerKind::Release | PointerKind::Cancel => {
                    if let Some(target) = pressed.take() {
                        let kind = if hit == Some(target) && event.kind == PointerKind::Release {
                            PointerKind::Release
                        } else {
                            PointerKind::Cancel
                        };
                        routed
                            .entry(target)
                            .or_default()
                            .push(PointerEvent::new(kind, event.position));
                    }
                }
                PointerKind::Move => {
                    if let Some(tag) = (*pressed).or(hit) {
                        routed.entry(tag).or_default().push(event);
                    }
                }
            }
        }
    }

    /// Drops routed events nobody consumed.
    pub fn clear_routed(&self) {
        let mut routed = self.routed.borrow_mut();
        if !routed.is_empty() {
            log::debug!("dropping pointer events for {} unconsumed areas", routed.len());
            routed.clear();
        }
    }
}

impl InputSource for PointerQueue {
    fn events(&self, tag: Tag) -> Vec<PointerEvent> {
        self.routed.borrow_mut().remove(&tag).unwrap_or_default()
    }

    fn route(&self, layout: &CallOp) {
        PointerQueue::route(self, layout);
    }

    fn end_frame(&self) {
        self.clear_routed();
    }
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
