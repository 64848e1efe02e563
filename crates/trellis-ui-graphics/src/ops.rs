//! Recorded draw operations.
//!
//! Widgets append [`DrawOp`]s to an [`Ops`] list while they lay out. A
//! [`Macro`] started with [`Ops::record`] captures everything appended until
//! [`Macro::stop`], returning an immutable [`CallOp`] that can be replayed
//! any number of times, possibly under a transform. Backends consume the
//! final list, usually through [`CallOp::flatten`].

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::color::Color;
use crate::geometry::{IntPoint, IntRect};

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a pointer area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag(u64);

impl Tag {
    pub fn next() -> Self {
        Self(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    PushTransform(IntPoint),
    PopTransform,
    PushClip(IntRect),
    PopClip,
    PushOpacity(f32),
    PopOpacity,
    FillRect {
        rect: IntRect,
        color: Color,
    },
    Text {
        rect: IntRect,
        text: String,
        size_px: f32,
        color: Color,
    },
    PointerArea {
        rect: IntRect,
        tag: Tag,
    },
    Call(CallOp),
}

/// An immutable recording of ops.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallOp {
    ops: Rc<[DrawOp]>,
}

impl CallOp {
    /// Appends a replay of this recording to `ops`.
    pub fn add(&self, ops: &mut Ops) {
        if !self.ops.is_empty() {
            ops.push(DrawOp::Call(self.clone()));
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Resolves transforms, clips, opacity and nested calls into absolute
    /// primitives in paint order.
    pub fn flatten(&self) -> Vec<FlatOp> {
        let mut state = FlattenState::default();
        state.visit(&self.ops);
        state.out
    }
}

/// A primitive in absolute coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum FlatOp {
    Rect {
        rect: IntRect,
        color: Color,
    },
    Text {
        rect: IntRect,
        text: String,
        size_px: f32,
        color: Color,
    },
    PointerArea {
        rect: IntRect,
        tag: Tag,
    },
}

#[derive(Default)]
struct FlattenState {
    offset: IntPoint,
    offsets: Vec<IntPoint>,
    clips: Vec<IntRect>,
    opacity: Vec<f32>,
    out: Vec<FlatOp>,
}

impl FlattenState {
    fn alpha(&self) -> f32 {
        self.opacity.iter().product()
    }

    fn clip(&self, rect: IntRect) -> IntRect {
        self.clips
            .last()
            .map_or(rect, |clip| rect.intersect(clip))
    }

    fn visit(&mut self, ops: &[DrawOp]) {
        for op in ops {
            match op {
                DrawOp::PushTransform(by) => {
                    self.offsets.push(self.offset);
                    self.offset += *by;
                }
                DrawOp::PopTransform => {
                    self.offset = self.offsets.pop().unwrap_or_default();
                }
                DrawOp::PushClip(rect) => {
                    let clip = self.clip(rect.translate(self.offset));
                    self.clips.push(clip);
                }
                DrawOp::PopClip => {
                    self.clips.pop();
                }
                DrawOp::PushOpacity(alpha) => self.opacity.push(*alpha),
                DrawOp::PopOpacity => {
                    self.opacity.pop();
                }
                DrawOp::FillRect { rect, color } => {
                    let rect = self.clip(rect.translate(self.offset));
                    if !rect.is_empty() {
                        let color = color.with_alpha(color.a() * self.alpha());
                        self.out.push(FlatOp::Rect { rect, color });
                    }
                }
                DrawOp::Text {
                    rect,
                    text,
                    size_px,
                    color,
                } => {
                    let rect = rect.translate(self.offset);
                    if !self.clip(rect).is_empty() {
                        self.out.push(FlatOp::Text {
                            rect,
                            text: text.clone(),
                            size_px: *size_px,
                            color: color.with_alpha(color.a() * self.alpha()),
                        });
                    }
                }
                DrawOp::PointerArea { rect, tag } => {
                    let rect = self.clip(rect.translate(self.offset));
                    if !rect.is_empty() {
                        self.out.push(FlatOp::PointerArea { rect, tag: *tag });
                    }
                }
                DrawOp::Call(call) => {
                    // Nested recordings restore the stacks they push.
                    let (offsets, clips, opacity) =
                        (self.offsets.len(), self.clips.len(), self.opacity.len());
                    let offset = self.offset;
                    self.visit(call.ops());
                    self.offsets.truncate(offsets);
                    self.clips.truncate(clips);
                    self.opacity.truncate(opacity);
                    self.offset = offset;
                }
            }
        }
    }
}

/// Mutable op list with macro recording.
#[derive(Debug, Default)]
pub struct Ops {
    list: Vec<DrawOp>,
    open: Vec<usize>,
}

impl Ops {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: DrawOp) {
        self.list.push(op);
    }

    /// Starts capturing subsequently appended ops.
    pub fn record(&mut self) -> Macro {
        let start = self.list.len();
        self.open.push(start);
        Macro { start }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.list
    }

    /// Number of macros still recording.
    pub fn open_macros(&self) -> usize {
        self.open.len()
    }

    pub fn reset(&mut self) {
        self.list.clear();
        self.open.clear();
    }

    /// Converts the whole list into a recording.
    pub fn into_call(self) -> CallOp {
        CallOp {
            ops: self.list.into(),
        }
    }

    pub fn push_transform(&mut self, offset: IntPoint) {
        self.push(DrawOp::PushTransform(offset));
    }

    pub fn pop_transform(&mut self) {
        self.push(DrawOp::PopTransform);
    }

    pub fn push_clip(&mut self, rect: IntRect) {
        self.push(DrawOp::PushClip(rect));
    }

    pub fn pop_clip(&mut self) {
        self.push(DrawOp::PopClip);
    }

    pub fn push_opacity(&mut self, alpha: f32) {
        self.push(DrawOp::PushOpacity(alpha));
    }

    pub fn pop_opacity(&mut self) {
        self.push(DrawOp::PopOpacity);
    }

    pub fn fill_rect(&mut self, rect: IntRect, color: Color) {
        self.push(DrawOp::FillRect { rect, color });
    }

    pub fn pointer_area(&mut self, rect: IntRect, tag: Tag) {
        self.push(DrawOp::PointerArea { rect, tag });
    }

    /// Replays `call` translated by `offset`.
    pub fn add_at(&mut self, call: &CallOp, offset: IntPoint) {
        if call.is_empty() {
            return;
        }
        if offset == IntPoint::ZERO {
            call.add(self);
        } else {
            self.push_transform(offset);
            call.add(self);
            self.pop_transform();
        }
    }
}

/// An in-progress recording.
#[must_use = "a macro must be stopped"]
#[derive(Debug)]
pub struct Macro {
    start: usize,
}

impl Macro {
    /// Ends the recording, removing the captured ops from `ops`.
    ///
    /// # Panics
    /// Panics when macros are not stopped in reverse order of recording.
    pub fn stop(self, ops: &mut Ops) -> CallOp {
        let innermost = ops.open.pop();
        assert_eq!(
            innermost,
            Some(self.start),
            "macros must be stopped in reverse order of recording"
        );
        let recorded = ops.list.split_off(self.start);
        CallOp {
            ops: recorded.into(),
        }
    }
}

#[cfg(test)]
#[path = "tests/ops_tests.rs"]
mod tests;
