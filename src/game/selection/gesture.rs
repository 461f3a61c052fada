use bevy::prelude::*;

use super::spatial::SelectionRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
}

/// Click vs. drag-box recognition. Owns the live selection rectangle.
#[derive(Debug, Clone, Default)]
pub struct SelectionGesture {
    state: GestureState,
    anchor: Vec2,
    pointer: Vec2,
    rect: SelectionRect,
    rect_visible: bool,
}

impl SelectionGesture {
    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == GestureState::Dragging
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Last pointer position seen by `begin` or `track`
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn rect(&self) -> SelectionRect {
        self.rect
    }

    pub fn is_rect_visible(&self) -> bool {
        self.rect_visible
    }

    /// Idle -> Dragging. Shows the rectangle anchored at `pointer` (degenerate
    /// until the pointer moves). Returns false if a gesture is already running.
    pub fn begin(&mut self, pointer: Vec2) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.rect_visible = true;
        self.anchor = pointer;
        self.recompute(pointer);
        self.state = GestureState::Dragging;
        true
    }

    /// Follows the pointer while dragging; ignored when idle.
    pub fn track(&mut self, pointer: Vec2) {
        if !self.is_dragging() {
            return;
        }
        self.recompute(pointer);
    }

    /// Dragging -> Idle. Hides the rectangle and hands back its final shape.
    pub fn finish(&mut self) -> Option<SelectionRect> {
        if !self.is_dragging() {
            return None;
        }
        self.rect_visible = false;
        self.state = GestureState::Idle;
        Some(self.rect)
    }

    /// Dragging -> Idle without producing a rectangle.
    pub fn cancel(&mut self) {
        self.rect_visible = false;
        self.state = GestureState::Idle;
    }

    fn recompute(&mut self, pointer: Vec2) {
        self.pointer = pointer;
        self.rect = SelectionRect::from_corners(self.anchor, pointer);
    }
}
