//! Scroll-wheel value picker. The host owns the selected index; the picker
//! owns a continuous scroll position and reports index changes from its
//! gesture methods.

use tracing::{debug, trace};

use crate::error::PickerError;

/// Reference height of one item, in the same units as drag deltas.
pub const DEFAULT_ITEM_HEIGHT: f64 = 48.0;

const SCALE_STEP: f64 = 0.15;
const OPACITY_STEP: f64 = 0.3;

/// Lifecycle of a picker with respect to pointer gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPhase {
    Idle,
    Dragging,
}

/// Transient state of one pointer-down .. pointer-up gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    anchor: f64,
    accumulated_delta: f64,
}

impl DragSession {
    fn new(anchor: f64) -> Self {
        Self {
            anchor,
            accumulated_delta: 0.0,
        }
    }

    /// Scroll position the gesture started from.
    pub fn anchor(&self) -> f64 {
        self.anchor
    }

    /// Sum of all vertical displacements seen so far.
    pub fn accumulated_delta(&self) -> f64 {
        self.accumulated_delta
    }
}

/// One row of the wheel as it should be drawn.
#[derive(Debug, Clone)]
pub struct VisibleSlot<'a, T> {
    /// Distance from the selected row, negative above.
    pub offset: isize,
    pub index: usize,
    pub item: &'a T,
    pub is_selected: bool,
    pub scale: f64,
    pub opacity: f64,
    /// Vertical offset from the wheel center, in item-height units scaled by
    /// the picker's item height. Includes the fractional drag position.
    pub y_offset: f64,
}

#[derive(Debug, Clone)]
pub struct ValuePicker<T> {
    items: Vec<T>,
    selected: usize,
    visible_count: usize,
    frozen: bool,
    item_height: f64,
    scroll_position: f64,
    drag: Option<DragSession>,
}

impl<T> ValuePicker<T> {
    /// Build a picker over `items` showing `selected`.
    ///
    /// Fails for an empty domain, an even (or zero) `visible_count`, or a
    /// `selected` index outside the domain.
    pub fn new(
        items: impl Into<Vec<T>>,
        selected: usize,
        visible_count: usize,
    ) -> Result<Self, PickerError> {
        let items = items.into();
        if items.is_empty() {
            return Err(PickerError::EmptyDomain);
        }
        if visible_count % 2 == 0 {
            return Err(PickerError::InvalidVisibleCount {
                count: visible_count,
            });
        }
        if selected >= items.len() {
            return Err(PickerError::SelectedOutOfRange {
                index: selected,
                len: items.len(),
            });
        }

        Ok(Self {
            items,
            selected,
            visible_count,
            frozen: false,
            item_height: DEFAULT_ITEM_HEIGHT,
            scroll_position: selected as f64,
            drag: None,
        })
    }

    pub fn with_item_height(mut self, item_height: f64) -> Result<Self, PickerError> {
        if !item_height.is_finite() || item_height <= 0.0 {
            return Err(PickerError::InvalidItemHeight {
                height: item_height,
            });
        }
        self.item_height = item_height;
        Ok(self)
    }

    pub fn with_frozen(mut self, frozen: bool) -> Self {
        self.set_frozen(frozen);
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: construction rejects empty domains.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The host's selected index as last reported to the picker.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> &T {
        &self.items[self.selected]
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn item_height(&self) -> f64 {
        self.item_height
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn phase(&self) -> PickerPhase {
        if self.drag.is_some() {
            PickerPhase::Dragging
        } else {
            PickerPhase::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Continuous position, always within `0..=len-1`.
    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    /// Index nearest to the current scroll position.
    pub fn resolved_index(&self) -> usize {
        self.scroll_position.round().clamp(0.0, self.max_position()) as usize
    }

    fn max_position(&self) -> f64 {
        (self.items.len() - 1) as f64
    }

    /// Report the host's selected index.
    ///
    /// When idle and the index changed, the wheel jumps to it. During a drag
    /// only the comparison baseline is updated.
    pub fn set_selected(&mut self, index: usize) -> Result<(), PickerError> {
        if index >= self.items.len() {
            return Err(PickerError::SelectedOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        if index == self.selected {
            return Ok(());
        }

        self.selected = index;
        if self.drag.is_none() {
            self.scroll_position = index as f64;
            trace!(index, "picker reconciled with host selection");
        }
        Ok(())
    }

    /// Freezing while a drag is active cancels it without emitting.
    pub fn set_frozen(&mut self, frozen: bool) {
        if frozen && self.drag.is_some() {
            self.cancel_drag();
        }
        self.frozen = frozen;
    }

    /// Pointer down. Returns false when the gesture is ignored, either
    /// because the picker is frozen or a gesture is already in progress.
    pub fn begin_drag(&mut self) -> bool {
        if self.frozen {
            trace!("drag ignored, picker is frozen");
            return false;
        }
        if self.drag.is_some() {
            return false;
        }

        self.drag = Some(DragSession::new(self.scroll_position));
        debug!(position = self.scroll_position, "drag started");
        true
    }

    /// Pointer move by `dy` units since the previous move. Positive `dy`
    /// (downward) moves toward earlier items.
    ///
    /// Returns the live-preview index when it differs from the host's
    /// selection.
    ///
    /// The position is measured from the gesture's anchor, so travel past
    /// either end has to be dragged back before the wheel moves again.
    pub fn drag_by(&mut self, dy: f64) -> Option<usize> {
        if !dy.is_finite() {
            return None;
        }
        let max = self.max_position();
        let item_height = self.item_height;
        let session = self.drag.as_mut()?;

        session.accumulated_delta += dy;
        self.scroll_position =
            (session.anchor - session.accumulated_delta / item_height).clamp(0.0, max);

        let resolved = self.resolved_index();
        trace!(position = self.scroll_position, resolved, "drag moved");
        (resolved != self.selected).then_some(resolved)
    }

    /// Pointer up. Snaps to the nearest index and always returns it, even
    /// when it equals the current selection.
    pub fn end_drag(&mut self) -> Option<usize> {
        self.drag.take()?;
        self.scroll_position = self.scroll_position.round();
        let resolved = self.resolved_index();
        debug!(resolved, "drag ended");
        Some(resolved)
    }

    /// Gesture lost (capture lost, focus lost). Snaps without emitting.
    /// Returns whether a drag was active.
    pub fn cancel_drag(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.scroll_position = self.scroll_position.round();
        debug!(position = self.scroll_position, "drag cancelled");
        true
    }

    /// Rows to draw around the selected index, nearest first in offset order.
    pub fn visible_slots(&self) -> Vec<VisibleSlot<'_, T>> {
        let half = (self.visible_count / 2) as isize;
        let fraction = self.scroll_position - self.selected as f64;

        (-half..=half)
            .filter_map(|offset| {
                let index = self.selected as isize + offset;
                if index < 0 || index as usize >= self.items.len() {
                    return None;
                }
                let index = index as usize;
                let distance = offset.unsigned_abs() as f64;

                Some(VisibleSlot {
                    offset,
                    index,
                    item: &self.items[index],
                    is_selected: offset == 0,
                    scale: (1.0 - SCALE_STEP * distance).max(0.0),
                    opacity: (1.0 - OPACITY_STEP * distance).max(0.0),
                    y_offset: (offset as f64 - fraction) * self.item_height,
                })
            })
            .collect()
    }

    /// Apply the caller's `render(item, is_selected)` to every visible slot.
    pub fn render<V>(
        &self,
        mut render: impl FnMut(&T, bool) -> V,
    ) -> Vec<(VisibleSlot<'_, T>, V)> {
        self.visible_slots()
            .into_iter()
            .map(|slot| {
                let visual = render(slot.item, slot.is_selected);
                (slot, visual)
            })
            .collect()
    }
}
