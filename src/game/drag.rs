use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragResult {
    pub is_dragging: bool,
    /// Pointer movement since the previous frame, zero unless dragging.
    pub delta: Vec2,
}

/// Pointer movement to apply to the window for a single frame.
pub fn drag_delta(current: Vec2, previous: Vec2, is_drag_gesture: bool) -> DragResult {
    if is_drag_gesture {
        DragResult {
            is_dragging: true,
            delta: current - previous,
        }
    } else {
        DragResult::default()
    }
}

/// Remembers the pointer position between frames so the window can follow the pointer while the
/// primary button is held on it.
///
/// There is no hysteresis: the gesture predicate is re-evaluated every frame.
#[derive(Default)]
pub struct DragController {
    last_pointer: Option<Vec2>,
}

impl DragController {
    /// `pointer` is in screen coordinates, `None` when unknown.
    pub fn update(&mut self, pointer: Option<Vec2>, is_drag_gesture: bool) -> DragResult {
        let current = pointer.or(self.last_pointer);
        let previous = self.last_pointer.or(current);
        self.last_pointer = current;

        match (current, previous) {
            (Some(current), Some(previous)) => drag_delta(current, previous, is_drag_gesture),
            // No pointer seen yet, still report the gesture so the clock pauses.
            _ => DragResult {
                is_dragging: is_drag_gesture,
                delta: Vec2::ZERO,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_delta_only_while_dragging() {
        let current = Vec2::new(10.0, 5.0);
        let previous = Vec2::new(7.0, 9.0);

        assert_eq!(
            drag_delta(current, previous, true),
            DragResult {
                is_dragging: true,
                delta: Vec2::new(3.0, -4.0),
            }
        );
        assert_eq!(
            drag_delta(current, previous, false),
            DragResult {
                is_dragging: false,
                delta: Vec2::ZERO,
            }
        );
    }

    #[test]
    fn tracks_pointer_between_frames() {
        let mut drag = DragController::default();

        // The first sample has nothing to compare against.
        let result = drag.update(Some(Vec2::new(10.0, 10.0)), true);
        assert!(result.is_dragging);
        assert_eq!(result.delta, Vec2::ZERO);

        let result = drag.update(Some(Vec2::new(12.0, 13.0)), true);
        assert_eq!(result.delta, Vec2::new(2.0, 3.0));

        let result = drag.update(Some(Vec2::new(11.0, 13.0)), true);
        assert_eq!(result.delta, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn pointer_is_tracked_while_idle() {
        let mut drag = DragController::default();
        drag.update(Some(Vec2::new(0.0, 0.0)), false);
        drag.update(Some(Vec2::new(50.0, 50.0)), false);

        // Only the movement since the last frame counts once the gesture starts.
        let result = drag.update(Some(Vec2::new(52.0, 50.0)), true);
        assert_eq!(result.delta, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn gesture_toggles_without_debounce() {
        let mut drag = DragController::default();
        drag.update(Some(Vec2::ZERO), true);

        assert!(!drag.update(Some(Vec2::new(1.0, 0.0)), false).is_dragging);
        assert!(drag.update(Some(Vec2::new(2.0, 0.0)), true).is_dragging);
        assert!(!drag.update(Some(Vec2::new(3.0, 0.0)), false).is_dragging);
    }

    #[test]
    fn missing_pointer_does_not_move_the_window() {
        let mut drag = DragController::default();
        let result = drag.update(None, true);
        assert_eq!(
            result,
            DragResult {
                is_dragging: true,
                delta: Vec2::ZERO,
            }
        );

        drag.update(Some(Vec2::new(5.0, 5.0)), true);
        let result = drag.update(None, true);
        assert_eq!(result.delta, Vec2::ZERO);
    }
}
