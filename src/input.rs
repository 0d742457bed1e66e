//! Pointer state fed into the simulation from the host.
//!
//! The host reports pointer moves and exits whenever they happen; the
//! simulator reads the state once at the start of each frame so every
//! force in that frame sees the same pointer.

use glam::Vec2;

/// Current pointer position plus movement accumulated since the last frame.
#[derive(Clone, Debug, Default)]
pub struct Pointer {
    position: Option<Vec2>,
    delta: Vec2,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a pointer move. Deltas accumulate until the next frame reads
    /// them, so several host events between frames sum into one movement.
    pub fn move_to(&mut self, position: Vec2) {
        if let Some(previous) = self.position {
            self.delta += position - previous;
        }
        self.position = Some(position);
    }

    /// Report the pointer leaving the surface.
    pub fn leave(&mut self) {
        self.position = None;
        self.delta = Vec2::ZERO;
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Movement since the previous frame. Resets the accumulator.
    pub(crate) fn take_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_accumulate_into_one_delta() {
        let mut pointer = Pointer::new();
        pointer.move_to(Vec2::new(10.0, 10.0));
        pointer.move_to(Vec2::new(14.0, 10.0));
        pointer.move_to(Vec2::new(14.0, 13.0));
        assert_eq!(pointer.take_delta(), Vec2::new(4.0, 3.0));
        assert_eq!(pointer.take_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_first_move_has_no_delta() {
        let mut pointer = Pointer::new();
        pointer.move_to(Vec2::new(100.0, 50.0));
        assert_eq!(pointer.take_delta(), Vec2::ZERO);
        assert_eq!(pointer.position(), Some(Vec2::new(100.0, 50.0)));
    }

    #[test]
    fn test_leave_clears_position_and_delta() {
        let mut pointer = Pointer::new();
        pointer.move_to(Vec2::new(10.0, 10.0));
        pointer.move_to(Vec2::new(20.0, 10.0));
        pointer.leave();
        assert_eq!(pointer.position(), None);
        assert_eq!(pointer.take_delta(), Vec2::ZERO);
    }
}
