use super::{TransitionFrame, TransitionPhase};
use crate::domain::Direction;

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Horizontal offset, in columns, of the page content for `frame`.
///
/// Going forward the old page leaves to the left and the new one arrives
/// from the right; going backward mirrors that.
pub fn slide_offset(frame: &TransitionFrame, width: u16) -> i32 {
    let width = f32::from(width);
    let eased = ease_out_cubic(frame.progress);

    let offset = match (frame.phase, frame.direction) {
        (TransitionPhase::Idle, _) => 0.0,
        (TransitionPhase::Exiting, Direction::Forward) => -eased * width,
        (TransitionPhase::Exiting, Direction::Backward) => eased * width,
        (TransitionPhase::Entering, Direction::Forward) => (1.0 - eased) * width,
        (TransitionPhase::Entering, Direction::Backward) => -(1.0 - eased) * width,
    };

    offset.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(phase: TransitionPhase, direction: Direction, progress: f32) -> TransitionFrame {
        TransitionFrame {
            phase,
            direction,
            progress,
        }
    }

    #[test]
    fn ease_endpoints_are_stable() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(7.0), 1.0);
        assert!(ease_out_cubic(0.25) < ease_out_cubic(0.5));
    }

    #[test]
    fn entry_comes_from_opposite_side_of_exit() {
        let exit = slide_offset(&frame(TransitionPhase::Exiting, Direction::Forward, 1.0), 80);
        let enter = slide_offset(&frame(TransitionPhase::Entering, Direction::Forward, 0.0), 80);
        assert_eq!(exit, -80);
        assert_eq!(enter, 80);

        let exit = slide_offset(&frame(TransitionPhase::Exiting, Direction::Backward, 1.0), 80);
        let enter = slide_offset(&frame(TransitionPhase::Entering, Direction::Backward, 0.0), 80);
        assert_eq!(exit, 80);
        assert_eq!(enter, -80);
    }

    #[test]
    fn settled_frames_have_no_offset() {
        assert_eq!(
            slide_offset(&frame(TransitionPhase::Entering, Direction::Forward, 1.0), 80),
            0
        );
        assert_eq!(
            slide_offset(&frame(TransitionPhase::Idle, Direction::Backward, 0.3), 80),
            0
        );
    }
}
