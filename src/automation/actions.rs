use crate::automation::interaction::{delay_ms, PointerDevice};
use crate::automation::matcher::MatchResult;
use crate::config::Action;

/// Resolve a match location plus a per-action offset into an absolute
/// screen coordinate. `window_rect` is (left, top, right, bottom).
///
/// Without a match location the sentinel (0, 0) comes back; callers only
/// resolve after a confirmed match, so the sentinel is never clicked.
pub fn resolve_position(
    result: &MatchResult,
    window_rect: (i32, i32, i32, i32),
    offset_x: i32,
    offset_y: i32,
) -> (i32, i32) {
    let Some((match_x, match_y)) = result.location else {
        return (0, 0);
    };
    let (left, top, _, _) = window_rect;
    (left + match_x as i32 + offset_x, top + match_y as i32 + offset_y)
}

/// Runs configured action sequences against a resolved match position.
pub struct ActionExecutor<P: PointerDevice> {
    pub pointer: P,
}

impl<P: PointerDevice> ActionExecutor<P> {
    pub fn new(pointer: P) -> Self {
        Self { pointer }
    }

    fn execute_action(
        &mut self,
        action: &Action,
        result: &MatchResult,
        window_rect: (i32, i32, i32, i32),
    ) -> bool {
        match action {
            Action::Move { offset_x, offset_y } => {
                let (x, y) = resolve_position(result, window_rect, *offset_x, *offset_y);
                if !self.pointer.move_to(x, y) {
                    log::warn!("Failed to move mouse to ({}, {})", x, y);
                    return false;
                }
                log::debug!("Moved mouse to ({}, {})", x, y);
                true
            }
            Action::Click {
                offset_x,
                offset_y,
                button,
            } => {
                let (x, y) = resolve_position(result, window_rect, *offset_x, *offset_y);
                if !self.pointer.click(x, y, *button) {
                    log::warn!("Failed to {:?}-click at ({}, {})", button, x, y);
                    return false;
                }
                log::debug!("{:?} click at ({}, {})", button, x, y);
                true
            }
            Action::Delay { milliseconds } => {
                delay_ms(*milliseconds);
                true
            }
        }
    }

    /// Run the actions in declared order, all against the same match
    /// result. The first failing action aborts the rest of the sequence;
    /// later tasks and cycles are unaffected.
    pub fn execute_sequence(
        &mut self,
        actions: &[Action],
        result: &MatchResult,
        window_rect: (i32, i32, i32, i32),
    ) -> bool {
        for action in actions {
            if !self.execute_action(action, result, window_rect) {
                log::warn!("Action failed, aborting remaining actions in sequence");
                return false;
            }
        }
        log::info!("Executed {} actions", actions.len());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MouseButton;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct FakePointer {
        moves: Vec<(i32, i32)>,
        clicks: Vec<(i32, i32, MouseButton)>,
        fail_clicks: bool,
    }

    impl PointerDevice for FakePointer {
        fn move_to(&mut self, x: i32, y: i32) -> bool {
            self.moves.push((x, y));
            true
        }

        fn click(&mut self, x: i32, y: i32, button: MouseButton) -> bool {
            self.clicks.push((x, y, button));
            !self.fail_clicks
        }
    }

    fn matched_at(x: u32, y: u32) -> MatchResult {
        MatchResult {
            matched: true,
            confidence: 0.95,
            location: Some((x, y)),
            template_size: Some((8, 8)),
        }
    }

    fn unmatched() -> MatchResult {
        MatchResult {
            matched: false,
            confidence: 0.0,
            location: None,
            template_size: None,
        }
    }

    const RECT: (i32, i32, i32, i32) = (100, 200, 500, 600);

    #[test]
    fn resolve_applies_window_origin_and_offset() {
        let pos = resolve_position(&matched_at(10, 20), RECT, 5, -5);
        assert_eq!(pos, (115, 215));
    }

    #[test]
    fn resolve_without_location_returns_sentinel() {
        assert_eq!(resolve_position(&unmatched(), RECT, 5, -5), (0, 0));
        assert_eq!(resolve_position(&unmatched(), RECT, 0, 0), (0, 0));
    }

    #[test]
    fn sequence_executes_in_declared_order() {
        let mut executor = ActionExecutor::new(FakePointer::default());
        let actions = vec![
            Action::Move {
                offset_x: 0,
                offset_y: 0,
            },
            Action::Click {
                offset_x: 1,
                offset_y: 1,
                button: MouseButton::Right,
            },
            Action::Click {
                offset_x: 2,
                offset_y: 2,
                button: MouseButton::Left,
            },
        ];
        assert!(executor.execute_sequence(&actions, &matched_at(10, 20), RECT));
        assert_eq!(executor.pointer.moves, vec![(110, 220)]);
        assert_eq!(
            executor.pointer.clicks,
            vec![
                (111, 221, MouseButton::Right),
                (112, 222, MouseButton::Left)
            ]
        );
    }

    #[test]
    fn failing_click_aborts_the_remaining_sequence() {
        let mut executor = ActionExecutor::new(FakePointer {
            fail_clicks: true,
            ..Default::default()
        });
        let actions = vec![
            Action::Move {
                offset_x: 0,
                offset_y: 0,
            },
            Action::Click {
                offset_x: 0,
                offset_y: 0,
                button: MouseButton::Left,
            },
            Action::Delay { milliseconds: 2000 },
            Action::Click {
                offset_x: 0,
                offset_y: 0,
                button: MouseButton::Left,
            },
        ];

        let start = Instant::now();
        assert!(!executor.execute_sequence(&actions, &matched_at(10, 20), RECT));

        // Move ran, the failing click was attempted once, and neither the
        // delay nor the second click was reached.
        assert_eq!(executor.pointer.moves.len(), 1);
        assert_eq!(executor.pointer.clicks.len(), 1);
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn empty_sequence_succeeds() {
        let mut executor = ActionExecutor::new(FakePointer::default());
        assert!(executor.execute_sequence(&[], &matched_at(0, 0), RECT));
        assert!(executor.pointer.moves.is_empty());
        assert!(executor.pointer.clicks.is_empty());
    }
}
