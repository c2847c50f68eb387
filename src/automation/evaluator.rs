use std::path::Path;

use image::GrayImage;

use crate::automation::actions::ActionExecutor;
use crate::automation::interaction::PointerDevice;
use crate::automation::matcher::{ImageMatcher, MatchResult};
use crate::config::Task;

/// Check whether every icon in the group matches the capture.
///
/// Icons are evaluated in order and the first miss fails the group without
/// touching the icons after it. On success the returned result is the LAST
/// icon's: the group's final icon anchors the action coordinate.
pub fn evaluate_icon_group(
    matcher: &mut ImageMatcher,
    capture: &GrayImage,
    group: &[String],
    resource_root: &Path,
) -> Option<MatchResult> {
    let mut target = None;
    for icon in group {
        let icon_path = resource_root.join(icon);
        let result = matcher.match_template_from_file(capture, &icon_path);
        if !result.matched {
            log::debug!("Not matched: {} (confidence {:.3})", icon, result.confidence);
            return None;
        }
        log::info!("Matched: {} (confidence {:.3})", icon, result.confidence);
        target = Some(result);
    }
    // None only for an empty group
    target
}

/// Evaluate one task against a single capture. The first fully-matched icon
/// group dispatches the task's actions and ends the scan; groups after it
/// are fallbacks that only run while nothing has matched.
pub fn evaluate_task<P: PointerDevice>(
    matcher: &mut ImageMatcher,
    executor: &mut ActionExecutor<P>,
    task: &Task,
    capture: &GrayImage,
    window_rect: (i32, i32, i32, i32),
    resource_root: &Path,
) -> bool {
    for group in &task.icon_groups {
        if let Some(result) = evaluate_icon_group(matcher, capture, group, resource_root) {
            log::info!("All icons matched in group: {:?}", group);
            executor.execute_sequence(&task.actions, &result, window_rect);
            return true;
        }
    }
    false
}
