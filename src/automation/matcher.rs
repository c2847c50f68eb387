use image::GrayImage;
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of one template comparison.
///
/// `location` and `template_size` are populated whenever a template was
/// loaded and compared, whether or not it cleared the threshold; a
/// below-threshold comparison still reports its best alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matched: bool,
    pub confidence: f32,
    /// Best-match position, relative to the capture origin.
    pub location: Option<(u32, u32)>,
    pub template_size: Option<(u32, u32)>,
}

impl MatchResult {
    fn no_match() -> Self {
        Self {
            matched: false,
            confidence: 0.0,
            location: None,
            template_size: None,
        }
    }
}

/// Grayscale template matcher with a per-instance decoded-template cache.
///
/// The threshold comes from the process profile and is fixed for the
/// matcher's lifetime; a new session builds a new matcher.
pub struct ImageMatcher {
    threshold: f32,
    cache: HashMap<PathBuf, Arc<GrayImage>>,
}

impl ImageMatcher {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            cache: HashMap::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Load a template image, reduced to grayscale. Decoded templates are
    /// cached by path; repeat calls return the cached image.
    pub fn load_template(&mut self, path: &Path) -> Result<Arc<GrayImage>, String> {
        if let Some(template) = self.cache.get(path) {
            return Ok(Arc::clone(template));
        }
        let template = image::open(path)
            .map_err(|e| format!("Failed to load template {}: {}", path.display(), e))?
            .to_luma8();
        let template = Arc::new(template);
        self.cache.insert(path.to_path_buf(), Arc::clone(&template));
        Ok(template)
    }

    /// Compare a template against a grayscale capture using normalized
    /// cross-correlation and report the best-scoring alignment.
    pub fn match_template(&self, capture: &GrayImage, template: &GrayImage) -> MatchResult {
        let (template_w, template_h) = template.dimensions();
        // A template larger than the capture has no valid alignment.
        if template_w == 0
            || template_h == 0
            || template_w > capture.width()
            || template_h > capture.height()
        {
            return MatchResult::no_match();
        }

        let scores = match_template(
            capture,
            template,
            MatchTemplateMethod::CrossCorrelationNormalized,
        );
        let extremes = find_extremes(&scores);
        let confidence = extremes.max_value.clamp(0.0, 1.0);
        let matched = confidence >= self.threshold;

        log::debug!(
            "Match result: confidence={:.3}, matched={}, location={:?}",
            confidence,
            matched,
            extremes.max_value_location
        );
        MatchResult {
            matched,
            confidence,
            location: Some(extremes.max_value_location),
            template_size: Some((template_w, template_h)),
        }
    }

    /// Load + compare. A load failure only fails this icon: the result is
    /// an unmatched `MatchResult`, never an error across the cycle.
    pub fn match_template_from_file(&mut self, capture: &GrayImage, path: &Path) -> MatchResult {
        match self.load_template(path) {
            Ok(template) => self.match_template(capture, &template),
            Err(e) => {
                log::warn!("{}", e);
                MatchResult::no_match()
            }
        }
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.contains_key(path)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
