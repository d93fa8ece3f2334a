// src/infrastructure/util.rs
use crate::application::ports::util::SlugGenerator;
use slug::slugify;

/// Keeps ASCII letters, digits, hyphens and whitespace from the lowercased
/// input, then lets `slug` turn whitespace into single hyphens and trim the ends.
#[derive(Default, Clone)]
pub struct DefaultSlugGenerator;

impl SlugGenerator for DefaultSlugGenerator {
    fn slugify(&self, input: &str) -> String {
        let kept: String = input
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || c.is_whitespace())
            .collect();
        slugify(kept)
    }
}
