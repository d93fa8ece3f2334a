// src/application/ports/util.rs
pub trait SlugGenerator: Send + Sync {
    /// URL-safe form of `input`; may be empty when nothing survives.
    fn slugify(&self, input: &str) -> String;
}
