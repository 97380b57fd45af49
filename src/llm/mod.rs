//! LLM provider seam.
//!
//! The engine talks to the external planning / generic-capability service
//! through the [`Provider`] trait so it can be tested with deterministic
//! stubs instead of a live model dependency.

mod compatible;
mod traits;

pub use compatible::OpenAiCompatProvider;
pub use traits::Provider;

/// Strip markdown code fences from model output.
///
/// Models routinely wrap strict-JSON answers in ```` ```json ```` fences even
/// when told not to; the engine tolerates that before parsing.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut out = String::with_capacity(trimmed.len());
    for line in trimmed.lines() {
        let fence = line.trim_start();
        if fence.starts_with("```") {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }
    out.trim().to_string()
}
