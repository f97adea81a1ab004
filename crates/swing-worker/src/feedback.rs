//! Coaching prompt rendering and generated-text cleanup.

use indexmap::IndexMap;
use swing_models::{PhaseAnalysis, SwingPhase};

/// Feedback when no phase could be analyzed.
pub const NO_ANALYSIS_FEEDBACK: &str = "No swing analysis available.";

/// Feedback when the generation oracle fails.
pub const GENERATION_FAILED_FEEDBACK: &str =
    "Unable to generate detailed feedback at this time. Please try again.";

const PREAMBLE: &str = "\
You are a friendly golf instructor in a one-on-one lesson. Give your student encouraging feedback on their swing, speaking to them directly in a natural, conversational voice.

Open with a warm greeting and point out what they already do well. Be specific about their strengths and how those will help their game.

Then ease into a couple of adjustments. Describe each in plain language with a simple feel cue, and explain how it will improve their ball striking.

Finish with two practice drills. For each drill:
- Say why you picked it and what it fixes
- Walk through the setup and the steps
- Describe what a good rep feels like
- Suggest how to make it easier or harder
- Name the signs of progress to watch for

Here's what I noticed in their swing:

";

const CLOSING: &str = "\nKeep it warm and encouraging, like a chat at the driving range, while giving them every detail they need. Leave them excited to practice.";

/// Render the coaching prompt.
///
/// Phases without strengths or improvements are left out; the rest appear
/// in the order given.
pub fn build_prompt(phases: &IndexMap<SwingPhase, PhaseAnalysis>) -> String {
    let mut prompt = String::from(PREAMBLE);

    for (phase, analysis) in phases {
        if !analysis.has_findings() {
            continue;
        }
        prompt.push_str(phase.label());
        prompt.push_str(":\n");
        if !analysis.strengths.is_empty() {
            prompt.push_str("Strengths: ");
            prompt.push_str(&analysis.strengths.join(", "));
            prompt.push('\n');
        }
        if !analysis.areas_for_improvement.is_empty() {
            prompt.push_str("Opportunities: ");
            prompt.push_str(&analysis.areas_for_improvement.join(", "));
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    prompt.push_str(CLOSING);
    prompt
}

/// Clean raw generated text: trim, unescape `\n`, drop stray backslashes.
pub fn normalize_feedback(raw: &str) -> String {
    raw.trim().replace("\\n", "\n").replace('\\', "")
}
