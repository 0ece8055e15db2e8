//! Artifact assembly.
//!
//! Pure, total, and deterministic: same inputs always produce byte-identical
//! output, which the terminal-immutability tests rely on. No timestamps, no
//! randomness, no I/O.

/// Assemble the final artifact from ordered `(section label, text)` pairs.
///
/// A fixed header built from the summary line, then one labeled section per
/// stage output, in stage order. Sections are never reordered or dropped.
/// The all-empty case yields just the header.
pub fn assemble_artifact(summary: &str, sections: &[(String, String)]) -> String {
    let mut artifact = String::from("# Your Lifebook\n");

    if !summary.is_empty() {
        artifact.push_str("\n> ");
        artifact.push_str(summary);
        artifact.push('\n');
    }

    for (label, text) in sections {
        artifact.push_str("\n## ");
        artifact.push_str(label);
        artifact.push_str("\n\n");
        artifact.push_str(text.trim_end());
        artifact.push('\n');
    }

    artifact
}
