//! Stage definitions and the per-stage context.

/// One ordered step of the generation pipeline.
///
/// Fixed process-wide configuration, not per-job state.
#[derive(Debug, Clone)]
pub struct StageDefinition {
    pub id: String,
    /// Label surfaced to pollers while this stage runs.
    pub display_label: String,
    /// Rough duration used for the remaining-time estimate.
    pub estimated_duration_secs: u64,
}

impl StageDefinition {
    pub fn new(
        id: impl Into<String>,
        display_label: impl Into<String>,
        estimated_duration_secs: u64,
    ) -> Self {
        Self {
            id: id.into(),
            display_label: display_label.into(),
            estimated_duration_secs,
        }
    }
}

/// The default Lifebook pipeline. Later stages see every earlier stage's
/// output through the stage context - the timeline is laid out from the
/// analysis, the narrative from both, and so on.
pub fn default_pipeline() -> Vec<StageDefinition> {
    vec![
        StageDefinition::new("analysis", "Reading your story", 20),
        StageDefinition::new("timeline", "Laying out the timeline", 25),
        StageDefinition::new("narrative", "Writing the narrative", 60),
        StageDefinition::new("reflection", "Adding closing reflections", 15),
    ]
}

/// Accumulated context passed into each stage invocation.
///
/// Rebuilt incrementally as stages complete and never persisted beyond the
/// orchestration call. Prior outputs keep execution order.
#[derive(Debug, Clone, Default)]
pub struct StageContext {
    /// The original request input, verbatim.
    pub input: String,
    /// Short summary line derived from the input; used for the artifact
    /// header, so it must be deterministic.
    pub summary: String,
    /// Prior stage outputs as (stage id, output), in execution order.
    pub prior: Vec<(String, String)>,
}

impl StageContext {
    pub fn new(input: impl Into<String>) -> Self {
        let input = input.into();
        let summary = summarize(&input);
        Self {
            input,
            summary,
            prior: Vec::new(),
        }
    }

    /// Record a completed stage's output for later stages and the assembler.
    pub fn record_output(&mut self, stage_id: &str, output: String) {
        self.prior.push((stage_id.to_string(), output));
    }

    /// Render the prompt for a stage: the request plus everything earlier
    /// stages produced, in execution order.
    pub fn render_prompt(&self, stage: &StageDefinition) -> String {
        let mut prompt = String::new();

        prompt.push_str("The client's request:\n\n");
        prompt.push_str(&self.input);
        prompt.push('\n');

        for (stage_id, output) in &self.prior {
            prompt.push_str("\n--- earlier stage: ");
            prompt.push_str(stage_id);
            prompt.push_str(" ---\n");
            prompt.push_str(output);
            prompt.push('\n');
        }

        prompt.push_str("\nNow produce the \"");
        prompt.push_str(&stage.display_label);
        prompt.push_str("\" section (stage: ");
        prompt.push_str(&stage.id);
        prompt.push_str("). Write prose only, no preamble.\n");

        prompt
    }
}

const SUMMARY_MAX_CHARS: usize = 80;

/// First line of the input, clipped. Deterministic by construction.
fn summarize(input: &str) -> String {
    let line = input.lines().next().unwrap_or("").trim();
    let mut summary: String = line.chars().take(SUMMARY_MAX_CHARS).collect();
    if line.chars().count() > SUMMARY_MAX_CHARS {
        summary.push_str("...");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_orders_analysis_before_timeline() {
        let stages = default_pipeline();
        let ids: Vec<&str> = stages.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, vec!["analysis", "timeline", "narrative", "reflection"]);
    }

    #[test]
    fn prompt_includes_prior_outputs_in_execution_order() {
        let mut context = StageContext::new("Tell the story of my grandmother.");
        context.record_output("analysis", "She was born in 1931.".to_string());
        context.record_output("timeline", "1931, 1956, 1989.".to_string());

        let stage = StageDefinition::new("narrative", "Writing the narrative", 60);
        let prompt = context.render_prompt(&stage);

        let analysis_at = prompt.find("She was born in 1931.").unwrap();
        let timeline_at = prompt.find("1931, 1956, 1989.").unwrap();
        assert!(analysis_at < timeline_at);
        assert!(prompt.contains("Tell the story of my grandmother."));
        assert!(prompt.contains("Writing the narrative"));
    }

    #[test]
    fn summary_takes_first_line_clipped() {
        let long_first_line = "x".repeat(200);
        let input = format!("{}\nsecond line", long_first_line);
        let context = StageContext::new(input);

        assert_eq!(context.summary.chars().count(), 80 + 3);
        assert!(context.summary.ends_with("..."));

        let short = StageContext::new("A short request\nwith a second line");
        assert_eq!(short.summary, "A short request");
    }
}
