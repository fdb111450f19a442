use super::{GenerationOptions, ReportLength};

/// Outline request. Asks for a machine-parseable JSON array so the response
/// never needs ad hoc parsing; the minimum size is a hint to the model, not
/// an enforced contract.
pub fn outline_prompt(topic: &str) -> String {
    format!(
        "Create a table of contents for a comprehensive report about '{topic}'. \
         Respond with a JSON array containing only the section titles. \
         Example: [\"Introduction\", \"History\", \"Core Concepts\", \"Conclusion\"]. \
         Produce at least 4 section titles."
    )
}

fn length_instruction(length: ReportLength) -> &'static str {
    match length {
        ReportLength::Short => {
            "write a short, clear, summary-style text. Focus only on the most \
             essential and decisive points."
        }
        ReportLength::Normal => {
            "write a highly detailed, in-depth text in an encyclopedic register. \
             It must be clear enough to explain the subject to someone who has \
             never encountered it."
        }
        ReportLength::Long => {
            "write a maximally expansive, multi-perspective essay - part reference \
             work, part academic thesis. Open with an introduction a bright \
             newcomer could follow, then deepen layer by layer to graduate level, \
             defining every technical term at first use and anchoring difficult \
             concepts with at least two concrete analogies. Cover the historical \
             and socio-cultural context of the subject, including overlooked \
             pioneers and turning points. Represent the mainstream, alternative, \
             and radical schools of thought fairly, compare their strengths and \
             blind spots, and summarize the current academic debate. Ground the \
             theory with at least three real-world case studies from different \
             sectors, draw interdisciplinary connections to adjacent fields, and \
             close with short-, medium-, and long-term scenario projections plus \
             the ethical dilemmas they raise, analyzed through more than one \
             ethical framework. The prose must flow as a narrative with a \
             compelling arc, not a pile of facts."
        }
    }
}

/// Prompt for one section's prose. Plain narrative text only - the model is
/// told to avoid markup because the output lands directly in the document.
pub fn content_prompt(topic: &str, section_title: &str, options: &GenerationOptions) -> String {
    let mut prompt = format!(
        "For the '{section_title}' section of a report on the topic '{topic}', {} \
         The text must be written in flowing paragraphs with a professional tone. \
         Do not use Markdown or HTML tags; produce plain text only.",
        length_instruction(options.length)
    );

    if options.include_contributors {
        prompt.push_str(
            "\n\nAdditionally, under a 'Key Contributors' heading, describe the key \
             figures, scientists, or thinkers relevant to this section, together \
             with their main contributions and how they arrived at them.",
        );
    }

    prompt
}

/// Prompt for a section illustration.
pub fn image_prompt(topic: &str, section_title: &str) -> String {
    format!(
        "A striking illustration for a professional report: '{topic}, {section_title}'. \
         Photorealistic, cinematic, without text or people."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_prompt_requests_json_array() {
        let p = outline_prompt("Quantum Computing");
        assert!(p.contains("Quantum Computing"));
        assert!(p.contains("JSON array"));
    }

    #[test]
    fn length_tiers_produce_distinct_prompts() {
        let base = GenerationOptions::default();
        let short = content_prompt("T", "S", &GenerationOptions {
            length: ReportLength::Short,
            ..base.clone()
        });
        let normal = content_prompt("T", "S", &base);
        let long = content_prompt("T", "S", &GenerationOptions {
            length: ReportLength::Long,
            ..base.clone()
        });
        assert_ne!(short, normal);
        assert_ne!(normal, long);
        assert!(long.len() > normal.len());
        assert!(short.contains("summary-style"));
        assert!(long.contains("case studies"));
    }

    #[test]
    fn contributors_flag_appends_subsection_request() {
        let without = content_prompt("T", "S", &GenerationOptions::default());
        let with = content_prompt("T", "S", &GenerationOptions {
            include_contributors: true,
            ..Default::default()
        });
        assert!(!without.contains("Key Contributors"));
        assert!(with.contains("Key Contributors"));
        assert!(with.starts_with(&without));
    }

    #[test]
    fn content_prompt_forbids_markup() {
        let p = content_prompt("AI", "History", &GenerationOptions::default());
        assert!(p.contains("plain text only"));
        assert!(p.contains("'History'"));
        assert!(p.contains("'AI'"));
    }
}
