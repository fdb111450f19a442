use crate::core::report::{
    GenerationOptions, OutputFormat, Report, ReportLength, ReportSection,
};

#[test]
fn section_serializes_with_original_field_names() {
    let section = ReportSection {
        title: "Intro".into(),
        content: "text".into(),
        image_url: "data:...".into(),
        image_prompt: Some("a prompt".into()),
        is_placeholder: true,
    };
    let json = serde_json::to_value(&section).unwrap();
    assert_eq!(json["imageUrl"], "data:...");
    assert_eq!(json["imagePrompt"], "a prompt");
    assert_eq!(json["isPlaceholder"], true);
}

#[test]
fn section_without_image_attempt_omits_prompt() {
    let section = ReportSection {
        title: "Intro".into(),
        content: "text".into(),
        image_url: "https://example/img.jpg".into(),
        image_prompt: None,
        is_placeholder: false,
    };
    let json = serde_json::to_value(&section).unwrap();
    assert!(json.get("imagePrompt").is_none());
}

#[test]
fn legacy_section_defaults_placeholder_to_false() {
    let section: ReportSection =
        serde_json::from_str(r#"{"title":"t","content":"c","imageUrl":"u"}"#).unwrap();
    assert!(!section.is_placeholder);
    assert!(section.image_prompt.is_none());
}

#[test]
fn replace_section_content_edits_in_place() {
    let mut report = Report::new("Topic");
    report.sections.push(ReportSection {
        title: "A".into(),
        content: "old".into(),
        image_url: String::new(),
        image_prompt: None,
        is_placeholder: false,
    });
    assert!(report.replace_section_content(0, "new"));
    assert_eq!(report.sections[0].content, "new");
    assert!(!report.replace_section_content(5, "nope"));
}

#[test]
fn report_id_matches_creation_time() {
    let report = Report::new("Topic");
    assert_eq!(report.id, report.created_at.timestamp_millis());
    assert!(report.sections.is_empty());
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: GenerationOptions = serde_json::from_str("{}").unwrap();
    assert!(!opts.include_contributors);
    assert_eq!(opts.length, ReportLength::Normal);
    assert_eq!(opts.output_format, OutputFormat::Pdf);

    let opts: GenerationOptions =
        serde_json::from_str(r#"{"length":"long","outputFormat":"word"}"#).unwrap();
    assert_eq!(opts.length, ReportLength::Long);
    assert_eq!(opts.output_format, OutputFormat::Word);
}
