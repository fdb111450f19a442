use anyhow::{Result, bail};

use crate::core::report::{OutputFormat, Report};

/// A finished export artifact, ready to hand to whatever delivers files to
/// the user (HTTP attachment, file on disk).
#[derive(Debug)]
pub struct EncodedDocument {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Export collaborator contract. Encoders receive the fully assembled
/// report and nothing else; they are invoked at most once per user export
/// action and their failures never touch the report or history.
pub trait ReportEncoder {
    fn format(&self) -> OutputFormat;
    fn encode(&self, report: &Report) -> Result<EncodedDocument>;
}

/// Pick the encoder for a format. PDF is a page-image encoder that needs a
/// rendered surface the core does not own, so only the word encoder lives
/// here; asking for PDF yields a descriptive error at encode time via
/// [`encode_report`].
pub fn encoder_for(format: OutputFormat) -> Option<Box<dyn ReportEncoder>> {
    match format {
        OutputFormat::Word => Some(Box::new(WordEncoder)),
        OutputFormat::Pdf => None,
    }
}

pub fn encode_report(report: &Report, format: OutputFormat) -> Result<EncodedDocument> {
    match encoder_for(format) {
        Some(encoder) => encoder.encode(report),
        None => bail!(
            "PDF export renders page images from the displayed document and is \
             only available from the front-end; use the word format here."
        ),
    }
}

/// Download name derived from the topic: whitespace collapsed to `_`.
pub fn export_file_name(topic: &str, extension: &str) -> String {
    let stem: String = topic
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let stem = if stem.is_empty() { "report" } else { &stem };
    format!("{stem}.{extension}")
}

/// Word-processor encoder: emits an HTML document with inline styles that
/// word processors import cleanly (centered title, boxed table of contents,
/// per-section heading, image, and paragraphs).
pub struct WordEncoder;

impl ReportEncoder for WordEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Word
    }

    fn encode(&self, report: &Report) -> Result<EncodedDocument> {
        Ok(EncodedDocument {
            file_name: export_file_name(&report.topic, "doc"),
            mime_type: "application/msword",
            bytes: build_word_markup(report).into_bytes(),
        })
    }
}

const STYLE_H1: &str = "font-size: 28px; font-family: Calibri, sans-serif; font-weight: bold; text-align: center; color: #111827; margin-bottom: 8px;";
const STYLE_SUBTITLE: &str = "font-size: 14px; font-family: Calibri, sans-serif; text-align: center; color: #0ea5e9; margin-top: 0;";
const STYLE_H2: &str = "font-size: 22px; font-family: Calibri, sans-serif; font-weight: bold; color: #111827; margin-top: 28px; margin-bottom: 14px; border-bottom: 2px solid #0ea5e9; padding-bottom: 4px;";
const STYLE_IMG: &str = "max-width: 550px; height: auto; display: block; margin: 16px auto;";
const STYLE_P: &str = "font-size: 12pt; font-family: Calibri, sans-serif; line-height: 1.5; color: #374151;";
const STYLE_TOC_H2: &str = "font-size: 20px; font-family: Calibri, sans-serif; font-weight: bold; color: #0891b2; margin-bottom: 16px;";
const STYLE_TOC_UL: &str = "list-style-type: decimal; padding-left: 20px;";
const STYLE_TOC_LI: &str = "font-size: 12pt; font-family: Calibri, sans-serif; color: #374151; margin-bottom: 8px;";

/// Build the word-processor markup for a report: title, subtitle, table of
/// contents from the section titles, then each section's heading, image,
/// and prose (newlines become `<br />`).
pub fn build_word_markup(report: &Report) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "<h1 style=\"{STYLE_H1}\">{}</h1>\n",
        html_escape(&report.topic)
    ));
    html.push_str(&format!(
        "<p style=\"{STYLE_SUBTITLE}\">AI-generated detailed report</p>\n"
    ));

    html.push_str(
        "<div style=\"background-color: #f3f4f6; padding: 20px; border-radius: 8px; \
         margin-top: 32px; margin-bottom: 32px;\">\n",
    );
    html.push_str(&format!(
        "<h2 style=\"{STYLE_TOC_H2}\">Table of Contents</h2>\n<ul style=\"{STYLE_TOC_UL}\">\n"
    ));
    for section in &report.sections {
        html.push_str(&format!(
            "<li style=\"{STYLE_TOC_LI}\">{}</li>\n",
            html_escape(&section.title)
        ));
    }
    html.push_str("</ul>\n</div>\n");

    for section in &report.sections {
        let title = html_escape(&section.title);
        html.push_str("<div>\n");
        html.push_str(&format!("<h2 style=\"{STYLE_H2}\">{title}</h2>\n"));
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"Illustration for {title}\" style=\"{STYLE_IMG}\" />\n",
            section.image_url
        ));
        html.push_str(&format!(
            "<p style=\"{STYLE_P}\">{}</p>\n",
            html_escape(&section.content).replace('\n', "<br />")
        ));
        html.push_str("</div>\n");
    }

    html
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
