use anyhow::{Result, bail};
use tokio::sync::mpsc;

use crate::core::backend::gemini::GeminiBackend;
use crate::core::context::AppContext;
use crate::core::export::encode_report;
use crate::core::report::pipeline::{PipelineEvent, ReportPipeline};
use crate::core::report::{GenerationOptions, OutputFormat, ReportLength};
use crate::core::terminal::{print_info, print_step, print_success, print_warn};

#[derive(Debug)]
pub(crate) struct GenerateArgs {
    pub topic: String,
    pub options: GenerationOptions,
    pub export: bool,
}

pub(crate) fn parse_generate_args(args: &[String]) -> Result<GenerateArgs> {
    let mut topic_parts: Vec<&str> = Vec::new();
    let mut length = ReportLength::Normal;
    let mut output_format = OutputFormat::Pdf;
    let mut include_contributors = false;
    let mut export = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--length" => {
                length = match args.get(i + 1).map(String::as_str) {
                    Some("short") => ReportLength::Short,
                    Some("normal") => ReportLength::Normal,
                    Some("long") => ReportLength::Long,
                    other => bail!(
                        "Unknown length '{}'; expected short, normal, or long",
                        other.unwrap_or("")
                    ),
                };
                i += 2;
            }
            "--format" => {
                output_format = match args.get(i + 1).map(String::as_str) {
                    Some("pdf") => OutputFormat::Pdf,
                    Some("word") => OutputFormat::Word,
                    other => bail!("Unknown format '{}'; expected pdf or word", other.unwrap_or("")),
                };
                i += 2;
            }
            "--contributors" => {
                include_contributors = true;
                i += 1;
            }
            "--export" => {
                export = true;
                i += 1;
            }
            other => {
                topic_parts.push(other);
                i += 1;
            }
        }
    }

    let topic = topic_parts.join(" ");
    if topic.trim().is_empty() {
        bail!(
            "Usage: quill generate <topic> [--length short|normal|long] [--contributors] \
             [--format pdf|word] [--export]"
        );
    }

    Ok(GenerateArgs {
        topic,
        options: GenerationOptions {
            include_contributors,
            length,
            output_format,
        },
        export,
    })
}

pub async fn run(ctx: &AppContext, args: &[String]) -> Result<()> {
    let parsed = parse_generate_args(args)?;

    let api_key = ctx.resolver.resolve().await?;
    let backend = GeminiBackend::new(api_key);

    print_step(&format!("Generating report: {}", parsed.topic));

    let (tx, mut rx) = mpsc::channel::<PipelineEvent>(32);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                PipelineEvent::OutlineReady { titles, .. } => {
                    print_info(&format!("Outline ready: {} sections", titles.len()));
                }
                PipelineEvent::SectionStarted { index, total, title } => {
                    print_info(&format!(
                        "Generating section '{}' ({}/{})",
                        title,
                        index + 1,
                        total
                    ));
                }
                PipelineEvent::SectionCompleted { index, total, report } => {
                    if let Some(section) = report.sections.get(index) {
                        let note = if section.is_placeholder {
                            " (placeholder image)"
                        } else {
                            ""
                        };
                        print_success(&format!(
                            "Section '{}' done{} ({}/{})",
                            section.title,
                            note,
                            index + 1,
                            total
                        ));
                    }
                }
                PipelineEvent::Completed { .. } => {}
            }
        }
    });

    let outcome = ReportPipeline::new(&backend, &ctx.history)
        .run(&parsed.topic, &parsed.options, Some(tx))
        .await?;
    let _ = printer.await;

    print_success(&format!(
        "Report saved to history (id {}, {} sections)",
        outcome.report.id,
        outcome.report.sections.len()
    ));

    if let Some(advisory) = &outcome.advisory {
        print_warn(&advisory.message);
    }

    // Export problems are reported, never allowed to fail a run whose
    // report is already saved.
    if parsed.export {
        match encode_report(&outcome.report, parsed.options.output_format) {
            Ok(doc) => match tokio::fs::write(&doc.file_name, &doc.bytes).await {
                Ok(()) => print_success(&format!("Exported {}", doc.file_name)),
                Err(e) => print_warn(&format!("Export failed: {}", e)),
            },
            Err(e) => print_warn(&format!("Export failed: {}", e)),
        }
    }

    Ok(())
}
