use super::image::generate_section_image;
use super::prompts::content_prompt;
use super::{GenerationOptions, ReportSection};
use crate::core::backend::GenerationBackend;
use crate::core::error::ReportError;

/// Assemble one section: prose and illustration are requested together and
/// awaited as a pair. A content failure is fatal - a section cannot exist
/// without its text - while the image side settles to a value in all cases.
/// The second element is the image diagnostic, if the attempt failed.
pub async fn assemble_section(
    backend: &dyn GenerationBackend,
    topic: &str,
    title: &str,
    options: &GenerationOptions,
) -> Result<(ReportSection, Option<String>), ReportError> {
    let prompt = content_prompt(topic, title, options);

    let (content, image) = tokio::join!(
        backend.text(&prompt),
        generate_section_image(backend, topic, title),
    );
    let content = content?;

    let section = ReportSection {
        title: title.to_string(),
        content,
        image_url: image.image_url,
        image_prompt: Some(image.image_prompt),
        is_placeholder: image.is_placeholder,
    };
    Ok((section, image.image_error))
}
