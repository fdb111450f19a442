//! Self-contained placeholder images for failed generation attempts.
//!
//! The placeholder is a plain SVG rendered into a `data:` URL, so it needs no
//! network access and survives export verbatim. It carries the section title
//! and the word-wrapped original prompt so the user can see what was
//! attempted.

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const WRAP_COLUMNS: usize = 60;
const MAX_PROMPT_LINES: usize = 8;

/// Synthesize the placeholder for a failed section image. Deterministic:
/// the same title and prompt always produce the same data URL.
pub fn placeholder_image_url(section_title: &str, prompt: &str) -> String {
    let mut lines = wrap_text(prompt, WRAP_COLUMNS);
    if lines.len() > MAX_PROMPT_LINES {
        lines.truncate(MAX_PROMPT_LINES);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }

    let mut svg = String::with_capacity(1024);
    svg.push_str(&format!(
        "<svg width=\"{WIDTH}\" height=\"{HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\">"
    ));
    svg.push_str(&format!(
        "<rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"#374151\"/>"
    ));
    svg.push_str(&format!(
        "<text x=\"50%\" y=\"140\" text-anchor=\"middle\" font-family=\"sans-serif\" \
         font-size=\"44\" fill=\"#e5e7eb\">{}</text>",
        xml_escape(section_title)
    ));
    svg.push_str(
        "<text x=\"50%\" y=\"200\" text-anchor=\"middle\" font-family=\"sans-serif\" \
         font-size=\"28\" fill=\"#9ca3af\">Image could not be generated</text>",
    );
    for (i, line) in lines.iter().enumerate() {
        svg.push_str(&format!(
            "<text x=\"50%\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" \
             font-size=\"22\" fill=\"#6b7280\">{}</text>",
            280 + i as u32 * 34,
            xml_escape(line)
        ));
    }
    svg.push_str("</svg>");

    format!(
        "data:image/svg+xml;charset=UTF-8,{}",
        urlencoding::encode(&svg)
    )
}

/// Greedy word wrap. Words longer than the column budget are hard-split so a
/// pathological token can never produce an overlong line.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > columns {
            let split_at = word
                .char_indices()
                .nth(columns)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            let (head, tail) = word.split_at(split_at);
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(head.to_string());
            word = tail;
        }
        if word.is_empty() {
            continue;
        }
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
