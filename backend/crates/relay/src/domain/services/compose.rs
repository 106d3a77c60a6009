//! Message composing
//!
//! Builds the Telegram HTML notification for a submission and cuts it into
//! chunks the Bot API accepts.

use platform::text::escape_html;

/// Outbound notification, already split into deliverable chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chunks: Vec<String>,
}

impl OutboundMessage {
    pub fn compose(subject: &str, fields: &[(String, String)], limit: usize) -> Self {
        Self {
            chunks: chunk(&compose_body(subject, fields), limit),
        }
    }
}

/// Full notification text
///
/// Layout: bold subject, `Submitted fields:` with one hashtag per field,
/// then a `<b>#name:</b>` block per field. Field values arrive escaped;
/// names are escaped here.
pub fn compose_body(subject: &str, fields: &[(String, String)]) -> String {
    let mut body = format!("<b>{subject}</b>\n\n");

    body.push_str("Submitted fields:\n");
    let hashtags: Vec<String> = fields.iter().map(|(name, _)| hashtag(name)).collect();
    body.push_str(&hashtags.join(" "));
    body.push_str("\n\n");

    for (name, value) in fields {
        body.push_str(&format!("<b>#{}:</b>\n{value}\n\n", escape_html(name)));
    }

    body
}

/// `#` followed by the name with spaces turned into underscores
pub fn hashtag(name: &str) -> String {
    format!("#{}", escape_html(name).replace(' ', "_"))
}

/// Split at fixed character boundaries
///
/// Cuts may land mid-word or mid-tag. Every chunk holds at most `limit`
/// characters and the chunks concatenate back to `body`.
pub fn chunk(body: &str, limit: usize) -> Vec<String> {
    if limit == 0 || body.is_empty() {
        return vec![body.to_string()];
    }

    let mut chunks = Vec::with_capacity(body.len() / limit + 1);
    let mut current = String::new();
    let mut count = 0;
    for ch in body.chars() {
        if count == limit {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    chunks.push(current);
    chunks
}
