use crate::types::OutgoingMessage;

const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>\n";

/// Escapes text for element content or single/double quoted attributes.
pub fn escape_for_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Renders the `<messages>` reply in input order. `include_to` adds the
/// destination attribute used when answering an outgoing poll.
pub fn render_messages(messages: &[OutgoingMessage], include_to: bool) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push_str("<messages>");
    for message in messages {
        out.push_str("<sms id='");
        out.push_str(&escape_for_xml(&message.id));
        out.push('\'');
        if include_to {
            out.push_str(" to='");
            out.push_str(&escape_for_xml(&message.to));
            out.push('\'');
        }
        out.push('>');
        out.push_str(&escape_for_xml(&message.message));
        out.push_str("</sms>");
    }
    out.push_str("</messages>");
    out
}
