//! Pretty-printing of messages for stdout.
//!
//! Each message gets a title bar naming its role, then its content, then any tool calls
//! with their ids and arguments.

use toolloop::Message;

const TITLE_WIDTH: usize = 80;

/// Truncates a string to at most `max` chars; appends "..." when truncated. UTF-8 safe.
/// `max == 0` disables truncation.
pub fn truncate_display(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    if max == 0 || s.chars().count() <= max {
        return s.to_string();
    }
    if max <= SUFFIX.len() {
        return s.chars().take(max).collect();
    }
    format!(
        "{}{}",
        s.chars().take(max - SUFFIX.len()).collect::<String>(),
        SUFFIX
    )
}

fn title(m: &Message) -> &'static str {
    match m {
        Message::System { .. } => " System Message ",
        Message::Human { .. } => " Human Message ",
        Message::Ai { .. } => " Ai Message ",
        Message::Tool { .. } => " Tool Message ",
    }
}

fn title_bar(text: &str) -> String {
    let fill = TITLE_WIDTH.saturating_sub(text.chars().count());
    let left = fill / 2;
    format!("{}{}{}", "=".repeat(left), text, "=".repeat(fill - left))
}

/// Formats one message as a block: title bar, optional tool name, content, tool calls.
pub fn format_message(m: &Message, max: usize) -> String {
    let mut lines = vec![title_bar(title(m))];
    if let Message::Tool { name, .. } = m {
        lines.push(format!("Name: {}", name));
    }
    lines.push(String::new());
    if !m.content().is_empty() {
        lines.push(truncate_display(m.content(), max));
    }
    let calls = m.tool_calls();
    if !calls.is_empty() {
        lines.push("Tool Calls:".to_string());
        for call in calls {
            lines.push(format!("  {} ({})", call.name, call.id));
            lines.push("    Args:".to_string());
            match call.arguments.as_object() {
                Some(args) => {
                    for (key, value) in args {
                        lines.push(format!("      {}: {}", key, value));
                    }
                }
                None => lines.push(format!("      {}", call.arguments)),
            }
        }
    }
    lines.join("\n")
}
