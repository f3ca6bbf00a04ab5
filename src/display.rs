use console::style;

fn terminal_width() -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), 120).max(60)
}

/// Split `response` into lines no wider than `max_line_len` characters,
/// breaking at the last space before the limit when there is one.
pub fn wrap_lines(response: &str, max_line_len: usize) -> Vec<String> {
    let max_line_len = max_line_len.max(1);
    let mut wrapped = Vec::new();

    for line in response.lines() {
        let mut remaining: Vec<char> = line.chars().collect();
        if remaining.is_empty() {
            wrapped.push(String::new());
            continue;
        }

        while !remaining.is_empty() {
            if remaining.len() <= max_line_len {
                wrapped.push(remaining.iter().collect());
                break;
            }

            match remaining[..max_line_len].iter().rposition(|c| *c == ' ') {
                Some(break_pos) if break_pos > 0 => {
                    wrapped.push(remaining[..break_pos].iter().collect());
                    remaining.drain(..=break_pos);
                    let leading = remaining.iter().take_while(|c| **c == ' ').count();
                    remaining.drain(..leading);
                }
                _ => {
                    wrapped.push(remaining[..max_line_len].iter().collect());
                    remaining.drain(..max_line_len);
                }
            }
        }
    }
    wrapped
}

/// Echo the message being sent through the pipeline
pub fn display_request(message: &str, user_id: &str) {
    let who = if user_id.is_empty() { "anonymous" } else { user_id };
    println!(
        "\n{} {} {}",
        style("💬").bold(),
        style(format!("[{}]", who)).dim().cyan(),
        style(message).bold().white()
    );
}

/// Display a pipeline response in a formatted box
pub fn display_response(response: &str) {
    let max_width = terminal_width();
    let wrapped_lines = wrap_lines(response, max_width.saturating_sub(4));

    let content_max_len = wrapped_lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let box_width = std::cmp::min(max_width, content_max_len + 4);

    let top_border = "┌".to_string() + &"─".repeat(box_width - 2) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(box_width - 2) + "┘";

    println!("\n{}", style("🔮 RESPONSE").bold().magenta());
    println!("{}", style(&top_border).dim().magenta());

    for line in wrapped_lines {
        let padding = box_width.saturating_sub(line.chars().count() + 3);
        println!("│ {}{}│", style(&line).bold().white(), " ".repeat(padding));
    }

    println!("{}", style(&bottom_border).dim().magenta());
}
