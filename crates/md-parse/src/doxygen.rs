//! Doxygen `\param` and `\returns` sections inside paragraphs.
//!
//! A paragraph is split before every soft or hard break that is followed by
//! a command, so consecutive command lines become sibling blocks:
//!
//! ```text
//! Adds two numbers.
//! \param lhs The left operand.
//! @param rhs The right operand.
//! \returns The sum.
//! ```

use md_layout::{Block, Inline};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Param(String),
    Returns,
}

/// Expand one paragraph into a paragraph and/or Doxygen sections.
pub(crate) fn expand(inlines: Vec<Inline>) -> Vec<Block> {
    let mut sections = Vec::new();
    let mut current = Vec::new();
    let mut iter = inlines.into_iter().peekable();

    while let Some(inline) = iter.next() {
        let is_break = matches!(inline, Inline::SoftBreak | Inline::LineBreak);
        if is_break && iter.peek().is_some_and(starts_command) {
            sections.push(std::mem::take(&mut current));
            continue;
        }
        current.push(inline);
    }
    sections.push(current);

    sections
        .into_iter()
        .filter(|section| !section.is_empty())
        .map(section_block)
        .collect()
}

fn starts_command(inline: &Inline) -> bool {
    matches!(inline, Inline::Text(text) if parse_command(text).is_some())
}

fn section_block(mut inlines: Vec<Inline>) -> Block {
    let command = match inlines.first() {
        Some(Inline::Text(text)) => {
            parse_command(text).map(|(command, rest)| (command, rest.to_owned()))
        }
        _ => None,
    };
    let Some((command, rest)) = command else {
        return Block::Paragraph(inlines);
    };

    inlines.remove(0);
    if !rest.is_empty() {
        inlines.insert(0, Inline::Text(rest));
    }
    let children = if inlines.is_empty() {
        Vec::new()
    } else {
        vec![Block::Paragraph(inlines)]
    };

    match command {
        Command::Param(name) => Block::DoxygenParameter { name, children },
        Command::Returns => Block::DoxygenReturns(children),
    }
}

/// Parse a leading command, returning it and the remaining text.
///
/// Commands start with `\` or `@` and must be followed by whitespace or the
/// end of the text. `param` requires a name.
fn parse_command(text: &str) -> Option<(Command, &str)> {
    let body = text
        .strip_prefix('\\')
        .or_else(|| text.strip_prefix('@'))?;
    let word_end = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    let (word, after) = body.split_at(word_end);
    if !after.is_empty() && !after.starts_with(char::is_whitespace) {
        return None;
    }

    match word {
        "param" => {
            let after = after.trim_start();
            let name_end = after.find(char::is_whitespace).unwrap_or(after.len());
            let (name, rest) = after.split_at(name_end);
            if name.is_empty() {
                return None;
            }
            Some((Command::Param(name.to_owned()), rest.trim_start()))
        }
        "returns" | "return" => Some((Command::Returns, after.trim_start())),
        _ => None,
    }
}
