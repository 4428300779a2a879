//! Container directive splitting.
//!
//! Container directives wrap markdown between `:::name` and `:::` lines:
//!
//! ```text
//! :::note[Heads up] extra args
//! Body **markdown**.
//! :::
//! ```
//!
//! The source is split into markdown runs and directive sections before
//! markdown parsing, so each run is handed to pulldown-cmark on its own.

use crate::MAX_NESTING;
use crate::fence::FenceTracker;

/// A piece of source: plain markdown or a directive with its own body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Markdown(String),
    Directive {
        name: String,
        arguments: Vec<String>,
        body: Vec<Segment>,
    },
}

/// Parsed container marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ContainerLine {
    /// `:::name[title] args`
    Start {
        name: String,
        arguments: Vec<String>,
        colon_count: usize,
    },
    /// `:::`
    End { colon_count: usize },
}

/// An open container while scanning.
struct Frame {
    name: String,
    arguments: Vec<String>,
    colon_count: usize,
    segments: Vec<Segment>,
    markdown: String,
}

impl Frame {
    fn new(name: String, arguments: Vec<String>, colon_count: usize) -> Self {
        Self {
            name,
            arguments,
            colon_count,
            segments: Vec::new(),
            markdown: String::new(),
        }
    }

    fn flush(&mut self) {
        if !self.markdown.trim().is_empty() {
            self.segments
                .push(Segment::Markdown(std::mem::take(&mut self.markdown)));
        }
        self.markdown.clear();
    }

    fn into_segment(mut self) -> Segment {
        self.flush();
        Segment::Directive {
            name: self.name,
            arguments: self.arguments,
            body: self.segments,
        }
    }
}

/// Split `input` into markdown runs and directive sections.
///
/// Unmatched closing markers stay in the markdown; containers still open at
/// the end of input are closed there.
pub(crate) fn split(input: &str) -> Vec<Segment> {
    let mut root = Frame::new(String::new(), Vec::new(), 0);
    let mut open: Vec<Frame> = Vec::new();
    let mut fence = FenceTracker::new();

    for line in input.split_inclusive('\n') {
        let was_in_fence = fence.in_fence();
        let is_fence_marker = fence.update(line);
        let marker = if was_in_fence || is_fence_marker {
            None
        } else {
            parse_container_line(line)
        };

        match marker {
            Some(ContainerLine::Start {
                name,
                arguments,
                colon_count,
            }) if open.len() < MAX_NESTING => {
                open.last_mut().unwrap_or(&mut root).flush();
                open.push(Frame::new(name, arguments, colon_count));
            }
            Some(ContainerLine::End { colon_count })
                if open
                    .last()
                    .is_some_and(|frame| colon_count >= frame.colon_count) =>
            {
                if let Some(mut frame) = open.pop() {
                    frame.flush();
                    let parent = open.last_mut().unwrap_or(&mut root);
                    parent.flush();
                    parent.segments.push(frame.into_segment());
                }
            }
            _ => open.last_mut().unwrap_or(&mut root).markdown.push_str(line),
        }
    }

    while let Some(frame) = open.pop() {
        tracing::warn!(directive = %frame.name, "Unclosed directive, closing at end of input");
        let parent = open.last_mut().unwrap_or(&mut root);
        parent.flush();
        parent.segments.push(frame.into_segment());
    }

    root.flush();
    root.segments
}

/// Parse a whole line as a container marker.
fn parse_container_line(line: &str) -> Option<ContainerLine> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    let trimmed = line.trim();
    if indent > 3 || !trimmed.starts_with(":::") {
        return None;
    }

    let colon_count = trimmed.chars().take_while(|&c| c == ':').count();
    let after_colons = trimmed[colon_count..].trim();

    if after_colons.is_empty() {
        return Some(ContainerLine::End { colon_count });
    }

    let name_end = after_colons
        .find(|c: char| c == '[' || c.is_whitespace())
        .unwrap_or(after_colons.len());
    let name = &after_colons[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }

    let mut arguments = Vec::new();
    let mut rest = &after_colons[name_end..];
    if let Some((title, consumed)) = parse_brackets(rest) {
        if !title.is_empty() {
            arguments.push(title.to_owned());
        }
        rest = &rest[consumed..];
    }
    arguments.extend(rest.split_whitespace().map(ToOwned::to_owned));

    Some(ContainerLine::Start {
        name: name.to_owned(),
        arguments,
        colon_count,
    })
}

/// Directive names contain only alphanumerics, hyphens, and underscores.
fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Parse `[content]` with nesting, returning the content and bytes consumed.
fn parse_brackets(s: &str) -> Option<(&str, usize)> {
    if !s.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[1..i], i + 1));
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn md(s: &str) -> Segment {
        Segment::Markdown(s.to_owned())
    }

    #[test]
    fn test_plain_markdown_is_one_segment() {
        assert_eq!(split("# Title\n\nText\n"), vec![md("# Title\n\nText\n")]);
    }

    #[test]
    fn test_container_with_title_and_arguments() {
        let segments = split("Before\n:::note[Read this] wide\nInside\n:::\nAfter\n");
        assert_eq!(
            segments,
            vec![
                md("Before\n"),
                Segment::Directive {
                    name: "note".to_owned(),
                    arguments: vec!["Read this".to_owned(), "wide".to_owned()],
                    body: vec![md("Inside\n")],
                },
                md("After\n"),
            ]
        );
    }

    #[test]
    fn test_space_after_colons() {
        let segments = split("::: tabs\nx\n:::\n");
        assert!(matches!(
            &segments[0],
            Segment::Directive { name, .. } if name == "tabs"
        ));
    }

    #[test]
    fn test_nested_containers() {
        let segments = split("::::outer\n:::inner\nx\n:::\n::::\n");
        assert_eq!(
            segments,
            vec![Segment::Directive {
                name: "outer".to_owned(),
                arguments: Vec::new(),
                body: vec![Segment::Directive {
                    name: "inner".to_owned(),
                    arguments: Vec::new(),
                    body: vec![md("x\n")],
                }],
            }]
        );
    }

    #[test]
    fn test_markers_inside_code_fence_are_content() {
        let source = "```\n:::note\n```\n";
        assert_eq!(split(source), vec![md(source)]);
    }

    #[test]
    fn test_unmatched_end_stays_markdown() {
        assert_eq!(split("text\n:::\n"), vec![md("text\n:::\n")]);
    }

    #[test]
    fn test_unclosed_container_closes_at_end() {
        let segments = split(":::warning\nbody\n");
        assert_eq!(
            segments,
            vec![Segment::Directive {
                name: "warning".to_owned(),
                arguments: Vec::new(),
                body: vec![md("body\n")],
            }]
        );
    }

    #[test]
    fn test_nesting_beyond_limit_stays_markdown() {
        let source = ":::a\n".repeat(MAX_NESTING + 1);
        let mut segments = split(&source);
        let mut depth = 0;
        while let [Segment::Directive { body, .. }] = segments.as_slice() {
            depth += 1;
            segments = body.clone();
        }
        assert_eq!(depth, MAX_NESTING);
        assert_eq!(segments, vec![md(":::a\n")]);
    }

    #[test]
    fn test_invalid_names_are_not_directives() {
        assert_eq!(parse_container_line(":::no/slash"), None);
        assert_eq!(parse_container_line("    :::indented"), None);
        assert_eq!(parse_container_line("::two"), None);
    }

    #[test]
    fn test_parse_brackets_nested() {
        assert_eq!(parse_brackets("[a [b]] rest"), Some(("a [b]", 7)));
        assert_eq!(parse_brackets("[open"), None);
        assert_eq!(parse_brackets("none"), None);
    }
}
