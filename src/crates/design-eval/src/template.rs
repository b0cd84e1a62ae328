//! System prompt templates.
//!
//! Templates use `str.format`-style syntax: `{design_principle}` marks where
//! the evaluative instruction goes, and `{{` / `}}` produce literal braces
//! (needed for the JSON example in the prompt).

use crate::error::{EvalError, Result};

/// Name of the one placeholder a system prompt template may contain.
pub const PLACEHOLDER: &str = "design_principle";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Instruction,
}

/// A parsed, validated system prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPromptTemplate {
    segments: Vec<Segment>,
}

impl SystemPromptTemplate {
    /// Parse and validate a template.
    ///
    /// Fails with [`EvalError::Template`] when the `{design_principle}`
    /// placeholder is missing, when any other placeholder appears, or when a
    /// brace is unmatched.
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        literal.push('{');
                        continue;
                    }

                    let mut name = String::new();
                    let mut closed = false;
                    for (_, nc) in chars.by_ref() {
                        if nc == '}' {
                            closed = true;
                            break;
                        }
                        name.push(nc);
                    }

                    if !closed {
                        return Err(EvalError::Template(format!(
                            "unclosed '{{' at byte {}",
                            pos
                        )));
                    }
                    if name != PLACEHOLDER {
                        return Err(EvalError::Template(format!(
                            "unknown placeholder '{{{}}}', only '{{{}}}' is supported",
                            name, PLACEHOLDER
                        )));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Instruction);
                }
                '}' => {
                    if matches!(chars.peek(), Some((_, '}'))) {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(EvalError::Template(format!(
                            "single '}}' at byte {}; use '}}}}' for a literal brace",
                            pos
                        )));
                    }
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !segments.contains(&Segment::Instruction) {
            return Err(EvalError::Template(format!(
                "template has no '{{{}}}' placeholder",
                PLACEHOLDER
            )));
        }

        Ok(Self { segments })
    }

    /// Substitute the evaluative instruction at every placeholder.
    pub fn render(&self, instruction: &str) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Instruction => instruction,
            })
            .collect()
    }
}
