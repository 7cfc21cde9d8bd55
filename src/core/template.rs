//! `{field}` template parsing
//!
//! Literal strings in the DSL are templates in the style of Python's
//! `str.format`:
//!
//! - `{0}`, `{1}` - positional arguments of the gated command
//! - `{}` - the next positional argument (automatic numbering)
//! - `{env.HOME}`, `{usr[name]}`, `{args[0]}` - namespace lookups
//! - `{{` and `}}` - literal braces
//!
//! Conversions (`{0!r}`) and format specs (`{0:>5}`) are not supported.

use crate::core::error::EvalError;

/// A piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, braces already unescaped
    Literal(String),
    /// A replacement field
    Field(FieldRef),
}

/// A replacement field such as `env.HOME` or `args[1]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// What the field starts from
    pub root: FieldRoot,
    /// Attribute and item accessors applied after the root, in order
    pub accessors: Vec<Accessor>,
    /// Field text as written, used in error messages
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRoot {
    /// Positional argument, explicit or auto-numbered
    Index(usize),
    /// Named namespace, resolved later against the context
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// `.name`
    Attr(String),
    /// `[key]`
    Item(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Unset,
    Manual,
    Auto(usize),
}

/// Split a template into literal text and replacement fields
pub fn parse_template(input: &str) -> Result<Vec<Segment>, EvalError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut numbering = Numbering::Unset;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => {
                return Err(EvalError::Template(format!(
                    "single '}}' encountered in \"{}\"",
                    input
                )));
            }
            '{' => {
                let mut field = String::new();
                let mut depth = 0usize;
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        '[' => depth += 1,
                        ']' => depth = depth.saturating_sub(1),
                        '}' if depth == 0 => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                    field.push(c);
                }
                if !closed {
                    return Err(EvalError::Template(format!(
                        "expected '}}' before end of \"{}\"",
                        input
                    )));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(parse_field(&field, &mut numbering)?));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

fn parse_field(field: &str, numbering: &mut Numbering) -> Result<FieldRef, EvalError> {
    // Find where the root name ends, ignoring anything inside brackets
    let root_end = field.find(['.', '[']).unwrap_or(field.len());
    let outside_brackets = strip_brackets(field);
    if outside_brackets.contains(['!', ':']) {
        return Err(EvalError::Template(format!(
            "conversions and format specs are not supported: {{{}}}",
            field
        )));
    }

    let root_text = &field[..root_end];
    let root = if root_text.is_empty() {
        let index = match *numbering {
            Numbering::Manual => {
                return Err(EvalError::Template(
                    "cannot switch from manual field numbering to automatic field numbering"
                        .to_string(),
                ))
            }
            Numbering::Unset => 0,
            Numbering::Auto(next) => next,
        };
        *numbering = Numbering::Auto(index + 1);
        FieldRoot::Index(index)
    } else if let Ok(index) = root_text.parse::<usize>() {
        if let Numbering::Auto(_) = numbering {
            return Err(EvalError::Template(
                "cannot switch from automatic field numbering to manual field numbering"
                    .to_string(),
            ));
        }
        *numbering = Numbering::Manual;
        FieldRoot::Index(index)
    } else {
        FieldRoot::Name(root_text.to_string())
    };

    Ok(FieldRef {
        root,
        accessors: parse_accessors(field, &field[root_end..])?,
        raw: field.to_string(),
    })
}

fn parse_accessors(field: &str, mut rest: &str) -> Result<Vec<Accessor>, EvalError> {
    let mut accessors = Vec::new();

    while let Some(c) = rest.chars().next() {
        match c {
            '.' => {
                let end = rest[1..].find(['.', '[']).map_or(rest.len(), |i| i + 1);
                let name = &rest[1..end];
                if name.is_empty() {
                    return Err(EvalError::Template(format!(
                        "empty attribute in field {{{}}}",
                        field
                    )));
                }
                accessors.push(Accessor::Attr(name.to_string()));
                rest = &rest[end..];
            }
            '[' => {
                let close = rest.find(']').ok_or_else(|| {
                    EvalError::Template(format!("missing ']' in field {{{}}}", field))
                })?;
                let key = &rest[1..close];
                if key.is_empty() {
                    return Err(EvalError::Template(format!(
                        "empty item key in field {{{}}}",
                        field
                    )));
                }
                accessors.push(Accessor::Item(key.to_string()));
                rest = &rest[close + 1..];
            }
            _ => {
                return Err(EvalError::Template(format!(
                    "only '.' or '[' may follow ']' in field {{{}}}",
                    field
                )));
            }
        }
    }

    Ok(accessors)
}

/// The field text with every `[...]` section removed
fn strip_brackets(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut depth = 0usize;
    for c in field.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
