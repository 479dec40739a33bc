//! Tag grammar parsing.
//!
//! ```text
//! tag        := "-" | segment ("," segment)*
//! segment    := directive | group
//! directive  := "dive" | "keys" | "endkeys" | "omitempty"
//! group      := invocation ("|" invocation)*
//! invocation := name ("=" param)?
//! ```
//!
//! Parsing runs in two passes: the tag is split into segments and alias
//! segments are replaced by their expansion, then the flat token list is
//! folded into a nested [`TagPlan`] by a small recursive descent over the
//! `dive` / `keys` / `endkeys` directives.

use crate::enums::Directive;
use crate::error::TagError;
use crate::types::{Alternative, DivePlan, RuleSpec, TagPlan};

/// What the parser needs to know about registered names.
pub trait RuleLookup {
    fn has_rule(&self, name: &str) -> bool;
    fn alias(&self, name: &str) -> Option<&str>;
}

/// Parses a tag string into a plan, resolving aliases and checking that
/// every rule name is known.
///
/// Parsing is pure: the same tag and the same lookup always give equal plans.
pub fn parse_tag(tag: &str, lookup: &dyn RuleLookup) -> Result<TagPlan, TagError> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Ok(TagPlan::default());
    }
    if tag == "-" {
        return Ok(TagPlan {
            skip: true,
            ..TagPlan::default()
        });
    }

    let mut tokens = Vec::new();
    let mut stack = Vec::new();
    expand(tag, None, lookup, &mut stack, &mut tokens)?;

    let mut cursor = Cursor { tokens: &tokens, pos: 0 };
    let plan = parse_level(&mut cursor, false)?;
    Ok(plan)
}

/// Checks a tag for syntax errors only, without resolving names.
pub fn check_syntax(tag: &str) -> Result<(), TagError> {
    for (position, segment) in split_segments(tag).into_iter().enumerate() {
        split_group(segment, position)?;
    }
    Ok(())
}

// ─── Pass 1: segments and alias expansion ───────────────────────────────────

#[derive(Debug)]
enum Token {
    Directive(Directive),
    Rule(RuleSpec),
}

#[derive(Debug)]
struct Invocation {
    name: String,
    param: Option<String>,
}

fn split_segments(tag: &str) -> Vec<&str> {
    tag.split(',').map(str::trim).collect()
}

fn expand(
    tag: &str,
    alias: Option<&str>,
    lookup: &dyn RuleLookup,
    stack: &mut Vec<String>,
    out: &mut Vec<Token>,
) -> Result<(), TagError> {
    for (position, segment) in split_segments(tag).into_iter().enumerate() {
        if segment == "-" {
            return Err(TagError::MisplacedSkip);
        }

        let group = split_group(segment, position)?;

        if let [only] = group.as_slice() {
            if let Some(directive) = Directive::from_token(&only.name) {
                if only.param.is_some() {
                    return Err(TagError::DirectiveParam {
                        directive: only.name.clone(),
                    });
                }
                out.push(Token::Directive(directive));
                continue;
            }

            if only.param.is_none()
                && let Some(expansion) = lookup.alias(&only.name)
            {
                if stack.iter().any(|s| s == &only.name) {
                    let mut chain = stack.clone();
                    chain.push(only.name.clone());
                    return Err(TagError::CyclicAlias {
                        chain: chain.join(" -> "),
                    });
                }
                stack.push(only.name.clone());
                // Nested aliases report the outermost alias name.
                let reported = alias.unwrap_or(&only.name).to_string();
                expand(expansion, Some(reported.as_str()), lookup, stack, out)?;
                stack.pop();
                continue;
            }
        }

        for inv in &group {
            if let Some(directive) = Directive::from_token(&inv.name) {
                return Err(TagError::DirectiveInGroup {
                    directive: directive.as_str().to_string(),
                });
            }
            if !lookup.has_rule(&inv.name) {
                return Err(TagError::UnknownRule {
                    name: inv.name.clone(),
                });
            }
        }
        let Some((first, rest)) = group.split_first() else {
            return Err(TagError::EmptySegment { position });
        };
        out.push(Token::Rule(RuleSpec {
            name: first.name.clone(),
            param: first.param.clone(),
            alias: alias.map(str::to_string),
            alternatives: rest
                .iter()
                .map(|inv| Alternative {
                    name: inv.name.clone(),
                    param: inv.param.clone(),
                })
                .collect(),
        }));
    }
    Ok(())
}

fn split_group(segment: &str, position: usize) -> Result<Vec<Invocation>, TagError> {
    if segment.is_empty() {
        return Err(TagError::EmptySegment { position });
    }
    segment
        .split('|')
        .map(|part| parse_invocation(part.trim(), position))
        .collect()
}

fn parse_invocation(part: &str, position: usize) -> Result<Invocation, TagError> {
    if part.is_empty() {
        return Err(TagError::EmptySegment { position });
    }
    let (name, param) = match part.split_once('=') {
        Some((name, param)) => (name.trim(), Some(unescape_param(param))),
        None => (part, None),
    };
    if name.is_empty() {
        return Err(TagError::MissingName {
            param: param.unwrap_or_default(),
        });
    }
    if !is_valid_name(name) {
        return Err(TagError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(Invocation {
        name: name.to_string(),
        param,
    })
}

/// Rule and alias names: ASCII letters, digits and underscores.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `0x2C` and `0x7C` stand for `,` and `|`, which would otherwise end the
/// parameter.
fn unescape_param(param: &str) -> String {
    param.replace("0x2C", ",").replace("0x7C", "|")
}

// ─── Pass 2: directive structure ────────────────────────────────────────────

struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }
}

/// Parses one level of the plan. Inside a keys section the level ends at
/// `endkeys`; otherwise it ends at the end of input. A `dive` hands the rest
/// of the input to a nested level.
fn parse_level(cursor: &mut Cursor<'_>, in_keys: bool) -> Result<TagPlan, TagError> {
    let mut plan = TagPlan::default();

    while let Some(token) = cursor.advance() {
        match token {
            Token::Rule(rule) => plan.rules.push(rule.clone()),
            Token::Directive(Directive::OmitEmpty) => plan.omit_empty = true,
            Token::Directive(Directive::Keys) => return Err(TagError::KeysWithoutDive),
            Token::Directive(Directive::EndKeys) => {
                if in_keys {
                    return Ok(plan);
                }
                return Err(TagError::EndKeysWithoutKeys);
            }
            Token::Directive(Directive::Dive) => {
                if in_keys {
                    return Err(TagError::DiveInKeys);
                }
                let keys = match cursor.peek() {
                    Some(Token::Directive(Directive::Keys)) => {
                        cursor.advance();
                        Some(parse_keys(cursor)?)
                    }
                    _ => None,
                };
                let elements = parse_level(cursor, false)?;
                plan.dive = Some(Box::new(DivePlan { keys, elements }));
                return Ok(plan);
            }
        }
    }

    if in_keys {
        return Err(TagError::UnclosedKeys);
    }
    Ok(plan)
}

fn parse_keys(cursor: &mut Cursor<'_>) -> Result<TagPlan, TagError> {
    parse_level(cursor, true)
}
