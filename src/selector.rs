use crate::dom::{Dom, NodeId};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrCondition>,
}

impl SelectorStep {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    pub(crate) fn id_only(&self) -> Option<&str> {
        if self.tag.is_none() && self.classes.is_empty() && self.attrs.is_empty() {
            self.id.as_deref()
        } else {
            None
        }
    }
}

/// Parses a descendant chain of compound steps. Supported syntax:
/// `tag`, `#id`, `.class`, `[attr]`, `[attr='value']`, combined within a
/// step and chained with whitespace. Combinators, pseudo-classes and
/// selector groups are out of scope and rejected.
pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorStep>> {
    let trimmed = selector.trim();
    if trimmed.is_empty() || trimmed.contains(',') {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let mut steps = Vec::new();
    for token in split_steps(trimmed)? {
        if matches!(token.as_str(), ">" | "+" | "~") || token.contains(':') {
            return Err(Error::UnsupportedSelector(selector.into()));
        }
        steps.push(parse_step(&token, selector)?);
    }
    if steps.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(steps)
}

fn split_steps(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;
    let mut quote: Option<char> = None;

    for ch in selector.chars() {
        match ch {
            '\'' | '"' if in_brackets => {
                match quote {
                    Some(open) if open == ch => quote = None,
                    None => quote = Some(ch),
                    Some(_) => {}
                }
                current.push(ch);
            }
            '[' if quote.is_none() => {
                if in_brackets {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                in_brackets = true;
                current.push(ch);
            }
            ']' if quote.is_none() => {
                if !in_brackets {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                in_brackets = false;
                current.push(ch);
            }
            ch if ch.is_ascii_whitespace() && !in_brackets => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }
    if in_brackets || quote.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_step(token: &str, selector: &str) -> Result<SelectorStep> {
    let mut step = SelectorStep::default();
    let chars = token.chars().collect::<Vec<_>>();
    let mut i = 0usize;

    while i < chars.len() {
        match chars[i] {
            '#' => {
                let (name, next) = take_name(&chars, i + 1);
                if name.is_empty() {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                step.id = Some(name);
                i = next;
            }
            '.' => {
                let (name, next) = take_name(&chars, i + 1);
                if name.is_empty() {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                step.classes.push(name);
                i = next;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|ch| *ch == ']')
                    .map(|offset| i + offset)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
                let body = chars[i + 1..close].iter().collect::<String>();
                step.attrs.push(parse_attr_condition(&body, selector)?);
                i = close + 1;
            }
            ch if ch.is_ascii_alphanumeric() || ch == '-' || ch == '*' => {
                if ch == '*' {
                    i += 1;
                    continue;
                }
                let (name, next) = take_name(&chars, i);
                step.tag = Some(name.to_ascii_lowercase());
                i = next;
            }
            _ => return Err(Error::UnsupportedSelector(selector.into())),
        }
    }

    if step.is_empty() && !token.contains('*') {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(step)
}

fn take_name(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len()
        && (chars[end].is_ascii_alphanumeric() || chars[end] == '-' || chars[end] == '_')
    {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn parse_attr_condition(body: &str, selector: &str) -> Result<AttrCondition> {
    let body = body.trim();
    match body.split_once('=') {
        None => {
            if body.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            Ok(AttrCondition::Exists {
                key: body.to_ascii_lowercase(),
            })
        }
        Some((key, raw)) => {
            let key = key.trim();
            let raw = raw.trim();
            if key.is_empty() || key.ends_with(['^', '$', '*', '~', '|']) {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            let value = raw
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
                .or_else(|| raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')))
                .unwrap_or(raw);
            Ok(AttrCondition::Eq {
                key: key.to_ascii_lowercase(),
                value: value.to_string(),
            })
        }
    }
}

pub(crate) fn step_matches(dom: &Dom, node_id: NodeId, step: &SelectorStep) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };
    if let Some(tag) = &step.tag {
        if !element.tag_name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &step.id {
        if element.attrs.get("id").map(String::as_str) != Some(id.as_str()) {
            return false;
        }
    }
    for class in &step.classes {
        if !element.has_class(class) {
            return false;
        }
    }
    for condition in &step.attrs {
        match condition {
            AttrCondition::Exists { key } => {
                if !element.attrs.contains_key(key) {
                    return false;
                }
            }
            AttrCondition::Eq { key, value } => {
                if element.attrs.get(key) != Some(value) {
                    return false;
                }
            }
        }
    }
    true
}

fn chain_matches(dom: &Dom, node_id: NodeId, steps: &[SelectorStep]) -> bool {
    let (last, ancestors) = match steps.split_last() {
        Some(split) => split,
        None => return false,
    };
    if !step_matches(dom, node_id, last) {
        return false;
    }
    let mut remaining = ancestors;
    let mut cursor = dom.parent(node_id);
    while let Some(step) = remaining.last() {
        let mut found = false;
        while let Some(current) = cursor {
            cursor = dom.parent(current);
            if step_matches(dom, current, step) {
                found = true;
                break;
            }
        }
        if !found {
            return false;
        }
        remaining = &remaining[..remaining.len() - 1];
    }
    true
}

pub(crate) fn query_all(dom: &Dom, selector: &str) -> Result<Vec<NodeId>> {
    let steps = parse_selector_chain(selector)?;
    if steps.len() == 1 {
        if let Some(id) = steps[0].id_only() {
            return Ok(dom.by_id(id).into_iter().collect());
        }
    }
    Ok(dom
        .walk_elements(dom.root())
        .into_iter()
        .filter(|node| chain_matches(dom, *node, &steps))
        .collect())
}

pub(crate) fn query_one(dom: &Dom, selector: &str) -> Result<NodeId> {
    query_all(dom, selector)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::SelectorNotFound(selector.into()))
}
