use std::collections::HashMap;

use crate::dom::{Dom, NodeId};
use crate::{Error, Result};

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn decode_entities(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }
    let mut out = String::new();
    let bytes = src.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        let entity_end = if bytes[i] == b'&' {
            src[i..]
                .find(';')
                .map(|offset| i + offset)
                .filter(|end| *end > i + 1 && end - i <= 10)
        } else {
            None
        };
        if let Some(end) = entity_end {
            let name = &src[i + 1..end];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{00A0}'),
                _ => name.strip_prefix('#').and_then(|digits| {
                    let codepoint = if let Some(hex) =
                        digits.strip_prefix('x').or_else(|| digits.strip_prefix('X'))
                    {
                        u32::from_str_radix(hex, 16).ok()?
                    } else {
                        digits.parse::<u32>().ok()?
                    };
                    char::from_u32(codepoint)
                }),
            };
            if let Some(ch) = decoded {
                out.push(ch);
                i = end + 1;
                continue;
            }
        }
        let ch = src[i..].chars().next().unwrap_or('\u{FFFD}');
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

struct TagToken {
    name: String,
    attrs: HashMap<String, String>,
    closing: bool,
    self_closing: bool,
}

/// Parses an HTML fragment and attaches its nodes under `parent`.
///
/// Supported surface: start/end tags, double/single-quoted and unquoted
/// attribute values, bare attributes, comments, void tags, character
/// references in text and attribute values. Unclosed non-void tags are a
/// parse error, as is a stray end tag.
pub(crate) fn parse_fragment(dom: &mut Dom, parent: NodeId, html: &str) -> Result<()> {
    let bytes = html.as_bytes();
    let mut i = 0usize;
    let mut open_stack: Vec<(NodeId, String)> = Vec::new();
    let mut current = parent;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if html[i..].starts_with("<!--") {
                let end = html[i + 4..]
                    .find("-->")
                    .map(|offset| i + 4 + offset + 3)
                    .ok_or_else(|| Error::HtmlParse("unterminated comment".into()))?;
                i = end;
                continue;
            }
            let end = html[i..]
                .find('>')
                .map(|offset| i + offset)
                .ok_or_else(|| Error::HtmlParse("unterminated tag".into()))?;
            let token = parse_tag(&html[i + 1..end])?;
            i = end + 1;

            if token.closing {
                let Some((_, open_name)) = open_stack.last() else {
                    return Err(Error::HtmlParse(format!(
                        "unexpected end tag </{}>",
                        token.name
                    )));
                };
                if !open_name.eq_ignore_ascii_case(&token.name) {
                    return Err(Error::HtmlParse(format!(
                        "mismatched end tag </{}>, open element is <{open_name}>",
                        token.name
                    )));
                }
                open_stack.pop();
                current = open_stack
                    .last()
                    .map(|(node, _)| *node)
                    .unwrap_or(parent);
                continue;
            }

            let node =
                dom.create_element(current, token.name.to_ascii_lowercase(), token.attrs);
            if !token.self_closing && !is_void_tag(&token.name) {
                open_stack.push((node, token.name));
                current = node;
            }
        } else {
            let end = html[i..]
                .find('<')
                .map(|offset| i + offset)
                .unwrap_or(html.len());
            let raw = &html[i..end];
            if !raw.trim().is_empty() {
                dom.create_text(current, decode_entities(raw));
            }
            i = end;
        }
    }

    if let Some((_, open_name)) = open_stack.last() {
        return Err(Error::HtmlParse(format!("unclosed element <{open_name}>")));
    }
    Ok(())
}

fn parse_tag(src: &str) -> Result<TagToken> {
    let src = src.trim();
    let (closing, src) = match src.strip_prefix('/') {
        Some(rest) => (true, rest.trim()),
        None => (false, src),
    };
    let (self_closing, src) = match src.strip_suffix('/') {
        Some(rest) => (true, rest.trim_end()),
        None => (false, src),
    };

    let chars = src.char_indices().collect::<Vec<_>>();
    let name_end = chars
        .iter()
        .position(|(_, ch)| ch.is_ascii_whitespace())
        .unwrap_or(chars.len());
    let name = src[..chars.get(name_end).map(|(pos, _)| *pos).unwrap_or(src.len())].to_string();
    if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-') {
        return Err(Error::HtmlParse(format!("bad tag name in <{src}>")));
    }
    let mut cursor = name_end;

    let mut attrs = HashMap::new();
    while cursor < chars.len() {
        while cursor < chars.len() && chars[cursor].1.is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor >= chars.len() {
            break;
        }
        let key_start = cursor;
        while cursor < chars.len()
            && !chars[cursor].1.is_ascii_whitespace()
            && chars[cursor].1 != '='
        {
            cursor += 1;
        }
        let key = chars[key_start..cursor]
            .iter()
            .map(|(_, ch)| *ch)
            .collect::<String>()
            .to_ascii_lowercase();
        if key.is_empty() {
            return Err(Error::HtmlParse(format!("bad attribute in <{src}>")));
        }
        while cursor < chars.len() && chars[cursor].1.is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor >= chars.len() || chars[cursor].1 != '=' {
            // Bare attribute.
            attrs.insert(key, String::new());
            continue;
        }
        cursor += 1;
        while cursor < chars.len() && chars[cursor].1.is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor >= chars.len() {
            return Err(Error::HtmlParse(format!("missing attribute value in <{src}>")));
        }
        let value = match chars[cursor].1 {
            quote @ ('"' | '\'') => {
                cursor += 1;
                let value_start = cursor;
                while cursor < chars.len() && chars[cursor].1 != quote {
                    cursor += 1;
                }
                if cursor >= chars.len() {
                    return Err(Error::HtmlParse(format!(
                        "unterminated attribute value in <{src}>"
                    )));
                }
                let value = chars[value_start..cursor]
                    .iter()
                    .map(|(_, ch)| *ch)
                    .collect::<String>();
                cursor += 1;
                value
            }
            _ => {
                let value_start = cursor;
                while cursor < chars.len() && !chars[cursor].1.is_ascii_whitespace() {
                    cursor += 1;
                }
                chars[value_start..cursor]
                    .iter()
                    .map(|(_, ch)| *ch)
                    .collect::<String>()
            }
        };
        attrs.insert(key, decode_entities(&value));
    }

    Ok(TagToken {
        name,
        attrs,
        closing,
        self_closing,
    })
}

/// Replaces the children of `node_id` with the parsed fragment.
pub(crate) fn set_inner_html(dom: &mut Dom, node_id: NodeId, html: &str) -> Result<()> {
    dom.expect_element(node_id)?;
    dom.detach_children(node_id);
    parse_fragment(dom, node_id, html)?;
    dom.reindex_ids(node_id);
    Ok(())
}
