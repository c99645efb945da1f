use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

// @const: First href="..." attribute anywhere in the markup; `data-href` and the like do not count
static HREF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|[\s"'/])href\s*=\s*"([^"]*)""#).unwrap()
});

// @const: First anchor element and its text content
static ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<a\b[^>]*>(.*?)</a\s*>").unwrap()
});

/// The one link considered for a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// The href value as written in the markup
    pub raw: String,

    /// Whether the target is an anchor-only placeholder such as `#`
    pub placeholder: bool,

    /// Offset range of the href value inside the cell's inner markup
    pub value_range: Range<usize>,
}

impl LinkCandidate {
    /// Last path segment of the href, ignoring query and fragment
    pub fn file_name(&self) -> Option<&str> {
        file_name_of(&self.raw)
    }
}

/// Return the first `href="..."` value found in a cell's inner markup
pub fn extract_href(inner: &str) -> Option<LinkCandidate> {
    let caps = HREF_REGEX.captures(inner)?;
    let value = caps.get(1)?;
    let raw = value.as_str().to_string();
    let trimmed = raw.trim();

    Some(LinkCandidate {
        placeholder: trimmed.is_empty() || trimmed.starts_with('#'),
        raw,
        value_range: value.range(),
    })
}

/// Last path segment of a URL or relative href
pub fn file_name_of(href: &str) -> Option<&str> {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    let path = &href[..end];
    let name = path.rsplit('/').next()?;
    if name.is_empty() { None } else { Some(name) }
}

/// Point a cell's link at `new_file_name`, updating the visible text when it was that bare filename
pub fn rewrite_link(inner: &str, link: &LinkCandidate, new_file_name: &str) -> String {
    let Some(old_file_name) = link.file_name() else {
        return inner.to_string();
    };
    if old_file_name == new_file_name {
        return inner.to_string();
    }

    let old_value = &inner[link.value_range.clone()];
    let name_at = old_value.rfind(old_file_name).unwrap_or(0);
    let mut new_value = String::with_capacity(old_value.len() + new_file_name.len());
    new_value.push_str(&old_value[..name_at]);
    new_value.push_str(new_file_name);
    new_value.push_str(&old_value[name_at + old_file_name.len()..]);

    let mut out = String::with_capacity(inner.len() + new_file_name.len());
    out.push_str(&inner[..link.value_range.start]);
    out.push_str(&new_value);
    out.push_str(&inner[link.value_range.end..]);

    // Visible text is only touched when it was exactly the old file name
    let Some(caps) = ANCHOR_REGEX.captures(&out) else {
        return out;
    };
    let Some(text) = caps.get(1) else {
        return out;
    };
    if text_content(text.as_str()) != old_file_name {
        return out;
    }
    let Some(at) = text.as_str().find(old_file_name) else {
        return out;
    };

    let start = text.start() + at;
    let mut rewritten = String::with_capacity(out.len() + new_file_name.len());
    rewritten.push_str(&out[..start]);
    rewritten.push_str(new_file_name);
    rewritten.push_str(&out[start + old_file_name.len()..]);
    rewritten
}

/// Visible text of a markup fragment: tags removed, `&nbsp;` decoded, whitespace collapsed
pub fn text_content(markup: &str) -> String {
    let mut stripped = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }

    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace('\u{a0}', " ")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
