/*!
 * Alternate URL candidates for publication links.
 *
 * Publications live under a directory named after their code
 * (`5000-g/`). The file inside may spell that code without the hyphen
 * (`5000g-22e.pdf`) or under the sibling numbering that swaps a leading
 * `50` for `51` and back (`5100-g-22e.pdf`).
 */

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// @const: Directory segment carrying a 4-digit code and its suffix
static CODE_DIR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-([A-Za-z0-9]+)$").unwrap()
});

/// Swap a leading `50` for `51` and vice versa
pub fn swap_prefix(digits: &str) -> Option<String> {
    if let Some(rest) = digits.strip_prefix("50") {
        Some(format!("51{}", rest))
    } else {
        digits.strip_prefix("51").map(|rest| format!("50{}", rest))
    }
}

/// Candidate file names for `file_name` under a directory coded `digits-suffix`, in probe order
pub fn alternate_file_names(digits: &str, suffix: &str, file_name: &str) -> Vec<String> {
    let mut prefixes = vec![digits.to_string()];
    if let Some(swapped) = swap_prefix(digits) {
        prefixes.push(swapped);
    }

    // Find which spelling of the code the file name starts with
    let lower = file_name.to_ascii_lowercase();
    let spelled = prefixes.iter().flat_map(|p| {
        ["-", ""].into_iter().map(move |sep| format!("{}{}{}", p, sep, suffix.to_ascii_lowercase()))
    });
    let mut code_len = None;
    for code in spelled {
        if lower.starts_with(&code) {
            let boundary = lower[code.len()..].chars().next();
            if !boundary.is_some_and(|c| c.is_ascii_alphanumeric()) {
                code_len = Some(code.len());
                break;
            }
        }
    }
    let Some(code_len) = code_len else {
        return Vec::new();
    };
    let rest = &file_name[code_len..];

    let mut candidates: Vec<String> = Vec::new();
    for prefix in &prefixes {
        for sep in ["-", ""] {
            let candidate = format!("{}{}{}{}", prefix, sep, suffix, rest);
            if candidate != file_name && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

/// Alternate URLs for `url`, in the fixed order they should be probed
pub fn alternate_urls(url: &str) -> Vec<String> {
    let Ok(parsed) = Url::parse(url) else {
        return Vec::new();
    };
    let Some(segments) = parsed.path_segments() else {
        return Vec::new();
    };
    let segments: Vec<&str> = segments.collect();
    if segments.len() < 2 {
        return Vec::new();
    }

    let file_name = segments[segments.len() - 1];
    let directory = segments[segments.len() - 2];
    let Some(caps) = CODE_DIR_REGEX.captures(directory) else {
        return Vec::new();
    };
    let (digits, suffix) = (&caps[1], &caps[2]);

    alternate_file_names(digits, suffix, file_name)
        .into_iter()
        .filter_map(|name| {
            let mut candidate = parsed.clone();
            {
                let mut path = candidate.path_segments_mut().ok()?;
                path.pop();
                path.push(&name);
            }
            Some(candidate.to_string())
        })
        .collect()
}
