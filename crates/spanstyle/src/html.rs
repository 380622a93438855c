//! Inline stylesheet generation for HTML-capable hosts.
//!
//! Some render targets take real HTML rather than styled ranges. For
//! those, [`with_inline_styles`] appends a `<style>` block with the
//! rules a source fragment needs, serialized from the same records the
//! converter would use.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use spanstyle_css::{merge_rule, to_css, TextStyle};

use crate::error::Error;
use crate::tags::CssTag;
use crate::DEFAULT_SELECTOR;

/// Appends a `<style>` block to `source` covering the given tag
/// overrides. With `use_existing`, rules are also emitted for every tag
/// appearing in `source` that has a record in `styles`, plus the
/// [`DEFAULT_SELECTOR`] rule.
///
/// A [`CssTag`] borrowing a `name` with no record is
/// [`Error::UnknownSelector`]; a tag carrying only raw CSS is passed
/// through verbatim.
pub fn with_inline_styles(
    source: &str,
    styles: &HashMap<String, TextStyle>,
    tags: &[CssTag],
    use_existing: bool,
) -> Result<String, Error> {
    let mut block = String::from("<style>");
    let mut specified: Vec<&str> = Vec::new();

    for tag in tags {
        match (&tag.name, &tag.css) {
            (Some(name), css) => {
                let base = styles.get(name).ok_or_else(|| Error::UnknownSelector {
                    selector: name.clone(),
                })?;
                let record = match css {
                    Some(css) => merge_rule(base, css, true)?,
                    None => base.clone(),
                };
                block.push_str(&to_css(&tag.tag, &record));
                specified.push(&tag.tag);
            }
            (None, Some(css)) => {
                block.push_str(css);
                specified.push(&tag.tag);
            }
            (None, None) => {}
        }
    }

    if use_existing {
        for name in scan_tag_names(source) {
            if specified.iter().any(|s| *s == name) {
                continue;
            }
            if let Some(record) = styles.get(&name) {
                block.push_str(&to_css(&name, record));
            }
        }

        let body_declared = tags.iter().any(|t| t.tag == DEFAULT_SELECTOR);
        if !body_declared && !specified.contains(&DEFAULT_SELECTOR) {
            if let Some(body) = styles.get(DEFAULT_SELECTOR) {
                block.push_str(&to_css(DEFAULT_SELECTOR, body));
            }
        }
    }

    block.push_str("</style>");
    Ok(format!("{source}{block}"))
}

/// Distinct opening tag names in `source`, lowercased, in first-seen
/// order. Unreadable input just ends the scan.
fn scan_tag_names(source: &str) -> Vec<String> {
    let mut reader = Reader::from_str(source);
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut names: Vec<String> = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).to_lowercase();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            Ok(_) => {}
        }
    }
    names
}
