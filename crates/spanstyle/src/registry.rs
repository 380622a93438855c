//! Style registries: named collections of style records with change
//! notification, and the pool that owns them.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use spanstyle_css::{merge_rule, parse, TextStyle};
use spanstyle_markup::{MarkupConverter, StyledString};

use crate::error::Error;
use crate::tags::CssTag;

type Subscriber = Box<dyn FnMut()>;

/// One named style registry: a selector→record map plus subscribers to
/// notify when the map changes.
///
/// Notification is synchronous and in subscription order. Subscribers
/// must not call back into the registry; delivery is reentrant-unsafe by
/// contract.
pub struct StyleRegistry {
    id: String,
    styles: HashMap<String, TextStyle>,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("id", &self.id)
            .field("styles", &self.styles)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl StyleRegistry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            styles: HashMap::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parses a stylesheet and replaces all records, notifying
    /// subscribers. On a parse error the registry is left untouched.
    pub fn set_css(&mut self, css: &str) -> Result<(), Error> {
        let styles = parse(css)?;
        self.set_styles(styles);
        Ok(())
    }

    /// [`set_css`](Self::set_css) from a file.
    pub fn load_css<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Load {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        self.set_css(&content)
    }

    /// Atomically replaces every record, then notifies subscribers.
    pub fn set_styles(&mut self, styles: HashMap<String, TextStyle>) {
        self.styles = styles;
        self.notify();
    }

    /// Inserts or replaces a single record, optionally notifying.
    pub fn set_style(&mut self, selector: impl Into<String>, style: TextStyle, notify: bool) {
        self.styles.insert(selector.into(), style);
        if notify {
            self.notify();
        }
    }

    pub fn get_style(&self, selector: &str) -> Option<&TextStyle> {
        self.styles.get(selector)
    }

    pub fn styles(&self) -> Vec<&TextStyle> {
        self.styles.values().collect()
    }

    /// Notifies subscribers without changing anything, for hosts that
    /// mutated records through other means.
    pub fn refresh(&mut self) {
        self.notify();
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut() + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn notify(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber();
        }
    }

    /// The registry's records with `tags` overrides applied: the
    /// per-call map a [`MarkupConverter`] consumes.
    ///
    /// Per tag, the base record is the borrowed `name` entry, else the
    /// entry registered under the tag itself, else the default
    /// selector's record. A CSS fragment on top of a registry-backed
    /// base wins over it; a fragment for an otherwise unknown tag fills
    /// the gaps the default record leaves. A record missing a font
    /// family inherits the default's.
    pub fn effective_styles(
        &self,
        default_selector: &str,
        tags: &[CssTag],
    ) -> Result<HashMap<String, TextStyle>, Error> {
        let mut effective = self.styles.clone();
        let default = self.styles.get(default_selector).cloned();

        for tag in tags {
            let base = tag
                .name
                .as_deref()
                .and_then(|name| self.styles.get(name))
                .or_else(|| self.styles.get(&tag.tag));

            let mut record = match (base, &tag.css) {
                (Some(base), Some(css)) => merge_rule(base, css, true)?,
                (Some(base), None) => base.clone(),
                (None, Some(css)) => {
                    let fragment = merge_rule(&TextStyle::new(tag.tag.as_str()), css, true)?;
                    match &default {
                        Some(default) => {
                            let mut record = default.clone();
                            record.merge(&fragment, false);
                            record
                        }
                        None => fragment,
                    }
                }
                (None, None) => match &default {
                    Some(default) => default.clone(),
                    None => continue,
                },
            };

            if record.font_family.is_none() {
                if let Some(default) = &default {
                    record.font_family.clone_from(&default.font_family);
                }
            }

            effective.insert(tag.tag.clone(), record.renamed(tag.tag.as_str()));
        }

        Ok(effective)
    }

    /// End-to-end conversion: markup in, styled ranges out, using this
    /// registry's records with `tags` overrides applied.
    ///
    /// For image or palette resolution, build a [`MarkupConverter`] over
    /// [`effective_styles`](Self::effective_styles) instead.
    pub fn styled_string(
        &self,
        source: &str,
        default_selector: &str,
        tags: &[CssTag],
    ) -> Result<StyledString, Error> {
        let effective = self.effective_styles(default_selector, tags)?;
        let styled = MarkupConverter::new(&effective, default_selector).convert(source)?;
        Ok(styled)
    }
}

/// Host-owned collection of registries keyed by id. Single-threaded by
/// contract; there is no internal locking.
#[derive(Debug, Default)]
pub struct RegistryPool {
    registries: HashMap<String, StyleRegistry>,
}

impl RegistryPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry under `id`. An id stays taken until
    /// [`remove`](Self::remove).
    pub fn create(&mut self, id: impl Into<String>) -> Result<&mut StyleRegistry, Error> {
        let id = id.into();
        if self.registries.contains_key(&id) {
            return Err(Error::DuplicateInstance { id });
        }
        let registry = StyleRegistry::new(id.clone());
        Ok(self.registries.entry(id).or_insert(registry))
    }

    pub fn get(&self, id: &str) -> Option<&StyleRegistry> {
        self.registries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut StyleRegistry> {
        self.registries.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<StyleRegistry> {
        self.registries.remove(id)
    }
}
