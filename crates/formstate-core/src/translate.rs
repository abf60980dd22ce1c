//! Message code resolution.
//!
//! Components hand over an ordered list of candidate codes; the first code
//! the translator knows wins. Localization itself lives outside this crate.
use std::collections::BTreeMap;

///
/// Translate
///

pub trait Translate {
    fn translate(&self, codes: &[String], locale: &str) -> String;
}

///
/// CodeTranslator
/// Passes the first candidate code through untouched.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct CodeTranslator;

impl Translate for CodeTranslator {
    fn translate(&self, codes: &[String], _: &str) -> String {
        codes.first().cloned().unwrap_or_default()
    }
}

///
/// CatalogTranslator
///
/// Fixed code → text catalog, one per locale. Falls back to the first code
/// when no candidate is known.
///

#[derive(Clone, Debug, Default)]
pub struct CatalogTranslator {
    entries: BTreeMap<(String, String), String>,
}

impl CatalogTranslator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(
        mut self,
        locale: impl Into<String>,
        code: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.entries
            .insert((locale.into(), code.into()), text.into());
        self
    }
}

impl Translate for CatalogTranslator {
    fn translate(&self, codes: &[String], locale: &str) -> String {
        codes
            .iter()
            .find_map(|code| self.entries.get(&(locale.to_string(), code.clone())))
            .cloned()
            .unwrap_or_else(|| CodeTranslator.translate(codes, locale))
    }
}
