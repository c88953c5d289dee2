use cssfront_shared::config::Options;
use std::collections::HashMap;

/// What the body of an at-rule holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtRuleKind {
    /// Rules, like `@media`
    Nested,
    /// Declarations, like `@font-face`
    Flat,
}

const NESTED: &[&str] = &[
    "container",
    "document",
    "font-feature-values",
    "keyframes",
    "layer",
    "media",
    "scope",
    "starting-style",
    "supports",
];

const FLAT: &[&str] = &[
    "counter-style",
    "font-face",
    "font-palette-values",
    "page",
    "property",
    "viewport",
];

/// Decides whether an at-rule with a body is a flat or a nested block
#[derive(Clone, Debug)]
pub struct AtRuleTable {
    kinds: HashMap<String, AtRuleKind>,
}

impl Default for AtRuleTable {
    fn default() -> Self {
        let mut table = Self {
            kinds: HashMap::new(),
        };
        for name in NESTED {
            table.register(name, AtRuleKind::Nested);
        }
        for name in FLAT {
            table.register(name, AtRuleKind::Flat);
        }

        table
    }
}

impl AtRuleTable {
    /// Creates the built-in table extended with the at-rules registered in the options
    pub fn from_options(options: &Options) -> Self {
        let mut table = Self::default();
        for name in &options.nested_at_rules {
            table.register(name, AtRuleKind::Nested);
        }
        for name in &options.flat_at_rules {
            table.register(name, AtRuleKind::Flat);
        }

        table
    }

    /// Registers an at-rule by name, with or without its `@`
    pub fn register(&mut self, name: &str, kind: AtRuleKind) {
        let name = name.trim().trim_start_matches('@').to_ascii_lowercase();
        self.kinds.insert(name, kind);
    }

    /// Classifies the head of a block, like `@media screen`. Vendor prefixed at-rules classify as
    /// their unprefixed name unless registered themselves. Unknown at-rules are flat.
    pub fn classify(&self, head: &str) -> AtRuleKind {
        let name = keyword(head);

        if let Some(kind) = self.kinds.get(&name) {
            return *kind;
        }

        if let Some(kind) = strip_vendor_prefix(&name).and_then(|name| self.kinds.get(name)) {
            return *kind;
        }

        log::debug!("unknown at-rule '@{name}', parsing its body as declarations");
        AtRuleKind::Flat
    }
}

/// Returns the lowercased name of the at-rule that starts the given head
pub fn keyword(head: &str) -> String {
    head.trim_start()
        .trim_start_matches('@')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn strip_vendor_prefix(name: &str) -> Option<&str> {
    let rest = name.strip_prefix('-')?;
    let (_, unprefixed) = rest.split_once('-')?;

    (!unprefixed.is_empty()).then_some(unprefixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("@media (min-width:980px)", AtRuleKind::Nested; "media")]
    #[test_case("@MEDIA screen", AtRuleKind::Nested; "uppercase")]
    #[test_case("@media(min-width:980px)", AtRuleKind::Nested; "no space before parenthesis")]
    #[test_case("@supports (display:grid)", AtRuleKind::Nested; "supports")]
    #[test_case("@keyframes __ESCAPED_FREE_TEXT_CLEAN_CSS0__", AtRuleKind::Nested; "keyframes with placeholder")]
    #[test_case("@-webkit-keyframes spin", AtRuleKind::Nested; "vendor prefixed nested")]
    #[test_case("@font-face", AtRuleKind::Flat; "font face")]
    #[test_case("@page :first", AtRuleKind::Flat; "page")]
    #[test_case("@-ms-viewport", AtRuleKind::Flat; "vendor prefixed flat")]
    #[test_case("@something-else", AtRuleKind::Flat; "unknown")]
    fn classify(head: &str, expected: AtRuleKind) {
        assert_eq!(AtRuleTable::default().classify(head), expected);
    }

    #[test]
    fn options_extend_the_table() {
        let options = Options {
            nested_at_rules: vec!["@custom-selector-group".into()],
            flat_at_rules: vec!["MEDIA".into()],
            ..Default::default()
        };

        let table = AtRuleTable::from_options(&options);
        assert_eq!(table.classify("@custom-selector-group x"), AtRuleKind::Nested);
        assert_eq!(table.classify("@media screen"), AtRuleKind::Flat);
        assert_eq!(table.classify("@supports (x:y)"), AtRuleKind::Nested);
    }

    #[test]
    fn registered_prefix_wins() {
        let mut table = AtRuleTable::default();
        table.register("-moz-document", AtRuleKind::Flat);

        assert_eq!(table.classify("@-moz-document url-prefix()"), AtRuleKind::Flat);
        assert_eq!(table.classify("@document url-prefix()"), AtRuleKind::Nested);
    }

    #[test_case("@media screen", "media")]
    #[test_case("@font-face{", "font-face")]
    #[test_case("@", "")]
    fn keywords(head: &str, expected: &str) {
        assert_eq!(keyword(head), expected);
    }
}
