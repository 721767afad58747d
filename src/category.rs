use std::collections::HashMap;

use crate::tags::Container;

/// One translated stimulus/response rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub pattern: String,
    /// Previous bot reply this category must follow. Empty when unset.
    pub that: String,
    pub template: String,
    /// Rendered RiveScript condition lines (without the leading `*`).
    pub conditions: Vec<String>,
}

/// The in-progress category between `<category>` and `</category>`.
#[derive(Debug, Default)]
pub struct CategoryBuilder {
    category: Category,
    /// Set once the category holds something we cannot translate.
    tainted: bool,
}

impl CategoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn taint(&mut self) {
        self.tainted = true;
    }

    pub fn pattern(&self) -> &str {
        &self.category.pattern
    }

    /// Store the text collected by a container tag. AIML `_` wildcards are
    /// rewritten to `*` in patterns.
    pub fn fill(&mut self, container: Container, text: String) {
        match container {
            Container::Pattern => self.category.pattern = text.replace('_', "*"),
            Container::That => self.category.that = text,
            Container::Template => self.category.template = text,
        }
    }

    pub fn add_conditions(&mut self, conditions: Vec<String>) {
        self.category.conditions.extend(conditions);
    }

    /// The finished category, or `None` if it was tainted.
    pub fn finish(self) -> Option<Category> {
        if self.tainted {
            None
        } else {
            Some(self.category)
        }
    }
}

/// Categories grouped by topic. Topics, and the categories inside each
/// topic, iterate in the order they were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAiml {
    order: Vec<String>,
    topics: HashMap<String, Vec<Category>>,
}

impl ParsedAiml {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, topic: &str, category: Category) {
        if !self.topics.contains_key(topic) {
            self.order.push(topic.to_string());
        }
        self.topics.entry(topic.to_string()).or_default().push(category);
    }

    pub fn topic(&self, topic: &str) -> Option<&[Category]> {
        self.topics.get(topic).map(Vec::as_slice)
    }

    pub fn topics(&self) -> impl Iterator<Item = (&str, &[Category])> {
        self.order
            .iter()
            .filter_map(|name| Some((name.as_str(), self.topics.get(name)?.as_slice())))
    }

    pub fn len(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(pattern: &str) -> Category {
        Category {
            pattern: pattern.into(),
            ..Category::default()
        }
    }

    #[test]
    fn topics_keep_insertion_order() {
        let mut parsed = ParsedAiml::new();
        parsed.push("zebra", category("A"));
        parsed.push("random", category("B"));
        parsed.push("zebra", category("C"));

        let topics: Vec<(&str, Vec<&str>)> = parsed
            .topics()
            .map(|(t, cs)| (t, cs.iter().map(|c| c.pattern.as_str()).collect()))
            .collect();
        assert_eq!(topics, vec![("zebra", vec!["A", "C"]), ("random", vec!["B"])]);
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn tainted_builder_yields_nothing() {
        let mut builder = CategoryBuilder::new();
        builder.fill(Container::Pattern, "HI".into());
        builder.taint();
        assert_eq!(builder.finish(), None);
    }

    #[test]
    fn pattern_wildcards_are_normalized() {
        let mut builder = CategoryBuilder::new();
        builder.fill(Container::Pattern, "_ IS _".into());
        builder.fill(Container::That, "A_B".into());
        let category = builder.finish().unwrap();
        assert_eq!(category.pattern, "* IS *");
        assert_eq!(category.that, "A_B");
    }
}
