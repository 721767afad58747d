//! Classification of AIML element names.
//!
//! Every element the transducer meets falls into exactly one [`Tag`] variant.
//! The transducer matches on the variant; nothing else in the crate looks at
//! raw tag names.

/// Tags we deliberately do not translate. They still pass through verbatim,
/// but do not produce an "unhandled tag" warning.
pub const IGNORE_TAGS: &[&str] = &[
    // Common HTML
    "a", "b", "i", "br", "ul", "p", "li", "em", "img",
    // AIML features RiveScript has no equivalent for
    "eval", "learn",
    // Pandorabots extensions
    "oob", "dial", "dialcontact", "map", "search", "sms", "recipient", "message",
];

/// Record field filled by a structural container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Pattern,
    That,
    Template,
}

/// Which previous exchange an index-carrying reference tag reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// `<star/>`: a wildcard capture of the current input.
    Star,
    /// `<input/>`, `<request/>`: a previous user message.
    Input,
    /// `<response/>`: a previous bot reply.
    Reply,
}

impl Reference {
    pub fn rivescript(self) -> &'static str {
        match self {
            Reference::Star => "star",
            Reference::Input => "input",
            Reference::Reply => "reply",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseTransform {
    Uppercase,
    Lowercase,
    Formal,
    Sentence,
}

impl CaseTransform {
    pub fn rivescript(self) -> &'static str {
        match self {
            CaseTransform::Uppercase => "uppercase",
            CaseTransform::Lowercase => "lowercase",
            CaseTransform::Formal => "formal",
            CaseTransform::Sentence => "sentence",
        }
    }
}

/// Variable namespace read by `<bot>` and `<get>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// `<aiml>`: the document wrapper, no effect.
    Root,
    Category,
    Container(Container),
    Topic,
    Think,
    Random,
    Condition,
    /// `<li>`: an alternative of `<random>` or a branch of `<condition>`.
    Item,
    Set,
    Reference(Reference),
    /// `<thatstar/>`
    BotStar,
    Id,
    /// `<bot name=..>` and `<get name=..>`.
    Variable(Scope),
    /// Old-style `<get_name/>`, carrying the variable name.
    LegacyGet(String),
    Srai,
    Sr,
    Person,
    Case(CaseTransform),
    Date,
    Size,
    Unknown,
}

/// Classify a lower-cased element name.
pub fn classify(name: &str) -> Tag {
    match name {
        "aiml" => Tag::Root,
        "category" => Tag::Category,
        "pattern" => Tag::Container(Container::Pattern),
        "that" => Tag::Container(Container::That),
        "template" => Tag::Container(Container::Template),
        "topic" => Tag::Topic,
        "think" => Tag::Think,
        "random" => Tag::Random,
        "condition" => Tag::Condition,
        "li" => Tag::Item,
        "set" => Tag::Set,
        "star" => Tag::Reference(Reference::Star),
        "input" | "request" => Tag::Reference(Reference::Input),
        "response" => Tag::Reference(Reference::Reply),
        "thatstar" => Tag::BotStar,
        "id" => Tag::Id,
        "bot" => Tag::Variable(Scope::Bot),
        "get" => Tag::Variable(Scope::User),
        "srai" => Tag::Srai,
        "sr" => Tag::Sr,
        "person" => Tag::Person,
        "uppercase" => Tag::Case(CaseTransform::Uppercase),
        "lowercase" => Tag::Case(CaseTransform::Lowercase),
        "formal" => Tag::Case(CaseTransform::Formal),
        "sentence" => Tag::Case(CaseTransform::Sentence),
        "date" => Tag::Date,
        "size" => Tag::Size,
        _ => match name.strip_prefix("get_") {
            Some(var) if !var.is_empty() => Tag::LegacyGet(var.to_string()),
            _ => Tag::Unknown,
        },
    }
}

pub fn is_ignored(name: &str) -> bool {
    IGNORE_TAGS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_tags() {
        assert_eq!(classify("category"), Tag::Category);
        assert_eq!(classify("that"), Tag::Container(Container::That));
        assert_eq!(classify("request"), Tag::Reference(Reference::Input));
        assert_eq!(classify("response"), Tag::Reference(Reference::Reply));
        assert_eq!(classify("formal"), Tag::Case(CaseTransform::Formal));
    }

    #[test]
    fn old_style_get() {
        assert_eq!(classify("get_name"), Tag::LegacyGet("name".into()));
        assert_eq!(classify("get_"), Tag::Unknown);
    }

    #[test]
    fn html_is_unknown_but_ignored() {
        assert_eq!(classify("em"), Tag::Unknown);
        assert!(is_ignored("em"));
        assert!(!is_ignored("gender"));
    }
}
