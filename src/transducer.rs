//! The AIML tag-stream transducer.
//!
//! [`Transducer::feed`] takes one [`Token`] at a time. Each tag is classified,
//! the state it controls is updated, and the tag resolves to a [`Step`]:
//! either nothing to write, RiveScript replacement text, or the tag's own
//! markup for anything we do not understand. Text and replacement text are
//! routed through [`Sinks`] into the innermost open construct.

use tracing::debug;

use crate::category::{CategoryBuilder, ParsedAiml};
use crate::config::{Options, DEFAULT_TOPIC};
use crate::error::{Error, Warning};
use crate::sink::{Frame, Sinks};
use crate::tags::{classify, is_ignored, Container, Scope, Tag};
use crate::xmlmodel::{tokenize, Attributes, Token};

/// Value stored when `<set>` has no content.
const UNDEF: &str = "<undef>";
/// Separator between `{random}` alternatives.
const RANDOM_SEPARATOR: &str = "|";

/// Everything produced from one AIML document.
#[derive(Debug, Default)]
pub struct Conversion {
    pub parsed: ParsedAiml,
    pub warnings: Vec<Warning>,
}

/// What a tag contributes to the active buffer.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// State change only.
    Silent,
    /// RiveScript replacement text.
    Emit(String),
    /// Not translated; the literal markup is kept.
    Passthrough,
}

pub struct Transducer {
    options: Options,
    topic: String,
    container: Option<Container>,
    in_category: bool,
    category: CategoryBuilder,
    sinks: Sinks,
    thinking: bool,
    parsed: ParsedAiml,
    warnings: Vec<Warning>,
}

impl Transducer {
    pub fn new(options: Options) -> Self {
        Transducer {
            options,
            topic: DEFAULT_TOPIC.to_string(),
            container: None,
            in_category: false,
            category: CategoryBuilder::new(),
            sinks: Sinks::new(),
            thinking: false,
            parsed: ParsedAiml::new(),
            warnings: Vec::new(),
        }
    }

    pub fn feed(&mut self, token: Token) {
        match &token {
            Token::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.sinks.push_str(text);
                }
            }
            Token::Open { name, attrs } => {
                let lname = name.to_ascii_lowercase();
                debug!("[S] {}", lname);
                let step = self.open(classify(&lname), attrs);
                self.apply(step, &token, &lname);
            }
            Token::Close { name } => {
                let lname = name.to_ascii_lowercase();
                debug!("[E] {}", lname);
                let step = self.close(classify(&lname));
                self.apply(step, &token, &lname);
            }
        }
    }

    /// End of stream. A category that never closed is abandoned.
    pub fn finish(self) -> Conversion {
        if self.in_category {
            debug!(
                "Abandoning unterminated category with pattern '{}'",
                self.category.pattern()
            );
        }
        Conversion {
            parsed: self.parsed,
            warnings: self.warnings,
        }
    }

    /// Route a tag's contribution. Untranslated tags keep their markup; only
    /// the opening tag of an element warns, so each unknown element is
    /// reported once.
    fn apply(&mut self, step: Step, token: &Token, lname: &str) {
        match step {
            Step::Silent => {}
            Step::Emit(text) => self.sinks.push_str(&text),
            Step::Passthrough => {
                let markup = token.markup();
                self.sinks.push_str(&markup);
                if matches!(token, Token::Open { .. }) && !is_ignored(lname) {
                    self.warn(Warning::UnhandledTag { markup });
                }
            }
        }
    }

    fn warn(&mut self, warning: Warning) {
        debug!("warning: {}", warning);
        self.warnings.push(warning);
    }

    fn open(&mut self, tag: Tag, attrs: &Attributes) -> Step {
        match tag {
            Tag::Root => Step::Silent,
            Tag::Topic => {
                if self.options.real_topics {
                    self.topic = attrs.get("name").unwrap_or(DEFAULT_TOPIC).to_string();
                    debug!("Set RiveScript topic to {}", self.topic);
                }
                Step::Silent
            }
            Tag::Category => {
                self.category = CategoryBuilder::new();
                self.in_category = true;
                self.container = None;
                self.sinks.reset();
                Step::Silent
            }
            // Inside a template <that/> reads the previous reply.
            Tag::Container(Container::That) if self.container == Some(Container::Template) => {
                Step::Emit(reference("reply", attrs.get("index")))
            }
            Tag::Container(container) => {
                self.container = Some(container);
                self.sinks.clear_text();
                Step::Silent
            }
            Tag::Think => {
                self.thinking = true;
                Step::Silent
            }
            Tag::Random => {
                if self.sinks.in_random() {
                    let pattern = self.category.pattern().to_string();
                    self.warn(Warning::NestedRandom { pattern });
                    self.category.taint();
                }
                self.sinks.open(Frame::Random { alternatives: Vec::new() });
                Step::Silent
            }
            Tag::Condition => {
                let variable = attrs.get("name").map(|n| variable_name(n, &self.options));
                self.sinks.open(Frame::Condition {
                    variable,
                    branches: Vec::new(),
                    fallback: false,
                });
                Step::Silent
            }
            Tag::Item => {
                self.item(attrs);
                Step::Silent
            }
            Tag::Set => {
                let name = attrs.get("name").map(str::to_string);
                debug!("Found opening <set> tag for name={:?}", name);
                self.sinks.open(Frame::Assignment { name, value: String::new() });
                Step::Silent
            }
            Tag::Reference(r) => Step::Emit(reference(r.rivescript(), attrs.get("index"))),
            Tag::BotStar => Step::Emit(reference("botstar", attrs.get("index"))),
            Tag::Id => Step::Emit("<id>".into()),
            Tag::Variable(scope) => match attrs.get("name") {
                Some(name) => Step::Emit(match scope {
                    Scope::Bot => format!("<bot {}>", name),
                    Scope::User => format!("<get {}>", variable_name(name, &self.options)),
                }),
                None => Step::Passthrough,
            },
            Tag::LegacyGet(name) => {
                Step::Emit(format!("<get {}>", variable_name(&name, &self.options)))
            }
            Tag::Srai => Step::Emit("{@".into()),
            Tag::Sr => Step::Emit("<@>".into()),
            Tag::Person => Step::Emit("<person>".into()),
            Tag::Case(case) => Step::Emit(format!("{{{}}}", case.rivescript())),
            Tag::Date => {
                let format = attrs.get("format").map(|f| format!(" {}", f));
                Step::Emit(format!("<call>date{}</call>", format.unwrap_or_default()))
            }
            Tag::Size => Step::Emit("<call>size</call>".into()),
            Tag::Unknown => Step::Passthrough,
        }
    }

    fn close(&mut self, tag: Tag) -> Step {
        match tag {
            Tag::Topic => {
                if self.options.real_topics {
                    self.topic = DEFAULT_TOPIC.to_string();
                }
                Step::Silent
            }
            Tag::Category => {
                self.in_category = false;
                self.container = None;
                let builder = std::mem::take(&mut self.category);
                match builder.finish() {
                    Some(category) => self.parsed.push(&self.topic, category),
                    None => debug!("Category was tainted! Skipping!"),
                }
                Step::Silent
            }
            Tag::Container(Container::That) if self.container == Some(Container::Template) => {
                Step::Silent
            }
            Tag::Container(container) => {
                let text = self.sinks.take_text();
                self.category.fill(container, text);
                self.container = None;
                Step::Silent
            }
            Tag::Think => {
                self.thinking = false;
                Step::Silent
            }
            Tag::Random => match self.sinks.close(|f| matches!(f, Frame::Random { .. })) {
                Some(Frame::Random { alternatives }) => Step::Emit(join_random(alternatives)),
                _ => Step::Silent,
            },
            Tag::Condition => {
                if let Some(Frame::Condition { branches, .. }) =
                    self.sinks.close(|f| matches!(f, Frame::Condition { .. }))
                {
                    self.category.add_conditions(branches);
                }
                Step::Silent
            }
            Tag::Set => match self.sinks.close(|f| matches!(f, Frame::Assignment { .. })) {
                Some(Frame::Assignment { name: Some(name), value }) => {
                    let text = self.assignment(&name, value);
                    debug!("End <set> tag with buffer: {}", text);
                    Step::Emit(text)
                }
                // Without a name there is nothing to assign; keep the content.
                Some(Frame::Assignment { name: None, value }) => Step::Emit(value),
                _ => Step::Silent,
            },
            Tag::Srai => Step::Emit("}".into()),
            Tag::Case(case) => Step::Emit(format!("{{/{}}}", case.rivescript())),
            Tag::Unknown => Step::Passthrough,
            Tag::Root
            | Tag::Item
            | Tag::Reference(_)
            | Tag::BotStar
            | Tag::Id
            | Tag::Variable(_)
            | Tag::LegacyGet(_)
            | Tag::Sr
            | Tag::Person
            | Tag::Date
            | Tag::Size => Step::Silent,
        }
    }

    /// `<li>` opens an alternative in a `<random>` or a branch in a
    /// `<condition>`, whichever is nearer. Outside both it does nothing.
    fn item(&mut self, attrs: &Attributes) {
        let unresolved = match self.sinks.list_owner() {
            Some(Frame::Random { alternatives }) => {
                alternatives.push(String::new());
                false
            }
            Some(Frame::Condition { fallback: true, .. }) => false,
            Some(Frame::Condition {
                variable,
                branches,
                fallback,
            }) => {
                let name = attrs
                    .get("name")
                    .map(|n| variable_name(n, &self.options))
                    .or_else(|| variable.clone());
                match (name, attrs.get("value")) {
                    (None, _) => true,
                    (Some(name), Some(value)) => {
                        branches.push(branch(&name, value));
                        false
                    }
                    // The default item: its text becomes the plain reply.
                    (Some(_), None) => {
                        *fallback = true;
                        false
                    }
                }
            }
            _ => false,
        };
        if unresolved {
            let pattern = self.category.pattern().to_string();
            self.warn(Warning::AmbiguousCondition { pattern });
        }
    }

    fn assignment(&self, name: &str, value: String) -> String {
        let name = variable_name(name, &self.options);
        let value = if value.is_empty() {
            UNDEF.to_string()
        } else if name == "name" {
            format!("{{formal}}{}{{/formal}}", value)
        } else {
            value
        };

        let mut text = format!("<set {}={}>", name, value);
        if !self.thinking {
            text.push_str(&format!("<get {}>", name));
        }
        text
    }
}

/// AIML's `topic` variable would switch RiveScript topics, so it is renamed
/// unless real topics are in use.
fn variable_name(name: &str, options: &Options) -> String {
    if name == "topic" && !options.real_topics {
        "alicetopic".to_string()
    } else {
        name.to_string()
    }
}

/// `<tag>` for the first index, `<tagN>` otherwise. AIML two-part indexes
/// (`"2,1"`) use their first part.
fn reference(tag: &str, index: Option<&str>) -> String {
    let index = index
        .and_then(|i| i.split(',').next())
        .map(str::trim)
        .unwrap_or("1");
    if index.is_empty() || index == "1" {
        format!("<{}>", tag)
    } else {
        format!("<{}{}>", tag, index)
    }
}

fn branch(name: &str, value: &str) -> String {
    let value = if value.eq_ignore_ascii_case("unknown") || value.eq_ignore_ascii_case("om") {
        "undefined"
    } else {
        value
    };
    if value == "*" {
        format!("<get {}> != undefined => ", name)
    } else {
        format!("<get {}> == {} => ", name, value)
    }
}

fn join_random(alternatives: Vec<String>) -> String {
    let alternatives: Vec<&str> = alternatives
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    format!("{{random}}{}{{/random}}", alternatives.join(RANDOM_SEPARATOR))
}

/// Convert a whole AIML document.
pub fn convert(text: &str, options: Options) -> Result<Conversion, Error> {
    let mut transducer = Transducer::new(options);
    for token in tokenize(text) {
        transducer.feed(token?);
    }
    Ok(transducer.finish())
}
