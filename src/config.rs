use std::path::PathBuf;

/// Name of the topic every category lands in unless real topics are on.
pub const DEFAULT_TOPIC: &str = "random";

/// Settings that change how a token stream is transduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Turn AIML `<topic name="x">` sections into RiveScript `> topic x`
    /// blocks. When off, everything goes into the default topic and
    /// `<set name="topic">` is renamed so it cannot switch RiveScript topics.
    pub real_topics: bool,
}

/// Settings for a whole directory conversion.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: Options,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Config {
            input: input.into(),
            output: output.into(),
            options: Options::default(),
        }
    }

    pub fn real_topics(mut self, real_topics: bool) -> Self {
        self.options.real_topics = real_topics;
        self
    }
}
