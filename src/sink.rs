//! Routing of text into whichever buffer the innermost open construct owns.
//!
//! The base buffer collects the text of the current container (pattern,
//! that or template). `<set>`, `<random>` and `<condition>` push a frame
//! when they open and pop it when they close, so text always lands in the
//! innermost construct.

#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    /// Inside `<set>`. `name` is `None` when the tag had no name attribute.
    Assignment { name: Option<String>, value: String },
    /// Inside `<random>`; one string per `<li>`.
    Random { alternatives: Vec<String> },
    /// Inside `<condition>`.
    Condition {
        variable: Option<String>,
        branches: Vec<String>,
        /// Set by an `<li>` without a value. From then on text goes to the
        /// enclosing buffer as the default reply.
        fallback: bool,
    },
}

impl Frame {
    /// Append text to this frame. Returns `false` if the frame does not
    /// take text right now and it should go further out.
    fn accept(&mut self, text: &str) -> bool {
        match self {
            Frame::Assignment { value, .. } => value.push_str(text),
            Frame::Random { alternatives } => match alternatives.last_mut() {
                Some(last) => last.push_str(text),
                None => alternatives.push(text.to_string()),
            },
            Frame::Condition { fallback: true, .. } => return false,
            // Stray text before the first <li> has no branch to belong to.
            Frame::Condition { branches, .. } => {
                if let Some(last) = branches.last_mut() {
                    last.push_str(text);
                }
            }
        }
        true
    }
}

#[derive(Debug, Default)]
pub struct Sinks {
    text: String,
    frames: Vec<Frame>,
}

impl Sinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route text to the innermost frame that takes it, or the base buffer.
    pub fn push_str(&mut self, text: &str) {
        for frame in self.frames.iter_mut().rev() {
            if frame.accept(text) {
                return;
            }
        }
        self.text.push_str(text);
    }

    /// Start a fresh base buffer (on a container open).
    pub fn clear_text(&mut self) {
        self.text.clear();
    }

    pub fn take_text(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn open(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame if `is_kind` accepts it. A mismatch leaves
    /// the stack untouched.
    pub fn close(&mut self, is_kind: impl Fn(&Frame) -> bool) -> Option<Frame> {
        if self.frames.last().is_some_and(|f| is_kind(f)) {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn in_random(&self) -> bool {
        self.frames.iter().any(|f| matches!(f, Frame::Random { .. }))
    }

    /// The nearest enclosing `<random>` or `<condition>`, which owns any
    /// `<li>` seen now.
    pub fn list_owner(&mut self) -> Option<&mut Frame> {
        self.frames
            .iter_mut()
            .rev()
            .find(|f| matches!(f, Frame::Random { .. } | Frame::Condition { .. }))
    }

    /// Drop every open frame. Used when a new category starts so nothing
    /// left over by malformed markup leaks into it.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.text.clear();
    }
}
