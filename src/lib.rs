pub mod app;
pub mod category;
pub mod config;
pub mod error;
pub mod rivescript;
pub mod sink;
pub mod tags;
pub mod transducer;
pub mod xmlmodel;

pub use app::App;
pub use category::{Category, ParsedAiml};
pub use config::{Config, Options};
pub use error::{Error, Warning};
pub use transducer::{convert, Conversion, Transducer};
pub use xmlmodel::{tokenize, Token};
