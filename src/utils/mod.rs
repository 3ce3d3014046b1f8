pub mod logging;
pub mod translation;

pub use translation::{BuiltinTranslator, Language, Translator};
