pub mod errors;
pub mod models;

pub use errors::LexineError;
pub use models::{ GeneratedContent, LanguageConfig, PartOfSpeech, VocabularyItem, WordId };
