pub use article::{Article, ArticleBuilder, ArticleContent};
pub use crawl::{ArticleValidator, CrawlSettings, CrawlSettingsBuilder, CrawlStats, Verdict};
pub use date::DateRange;
pub use error::PressespiegelError;
pub use keywords::{Decision, KeywordConfig, KeywordConfigBuilder, KeywordMatcher, Keywords};
pub use language::Language;
pub use storage::ArticleStore;
pub use text::{tokenize, TokenSequence};
pub use topic::Topic;

pub mod article;
pub mod clean;
pub mod corpus;
pub mod crawl;
pub mod date;
mod error;
pub mod keywords;
pub mod language;
pub mod storage;
pub mod text;
pub mod topic;
