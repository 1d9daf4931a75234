//! Settings of a crawl and the checks every candidate article goes through.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::date::{DateRange, DATE_FORMAT};
use crate::error::PressespiegelError;
use crate::keywords::{KeywordConfig, KeywordMatcher, Keywords};
use crate::text::{word_count, TokenSequence};
use crate::topic::Topic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// The topic articles are collected for.
    topic: Topic,
    /// Publication window of relevant articles.
    date_range: DateRange,
    /// Minimum number of words of an article's body.
    article_length: usize,
    /// Keyword policy of the topic.
    keywords: KeywordConfig,
}

impl CrawlSettings {
    /// Default minimum number of words.
    pub const DEFAULT_ARTICLE_LENGTH: usize = 150;

    /// Convenience method to create a [`CrawlSettingsBuilder`]
    #[inline]
    pub fn builder() -> CrawlSettingsBuilder {
        CrawlSettingsBuilder::default()
    }

    /// The presets of `topic`.
    pub fn for_topic(topic: Topic) -> Result<Self, PressespiegelError> {
        CrawlSettings::builder().topic(topic).build()
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    pub fn article_length(&self) -> usize {
        self.article_length
    }

    pub fn keywords(&self) -> &KeywordConfig {
        &self.keywords
    }

    pub fn is_out_of_date(&self, date: &NaiveDateTime) -> bool {
        self.date_range.is_out_of_date(date)
    }

    /// Whether the text has at least `article_length` words.
    pub fn has_min_length(&self, text: &str) -> bool {
        word_count(text) >= self.article_length
    }
}

#[derive(Debug, Default)]
pub struct CrawlSettingsBuilder {
    /// The topic articles are collected for.
    topic: Option<Topic>,
    /// First day of the publication window, `dd.mm.YYYY`.
    start_date: Option<String>,
    /// Last day of the publication window, `dd.mm.YYYY`.
    end_date: Option<String>,
    /// Minimum number of words of an article's body.
    article_length: Option<usize>,
    /// Keyword stems, replacing the topic's presets.
    keywords: Option<Keywords>,
    /// Minimum number of keyword matches.
    min_frequency: Option<usize>,
    /// Minimum token distance between keyword matches.
    min_distance: Option<usize>,
}

impl CrawlSettingsBuilder {
    pub fn topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn start_date<T: ToString>(mut self, start_date: T) -> Self {
        self.start_date = Some(start_date.to_string());
        self
    }

    pub fn end_date<T: ToString>(mut self, end_date: T) -> Self {
        self.end_date = Some(end_date.to_string());
        self
    }

    pub fn article_length(mut self, article_length: usize) -> Self {
        self.article_length = Some(article_length);
        self
    }

    pub fn keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = Some(keywords);
        self
    }

    pub fn min_frequency(mut self, min_frequency: usize) -> Self {
        self.min_frequency = Some(min_frequency);
        self
    }

    pub fn min_distance(mut self, min_distance: usize) -> Self {
        self.min_distance = Some(min_distance);
        self
    }

    pub fn build(self) -> Result<CrawlSettings, PressespiegelError> {
        let topic = self.topic.unwrap_or_default();
        let preset = topic.date_range();
        let date_range = match (self.start_date, self.end_date) {
            (None, None) => preset,
            (start, end) => {
                let start =
                    start.unwrap_or_else(|| preset.start().format(DATE_FORMAT).to_string());
                let end = end.unwrap_or_else(|| preset.end().format(DATE_FORMAT).to_string());
                DateRange::parse(&start, &end)?
            }
        };

        let keywords = KeywordConfig::builder()
            .keywords(self.keywords.unwrap_or_else(|| topic.keywords()))
            .min_frequency(
                self.min_frequency
                    .unwrap_or(KeywordConfig::DEFAULT_MIN_FREQUENCY),
            )
            .min_distance(
                self.min_distance
                    .unwrap_or(KeywordConfig::DEFAULT_MIN_DISTANCE),
            )
            .build()?;

        Ok(CrawlSettings {
            topic,
            date_range,
            article_length: self
                .article_length
                .unwrap_or(CrawlSettings::DEFAULT_ARTICLE_LENGTH),
            keywords,
        })
    }
}

/// Why a candidate article was kept or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum Verdict {
    /// The article has no publication date.
    MissingDate,
    /// Published outside the date range.
    OutOfDate,
    /// Fewer words than required.
    TooShort { words: usize },
    /// Keyword requirements not met.
    Irrelevant,
    /// The article is kept, tagged with the matched keyword stems.
    Relevant { query_keywords: Vec<String> },
}

impl Verdict {
    pub fn is_relevant(&self) -> bool {
        matches!(self, Verdict::Relevant { .. })
    }
}

/// Runs the date, length and keyword checks on candidate articles.
///
/// Cheap to clone, clones share the settings.
#[derive(Debug, Clone)]
pub struct ArticleValidator {
    settings: Arc<CrawlSettings>,
    matcher: Arc<KeywordMatcher>,
}

impl ArticleValidator {
    pub fn new(settings: CrawlSettings) -> Self {
        let matcher = KeywordMatcher::new(settings.keywords.clone());
        Self {
            settings: Arc::new(settings),
            matcher: Arc::new(matcher),
        }
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    pub fn matcher(&self) -> &KeywordMatcher {
        &self.matcher
    }

    /// Check a candidate's publication date and body text, in that order.
    pub fn validate(&self, published: Option<&NaiveDateTime>, text: &str) -> Verdict {
        let published = match published {
            Some(date) => date,
            None => return Verdict::MissingDate,
        };
        if self.settings.is_out_of_date(published) {
            return Verdict::OutOfDate;
        }
        let words = word_count(text);
        if words < self.settings.article_length {
            return Verdict::TooShort { words };
        }
        match self
            .matcher
            .evaluate(&TokenSequence::tokenize(text))
            .into_query_keywords()
        {
            Some(query_keywords) => Verdict::Relevant { query_keywords },
            None => Verdict::Irrelevant,
        }
    }
}

/// Counters of a crawl, persisted as `core_stats.json`.
///
/// Fields are declared in alphabetical order so the json keys are sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub finish_time: Option<NaiveDateTime>,
    pub item_irrelevant_count: usize,
    pub item_missing_date_count: usize,
    pub item_out_of_date_count: usize,
    pub item_scraped_count: usize,
    pub item_too_short_count: usize,
    pub start_time: NaiveDateTime,
}

impl CrawlStats {
    pub fn start() -> Self {
        Self {
            finish_time: None,
            item_irrelevant_count: 0,
            item_missing_date_count: 0,
            item_out_of_date_count: 0,
            item_scraped_count: 0,
            item_too_short_count: 0,
            start_time: Local::now().naive_local(),
        }
    }

    pub fn record(&mut self, verdict: &Verdict) {
        debug!("candidate article: {:?}", verdict);
        let counter = match verdict {
            Verdict::MissingDate => &mut self.item_missing_date_count,
            Verdict::OutOfDate => &mut self.item_out_of_date_count,
            Verdict::TooShort { .. } => &mut self.item_too_short_count,
            Verdict::Irrelevant => &mut self.item_irrelevant_count,
            Verdict::Relevant { .. } => &mut self.item_scraped_count,
        };
        *counter += 1;
    }

    pub fn finish(&mut self) {
        self.finish_time = Some(Local::now().naive_local());
    }
}
