use chrono::{Local, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::clean::remove_empty_paragraphs;
use crate::date::german_date;
use crate::error::PressespiegelError;

/// Maximum number of recommendations kept per article.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// A relevant article as it is stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Name of the news outlet, e.g. `spiegel`.
    pub news_outlet: String,
    /// The url the article was found at.
    pub provenance: Url,
    /// Authors that are persons.
    #[serde(default, deserialize_with = "lenient_names")]
    pub author_person: Vec<String>,
    /// Authors that are organizations, e.g. news agencies.
    #[serde(default, deserialize_with = "lenient_names")]
    pub author_organization: Vec<String>,
    /// When the article was first published.
    #[serde(with = "german_date")]
    pub creation_date: NaiveDate,
    /// Last time the article was updated.
    #[serde(default, with = "german_date::option")]
    pub last_modified: Option<NaiveDate>,
    /// When the article was crawled.
    #[serde(with = "german_date")]
    pub crawl_date: NaiveDate,
    /// Title, description and body.
    pub content: ArticleContent,
    /// Keywords the outlet tagged the article with.
    #[serde(default, deserialize_with = "lenient_names")]
    pub news_keywords: Vec<String>,
    /// Links to related articles of the same outlet.
    #[serde(default, deserialize_with = "lenient_names")]
    pub recommendations: Vec<String>,
    /// The topic's keyword stems found in the article.
    #[serde(default, deserialize_with = "lenient_names")]
    pub query_keywords: Vec<String>,
}

impl Article {
    /// Convenience method for creating a new [`ArticleBuilder`]
    ///
    /// Same as calling [`ArticleBuilder::new`]
    pub fn builder<T: ToString>(news_outlet: T, provenance: Url) -> ArticleBuilder {
        ArticleBuilder::new(news_outlet, provenance)
    }

    /// The article's body as a single text, paragraphs joined by a space.
    pub fn body_text(&self) -> String {
        self.content.body_text()
    }
}

/// The textual content of an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleContent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Paragraphs grouped by the headline they follow, the paragraphs before
    /// the first headline are stored under the empty headline.
    #[serde(default)]
    pub body: IndexMap<String, Vec<String>>,
}

impl ArticleContent {
    /// All paragraphs in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.body.values().flatten().map(String::as_str)
    }

    pub fn body_text(&self) -> String {
        self.paragraphs()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Accepts `null`, a single name, or nested lists of names and `null`s.
fn lenient_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Names {
        One(String),
        Many(Vec<Option<Names>>),
        Other(serde::de::IgnoredAny),
    }

    fn flatten(names: Names, out: &mut Vec<String>) {
        match names {
            Names::One(name) => out.push(name),
            Names::Many(names) => names.into_iter().flatten().for_each(|n| flatten(n, out)),
            Names::Other(_) => {}
        }
    }

    let mut out = Vec::new();
    if let Some(names) = Option::<Names>::deserialize(deserializer)? {
        flatten(names, &mut out);
    }
    Ok(out)
}

#[derive(Debug)]
pub struct ArticleBuilder {
    news_outlet: String,
    provenance: Url,
    author_person: Vec<String>,
    author_organization: Vec<String>,
    creation_date: Option<NaiveDate>,
    last_modified: Option<NaiveDate>,
    crawl_date: Option<NaiveDate>,
    title: Option<String>,
    description: Option<String>,
    body: IndexMap<String, Vec<String>>,
    news_keywords: Vec<String>,
    recommendations: Vec<String>,
    query_keywords: Vec<String>,
}

impl ArticleBuilder {
    pub fn new<T: ToString>(news_outlet: T, provenance: Url) -> Self {
        ArticleBuilder {
            news_outlet: news_outlet.to_string(),
            provenance,
            author_person: Vec::new(),
            author_organization: Vec::new(),
            creation_date: None,
            last_modified: None,
            crawl_date: None,
            title: None,
            description: None,
            body: IndexMap::new(),
            news_keywords: Vec::new(),
            recommendations: Vec::new(),
            query_keywords: Vec::new(),
        }
    }

    pub fn author_person(mut self, authors: Vec<String>) -> Self {
        self.author_person = authors;
        self
    }

    pub fn author_organization(mut self, authors: Vec<String>) -> Self {
        self.author_organization = authors;
        self
    }

    pub fn creation_date(mut self, date: NaiveDate) -> Self {
        self.creation_date = Some(date);
        self
    }

    pub fn last_modified(mut self, date: NaiveDate) -> Self {
        self.last_modified = Some(date);
        self
    }

    pub fn crawl_date(mut self, date: NaiveDate) -> Self {
        self.crawl_date = Some(date);
        self
    }

    pub fn title<T: ToString>(mut self, title: T) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn description<T: ToString>(mut self, description: T) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Append the paragraphs following `headline`, empty paragraphs are
    /// dropped.
    pub fn section<T: ToString>(mut self, headline: T, paragraphs: Vec<String>) -> Self {
        self.body
            .entry(headline.to_string())
            .or_default()
            .extend(remove_empty_paragraphs(paragraphs));
        self
    }

    /// Split the outlet's comma separated keyword list.
    pub fn news_keywords(mut self, keywords: &str) -> Self {
        self.news_keywords = keywords
            .split(", ")
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Keeps the first [`MAX_RECOMMENDATIONS`] links.
    pub fn recommendations(mut self, mut recommendations: Vec<String>) -> Self {
        recommendations.truncate(MAX_RECOMMENDATIONS);
        self.recommendations = recommendations;
        self
    }

    pub fn query_keywords(mut self, query_keywords: Vec<String>) -> Self {
        self.query_keywords = query_keywords;
        self
    }

    /// The crawl date defaults to today.
    pub fn build(self) -> Result<Article, PressespiegelError> {
        let provenance = &self.provenance;
        let creation_date = self.creation_date.ok_or_else(|| {
            PressespiegelError::invalid_input(format!(
                "article {} has no creation date",
                provenance
            ))
        })?;
        let title = match self.title {
            Some(title) => title,
            None => {
                return Err(PressespiegelError::invalid_input(format!(
                    "article {} has no title",
                    provenance
                )))
            }
        };

        Ok(Article {
            news_outlet: self.news_outlet,
            provenance: self.provenance,
            author_person: self.author_person,
            author_organization: self.author_organization,
            creation_date,
            last_modified: self.last_modified,
            crawl_date: self
                .crawl_date
                .unwrap_or_else(|| Local::now().naive_local().date()),
            content: ArticleContent {
                title,
                description: self.description,
                body: self.body,
            },
            news_keywords: self.news_keywords,
            recommendations: self.recommendations,
            query_keywords: self.query_keywords,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://www.spiegel.de/politik/asyl-a-1.html").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn build_article() {
        let article = Article::builder("spiegel", url())
            .title("Asyl")
            .creation_date(date(2020, 3, 1))
            .crawl_date(date(2020, 10, 1))
            .section("", vec!["Erster Absatz.".into(), " ".into(), "".into()])
            .section("Zwischentitel", vec!["Zweiter Absatz.".into()])
            .news_keywords("Asyl, Migration, ")
            .recommendations((0..8).map(|i| format!("/artikel-{}", i)).collect())
            .build()
            .unwrap();

        assert_eq!(article.body_text(), "Erster Absatz. Zweiter Absatz.");
        assert_eq!(article.content.body.len(), 2);
        assert_eq!(article.news_keywords, vec!["Asyl", "Migration"]);
        assert_eq!(article.recommendations.len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn missing_fields_are_invalid_input() {
        let err = Article::builder("spiegel", url()).title("Asyl").build().unwrap_err();
        assert!(matches!(err, PressespiegelError::InvalidInput { .. }));
        let err = Article::builder("spiegel", url())
            .creation_date(date(2020, 3, 1))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            PressespiegelError::InvalidInput {
                reason: format!("article {} has no title", url())
            }
        );
    }

    #[test]
    fn json_layout() {
        let article = Article::builder("spiegel", url())
            .title("Asyl")
            .creation_date(date(2020, 3, 1))
            .crawl_date(date(2020, 10, 1))
            .query_keywords(vec!["asyl".into()])
            .build()
            .unwrap();
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["creation_date"], "01.03.2020");
        assert_eq!(json["last_modified"], serde_json::Value::Null);
        assert_eq!(json["content"]["title"], "Asyl");
        assert_eq!(json["query_keywords"][0], "asyl");

        let back: Article = serde_json::from_value(json).unwrap();
        assert_eq!(back, article);
    }

    #[test]
    fn lenient_raw_fields() {
        let json = r#"{
            "news_outlet": "compact",
            "provenance": "https://www.compact-online.de/a/",
            "author_person": [["Jan Muster", null]],
            "author_organization": "dpa",
            "creation_date": "05.12.2019",
            "last_modified": "",
            "crawl_date": "01.10.2020",
            "content": {"title": " Titel ", "description": null, "body": {"": ["a"], "Kopf": ["b", "c"]}},
            "news_keywords": null,
            "recommendations": 1.5
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.author_person, vec!["Jan Muster"]);
        assert_eq!(article.author_organization, vec!["dpa"]);
        assert_eq!(article.last_modified, None);
        assert!(article.news_keywords.is_empty());
        assert!(article.recommendations.is_empty());
        assert!(article.query_keywords.is_empty());
        assert_eq!(
            article.content.body.keys().collect::<Vec<_>>(),
            vec!["", "Kopf"]
        );
    }
}
