//! Turn the stored articles of a topic into a clean dataset.
//!
//! The raw dataset holds every stored article together with its
//! [`Annotations`]. Processing drops duplicates, non-German articles,
//! length outliers, news tickers and articles with forbidden patterns, and
//! flattens the remaining records into [`ProcessedArticle`]s.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use fnv::FnvHashSet;
use futures::{stream, StreamExt, TryStreamExt};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::article::Article;
use crate::clean::{
    contains_forbidden_pattern, count_subheaders, format_content, split_authors, FORBIDDEN_PATTERNS,
};
use crate::date::german_date;
use crate::language::Language;
use crate::topic::Topic;

/// Number of article files read concurrently.
const CONCURRENT_READS: usize = 16;

/// Read every stored article record of the topic below `root`.
///
/// Outlets are visited in alphabetical order and their records by number.
/// Outlets without a `json` directory are skipped.
pub async fn load_raw_corpus<P: AsRef<Path>>(root: P, topic: Topic) -> anyhow::Result<Vec<Article>> {
    let topic_dir = root.as_ref().join(topic.identifier());
    info!("Loading the raw articles from {}", topic_dir.display());

    let outlets = list_dir(&topic_dir).await?;
    let mut articles = Vec::new();
    for (idx, outlet) in outlets.iter().enumerate() {
        let json_dir = outlet.join("json");
        if tokio::fs::metadata(&json_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            let mut files = list_dir(&json_dir).await?;
            files.retain(|f| f.extension().and_then(|ext| ext.to_str()) == Some("json"));
            files.sort_by_key(|f| record_num(f));

            let mut outlet_articles = stream::iter(files)
                .map(|path| async move {
                    let content = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    serde_json::from_slice::<Article>(&content)
                        .with_context(|| format!("Failed to parse {}", path.display()))
                })
                .buffered(CONCURRENT_READS)
                .try_collect::<Vec<_>>()
                .await?;
            articles.append(&mut outlet_articles);
        } else {
            info!("Outlet {} has no articles", outlet.display());
        }
        debug!("Read files for {} of {} outlets", idx + 1, outlets.len());
    }

    info!("Loaded {} news articles", articles.len());
    Ok(articles)
}

/// All entries of `dir`, sorted by path.
async fn list_dir(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read {}", dir.display()))?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// Sort key of `<n>.json`, records with other names go last by name.
fn record_num(path: &Path) -> (usize, Option<String>) {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    match stem.parse() {
        Ok(num) => (num, None),
        Err(_) => (usize::MAX, Some(stem.to_string())),
    }
}

/// Properties derived from an article's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    /// Title and body rendered by [`format_content`].
    pub formatted_content: String,
    /// Detected language of the formatted content.
    pub language: Option<Language>,
    /// Number of characters of the formatted content.
    pub article_length: usize,
    /// Number of `<h2>` subheaders.
    pub number_subheaders: usize,
    /// Whether the content contains one of the [`FORBIDDEN_PATTERNS`].
    pub forbidden_pattern: bool,
}

impl Annotations {
    pub fn new(article: &Article) -> Self {
        let formatted_content = format_content(&article.content.title, &article.content.body);
        Self {
            language: Language::detect(&formatted_content),
            article_length: formatted_content.chars().count(),
            number_subheaders: count_subheaders(&formatted_content),
            forbidden_pattern: contains_forbidden_pattern(&formatted_content),
            formatted_content,
        }
    }
}

/// An entry of the raw dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedArticle {
    #[serde(flatten)]
    pub article: Article,
    #[serde(flatten)]
    pub annotations: Annotations,
}

pub fn annotate(article: Article) -> AnnotatedArticle {
    AnnotatedArticle {
        annotations: Annotations::new(&article),
        article,
    }
}

/// Annotate all articles.
pub fn annotate_corpus(articles: Vec<Article>) -> Vec<AnnotatedArticle> {
    info!("Annotating {} articles", articles.len());
    articles.into_iter().map(annotate).collect()
}

/// Which filters [`process`] applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    pub drop_duplicates: bool,
    pub drop_non_german: bool,
    pub drop_outliers: bool,
    pub drop_news_tickers: bool,
    /// Articles with more subheaders are considered news tickers.
    pub subheaders_threshold: usize,
    pub drop_forbidden_patterns: bool,
}

impl ProcessOptions {
    /// Default number of subheaders of a news ticker.
    pub const DEFAULT_SUBHEADERS_THRESHOLD: usize = 10;
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            drop_duplicates: true,
            drop_non_german: true,
            drop_outliers: true,
            drop_news_tickers: true,
            subheaders_threshold: ProcessOptions::DEFAULT_SUBHEADERS_THRESHOLD,
            drop_forbidden_patterns: true,
        }
    }
}

fn log_remaining(articles: Vec<AnnotatedArticle>) -> Vec<AnnotatedArticle> {
    info!("Number of observations remaining: {}", articles.len());
    articles
}

/// Keep the first of all articles with the same outlet and content.
pub fn drop_duplicates(articles: Vec<AnnotatedArticle>) -> Vec<AnnotatedArticle> {
    let mut seen = FnvHashSet::default();
    log_remaining(
        articles
            .into_iter()
            .filter(|a| {
                seen.insert((
                    a.article.news_outlet.clone(),
                    a.annotations.formatted_content.clone(),
                ))
            })
            .collect(),
    )
}

pub fn drop_non_german(articles: Vec<AnnotatedArticle>) -> Vec<AnnotatedArticle> {
    log_remaining(
        articles
            .into_iter()
            .filter(|a| a.annotations.language == Some(Language::German))
            .collect(),
    )
}

/// The `q` quantile of sorted values, linearly interpolated between the
/// closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (sorted.len() - 1) as f64 * q;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    sorted[lower] + (rank - lower as f64) * (sorted[upper] - sorted[lower])
}

/// Lower and upper bound of the values that are no outliers, `1.5` times the
/// interquartile range below the first and above the third quartile.
pub fn outlier_bounds(values: &[f64]) -> (f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q25 = quantile(&sorted, 0.25);
    let q75 = quantile(&sorted, 0.75);
    let iqr = q75 - q25;
    (q25 - 1.5 * iqr, q75 + 1.5 * iqr)
}

/// Drop too short and too long articles, judged on the log of their length.
pub fn drop_outliers(articles: Vec<AnnotatedArticle>) -> Vec<AnnotatedArticle> {
    let log_length = |a: &AnnotatedArticle| (a.annotations.article_length as f64).ln();
    let (lower, upper) =
        outlier_bounds(&articles.iter().map(log_length).collect::<Vec<_>>());
    debug!("log article length bounds: [{}, {}]", lower, upper);
    log_remaining(
        articles
            .into_iter()
            .filter(|a| {
                let len = log_length(a);
                lower <= len && len <= upper
            })
            .collect(),
    )
}

/// Drop articles with more than `subheaders_threshold` subheaders.
pub fn drop_news_tickers(
    articles: Vec<AnnotatedArticle>,
    subheaders_threshold: usize,
) -> Vec<AnnotatedArticle> {
    log_remaining(
        articles
            .into_iter()
            .filter(|a| a.annotations.number_subheaders <= subheaders_threshold)
            .collect(),
    )
}

pub fn drop_forbidden_patterns(articles: Vec<AnnotatedArticle>) -> Vec<AnnotatedArticle> {
    log_remaining(
        articles
            .into_iter()
            .filter(|a| !a.annotations.forbidden_pattern)
            .collect(),
    )
}

/// An entry of the processed dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedArticle {
    pub news_outlet: String,
    pub provenance: Url,
    pub author_person: Vec<String>,
    pub author_organization: Vec<String>,
    #[serde(with = "german_date")]
    pub creation_date: NaiveDate,
    #[serde(default, with = "german_date::option")]
    pub last_modified: Option<NaiveDate>,
    #[serde(with = "german_date")]
    pub crawl_date: NaiveDate,
    /// Trimmed title.
    pub title: String,
    /// Trimmed description, empty if the article has none.
    pub description: String,
    /// All non-empty paragraphs joined by a space.
    pub body: String,
    pub news_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    pub query_keywords: Vec<String>,
    #[serde(flatten)]
    pub annotations: Annotations,
}

impl From<AnnotatedArticle> for ProcessedArticle {
    fn from(annotated: AnnotatedArticle) -> Self {
        let AnnotatedArticle {
            article,
            annotations,
        } = annotated;
        let body = article.body_text();
        ProcessedArticle {
            news_outlet: article.news_outlet,
            provenance: article.provenance,
            author_person: split_authors(article.author_person),
            author_organization: split_authors(article.author_organization),
            creation_date: article.creation_date,
            last_modified: article.last_modified,
            crawl_date: article.crawl_date,
            title: article.content.title.trim().to_string(),
            description: article
                .content
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            body,
            news_keywords: article.news_keywords,
            recommendations: article.recommendations,
            query_keywords: article.query_keywords,
            annotations,
        }
    }
}

/// Apply the configured filters in order and finalize the remaining
/// articles.
pub fn process(articles: Vec<AnnotatedArticle>, options: &ProcessOptions) -> Vec<ProcessedArticle> {
    info!("Processing raw dataset with {} news articles", articles.len());
    let mut articles = articles;
    if options.drop_duplicates {
        info!("Dropping duplicates");
        articles = drop_duplicates(articles);
    }
    if options.drop_non_german {
        info!("Dropping non-German articles");
        articles = drop_non_german(articles);
    }
    if options.drop_outliers {
        info!("Dropping outliers, e.g. too short or too long articles");
        articles = drop_outliers(articles);
    }
    if options.drop_news_tickers {
        info!(
            "Dropping articles with more than {} subheaders, these are considered news tickers",
            options.subheaders_threshold
        );
        articles = drop_news_tickers(articles, options.subheaders_threshold);
    }
    if options.drop_forbidden_patterns {
        info!(
            "Dropping articles that contain a forbidden pattern: {}",
            FORBIDDEN_PATTERNS.join(" & ")
        );
        articles = drop_forbidden_patterns(articles);
    }
    info!(
        "Finished processing dataset, final dataset has {} news articles",
        articles.len()
    );
    articles.into_iter().map(ProcessedArticle::from).collect()
}

/// The two stages of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// All stored articles with their annotations.
    Raw,
    /// The filtered and finalized articles.
    Processed,
}

impl DatasetKind {
    pub fn identifier(&self) -> &'static str {
        match self {
            DatasetKind::Raw => "raw",
            DatasetKind::Processed => "processed",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Location of the cached dataset: `<root>/dataset/<topic>_<kind>.json`.
pub fn cache_path<P: AsRef<Path>>(root: P, topic: Topic, kind: DatasetKind) -> PathBuf {
    root.as_ref()
        .join("dataset")
        .join(format!("{}_{}.json", topic, kind))
}

/// Write the dataset as json to `path`, creating missing directories.
pub async fn cache_dataset<T: Serialize>(path: &Path, dataset: &[T]) -> anyhow::Result<()> {
    info!("Caching {} articles to {}", dataset.len(), path.display());
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, serde_json::to_vec(dataset)?)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub async fn load_cached_dataset<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let dataset: Vec<T> = serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    info!("Loaded {} articles from {}", dataset.len(), path.display());
    Ok(dataset)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Load and annotate the stored articles.
async fn create_raw_dataset(root: &Path, topic: Topic) -> anyhow::Result<Vec<AnnotatedArticle>> {
    Ok(annotate_corpus(load_raw_corpus(root, topic).await?))
}

/// Create the dataset of the topic unless it is cached already and return
/// the path of the cache.
///
/// The processed dataset is built from the cached raw dataset, which is
/// created and cached first if missing.
pub async fn build_dataset<P: AsRef<Path>>(
    root: P,
    topic: Topic,
    kind: DatasetKind,
    options: &ProcessOptions,
) -> anyhow::Result<PathBuf> {
    let root = root.as_ref();
    let path = cache_path(root, topic, kind);
    if is_file(&path).await {
        info!("The {} dataset has already been created and cached", kind);
        return Ok(path);
    }

    match kind {
        DatasetKind::Raw => {
            let raw = create_raw_dataset(root, topic).await?;
            cache_dataset(&path, &raw).await?;
        }
        DatasetKind::Processed => {
            let raw_path = cache_path(root, topic, DatasetKind::Raw);
            let raw = if is_file(&raw_path).await {
                load_cached_dataset::<AnnotatedArticle>(&raw_path).await?
            } else {
                info!("Raw dataset does not exist, creating it now");
                let raw = create_raw_dataset(root, topic).await?;
                cache_dataset(&raw_path, &raw).await?;
                raw
            };
            let processed = process(raw, options);
            cache_dataset(&path, &processed).await?;
        }
    }
    Ok(path)
}
