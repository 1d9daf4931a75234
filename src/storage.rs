use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, info};

use crate::article::Article;
use crate::crawl::CrawlStats;
use crate::topic::Topic;

/// File name of a crawl's persisted counters.
pub const STATS_FILE: &str = "core_stats.json";

/// Stores relevant articles of one outlet below
/// `<root>/<topic>/<outlet>`, each as numbered `json/<n>.json` record and
/// `html/<n>.html` response body.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ArticleStore {
    dir: PathBuf,
    /// Number of the last stored article.
    article_num: usize,
}

impl ArticleStore {
    /// Create the directories of the outlet.
    ///
    /// Numbering continues after the highest number already stored, so an
    /// interrupted crawl can be resumed without overwriting articles.
    pub async fn open<P: AsRef<Path>>(root: P, topic: Topic, outlet: &str) -> anyhow::Result<Self> {
        let dir = root.as_ref().join(topic.identifier()).join(outlet);
        for sub in &["json", "html"] {
            let sub = dir.join(sub);
            tokio::fs::create_dir_all(&sub)
                .await
                .with_context(|| format!("Failed to create {}", sub.display()))?;
        }
        let article_num = last_article_num(&dir.join("json")).await?;
        info!(
            "Storing articles of {} in {}, {} stored already",
            outlet,
            dir.display(),
            article_num
        );
        Ok(Self { dir, article_num })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of the last stored article.
    pub fn article_num(&self) -> usize {
        self.article_num
    }

    /// Store the article's record and, if given, its raw response body.
    ///
    /// Returns the path of the json record.
    pub async fn insert(&mut self, article: &Article, html: Option<&[u8]>) -> anyhow::Result<PathBuf> {
        let num = self.article_num + 1;
        if let Some(html) = html {
            let path = self.dir.join("html").join(format!("{}.html", num));
            tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        let path = self.dir.join("json").join(format!("{}.json", num));
        tokio::fs::write(&path, serde_json::to_vec(article)?)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.article_num = num;
        debug!("Stored {} as {}", article.provenance, path.display());
        Ok(path)
    }

    /// Read back a stored record by its number.
    pub async fn get(&self, num: usize) -> anyhow::Result<Article> {
        let path = self.dir.join("json").join(format!("{}.json", num));
        let content = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// Write the crawl's counters to `core_stats.json`.
    pub async fn persist_stats(&self, stats: &CrawlStats) -> anyhow::Result<PathBuf> {
        let path = self.dir.join(STATS_FILE);
        tokio::fs::write(&path, serde_json::to_vec_pretty(stats)?)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// The highest `<n>` of the `<n>.json` files in `dir`, `0` if there are none.
async fn last_article_num(dir: &Path) -> anyhow::Result<usize> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read {}", dir.display()))?;
    let mut last = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if let Some(num) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<usize>().ok())
        {
            last = last.max(num);
        }
    }
    Ok(last)
}
