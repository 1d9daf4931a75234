use std::path::PathBuf;

use anyhow::Context;
use futures::{stream, StreamExt, TryStreamExt};
use serde::Serialize;
use structopt::StructOpt;

use pressespiegel::corpus::{build_dataset, DatasetKind, ProcessOptions};
use pressespiegel::{CrawlSettings, Decision, KeywordMatcher, Topic};

#[allow(missing_docs)]
#[derive(Debug, StructOpt)]
#[structopt(
    name = "pressespiegel",
    about = "Topic relevance and corpus cleaning for German news articles."
)]
#[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
enum App {
    #[structopt(
        name = "relevance",
        about = "Decide whether text files are relevant for a topic."
    )]
    Relevance {
        #[structopt(flatten)]
        opts: KeywordOpts,
        #[structopt(
            name = "files",
            help = "The text files to evaluate.",
            parse(from_os_str)
        )]
        files: Vec<PathBuf>,
    },
    #[structopt(
        name = "dataset",
        about = "Create the raw or processed dataset of a topic from the stored articles."
    )]
    Dataset {
        #[structopt(
            long = "topic",
            short = "t",
            default_value = "refugees_migration",
            help = "The topic to create the dataset for."
        )]
        topic: Topic,
        #[structopt(
            long = "data",
            short = "d",
            default_value = "data",
            help = "The directory the articles are stored in.",
            parse(from_os_str)
        )]
        data: PathBuf,
        #[structopt(long = "raw", help = "Create the raw instead of the processed dataset.")]
        raw: bool,
        #[structopt(flatten)]
        process: ProcessOpts,
    },
}

#[derive(Debug, Clone, StructOpt)]
pub struct KeywordOpts {
    #[structopt(
        long = "topic",
        short = "t",
        default_value = "refugees_migration",
        help = "The topic whose keywords are used."
    )]
    topic: Topic,
    #[structopt(
        long = "min-frequency",
        help = "Minimum number of keyword matches."
    )]
    min_frequency: Option<usize>,
    #[structopt(
        long = "min-distance",
        help = "Minimum number of tokens between the outermost keyword matches."
    )]
    min_distance: Option<usize>,
}

impl KeywordOpts {
    fn as_matcher(&self) -> anyhow::Result<KeywordMatcher> {
        let mut settings = CrawlSettings::builder().topic(self.topic);
        if let Some(min_frequency) = self.min_frequency {
            settings = settings.min_frequency(min_frequency);
        }
        if let Some(min_distance) = self.min_distance {
            settings = settings.min_distance(min_distance);
        }
        Ok(KeywordMatcher::new(settings.build()?.keywords().clone()))
    }
}

#[derive(Debug, Clone, StructOpt)]
pub struct ProcessOpts {
    #[structopt(long = "keep-duplicates", help = "Keep duplicated articles.")]
    keep_duplicates: bool,
    #[structopt(long = "keep-non-german", help = "Keep articles not written in German.")]
    keep_non_german: bool,
    #[structopt(long = "keep-outliers", help = "Keep too short and too long articles.")]
    keep_outliers: bool,
    #[structopt(long = "keep-news-tickers", help = "Keep news and live tickers.")]
    keep_news_tickers: bool,
    #[structopt(
        long = "subheaders-threshold",
        default_value = "10",
        help = "Articles with more subheaders are considered news tickers."
    )]
    subheaders_threshold: usize,
    #[structopt(
        long = "keep-forbidden-patterns",
        help = "Keep articles containing a forbidden pattern."
    )]
    keep_forbidden_patterns: bool,
}

impl ProcessOpts {
    fn as_options(&self) -> ProcessOptions {
        ProcessOptions {
            drop_duplicates: !self.keep_duplicates,
            drop_non_german: !self.keep_non_german,
            drop_outliers: !self.keep_outliers,
            drop_news_tickers: !self.keep_news_tickers,
            subheaders_threshold: self.subheaders_threshold,
            drop_forbidden_patterns: !self.keep_forbidden_patterns,
        }
    }
}

#[derive(Debug, Serialize)]
struct FileDecision {
    file: PathBuf,
    #[serde(flatten)]
    decision: Decision,
}

impl App {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            App::Relevance { opts, files } => {
                let matcher = opts.as_matcher()?;
                let decisions = stream::iter(files)
                    .map(|file| {
                        let matcher = &matcher;
                        async move {
                            let text = tokio::fs::read_to_string(&file)
                                .await
                                .with_context(|| format!("Failed to read {}", file.display()))?;
                            let decision = matcher.evaluate_text(&text);
                            Ok::<_, anyhow::Error>(FileDecision { file, decision })
                        }
                    })
                    .buffered(10)
                    .try_collect::<Vec<_>>()
                    .await?;
                for decision in decisions {
                    println!("{}", serde_json::to_string(&decision)?);
                }
            }
            App::Dataset {
                topic,
                data,
                raw,
                process,
            } => {
                let kind = if raw {
                    DatasetKind::Raw
                } else {
                    DatasetKind::Processed
                };
                let path = build_dataset(&data, topic, kind, &process.as_options()).await?;
                println!("{}", path.display());
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    Ok(App::from_args().run().await?)
}
