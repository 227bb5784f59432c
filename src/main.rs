// src/main.rs

use anyhow::Context;
use clap::Parser;
use cms_reader::{
    ArticleReader, ArticleSummary, AuthorRef, ClientConfig, Command, CommandLineInput, Freshness,
    Term,
};
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde::Serialize;
use std::fs;

/// Sets up logging configuration.
///
/// Console output goes to stderr so `--json` output on stdout stays
/// machine-readable.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("cms-reader.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Prints either JSON or the text rendering.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn summary_lines(articles: &[ArticleSummary]) -> String {
    if articles.is_empty() {
        return "No articles found.\n".to_string();
    }
    articles
        .iter()
        .map(|a| {
            format!(
                "{:>7}  {}  {}\n",
                a.id,
                a.published_at.format("%Y-%m-%d"),
                a.title
            )
        })
        .collect()
}

fn term_lines(terms: &[Term]) -> String {
    if terms.is_empty() {
        return "Nothing found.\n".to_string();
    }
    terms
        .iter()
        .map(|t| format!("{:>7}  {} ({})\n", t.id, t.name, t.count))
        .collect()
}

fn author_lines(authors: &[AuthorRef]) -> String {
    if authors.is_empty() {
        return "No authors found.\n".to_string();
    }
    authors
        .iter()
        .map(|a| format!("{:>7}  {}\n", a.id, a.name))
        .collect()
}

async fn run(cli: &CommandLineInput, reader: &ArticleReader) -> anyhow::Result<()> {
    let client = reader.client();
    let json = cli.json;

    match &cli.command {
        Command::List {
            page,
            per_page,
            category,
        } => {
            if let (Some(id), false) = (category, json) {
                if let Some(term) = client.get_category(*id).await {
                    println!("# {}\n", term.name);
                }
            }
            let articles = client.list_articles(*page, *per_page, *category, None).await;
            emit(json, &articles, || summary_lines(&articles))
        }
        Command::Search {
            term,
            page,
            per_page,
        } => {
            let articles = client
                .list_articles(*page, *per_page, None, Some(term.as_str()))
                .await;
            emit(json, &articles, || summary_lines(&articles))
        }
        Command::Show {
            article,
            revalidate,
        } => {
            let lookup = if *revalidate {
                reader.open_revalidating(*article).await
            } else {
                reader.open(*article).await
            }
            .with_context(|| format!("Could not open article {}", article))?;

            match lookup.freshness {
                Freshness::Stale => {
                    eprintln!("Showing a cached copy; the site could not be reached.")
                }
                Freshness::Revalidating => eprintln!("Showing a cached copy while refreshing."),
                Freshness::Fresh | Freshness::Refreshed => {}
            }

            let entry = &lookup.entry;
            emit(json, entry.as_ref(), || {
                let summary = &entry.article.summary;
                let mut out = format!(
                    "# {}\n{} | {} | {}\n\n{}\n",
                    summary.title,
                    summary.published_at.format("%Y-%m-%d"),
                    summary.author.name,
                    summary.permalink,
                    entry.article.body_markup
                );
                if !entry.related_articles.is_empty() {
                    out.push_str("\n## Related\n");
                    out.push_str(&summary_lines(&entry.related_articles));
                }
                out
            })?;

            if let Some(refresh) = lookup.refresh {
                // The process would otherwise exit before the refresh lands.
                if let Err(e) = refresh.await {
                    log::warn!("Background refresh of article {} did not finish: {}", article, e);
                }
            }
            Ok(())
        }
        Command::Related { article } => {
            let lookup = reader
                .open(*article)
                .await
                .with_context(|| format!("Could not open article {}", article))?;
            let related = &lookup.entry.related_articles;
            emit(json, related, || summary_lines(related))
        }
        Command::Categories => {
            let categories = client.list_categories().await;
            emit(json, &categories, || term_lines(&categories))
        }
        Command::Tags => {
            let tags = client.list_tags().await;
            emit(json, &tags, || term_lines(&tags))
        }
        Command::Authors => {
            let authors = client.list_authors().await;
            emit(json, &authors, || author_lines(&authors))
        }
        Command::Media { id } => {
            let media = client
                .get_media(*id)
                .await
                .with_context(|| format!("Media {} is not available", id))?;
            emit(json, &media, || {
                format!("{}\n{}\n{}x{}\n", media.title, media.url, media.width, media.height)
            })
        }
        Command::Site => {
            let site = client
                .get_site_info()
                .await
                .context("Site information is not available")?;
            emit(json, &site, || {
                format!("{}\n{}\n{}\n", site.name, site.description, site.home)
            })
        }
        Command::Table { article } => {
            let rows = client
                .get_table_data(*article)
                .await
                .with_context(|| format!("Article {} has no table", article))?;
            emit(json, &rows, || {
                let mut out = String::new();
                if let Some(first) = rows.first() {
                    out.push_str(&first.keys().cloned().collect::<Vec<_>>().join("\t"));
                    out.push('\n');
                }
                for row in &rows {
                    out.push_str(&row.values().cloned().collect::<Vec<_>>().join("\t"));
                    out.push('\n');
                }
                out
            })
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = ClientConfig::resolve(&cli)?;
    log::debug!("Reading from {}", config.site_url);

    let reader = ArticleReader::from_config(&config).await?;
    run(&cli, &reader).await
}
