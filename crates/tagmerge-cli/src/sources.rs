//! Building a session from command-line sources.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tagmerge_core::{AttributeMapping, SessionState};
use tagmerge_fetch::{load_file, load_target, load_url, FetchConfig, HttpFetcher};

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Current `Players.json`; its tagged players are never overwritten.
    #[arg(short, long, env = "TAGMERGE_TARGET")]
    pub target: Option<PathBuf>,

    /// Source databases, URLs or local files. Earlier sources win ties.
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MappingArgs {
    /// Mapping file: a JSON object `{ "attribute": "tagId" }`.
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Map one attribute (`attribute=tagId`, empty tag to skip). Repeatable;
    /// applied after `--mapping`.
    #[arg(long = "map", value_name = "ATTR=TAG", value_parser = parse_assignment)]
    pub map: Vec<(String, String)>,
}

impl MappingArgs {
    /// Apply the mapping file, then the individual assignments.
    pub fn apply(&self, session: &mut SessionState) -> Result<()> {
        if let Some(path) = &self.mapping {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read mapping {}", path.display()))?;
            let mapping = AttributeMapping::from_json(&text)
                .with_context(|| format!("invalid mapping {}", path.display()))?;
            for (attribute, tag) in mapping.iter() {
                session.mapping_mut().set(attribute, tag);
            }
        }
        for (attribute, tag) in &self.map {
            session.mapping_mut().set(attribute.as_str(), tag.as_str());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source<'a> {
    Url(&'a str),
    File(&'a Path),
}

pub fn classify(raw: &str) -> Source<'_> {
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Source::Url(raw)
    } else {
        Source::File(Path::new(raw))
    }
}

/// Parse `attribute=tagId` (the tag may be empty).
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (attribute, tag) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ATTR=TAG, got `{raw}`"))?;
    if attribute.is_empty() {
        return Err(format!("missing attribute in `{raw}`"));
    }
    Ok((attribute.to_string(), tag.trim().to_string()))
}

/// Load the target and every source, in order.
///
/// The target must load. A source that fails is reported and skipped; the
/// session is left as it was before that source.
pub fn build_session(args: &SourceArgs) -> Result<SessionState> {
    if args.sources.is_empty() && args.target.is_none() {
        return Err(anyhow!("nothing to do: pass --target and/or at least one SOURCE"));
    }

    let mut session = SessionState::new();

    if let Some(path) = &args.target {
        let target = load_target(path)
            .with_context(|| format!("failed to load target {}", path.display()))?;
        eprintln!(
            "{} {} (tagged players={})",
            "Loaded target".green().bold(),
            path.display(),
            target.tagged_players()
        );
        session.set_target(target);
    }

    let config = FetchConfig::from_env();
    let mut fetcher: Option<HttpFetcher> = None;

    for raw in &args.sources {
        let loaded = match classify(raw) {
            Source::Url(url) => {
                if session.is_loaded(url) {
                    eprintln!("{} already loaded: {url}", "skip:".yellow().bold());
                    continue;
                }
                if fetcher.is_none() {
                    fetcher = Some(HttpFetcher::new(&config)?);
                }
                let Some(client) = fetcher.as_ref() else {
                    continue;
                };
                eprintln!("{} {url}", "Fetching".green().bold());
                load_url(client, &config, url)
            }
            Source::File(path) => load_file(path),
        };

        match loaded {
            Ok(database) => {
                if let Err(err) = session.add_database(database) {
                    eprintln!("{} {err}", "skip:".yellow().bold());
                }
            }
            Err(err) => {
                tracing::debug!(source = %raw, error = ?err, "load failed");
                eprintln!("{} {raw}: {err}", "error:".red().bold());
            }
        }
    }

    Ok(session)
}
