//! Terminal rendering of session state.

use colored::Colorize;
use tagmerge_core::{ImportStats, SessionState};

pub fn print_databases(session: &SessionState) {
    if session.databases().is_empty() {
        println!("{}", "no databases loaded".dimmed());
        return;
    }
    println!("{}", "Databases".bold());
    for (index, db) in session.databases().iter().enumerate() {
        println!(
            "  {} {} · {} players ({})",
            format!("[{index}]").dimmed(),
            db.name.cyan(),
            db.player_count(),
            db.origin.as_str()
        );
    }
}

pub fn print_stats(stats: ImportStats) {
    println!(
        "{} imported={} added={} duplicates={}",
        "Stats".bold(),
        stats.imported,
        stats.added.to_string().green(),
        stats.duplicates.to_string().yellow()
    );
}

/// Attribute editor view: each attribute with its count and current tag,
/// followed by the tags it can be mapped to.
pub fn print_attributes(session: &SessionState) {
    let Some(tags) = session.available_tags() else {
        println!("{}", "load a Players.json with a Config section first (--target)".dimmed());
        return;
    };

    let reconciliation = session.reconciliation();
    if reconciliation.attributes.is_empty() {
        println!("{}", "no attributes: import databases first".dimmed());
        return;
    }

    println!("{}", "Attributes".bold());
    for (attribute, count) in reconciliation.attribute_counts() {
        let current = session.mapping().get(&attribute).unwrap_or("skip");
        println!(
            "  {} {} → {}",
            attribute.cyan(),
            format!("({count})").dimmed(),
            current
        );
    }

    println!("{}", "Tags".bold());
    if tags.is_empty() {
        println!("  {}", "Config declares no tags".dimmed());
    }
    for (id, name) in &tags {
        println!("  {id}: {name}");
    }
}
