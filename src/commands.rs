use crate::models::Bookmark;
use crate::paths::AppPaths;
use crate::views::{self, AddForm, AddOutcome, DetailPage, ListPage};
use crate::store;

use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use colored::Colorize;

pub fn home(paths: &AppPaths) -> Result<()> {
    let cfg = store::load_config(&paths.config_file);
    println!("{}", views::home_title(&cfg).bold());
    Ok(())
}

pub fn add(paths: &AppPaths, name: String, url: String, notes: Option<String>) -> Result<()> {
    let form = AddForm {
        name,
        url,
        notes: notes.unwrap_or_default(),
    };

    match views::add_video(paths, form)? {
        AddOutcome::Redirect(bookmark) => {
            println!("{} {} ({})", "Added:".green(), bookmark.name, bookmark.video_id);
            let page = views::video_list(paths, None)?;
            print_list(&page);
            Ok(())
        }
        AddOutcome::Rejected { form, warnings } => {
            for warning in warnings {
                eprintln!("{} {warning}", "Warning:".yellow());
            }
            eprintln!();
            eprintln!("  Name:  {}", form.name);
            eprintln!("  URL:   {}", form.url);
            eprintln!("  Notes: {}", form.notes);
            bail!("video not added");
        }
    }
}

pub fn list(paths: &AppPaths, search: Option<&str>) -> Result<()> {
    let page = views::video_list(paths, search)?;
    print_list(&page);
    Ok(())
}

fn print_list(page: &ListPage) {
    if let Some(term) = &page.search {
        println!("Search: {}", term.bold());
    }
    println!("{}", page.count_label());

    if page.is_empty() {
        println!("{}", views::NO_MATCHES_MSG.yellow());
        return;
    }

    let name_width = page
        .videos
        .iter()
        .map(|v| v.name.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 40);

    println!("  {:<5} {:<name_w$}  Video ID", "#", "Name", name_w = name_width);
    for v in &page.videos {
        println!(
            "  {:<5} {:<name_w$}  {}",
            v.id,
            truncate(&v.name, name_width),
            v.video_id,
            name_w = name_width,
        );
    }
}

pub fn show(paths: &AppPaths, id: u64) -> Result<()> {
    match views::video_detail(paths, id)? {
        DetailPage::Found(bookmark) => {
            print_detail(&bookmark);
            Ok(())
        }
        DetailPage::NotFound { id } => bail!("no video with ID {id} (404 not found)"),
    }
}

fn print_detail(b: &Bookmark) {
    let added: DateTime<Local> = DateTime::from(b.created_at);

    println!("{}", b.name.bold());
    println!("---------------");
    println!("ID:       {}", b.id);
    println!("URL:      {}", b.url);
    println!("Video ID: {}", b.video_id);
    println!("Added:    {}", added.format("%Y-%m-%d %H:%M"));
    if let Some(notes) = &b.notes {
        println!();
        println!("{notes}");
    }
}

pub fn open(paths: &AppPaths, id: u64) -> Result<()> {
    match views::video_detail(paths, id)? {
        DetailPage::Found(bookmark) => {
            println!("{} {}", "Opening:".blue(), bookmark.url);
            ::open::that(&bookmark.url)?;
            Ok(())
        }
        DetailPage::NotFound { id } => bail!("no video with ID {id} (404 not found)"),
    }
}

pub fn config(paths: &AppPaths, key: &str, value: &str) -> Result<()> {
    let mut cfg = store::load_config(&paths.config_file);

    match key {
        "app_name" => {
            if value.trim().is_empty() {
                bail!("app_name cannot be empty");
            }
            cfg.app_name = value.trim().to_string();
        }
        "log_level" => match value.to_lowercase().as_str() {
            lvl @ ("error" | "warn" | "info" | "debug" | "trace") => {
                cfg.log_level = lvl.to_string();
            }
            _ => bail!("invalid log level '{value}': use error, warn, info, debug or trace"),
        },
        _ => bail!("unknown config key '{key}': available keys are 'app_name', 'log_level'"),
    }

    store::save_config(&paths.config_file, &cfg)?;
    println!("{}", "Config updated.".green());
    Ok(())
}

pub fn info(paths: &AppPaths) -> Result<()> {
    println!("{}", "Data Paths".bold());
    println!("---------------");
    println!("Config:    {}", paths.config_file.display());
    println!("Bookmarks: {}", paths.store_file.display());
    println!("Log:       {}", paths.log_file.display());

    let store_exists = paths.store_file.exists();
    println!("Bookmark File Exists? {store_exists}");
    if store_exists {
        println!("Bookmarks stored: {}", store::count(paths)?);
    }

    Ok(())
}

/// Truncates a string to a maximum character width, appending "..." if truncated.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("lego", 10), "lego");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("ééééééé", 6), "ééé...");
    }

    #[test]
    fn config_rejects_unknown_key() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dirs(tmp.path(), tmp.path()).unwrap();
        assert!(config(&paths, "mode", "stack").is_err());
        assert!(config(&paths, "log_level", "loud").is_err());
    }

    #[test]
    fn config_sets_app_name() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dirs(tmp.path(), tmp.path()).unwrap();
        config(&paths, "app_name", "Press Videos").unwrap();
        config(&paths, "log_level", "DEBUG").unwrap();

        let cfg = store::load_config(&paths.config_file);
        assert_eq!(cfg.app_name, "Press Videos");
        assert_eq!(cfg.log_level, "debug");
    }
}
