use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{BookmarkError, Result};
use crate::models::{Bookmark, Config, NewBookmark};
use crate::paths::AppPaths;
use crate::youtube;

use chrono::Utc;
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// On-disk layout of the bookmark store.
#[derive(Serialize, Deserialize, Debug)]
struct BookmarkDb {
    /// Next identity to hand out. Only ever grows, so IDs are never reused.
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default)]
    bookmarks: Vec<Bookmark>,
}

fn first_id() -> u64 {
    1
}

impl Default for BookmarkDb {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            bookmarks: Vec::new(),
        }
    }
}

impl BookmarkDb {
    /// Inserts a bookmark whose video ID has already been derived from its URL.
    /// Rejects the insert if any stored bookmark holds the same video ID.
    fn insert(&mut self, new: NewBookmark, video_id: String) -> Result<Bookmark> {
        if self.bookmarks.iter().any(|b| b.video_id == video_id) {
            return Err(BookmarkError::DuplicateVideoId { video_id });
        }

        let bookmark = Bookmark {
            id: self.next_id,
            name: new.name,
            url: new.url,
            notes: new.notes,
            video_id,
            created_at: Utc::now(),
        };

        self.next_id += 1;
        self.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }
}

/// Acquires an exclusive lock on the store, loads it, runs the callback with
/// mutable access, and saves the result. The lock is held for the entire operation,
/// and nothing is saved if the callback fails.
fn with_db<T, F>(paths: &AppPaths, f: F) -> Result<T>
where
    F: FnOnce(&mut BookmarkDb) -> Result<T>,
{
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&paths.lock_file)?;

    let mut lock = RwLock::new(lock_file);
    let _guard = lock.write()?;

    let mut db = load_db(&paths.store_file)?;
    let result = f(&mut db)?;
    save_db(&paths.store_file, &db)?;

    Ok(result)
}

/// Acquires a shared lock on the store and loads it for read-only access.
fn with_db_read<T, F>(paths: &AppPaths, f: F) -> Result<T>
where
    F: FnOnce(&BookmarkDb) -> T,
{
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&paths.lock_file)?;

    let lock = RwLock::new(lock_file);
    let _guard = lock.read()?;

    let db = load_db(&paths.store_file)?;
    Ok(f(&db))
}

/// A missing file is an empty store. A file that fails to parse is an error,
/// since saving over it would drop every bookmark.
fn load_db(path: &Path) -> Result<BookmarkDb> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(BookmarkDb::default()),
        Err(e) => Err(e.into()),
    }
}

fn save_db(path: &Path, db: &BookmarkDb) -> Result<()> {
    let data = serde_json::to_string_pretty(db)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Validates the URL, derives the video ID and inserts the bookmark.
///
/// The uniqueness check runs under the store's exclusive lock, so two
/// concurrent creates for the same video cannot both succeed.
pub fn create(paths: &AppPaths, new: NewBookmark) -> Result<Bookmark> {
    let video_id = youtube::extract_video_id(&new.url).inspect_err(|_| {
        warn!(url = %new.url, "rejected bookmark with invalid URL");
    })?;

    let created = with_db(paths, |db| db.insert(new, video_id));

    match &created {
        Ok(b) => info!(id = b.id, video_id = %b.video_id, "created bookmark"),
        Err(BookmarkError::DuplicateVideoId { video_id }) => {
            warn!(%video_id, "rejected duplicate bookmark")
        }
        Err(_) => {}
    }

    created
}

pub fn get(paths: &AppPaths, id: u64) -> Result<Bookmark> {
    debug!(id, "looking up bookmark");
    with_db_read(paths, |db| db.bookmarks.iter().find(|b| b.id == id).cloned())?
        .ok_or(BookmarkError::NotFound { id })
}

/// Returns bookmarks ordered by name, case-insensitively.
///
/// With a search term, only bookmarks whose name contains it (ignoring case)
/// are returned. Bookmarks with equal names keep their insertion order.
pub fn list(paths: &AppPaths, search: Option<&str>) -> Result<Vec<Bookmark>> {
    let needle = search.map(str::to_lowercase);
    debug!(search = ?needle, "listing bookmarks");

    let mut found = with_db_read(paths, |db| {
        db.bookmarks
            .iter()
            .filter(|b| match &needle {
                Some(n) => b.name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect::<Vec<_>>()
    })?;

    found.sort_by_key(|b| b.name.to_lowercase());
    Ok(found)
}

pub fn count(paths: &AppPaths) -> Result<usize> {
    with_db_read(paths, |db| db.bookmarks.len())
}

pub fn load_config(path: &Path) -> Config {
    if let Ok(data) = fs::read_to_string(path) {
        serde_json::from_str(&data).unwrap_or_default()
    } else {
        Config::default()
    }
}

pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let data = serde_json::to_string_pretty(config)?;
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_paths() -> (TempDir, AppPaths) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dirs(tmp.path(), tmp.path()).unwrap();
        (tmp, paths)
    }

    fn add(paths: &AppPaths, name: &str, video: &str) -> Bookmark {
        let url = format!("https://www.youtube.com/watch?v={video}");
        create(paths, NewBookmark::new(name, url, Some("example".into()))).unwrap()
    }

    fn names(bookmarks: &[Bookmark]) -> Vec<&str> {
        bookmarks.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn create_then_get_round_trips() {
        let (_tmp, paths) = test_paths();
        let url = "https://www.youtube.com/watch?v=S_t8CySI-Uw";
        let notes = "Legos getting the smush from the press";

        let created = create(&paths, NewBookmark::new("lego", url, Some(notes.into()))).unwrap();
        let fetched = get(&paths, created.id).unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "lego");
        assert_eq!(fetched.url, url);
        assert_eq!(fetched.notes.as_deref(), Some(notes));
        assert_eq!(fetched.video_id, youtube::extract_video_id(url).unwrap());
        assert_eq!(count(&paths).unwrap(), 1);
    }

    #[test]
    fn notes_are_optional() {
        let (_tmp, paths) = test_paths();
        let created = create(
            &paths,
            NewBookmark::new("x", "https://www.youtube.com/watch?v=1", Some(String::new())),
        )
        .unwrap();
        assert_eq!(get(&paths, created.id).unwrap().notes, None);
    }

    #[test]
    fn invalid_url_is_never_stored() {
        let (_tmp, paths) = test_paths();
        let err = create(
            &paths,
            NewBookmark::new("example", "https://www.youtube.com/watch?v=", None),
        )
        .unwrap_err();

        assert!(matches!(err, BookmarkError::InvalidUrl { .. }));
        assert_eq!(count(&paths).unwrap(), 0);
        assert!(!paths.store_file.exists());
    }

    #[test]
    fn duplicate_video_id_is_rejected() {
        let (_tmp, paths) = test_paths();
        add(&paths, "ABC", "456");

        let err = create(
            &paths,
            NewBookmark::new("other", "https://www.youtube.com/watch?v=456&t=3", None),
        )
        .unwrap_err();

        assert!(matches!(err, BookmarkError::DuplicateVideoId { ref video_id } if video_id == "456"));
        assert_eq!(count(&paths).unwrap(), 1);
    }

    #[test]
    fn concurrent_duplicates_store_once() {
        let (_tmp, paths) = test_paths();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let paths = paths.clone();
                std::thread::spawn(move || {
                    create(
                        &paths,
                        NewBookmark::new(
                            format!("try {i}"),
                            "https://www.youtube.com/watch?v=same",
                            None,
                        ),
                    )
                    .is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(count(&paths).unwrap(), 1);
    }

    #[test]
    fn ids_are_not_reused() {
        let (_tmp, paths) = test_paths();
        let a = add(&paths, "a", "1");
        let _ = create(
            &paths,
            NewBookmark::new("dup", "https://www.youtube.com/watch?v=1", None),
        );
        let b = add(&paths, "b", "2");
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn get_missing_is_not_found() {
        let (_tmp, paths) = test_paths();
        add(&paths, "a", "1");
        let err = get(&paths, 100_000).unwrap_err();
        assert!(matches!(err, BookmarkError::NotFound { id: 100_000 }));
    }

    #[test]
    fn list_orders_case_insensitively() {
        let (_tmp, paths) = test_paths();
        add(&paths, "abc", "1234");
        add(&paths, "YUZ", "1235");
        add(&paths, "AAA", "1236");
        add(&paths, "klm", "1237");

        let all = list(&paths, None).unwrap();
        assert_eq!(names(&all), ["AAA", "abc", "klm", "YUZ"]);
    }

    #[test]
    fn list_search_matches_substring_ignoring_case() {
        let (_tmp, paths) = test_paths();
        add(&paths, "ABC", "456");
        add(&paths, "nope", "789");
        add(&paths, "abc", "123");
        add(&paths, "hello aBc!!!", "101");

        let found = list(&paths, Some("abc")).unwrap();
        assert_eq!(names(&found), ["ABC", "abc", "hello aBc!!!"]);
    }

    #[test]
    fn list_search_without_matches_is_empty() {
        let (_tmp, paths) = test_paths();
        add(&paths, "ABC", "456");
        add(&paths, "nope", "789");

        assert!(list(&paths, Some("kittens")).unwrap().is_empty());
    }

    #[test]
    fn list_on_fresh_store_is_empty() {
        let (_tmp, paths) = test_paths();
        assert!(list(&paths, None).unwrap().is_empty());
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let (_tmp, paths) = test_paths();
        fs::write(&paths.store_file, "not json").unwrap();

        let err = list(&paths, None).unwrap_err();
        assert!(matches!(err, BookmarkError::Serialization(_)));

        let err = create(
            &paths,
            NewBookmark::new("a", "https://www.youtube.com/watch?v=1", None),
        )
        .unwrap_err();
        assert!(matches!(err, BookmarkError::Serialization(_)));
        assert_eq!(fs::read_to_string(&paths.store_file).unwrap(), "not json");
    }

    #[test]
    fn config_defaults_when_missing_or_garbled() {
        let (_tmp, paths) = test_paths();
        assert_eq!(load_config(&paths.config_file).app_name, "Hydraulic Compressor Videos");

        fs::write(&paths.config_file, "{{{").unwrap();
        assert_eq!(load_config(&paths.config_file).log_level, "info");
    }

    #[test]
    fn config_round_trips() {
        let (_tmp, paths) = test_paths();
        let cfg = Config {
            app_name: "Lego Presses".into(),
            ..Config::default()
        };
        save_config(&paths.config_file, &cfg).unwrap();
        assert_eq!(load_config(&paths.config_file).app_name, "Lego Presses");
    }
}
