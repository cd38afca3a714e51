//! Entry points shared by every front end: add, list and detail.
//!
//! Each takes already-decoded input and returns a page outcome. Expected
//! user errors become warnings or a not-found page here; only storage
//! failures reach the caller as `Err`.

use anyhow::{Context, Result};

use crate::error::BookmarkError;
use crate::models::{Bookmark, Config, MAX_NAME_LEN, MAX_URL_LEN, NewBookmark};
use crate::paths::AppPaths;
use crate::store;

pub const INVALID_URL_MSG: &str = "Invalid YouTube URL";
pub const DUPLICATE_MSG: &str = "Error: video was previously added to your database";
pub const CHECK_INFO_MSG: &str = "Please check the info entered.";
pub const NO_MATCHES_MSG: &str = "No matching videos";

/// Raw fields of the add form, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub name: String,
    pub url: String,
    pub notes: String,
}

impl AddForm {
    fn is_valid(&self) -> bool {
        let name = self.name.trim();
        let url = self.url.trim();
        !name.is_empty()
            && !url.is_empty()
            && name.chars().count() <= MAX_NAME_LEN
            && url.chars().count() <= MAX_URL_LEN
    }

    fn to_new_bookmark(&self) -> NewBookmark {
        NewBookmark::new(
            self.name.trim(),
            self.url.trim(),
            Some(self.notes.clone()),
        )
    }
}

#[derive(Debug)]
pub enum AddOutcome {
    /// Saved; the caller should show the listing.
    Redirect(Bookmark),
    /// Not saved; the caller should show the warnings and the form again.
    Rejected {
        form: AddForm,
        warnings: Vec<&'static str>,
    },
}

pub fn add_video(paths: &AppPaths, form: AddForm) -> Result<AddOutcome> {
    if !form.is_valid() {
        return Ok(AddOutcome::Rejected {
            form,
            warnings: vec![CHECK_INFO_MSG],
        });
    }

    let warning = match store::create(paths, form.to_new_bookmark()) {
        Ok(bookmark) => return Ok(AddOutcome::Redirect(bookmark)),
        Err(BookmarkError::InvalidUrl { .. }) => INVALID_URL_MSG,
        Err(BookmarkError::DuplicateVideoId { .. }) => DUPLICATE_MSG,
        Err(e) => return Err(e).context("failed to save bookmark"),
    };

    Ok(AddOutcome::Rejected {
        form,
        warnings: vec![warning, CHECK_INFO_MSG],
    })
}

#[derive(Debug)]
pub struct ListPage {
    pub videos: Vec<Bookmark>,
    pub search: Option<String>,
}

impl ListPage {
    pub fn count_label(&self) -> String {
        count_label(self.videos.len())
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

/// "1 Video", otherwise "N Videos" (including zero).
pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 Video".to_string()
    } else {
        format!("{n} Videos")
    }
}

/// Lists bookmarks, filtered when a non-blank search term is given.
pub fn video_list(paths: &AppPaths, search: Option<&str>) -> Result<ListPage> {
    let search = search.map(str::trim).filter(|s| !s.is_empty());
    let videos = store::list(paths, search).context("failed to read bookmarks")?;

    Ok(ListPage {
        videos,
        search: search.map(str::to_string),
    })
}

#[derive(Debug)]
pub enum DetailPage {
    Found(Bookmark),
    NotFound { id: u64 },
}

pub fn video_detail(paths: &AppPaths, id: u64) -> Result<DetailPage> {
    match store::get(paths, id) {
        Ok(bookmark) => Ok(DetailPage::Found(bookmark)),
        Err(BookmarkError::NotFound { id }) => Ok(DetailPage::NotFound { id }),
        Err(e) => Err(e).context("failed to read bookmark"),
    }
}

pub fn home_title(cfg: &Config) -> &str {
    &cfg.app_name
}
