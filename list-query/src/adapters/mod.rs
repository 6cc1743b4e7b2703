//! # Adapters for the listing endpoints
//!
//! One adapter per listed entity. Each is a zero sized lookup table, so
//! they can be shared freely as `&'static dyn ResolverAdapter`.
//!
//! | adapter                  | default sort            | functions                          |
//! |--------------------------|-------------------------|------------------------------------|
//! | [`MediaAdapter`]         | `media.title`           | `hasTag`, `hasType`, `hasStatus`   |
//! | [`AnimeAdapter`]         | `animes.title`          | `hasTag`, `hasStatus`              |
//! | [`CollectionAdapter`]    | `collections.name`      |                                    |
//! | [`NotificationAdapter`]  | `notifications.created` | `hasType`                          |
//! | [`ReleaseAdapter`]       | `media.title`           | `hasTag`                           |
//! | [`ShowAdapter`]          | `shows.name`            | `hasType`                          |
//!
//! Tags are stored by slug, so `hasTag("Slice of Life")` matches rows
//! tagged `slice-of-life`.

mod anime;
mod collection;
mod media;
mod notification;
mod release;
mod show;

pub use anime::AnimeAdapter;
pub use collection::{CollectionAdapter, CollectionRow};
pub use media::{MediaAdapter, MediaRow};
pub use notification::NotificationAdapter;
pub use release::{ReleaseAdapter, ReleaseRow};
pub use show::ShowAdapter;

use crate::adapter::slug;

/// The association every tagged entity uses.
const TAGS: &str = "tags";

fn tag_id(association: &str, name: &str) -> Option<String> {
    match association {
        TAGS => Some(slug(name)),
        _ => None,
    }
}
