use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde::Deserialize;

pub const FAVORITED_LABEL: &str = "お気に入り解除";
pub const NOT_FAVORITED_LABEL: &str = "お気に入りに追加";

/// Button text for a membership state. Text is a projection of the set, never a source.
pub const fn favorite_label(is_favorite: bool) -> &'static str {
    if is_favorite {
        FAVORITED_LABEL
    } else {
        NOT_FAVORITED_LABEL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Add,
    Remove,
}

impl FavoriteAction {
    /// The request that flips the given membership.
    pub const fn for_membership(is_favorite: bool) -> Self {
        if is_favorite {
            FavoriteAction::Remove
        } else {
            FavoriteAction::Add
        }
    }
}

/// Ids the server has confirmed as favorited, for the lifetime of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: BTreeSet<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Record a server-confirmed action.
    pub fn apply(&mut self, action: FavoriteAction, id: &str) {
        match action {
            FavoriteAction::Add => {
                self.ids.insert(id.to_owned());
            }
            FavoriteAction::Remove => {
                self.ids.remove(id);
            }
        }
    }
}

/// Shared handle to the page's `FavoriteSet`.
///
/// Cloning shares the same set. Components receive a clone at construction
/// instead of reaching for a global.
#[derive(Debug, Clone, Default)]
pub struct FavoriteStore(Rc<RefCell<FavoriteSet>>);

impl FavoriteStore {
    pub fn new(initial: FavoriteSet) -> Self {
        Self(Rc::new(RefCell::new(initial)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.borrow().contains(id)
    }

    pub fn snapshot(&self) -> FavoriteSet {
        self.0.borrow().clone()
    }

    pub(crate) fn apply(&self, action: FavoriteAction, id: &str) {
        self.0.borrow_mut().apply(action, id);
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&FavoriteSet) -> R) -> R {
        f(&self.0.borrow())
    }
}

/// Body of `/add_favorite/` and `/remove_favorite/` responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FavoriteReply {
    pub status: String,
}

impl FavoriteReply {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
