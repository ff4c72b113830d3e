use serde::{Deserialize, Serialize};

use crate::favorites::FavoriteAction;
use crate::form::encode_path_segment;

const ID_PLACEHOLDER: &str = "{id}";

/// Server routes this layer talks to or links to. `{id}` is replaced by the item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub add_favorite: String,
    pub remove_favorite: String,
    pub add_review: String,
    pub facility_detail: String,
    pub review_list: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            add_favorite: "/add_favorite/".into(),
            remove_favorite: "/remove_favorite/".into(),
            add_review: "/playground/{id}/add_review/".into(),
            facility_detail: "/facilities/{id}/".into(),
            review_list: "/playground/{id}/reviews/".into(),
        }
    }
}

impl Endpoints {
    pub fn favorite(&self, action: FavoriteAction) -> &str {
        match action {
            FavoriteAction::Add => &self.add_favorite,
            FavoriteAction::Remove => &self.remove_favorite,
        }
    }

    pub fn add_review(&self, item_id: &str) -> String {
        expand(&self.add_review, item_id)
    }

    pub fn facility_detail(&self, item_id: &str) -> String {
        expand(&self.facility_detail, item_id)
    }

    pub fn review_list(&self, item_id: &str) -> String {
        expand(&self.review_list, item_id)
    }
}

fn expand(template: &str, item_id: &str) -> String {
    template.replace(ID_PLACEHOLDER, &encode_path_segment(item_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routes() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.favorite(FavoriteAction::Add), "/add_favorite/");
        assert_eq!(endpoints.favorite(FavoriteAction::Remove), "/remove_favorite/");
        assert_eq!(endpoints.add_review("456"), "/playground/456/add_review/");
        assert_eq!(endpoints.facility_detail("456"), "/facilities/456/");
        assert_eq!(endpoints.review_list("456"), "/playground/456/reviews/");
    }

    #[test]
    fn ids_are_path_encoded() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.add_review("../x"), "/playground/..%2Fx/add_review/");
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let endpoints: Endpoints =
            serde_json::from_str(r#"{"add_review": "/api/items/{id}/reviews"}"#).unwrap();
        assert_eq!(endpoints.add_review("9"), "/api/items/9/reviews");
        assert_eq!(endpoints.add_favorite, "/add_favorite/");
    }
}
