//! Query-string parameter types.

use serde::Deserialize;
use timetrack_core::pagination::PageRequest;
use timetrack_db::models::user::UserSearch;

/// `GET /users` filters plus `?page=&limit=`.
///
/// Empty strings are treated as absent so `?email=` does not filter.
#[derive(Debug, Default, Deserialize)]
pub struct UserSearchParams {
    pub min_id: Option<i64>,
    pub max_id: Option<i64>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub address: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl UserSearchParams {
    pub fn into_parts(self) -> (UserSearch, PageRequest) {
        let page = PageRequest::new(self.page, self.limit);
        let search = UserSearch {
            min_id: self.min_id,
            max_id: self.max_id,
            email: non_empty(self.email),
            name: non_empty(self.name),
            surname: non_empty(self.surname),
            patronymic: non_empty(self.patronymic),
            address: non_empty(self.address),
        };
        (search, page)
    }
}
