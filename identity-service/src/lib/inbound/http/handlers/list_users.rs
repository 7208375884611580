use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::AccountStatus;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserPage;
use crate::inbound::http::extract::ValidatedQuery;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> Result<ApiSuccess<ListUsersResponseData>, ApiError> {
    let (filter, page) = query.try_into_parts()?;

    state
        .user_service
        .list_users(filter, page)
        .await
        .map_err(ApiError::from)
        .map(|ref page| {
            ApiSuccess::new(StatusCode::OK, "Users retrieved successfully", page.into())
        })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListUsersQuery {
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
    role: Option<String>,
    status: Option<String>,
}

impl ListUsersQuery {
    fn try_into_parts(self) -> Result<(UserFilter, PageRequest), UserError> {
        let page = PageRequest::new(self.page, self.limit)?;
        let role = self
            .role
            .filter(|r| !r.is_empty())
            .map(|r| r.parse::<Role>())
            .transpose()?;
        let status = self
            .status
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<AccountStatus>())
            .transpose()?;

        Ok((
            UserFilter {
                search: self.search.map(|s| s.trim().to_string()),
                role,
                status,
            },
            page,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListUsersResponseData {
    pub users: Vec<UserData>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl From<&UserPage> for ListUsersResponseData {
    fn from(page: &UserPage) -> Self {
        Self {
            users: page.items.iter().map(UserData::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        }
    }
}
