//! Repository for the `users` table.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::PgPool;
use timetrack_core::pagination::PageRequest;
use timetrack_core::types::DbId;

use super::USER_COLUMNS;
use crate::models::user::{CreateUser, UpdateUser, User, UserSearch};

/// Filter shared by [`UserRepo::search`] and [`UserRepo::count`]. A NULL
/// parameter disables its predicate. Text parameters arrive pre-escaped by
/// [`escape_like`], so they only ever match as literal substrings.
const SEARCH_FILTER: &str = r"
    ($1::BIGINT IS NULL OR u.id >= $1)
    AND ($2::BIGINT IS NULL OR u.id <= $2)
    AND ($3::TEXT IS NULL OR u.email ILIKE '%' || $3 || '%' ESCAPE '\')
    AND ($4::TEXT IS NULL OR u.name ILIKE '%' || $4 || '%' ESCAPE '\')
    AND ($5::TEXT IS NULL OR u.surname ILIKE '%' || $5 || '%' ESCAPE '\')
    AND ($6::TEXT IS NULL OR u.patronymic ILIKE '%' || $6 || '%' ESCAPE '\')
    AND ($7::TEXT IS NULL OR u.address ILIKE '%' || $7 || '%' ESCAPE '\')";

/// Escape the `LIKE` metacharacters `%`, `_` and the escape character itself.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn bind_search<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    search: &'q UserSearch,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(search.min_id)
        .bind(search.max_id)
        .bind(search.email.as_deref().map(escape_like))
        .bind(search.name.as_deref().map(escape_like))
        .bind(search.surname.as_deref().map(escape_like))
        .bind(search.patronymic.as_deref().map(escape_like))
        .bind(search.address.as_deref().map(escape_like))
}

/// Provides CRUD and search operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email violates `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users AS u
                (email, password_hash, name, surname, patronymic, address,
                 passport_series, passport_number)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(&input.surname)
            .bind(&input.patronymic)
            .bind(&input.address)
            .bind(input.passport_series)
            .bind(input.passport_number)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by normalized email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// One page of users matching `search`, ordered by ID.
    pub async fn search(
        pool: &PgPool,
        search: &UserSearch,
        page: PageRequest,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u
             WHERE {SEARCH_FILTER}
             ORDER BY u.id
             LIMIT $8 OFFSET $9"
        );
        bind_search(sqlx::query_as::<_, User>(&query), search)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Total number of users matching `search`, ignoring pagination.
    pub async fn count(pool: &PgPool, search: &UserSearch) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM users u WHERE {SEARCH_FILTER}");
        let (count,) = bind_search(sqlx::query_as::<_, (i64,)>(&query), search)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Apply a partial update. Each column is paired with an "is set" flag.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users AS u SET
                email = CASE WHEN $2 THEN $3 ELSE u.email END,
                password_hash = CASE WHEN $4 THEN $5 ELSE u.password_hash END,
                name = CASE WHEN $6 THEN $7 ELSE u.name END,
                surname = CASE WHEN $8 THEN $9 ELSE u.surname END,
                patronymic = CASE WHEN $10 THEN $11 ELSE u.patronymic END,
                address = CASE WHEN $12 THEN $13 ELSE u.address END,
                passport_series = CASE WHEN $14 THEN $15 ELSE u.passport_series END,
                passport_number = CASE WHEN $16 THEN $17 ELSE u.passport_number END
             WHERE u.id = $1
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(input.email.is_set())
            .bind(input.email.value())
            .bind(input.password_hash.is_set())
            .bind(input.password_hash.value())
            .bind(input.name.is_set())
            .bind(input.name.value())
            .bind(input.surname.is_set())
            .bind(input.surname.value())
            .bind(input.patronymic.is_set())
            .bind(input.patronymic.value())
            .bind(input.address.is_set())
            .bind(input.address.value())
            .bind(input.passport_series.is_set())
            .bind(input.passport_series.value().copied())
            .bind(input.passport_number.is_set())
            .bind(input.passport_number.value().copied())
            .fetch_optional(pool)
            .await
    }

    /// Grant or revoke the admin flag. Returns `None` if the user is absent.
    pub async fn set_admin(
        pool: &PgPool,
        id: DbId,
        is_admin: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users AS u SET is_admin = $2 WHERE u.id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(is_admin)
            .fetch_optional(pool)
            .await
    }

    /// Whether the user still owns at least one project.
    ///
    /// Owned projects block deletion of the user.
    pub async fn owns_projects(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM projects WHERE creator_id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Delete a user. Memberships and time entries cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
