//! Integration tests for the repository layer against a real database.

use assert_matches::assert_matches;
use sqlx::PgPool;
use timetrack_core::pagination::PageRequest;
use timetrack_core::patch::Patch;
use timetrack_core::timer::TimerError;
use timetrack_db::models::project::{CreateProject, UpdateProject};
use timetrack_db::models::task::{CreateTask, UpdateTask};
use timetrack_db::models::user::{CreateUser, UpdateUser, User, UserResponse, UserSearch};
use timetrack_db::repositories::{ProjectRepo, TaskRepo, TimeEntryRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        name: "Ivan".to_string(),
        surname: "Petrov".to_string(),
        patronymic: None,
        address: "Lenina 1".to_string(),
        passport_series: Some(1234),
        passport_number: Some(567890),
    };
    UserRepo::create(pool, &input).await.unwrap()
}

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: Some("desc".to_string()),
    }
}

fn new_task(name: &str) -> CreateTask {
    CreateTask {
        name: name.to_string(),
        description: String::new(),
    }
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some("23505") && db.constraint() == Some(constraint)
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_violates_unique_index(pool: PgPool) {
    new_user(&pool, "dup@example.com").await;
    let input = CreateUser {
        email: "dup@example.com".to_string(),
        password_hash: "x".to_string(),
        name: "A".to_string(),
        surname: "B".to_string(),
        patronymic: None,
        address: "C".to_string(),
        passport_series: None,
        passport_number: None,
    };
    let err = UserRepo::create(&pool, &input).await.unwrap_err();
    assert!(is_unique_violation(&err, "uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sanitized_user_drops_passport(pool: PgPool) {
    let user = new_user(&pool, "san@example.com").await;
    assert_eq!(user.passport_number, Some(567890));

    let json = serde_json_value(&UserResponse::from(user));
    assert!(json.get("passport_number").is_none());
    assert!(json.get("passport_series").is_none());
    assert!(json.get("password_hash").is_none());
}

fn serde_json_value(user: &UserResponse) -> serde_json::Value {
    serde_json::to_value(user).unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_distinguishes_missing_null_and_empty(pool: PgPool) {
    let user = new_user(&pool, "patch@example.com").await;
    UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            patronymic: Patch::Value("Ivanovich".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Empty string is a real value; missing fields are untouched.
    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            address: Patch::Value(String::new()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.address, "");
    assert_eq!(updated.name, "Ivan");
    assert_eq!(updated.patronymic.as_deref(), Some("Ivanovich"));

    // Null clears a nullable column.
    let cleared = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            patronymic: Patch::Null,
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.patronymic, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_user_returns_none(pool: PgPool) {
    let result = UserRepo::update(&pool, 999_999, &UpdateUser::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_filters_and_paginates(pool: PgPool) {
    for i in 0..5 {
        new_user(&pool, &format!("user{i}@example.com")).await;
    }
    new_user(&pool, "other@corp.test").await;

    let search = UserSearch {
        email: Some("EXAMPLE".to_string()),
        ..Default::default()
    };
    assert_eq!(UserRepo::count(&pool, &search).await.unwrap(), 5);

    let page = UserRepo::search(&pool, &search, PageRequest::new(Some(2), Some(2)))
        .await
        .unwrap();
    let emails: Vec<&str> = page.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["user2@example.com", "user3@example.com"]);

    let none = UserSearch {
        min_id: Some(i64::MAX),
        ..Default::default()
    };
    assert_eq!(UserRepo::count(&pool, &none).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_treats_like_metacharacters_literally(pool: PgPool) {
    new_user(&pool, "a_b@example.com").await;
    new_user(&pool, "axb@example.com").await;

    let underscore = UserSearch {
        email: Some("a_b".to_string()),
        ..Default::default()
    };
    let found = UserRepo::search(&pool, &underscore, PageRequest::new(None, None))
        .await
        .unwrap();
    let emails: Vec<&str> = found.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["a_b@example.com"]);

    let percent = UserSearch {
        email: Some("%".to_string()),
        ..Default::default()
    };
    assert_eq!(UserRepo::count(&pool, &percent).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_owning_projects_cannot_be_deleted(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    ProjectRepo::create(&pool, owner.id, &new_project("Kept"))
        .await
        .unwrap();

    assert!(UserRepo::owns_projects(&pool, owner.id).await.unwrap());
    assert!(UserRepo::delete(&pool, owner.id).await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_user_cascades_memberships(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let member = new_user(&pool, "member@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();
    ProjectRepo::add_member(&pool, project.id, member.id)
        .await
        .unwrap();

    assert!(!UserRepo::owns_projects(&pool, member.id).await.unwrap());
    assert!(UserRepo::delete(&pool, member.id).await.unwrap());
    assert!(!ProjectRepo::is_member(&pool, project.id, member.id)
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Projects and memberships
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_makes_creator_owner_and_member(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("Apollo"))
        .await
        .unwrap();

    assert_eq!(project.creator_id, owner.id);
    assert!(ProjectRepo::is_owner(&pool, project.id, owner.id).await.unwrap());
    assert!(ProjectRepo::is_member(&pool, project.id, owner.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_rolls_back_on_failure(pool: PgPool) {
    // No such creator: the project insert fails and nothing is left behind.
    let result = ProjectRepo::create(&pool, 424_242, &new_project("Ghost")).await;
    assert!(result.is_err());

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_update_patch_semantics(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("Apollo"))
        .await
        .unwrap();

    let renamed = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            name: Patch::Value("Gemini".to_string()),
            description: Patch::Missing,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "Gemini");
    assert_eq!(renamed.description.as_deref(), Some("desc"));

    let cleared = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            name: Patch::Missing,
            description: Patch::Null,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.name, "Gemini");
    assert_eq!(cleared.description, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_member_is_not_idempotent(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let member = new_user(&pool, "member@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();

    ProjectRepo::add_member(&pool, project.id, member.id)
        .await
        .unwrap();
    let err = ProjectRepo::add_member(&pool, project.id, member.id)
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, "uq_project_members"));

    let members = ProjectRepo::list_members(&pool, project.id).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_absent_member_reports_false(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let stranger = new_user(&pool, "stranger@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();

    assert!(!ProjectRepo::remove_member(&pool, project.id, stranger.id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_leaving_project_drops_task_memberships(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let member = new_user(&pool, "member@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, project.id, &new_task("T"))
        .await
        .unwrap();
    ProjectRepo::add_member(&pool, project.id, member.id)
        .await
        .unwrap();
    TaskRepo::add_member(&pool, task.id, member.id).await.unwrap();

    assert!(ProjectRepo::remove_member(&pool, project.id, member.id)
        .await
        .unwrap());
    assert!(!TaskRepo::is_member(&pool, task.id, member.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_leaving_project_stops_running_timer(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let member = new_user(&pool, "member@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, project.id, &new_task("T"))
        .await
        .unwrap();
    ProjectRepo::add_member(&pool, project.id, member.id)
        .await
        .unwrap();
    TaskRepo::add_member(&pool, task.id, member.id).await.unwrap();
    TimeEntryRepo::start(&pool, task.id, member.id)
        .await
        .unwrap()
        .unwrap();

    assert!(ProjectRepo::remove_member(&pool, project.id, member.id)
        .await
        .unwrap());

    let open = TimeEntryRepo::find_open_in_project(&pool, project.id, member.id)
        .await
        .unwrap();
    assert!(open.is_none());
    let (closed,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM time_entries WHERE user_id = $1 AND ended_at IS NOT NULL",
    )
    .bind(member.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(closed, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_project_cascades(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, project.id, &new_task("T"))
        .await
        .unwrap();
    TimeEntryRepo::start(&pool, task.id, owner.id)
        .await
        .unwrap()
        .unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());
    assert!(TaskRepo::find_by_id(&pool, task.id).await.unwrap().is_none());
    assert!(TimeEntryRepo::find_open_in_project(&pool, project.id, owner.id)
        .await
        .unwrap()
        .is_none());
    assert!(!UserRepo::owns_projects(&pool, owner.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_is_scoped_to_its_project(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let a = ProjectRepo::create(&pool, owner.id, &new_project("A"))
        .await
        .unwrap();
    let b = ProjectRepo::create(&pool, owner.id, &new_project("B"))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, a.id, &new_task("T")).await.unwrap();

    assert!(TaskRepo::find_in_project(&pool, a.id, task.id)
        .await
        .unwrap()
        .is_some());
    assert!(TaskRepo::find_in_project(&pool, b.id, task.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(TaskRepo::list_by_project(&pool, b.id).await.unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_update_marks_finished(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, project.id, &new_task("T"))
        .await
        .unwrap();

    let updated = TaskRepo::update(
        &pool,
        task.id,
        &UpdateTask {
            finished: Patch::Value(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(updated.finished);
    assert_eq!(updated.name, "T");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_membership_lifecycle(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let member = new_user(&pool, "member@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, project.id, &new_task("T"))
        .await
        .unwrap();

    TaskRepo::add_member(&pool, task.id, member.id).await.unwrap();
    let err = TaskRepo::add_member(&pool, task.id, member.id)
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, "uq_task_members"));
    assert_eq!(TaskRepo::list_members(&pool, task.id).await.unwrap().len(), 1);

    assert!(TaskRepo::remove_member(&pool, task.id, member.id).await.unwrap());
    assert!(!TaskRepo::remove_member(&pool, task.id, member.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_start_for_missing_user_is_row_not_found(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, project.id, &new_task("T"))
        .await
        .unwrap();

    let result = TimeEntryRepo::start(&pool, task.id, 999_999).await;
    assert_matches!(result, Err(sqlx::Error::RowNotFound));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_starts_admit_exactly_one(pool: PgPool) {
    let user = new_user(&pool, "worker@example.com").await;
    let project = ProjectRepo::create(&pool, user.id, &new_project("P"))
        .await
        .unwrap();
    let t1 = TaskRepo::create(&pool, project.id, &new_task("T1"))
        .await
        .unwrap();
    let t2 = TaskRepo::create(&pool, project.id, &new_task("T2"))
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        TimeEntryRepo::start(&pool, t1.id, user.id),
        TimeEntryRepo::start(&pool, t2.id, user.id),
    );
    let outcomes = [first.unwrap(), second.unwrap()];

    let started = outcomes.iter().filter(|o| o.is_ok()).count();
    assert_eq!(started, 1);
    let rejected = outcomes
        .iter()
        .find_map(|o| o.as_ref().err())
        .unwrap();
    assert_matches!(rejected, TimerError::AlreadyActive { project_id } if *project_id == project.id);

    let (open,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM time_entries WHERE user_id = $1 AND ended_at IS NULL",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(open, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_open_entry_per_project(pool: PgPool) {
    let user = new_user(&pool, "worker@example.com").await;
    let project = ProjectRepo::create(&pool, user.id, &new_project("P"))
        .await
        .unwrap();
    let other = ProjectRepo::create(&pool, user.id, &new_project("Q"))
        .await
        .unwrap();
    let t1 = TaskRepo::create(&pool, project.id, &new_task("T1"))
        .await
        .unwrap();
    let t2 = TaskRepo::create(&pool, project.id, &new_task("T2"))
        .await
        .unwrap();
    let t3 = TaskRepo::create(&pool, other.id, &new_task("T3"))
        .await
        .unwrap();

    let entry = TimeEntryRepo::start(&pool, t1.id, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.project_id, project.id);
    assert!(entry.ended_at.is_none());

    // Sibling task in the same project is blocked.
    let blocked = TimeEntryRepo::start(&pool, t2.id, user.id).await.unwrap();
    assert_matches!(blocked, Err(TimerError::AlreadyActive { project_id }) if project_id == project.id);

    // A different project is independent.
    TimeEntryRepo::start(&pool, t3.id, user.id)
        .await
        .unwrap()
        .unwrap();

    // After stopping T1, T2 may start.
    TimeEntryRepo::stop(&pool, t1.id, user.id)
        .await
        .unwrap()
        .unwrap();
    TimeEntryRepo::start(&pool, t2.id, user.id)
        .await
        .unwrap()
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removing_task_member_stops_their_timer(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let member = new_user(&pool, "member@example.com").await;
    let project = ProjectRepo::create(&pool, owner.id, &new_project("P"))
        .await
        .unwrap();
    let t1 = TaskRepo::create(&pool, project.id, &new_task("T1"))
        .await
        .unwrap();
    let t2 = TaskRepo::create(&pool, project.id, &new_task("T2"))
        .await
        .unwrap();
    ProjectRepo::add_member(&pool, project.id, member.id)
        .await
        .unwrap();
    TaskRepo::add_member(&pool, t1.id, member.id).await.unwrap();
    TaskRepo::add_member(&pool, t2.id, member.id).await.unwrap();
    TimeEntryRepo::start(&pool, t1.id, member.id)
        .await
        .unwrap()
        .unwrap();

    assert!(TaskRepo::remove_member(&pool, t1.id, member.id).await.unwrap());
    assert!(!TaskRepo::remove_member(&pool, t1.id, member.id).await.unwrap());

    // The entry on T1 was closed, so a sibling may start.
    TimeEntryRepo::start(&pool, t2.id, member.id)
        .await
        .unwrap()
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stop_twice_fails_and_keeps_closed_row(pool: PgPool) {
    let user = new_user(&pool, "worker@example.com").await;
    let project = ProjectRepo::create(&pool, user.id, &new_project("P"))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, project.id, &new_task("T"))
        .await
        .unwrap();

    let idle = TimeEntryRepo::stop(&pool, task.id, user.id).await.unwrap();
    assert_matches!(idle, Err(TimerError::NoActiveEntry { .. }));

    TimeEntryRepo::start(&pool, task.id, user.id)
        .await
        .unwrap()
        .unwrap();
    let closed = TimeEntryRepo::stop(&pool, task.id, user.id)
        .await
        .unwrap()
        .unwrap();
    let ended_at = closed.ended_at.unwrap();

    let again = TimeEntryRepo::stop(&pool, task.id, user.id).await.unwrap();
    assert_matches!(again, Err(TimerError::NoActiveEntry { task_id }) if task_id == task.id);

    let (still,): (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("SELECT ended_at FROM time_entries WHERE id = $1")
            .bind(closed.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(still, ended_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_index_rejects_second_open_entry(pool: PgPool) {
    let user = new_user(&pool, "worker@example.com").await;
    let project = ProjectRepo::create(&pool, user.id, &new_project("P"))
        .await
        .unwrap();
    let t1 = TaskRepo::create(&pool, project.id, &new_task("T1"))
        .await
        .unwrap();
    let t2 = TaskRepo::create(&pool, project.id, &new_task("T2"))
        .await
        .unwrap();

    TimeEntryRepo::start(&pool, t1.id, user.id)
        .await
        .unwrap()
        .unwrap();

    // Bypass the repository check and hit the index directly.
    let err = sqlx::query(
        "INSERT INTO time_entries (task_id, project_id, user_id) VALUES ($1, $2, $3)",
    )
    .bind(t2.id)
    .bind(project.id)
    .bind(user.id)
    .execute(&pool)
    .await
    .unwrap_err();
    assert!(is_unique_violation(
        &err,
        timetrack_db::repositories::time_entry_repo::OPEN_ENTRY_INDEX
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_productivity_counts_closed_entries_only(pool: PgPool) {
    let user = new_user(&pool, "worker@example.com").await;
    let project = ProjectRepo::create(&pool, user.id, &new_project("P"))
        .await
        .unwrap();
    let t1 = TaskRepo::create(&pool, project.id, &new_task("T1"))
        .await
        .unwrap();
    let t2 = TaskRepo::create(&pool, project.id, &new_task("T2"))
        .await
        .unwrap();

    // 90 closed minutes on T1, 20 on T2, plus an open entry on T1.
    sqlx::query(
        "INSERT INTO time_entries (task_id, project_id, user_id, started_at, ended_at) VALUES
            ($1, $3, $4, NOW() - INTERVAL '5 hours', NOW() - INTERVAL '4 hours'),
            ($1, $3, $4, NOW() - INTERVAL '3 hours', NOW() - INTERVAL '150 minutes'),
            ($2, $3, $4, NOW() - INTERVAL '2 hours', NOW() - INTERVAL '100 minutes'),
            ($1, $3, $4, NOW() - INTERVAL '10 minutes', NULL)",
    )
    .bind(t1.id)
    .bind(t2.id)
    .bind(project.id)
    .bind(user.id)
    .execute(&pool)
    .await
    .unwrap();

    let stats = TimeEntryRepo::member_productivity(&pool, project.id, user.id)
        .await
        .unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].task_id, t1.id);
    assert_eq!((stats[0].spent_hours, stats[0].spent_minutes), (1, 30));
    assert_eq!(stats[1].task_id, t2.id);
    assert_eq!((stats[1].spent_hours, stats[1].spent_minutes), (0, 20));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_productivity_is_empty_without_entries(pool: PgPool) {
    let user = new_user(&pool, "worker@example.com").await;
    let project = ProjectRepo::create(&pool, user.id, &new_project("P"))
        .await
        .unwrap();

    let stats = TimeEntryRepo::member_productivity(&pool, project.id, user.id)
        .await
        .unwrap();
    assert!(stats.is_empty());
}
