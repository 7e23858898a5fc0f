//! Repository and dashboard behaviour over the on-disk store.

use std::fmt::Display;

use jiff::Timestamp;
use jiff::tz::TimeZone;
use tasklane_app::{Dashboard, StatusFilter, TaskRepository, list_filter};
use tasklane_core::Task;
use tasklane_store::FileStore;
use tempfile::tempdir;

const OWNER: &str = "carol@example.com";

fn ok<T, E: Display>(result: Result<T, E>, context: &str) -> T {
    result.unwrap_or_else(|err| panic!("{context}: {err}"))
}

fn ts(raw: &str) -> Timestamp {
    ok(raw.parse(), "valid timestamp")
}

fn repo_at(path: &std::path::Path) -> TaskRepository<FileStore> {
    let tz = ok(TimeZone::get("Europe/Paris"), "zone");
    TaskRepository::new(FileStore::open(path)).with_time_zone(tz)
}

#[tokio::test]
async fn tasks_survive_reopening_the_store() {
    let dir = ok(tempdir(), "tempdir");
    let path = dir.path().join("tasks.json");

    let id = {
        let repo = repo_at(&path);
        ok(
            repo.upsert_task(Task::new("renew passport").with_important(true), Some(OWNER))
                .await,
            "create",
        )
    };

    let reopened = repo_at(&path);
    let task = ok(reopened.get_task(&id).await, "get after reopen");
    assert_eq!(task.title, "renew passport");
    assert_eq!(task.owner_email, OWNER);
    assert!(task.important);

    let listed = ok(
        reopened
            .list_tasks(&list_filter(Some(OWNER), StatusFilter::Active, Some(true)))
            .await,
        "list",
    );
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn dashboard_counts_per_owner() {
    let dir = ok(tempdir(), "tempdir");
    let repo = repo_at(&dir.path().join("tasks.json"));
    let now = ts("2025-07-14T08:00:00Z");

    let fixtures = [
        Task::new("today, open").with_due_date(ts("2025-07-14T20:00:00Z")),
        Task::new("today, done")
            .with_completed(true)
            .with_due_date(ts("2025-07-14T06:00:00Z")),
        Task::new("urgent").with_important(true),
        Task::new("urgent but done")
            .with_important(true)
            .with_completed(true),
        // 00:30 on the 15th in Paris.
        Task::new("tomorrow").with_due_date(ts("2025-07-14T22:30:00Z")),
    ];
    for task in fixtures {
        ok(repo.upsert_task(task, Some(OWNER)).await, "create");
    }
    ok(
        repo.upsert_task(Task::new("someone else").with_due_date(now), Some("dave@example.com"))
            .await,
        "create",
    );

    let dashboard = ok(Dashboard::load(&repo, OWNER, now).await, "dashboard");
    assert_eq!(
        dashboard,
        Dashboard {
            completed: 2,
            active: 3,
            important: 1,
            due_today: 2,
        }
    );
}
