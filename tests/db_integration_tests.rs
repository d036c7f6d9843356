//! Integration tests for the database layer.
//!
//! These tests verify the repository operations using an in-memory SQLite database.

use std::thread::sleep;
use std::time::Duration;
use taskboard::db::Database;
use taskboard::types::TaskInput;

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn input(title: &str) -> TaskInput {
    TaskInput::new(title, None, false).expect("valid title")
}

mod create_tests {
    use super::*;

    #[test]
    fn create_task_applies_defaults() {
        let db = setup_db();

        let task = db.create_task(&input("  Buy milk ")).unwrap();

        assert!(task.id > 0);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
        assert!(!task.created_at.is_empty());
    }

    #[test]
    fn create_task_keeps_description_and_completed() {
        let db = setup_db();

        let task = db
            .create_task(&TaskInput::new("Write report", Some("Q3 numbers".into()), true).unwrap())
            .unwrap();

        assert_eq!(task.description, "Q3 numbers");
        assert!(task.completed);
    }

    #[test]
    fn ids_increase_and_are_never_reused() {
        let db = setup_db();

        let first = db.create_task(&input("first")).unwrap();
        let second = db.create_task(&input("second")).unwrap();
        assert!(second.id > first.id);

        assert!(db.delete_task(second.id).unwrap());
        let third = db.create_task(&input("third")).unwrap();
        assert!(third.id > second.id);
    }

    #[test]
    fn blank_title_never_reaches_storage() {
        let db = setup_db();

        assert!(TaskInput::new("   ", None, false).is_err());
        assert!(TaskInput::new("", Some("desc".into()), true).is_err());
        assert_eq!(db.count_tasks().unwrap(), 0);
    }

    #[test]
    fn storage_rejects_blank_title_inserted_directly() {
        let db = setup_db();

        let result = db.with_conn(|conn| {
            conn.execute("INSERT INTO tasks (title) VALUES ('   ')", [])?;
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(db.count_tasks().unwrap(), 0);
    }
}

mod list_tests {
    use super::*;

    #[test]
    fn list_empty_database() {
        let db = setup_db();
        assert!(db.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn list_returns_newest_first() {
        let db = setup_db();

        let a = db.create_task(&input("A")).unwrap();
        let b = db.create_task(&input("B")).unwrap();

        let tasks = db.list_tasks().unwrap();
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn list_orders_by_creation_time_across_updates() {
        let db = setup_db();

        let a = db.create_task(&input("A")).unwrap();
        sleep(Duration::from_millis(5));
        let b = db.create_task(&input("B")).unwrap();
        sleep(Duration::from_millis(5));

        // Updating the older task must not move it to the front.
        db.update_task(a.id, &input("A edited")).unwrap();

        let titles: Vec<String> = db.list_tasks().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["B".to_string(), "A edited".to_string()]);
        assert_eq!(db.list_tasks().unwrap()[0].id, b.id);
    }

    #[test]
    fn created_task_round_trips_through_list() {
        let db = setup_db();

        let created = db
            .create_task(&TaskInput::new(" Plan trip ", Some("book hotel".into()), true).unwrap())
            .unwrap();

        let listed = db.list_tasks().unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(listed[0].title, "Plan trip");
        assert_eq!(listed[0].description, "book hotel");
        assert!(listed[0].completed);
    }
}

mod update_tests {
    use super::*;

    #[test]
    fn update_overwrites_fields() {
        let db = setup_db();
        let task = db.create_task(&input("Buy milk")).unwrap();

        let updated = db
            .update_task(
                task.id,
                &TaskInput::new(" Buy oat milk ", Some("2 litres".into()), true).unwrap(),
            )
            .unwrap()
            .expect("task exists");

        assert_eq!(updated.id, task.id);
        assert_eq!(updated.title, "Buy oat milk");
        assert_eq!(updated.description, "2 litres");
        assert!(updated.completed);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[test]
    fn update_replaces_omitted_fields_with_defaults() {
        let db = setup_db();
        let task = db
            .create_task(&TaskInput::new("t", Some("desc".into()), true).unwrap())
            .unwrap();

        let updated = db.update_task(task.id, &input("t")).unwrap().unwrap();

        assert_eq!(updated.description, "");
        assert!(!updated.completed);
    }

    #[test]
    fn update_advances_updated_at() {
        let db = setup_db();
        let task = db.create_task(&input("Buy milk")).unwrap();

        sleep(Duration::from_millis(5));
        let updated = db.update_task(task.id, &input("Buy milk")).unwrap().unwrap();

        assert!(updated.updated_at >= task.updated_at);
        assert!(updated.updated_at > task.created_at);
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        let db = setup_db();
        let task = db.create_task(&input("Buy milk")).unwrap();

        // Pretend the row was last touched in the future.
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE tasks SET updated_at = '2999-01-01T00:00:00.000Z' WHERE id = ?1",
                [task.id],
            )?;
            Ok(())
        })
        .unwrap();

        let updated = db.update_task(task.id, &input("Buy bread")).unwrap().unwrap();
        assert_eq!(updated.updated_at, "2999-01-01T00:00:00.000Z");
        assert_eq!(updated.title, "Buy bread");
    }

    #[test]
    fn update_unknown_id_returns_none_and_changes_nothing() {
        let db = setup_db();
        let task = db.create_task(&input("Keep me")).unwrap();

        let result = db.update_task(task.id + 100, &input("Changed")).unwrap();

        assert!(result.is_none());
        assert_eq!(db.list_tasks().unwrap(), vec![task]);
    }
}

mod delete_tests {
    use super::*;

    #[test]
    fn delete_removes_task_from_listing() {
        let db = setup_db();
        let keep = db.create_task(&input("keep")).unwrap();
        let gone = db.create_task(&input("gone")).unwrap();

        assert!(db.delete_task(gone.id).unwrap());

        assert_eq!(db.list_tasks().unwrap(), vec![keep]);
        assert!(db.get_task(gone.id).unwrap().is_none());
    }

    #[test]
    fn delete_unknown_id_returns_false() {
        let db = setup_db();
        let task = db.create_task(&input("only")).unwrap();

        assert!(!db.delete_task(task.id + 1).unwrap());
        assert_eq!(db.count_tasks().unwrap(), 1);
    }

    #[test]
    fn delete_twice_reports_not_found_second_time() {
        let db = setup_db();
        let task = db.create_task(&input("once")).unwrap();

        assert!(db.delete_task(task.id).unwrap());
        assert!(!db.delete_task(task.id).unwrap());
    }
}

mod scenario_tests {
    use super::*;

    #[test]
    fn create_complete_delete_leaves_empty_list() {
        let db = setup_db();

        let task = db.create_task(&input(" Buy milk ")).unwrap();
        assert_eq!(task.title, "Buy milk");

        let done = db
            .update_task(task.id, &TaskInput::new("Buy milk", None, true).unwrap())
            .unwrap()
            .unwrap();
        assert!(done.completed);

        assert!(db.delete_task(task.id).unwrap());
        assert!(db.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn concurrent_creates_from_threads_all_persist() {
        let db = setup_db();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = db.clone();
                std::thread::spawn(move || db.create_task(&input(&format!("task {i}"))).unwrap())
            })
            .collect();
        let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap().id).collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 8);
        assert_eq!(db.count_tasks().unwrap(), 8);
    }
}
