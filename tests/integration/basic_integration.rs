/// End-to-end tests exercising the tools against a real database
use habit_stats::*;
use tempfile::NamedTempFile;

fn storage() -> (NamedTempFile, SqliteStorage) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage =
        SqliteStorage::new(temp_file.path().to_path_buf()).expect("Failed to create storage");
    (temp_file, storage)
}

#[tokio::test]
async fn test_server_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = HabitServer::new(temp_file.path().to_path_buf()).await;

    assert!(server.is_ok());
    let server = server.unwrap();
    let _storage = server.storage();
    let _analytics = server.analytics();
}

#[tokio::test]
async fn test_database_persistence() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();

    {
        let server = HabitServer::new(db_path.clone())
            .await
            .expect("Failed to create first server");

        let params = CreateUserParams {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: Some(36),
            role: None,
            password: "secret".to_string(),
        };
        create_user(server.storage(), params, |raw| raw.to_string())
            .expect("user created");
    }

    // A second server over the same file must see the data
    let server = HabitServer::new(db_path)
        .await
        .expect("Failed to create second server");
    let users = server.storage().list_users().expect("users listed");

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "ada@example.com");
}

#[test]
fn test_user_and_habit_crud_flow() {
    let (_file, storage) = storage();

    let created = create_user(
        &storage,
        CreateUserParams {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: None,
            role: None,
            password: "secret".to_string(),
        },
        |raw| format!("hashed:{}", raw),
    )
    .expect("user created");

    // The pre-insert transform ran before the password hit the store
    assert_eq!(created.user.password, "hashed:secret");

    let habit = create_habit(
        &storage,
        CreateHabitParams {
            user_id: created.user.id.0,
            title: "Morning Run".to_string(),
            time: "07:30".to_string(),
            kind: "exercise".to_string(),
            status: None,
        },
    )
    .expect("habit created")
    .habit;

    assert!(!habit.status);

    let updated = update_habit(
        &storage,
        UpdateHabitParams {
            habit_id: habit.id.0,
            title: None,
            time: None,
            kind: None,
            status: Some(true),
        },
    )
    .expect("habit updated")
    .habit;

    assert!(updated.status);
    assert_eq!(updated.title, "Morning Run");
    assert_eq!(updated.created_at, habit.created_at);

    let listing = list_habits(
        &storage,
        ListHabitsParams {
            user_id: created.user.id.0,
        },
    )
    .expect("habits listed");
    assert_eq!(listing.habits.len(), 1);

    delete_habit(&storage, DeleteHabitParams { habit_id: habit.id.0 }).expect("habit deleted");

    let listing = list_habits(
        &storage,
        ListHabitsParams {
            user_id: created.user.id.0,
        },
    )
    .expect("habits listed");
    assert!(listing.habits.is_empty());
}

#[test]
fn test_user_update_flow() {
    let (_file, storage) = storage();

    let user = create_user(
        &storage,
        CreateUserParams {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: Some(36),
            role: None,
            password: "secret".to_string(),
        },
        |raw| format!("hashed:{}", raw),
    )
    .expect("user created")
    .user;

    let updated = update_user(
        &storage,
        UpdateUserParams {
            user_id: user.id.0,
            name: None,
            email: Some("ada@newhost.com".to_string()),
            age: Some(37),
            role: Some("admin".to_string()),
        },
    )
    .expect("user updated")
    .user;

    assert_eq!(updated.name, "Ada");
    assert_eq!(updated.email, "ada@newhost.com");
    assert_eq!(updated.age, Some(37));
    assert_eq!(updated.role, "admin");

    // The update round-trips through the store and leaves the credential alone
    let reloaded = storage.get_user(user.id).expect("user reloaded");
    assert_eq!(reloaded.email, "ada@newhost.com");
    assert_eq!(reloaded.password, "hashed:secret");
}

#[test]
fn test_user_update_rejects_taken_email() {
    let (_file, storage) = storage();

    create_user(
        &storage,
        CreateUserParams {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: None,
            role: None,
            password: "secret".to_string(),
        },
        |raw| raw.to_string(),
    )
    .expect("first user created");

    let second = create_user(
        &storage,
        CreateUserParams {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            age: None,
            role: None,
            password: "secret".to_string(),
        },
        |raw| raw.to_string(),
    )
    .expect("second user created")
    .user;

    let result = update_user(
        &storage,
        UpdateUserParams {
            user_id: second.id.0,
            name: None,
            email: Some("ada@example.com".to_string()),
            age: None,
            role: None,
        },
    );

    assert!(matches!(
        result,
        Err(ToolError::Storage(StorageError::DuplicateEmail { .. }))
    ));

    // Re-submitting your own email is not a conflict
    update_user(
        &storage,
        UpdateUserParams {
            user_id: second.id.0,
            name: None,
            email: Some("grace@example.com".to_string()),
            age: None,
            role: None,
        },
    )
    .expect("self-update accepted");
}

#[test]
fn test_unknown_user_update_is_not_found() {
    let (_file, storage) = storage();

    let result = update_user(
        &storage,
        UpdateUserParams {
            user_id: 42,
            name: Some("Nobody".to_string()),
            email: None,
            age: None,
            role: None,
        },
    );

    assert!(matches!(
        result,
        Err(ToolError::Storage(StorageError::UserNotFound { .. }))
    ));
}

#[test]
fn test_duplicate_email_rejected() {
    let (_file, storage) = storage();

    let params = || CreateUserParams {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        age: None,
        role: None,
        password: "secret".to_string(),
    };

    create_user(&storage, params(), |raw| raw.to_string()).expect("first user created");
    let result = create_user(&storage, params(), |raw| raw.to_string());

    assert!(matches!(
        result,
        Err(ToolError::Storage(StorageError::DuplicateEmail { .. }))
    ));
}

#[test]
fn test_deleting_user_cascades_to_habits() {
    let (_file, storage) = storage();

    let user = create_user(
        &storage,
        CreateUserParams {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: None,
            role: None,
            password: "secret".to_string(),
        },
        |raw| raw.to_string(),
    )
    .expect("user created")
    .user;

    let habit = create_habit(
        &storage,
        CreateHabitParams {
            user_id: user.id.0,
            title: "Read".to_string(),
            time: "21:00".to_string(),
            kind: "leisure".to_string(),
            status: None,
        },
    )
    .expect("habit created")
    .habit;

    delete_user(&storage, DeleteUserParams { user_id: user.id.0 }).expect("user deleted");

    let orphan = storage.get_habit(habit.id);
    assert!(matches!(
        orphan,
        Err(StorageError::HabitNotFound { .. })
    ));
}

#[test]
fn test_habits_for_unknown_user_is_not_found() {
    let (_file, storage) = storage();

    let result = list_habits(&storage, ListHabitsParams { user_id: 42 });

    assert!(matches!(
        result,
        Err(ToolError::Storage(StorageError::UserNotFound { .. }))
    ));
}

#[test]
fn test_daily_completion_through_tool_layer() {
    let (_file, storage) = storage();
    let engine = AnalyticsEngine::new();

    let user = create_user(
        &storage,
        CreateUserParams {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: None,
            role: None,
            password: "secret".to_string(),
        },
        |raw| raw.to_string(),
    )
    .expect("user created")
    .user;

    // Today's records through the normal insert path
    create_habit(
        &storage,
        CreateHabitParams {
            user_id: user.id.0,
            title: "Run".to_string(),
            time: "07:30".to_string(),
            kind: "exercise".to_string(),
            status: Some(true),
        },
    )
    .expect("habit created");
    create_habit(
        &storage,
        CreateHabitParams {
            user_id: user.id.0,
            title: "Read".to_string(),
            time: "21:00".to_string(),
            kind: "leisure".to_string(),
            status: Some(false),
        },
    )
    .expect("habit created");

    let today = chrono::Utc::now().format("%d-%m-%Y").to_string();
    let stat = daily_completion(
        &storage,
        &engine,
        DailyCompletionParams {
            user_id: Some(user.id.0),
            date: Some(today),
        },
    )
    .expect("stat computed");

    assert_eq!(stat.total_tasks, 2);
    assert_eq!(stat.completed_tasks, 1);
    assert_eq!(stat.completion_percentage, "50.00%");
}

#[test]
fn test_missing_selector_is_rejected_before_querying() {
    let (_file, storage) = storage();
    let engine = AnalyticsEngine::new();

    let result = daily_completion(
        &storage,
        &engine,
        DailyCompletionParams {
            user_id: Some(1),
            date: None,
        },
    );
    assert!(matches!(
        result,
        Err(ToolError::Analytics(AnalyticsError::MissingParameter { name: "date" }))
    ));

    let result = weekly_completion(
        &storage,
        &engine,
        WeeklyCompletionParams {
            user_id: Some(1),
            month: None,
            year: Some(2025),
        },
    );
    assert!(matches!(
        result,
        Err(ToolError::Analytics(AnalyticsError::MissingParameter { name: "month" }))
    ));
}

#[test]
fn test_no_records_is_a_signal_not_an_error() {
    let (_file, storage) = storage();
    let engine = AnalyticsEngine::new();

    let user = create_user(
        &storage,
        CreateUserParams {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: None,
            role: None,
            password: "secret".to_string(),
        },
        |raw| raw.to_string(),
    )
    .expect("user created")
    .user;

    let result = daily_completion(
        &storage,
        &engine,
        DailyCompletionParams {
            user_id: Some(user.id.0),
            date: Some("26-04-2025".to_string()),
        },
    );

    match result {
        Err(e) => assert!(e.is_no_records()),
        Ok(_) => panic!("expected the no-records signal"),
    }
}
