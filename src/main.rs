use chrono::{Duration, Utc};
use dotenv::dotenv;

use taskhaven::auth::RegisterData;
use taskhaven::config::Config;
use taskhaven::models::{
    CreateTaskData, SortOrder, TaskFilters, TaskPriority, TaskSortField, TaskSortOptions,
    TaskStatus, UpdateTaskData,
};
use taskhaven::storage::MemoryStorage;
use taskhaven::{SessionOrchestrator, TaskOrchestrator};

/// Demo walkthrough of the full session and task lifecycle: register, create
/// a few tasks, complete one, then print the filtered list and statistics.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let session = SessionOrchestrator::new(&config, Box::new(MemoryStorage::new())).into_handle();
    session.borrow_mut().initialize().await;

    let result = session
        .borrow_mut()
        .register(&RegisterData {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .await;
    if !result.success {
        log::error!("registration failed: {:?}", result.error);
        return Ok(());
    }
    log::info!("signed in as {}", result.user.as_ref().map(|u| u.email.as_str()).unwrap_or("?"));

    let mut tasks = TaskOrchestrator::new(&session);

    let report = tasks
        .create_task(CreateTaskData {
            title: "Write quarterly report".to_string(),
            description: "Numbers for Q3".to_string(),
            status: None,
            priority: Some(TaskPriority::High),
            due_date: Utc::now() + Duration::days(2),
            tags: Some(vec!["work".to_string()]),
        })
        .await?;

    tasks
        .create_task(CreateTaskData {
            title: "Buy groceries".to_string(),
            description: "Milk, eggs, bread".to_string(),
            status: None,
            priority: Some(TaskPriority::Low),
            due_date: Utc::now(),
            tags: Some(vec!["errands".to_string()]),
        })
        .await?;

    tasks
        .update_task(
            report.id,
            &UpdateTaskData {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .await?;

    let listing = tasks.get_filtered_tasks(
        &TaskFilters::default(),
        Some(&TaskSortOptions {
            field: TaskSortField::DueDate,
            order: SortOrder::Asc,
        }),
    );
    println!("{}", serde_json::to_string_pretty(&listing)?);
    println!(
        "{}",
        serde_json::to_string_pretty(&tasks.get_task_statistics())?
    );

    session.borrow_mut().logout();
    Ok(())
}
