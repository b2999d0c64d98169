//! The ordering engine running against the file-backed store

use kanban_rank::{
    column::{AddColumn, DeleteColumn, ReorderColumns, UpdateColumn},
    task::{AddTask, ListTaskLogs, MoveTask, RebalanceColumn, UpdateTask},
    types::{BoardKey, ColumnId, ColumnKey, OwnerId, ProjectId, TaskId},
    BoardContext, BoardError, BoardOperationProcessor, BoardStore, Execute, FileStore,
    OperationProcessor,
};
use std::sync::Arc;
use tempfile::TempDir;

fn owner() -> OwnerId {
    OwnerId::from_string("acme")
}

async fn context(root: &std::path::Path) -> BoardContext {
    let store = FileStore::new(root);
    store.create_directories().await.unwrap();
    BoardContext::new(Arc::new(store))
}

#[tokio::test]
async fn test_placements_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("board");
    let ctx = context(&root).await;

    AddColumn::new(owner(), ProjectId::from_string("site"), "To Do")
        .with_id("todo")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();

    let mut ids = Vec::new();
    for title in ["one", "two", "three"] {
        let value = AddTask::new(owner(), ColumnId::from_string("todo"), title)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        ids.push(TaskId::from_string(value["id"].as_str().unwrap()));
    }

    MoveTask::new(owner(), ids[2].clone(), "todo")
        .before(ids[0].clone())
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();

    // A fresh store over the same directory sees the new order
    let reopened = FileStore::new(&root);
    let titles: Vec<String> = reopened
        .list_tasks(&ColumnKey::new(owner(), ColumnId::from_string("todo")))
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["three", "one", "two"]);
}

#[tokio::test]
async fn test_reorder_and_rebalance_on_disk() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("board");
    let ctx = context(&root).await;
    let project = ProjectId::from_string("site");

    for slug in ["todo", "done"] {
        AddColumn::new(owner(), project.clone(), slug)
            .with_id(slug)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
    }

    let result = ReorderColumns::new(
        owner(),
        project.clone(),
        vec![ColumnId::from_string("done"), ColumnId::from_string("todo")],
    )
    .execute(&ctx)
    .await
    .into_result()
    .unwrap();
    assert_eq!(result["written"], 2);

    let store = FileStore::new(&root);
    let done = store
        .read_column(&owner(), &ColumnId::from_string("done"))
        .await
        .unwrap();
    assert_eq!(done.order, 0);

    // An empty column has nothing to respace
    let result = RebalanceColumn::new(owner(), "done")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    assert_eq!(result["written"], 0);
}

#[tokio::test]
async fn test_two_owners_each_create_todo() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("board");
    let ctx = context(&root).await;

    for name in ["alice", "bob"] {
        let owner = OwnerId::from_string(name);
        AddColumn::new(owner.clone(), ProjectId::from_string("site"), "To Do")
            .with_id("todo")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        AddTask::new(owner, ColumnId::from_string("todo"), format!("{name}'s task"))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
    }

    let store = FileStore::new(&root);
    for name in ["alice", "bob"] {
        let owner = OwnerId::from_string(name);
        assert!(root.join(name).join("columns").join("todo.json").exists());

        let tasks = store
            .list_tasks(&ColumnKey::new(owner, ColumnId::from_string("todo")))
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, format!("{name}'s task"));
    }

    // Deleting one owner's column leaves the other's alone
    DeleteColumn::new(OwnerId::from_string("carol"), "todo")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap_err();
    assert!(root.join("alice").join("columns").join("todo.json").exists());
}

#[tokio::test]
async fn test_edit_delete_and_project_log_on_disk() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("board");
    let ctx = context(&root).await;
    let processor = BoardOperationProcessor::with_actor("editor");
    let project = ProjectId::from_string("site");

    for slug in ["todo", "doing", "done"] {
        processor
            .process(&AddColumn::new(owner(), project.clone(), slug).with_id(slug), &ctx)
            .await
            .unwrap();
    }
    processor
        .process(&UpdateColumn::new(owner(), "doing").with_name("In Progress"), &ctx)
        .await
        .unwrap();

    let task = processor
        .process(
            &AddTask::new(owner(), ColumnId::from_string("doing"), "Launch")
                .with_priority("high"),
            &ctx,
        )
        .await
        .unwrap();
    let id = TaskId::from_string(task["id"].as_str().unwrap());

    // Non-empty columns stay
    let result = processor
        .process(&DeleteColumn::new(owner(), "doing"), &ctx)
        .await;
    assert!(matches!(result, Err(BoardError::ColumnNotEmpty { .. })));

    processor
        .process(&MoveTask::new(owner(), id.clone(), "done"), &ctx)
        .await
        .unwrap();
    processor
        .process(&DeleteColumn::new(owner(), "doing"), &ctx)
        .await
        .unwrap();
    processor
        .process(
            &UpdateTask::new(owner(), id.clone())
                .with_title("Launch v2")
                .with_due_date("2026-12-24"),
            &ctx,
        )
        .await
        .unwrap();

    let store = FileStore::new(&root);
    let columns = store
        .list_columns(&BoardKey::new(owner(), project.clone()))
        .await
        .unwrap();
    let positions: Vec<(&str, usize)> = columns.iter().map(|c| (c.id.as_str(), c.order)).collect();
    assert_eq!(positions, vec![("todo", 0), ("done", 1)]);

    let task = store.read_task(&owner(), &id).await.unwrap();
    assert_eq!(task.title, "Launch v2");
    assert_eq!(task.priority.as_deref(), Some("high"));
    assert_eq!(task.due_date.unwrap().to_string(), "2026-12-24");

    let logs = processor
        .process(&ListTaskLogs::new(owner(), project), &ctx)
        .await
        .unwrap();
    let ops: Vec<&str> = logs
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["op"].as_str().unwrap())
        .collect();
    assert_eq!(ops, vec!["update task", "move task", "add task"]);
    assert_eq!(logs[0]["task_title"], "Launch v2");
    assert_eq!(logs[0]["old_value"]["title"], "Launch");
    assert_eq!(logs[0]["actor"], "editor");

    let task_log = store.read_task_log(&owner(), &id, None).await.unwrap();
    assert_eq!(task_log.len(), 3);
}
