mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{Factory, TestApp};

#[tokio::test]
async fn test_create_task_applies_defaults() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user("ana").await;
    let project = factory.create_project("Launch").await;

    let response = app
        .server
        .post("/tasks")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "title": "Write docs",
            "projectId": project.id,
            "authorUserId": auth.user.user_id
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["status"], "To Do");
    assert_eq!(body["priority"], "Medium");
    assert_eq!(body["author"]["username"], "ana");
    assert!(body["assignee"].is_null());
    assert_eq!(body["comments"], json!([]));
    assert_eq!(body["attachments"], json!([]));
}

#[tokio::test]
async fn test_create_task_missing_required_fields() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user("ana").await;
    let project = factory.create_project("Launch").await;
    let author = auth.user.user_id;

    let payloads = [
        json!({ "projectId": project.id, "authorUserId": author }),
        json!({ "title": "", "projectId": project.id, "authorUserId": author }),
        json!({ "title": " \t ", "projectId": project.id, "authorUserId": author }),
        json!({ "title": "Write docs", "authorUserId": author }),
        json!({ "title": "Write docs", "projectId": null, "authorUserId": author }),
        json!({ "title": "Write docs", "projectId": 0, "authorUserId": author }),
        json!({ "title": "Write docs", "projectId": project.id }),
        json!({ "title": "Write docs", "projectId": project.id, "authorUserId": "" }),
    ];

    for payload in payloads {
        let response = app
            .server
            .post("/tasks")
            .add_header("Authorization", auth.auth_header())
            .json(&payload)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["details"],
            "Missing required fields: title, projectId, and authorUserId are required",
            "payload: {}",
            payload
        );
    }

    // Nothing was written
    let tasks: Vec<Value> = app
        .server
        .get("/tasks")
        .add_query_param("projectId", project.id)
        .add_header("Authorization", auth.auth_header())
        .await
        .json();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_create_task_coerces_numeric_strings() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user("ana").await;
    let bo = factory.create_user("bo").await;
    let project = factory.create_project("Launch").await;

    let response = app
        .server
        .post("/tasks")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "title": "Write docs",
            "priority": "Urgent",
            "tags": "docs, api",
            "points": "5",
            "projectId": project.id.to_string(),
            "authorUserId": auth.user.user_id.to_string(),
            "assignedUserId": bo.user.user_id.to_string()
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["points"], 5);
    assert_eq!(body["projectId"], project.id);
    assert_eq!(body["priority"], "Urgent");
    assert_eq!(body["tags"], "docs, api");
    assert_eq!(body["assignee"]["username"], "bo");
}

#[tokio::test]
async fn test_create_task_rejects_non_numeric_ids() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user("ana").await;

    let response = app
        .server
        .post("/tasks")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "title": "Write docs",
            "projectId": "launch",
            "authorUserId": auth.user.user_id
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_date_only_input_round_trips() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user("ana").await;
    let project = factory.create_project("Launch").await;

    let response = app
        .server
        .post("/tasks")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "title": "Write docs",
            "startDate": "2024-03-01",
            "dueDate": "2024-03-08T17:30:00Z",
            "projectId": project.id,
            "authorUserId": auth.user.user_id
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["startDate"], "2024-03-01T00:00:00Z");
    assert_eq!(created["dueDate"], "2024-03-08T17:30:00Z");

    let tasks: Vec<Value> = app
        .server
        .get("/tasks")
        .add_query_param("projectId", project.id)
        .add_header("Authorization", auth.auth_header())
        .await
        .json();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["startDate"], "2024-03-01T00:00:00Z");
    assert_eq!(tasks[0]["dueDate"], "2024-03-08T17:30:00Z");
}

#[tokio::test]
async fn test_get_tasks_expands_relations() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let ana = factory.create_user("ana").await;
    let bo = factory.create_user("bo").await;
    let launch = factory.create_project("Launch").await;
    let other = factory.create_project("Other").await;

    let task = factory
        .create_task(launch.id, "Write docs", ana.user.user_id, Some(bo.user.user_id))
        .await;
    factory.create_task(other.id, "Elsewhere", ana.user.user_id, None).await;
    factory.add_comment(task.id, bo.user.user_id, "On it").await;

    let response = app
        .server
        .get("/tasks")
        .add_query_param("projectId", launch.id)
        .add_header("Authorization", ana.auth_header())
        .await;

    response.assert_status_ok();

    let tasks: Vec<Value> = response.json();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Write docs");
    assert_eq!(tasks[0]["author"]["username"], "ana");
    assert_eq!(tasks[0]["assignee"]["username"], "bo");
    assert_eq!(tasks[0]["comments"][0]["text"], "On it");
    assert_eq!(tasks[0]["attachments"], json!([]));
}

#[tokio::test]
async fn test_get_tasks_requires_project_id() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user("ana").await;

    let response = app
        .server
        .get("/tasks")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_tasks_authored_or_assigned() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let ana = factory.create_user("ana").await;
    let bo = factory.create_user("bo").await;
    let cy = factory.create_user("cy").await;
    let project = factory.create_project("Launch").await;

    let authored = factory
        .create_task(project.id, "Authored", ana.user.user_id, None)
        .await;
    let assigned = factory
        .create_task(project.id, "Assigned", bo.user.user_id, Some(ana.user.user_id))
        .await;
    let both = factory
        .create_task(project.id, "Both", ana.user.user_id, Some(ana.user.user_id))
        .await;
    factory
        .create_task(project.id, "Unrelated", bo.user.user_id, Some(cy.user.user_id))
        .await;

    let response = app
        .server
        .get(&format!("/tasks/user/{}", ana.user.user_id))
        .add_header("Authorization", ana.auth_header())
        .await;

    response.assert_status_ok();

    let tasks: Vec<Value> = response.json();
    let mut ids: Vec<i64> = tasks.iter().map(|t| t["id"].as_i64().unwrap()).collect();
    ids.sort_unstable();
    let mut expected = vec![authored.id as i64, assigned.id as i64, both.id as i64];
    expected.sort_unstable();
    assert_eq!(ids, expected);

    let assigned_json = tasks
        .iter()
        .find(|t| t["id"] == assigned.id)
        .unwrap();
    assert_eq!(assigned_json["author"]["username"], "bo");
    assert_eq!(assigned_json["assignee"]["username"], "ana");
}

#[tokio::test]
async fn test_update_status_is_stored_verbatim() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user("ana").await;
    let project = factory.create_project("Launch").await;
    let task = factory
        .create_task(project.id, "Write docs", auth.user.user_id, None)
        .await;

    let response = app
        .server
        .patch(&format!("/tasks/{}/status", task.id))
        .add_header("Authorization", auth.auth_header())
        .json(&json!({ "status": "Bogus" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "Bogus");

    let tasks: Vec<Value> = app
        .server
        .get("/tasks")
        .add_query_param("projectId", project.id)
        .add_header("Authorization", auth.auth_header())
        .await
        .json();
    assert_eq!(tasks[0]["status"], "Bogus");
}

#[tokio::test]
async fn test_update_status_of_missing_task() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user("ana").await;

    let response = app
        .server
        .patch("/tasks/4242/status")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({ "status": "Completed" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Database error");
    assert!(body.get("details").is_none());
}
