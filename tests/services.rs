//! Resource services: request shapes, query parameters and 204 handling.

use gateway::errors::ApiError;
use gateway::models::task::{TaskCreate, TaskFilter, TaskPriority, TaskStatus, TaskUpdate};
use gateway::models::tag::TagInput;
use gateway::Taskboard;
use reqwest::StatusCode;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn logged_in(server: &MockServer) -> Taskboard {
    let board = Taskboard::with_client(reqwest::Client::new(), &server.uri());
    board.credentials().set("tok", 900);
    board
}

fn task_json(id: i64, title: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "status": status,
        "priority": "medium",
        "tags": [{"id": 1, "name": "home", "color": "#00ff00"}],
        "created_at": "2026-04-01T09:00:00Z"
    })
}

mod tasks {
    use super::*;

    #[tokio::test]
    async fn test_list_passes_filters_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .and(query_param("status", "in_progress"))
            .and(query_param("project_id", "3"))
            .and(query_param("limit", "10"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tasks": [task_json(1, "Paint fence", "in_progress")],
                "total": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let filter = TaskFilter {
            status: Some(TaskStatus::InProgress),
            project_id: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        let list = assert_ok!(board.tasks.list(&filter).await);
        assert_eq!(list.total, 1);
        assert_eq!(list.tasks[0].title, "Paint fence");
        assert_eq!(list.tasks[0].tags[0].name, "home");
    }

    #[tokio::test]
    async fn test_create_sends_only_set_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks"))
            .and(body_json(json!({
                "title": "File taxes",
                "status": "todo",
                "priority": "urgent",
                "project_id": 2
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(task_json(5, "File taxes", "todo")))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let mut new_task = TaskCreate::new("File taxes");
        new_task.priority = TaskPriority::Urgent;
        new_task.project_id = Some(2);

        let task = assert_ok!(board.tasks.create(&new_task).await);
        assert_eq!(task.id, 5);
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let err = assert_err!(board.tasks.update(5, &TaskUpdate::default()).await);
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_update_puts_partial_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/tasks/5"))
            .and(body_json(json!({"status": "done"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_json(5, "File taxes", "done")))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let update = TaskUpdate {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        let task = assert_ok!(board.tasks.update(5, &update).await);
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_delete_accepts_204() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/tasks/5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        assert_ok!(board.tasks.delete(5).await);
    }

    #[tokio::test]
    async fn test_missing_task_reports_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Task not found"})))
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let err = assert_err!(board.tasks.get(404).await);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "Task not found");
    }

    #[tokio::test]
    async fn test_html_error_page_gets_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/1"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let err = assert_err!(board.tasks.get(1).await);
        assert_eq!(err.to_string(), "Request failed with status 502");
    }
}

mod labels {
    use super::*;

    #[tokio::test]
    async fn test_tags_create_and_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tags"))
            .and(body_json(json!({"name": "errands"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7, "name": "errands"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "name": "errands"},
                {"id": 8, "name": "work", "color": "#123456"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let tag = assert_ok!(
            board
                .tags
                .create(&TagInput {
                    name: "errands".into(),
                    color: None
                })
                .await
        );
        assert_eq!(tag.id, 7);

        let tags = assert_ok!(board.tags.list().await);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].color.as_deref(), Some("#123456"));
    }

    #[tokio::test]
    async fn test_category_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/categories/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        assert_ok!(board.categories.delete(3).await);
    }
}

mod notifications {
    use super::*;

    #[tokio::test]
    async fn test_unread_filter_and_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .and(query_param("unread_only", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1,
                "type": "task_due",
                "title": "Task due tomorrow",
                "task_id": 5,
                "is_read": false,
                "created_at": "2026-04-02T08:00:00Z"
            }])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/notifications/unread-count"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let items = assert_ok!(board.notifications.list(true).await);
        assert_eq!(items[0].kind.as_deref(), Some("task_due"));
        assert_eq!(assert_ok!(board.notifications.unread_count().await), 1);
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/notifications/read-all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": 4})))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        assert_ok!(board.notifications.mark_all_read().await);
    }
}

mod comments_and_search {
    use super::*;

    #[tokio::test]
    async fn test_add_comment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks/5/comments"))
            .and(body_json(json!({"content": "Done by Friday"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 30, "task_id": 5, "content": "Done by Friday", "created_at": "2026-04-02T10:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let c = assert_ok!(board.comments.create(5, "Done by Friday").await);
        assert_eq!(c.id, 30);
    }

    #[tokio::test]
    async fn test_search_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "fence"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tasks": [task_json(1, "Paint fence", "todo")],
                "projects": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let results = assert_ok!(board.search.search("  fence ", None).await);
        assert_eq!(results.tasks.len(), 1);
        assert!(results.projects.is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let board = logged_in(&server);
        let results = assert_ok!(board.search.search("   ", Some(5)).await);
        assert!(results.tasks.is_empty());
    }
}
