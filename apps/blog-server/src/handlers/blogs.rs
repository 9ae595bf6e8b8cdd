//! Blog handlers - one per service operation.

use actix_web::{HttpResponse, web};
use futures::StreamExt;

use blog_core::{BlogFields, BlogPost};
use blog_shared::dto::{
    BlogResponse, CreateBlogRequest, DeleteBlogResponse, ListBlogFrame, UpdateBlogRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

fn blog_response(post: BlogPost) -> BlogResponse {
    BlogResponse {
        id: post.id.to_string(),
        author_id: post.author_id,
        title: post.title,
        content: post.content,
    }
}

/// POST /api/blogs
pub async fn create_blog(
    state: web::Data<AppState>,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    if let Some(id) = &req.id {
        tracing::debug!(ignored_id = %id, "Ignoring caller-supplied blog id");
    }

    let post = state
        .blogs
        .create(BlogFields::new(req.author_id, req.title, req.content))
        .await?;

    Ok(HttpResponse::Created().json(blog_response(post)))
}

/// GET /api/blogs/{id}
pub async fn read_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.blogs.read(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(blog_response(post)))
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateBlogRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .blogs
        .update(
            &path.into_inner(),
            BlogFields::new(req.author_id, req.title, req.content),
        )
        .await?;

    Ok(HttpResponse::Ok().json(blog_response(post)))
}

/// DELETE /api/blogs/{id}
pub async fn delete_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = state.blogs.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteBlogResponse {
        blog_id: id.to_string(),
    }))
}

/// GET /api/blogs - newline-delimited JSON, one frame per post.
///
/// Headers are sent before the scan starts, so a store fault mid-scan cannot
/// change the status; it is reported as a trailing error frame instead.
pub async fn list_blogs(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let request_id = request_id.as_str().to_owned();

    let body = state.blogs.list().map(move |item| {
        let frame = match item {
            Ok(post) => ListBlogFrame::Blog(blog_response(post)),
            Err(e) => {
                let problem = AppError::from(e)
                    .problem()
                    .with_request_id(request_id.clone());
                ListBlogFrame::Error(problem)
            }
        };

        serde_json::to_vec(&frame).map(|mut line| {
            line.push(b'\n');
            web::Bytes::from(line)
        })
    });

    HttpResponse::Ok()
        .content_type("application/x-ndjson")
        .streaming(body)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use blog_core::ports::{BlogStore, DeleteOutcome, PageCursor, ScanPage, UpdateOutcome};
    use blog_core::{BlogId, BlogServiceConfig, StoreError};
    use blog_infra::InMemoryBlogStore;
    use blog_shared::ErrorResponse;

    use super::*;
    use crate::handlers::configure_routes;
    use crate::observability::RequestIdMiddleware;

    const UNUSED_ID: &str = "6b276f60-56cc-41bb-b0d5-cc9a94bd678c";

    fn state(page_size: usize) -> AppState {
        AppState::with_store(
            Arc::new(InMemoryBlogStore::with_page_size(page_size)),
            BlogServiceConfig { list_buffer: 2 },
        )
    }

    /// In-memory store whose scan fails on every page after the first.
    struct FailingSecondPage(InMemoryBlogStore);

    #[async_trait]
    impl BlogStore for FailingSecondPage {
        async fn get(&self, id: &BlogId) -> Result<Option<BlogPost>, StoreError> {
            self.0.get(id).await
        }

        async fn put(&self, post: &BlogPost) -> Result<(), StoreError> {
            self.0.put(post).await
        }

        async fn conditional_update(
            &self,
            id: &BlogId,
            fields: &BlogFields,
        ) -> Result<UpdateOutcome, StoreError> {
            self.0.conditional_update(id, fields).await
        }

        async fn delete(&self, id: &BlogId) -> Result<DeleteOutcome, StoreError> {
            self.0.delete(id).await
        }

        async fn scan_page(&self, cursor: Option<&PageCursor>) -> Result<ScanPage, StoreError> {
            match cursor {
                Some(_) => Err(StoreError::Query("boom".to_string())),
                None => self.0.scan_page(None).await,
            }
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(RequestIdMiddleware)
                    .app_data(web::Data::new($state))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn milos() -> CreateBlogRequest {
        CreateBlogRequest {
            id: Some("client-chosen".to_string()),
            author_id: "Milos".to_string(),
            title: "My first blog".to_string(),
            content: "My content".to_string(),
        }
    }

    #[actix_web::test]
    async fn test_create_read_delete() {
        let app = app!(state(100));

        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .set_json(milos())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: BlogResponse = test::read_body_json(resp).await;
        assert_ne!(created.id, "client-chosen");
        assert_eq!(created.author_id, "Milos");

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs/{}", created.id))
            .to_request();
        let read: BlogResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(read, created);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/blogs/{}", created.id))
            .to_request();
        let deleted: DeleteBlogResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(deleted.blog_id, created.id);

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let problem: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(problem.code.as_deref(), Some("NOT_FOUND"));
    }

    #[actix_web::test]
    async fn test_update() {
        let app = app!(state(100));

        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .set_json(milos())
            .to_request();
        let created: BlogResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/blogs/{}", created.id))
            .set_json(UpdateBlogRequest {
                author_id: "Milos".to_string(),
                title: "Edited".to_string(),
                content: String::new(),
            })
            .to_request();
        let updated: BlogResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Edited");
        assert_eq!(updated.content, "");

        let req = test::TestRequest::put()
            .uri(&format!("/api/blogs/{UNUSED_ID}"))
            .set_json(UpdateBlogRequest::default())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
    }

    #[actix_web::test]
    async fn test_malformed_id_is_bad_request() {
        let app = app!(state(100));

        for req in [
            test::TestRequest::get().uri("/api/blogs/FORCEANERROR"),
            test::TestRequest::delete().uri("/api/blogs/FORCEANERROR"),
            test::TestRequest::put()
                .uri("/api/blogs/FORCEANERROR")
                .set_json(UpdateBlogRequest::default()),
        ] {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert!(resp.headers().contains_key("x-request-id"));
            let problem: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(problem.code.as_deref(), Some("INVALID_ARGUMENT"));
        }
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app!(state(100));

        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_streams_every_post() {
        let app = app!(state(3));

        let mut created = HashSet::new();
        for _ in 0..8 {
            let req = test::TestRequest::post()
                .uri("/api/blogs")
                .set_json(milos())
                .to_request();
            let post: BlogResponse = test::call_and_read_body_json(&app, req).await;
            created.insert(post.id);
        }

        let req = test::TestRequest::get().uri("/api/blogs").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;

        let listed: HashSet<String> = body
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| match serde_json::from_slice(line).unwrap() {
                ListBlogFrame::Blog(post) => post.id,
                ListBlogFrame::Error(e) => panic!("unexpected error frame: {e:?}"),
            })
            .collect();
        assert_eq!(listed, created);
    }

    #[actix_web::test]
    async fn test_list_fault_ends_with_error_frame() {
        let store = FailingSecondPage(InMemoryBlogStore::with_page_size(1));
        let a = BlogPost::new(BlogFields::new("Milos", "one", ""));
        let b = BlogPost::new(BlogFields::new("Milos", "two", ""));
        store.put(&a).await.unwrap();
        store.put(&b).await.unwrap();
        // the in-memory store scans in id order
        let first = a.id.min(b.id);

        let app = app!(AppState::with_store(
            Arc::new(store),
            BlogServiceConfig { list_buffer: 2 }
        ));

        let req = test::TestRequest::get()
            .uri("/api/blogs")
            .insert_header(("x-request-id", "rid-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;

        let frames: Vec<ListBlogFrame> = body
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_slice(line).unwrap())
            .collect();
        assert_eq!(frames.len(), 2);

        match &frames[0] {
            ListBlogFrame::Blog(post) => assert_eq!(post.id, first.to_string()),
            other => panic!("expected a blog frame, got {other:?}"),
        }
        match &frames[1] {
            ListBlogFrame::Error(problem) => {
                assert_eq!(problem.code.as_deref(), Some("STREAM_ABORTED"));
                assert_eq!(problem.status, 500);
                assert_eq!(problem.request_id.as_deref(), Some("rid-1"));
            }
            other => panic!("expected an error frame, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn test_list_empty() {
        let app = app!(state(3));

        let req = test::TestRequest::get().uri("/api/blogs").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn test_health_reports_backend() {
        let app = app!(state(3));

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let health: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["backend"], "memory");
    }
}
