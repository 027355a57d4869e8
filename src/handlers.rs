use actix_web::web::{delete, get, post, put, scope, JsonConfig, QueryConfig, ServiceConfig};
use actix_web::HttpResponse;

use crate::core::ports::repository::Manager;
use crate::error::Error;
use crate::response::MessageResponse;

/// Builds an in-memory app for handler tests:
/// `test_app!(manager)` or `test_app!(manager, RandomQuizSize(n))`.
#[cfg(test)]
macro_rules! test_app {
    ($manager:expr) => {
        test_app!($manager, crate::config::RandomQuizSize::default())
    };
    ($manager:expr, $size:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($manager))
                .app_data(actix_web::web::Data::new($size))
                .configure(crate::handlers::configure::<crate::database::memory::MemoryManager>)
                .default_service(actix_web::web::to(crate::handlers::not_found)),
        )
        .await
    };
}

pub mod announcement;
pub mod question;
pub mod quiz;

/// Registers every `/api` route for the store behind `M`. The caller provides
/// `Data<M>` and `Data<RandomQuizSize>`.
pub fn configure<M>(cfg: &mut ServiceConfig)
where
    M: Manager,
{
    cfg.app_data(json_config()).app_data(query_config()).service(
        scope("/api")
            .service(
                scope("/question")
                    .route("", post().to(question::create::<M>))
                    .route("", get().to(question::list::<M>))
                    .route("/{id}", get().to(question::detail::<M>))
                    .route("/{id}", put().to(question::update::<M>))
                    .route("/{id}", delete().to(question::delete_question::<M>)),
            )
            .service(
                scope("/quiz")
                    .route("", post().to(quiz::create::<M>))
                    .route("", get().to(quiz::list::<M>))
                    .route("/random", get().to(quiz::random::<M>))
                    .route("/{id}", get().to(quiz::detail::<M>))
                    .route("/{id}", put().to(quiz::update::<M>))
                    .route("/{id}", delete().to(quiz::delete_quiz::<M>))
                    .route("/{id}/submit", post().to(quiz::submit::<M>)),
            )
            .service(
                scope("/announcement")
                    .route("", post().to(announcement::create::<M>))
                    .route("", get().to(announcement::list::<M>))
                    .route("/{id}", get().to(announcement::detail::<M>))
                    .route("/{id}", put().to(announcement::update::<M>))
                    .route("/{id}", delete().to(announcement::delete_announcement::<M>)),
            ),
    );
}

/// Malformed JSON bodies become 400 responses in the usual error shape.
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| Error::validation(err.to_string()).into())
}

/// Same treatment for query strings, e.g. a non-numeric `?count=`.
pub fn query_config() -> QueryConfig {
    QueryConfig::default().error_handler(|err, _req| Error::validation(err.to_string()).into())
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::new("Route not found"))
}

#[cfg(test)]
mod test {
    use crate::database::memory::MemoryManager;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};

    #[actix_web::test]
    async fn test_unknown_route() {
        let app = test_app!(MemoryManager::new());
        let resp = test::call_service(&app, TestRequest::get().uri("/api/nothing-here").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Route not found");
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test_app!(MemoryManager::new());
        let req = TestRequest::post()
            .uri("/api/question")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
