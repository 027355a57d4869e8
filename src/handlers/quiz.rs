use actix_web::http::StatusCode;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;

use crate::config::RandomQuizSize;
use crate::core::models::quiz::{Create as QuizCreate, HydratedQuiz, Patch as QuizPatch, Submit as QuizSubmit};
use crate::core::ports::repository::Manager;
use crate::core::services::quiz as service;
use crate::error::Error;
use crate::request::RandomParam;
use crate::response::{MessageResponse, QuizResponse};

pub async fn create<M: Manager>(manager: Data<M>, Json(body): Json<QuizCreate>) -> Result<HttpResponse, Error> {
    let store = manager.tx().await?;
    let quiz = service::create_quiz(store, body).await?;
    Ok(HttpResponse::build(StatusCode::CREATED).json(QuizResponse::new("Quiz created successfully", quiz)))
}

pub async fn list<M: Manager>(manager: Data<M>) -> Result<Json<Vec<HydratedQuiz>>, Error> {
    let mut store = manager.db().await?;
    Ok(Json(service::quizzes(&mut store).await?))
}

pub async fn random<M: Manager>(manager: Data<M>, size: Data<RandomQuizSize>, Query(param): Query<RandomParam>) -> Result<Json<Vec<HydratedQuiz>>, Error> {
    let mut store = manager.db().await?;
    let count = param.count.unwrap_or(size.0);
    Ok(Json(service::random_quizzes(&mut store, count).await?))
}

pub async fn detail<M: Manager>(manager: Data<M>, id: Path<(String,)>) -> Result<Json<HydratedQuiz>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    Ok(Json(service::quiz_detail(&mut store, &id).await?))
}

pub async fn update<M: Manager>(manager: Data<M>, id: Path<(String,)>, Json(patch): Json<QuizPatch>) -> Result<Json<QuizResponse>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    let quiz = service::update_quiz(&mut store, &id, patch).await?;
    Ok(Json(QuizResponse::new("Quiz updated successfully", quiz)))
}

pub async fn delete_quiz<M: Manager>(manager: Data<M>, id: Path<(String,)>) -> Result<Json<MessageResponse>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    service::delete_quiz(&mut store, &id).await?;
    Ok(Json(MessageResponse::new("Quiz deleted successfully.")))
}

pub async fn submit<M: Manager>(manager: Data<M>, id: Path<(String,)>, Json(body): Json<QuizSubmit>) -> Result<Json<QuizResponse>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    let quiz = service::submit_answers(&mut store, &id, body).await?;
    Ok(Json(QuizResponse::new("Quiz answers submitted successfully", quiz)))
}

#[cfg(test)]
mod test {
    use crate::config::RandomQuizSize;
    use crate::database::memory::MemoryManager;
    use actix_http::Request;
    use actix_web::body::MessageBody;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::{json, Value};

    async fn create_question<S, B>(app: &S, text: &str, correct: &str) -> String
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = TestRequest::post()
            .uri("/api/question")
            .set_json(json!({"questionText": text, "options": ["a", "b"], "correctAnswer": correct}))
            .to_request();
        let body: Value = test::call_and_read_body_json(app, req).await;
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_quiz<S, B>(app: &S, title: &str, question_ids: &[&str]) -> Value
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let questions: Vec<Value> = question_ids.iter().map(|id| json!({ "questionId": id })).collect();
        let req = TestRequest::post()
            .uri("/api/quiz")
            .set_json(json!({"title": title, "topic": "t", "course": "c", "questions": questions}))
            .to_request();
        let resp = test::call_service(app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Quiz created successfully");
        body["quiz"].clone()
    }

    #[actix_web::test]
    async fn test_create_with_unknown_ids_lists_them() {
        let app = test_app!(MemoryManager::new());
        let known = create_question(&app, "q", "a").await;
        let unknown = uuid::Uuid::new_v4().to_string();
        let req = TestRequest::post()
            .uri("/api/quiz")
            .set_json(json!({"title": "t", "questions": [{"questionId": known}, {"questionId": unknown}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["nonExistingIds"], json!([unknown]));

        let listed: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/api/quiz").to_request()).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_create_with_malformed_ids() {
        let app = test_app!(MemoryManager::new());
        let req = TestRequest::post()
            .uri("/api/quiz")
            .set_json(json!({"title": "t", "questions": [{"questionId": "123"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid question ID format.");
        assert_eq!(body["invalidIds"], json!(["123"]));
    }

    #[actix_web::test]
    async fn test_fresh_quiz_is_hydrated_and_not_completed() {
        let app = test_app!(MemoryManager::new());
        let q = create_question(&app, "capital of France?", "a").await;
        let quiz = create_quiz(&app, "geo", &[&q]).await;
        let id = quiz["id"].as_str().unwrap();
        let detail: Value = test::call_and_read_body_json(&app, TestRequest::get().uri(&format!("/api/quiz/{}", id)).to_request()).await;
        assert_eq!(detail["completed"], false);
        assert_eq!(detail["studentAnswers"], json!([]));
        assert_eq!(detail["questions"][0]["questionId"]["questionText"], "capital of France?");
    }

    #[actix_web::test]
    async fn test_submit_appends_and_completes() {
        let app = test_app!(MemoryManager::new());
        let q = create_question(&app, "q", "a").await;
        let quiz = create_quiz(&app, "t", &[&q]).await;
        let uri = format!("/api/quiz/{}/submit", quiz["id"].as_str().unwrap());
        for expected in 1..=2 {
            let req = TestRequest::post()
                .uri(&uri)
                .set_json(json!({"studentAnswers": [{"questionId": q, "answer": "a"}]}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["quiz"]["completed"], true);
            assert_eq!(body["quiz"]["studentAnswers"].as_array().unwrap().len(), expected);
        }
    }

    #[actix_web::test]
    async fn test_submit_to_missing_quiz() {
        let app = test_app!(MemoryManager::new());
        let q = create_question(&app, "q", "a").await;
        let uri = format!("/api/quiz/{}/submit", uuid::Uuid::new_v4());
        let req = TestRequest::post()
            .uri(&uri)
            .set_json(json!({"studentAnswers": [{"questionId": q, "answer": "a"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = TestRequest::post().uri("/api/quiz/not-an-id/submit").set_json(json!({"studentAnswers": []})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let listed: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/api/quiz").to_request()).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_create_with_malformed_seed_answer_ids() {
        let app = test_app!(MemoryManager::new());
        let q = create_question(&app, "q", "a").await;
        let req = TestRequest::post()
            .uri("/api/quiz")
            .set_json(json!({"title": "t", "questions": [{"questionId": q}], "studentAnswers": [{"questionId": "xyz", "answer": "a"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["invalidIds"], json!(["xyz"]));
    }

    #[actix_web::test]
    async fn test_submit_with_malformed_answer_ids() {
        let app = test_app!(MemoryManager::new());
        let q = create_question(&app, "q", "a").await;
        let quiz = create_quiz(&app, "t", &[&q]).await;
        let req = TestRequest::post()
            .uri(&format!("/api/quiz/{}/submit", quiz["id"].as_str().unwrap()))
            .set_json(json!({"studentAnswers": [{"questionId": "xyz", "answer": "a"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["invalidIds"], json!(["xyz"]));
    }

    #[actix_web::test]
    async fn test_submit_wrongly_typed_answers() {
        let app = test_app!(MemoryManager::new());
        let req = TestRequest::post()
            .uri(&format!("/api/quiz/{}/submit", uuid::Uuid::new_v4()))
            .set_json(json!({"studentAnswers": "nope"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let q = create_question(&app, "q", "a").await;
        let quiz = create_quiz(&app, "t", &[&q]).await;
        let req = TestRequest::post()
            .uri(&format!("/api/quiz/{}/submit", quiz["id"].as_str().unwrap()))
            .set_json(json!({"studentAnswers": "nope"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Student answers are required and must be a non-empty array.");
    }

    #[actix_web::test]
    async fn test_update_missing_quiz_and_malformed_ids() {
        let app = test_app!(MemoryManager::new());
        let req = TestRequest::put()
            .uri(&format!("/api/quiz/{}", uuid::Uuid::new_v4()))
            .set_json(json!({"title": "renamed"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Quiz not found.");

        let q = create_question(&app, "q", "a").await;
        let quiz = create_quiz(&app, "t", &[&q]).await;
        let req = TestRequest::put()
            .uri(&format!("/api/quiz/{}", quiz["id"].as_str().unwrap()))
            .set_json(json!({"questions": [{"questionId": "bad-id"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid question ID format.");
        assert_eq!(body["invalidIds"], json!(["bad-id"]));
    }

    #[actix_web::test]
    async fn test_random() {
        let app = test_app!(MemoryManager::new(), RandomQuizSize(2));
        let resp = test::call_service(&app, TestRequest::get().uri("/api/quiz/random").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let q = create_question(&app, "q", "a").await;
        for title in ["one", "two", "three"] {
            create_quiz(&app, title, &[&q]).await;
        }
        let picked: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/api/quiz/random").to_request()).await;
        let picked = picked.as_array().unwrap();
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0]["id"], picked[1]["id"]);
        assert_eq!(picked[0]["questions"][0]["questionId"]["id"], json!(q));

        let one: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/api/quiz/random?count=1").to_request()).await;
        assert_eq!(one.as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_random_with_bad_count_is_json_error() {
        let app = test_app!(MemoryManager::new());
        let resp = test::call_service(&app, TestRequest::get().uri("/api/quiz/random?count=abc").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("invalid digit"));
    }

    #[actix_web::test]
    async fn test_hidden_quiz_is_never_random() {
        let app = test_app!(MemoryManager::new());
        let q = create_question(&app, "q", "a").await;
        let quiz = create_quiz(&app, "secret", &[&q]).await;
        let req = TestRequest::put()
            .uri(&format!("/api/quiz/{}", quiz["id"].as_str().unwrap()))
            .set_json(json!({"hidden": true}))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["quiz"]["hidden"], true);
        let resp = test::call_service(&app, TestRequest::get().uri("/api/quiz/random").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_deleting_question_keeps_quiz() {
        let app = test_app!(MemoryManager::new());
        let q = create_question(&app, "q", "a").await;
        let quiz = create_quiz(&app, "t", &[&q]).await;
        let resp = test::call_service(&app, TestRequest::delete().uri(&format!("/api/question/{}", q)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let detail: Value = test::call_and_read_body_json(&app, TestRequest::get().uri(&format!("/api/quiz/{}", quiz["id"].as_str().unwrap())).to_request()).await;
        assert_eq!(detail["questions"].as_array().unwrap().len(), 1);
        assert!(detail["questions"][0]["questionId"].is_null());
    }

    #[actix_web::test]
    async fn test_delete_quiz() {
        let app = test_app!(MemoryManager::new());
        let q = create_question(&app, "q", "a").await;
        let quiz = create_quiz(&app, "t", &[&q]).await;
        let uri = format!("/api/quiz/{}", quiz["id"].as_str().unwrap());
        let resp = test::call_service(&app, TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = test::call_service(&app, TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
