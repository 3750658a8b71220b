//! Router assembly: aluno routes, common routes, uploaded photos, and the shared layers.

mod alunos;
mod common;

pub use alunos::alunos_routes;
pub use common::common_routes;

use crate::middleware::error_details;
use crate::service::PUBLIC_PREFIX;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// The full application router.
pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.alunos.photos().dir());
    Router::new()
        .merge(alunos_routes(state.clone()))
        .merge(common_routes(state.clone()))
        .nest_service(PUBLIC_PREFIX, uploads)
        .layer(middleware::from_fn_with_state(state.clone(), error_details))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::service::{AlunoService, PhotoStore};
    use crate::store::memory::MemoryAlunoStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Harness {
        app: Router,
        store: Arc<MemoryAlunoStore>,
        _uploads: tempfile::TempDir,
    }

    fn harness(expose_error_details: bool) -> Harness {
        harness_with(|config| config.expose_error_details = expose_error_details)
    }

    fn harness_with(tweak: impl FnOnce(&mut AppConfig)) -> Harness {
        let uploads = tempfile::tempdir().unwrap();
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        tweak(&mut config);
        config.upload_dir = uploads.path().to_path_buf();
        let store = Arc::new(MemoryAlunoStore::new());
        let state = AppState {
            alunos: AlunoService::new(store.clone(), PhotoStore::new(uploads.path())),
            config: Arc::new(config),
        };
        Harness {
            app: app(state),
            store,
            _uploads: uploads,
        }
    }

    impl Harness {
        async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            let body = match body {
                Some(v) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(v.to_string())
                }
                None => Body::empty(),
            };
            let response = self.app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }

        async fn create(&self, body: Value) -> i64 {
            let (status, value) = self.send(Method::POST, "/alunos", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED, "{}", value);
            value["id"].as_i64().unwrap()
        }
    }

    fn ana() -> Value {
        json!({
            "nome": "Ana",
            "telefone": "123",
            "sexo": "F",
            "dataNascimento": "2000-01-01",
            "faixa": "branca",
            "grau": "1",
            "plano": "mensal"
        })
    }

    #[tokio::test]
    async fn full_lifecycle_of_a_record() {
        let h = harness(false);
        let id = h.create(ana()).await;
        assert!(id > 0);

        let (status, body) = h.send(Method::GET, &format!("/alunos/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], id);
        for (k, v) in ana().as_object().unwrap() {
            assert_eq!(&body["data"][k], v, "field {}", k);
        }

        let (status, body) = h.send(Method::PUT, &format!("/alunos/{}", id), Some(json!({"faixa": "azul"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Aluno atualizado com sucesso!");

        let (_, body) = h.send(Method::GET, &format!("/alunos/{}", id), None).await;
        assert_eq!(body["data"]["faixa"], "azul");

        let (status, body) = h.send(Method::DELETE, &format!("/alunos/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Aluno deletado com sucesso!");

        let (status, body) = h.send(Method::GET, &format!("/alunos/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Aluno não encontrado");
    }

    #[tokio::test]
    async fn create_with_missing_field_is_rejected_and_writes_nothing() {
        let h = harness(false);
        let mut body = ana();
        body.as_object_mut().unwrap().remove("telefone");
        let (status, value) = h.send(Method::POST, "/alunos", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["error"].as_str().unwrap().starts_with("Dados incompletos"));
        assert_eq!(h.store.len(), 0);
    }

    #[tokio::test]
    async fn create_with_malformed_json_is_a_validation_error() {
        let h = harness(false);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/alunos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = h.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn never_created_ids_are_not_found() {
        let h = harness(false);
        let (status, _) = h.send(Method::GET, "/alunos/12345", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = h.send(Method::PUT, "/alunos/12345", Some(json!({"nome": "X"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = h.send(Method::DELETE, "/alunos/12345", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_bad_request() {
        let h = harness(false);
        let (status, body) = h.send(Method::GET, "/alunos/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_error");
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields_alone() {
        let h = harness(false);
        let id = h.create(ana()).await;
        let (_, before) = h.send(Method::GET, &format!("/alunos/{}", id), None).await;

        let (status, _) = h.send(Method::PUT, &format!("/alunos/{}", id), Some(json!({"nome": "New Name"}))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, after) = h.send(Method::GET, &format!("/alunos/{}", id), None).await;
        let mut expected = before["data"].clone();
        expected["nome"] = json!("New Name");
        assert_eq!(after["data"], expected);
    }

    #[tokio::test]
    async fn update_rejects_empty_unknown_and_id_keys() {
        let h = harness(false);
        let id = h.create(ana()).await;
        let uri = format!("/alunos/{}", id);

        let (status, body) = h.send(Method::PUT, &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Nenhum dado enviado");

        let (status, _) = h.send(Method::PUT, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = h.send(Method::PUT, &uri, Some(json!({"nome": "X", "senha": "y"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = h.send(Method::PUT, &uri, Some(json!({"id": 77}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = h.send(Method::GET, &uri, None).await;
        assert_eq!(body["data"]["nome"], "Ana");
        assert_eq!(body["data"]["id"], id);
    }

    #[tokio::test]
    async fn delete_twice_is_ok_then_not_found() {
        let h = harness(false);
        let id = h.create(ana()).await;
        let uri = format!("/alunos/{}", id);
        assert_eq!(h.send(Method::DELETE, &uri, None).await.0, StatusCode::OK);
        assert_eq!(h.send(Method::DELETE, &uri, None).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_by_nome_substring() {
        let h = harness(false);
        h.create(ana()).await;
        let mut bruno = ana();
        bruno["nome"] = json!("Bruno");
        h.create(bruno).await;
        let mut mariana = ana();
        mariana["nome"] = json!("Mariana");
        h.create(mariana).await;

        let (status, body) = h.send(Method::GET, "/alunos?nome=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
        assert_eq!(body["meta"]["count"], 3);

        let (_, body) = h.send(Method::GET, "/alunos", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let (_, body) = h.send(Method::GET, "/alunos?nome=ana", None).await;
        let names: Vec<_> = body["data"].as_array().unwrap().iter().map(|a| a["nome"].clone()).collect();
        assert_eq!(names, vec![json!("Mariana")]);

        let (status, body) = h.send(Method::GET, "/alunos?nome=Zeca", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));

        let (_, body) = h.send(Method::GET, "/alunos?nome=%25", None).await;
        assert_eq!(body["data"], json!([]));
        let (_, body) = h.send(Method::GET, "/alunos?nome=_", None).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn list_paging_and_bad_limit() {
        let h = harness(false);
        for _ in 0..3 {
            h.create(ana()).await;
        }
        let (_, body) = h.send(Method::GET, "/alunos?limit=2&offset=1", None).await;
        let ids: Vec<_> = body["data"].as_array().unwrap().iter().map(|a| a["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![2, 3]);

        let (status, _) = h.send(Method::GET, "/alunos?limit=muitos", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn backend_details_follow_configuration() {
        let hidden = harness(false);
        hidden.store.set_offline(true);
        let (status, body) = hidden.send(Method::GET, "/alunos", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Erro interno no servidor");
        assert!(body.get("details").is_none());

        let verbose = harness(true);
        verbose.store.set_offline(true);
        let (status, body) = verbose.send(Method::POST, "/alunos", Some(ana())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "database_error");
        assert!(body["details"].as_str().unwrap().contains("pool timed out"));
    }

    #[tokio::test]
    async fn readiness_reflects_store_health() {
        let h = harness(false);
        let (status, body) = h.send(Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "ok");

        h.store.set_offline(true);
        let (status, body) = h.send(Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn index_serves_the_intake_form() {
        let h = harness(false);
        let response = h
            .app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8_lossy(&bytes);
        assert!(html.contains("id=\"studentForm\""));
        assert!(html.contains("name=\"dataNascimento\""));
    }

    const BOUNDARY: &str = "XBOUNDARYX";

    fn multipart_payload(filename: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"foto\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn multipart_request(uri: &str, filename: &str, content: &[u8]) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(multipart_payload(filename, content)))
            .unwrap()
    }

    #[tokio::test]
    async fn photo_upload_sets_reference_and_is_served() {
        let h = harness(false);
        let id = h.create(ana()).await;

        let response = h
            .app
            .clone()
            .oneshot(multipart_request(&format!("/alunos/{}/foto", id), "../perfil.png", b"PNGDATA"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let reference = body["foto"].as_str().unwrap().to_string();
        assert!(reference.starts_with("/uploads/aluno_"));
        assert!(reference.ends_with("_perfil.png"));

        let (_, record) = h.send(Method::GET, &format!("/alunos/{}", id), None).await;
        assert_eq!(record["data"]["foto"], json!(reference));

        let response = h
            .app
            .clone()
            .oneshot(Request::builder().uri(&reference).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let served = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&served[..], b"PNGDATA");
    }

    #[tokio::test]
    async fn photo_upload_rejects_bad_extension_and_unknown_id() {
        let h = harness(false);
        let id = h.create(ana()).await;

        let response = h
            .app
            .clone()
            .oneshot(multipart_request(&format!("/alunos/{}/foto", id), "virus.exe", b"MZ"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = h
            .app
            .clone()
            .oneshot(multipart_request("/alunos/999/foto", "a.png", b"PNG"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn status_and_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn oversized_photo_is_payload_too_large_with_json_body() {
        use crate::store::AlunoStore;

        let h = harness_with(|config| config.max_upload_bytes = 16);
        let id = h.store.insert(&crate::model::sample_new_aluno()).await.unwrap();
        let uri = format!("/alunos/{}/foto", id);
        let content = [b'x'; 64];

        let (status, body) = status_and_json(&h.app, multipart_request(&uri, "grande.png", &content)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{}", body);
        assert_eq!(body["code"], "payload_too_large");
        assert!(body["error"].is_string());

        let mut request = multipart_request(&uri, "grande.png", &content);
        let length = multipart_payload("grande.png", &content).len();
        request.headers_mut().insert(header::CONTENT_LENGTH, length.into());
        let (status, body) = status_and_json(&h.app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{}", body);
        assert_eq!(body["code"], "payload_too_large");

        let (_, record) = h.send(Method::GET, &format!("/alunos/{}", id), None).await;
        assert!(record["data"]["foto"].is_null());
        assert!(std::fs::read_dir(h._uploads.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn oversized_json_body_is_payload_too_large() {
        let h = harness_with(|config| config.max_upload_bytes = 16);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/alunos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(ana().to_string()))
            .unwrap();
        let (status, body) = status_and_json(&h.app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["code"], "payload_too_large");
        assert_eq!(h.store.len(), 0);
    }

    #[tokio::test]
    async fn update_body_without_json_content_type_reports_the_content_type() {
        let h = harness(false);
        let id = h.create(ana()).await;
        let payload = json!({"nome": "Outra"}).to_string();
        let request = Request::builder()
            .method(Method::PUT)
            .uri(format!("/alunos/{}", id))
            .header(header::CONTENT_TYPE, "text/plain")
            .header(header::CONTENT_LENGTH, payload.len())
            .body(Body::from(payload))
            .unwrap();
        let (status, body) = status_and_json(&h.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_ne!(body["error"], "Nenhum dado enviado");
        assert!(body["error"].as_str().unwrap().contains("Content-Type"), "{}", body);

        let (_, record) = h.send(Method::GET, &format!("/alunos/{}", id), None).await;
        assert_eq!(record["data"]["nome"], "Ana");
    }

    #[tokio::test]
    async fn update_without_body_is_no_data_sent() {
        let h = harness(false);
        let id = h.create(ana()).await;
        let (status, body) = h.send(Method::PUT, &format!("/alunos/{}", id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Nenhum dado enviado");
    }
}
