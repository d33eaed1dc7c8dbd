//! Client tests against the in-process fake backend

use super::*;
use crate::testing::FakeBackend;
use chrono::NaiveDate;
use serde_json::json;

#[tokio::test]
async fn test_list_courses_unwraps_envelope() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/api/curso",
        200,
        json!({"$id": "1", "$values": [
            {"$id": "2", "id": 1, "nome": "Algorithms", "descricao": "Intro"},
            {"$id": "3", "id": 2, "nome": "Networks", "descricao": "TCP"}
        ]}),
    );

    let courses = backend.client().list_courses().await.unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[1].name, "Networks");
}

#[tokio::test]
async fn test_list_failure_is_status_error() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/api/aluno", 500, json!({"error": "boom"}));

    let err = backend.client().list_students().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_create_course_body() {
    let backend = FakeBackend::start().await;
    backend.respond("POST", "/api/curso", 201, json!({"id": 9}));

    let course = NewCourse {
        name: "Algorithms".to_string(),
        description: "Intro".to_string(),
    };
    backend.client().create_course(&course).await.unwrap();

    let sent = backend.mutations();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "POST");
    assert_eq!(sent[0].path, "/api/curso");
    assert_eq!(
        sent[0].body,
        Some(json!({"nome": "Algorithms", "descricao": "Intro"}))
    );
}

#[tokio::test]
async fn test_update_student_uses_update_path() {
    let backend = FakeBackend::start().await;
    let student = Student {
        id: "42".to_string(),
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 1, 2).unwrap(),
    };

    backend.client().update_student(&student).await.unwrap();

    assert_eq!(backend.count("PUT", "/api/aluno/update/42"), 1);
    let body = backend.requests()[0].body.clone().unwrap();
    assert_eq!(body["dataNascimento"], "1990-01-02");
    assert_eq!(body["id"], "42");
}

#[tokio::test]
async fn test_enrollments_by_student_not_found_is_empty() {
    let backend = FakeBackend::start().await;
    // No route configured: GET answers 404
    let enrollments = backend
        .client()
        .enrollments_by_student("S1")
        .await
        .unwrap();
    assert!(enrollments.is_empty());
}

#[tokio::test]
async fn test_students_by_course_not_found_is_empty() {
    let backend = FakeBackend::start().await;
    let client = backend.client();

    let students = client.students_by_course("C1").await.unwrap();
    assert!(students.is_empty());

    let ids = vec!["C1".to_string(), "C2".to_string()];
    let map = client.students_for_courses(&ids).await;
    assert_eq!(map.len(), 2);
    assert!(map.values().all(Vec::is_empty));
}

#[tokio::test]
async fn test_list_students_skips_malformed_record() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/api/aluno",
        200,
        json!({"$values": [
            {"id": "S1", "nome": "Ana", "email": "ana@x.com", "dataNascimento": "2000-01-01"},
            {"id": "S2", "nome": "Bia", "email": "bia@x.com", "dataNascimento": null},
            {"id": "S3", "email": "nameless@x.com", "dataNascimento": "2001-01-01"}
        ]}),
    );

    let students = backend.client().list_students().await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, "S1");
}

#[tokio::test]
async fn test_list_with_unexpected_shape_names_the_path() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/api/curso", 200, json!("maintenance"));

    let err = backend.client().list_courses().await.unwrap_err();
    assert!(matches!(&err, ApiError::Decode(msg) if msg.contains("GET /curso")));
}

#[tokio::test]
async fn test_students_by_course_maps_embedded_students() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/api/matricula/curso/C1",
        200,
        json!({"$values": [
            {"id": 1, "alunoId": "S1", "cursoId": "C1",
             "aluno": {"id": "S1", "nome": "Ana", "email": "a@x", "dataNascimento": "2000-01-01"}},
            {"id": 2, "alunoId": "S2", "cursoId": "C1", "aluno": {"$ref": "7"}}
        ]}),
    );

    let students = backend.client().students_by_course("C1").await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].name, "Ana");
}

#[tokio::test]
async fn test_batch_lookup_aggregates_per_id() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/api/matricula/aluno/S1",
        200,
        json!({"$values": [
            {"id": 1, "alunoId": "S1", "cursoId": "C1",
             "curso": {"id": "C1", "nome": "Algorithms", "descricao": ""}}
        ]}),
    );
    backend.respond("GET", "/api/matricula/aluno/S3", 500, json!({}));

    let ids = vec!["S1".to_string(), "S2".to_string(), "S3".to_string()];
    let map = backend.client().enrollments_for_students(&ids).await;

    assert_eq!(map.len(), 3);
    assert_eq!(map["S1"].len(), 1);
    assert_eq!(map["S1"][0].course_label(), "Algorithms");
    // 404 and 500 both fold into an empty sublist
    assert!(map["S2"].is_empty());
    assert!(map["S3"].is_empty());
    assert_eq!(backend.requests().len(), 3);
}

#[tokio::test]
async fn test_remove_enrollment_path() {
    let backend = FakeBackend::start().await;
    backend
        .client()
        .remove_enrollment("S1", "C1")
        .await
        .unwrap();
    assert_eq!(backend.count("DELETE", "/api/matricula/remover/S1/C1"), 1);
}

#[tokio::test]
async fn test_network_error_when_backend_unreachable() {
    // Port 9 on localhost: nothing listens there in the test environment
    let client = ApiClient::new("http://127.0.0.1:9/api", &ClientOptions::default()).unwrap();
    let err = client.list_courses().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
