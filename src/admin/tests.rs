//! Admin flows against the in-process fake backend

use super::command::SaveKind;
use super::*;
use crate::api::{ApiClient, ApiError};
use crate::testing::FakeBackend;
use chrono::NaiveDate;
use serde_json::json;
use std::collections::VecDeque;

const CLOSE_DELAY: Duration = Duration::from_secs(2);

/// Run commands inline until no follow-ups remain, the way the TUI loop
/// would across several iterations
async fn drive(admin: &mut Admin, client: &ApiClient, commands: Vec<Command>) {
    let mut queue: VecDeque<Command> = commands.into();
    while let Some(command) = queue.pop_front() {
        let outcome = perform(client, command).await;
        queue.extend(admin.apply(outcome, Instant::now()));
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn type_into(admin: &mut Admin, values: &[&str]) {
    let state = admin.form.as_mut().expect("form open");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            state.focus_next();
        }
        for c in value.chars() {
            state.insert_char(c);
        }
    }
}

fn errors(notices: &[Notice]) -> Vec<&str> {
    notices
        .iter()
        .filter(|n| n.level == NoticeLevel::Error)
        .map(|n| n.message.as_str())
        .collect()
}

async fn students_tab(backend: &FakeBackend) -> Admin {
    backend.respond(
        "GET",
        "/api/aluno",
        200,
        json!({"$values": [
            {"id": "S1", "nome": "Ana", "email": "ana@x.com", "dataNascimento": "2000-01-01"},
            {"id": "S2", "nome": "Bia", "email": "bia@x.com", "dataNascimento": "1998-05-05"}
        ]}),
    );
    let mut admin = Admin::new(CLOSE_DELAY);
    let command = admin.switch_tab(Tab::Students);
    drive(&mut admin, &backend.client(), vec![command]).await;
    admin
}

#[tokio::test]
async fn test_create_course_closes_after_delay_and_refreshes() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    backend.respond("GET", "/api/curso", 200, json!({"$values": []}));

    let mut admin = Admin::new(CLOSE_DELAY);
    let first = admin.refresh();
    drive(&mut admin, &client, vec![first]).await;
    assert!(admin.listing.records.is_empty());

    admin.open_create();
    type_into(&mut admin, &["Algorithms", "Intro"]);
    let submit = admin.submit_form(today()).expect("valid form");

    backend.respond("POST", "/api/curso", 201, json!({"id": 1}));
    backend.respond(
        "GET",
        "/api/curso",
        200,
        json!({"$values": [{"id": 1, "nome": "Algorithms", "descricao": "Intro"}]}),
    );
    drive(&mut admin, &client, vec![submit]).await;

    let posts = backend.mutations();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].path, "/api/curso");
    assert_eq!(
        posts[0].body,
        Some(json!({"nome": "Algorithms", "descricao": "Intro"}))
    );
    assert_eq!(
        admin.drain_notices(),
        vec![Notice::success("Course created")]
    );

    // Still open right after success
    assert!(admin.form.is_some());
    assert_eq!(admin.tick(Instant::now()), None);

    let close = admin.tick(Instant::now() + CLOSE_DELAY).expect("closes");
    assert!(admin.form.is_none());
    drive(&mut admin, &client, vec![close]).await;

    assert_eq!(admin.listing.records.label_at(0).as_deref(), Some("Algorithms"));
}

#[test]
fn test_save_after_cancel_leaves_new_form_alone() {
    let mut admin = Admin::new(CLOSE_DELAY);
    admin.open_create();
    type_into(&mut admin, &["Algorithms", "Intro"]);
    let Some(Command::Save { ticket, .. }) = admin.submit_form(today()) else {
        panic!("save expected");
    };

    // Cancelled while the POST is in flight, then a fresh form is opened
    assert!(admin.close_form().is_some());
    admin.open_create();

    let follow_ups = admin.apply(
        Outcome::Saved {
            ticket,
            kind: SaveKind::Created("Course"),
            result: Ok(()),
        },
        Instant::now(),
    );

    let state = admin.form.as_ref().expect("new form still open");
    assert!(state.is_editable());
    assert_eq!(state.close_at, None);
    assert_eq!(admin.tick(Instant::now() + CLOSE_DELAY), None);
    // The record exists now, so the list is read again
    assert!(matches!(follow_ups.as_slice(), [Command::Refresh { .. }]));
    assert_eq!(
        admin.drain_notices(),
        vec![Notice::success("Course created")]
    );
}

#[test]
fn test_failed_save_of_closed_form_does_not_unlock_current_one() {
    let mut admin = Admin::new(CLOSE_DELAY);
    admin.open_create();
    type_into(&mut admin, &["Algorithms", "Intro"]);
    let Some(Command::Save { ticket: old, .. }) = admin.submit_form(today()) else {
        panic!("save expected");
    };
    admin.close_form();

    admin.open_create();
    type_into(&mut admin, &["Networks", "Layers"]);
    let Some(Command::Save { ticket: current, .. }) = admin.submit_form(today()) else {
        panic!("save expected");
    };
    assert_ne!(old, current);

    let follow_ups = admin.apply(
        Outcome::Saved {
            ticket: old,
            kind: SaveKind::Created("Course"),
            result: Err(ApiError::Status {
                status: 500,
                body: String::new(),
            }),
        },
        Instant::now(),
    );
    assert!(follow_ups.is_empty());
    assert!(admin.form.as_ref().unwrap().submitting);

    admin.apply(
        Outcome::Saved {
            ticket: current,
            kind: SaveKind::Created("Course"),
            result: Ok(()),
        },
        Instant::now(),
    );
    assert!(admin.form.as_ref().unwrap().close_at.is_some());
}

#[tokio::test]
async fn test_underage_student_issues_no_request() {
    let backend = FakeBackend::start().await;
    let mut admin = students_tab(&backend).await;
    let before = backend.requests().len();

    admin.open_create();
    type_into(&mut admin, &["Caio", "caio@x.com", "2010-01-01"]);
    assert_eq!(admin.submit_form(today()), None);

    let notices = admin.drain_notices();
    assert_eq!(errors(&notices), vec!["Student must be at least 18 years old"]);
    assert_eq!(backend.requests().len(), before);
    // The form stays open for correction
    assert!(admin.form.as_ref().unwrap().is_editable());
}

#[tokio::test]
async fn test_adult_student_issues_exactly_one_post() {
    let backend = FakeBackend::start().await;
    let mut admin = students_tab(&backend).await;

    admin.open_create();
    type_into(&mut admin, &["Caio", "caio@x.com", "2008-10-16"]);
    let submit = admin.submit_form(today()).expect("turns 18 today");

    // A second submit while the first is in flight is ignored
    assert_eq!(admin.submit_form(today()), None);

    drive(&mut admin, &backend.client(), vec![submit]).await;
    assert_eq!(backend.mutations().len(), 1);
    assert_eq!(backend.count("POST", "/api/aluno"), 1);
}

#[tokio::test]
async fn test_edit_student_puts_once() {
    let backend = FakeBackend::start().await;
    let mut admin = students_tab(&backend).await;

    admin.listing.select_next();
    admin.open_edit();
    let submit = admin.submit_form(today()).expect("unchanged record is valid");
    drive(&mut admin, &backend.client(), vec![submit]).await;

    assert_eq!(backend.count("PUT", "/api/aluno/update/S2"), 1);
    assert_eq!(backend.mutations().len(), 1);
}

#[tokio::test]
async fn test_delete_refreshes_once_on_success_and_failure() {
    for status in [200u16, 500] {
        let backend = FakeBackend::start().await;
        backend.respond("GET", "/api/curso", 200, json!({"$values": [
            {"id": "C1", "nome": "Algorithms", "descricao": ""}
        ]}));
        backend.respond("DELETE", "/api/curso/C1", status, json!({}));
        let client = backend.client();

        let mut admin = Admin::new(CLOSE_DELAY);
        let first = admin.refresh();
        drive(&mut admin, &client, vec![first]).await;
        assert_eq!(backend.count("GET", "/api/curso"), 1);

        admin.request_delete();
        let delete = admin.answer_confirm(true).expect("confirmed");
        drive(&mut admin, &client, vec![delete]).await;

        assert_eq!(backend.count("DELETE", "/api/curso/C1"), 1);
        assert_eq!(backend.count("GET", "/api/curso"), 2, "status {}", status);

        let notices = admin.drain_notices();
        assert_eq!(notices.len(), 1);
        let expected = if status == 200 {
            NoticeLevel::Success
        } else {
            NoticeLevel::Error
        };
        assert_eq!(notices[0].level, expected);
    }
}

#[tokio::test]
async fn test_missing_enrollments_are_not_errors() {
    let backend = FakeBackend::start().await;
    // No /matricula/aluno/* routes: every lookup answers 404
    let mut admin = students_tab(&backend).await;

    assert!(admin.drain_notices().is_empty());
    assert_eq!(admin.listing.enrollments_by_student.len(), 2);
    assert!(admin.listing.enrollments_by_student["S1"].is_empty());

    admin.listing.toggle_expanded(0);
    assert!(admin.listing.is_expanded(0));
    assert!(!admin.listing.is_expanded(1));
    assert!(admin.listing.sub_items(0).is_empty());
}

#[tokio::test]
async fn test_courses_without_enrollments_are_not_errors() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/api/curso",
        200,
        json!({"$values": [
            {"id": "C1", "nome": "Algorithms", "descricao": "Intro"},
            {"id": "C2", "nome": "Networks", "descricao": "TCP"}
        ]}),
    );
    // No /matricula/curso/* routes: every lookup answers 404
    let mut admin = Admin::new(CLOSE_DELAY);
    let first = admin.refresh();
    drive(&mut admin, &backend.client(), vec![first]).await;

    assert!(admin.drain_notices().is_empty());
    assert_eq!(admin.listing.records.len(), 2);
    assert_eq!(admin.listing.students_by_course.len(), 2);
    assert!(admin.listing.students_by_course["C1"].is_empty());
    assert_eq!(backend.count("GET", "/api/matricula/curso/C2"), 1);

    admin.listing.toggle_expanded(1);
    assert!(admin.listing.is_expanded(1));
    assert!(admin.listing.sub_items(1).is_empty());
}

#[tokio::test]
async fn test_declined_unenroll_issues_no_delete() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/api/matricula/aluno/S1",
        200,
        json!({"$values": [{"id": 5, "alunoId": "S1", "cursoId": "C1",
            "curso": {"id": "C1", "nome": "Algorithms", "descricao": ""}}]}),
    );
    let mut admin = students_tab(&backend).await;

    admin.listing.toggle_expanded(0);
    admin.request_unenroll();
    assert!(matches!(
        admin.confirm,
        Some(Confirm::RemoveEnrollment { ref student_id, ref course_id, .. })
            if student_id == "S1" && course_id == "C1"
    ));

    assert_eq!(admin.answer_confirm(false), None);
    assert!(admin.confirm.is_none());
    assert!(backend.mutations().is_empty());
}

#[tokio::test]
async fn test_confirmed_unenroll_deletes_and_refreshes() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/api/matricula/aluno/S1",
        200,
        json!({"$values": [{"id": 5, "alunoId": "S1", "cursoId": "C1"}]}),
    );
    let mut admin = students_tab(&backend).await;
    let client = backend.client();

    admin.listing.toggle_expanded(0);
    admin.request_unenroll();
    let remove = admin.answer_confirm(true).expect("confirmed");
    drive(&mut admin, &client, vec![remove]).await;

    assert_eq!(backend.count("DELETE", "/api/matricula/remover/S1/C1"), 1);
    assert_eq!(backend.count("GET", "/api/aluno"), 2);
    assert_eq!(
        admin.drain_notices(),
        vec![Notice::success("Enrollment removed")]
    );
}

#[tokio::test]
async fn test_failed_unenroll_keeps_listing() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/api/matricula/aluno/S1",
        200,
        json!({"$values": [{"id": 5, "alunoId": "S1", "cursoId": "C1"}]}),
    );
    backend.respond("DELETE", "/api/matricula/remover/S1/C1", 500, json!({}));
    let mut admin = students_tab(&backend).await;

    admin.listing.toggle_expanded(0);
    admin.request_unenroll();
    let remove = admin.answer_confirm(true).unwrap();
    drive(&mut admin, &backend.client(), vec![remove]).await;

    assert_eq!(backend.count("GET", "/api/aluno"), 1);
    assert_eq!(admin.listing.sub_items(0).len(), 1);
    assert_eq!(
        errors(&admin.drain_notices()),
        vec!["Failed to remove enrollment"]
    );
}

#[tokio::test]
async fn test_add_course_requires_selection() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/api/curso",
        200,
        json!({"$values": [{"id": "C1", "nome": "Algorithms", "descricao": ""}]}),
    );
    let mut admin = students_tab(&backend).await;
    let client = backend.client();

    let load = admin.open_add_course().expect("student selected");
    drive(&mut admin, &client, vec![load]).await;

    assert_eq!(admin.submit_form(today()), None);
    assert_eq!(errors(&admin.drain_notices()), vec!["Select a course"]);
    assert!(backend.mutations().is_empty());

    admin.form.as_mut().unwrap().select_step(true);
    let enroll = admin.submit_form(today()).expect("course selected");
    drive(&mut admin, &client, vec![enroll]).await;

    let sent = backend.mutations();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, Some(json!({"alunoId": "S1", "cursoId": "C1"})));
    assert_eq!(admin.drain_notices(), vec![Notice::success("Student enrolled")]);
}

#[tokio::test]
async fn test_add_course_load_failure_is_reported() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/api/curso", 500, json!({}));
    let mut admin = students_tab(&backend).await;

    let load = admin.open_add_course().expect("student selected");
    drive(&mut admin, &backend.client(), vec![load]).await;

    let state = admin.form.as_ref().expect("picker stays open");
    assert!(state.load_failed);
    assert_eq!(errors(&admin.drain_notices()), vec!["Failed to load courses"]);
}

#[test]
fn test_stale_read_is_discarded() {
    let mut admin = Admin::new(CLOSE_DELAY);
    let Command::Refresh { generation: old, .. } = admin.refresh() else {
        unreachable!()
    };
    let _newer = admin.switch_tab(Tab::Students);

    let stale = Outcome::Loaded {
        tab: Tab::Courses,
        generation: old,
        result: Ok(Loaded {
            records: Records::Courses(vec![crate::model::Course {
                id: "C1".to_string(),
                name: "Old".to_string(),
                description: String::new(),
            }]),
            ..Default::default()
        }),
    };
    assert!(admin.apply(stale, Instant::now()).is_empty());
    assert_eq!(admin.listing.records, Records::Students(Vec::new()));
    assert!(admin.loading);
}

#[test]
fn test_failed_read_clears_and_notifies() {
    let mut admin = Admin::new(CLOSE_DELAY);
    let Command::Refresh { tab, generation } = admin.refresh() else {
        unreachable!()
    };
    let outcome = Outcome::Loaded {
        tab,
        generation,
        result: Err(ApiError::Network("connection refused".to_string())),
    };
    admin.apply(outcome, Instant::now());

    assert!(!admin.loading);
    assert!(admin.listing.records.is_empty());
    assert_eq!(errors(&admin.drain_notices()), vec!["Failed to load courses"]);
}

#[test]
fn test_cancel_form_refreshes() {
    let mut admin = Admin::new(CLOSE_DELAY);
    admin.open_create();
    assert!(matches!(admin.close_form(), Some(Command::Refresh { .. })));
    assert_eq!(admin.close_form(), None);
}
