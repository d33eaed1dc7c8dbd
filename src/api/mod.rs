//! REST client for the school backend
//!
//! One method per backend call. Every mutation is fire-and-report: the
//! caller re-reads the affected collection afterwards instead of merging
//! the response, so create/update/delete return `()`.
//!
//! Relationship lookups (`/matricula/aluno/{id}`, `/matricula/curso/{id}`)
//! treat 404 as "nothing enrolled". The batch variants issue their lookups
//! concurrently and fold every failure into an empty sublist.

mod error;

#[cfg(test)]
mod tests;

pub use error::ApiError;

use crate::model::{
    decode_list, Course, Enrollment, ListBody, NewCourse, NewEnrollment, NewStudent, Student,
};
use futures::future::join_all;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// The three backend collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Course,
    Student,
    Enrollment,
}

impl Resource {
    /// Path segment under the API base URL
    pub fn segment(self) -> &'static str {
        match self {
            Resource::Course => "curso",
            Resource::Student => "aluno",
            Resource::Enrollment => "matricula",
        }
    }
}

/// HTTP client knobs
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Accept self-signed certificates (the backend's local dev certificate)
    pub accept_invalid_certs: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
        }
    }
}

/// Client for the course/student/enrollment backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `https://localhost:7194/api`)
    pub fn new(base_url: impl Into<String>, options: &ClientOptions) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("API client initialized: {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    // ─── Collections ────────────────────────────────────────────────────────

    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get_list(Resource::Course.segment()).await
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        self.get_list(Resource::Student.segment()).await
    }

    pub async fn list_enrollments(&self) -> Result<Vec<Enrollment>, ApiError> {
        self.get_list(Resource::Enrollment.segment()).await
    }

    // ─── Mutations ──────────────────────────────────────────────────────────

    pub async fn create_course(&self, course: &NewCourse) -> Result<(), ApiError> {
        tracing::info!("Creating course {:?}", course.name);
        self.post(Resource::Course, course).await
    }

    pub async fn create_student(&self, student: &NewStudent) -> Result<(), ApiError> {
        tracing::info!("Creating student {:?}", student.name);
        self.post(Resource::Student, student).await
    }

    pub async fn create_enrollment(&self, enrollment: &NewEnrollment) -> Result<(), ApiError> {
        tracing::info!(
            "Enrolling student {} in course {}",
            enrollment.student_id,
            enrollment.course_id
        );
        self.post(Resource::Enrollment, enrollment).await
    }

    pub async fn update_course(&self, course: &Course) -> Result<(), ApiError> {
        tracing::info!("Updating course {}", course.id);
        let url = self.url(&format!("{}/update/{}", Resource::Course.segment(), course.id));
        send(self.client.put(url).json(course)).await.map(drop)
    }

    pub async fn update_student(&self, student: &Student) -> Result<(), ApiError> {
        tracing::info!("Updating student {}", student.id);
        let url = self.url(&format!(
            "{}/update/{}",
            Resource::Student.segment(),
            student.id
        ));
        send(self.client.put(url).json(student)).await.map(drop)
    }

    pub async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        tracing::info!("Deleting {} {}", resource.segment(), id);
        let url = self.url(&format!("{}/{}", resource.segment(), id));
        send(self.client.delete(url)).await.map(drop)
    }

    /// `DELETE /matricula/remover/{alunoId}/{cursoId}`
    pub async fn remove_enrollment(&self, student_id: &str, course_id: &str) -> Result<(), ApiError> {
        tracing::info!(
            "Removing enrollment of student {} from course {}",
            student_id,
            course_id
        );
        let url = self.url(&format!("matricula/remover/{}/{}", student_id, course_id));
        send(self.client.delete(url)).await.map(drop)
    }

    // ─── Relationship lookups ───────────────────────────────────────────────

    /// Enrollments of one student; 404 means none
    pub async fn enrollments_by_student(&self, student_id: &str) -> Result<Vec<Enrollment>, ApiError> {
        not_found_is_empty(self.get_list(&format!("matricula/aluno/{}", student_id)).await)
    }

    /// Students enrolled in one course; 404 means none
    pub async fn students_by_course(&self, course_id: &str) -> Result<Vec<Student>, ApiError> {
        let enrollments: Vec<Enrollment> =
            not_found_is_empty(self.get_list(&format!("matricula/curso/{}", course_id)).await)?;

        Ok(enrollments
            .into_iter()
            .filter_map(|e| {
                if e.student.is_none() {
                    tracing::debug!("Enrollment {} has no embedded student, skipping", e.id);
                }
                e.student
            })
            .collect())
    }

    /// Enrollments for every student id, looked up concurrently
    ///
    /// Lookup failures are logged and recorded as an empty sublist; they are
    /// never surfaced to the operator.
    pub async fn enrollments_for_students(
        &self,
        student_ids: &[String],
    ) -> HashMap<String, Vec<Enrollment>> {
        let lookups = student_ids.iter().map(|id| async move {
            let enrollments = self.enrollments_by_student(id).await.unwrap_or_else(|e| {
                tracing::warn!("Failed to load enrollments for student {}: {}", id, e);
                Vec::new()
            });
            (id.clone(), enrollments)
        });
        join_all(lookups).await.into_iter().collect()
    }

    /// Enrolled students for every course id, looked up concurrently
    pub async fn students_for_courses(&self, course_ids: &[String]) -> HashMap<String, Vec<Student>> {
        let lookups = course_ids.iter().map(|id| async move {
            let students = self.students_by_course(id).await.unwrap_or_else(|e| {
                tracing::warn!("Failed to load students for course {}: {}", id, e);
                Vec::new()
            });
            (id.clone(), students)
        });
        join_all(lookups).await.into_iter().collect()
    }

    // ─── Helpers ────────────────────────────────────────────────────────────

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response = send(self.client.get(self.url(path))).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let body: Option<ListBody<serde_json::Value>> = serde_json::from_str(&text)
            .map_err(|e| ApiError::Decode(format!("GET /{} did not return a list: {}", path, e)))?;
        let items: Vec<T> = decode_list(body);
        tracing::debug!("GET /{} -> {} item(s)", path, items.len());
        Ok(items)
    }

    async fn post<B: serde::Serialize>(&self, resource: Resource, body: &B) -> Result<(), ApiError> {
        send(self.client.post(self.url(resource.segment())).json(body))
            .await
            .map(drop)
    }
}

/// Send a request, mapping non-2xx statuses to [`ApiError::Status`]
async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!("Backend answered {}: {}", status, body);
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

fn not_found_is_empty<T>(result: Result<Vec<T>, ApiError>) -> Result<Vec<T>, ApiError> {
    match result {
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        other => other,
    }
}
