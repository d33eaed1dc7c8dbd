// Domain records exchanged with the school backend
//
// The backend speaks Portuguese field names and serializes collections with
// reference preservation, so list bodies look like:
//
//   { "$id": "1", "$values": [ { "$id": "2", "id": 7, "nome": "..." } ] }
//
// Records here are plain data. Ids are kept as opaque strings whatever the
// backend sends (numbers or GUID strings).

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A course a student can enroll in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
}

/// A student record, subject to the minimum-age rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "dataNascimento", with = "birth_date")]
    pub birth_date: NaiveDate,
}

/// Join record between one student and one course
///
/// The embedded student/course are denormalized copies for display. They can
/// be missing or replaced by `{"$ref": "n"}` markers, in which case they are
/// `None` and callers fall back to the ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(rename = "alunoId", deserialize_with = "id_text")]
    pub student_id: String,
    #[serde(rename = "cursoId", deserialize_with = "id_text")]
    pub course_id: String,
    #[serde(rename = "aluno", default, deserialize_with = "lenient")]
    pub student: Option<Student>,
    #[serde(rename = "curso", default, deserialize_with = "lenient")]
    pub course: Option<Course>,
    #[serde(rename = "dataMatricula", default)]
    pub enrolled_at: Option<String>,
}

impl Enrollment {
    /// Student name for display, falling back to the id
    pub fn student_label(&self) -> String {
        self.student
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("aluno #{}", self.student_id))
    }

    /// Course name for display, falling back to the id
    pub fn course_label(&self) -> String {
        self.course
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("curso #{}", self.course_id))
    }

    /// Enrollment date as DD/MM/YYYY when the backend sent a parseable one
    pub fn enrolled_on(&self) -> Option<String> {
        self.enrolled_at
            .as_deref()
            .and_then(parse_date)
            .map(|d| d.format(DISPLAY_DATE).to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /curso`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCourse {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
}

/// Body of `POST /aluno`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStudent {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "dataNascimento", with = "birth_date")]
    pub birth_date: NaiveDate,
}

/// Body of `POST /matricula`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEnrollment {
    #[serde(rename = "alunoId")]
    pub student_id: String,
    #[serde(rename = "cursoId")]
    pub course_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Collection envelope
// ─────────────────────────────────────────────────────────────────────────────

/// A list response: either the `$values` envelope or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(rename = "$values", default = "Vec::new")]
        values: Vec<T>,
    },
}

impl<T> ListBody<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) => items,
            ListBody::Wrapped { values } => values,
        }
    }
}

/// Unwrap a list body, treating `null` or a missing envelope as empty
pub(crate) fn unwrap_list<T>(body: Option<ListBody<T>>) -> Vec<T> {
    body.map(ListBody::into_vec).unwrap_or_default()
}

/// Decode list items one by one; a record that does not fit is skipped
/// so the rest of the collection still shows
pub(crate) fn decode_list<T: DeserializeOwned>(
    body: Option<ListBody<serde_json::Value>>,
) -> Vec<T> {
    unwrap_list(body)
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping malformed record at index {}: {}", index, e);
                None
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Dates
// ─────────────────────────────────────────────────────────────────────────────

/// Format used for dates shown to the operator
pub const DISPLAY_DATE: &str = "%d/%m/%Y";

/// Wire format for dates sent to the backend
pub const WIRE_DATE: &str = "%Y-%m-%d";

/// Parse a date as the backend or the operator may write it
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, a naive timestamp
/// (`YYYY-MM-DDTHH:MM:SS[.fff]`) or an RFC 3339 timestamp; only the date part
/// is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, WIRE_DATE) {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, DISPLAY_DATE) {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

mod birth_date {
    use super::{parse_date, WIRE_DATE};
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(WIRE_DATE).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Accept an id as a JSON string or number
fn id_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(d)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

/// Deserialize an embedded record, yielding `None` when it does not fit
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope_unwraps_values() {
        let body = r#"{"$id":"1","$values":[{"$id":"2","id":7,"nome":"Rust","descricao":"Intro"}]}"#;
        let parsed: Option<ListBody<Course>> = serde_json::from_str(body).unwrap();
        let courses = unwrap_list(parsed);

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, "7");
        assert_eq!(courses[0].name, "Rust");
    }

    #[test]
    fn test_list_envelope_missing_values_is_empty() {
        let parsed: Option<ListBody<Course>> = serde_json::from_str(r#"{"$id":"1"}"#).unwrap();
        assert!(unwrap_list(parsed).is_empty());

        let parsed: Option<ListBody<Course>> = serde_json::from_str("null").unwrap();
        assert!(unwrap_list(parsed).is_empty());
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let body = r#"{"$values":[
            {"id":"S1","nome":"Ana","email":"ana@x.com","dataNascimento":"2000-01-01"},
            {"id":"S2","nome":"Bia","email":"bia@x.com","dataNascimento":null},
            {"$ref":"3"},
            {"id":"S4","nome":"Caio","email":"caio@x.com","dataNascimento":"1999-09-09T00:00:00"}
        ]}"#;
        let parsed: Option<ListBody<serde_json::Value>> = serde_json::from_str(body).unwrap();
        let students: Vec<Student> = decode_list(parsed);

        let ids: Vec<&str> = students.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S4"]);
    }

    #[test]
    fn test_student_birth_date_formats() {
        let body = r#"{"id":"a1","nome":"Ana","email":"ana@x.com","dataNascimento":"2001-03-04T00:00:00"}"#;
        let student: Student = serde_json::from_str(body).unwrap();
        assert_eq!(student.birth_date, NaiveDate::from_ymd_opt(2001, 3, 4).unwrap());

        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["dataNascimento"], "2001-03-04");
    }

    #[test]
    fn test_enrollment_with_reference_marker() {
        let body = r#"{
            "id": 3, "alunoId": 1, "cursoId": 2,
            "aluno": {"$ref": "4"},
            "curso": {"id": 2, "nome": "Redes", "descricao": "TCP/IP"},
            "dataMatricula": "2024-02-10T12:30:00.123"
        }"#;
        let enrollment: Enrollment = serde_json::from_str(body).unwrap();

        assert!(enrollment.student.is_none());
        assert_eq!(enrollment.student_label(), "aluno #1");
        assert_eq!(enrollment.course_label(), "Redes");
        assert_eq!(enrollment.enrolled_on().as_deref(), Some("10/02/2024"));
    }

    #[test]
    fn test_new_course_body_has_no_id() {
        let body = NewCourse {
            name: "Algorithms".to_string(),
            description: "Intro".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"nome":"Algorithms","descricao":"Intro"}"#
        );
    }

    #[test]
    fn test_parse_date_display_format() {
        assert_eq!(
            parse_date("25/12/1999"),
            NaiveDate::from_ymd_opt(1999, 12, 25)
        );
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("  "), None);
    }
}
