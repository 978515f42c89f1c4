use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::client::{ensure_success, ClientResult};

pub const CLASSROOM_API_URL: &str = "https://classroom.googleapis.com/v1";
pub const STUDENT_COURSE_PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StudentCourse {
    pub course: Course,
    pub materials: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnrolledStudent {
    pub full_name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EducatorCourse {
    pub course: Course,
    pub students: Vec<EnrolledStudent>,
}

#[derive(Debug, Default, Deserialize)]
struct CourseList {
    #[serde(default)]
    courses: Vec<Course>,
}

#[derive(Debug, Default, Deserialize)]
struct MaterialList {
    #[serde(default, rename = "courseWorkMaterial")]
    materials: Vec<Material>,
}

#[derive(Debug, Deserialize)]
struct Material {
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StudentList {
    #[serde(default)]
    students: Vec<StudentEntry>,
}

#[derive(Debug, Deserialize)]
struct StudentEntry {
    profile: StudentProfile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentProfile {
    #[serde(default)]
    name: ProfileName,
    #[serde(default)]
    email_address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileName {
    #[serde(default)]
    full_name: String,
}

impl MaterialList {
    fn titles(self) -> Vec<String> {
        self.materials
            .into_iter()
            .map(|m| m.title.unwrap_or_else(|| "Untitled".to_string()))
            .collect()
    }
}

impl StudentList {
    fn into_students(self) -> Vec<EnrolledStudent> {
        self.students
            .into_iter()
            .map(|s| EnrolledStudent {
                full_name: s.profile.name.full_name,
                email: s.profile.email_address,
            })
            .collect()
    }
}

/// Read-only Google Classroom access with a user's OAuth token.
#[derive(Clone, Debug)]
pub struct ClassroomClient {
    http: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

impl ClassroomClient {
    pub fn new(access_token: SecretString) -> Self {
        Self::with_base_url(CLASSROOM_API_URL, access_token)
    }

    pub fn with_base_url(base_url: &str, access_token: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<T> {
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, path))
            .bearer_auth(self.access_token.expose_secret())
            .query(query)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    /// Up to ten courses, each with its course-work material titles.
    pub async fn student_view(&self) -> ClientResult<Vec<StudentCourse>> {
        let page_size = STUDENT_COURSE_PAGE_SIZE.to_string();
        let courses: CourseList = self
            .get("courses", &[("pageSize", page_size.as_str())])
            .await?;

        let mut view = Vec::with_capacity(courses.courses.len());
        for course in courses.courses {
            let materials = match self
                .get::<MaterialList>(&format!("courses/{}/courseWorkMaterials", course.id), &[])
                .await
            {
                Ok(list) => list.titles(),
                Err(err) => {
                    log::warn!("No materials for course {}: {}", course.id, err);
                    Vec::new()
                }
            };
            view.push(StudentCourse { course, materials });
        }
        Ok(view)
    }

    /// Courses the user teaches, each with its enrolled students.
    pub async fn educator_view(&self) -> ClientResult<Vec<EducatorCourse>> {
        let courses: CourseList = self.get("courses", &[("teacherId", "me")]).await?;

        let mut view = Vec::with_capacity(courses.courses.len());
        for course in courses.courses {
            let students = match self
                .get::<StudentList>(&format!("courses/{}/students", course.id), &[])
                .await
            {
                Ok(list) => list.into_students(),
                Err(err) => {
                    log::warn!("Could not fetch students for course {}: {}", course.id, err);
                    Vec::new()
                }
            };
            view.push(EducatorCourse { course, students });
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;

    #[test]
    fn test_material_titles_default_to_untitled() {
        let list: MaterialList = serde_json::from_str(
            r#"{"courseWorkMaterial": [{"title": "Week 1 slides"}, {"id": "m2"}]}"#,
        )
        .unwrap();
        assert_eq!(list.titles(), vec!["Week 1 slides", "Untitled"]);
    }

    #[test]
    fn test_empty_responses_deserialize() {
        let courses: CourseList = serde_json::from_str("{}").unwrap();
        assert!(courses.courses.is_empty());

        let materials: MaterialList = serde_json::from_str("{}").unwrap();
        assert!(materials.titles().is_empty());
    }

    #[test]
    fn test_students_read_from_profile() {
        let list: StudentList = serde_json::from_str(
            r#"{"students": [{
                "courseId": "c1",
                "userId": "s1",
                "profile": {
                    "id": "s1",
                    "name": {"givenName": "Ada", "familyName": "Lovelace", "fullName": "Ada Lovelace"},
                    "emailAddress": "ada@example.com"
                }
            }]}"#,
        )
        .unwrap();

        assert_eq!(
            list.into_students(),
            vec![EnrolledStudent {
                full_name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = ClassroomClient::with_base_url(
            "http://localhost:9000/v1/",
            SecretString::from("token".to_string()),
        );
        assert_eq!(client.base_url, "http://localhost:9000/v1");
    }

    #[tokio::test]
    async fn test_course_listing_failure_is_an_error() {
        let client = ClassroomClient::with_base_url(
            "http://127.0.0.1:9",
            SecretString::from("token".to_string()),
        );
        assert!(matches!(
            client.student_view().await,
            Err(ClientError::Http(_))
        ));
    }
}
