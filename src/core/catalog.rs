use crate::error::CourseraError;
use crate::http::{AuthHeaders, Session};
use crate::model::{Course, Instance};

/// The platform's full course list, with one record per course and all of
/// its historical offerings nested inside.
pub const CATALOG_URL: &str = "https://www.coursera.org/maestro/api/topic/list?full=1";

/// An immutable snapshot of the course list, loaded once per run.
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    /// Load the catalog from a remote endpoint or a local JSON file; both
    /// carry the same JSON array of course records.
    pub async fn load(session: &mut Session, source: &str) -> Result<Self, CourseraError> {
        let raw = if source.starts_with("http://") || source.starts_with("https://") {
            let response = session.get(source, AuthHeaders::None).await?;
            if !response.status.is_success() {
                return Err(CourseraError::Catalog(format!(
                    "{} returned HTTP {}",
                    source, response.status
                )));
            }
            response.body
        } else {
            tokio::fs::read_to_string(source).await?
        };

        let courses: Vec<Course> =
            serde_json::from_str(&raw).map_err(|err| CourseraError::Catalog(err.to_string()))?;
        log::debug!("catalog loaded: {} courses", courses.len());
        Ok(Catalog { courses })
    }

    pub fn from_courses(courses: Vec<Course>) -> Self {
        Catalog { courses }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Map a user-supplied identifier to one course and one offering.
    ///
    /// Exact `short_name` matches win. Failing that, the identifier is
    /// tried as an instance name: the first instance per course whose
    /// `home_link` contains `/{identifier}/`. Zero hits and multiple hits
    /// are both errors; the caller must never proceed with an ambiguous
    /// course.
    pub fn resolve(&self, identifier: &str) -> Result<(&Course, &Instance), CourseraError> {
        let by_short_name: Vec<&Course> = self
            .courses
            .iter()
            .filter(|course| course.short_name == identifier)
            .collect();

        if !by_short_name.is_empty() {
            if by_short_name.len() > 1 {
                return Err(CourseraError::AmbiguousCourse(identifier.to_string()));
            }
            let course = by_short_name[0];
            return Ok((course, current_instance(course)?));
        }

        let needle = format!("/{}/", identifier);
        let mut matches: Vec<(&Course, &Instance)> = Vec::new();
        for course in &self.courses {
            if let Some(instance) = course
                .instances
                .iter()
                .find(|instance| instance.home_link.contains(&needle))
            {
                matches.push((course, instance));
            }
        }

        match matches.len() {
            0 => Err(CourseraError::CourseNotFound(identifier.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(CourseraError::AmbiguousCourse(identifier.to_string())),
        }
    }
}

/// The currently running offering of a course: the last instance flagged
/// active in catalog order, else the last instance overall (most recently
/// added, assumed most recent even when already closed).
pub fn current_instance(course: &Course) -> Result<&Instance, CourseraError> {
    if let Some(instance) = course.instances.iter().rev().find(|instance| instance.active) {
        return Ok(instance);
    }
    course
        .instances
        .last()
        .ok_or_else(|| CourseraError::NoInstance(course.short_name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn instance(active: bool, home_link: &str) -> Instance {
        Instance {
            start_month: None,
            start_day: None,
            start_year: None,
            active,
            home_link: home_link.to_string(),
        }
    }

    fn course(short_name: &str, instances: Vec<Instance>) -> Course {
        Course {
            short_name: short_name.to_string(),
            display_name: short_name.to_uppercase(),
            instructor: String::new(),
            short_description: String::new(),
            large_icon_url: String::new(),
            preview_link: None,
            instances,
        }
    }

    #[test]
    fn short_name_match_picks_last_active_instance() {
        let catalog = Catalog::from_courses(vec![course(
            "ml",
            vec![
                instance(false, "https://class.example.org/ml-2011/"),
                instance(true, "https://class.example.org/ml-2012/"),
                instance(false, "https://class.example.org/ml-2013/"),
            ],
        )]);

        let (found, current) = catalog.resolve("ml").unwrap();
        assert_eq!(found.short_name, "ml");
        // the middle instance is the active one, not the last in the list
        assert_eq!(current.home_link, "https://class.example.org/ml-2012/");
    }

    #[test]
    fn no_active_instance_falls_back_to_last() {
        let catalog = Catalog::from_courses(vec![course(
            "ml",
            vec![
                instance(false, "https://class.example.org/ml-2011/"),
                instance(false, "https://class.example.org/ml-2012/"),
            ],
        )]);

        let (_, current) = catalog.resolve("ml").unwrap();
        assert_eq!(current.home_link, "https://class.example.org/ml-2012/");
    }

    #[test]
    fn zero_instances_is_no_instance() {
        let catalog = Catalog::from_courses(vec![course("ml", vec![])]);
        assert!(matches!(
            catalog.resolve("ml"),
            Err(CourseraError::NoInstance(name)) if name == "ml"
        ));
    }

    #[test]
    fn unknown_identifier_is_not_found() {
        let catalog = Catalog::from_courses(vec![course("ml", vec![instance(true, "x")])]);
        assert!(matches!(
            catalog.resolve("nlp"),
            Err(CourseraError::CourseNotFound(_))
        ));
    }

    #[test]
    fn duplicate_short_names_are_ambiguous() {
        let catalog = Catalog::from_courses(vec![
            course("ml", vec![instance(true, "a")]),
            course("ml", vec![instance(true, "b")]),
        ]);
        assert!(matches!(
            catalog.resolve("ml"),
            Err(CourseraError::AmbiguousCourse(_))
        ));
    }

    #[test]
    fn identifier_falls_back_to_instance_name() {
        let catalog = Catalog::from_courses(vec![course(
            "ml",
            vec![
                instance(false, "https://class.example.org/ml-2012/"),
                instance(true, "https://class.example.org/ml-2013/"),
            ],
        )]);

        let (found, matched) = catalog.resolve("ml-2012").unwrap();
        assert_eq!(found.short_name, "ml");
        // the fallback returns the named instance, not the current one
        assert_eq!(matched.home_link, "https://class.example.org/ml-2012/");
    }

    #[test]
    fn instance_fallback_across_courses_is_ambiguous() {
        let catalog = Catalog::from_courses(vec![
            course("a", vec![instance(true, "https://class.example.org/fall-2013/")]),
            course("b", vec![instance(true, "https://class.example.org/fall-2013/")]),
        ]);
        assert!(matches!(
            catalog.resolve("fall-2013"),
            Err(CourseraError::AmbiguousCourse(_))
        ));
    }

    #[tokio::test]
    async fn loads_from_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"short_name": "ml", "name": "Machine Learning", "courses": []}}]"#
        )
        .unwrap();

        let mut session = Session::new(std::time::Duration::from_secs(5)).unwrap();
        let catalog = Catalog::load(&mut session, file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(catalog.courses().len(), 1);
        assert_eq!(catalog.courses()[0].display_name, "Machine Learning");
    }

    #[tokio::test]
    async fn remote_catalog_bad_json_is_catalog_error() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let mut session = Session::new(std::time::Duration::from_secs(5)).unwrap();
        let result = Catalog::load(&mut session, &server.uri()).await;
        assert!(matches!(result, Err(CourseraError::Catalog(_))));
    }
}
