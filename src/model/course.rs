use serde::{Deserialize, Serialize};

/// One course as it appears in the catalog JSON. A course is offered many
/// times, so it carries a list of instances; each instance has its own
/// class site under `home_link`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Course {
    pub short_name: String,

    #[serde(rename = "name", default)]
    pub display_name: String,

    #[serde(default)]
    pub instructor: String,

    #[serde(default)]
    pub short_description: String,

    #[serde(rename = "large_icon", default)]
    pub large_icon_url: String,

    /// Absent or empty means the course has no public preview page.
    #[serde(default)]
    pub preview_link: Option<String>,

    #[serde(rename = "courses", default)]
    pub instances: Vec<Instance>,
}

impl Course {
    /// The preview URL, with the catalog's "no preview" spellings (null or
    /// empty string) both collapsed to `None`.
    pub fn preview_url(&self) -> Option<&str> {
        self.preview_link.as_deref().filter(|link| !link.is_empty())
    }
}

/// One concrete offering of a course.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Instance {
    #[serde(default)]
    pub start_month: Option<u32>,

    #[serde(default)]
    pub start_day: Option<u32>,

    #[serde(default)]
    pub start_year: Option<i32>,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub home_link: String,
}

impl Instance {
    /// "month/year" for table output, or "None" when the catalog carries no
    /// start date for this offering.
    pub fn start_label(&self) -> String {
        match (self.start_month, self.start_year) {
            (Some(month), Some(year)) => format!("{}/{}", month, year),
            _ => "None".to_string(),
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.active { "ACTIVE" } else { "INACTIVE" }
    }
}
