pub mod course;
pub mod lecture;

pub use course::{Course, Instance};
pub use lecture::LectureRecord;
