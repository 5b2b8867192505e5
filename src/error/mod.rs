pub mod coursera;

pub use coursera::CourseraError;
