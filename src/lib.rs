pub mod application;
pub mod feedback;
pub mod form;
pub mod motion;
pub mod prelude;
pub mod submission;
pub mod surface;
pub mod timer;

pub use application::{ContactPage, PageEffect, PageEvent, PageOptions};
