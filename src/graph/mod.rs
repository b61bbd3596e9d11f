pub mod backlinks;
pub mod build;
pub mod model;
