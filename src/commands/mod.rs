pub mod backlinks;
pub mod build;
pub mod view;
