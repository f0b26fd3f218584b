pub mod model;
pub mod quality;
