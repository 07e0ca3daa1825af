pub mod news;
pub mod selection;
pub mod subscription;
