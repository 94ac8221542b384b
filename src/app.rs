#[allow(clippy::module_inception)]
mod app;
mod handler;
mod input;

pub use handler::AppHandler;
