mod progress;
mod service;

pub use progress::SessionProgress;
pub use service::TrainerSession;
