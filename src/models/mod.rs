mod assignment;
mod consultant_rate;
mod project;

pub use assignment::Assignment;
pub use consultant_rate::{ConsultantRate, DEFAULT_RATES};
pub use project::Project;
