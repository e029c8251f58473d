mod fetch;
mod ingest;
mod question;
mod session;

pub use fetch::ApiClient;
pub use ingest::parse;
pub use question::Question;
pub use session::{QuizSession, ReviewEntry};
