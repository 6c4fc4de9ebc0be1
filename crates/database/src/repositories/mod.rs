pub mod chat_session;
pub mod company;
pub mod user;

pub use chat_session::ChatSessionRepository;
pub use company::CompanyRepository;
pub use user::UserRepository;
