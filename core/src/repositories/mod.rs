pub mod session;
pub mod user;

pub use session::SessionRepository;
pub use user::UserDirectory;

#[cfg(any(test, feature = "mock-services"))]
pub use session::InMemorySessionRepository;
#[cfg(any(test, feature = "mock-services"))]
pub use user::MockUserDirectory;
