#[cfg(test)]
pub mod fixtures;
pub mod notepad;
pub mod user;

pub use notepad::Notepad;
pub use user::User;
