pub mod cloudinary;
pub mod db;
pub mod google;
pub mod mailer;
pub mod memory;

pub use cloudinary::CloudinarySigner;
pub use db::DbAdapter;
pub use google::GoogleIdentityVerifier;
pub use mailer::{LogMailer, SmtpMailer};
pub use memory::MemoryDb;
