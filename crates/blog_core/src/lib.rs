pub mod content;
pub mod domain;
pub mod ports;
pub mod validation;

pub use content::{Content, ContentBlock, HeaderLevel};
pub use domain::{
    page_count, AccountInfo, Activity, AuthResponse, Author, AuthorInfo, Blog, BlogDraft,
    BlogInput, BlogOrder, BlogPagination, BlogQuery, LikeOutcome, NewUser, PersonalInfo,
    ProfileUpdate, Role, SocialLinks, StoredBlog, UploadTicket, User, UserCredentials,
    UserPagination, UserQuery, VerifiedIdentity,
};
pub use ports::{
    DatabaseService, IdentityVerifier, Mailer, PortError, PortResult, UploadSigner,
};
pub use validation::ValidationError;
