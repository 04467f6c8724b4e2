//! Configuration module

mod site;

pub use site::MailConfig;
pub use site::Profile;
pub use site::SiteConfig;
pub use site::DEFAULT_SECRET_KEY;
