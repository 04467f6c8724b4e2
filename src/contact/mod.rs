//! Contact form handling: validate, persist, then optionally relay by email

mod notify;
mod store;
mod validator;

pub use notify::{MailRelay, NotifyError, Notifier};
pub use store::{Message, MessageStore, StoreError};
pub use validator::{validate, ContactForm, ValidContact};
