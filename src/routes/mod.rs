mod chat;
mod comments;
mod health_check;
mod newsletters;
mod posts;
mod subscriptions;

pub use chat::*;
pub use comments::*;
pub use health_check::*;
pub use newsletters::*;
pub use posts::*;
pub use subscriptions::*;
