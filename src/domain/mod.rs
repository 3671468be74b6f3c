pub mod chat_message;
pub mod commenter_name;
pub mod new_comment;
pub mod post_notification;
pub mod subscriber;
pub mod subscriber_email;
