mod chat;
mod comments;
mod health_check;
mod helpers;
mod subscriptions;
