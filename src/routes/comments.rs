use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::domain::new_comment::{NewComment, NewCommentBody};
use crate::email_client::{escape_html, EmailClient, EmailContent};
use crate::startup::ApplicationBaseUrl;

#[tracing::instrument(
    name = "New comment handler",
    skip(body, email_client, base_url),
    fields(
        post_slug = ?body.post_slug,
        commenter_email = ?body.email
    )
)]
pub async fn handle_new_comment(
    body: web::Json<NewCommentBody>,
    email_client: web::Data<Option<EmailClient>>,
    base_url: web::Data<ApplicationBaseUrl>,
) -> impl Responder {
    let comment: NewComment = match body.into_inner().try_into() {
        Ok(comment) => comment,
        Err(err) => {
            tracing::error!("Validation error: {:?}", err);
            return HttpResponse::BadRequest().json(json!({ "error": err }));
        }
    };

    tracing::info!(
        commenter_name = comment.name.as_ref(),
        post_title = %comment.post_title,
        received_at = %Utc::now().to_rfc3339(),
        "New comment received: {}",
        comment.comment
    );

    if let Some(email_client) = email_client.get_ref() {
        let content = comment_email_content(&comment, base_url.0.as_str());
        // The comment is accepted even when the owner could not be notified
        if let Err(err) = email_client
            .send_email(email_client.sender(), &content)
            .await
        {
            tracing::error!("Failed to forward the comment by email: {:?}", err);
        }
    }

    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment sent successfully",
    }))
}

fn comment_email_content(comment: &NewComment, base_url: &str) -> EmailContent {
    let post_link = format!(
        "{}/blog/{}",
        base_url.trim_end_matches('/'),
        comment.post_slug
    );
    let text = format!(
        "New comment on: {title}\n\nFrom: {name} ({email})\nPost: {title}\nPost URL: {link}\n\nComment:\n{comment}\n\n---\nThis comment was sent from your portfolio.",
        title = comment.post_title,
        name = comment.name.as_ref(),
        email = comment.email.as_ref(),
        link = post_link,
        comment = comment.comment,
    );

    EmailContent {
        subject: format!("New comment on: {}", comment.post_title),
        html: format!("<pre>{}</pre>", escape_html(&text)),
        text,
    }
}
