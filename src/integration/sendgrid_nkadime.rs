use dotenv::dotenv;
use sendgrid::error::SendgridError;
use sendgrid::v3::*;
use std::env;

pub async fn send_email(
    from_name: Option<&str>,
    to: Email,
    subject: &str,
    text: &str,
    reply_to: Option<Email>,
    attachment: Option<Attachment>,
) -> Result<(), SendgridError> {
    dotenv().ok();
    let sg_api_key = env::var("SENDGRID_API_KEY").expect("SENDGRID_API_KEY must be set");
    let p = Personalization::new(to);

    let from = make_email_obj("no-reply@nkadime.com", from_name.unwrap_or("Team Nkadime"));
    let mut m = Message::new(from)
        .set_subject(subject)
        .add_content(Content::new().set_content_type("text/html").set_value(text))
        .add_personalization(p);
    if let Some(reply_to) = reply_to {
        m = m.set_reply_to(reply_to);
    }
    if let Some(attachment) = attachment {
        m = m.add_attachment(attachment);
    }

    let sender = Sender::new(sg_api_key, None);
    let resp = sender.send(&m).await?;
    if !resp.status().is_success() {
        println!("status: {}", resp.status());
    }

    Ok(())
}

pub fn make_email_obj(addr: &str, name: &str) -> Email {
    let mut email = Email::new(addr);
    email = email.set_name(name);
    email
}

/// Best-effort mail to a user id, on a spawned task. Dispute events use
/// this; a delivery failure is logged and nothing more.
pub fn email_user_best_effort(user_id: i32, subject: String, text: String) {
    tokio::spawn(async move {
        let user = match crate::methods::user::get_user_by_id(user_id).await {
            Ok(user) => user,
            Err(e) => {
                eprintln!("email: user {} lookup failed: {:?}", user_id, e);
                return;
            }
        };
        let to = make_email_obj(&user.email, &user.name);
        if let Err(e) = send_email(None, to, &subject, &text, None, None).await {
            eprintln!("email: send to user {} failed: {:?}", user_id, e);
        }
    });
}
