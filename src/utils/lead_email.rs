use maud::html;

use crate::models::lead_models::LeadSubmission;
use crate::utils::mailer::OutgoingEmail;

pub const LEAD_SUBJECT: &str = "Новая заявка с сайта Цифровой театр";

pub fn render_lead_html(lead: &LeadSubmission) -> String {
    html! {
        h2 { "Новая заявка" }
        p { strong { "Имя:" } " " (lead.name) }
        p { strong { "Email:" } " " (lead.email) }
        p { strong { "Телефон:" } " " (lead.phone_or_placeholder()) }
        @if let Some(preferred_time) = &lead.preferred_time {
            p { strong { "Удобное время:" } " " (preferred_time) }
        }
        p { strong { "Сообщение:" } " " (lead.message_or_placeholder()) }
    }
    .into_string()
}

/// Notification for the operator. Replies go to the visitor when their address parses.
pub fn lead_notification(lead: &LeadSubmission, from: &str, to: &str) -> OutgoingEmail {
    let reply_to = lead
        .email
        .parse::<lettre::message::Mailbox>()
        .ok()
        .map(|_| lead.email.clone());

    OutgoingEmail {
        from: from.to_string(),
        to: to.to_string(),
        reply_to,
        subject: LEAD_SUBJECT.to_string(),
        html: render_lead_html(lead),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_fields_and_placeholders() {
        let lead = LeadSubmission::new("Ann", "a@x.com").unwrap();
        let html = render_lead_html(&lead);
        assert!(html.contains("<h2>Новая заявка</h2>"));
        assert!(html.contains("<strong>Имя:</strong> Ann"));
        assert!(html.contains("<strong>Email:</strong> a@x.com"));
        assert!(html.contains("<strong>Телефон:</strong> Не указан"));
        assert!(html.contains("<strong>Сообщение:</strong> Не указано"));
        assert!(!html.contains("Удобное время"));
    }

    #[test]
    fn escapes_visitor_markup() {
        let lead = LeadSubmission::new("<b>Ann</b>", "a@x.com")
            .unwrap()
            .with_message("<script>alert(1)</script>");
        let html = render_lead_html(&lead);
        assert!(html.contains("&lt;b&gt;Ann&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn reply_to_only_for_parseable_addresses() {
        let lead = LeadSubmission::new("Ann", "a@x.com").unwrap();
        let email = lead_notification(&lead, "site@x.com", "ops@x.com");
        assert_eq!(email.reply_to.as_deref(), Some("a@x.com"));
        assert_eq!(email.subject, LEAD_SUBJECT);
        assert_eq!(email.to, "ops@x.com");

        let lead = LeadSubmission::new("Ann", "whenever").unwrap();
        assert_eq!(lead_notification(&lead, "site@x.com", "ops@x.com").reply_to, None);
    }
}
