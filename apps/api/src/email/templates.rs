//! Email bodies for intake events. Every event produces an internal
//! notification (when `ADMIN_NOTIFY_EMAIL` is set) and an acknowledgement to
//! the person who submitted the form.

use crate::config::SiteProfile;
use crate::email::OutgoingEmail;
use crate::models::job::JobPosting;
use crate::models::submission::{ContactSubmission, JobApplication};

/// Escapes text for inclusion in an HTML body.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct Body<'a> {
    heading: &'a str,
    intro: String,
    rows: Vec<(&'static str, String)>,
    footer: String,
}

impl Body<'_> {
    fn text(&self) -> String {
        let mut out = format!("{}\n\n{}\n\n", self.heading, self.intro);
        for (label, value) in &self.rows {
            out.push_str(&format!("{label}: {value}\n"));
        }
        out.push('\n');
        out.push_str(&self.footer);
        out
    }

    fn html(&self) -> String {
        let rows: String = self
            .rows
            .iter()
            .map(|(label, value)| {
                format!(
                    "<tr><td style=\"padding:4px 12px 4px 0;font-weight:600;vertical-align:top\">{}</td><td style=\"padding:4px 0;white-space:pre-wrap\">{}</td></tr>",
                    escape_html(label),
                    escape_html(value)
                )
            })
            .collect();
        format!(
            r#"<!DOCTYPE html>
<html>
<body style="font-family:Arial,Helvetica,sans-serif;color:#1f2937;line-height:1.5">
  <div style="max-width:600px;margin:0 auto;padding:24px">
    <h2 style="color:#1e3a8a">{}</h2>
    <p>{}</p>
    <table>{}</table>
    <p style="color:#6b7280;font-size:13px;margin-top:24px">{}</p>
  </div>
</body>
</html>"#,
            escape_html(self.heading),
            escape_html(&self.intro),
            rows,
            escape_html(&self.footer)
        )
    }

    fn into_email(self, to: &str, reply_to: Option<&str>, subject: String) -> OutgoingEmail {
        OutgoingEmail {
            to: to.to_string(),
            reply_to: reply_to.map(str::to_string),
            subject,
            text: self.text(),
            html: self.html(),
        }
    }
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn signature(site: &SiteProfile) -> String {
    if site.phone.is_empty() {
        format!("{} | {}", site.name, site.email)
    } else {
        format!("{} | {} | {}", site.name, site.phone, site.email)
    }
}

pub fn contact_emails(
    site: &SiteProfile,
    admin_notify: Option<&str>,
    contact: &ContactSubmission,
) -> Vec<OutgoingEmail> {
    let mut emails = Vec::with_capacity(2);

    if let Some(admin) = admin_notify {
        let body = Body {
            heading: "New contact form submission",
            intro: format!("{} sent a {} inquiry.", contact.name, contact.inquiry_type),
            rows: vec![
                ("Name", contact.name.clone()),
                ("Email", contact.email.clone()),
                ("Phone", opt(&contact.phone)),
                ("Company", opt(&contact.company)),
                ("Subject", opt(&contact.subject)),
                ("Message", contact.message.clone()),
            ],
            footer: format!("Submission {}", contact.id),
        };
        let subject = format!(
            "[Contact] {}",
            contact.subject.as_deref().unwrap_or(&contact.name)
        );
        emails.push(body.into_email(admin, Some(&contact.email), subject));
    }

    let body = Body {
        heading: "Thanks for reaching out",
        intro: format!(
            "Hi {}, we received your message and a member of our team will get back to you within one business day.",
            contact.name
        ),
        rows: vec![("Your message", contact.message.clone())],
        footer: signature(site),
    };
    emails.push(body.into_email(
        &contact.email,
        None,
        format!("We received your message - {}", site.name),
    ));

    emails
}

pub fn application_emails(
    site: &SiteProfile,
    admin_notify: Option<&str>,
    application: &JobApplication,
) -> Vec<OutgoingEmail> {
    let mut emails = Vec::with_capacity(2);

    if let Some(admin) = admin_notify {
        let body = Body {
            heading: "New job application",
            intro: format!("{} applied for {}.", application.full_name, application.position),
            rows: vec![
                ("Name", application.full_name.clone()),
                ("Email", application.email.clone()),
                ("Phone", opt(&application.phone)),
                ("Position", application.position.clone()),
                (
                    "Experience",
                    application
                        .experience_years
                        .map(|y| format!("{y} years"))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                (
                    "Job posting",
                    application
                        .job_posting_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "general application".to_string()),
                ),
                ("Cover letter", opt(&application.cover_letter)),
            ],
            footer: format!("Application {}", application.id),
        };
        emails.push(body.into_email(
            admin,
            Some(&application.email),
            format!("[Application] {} - {}", application.position, application.full_name),
        ));
    }

    let body = Body {
        heading: "Application received",
        intro: format!(
            "Hi {}, thank you for applying for {}. Our recruiters review every application and will contact you if your profile is a match.",
            application.full_name, application.position
        ),
        rows: vec![("Position", application.position.clone())],
        footer: signature(site),
    };
    emails.push(body.into_email(
        &application.email,
        None,
        format!("Your application for {} - {}", application.position, site.name),
    ));

    emails
}

pub fn job_posting_emails(
    site: &SiteProfile,
    admin_notify: Option<&str>,
    posting: &JobPosting,
) -> Vec<OutgoingEmail> {
    let mut emails = Vec::with_capacity(2);

    if let Some(admin) = admin_notify {
        let body = Body {
            heading: "New job posting request",
            intro: format!("{} submitted a role: {}.", posting.company_name, posting.title),
            rows: vec![
                ("Company", posting.company_name.clone()),
                ("Contact", posting.contact_name.clone()),
                ("Email", posting.contact_email.clone()),
                ("Phone", opt(&posting.contact_phone)),
                ("Title", posting.title.clone()),
                ("Location", posting.location.clone()),
                ("Type", posting.employment_type.clone()),
                ("Salary", opt(&posting.salary_range)),
                ("Description", posting.description.clone()),
                ("Requirements", opt(&posting.requirements)),
            ],
            footer: format!("Job posting {}", posting.id),
        };
        emails.push(body.into_email(
            admin,
            Some(&posting.contact_email),
            format!("[Job posting] {} - {}", posting.title, posting.company_name),
        ));
    }

    let body = Body {
        heading: "We received your job posting",
        intro: format!(
            "Hi {}, thanks for trusting us with your {} opening. An account manager will contact you shortly to confirm the details.",
            posting.contact_name, posting.title
        ),
        rows: vec![
            ("Title", posting.title.clone()),
            ("Location", posting.location.clone()),
        ],
        footer: signature(site),
    };
    emails.push(body.into_email(
        &posting.contact_email,
        None,
        format!("Job posting received - {}", site.name),
    ));

    emails
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn site() -> SiteProfile {
        SiteProfile {
            name: "Example Staffing".into(),
            phone: String::new(),
            email: "hello@example.ca".into(),
            city: "Toronto".into(),
            region: "ON".into(),
            country: "CA".into(),
        }
    }

    fn contact() -> ContactSubmission {
        ContactSubmission {
            id: Uuid::new_v4(),
            name: "Jane <script>".into(),
            email: "jane@example.com".into(),
            phone: None,
            company: Some("Acme".into()),
            subject: Some("Staffing for Q3".into()),
            message: "We need 5 forklift operators.".into(),
            inquiry_type: "employer".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_contact_emails_with_admin() {
        let emails = contact_emails(&site(), Some("ops@example.ca"), &contact());
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].to, "ops@example.ca");
        assert_eq!(emails[0].reply_to.as_deref(), Some("jane@example.com"));
        assert_eq!(emails[0].subject, "[Contact] Staffing for Q3");
        assert_eq!(emails[1].to, "jane@example.com");
    }

    #[test]
    fn test_contact_emails_without_admin_only_acknowledges() {
        let emails = contact_emails(&site(), None, &contact());
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].to, "jane@example.com");
    }

    #[test]
    fn test_user_input_is_escaped_in_html_only() {
        let emails = contact_emails(&site(), Some("ops@example.ca"), &contact());
        assert!(emails[0].html.contains("Jane &lt;script&gt;"));
        assert!(!emails[0].html.contains("<script>"));
        assert!(emails[0].text.contains("Jane <script>"));
    }

    #[test]
    fn test_signature_skips_empty_phone() {
        assert_eq!(signature(&site()), "Example Staffing | hello@example.ca");
    }

    #[test]
    fn test_application_emails_mention_position() {
        let application = JobApplication {
            id: Uuid::new_v4(),
            job_posting_id: None,
            full_name: "Sam Lee".into(),
            email: "sam@example.com".into(),
            phone: None,
            position: "Warehouse Associate".into(),
            experience_years: Some(3),
            cover_letter: None,
            resume_key: None,
            created_at: Utc::now(),
        };
        let emails = application_emails(&site(), Some("ops@example.ca"), &application);
        assert!(emails[0].text.contains("Experience: 3 years"));
        assert!(emails[0].text.contains("general application"));
        assert_eq!(
            emails[1].subject,
            "Your application for Warehouse Associate - Example Staffing"
        );
    }
}
