//! Email templates keyed by application status.

use super::ApplicationStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub subject: String,
    pub html: String,
}

/// Builds a message for a candidate name and the raw status string.
pub type TemplateBuilder = fn(name: &str, status: &str) -> RenderedTemplate;

/// One builder per status variant plus the default used for anything else.
#[derive(Clone, Copy)]
pub struct TemplateBook {
    pub accepted: TemplateBuilder,
    pub rejected: TemplateBuilder,
    pub in_progress: TemplateBuilder,
    pub default: TemplateBuilder,
}

impl TemplateBook {
    pub fn standard() -> Self {
        Self {
            accepted: shortlisted,
            rejected: rejection,
            in_progress,
            default: status_update,
        }
    }

    pub fn builder_for(&self, status: &ApplicationStatus) -> TemplateBuilder {
        match status {
            ApplicationStatus::Accepted => self.accepted,
            ApplicationStatus::Rejected => self.rejected,
            ApplicationStatus::InProgress => self.in_progress,
            ApplicationStatus::Other(_) => self.default,
        }
    }

    pub fn render(&self, name: &str, status: &str) -> RenderedTemplate {
        let builder = self.builder_for(&ApplicationStatus::parse(status));
        builder(name, status)
    }
}

impl Default for TemplateBook {
    fn default() -> Self {
        Self::standard()
    }
}

fn shortlisted(name: &str, _status: &str) -> RenderedTemplate {
    RenderedTemplate {
        subject: "Congratulations! You have been shortlisted".to_string(),
        html: format!(
            "<p>Dear {},</p>\
             <p>We are pleased to inform you that you have been <strong>shortlisted</strong>. \
             Our team will contact you shortly with the next steps.</p>\
             <p>Best regards,<br/>The Recruitment Team</p>",
            escape_html(name)
        ),
    }
}

fn rejection(name: &str, _status: &str) -> RenderedTemplate {
    RenderedTemplate {
        subject: "Update on your application".to_string(),
        html: format!(
            "<p>Dear {},</p>\
             <p>Thank you for your interest. After careful review we regret to inform you \
             that your application was not selected.</p>\
             <p>Best regards,<br/>The Recruitment Team</p>",
            escape_html(name)
        ),
    }
}

fn in_progress(name: &str, _status: &str) -> RenderedTemplate {
    RenderedTemplate {
        subject: "Your application is in progress".to_string(),
        html: format!(
            "<p>Dear {},</p>\
             <p>We have received your application and it is currently being reviewed. \
             We will get back to you once verification is complete.</p>\
             <p>Best regards,<br/>The Recruitment Team</p>",
            escape_html(name)
        ),
    }
}

fn status_update(name: &str, status: &str) -> RenderedTemplate {
    RenderedTemplate {
        subject: "Application status update".to_string(),
        html: format!(
            "<p>Dear {},</p>\
             <p>The status of your application is now: <strong>{}</strong>.</p>\
             <p>Best regards,<br/>The Recruitment Team</p>",
            escape_html(name),
            escape_html(status)
        ),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_uses_the_shortlisted_template() {
        let t = TemplateBook::standard().render("Ann", "accepted");
        assert!(t.subject.contains("shortlisted"));
        assert!(t.html.contains("Dear Ann"));
    }

    #[test]
    fn rejected_uses_the_rejection_template() {
        let t = TemplateBook::standard().render("Ann", "rejected");
        assert_eq!(t.subject, "Update on your application");
        assert!(t.html.contains("not selected"));
    }

    #[test]
    fn saved_and_in_progress_share_a_template() {
        let book = TemplateBook::standard();
        assert_eq!(book.render("Ann", "saved"), book.render("Ann", "in progress"));
    }

    #[test]
    fn unknown_status_falls_back_to_default() {
        let t = TemplateBook::standard().render("Ann", "on hold");
        assert_eq!(t.subject, "Application status update");
        assert!(t.html.contains("on hold"));
    }

    #[test]
    fn names_are_escaped() {
        let t = TemplateBook::standard().render("<script>", "accepted");
        assert!(!t.html.contains("<script>"));
        assert!(t.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn builders_can_be_swapped() {
        fn custom(_: &str, _: &str) -> RenderedTemplate {
            RenderedTemplate {
                subject: "custom".to_string(),
                html: String::new(),
            }
        }
        let book = TemplateBook {
            rejected: custom,
            ..TemplateBook::standard()
        };
        assert_eq!(book.render("x", "rejected").subject, "custom");
        assert_ne!(book.render("x", "accepted").subject, "custom");
    }
}
