use std::fmt::Write;

use crate::config::Organization;
use crate::contact::Submission;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const NOT_PROVIDED: &str = "(not provided)";

fn section(out: &mut String, label: &str, value: &str) {
    let _ = write!(out, "[{label}]\n{value}\n\n");
}

fn heading(out: &mut String, title: &str) {
    let _ = write!(out, "{RULE}\n■ {title}\n{RULE}\n\n");
}

/// Operator notification for a new submission.
pub fn render_notification(submission: &Submission, org: &Organization) -> String {
    let mut out = format!(
        "A new message was received from the {} contact form.\n\n",
        org.name
    );

    heading(&mut out, "Inquiry");
    section(&mut out, "Received", &submission.received_at_display());
    section(&mut out, "Name", &submission.name);
    section(&mut out, "Phone", &submission.phone);
    section(
        &mut out,
        "Email",
        submission.email.as_deref().unwrap_or(NOT_PROVIDED),
    );
    section(&mut out, "Current situation", &submission.situation);
    section(&mut out, "Message", &submission.message);

    let _ = write!(
        out,
        "{RULE}\nThis message was sent automatically by the contact form.\n{RULE}\n"
    );
    out
}

/// Acknowledgement sent back to the submitter. Never restates the email address.
pub fn render_auto_reply(submission: &Submission, org: &Organization) -> String {
    let mut out = format!(
        "Dear {},\n\n\
         Thank you for contacting {}.\n\
         We have received your inquiry with the following details.\n\n",
        submission.name, org.name
    );

    heading(&mut out, "Your inquiry");
    section(&mut out, "Name", &submission.name);
    section(&mut out, "Phone", &submission.phone);
    section(&mut out, "Current situation", &submission.situation);
    section(&mut out, "Message", &submission.message);

    let _ = write!(
        out,
        "{RULE}\n\nA member of our staff will contact you within {}.\nThank you for your patience.\n",
        org.reply_within
    );
    if !org.phone.is_empty() {
        let _ = write!(
            out,
            "\nIf your matter is urgent, please call us at {}.\n",
            org.phone
        );
    }

    let _ = write!(out, "\n{RULE}\n{}\n", org.name);
    for line in &org.address {
        let _ = writeln!(out, "{line}");
    }
    if !org.phone.is_empty() {
        let _ = writeln!(out, "TEL: {}", org.phone);
    }
    let _ = write!(
        out,
        "{RULE}\n\n\
         This message was sent automatically from a no-reply address.\n\
         Replies to this message will not be read.\n"
    );
    out
}

/// Fallback notice sent to the operator when the notification itself could not be delivered.
pub fn render_error_notice(submission: &Submission, error: &str) -> String {
    let mut out = String::from(
        "An error occurred while sending contact form email.\n\
         Please check the submission log or follow up with the submitter directly.\n\n",
    );
    section(&mut out, "Received", &submission.received_at_display());
    section(&mut out, "Name", &submission.name);
    section(&mut out, "Phone", &submission.phone);
    section(&mut out, "Error", error);
    out
}
