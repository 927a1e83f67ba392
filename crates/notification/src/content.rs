use serde_json::json;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    AdminEventKind, Mail, ReminderType,
    repository::{EventRow, Recipient},
};

fn format_date(timestamp: i64) -> String {
    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()
        .and_then(|date| date.format(&Rfc3339).ok())
        .unwrap_or_else(|| timestamp.to_string())
}

pub(crate) fn email_verification(recipient: &Recipient, token: &str, base_url: &str) -> Mail {
    let url = format!("{}/auth/verify/{token}", base_url.trim_end_matches('/'));

    Mail {
        to: recipient.email.to_owned(),
        template: "email_verification".to_owned(),
        subject: "Verify your email address".to_owned(),
        data: json!({ "name": recipient.name, "url": url }),
        body: format!(
            "Hello {},\n\nPlease confirm your email address by opening the link below:\n\n{url}\n",
            recipient.name
        ),
    }
}

pub(crate) fn registration_confirmation(
    recipient: &Recipient,
    event: &EventRow,
    poster_url: Option<String>,
) -> Mail {
    let starts = format_date(event.start_date);
    let mut body = format!(
        "Hello {},\n\nYou are registered for \"{}\".\n\nWhen: {starts}\nWhere: {}\n",
        recipient.name, event.title, event.location
    );

    if let Some(url) = &poster_url {
        body.push_str(&format!("Poster: {url}\n"));
    }

    Mail {
        to: recipient.email.to_owned(),
        template: "event_registration_confirmation".to_owned(),
        subject: format!("Registration confirmed: {}", event.title),
        data: json!({
            "name": recipient.name,
            "event_id": event.id,
            "title": event.title,
            "location": event.location,
            "start_date": starts,
            "poster_url": poster_url,
        }),
        body,
    }
}

pub(crate) fn event_reminder(recipient: &Recipient, event: &EventRow, reminder: ReminderType) -> Mail {
    let starts = format_date(event.start_date);
    let when = match reminder {
        ReminderType::Day => "tomorrow",
        ReminderType::Hour => "in one hour",
    };

    Mail {
        to: recipient.email.to_owned(),
        template: "event_reminder".to_owned(),
        subject: format!("Reminder: {} starts {when}", event.title),
        data: json!({
            "name": recipient.name,
            "event_id": event.id,
            "title": event.title,
            "location": event.location,
            "start_date": starts,
            "reminder": reminder,
        }),
        body: format!(
            "Hello {},\n\n\"{}\" starts {when} ({starts}) at {}.\n",
            recipient.name, event.title, event.location
        ),
    }
}

pub(crate) fn admin_event(
    admin: &Recipient,
    event: &EventRow,
    variant: AdminEventKind,
    user: Option<&Recipient>,
) -> Mail {
    let subject = match variant {
        AdminEventKind::NewEvent => format!("New event: {}", event.title),
        AdminEventKind::NewRegistration => format!("New registration: {}", event.title),
        AdminEventKind::EventCancelled => format!("Event cancelled: {}", event.title),
    };

    let mut body = format!("Hello {},\n\n{subject}\nEvent id: {}\n", admin.name, event.id);
    if let Some(user) = user {
        body.push_str(&format!("User: {} <{}>\n", user.name, user.email));
    }

    Mail {
        to: admin.email.to_owned(),
        template: "admin_event_notification".to_owned(),
        subject,
        data: json!({
            "event_id": event.id,
            "title": event.title,
            "variant": variant,
            "user_id": user.map(|u| u.id.to_owned()),
        }),
        body,
    }
}
