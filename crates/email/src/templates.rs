//! Email templates.
//!
//! Each template is a pure function from a context struct to an
//! [`EmailMessage`]. Rendering never touches the network or the database,
//! which keeps templates unit-testable and lets the admin preview endpoint
//! render any template against mock data.

use chrono::{DateTime, Utc};

/// A rendered email, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<html><body style=\"font-family: sans-serif; color: #1a1a2e; max-width: 600px; margin: 0 auto;\">\
         <h2 style=\"color: #16213e;\">{title}</h2>\
         {body}\
         <hr style=\"border: none; border-top: 1px solid #ddd; margin-top: 32px;\">\
         <p style=\"color: #888; font-size: 12px;\">HRX Events · This is an automated message, please do not reply.</p>\
         </body></html>"
    )
}

fn button(href: &str, label: &str) -> String {
    format!(
        "<p style=\"margin: 24px 0;\"><a href=\"{href}\" \
         style=\"background: #0f3460; color: #fff; padding: 12px 24px; \
         text-decoration: none; border-radius: 4px;\">{label}</a></p>"
    )
}

fn deadline_line(valid_until: Option<DateTime<Utc>>) -> String {
    match valid_until {
        Some(deadline) => format!(
            "<p><strong>Please respond by {}.</strong></p>",
            deadline.format("%Y-%m-%d %H:%M UTC")
        ),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Quotation flow
// ---------------------------------------------------------------------------

/// Context for the quote request sent to a supplier.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub contact_name: String,
    pub company_name: String,
    pub project_number: String,
    pub event_name: String,
    pub event_date: Option<String>,
    pub venue_city: String,
    pub venue_state: String,
    pub item_summary: String,
    pub quote_url: String,
    pub valid_until: Option<DateTime<Utc>>,
}

pub fn quote_request(ctx: &QuoteRequest) -> EmailMessage {
    let date_line = ctx
        .event_date
        .as_deref()
        .map(|d| format!("<li><strong>Date:</strong> {d}</li>"))
        .unwrap_or_default();
    let body = format!(
        "<p>Hello {contact},</p>\
         <p>{company} has been selected to quote equipment for an upcoming event:</p>\
         <ul>\
         <li><strong>Project:</strong> {number}</li>\
         <li><strong>Event:</strong> {event}</li>\
         {date_line}\
         <li><strong>Location:</strong> {city}, {state}</li>\
         <li><strong>Requested items:</strong> {items}</li>\
         </ul>\
         {deadline}\
         {button}\
         <p>The link above is unique to your company. No login is required.</p>",
        contact = ctx.contact_name,
        company = ctx.company_name,
        number = ctx.project_number,
        event = ctx.event_name,
        city = ctx.venue_city,
        state = ctx.venue_state,
        items = ctx.item_summary,
        deadline = deadline_line(ctx.valid_until),
        button = button(&ctx.quote_url, "Submit your quote"),
    );
    EmailMessage {
        subject: format!("Quote request · {} · {}", ctx.project_number, ctx.event_name),
        html: layout("Equipment quote request", &body),
    }
}

/// Context for the admin notice when a supplier submits pricing.
#[derive(Debug, Clone)]
pub struct QuoteSubmittedAdmin {
    pub company_name: String,
    pub project_number: String,
    pub event_name: String,
    pub total_price: f64,
    pub project_url: String,
}

pub fn quote_submitted_admin(ctx: &QuoteSubmittedAdmin) -> EmailMessage {
    let body = format!(
        "<p>{company} submitted a quote for project {number} ({event}).</p>\
         <p><strong>Quoted total:</strong> R$ {price:.2}</p>\
         {button}",
        company = ctx.company_name,
        number = ctx.project_number,
        event = ctx.event_name,
        price = ctx.total_price,
        button = button(&ctx.project_url, "Review quotes"),
    );
    EmailMessage {
        subject: format!("Quote received · {} · {}", ctx.project_number, ctx.company_name),
        html: layout("New quote submitted", &body),
    }
}

/// Context for the supplier-facing accept/reject decision notices.
#[derive(Debug, Clone)]
pub struct QuoteDecision {
    pub contact_name: String,
    pub company_name: String,
    pub project_number: String,
    pub event_name: String,
}

pub fn quote_accepted(ctx: &QuoteDecision) -> EmailMessage {
    let body = format!(
        "<p>Hello {contact},</p>\
         <p>Good news: your quote for project {number} ({event}) was accepted. \
         Our team will contact {company} shortly to arrange delivery details.</p>",
        contact = ctx.contact_name,
        number = ctx.project_number,
        event = ctx.event_name,
        company = ctx.company_name,
    );
    EmailMessage {
        subject: format!("Quote accepted · {}", ctx.project_number),
        html: layout("Your quote was accepted", &body),
    }
}

pub fn quote_rejected(ctx: &QuoteDecision) -> EmailMessage {
    let body = format!(
        "<p>Hello {contact},</p>\
         <p>Thank you for quoting project {number} ({event}). Another supplier \
         was selected this time. We look forward to working with {company} on \
         future events.</p>",
        contact = ctx.contact_name,
        number = ctx.project_number,
        event = ctx.event_name,
        company = ctx.company_name,
    );
    EmailMessage {
        subject: format!("Quote update · {}", ctx.project_number),
        html: layout("Quote not selected", &body),
    }
}

// ---------------------------------------------------------------------------
// Team invitation flow
// ---------------------------------------------------------------------------

/// Context for the invitation sent to a professional.
#[derive(Debug, Clone)]
pub struct TeamInvitation {
    pub professional_name: String,
    pub role: String,
    pub event_name: String,
    pub event_date: Option<String>,
    pub venue_city: String,
    pub venue_state: String,
    pub daily_rate: f64,
    pub duration_days: i32,
    pub invitation_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

pub fn team_invitation(ctx: &TeamInvitation) -> EmailMessage {
    let date_line = ctx
        .event_date
        .as_deref()
        .map(|d| format!("<li><strong>Date:</strong> {d}</li>"))
        .unwrap_or_default();
    let body = format!(
        "<p>Hello {name},</p>\
         <p>You have been invited to work as <strong>{role}</strong> at:</p>\
         <ul>\
         <li><strong>Event:</strong> {event}</li>\
         {date_line}\
         <li><strong>Location:</strong> {city}, {state}</li>\
         <li><strong>Daily rate:</strong> R$ {rate:.2}</li>\
         <li><strong>Duration:</strong> {days} day(s)</li>\
         </ul>\
         {deadline}\
         {button}\
         <p>Use the link above to confirm or decline. No login is required.</p>",
        name = ctx.professional_name,
        role = ctx.role,
        event = ctx.event_name,
        city = ctx.venue_city,
        state = ctx.venue_state,
        rate = ctx.daily_rate,
        days = ctx.duration_days,
        deadline = deadline_line(ctx.expires_at),
        button = button(&ctx.invitation_url, "Respond to invitation"),
    );
    EmailMessage {
        subject: format!("Work invitation · {} · {}", ctx.role, ctx.event_name),
        html: layout("You have been invited", &body),
    }
}

// ---------------------------------------------------------------------------
// Professional registration flow
// ---------------------------------------------------------------------------

/// Context for registration lifecycle emails to a professional.
#[derive(Debug, Clone)]
pub struct ProfessionalNotice {
    pub full_name: String,
}

pub fn professional_welcome(ctx: &ProfessionalNotice) -> EmailMessage {
    let body = format!(
        "<p>Hello {name},</p>\
         <p>Your registration was received and is under review. We will email \
         you as soon as your profile is approved and ready to receive work \
         invitations.</p>",
        name = ctx.full_name,
    );
    EmailMessage {
        subject: "Registration received".into(),
        html: layout("Welcome to HRX Events", &body),
    }
}

pub fn professional_approved(ctx: &ProfessionalNotice) -> EmailMessage {
    let body = format!(
        "<p>Hello {name},</p>\
         <p>Your profile was approved. You are now part of our professional \
         registry and may receive event invitations by email.</p>",
        name = ctx.full_name,
    );
    EmailMessage {
        subject: "Your profile was approved".into(),
        html: layout("Profile approved", &body),
    }
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// Template names accepted by the admin preview endpoint.
pub const TEMPLATE_NAMES: &[&str] = &[
    "quote_request",
    "quote_submitted_admin",
    "quote_accepted",
    "quote_rejected",
    "team_invitation",
    "professional_welcome",
    "professional_approved",
];

/// Render a template against mock data, for the admin preview screen.
/// Returns `None` for unknown template names.
pub fn preview(template: &str) -> Option<EmailMessage> {
    let decision = QuoteDecision {
        contact_name: "Carlos Mendes".into(),
        company_name: "SomPro Áudio".into(),
        project_number: "EVT-2025-0042".into(),
        event_name: "Tech Summit São Paulo".into(),
    };
    match template {
        "quote_request" => Some(quote_request(&QuoteRequest {
            contact_name: decision.contact_name,
            company_name: decision.company_name,
            project_number: decision.project_number,
            event_name: decision.event_name,
            event_date: Some("2025-11-20".into()),
            venue_city: "São Paulo".into(),
            venue_state: "SP".into(),
            item_summary: "2x line array PA, 1x LED wall 4x3m".into(),
            quote_url: "https://example.com/quotation/preview-token".into(),
            valid_until: Some(Utc::now() + chrono::Duration::days(7)),
        })),
        "quote_submitted_admin" => Some(quote_submitted_admin(&QuoteSubmittedAdmin {
            company_name: decision.company_name,
            project_number: decision.project_number,
            event_name: decision.event_name,
            total_price: 18500.0,
            project_url: "https://example.com/admin/projects/42".into(),
        })),
        "quote_accepted" => Some(quote_accepted(&decision)),
        "quote_rejected" => Some(quote_rejected(&decision)),
        "team_invitation" => Some(team_invitation(&TeamInvitation {
            professional_name: "Ana Souza".into(),
            role: "Sound technician".into(),
            event_name: decision.event_name,
            event_date: Some("2025-11-20".into()),
            venue_city: "São Paulo".into(),
            venue_state: "SP".into(),
            daily_rate: 450.0,
            duration_days: 3,
            invitation_url: "https://example.com/invitation/preview-token".into(),
            expires_at: Some(Utc::now() + chrono::Duration::days(7)),
        })),
        "professional_welcome" => Some(professional_welcome(&ProfessionalNotice {
            full_name: "Ana Souza".into(),
        })),
        "professional_approved" => Some(professional_approved(&ProfessionalNotice {
            full_name: "Ana Souza".into(),
        })),
        _ => None,
    }
}
