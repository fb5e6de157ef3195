//! Message templates.
//!
//! The welcome message is the one place a temporary password ever appears
//! outside the hasher; callers must not log the rendered body.

use crate::notifier::Notification;

/// Inputs for the client welcome message.
#[derive(Debug)]
pub struct WelcomeDetails<'a> {
    pub to: &'a str,
    pub contact_name: &'a str,
    pub username: &'a str,
    pub temporary_password: &'a str,
    pub project_id: &'a str,
    pub portal_url: &'a str,
}

/// Client welcome message with one-time login credentials.
#[must_use]
pub fn welcome(details: &WelcomeDetails<'_>) -> Notification {
    Notification {
        to: details.to.to_string(),
        subject: format!("Welcome to the TrueView Portal - Project {}", details.project_id),
        body: format!(
            "Dear {contact},\n\n\
             Thank you for choosing TrueView for your imaging needs. Your project has\n\
             been set up and you now have access to the client portal.\n\n\
             Portal: {portal}\n\
             Username: {username}\n\
             Temporary password: {password}\n\
             Project ID: {project}\n\n\
             From the portal you can access high-resolution imagery, interactive maps\n\
             and orthomosaics, 3D models, project reports, and video content.\n\n\
             Please change your password after first login.\n",
            contact = details.contact_name,
            portal = details.portal_url,
            username = details.username,
            password = details.temporary_password,
            project = details.project_id,
        ),
    }
}

/// Operator notification for a newly provisioned client.
#[must_use]
pub fn operator_new_client(
    operator_email: &str,
    company_name: &str,
    contact_name: &str,
    client_email: &str,
    project_id: &str,
) -> Notification {
    Notification {
        to: operator_email.to_string(),
        subject: format!("New client: {company_name} - {project_id}"),
        body: format!(
            "A new client account was provisioned.\n\n\
             Company: {company_name}\n\
             Contact: {contact_name}\n\
             Email: {client_email}\n\
             Project ID: {project_id}\n\n\
             Next steps: set up project folders, schedule imaging services,\n\
             prepare the deliverables structure.\n"
        ),
    }
}

/// Client notice that a new deliverable is available.
#[must_use]
pub fn deliverable_ready(
    to: &str,
    contact_name: &str,
    filename: &str,
    kind: &str,
    portal_url: &str,
) -> Notification {
    Notification {
        to: to.to_string(),
        subject: "New deliverable available in your TrueView Portal".to_string(),
        body: format!(
            "Dear {contact_name},\n\n\
             A new deliverable has been added to your project:\n\n\
             File: {filename}\n\
             Type: {kind}\n\n\
             View it in your portal: {portal_url}\n"
        ),
    }
}
