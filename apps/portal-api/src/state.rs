//! Service assembly.
//!
//! All collaborators are constructor-injected capabilities behind trait
//! objects, so tests substitute fakes and this module is the only place
//! that knows the concrete production wiring.

use std::sync::Arc;

use sqlx::PgPool;
use trueview_api::{
    AccessService, AdminService, PortalState, SessionConfig, SessionService, WebhookSecret,
};
use trueview_db::{PgStore, PortalStore};
use trueview_media::{CloudinaryConfig, CloudinaryStorage, MediaStorage};
use trueview_notify::{MockNotifier, Notifier, SmtpConfig, SmtpNotifier};
use trueview_provisioning::{ProvisioningConfig, ProvisioningService};

use crate::config::Config;

/// Build the portal state from configuration and a connected pool.
///
/// # Errors
///
/// Returns a message suitable for fail-fast startup when a collaborator
/// cannot be constructed.
pub fn build_state(config: &Config, pool: PgPool) -> Result<PortalState, String> {
    let store: Arc<dyn PortalStore> = Arc::new(PgStore::new(pool));

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => Arc::new(
            SmtpNotifier::new(&SmtpConfig {
                host: smtp.host.clone(),
                port: smtp.port,
                username: smtp.username.clone(),
                password: smtp.password.clone(),
                from: smtp.from.clone(),
                timeout: config.notify_timeout,
            })
            .map_err(|e| format!("SMTP configuration error: {e}"))?,
        ),
        None => {
            tracing::warn!("SMTP not configured; notifications will be recorded, not sent");
            Arc::new(MockNotifier::new())
        }
    };

    let media: Arc<dyn MediaStorage> = Arc::new(CloudinaryStorage::new(CloudinaryConfig {
        cloud_name: config.cloudinary.cloud_name.clone(),
        api_key: config.cloudinary.api_key.clone(),
        api_secret: config.cloudinary.api_secret.clone(),
    }));

    let session_service = Arc::new(SessionService::new(
        store.clone(),
        SessionConfig {
            signing_secret: config.session_secret.clone().into_bytes(),
            admin_username: config.admin_username.clone(),
            admin_password_hash: config.admin_password_hash.clone(),
        },
    ));
    let access_service = Arc::new(AccessService::new(store.clone(), media));
    let admin_service = Arc::new(AdminService::new(store.clone()));
    let provisioning = Arc::new(ProvisioningService::new(
        store.clone(),
        notifier,
        ProvisioningConfig {
            activation_policy: config.activation_policy,
            portal_url: config.portal_url.clone(),
            operator_email: config.operator_email.clone(),
            notify_timeout: config.notify_timeout,
        },
    ));

    Ok(PortalState {
        store,
        session_service,
        access_service,
        admin_service,
        provisioning,
        webhook_secret: WebhookSecret::new(config.webhook_secret.as_bytes().to_vec()),
    })
}
