//! Database schema for the portal store.
//!
//! Applied idempotently at startup. The UNIQUE constraint on
//! `clients.email` is load-bearing: it is what makes provisioning's
//! check-then-create race-safe under concurrent webhook redelivery.

use sqlx::PgPool;

use crate::error::StoreError;

/// DDL statements, applied in order.
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS clients (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL,
        company_name TEXT,
        phone TEXT,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'client',
        status TEXT NOT NULL DEFAULT 'active',
        deliverables_access JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        last_login_at TIMESTAMPTZ
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS projects (
        id UUID PRIMARY KEY,
        client_id UUID NOT NULL REFERENCES clients(id),
        name TEXT NOT NULL,
        service_type TEXT,
        package TEXT,
        scheduled_date TEXT,
        total_amount DOUBLE PRECISION,
        details JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS deliverables (
        id UUID PRIMARY KEY,
        project_id UUID NOT NULL REFERENCES projects(id),
        kind TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT 'general',
        storage_ref TEXT NOT NULL,
        filename TEXT NOT NULL,
        file_size BIGINT NOT NULL DEFAULT 0,
        mime_type TEXT NOT NULL DEFAULT 'application/octet-stream',
        uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        download_count BIGINT NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS timeline_events (
        id UUID PRIMARY KEY,
        project_id UUID NOT NULL REFERENCES projects(id),
        event_type TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        occurred_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS access_logs (
        id UUID PRIMARY KEY,
        client_id UUID NOT NULL,
        project_id UUID NOT NULL,
        deliverable_id UUID NOT NULL,
        access_kind TEXT NOT NULL,
        ip_address TEXT,
        user_agent TEXT,
        occurred_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    ",
    r"CREATE INDEX IF NOT EXISTS idx_deliverables_project ON deliverables(project_id)",
    r"CREATE INDEX IF NOT EXISTS idx_timeline_project ON timeline_events(project_id)",
    r"CREATE INDEX IF NOT EXISTS idx_access_logs_deliverable ON access_logs(deliverable_id)",
];

/// Apply the schema. Safe to run on every startup.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if any statement fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("Portal schema applied");
    Ok(())
}
