use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An employer with portal access. Only admins ever see `access_code`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub access_code: String,
    pub created_at: DateTime<Utc>,
}

/// Client record as shown inside the portal.
#[derive(Debug, Clone, Serialize)]
pub struct ClientProfile {
    pub id: Uuid,
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientProfile {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            company_name: client.company_name,
            contact_name: client.contact_name,
            email: client.email,
            created_at: client.created_at,
        }
    }
}
