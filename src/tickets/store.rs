use chrono::{DateTime, Local, Timelike};
use rand::Rng;
use tokio::sync::RwLock;

use super::error::TicketsError;
use super::{Ticket, TicketStatus};
use crate::classifier::Classification;

/// In-memory ticket collection, owned by the application state and alive for
/// one server session. Tickets are kept in creation order and are never
/// deleted; the only mutation is an in-place status overwrite.
#[derive(Debug, Default)]
pub struct TicketStore {
    tickets: RwLock<Vec<Ticket>>,
}

/// Identifiers are drawn from TKT-10000..=TKT-99999. Uniqueness is only by
/// convention within one session, enforced here by re-drawing on collision.
fn draw_ticket_id(taken: &[Ticket]) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let id = format!("TKT-{}", rng.gen_range(10000..=99999));
        if !taken.iter().any(|t| t.id == id) {
            return id;
        }
    }
}

fn minute_precision(now: DateTime<Local>) -> DateTime<Local> {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new ticket with a fresh identifier, the current local time
    /// at minute precision, and status Open. Category, priority and reason
    /// come verbatim from the classifier and are never recomputed.
    pub async fn create(
        &self,
        classification: Classification,
        latitude: f64,
        longitude: f64,
    ) -> Ticket {
        let mut tickets = self.tickets.write().await;
        let ticket = Ticket {
            id: draw_ticket_id(&tickets),
            reported_at: minute_precision(Local::now()),
            category: classification.category,
            priority: classification.priority,
            reason: classification.reason,
            latitude,
            longitude,
            status: TicketStatus::Open,
        };
        tickets.push(ticket.clone());
        ticket
    }

    /// All tickets in creation order.
    pub async fn list(&self) -> Vec<Ticket> {
        self.tickets.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Ticket> {
        self.tickets.read().await.iter().find(|t| t.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }

    /// Overwrites the status of the matching ticket in place. Unknown ids
    /// leave the store untouched and surface as an explicit error.
    pub async fn update_status(
        &self,
        id: &str,
        status: TicketStatus,
    ) -> Result<Ticket, TicketsError> {
        let mut tickets = self.tickets.write().await;
        match tickets.iter_mut().find(|t| t.id == id) {
            Some(ticket) => {
                ticket.status = status;
                Ok(ticket.clone())
            }
            None => Err(TicketsError::NotFound(id.to_string())),
        }
    }
}
