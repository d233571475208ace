use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Oldest entries are dropped once the mailbox holds this many.
pub const MAILBOX_CAPACITY: usize = 50;

/// A doctor-to-reception message. Process-lifetime only: nothing here touches
/// the database, and a restart empties the mailbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notificacion {
    pub id: i64,
    pub doctor_id: i64,
    pub doctor_nombre: String,
    pub consultorio: Option<String>,
    pub mensaje: String,
    pub tipo: String,
    pub timestamp: DateTime<Utc>,
    pub leida: bool,
}

#[derive(Debug, Default)]
struct MailboxInner {
    next_id: i64,
    entries: VecDeque<Notificacion>,
}

/// Bounded in-memory mailbox, injected through AppState so the HTTP surface
/// never reaches for a global.
#[derive(Debug, Default)]
pub struct NotificationMailbox {
    inner: RwLock<MailboxInner>,
}

impl NotificationMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(
        &self,
        doctor_id: i64,
        doctor_nombre: String,
        consultorio: Option<String>,
        mensaje: String,
        tipo: String,
    ) -> Notificacion {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let notificacion = Notificacion {
            id: inner.next_id,
            doctor_id,
            doctor_nombre,
            consultorio,
            mensaje,
            tipo,
            timestamp: Utc::now(),
            leida: false,
        };
        inner.entries.push_back(notificacion.clone());
        while inner.entries.len() > MAILBOX_CAPACITY {
            inner.entries.pop_front();
        }
        notificacion
    }

    /// Newest first; `unread_only` filters out already-read entries.
    pub async fn list(&self, unread_only: bool) -> Vec<Notificacion> {
        let inner = self.inner.read().await;
        inner
            .entries
            .iter()
            .rev()
            .filter(|n| !unread_only || !n.leida)
            .cloned()
            .collect()
    }

    pub async fn mark_read(&self, id: i64) -> bool {
        let mut inner = self.inner.write().await;
        match inner.entries.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.leida = true;
                true
            }
            None => false,
        }
    }

    pub async fn mark_all_read(&self) -> usize {
        let mut inner = self.inner.write().await;
        let mut marked = 0;
        for n in inner.entries.iter_mut().filter(|n| !n.leida) {
            n.leida = true;
            marked += 1;
        }
        marked
    }

    pub async fn unread_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.entries.iter().filter(|n| !n.leida).count()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn capacity_drops_oldest() {
        let mailbox = NotificationMailbox::new();
        for i in 0..(MAILBOX_CAPACITY + 1) {
            mailbox
                .publish(1, "Dra. Rivas".into(), None, format!("mensaje {i}"), "AVISO".into())
                .await;
        }
        assert_eq!(mailbox.len().await, MAILBOX_CAPACITY);
        let entries = mailbox.list(false).await;
        // The very first message is gone, the newest is at the front.
        assert_eq!(entries.first().unwrap().mensaje, format!("mensaje {}", MAILBOX_CAPACITY));
        assert!(entries.iter().all(|n| n.mensaje != "mensaje 0"));
    }

    #[tokio::test]
    async fn mark_read_and_counts() {
        let mailbox = NotificationMailbox::new();
        let a = mailbox
            .publish(1, "Dra. Rivas".into(), Some("Consultorio 1".into()), "ayuda".into(), "URGENTE".into())
            .await;
        mailbox
            .publish(2, "Dr. Peña".into(), None, "insumos".into(), "AVISO".into())
            .await;

        assert_eq!(mailbox.unread_count().await, 2);
        assert!(mailbox.mark_read(a.id).await);
        assert!(!mailbox.mark_read(9999).await);
        assert_eq!(mailbox.unread_count().await, 1);
        assert_eq!(mailbox.list(true).await.len(), 1);
        assert_eq!(mailbox.mark_all_read().await, 1);
        assert_eq!(mailbox.unread_count().await, 0);
    }
}
