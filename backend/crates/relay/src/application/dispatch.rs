//! Dispatch Use Case
//!
//! Delivers a composed submission to its primary chat and CC recipients
//! on a detached task.

use crate::application::config::RelayConfig;
use crate::application::resolve_destination::ResolveDestinationUseCase;
use crate::domain::repository::{AllowedDomainRepository, FormTokenRepository};
use crate::domain::services::compose::OutboundMessage;
use crate::domain::transport::{MessageTransport, OutgoingMessage};
use crate::domain::value_objects::ChatId;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Everything a delivery needs, detached from the request
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub primary: ChatId,
    pub subject: String,
    pub fields: Vec<(String, String)>,
    /// Raw CC tokens, already truncated
    pub cc_tokens: Vec<String>,
}

/// What happened to one delivery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Chats the message was sent to (primary included)
    pub recipients: Vec<ChatId>,
    pub chunks_sent: usize,
    pub chunks_failed: usize,
    /// CC tokens that did not resolve
    pub cc_skipped: usize,
}

/// Runs deliveries on the tokio runtime, bounded by a semaphore
pub struct Dispatcher<R, T>
where
    R: FormTokenRepository + AllowedDomainRepository + Send + Sync + 'static,
    T: MessageTransport + Send + Sync + 'static,
{
    repo: Arc<R>,
    transport: Arc<T>,
    config: Arc<RelayConfig>,
    permits: Arc<Semaphore>,
}

impl<R, T> Clone for Dispatcher<R, T>
where
    R: FormTokenRepository + AllowedDomainRepository + Send + Sync + 'static,
    T: MessageTransport + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            transport: self.transport.clone(),
            config: self.config.clone(),
            permits: self.permits.clone(),
        }
    }
}

impl<R, T> Dispatcher<R, T>
where
    R: FormTokenRepository + AllowedDomainRepository + Send + Sync + 'static,
    T: MessageTransport + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, transport: Arc<T>, config: Arc<RelayConfig>) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_deliveries.max(1)));
        Self {
            repo,
            transport,
            config,
            permits,
        }
    }

    /// Start a delivery without waiting for it
    ///
    /// The handle is only useful to tests and shutdown code; the HTTP
    /// response never awaits it.
    pub fn spawn(&self, job: DeliveryJob) -> JoinHandle<DeliveryReport> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let Ok(_permit) = dispatcher.permits.clone().acquire_owned().await else {
                tracing::error!("Delivery semaphore closed, dropping submission");
                return DeliveryReport::default();
            };
            dispatcher.run(job).await
        })
    }

    /// Deliver in place: primary first, then each CC recipient
    pub async fn run(&self, job: DeliveryJob) -> DeliveryReport {
        let message = OutboundMessage::compose(&job.subject, &job.fields, self.config.message_limit);
        let mut report = DeliveryReport::default();

        self.send_chunks(job.primary, &message, &mut report).await;

        let resolver = ResolveDestinationUseCase::new(self.repo.clone());
        for cc in job.cc_tokens.iter().take(self.config.cc_max) {
            match resolver.resolve_token(cc).await {
                Ok(Some(token)) => self.send_chunks(token.chat_id, &message, &mut report).await,
                Ok(None) => {
                    tracing::debug!("CC token did not resolve, skipping");
                    report.cc_skipped += 1;
                }
                Err(e) => {
                    e.log();
                    report.cc_skipped += 1;
                }
            }
        }

        tracing::info!(
            chat_id = %job.primary,
            recipients = report.recipients.len(),
            chunks_sent = report.chunks_sent,
            chunks_failed = report.chunks_failed,
            cc_skipped = report.cc_skipped,
            "Submission delivered"
        );

        report
    }

    async fn send_chunks(&self, chat_id: ChatId, message: &OutboundMessage, report: &mut DeliveryReport) {
        report.recipients.push(chat_id);
        for chunk in &message.chunks {
            let outgoing = OutgoingMessage::html(chat_id, chunk.clone());
            match self.transport.send_message(&outgoing).await {
                Ok(()) => report.chunks_sent += 1,
                Err(e) => {
                    tracing::warn!(chat_id = %chat_id, error = %e, "Failed to deliver chunk");
                    report.chunks_failed += 1;
                }
            }
        }
    }
}
