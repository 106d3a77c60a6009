//! Submit Form Use Case

use crate::application::config::RelayConfig;
use crate::application::dispatch::{DeliveryJob, DeliveryReport, Dispatcher};
use crate::application::resolve_destination::ResolveDestinationUseCase;
use crate::domain::repository::{AllowedDomainRepository, FormTokenRepository};
use crate::domain::services::normalize::{SubmissionDirectives, normalize};
use crate::domain::transport::MessageTransport;
use crate::error::{RelayError, RelayResult};
use captcha::CaptchaVerifier;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Submit form input
pub struct SubmitFormInput {
    /// Token from the request path
    pub token: String,
    /// Hostname of the submitting page, if the browser sent one
    pub origin_host: Option<String>,
    /// Decoded form pairs; `None` when the body could not be decoded
    pub fields: Option<Vec<(String, String)>>,
}

/// Submit form output
pub struct SubmitFormOutput {
    /// `_next` target to redirect the browser to
    pub redirect: Option<String>,
    /// Detached delivery
    pub delivery: JoinHandle<DeliveryReport>,
}

/// Submit Form Use Case
pub struct SubmitFormUseCase<R, T>
where
    R: FormTokenRepository + AllowedDomainRepository + Send + Sync + 'static,
    T: MessageTransport + Send + Sync + 'static,
{
    repo: Arc<R>,
    dispatcher: Dispatcher<R, T>,
    verifier: CaptchaVerifier,
    config: Arc<RelayConfig>,
}

impl<R, T> SubmitFormUseCase<R, T>
where
    R: FormTokenRepository + AllowedDomainRepository + Send + Sync + 'static,
    T: MessageTransport + Send + Sync + 'static,
{
    pub fn new(
        repo: Arc<R>,
        dispatcher: Dispatcher<R, T>,
        verifier: CaptchaVerifier,
        config: Arc<RelayConfig>,
    ) -> Self {
        Self {
            repo,
            dispatcher,
            verifier,
            config,
        }
    }

    /// Authorize, normalize and captcha-check a submission, then hand it to
    /// the dispatcher. Returns as soon as the delivery task is spawned.
    pub async fn execute(&self, input: SubmitFormInput) -> RelayResult<SubmitFormOutput> {
        let token = ResolveDestinationUseCase::new(self.repo.clone())
            .resolve(&input.token, input.origin_host.as_deref())
            .await?;

        let raw = input
            .fields
            .ok_or_else(|| RelayError::MalformedSubmission("undecodable form body".into()))?;
        let submission = normalize(raw, self.config.cc_max);

        self.check_captcha(&submission.directives)?;

        let SubmissionDirectives {
            redirect,
            subject,
            cc,
            ..
        } = submission.directives;

        let job = DeliveryJob {
            primary: token.chat_id,
            subject: subject.unwrap_or_else(|| self.config.default_subject.clone()),
            fields: submission.fields,
            cc_tokens: cc,
        };

        tracing::info!(
            form_token = %token.id,
            fields = job.fields.len(),
            cc = job.cc_tokens.len(),
            redirect = redirect.is_some(),
            "Form submission accepted"
        );

        let delivery = self.dispatcher.spawn(job);

        Ok(SubmitFormOutput { redirect, delivery })
    }

    fn check_captcha(&self, directives: &SubmissionDirectives) -> RelayResult<()> {
        match directives.captcha.as_deref() {
            Some("") => Err(RelayError::MalformedSubmission(
                "empty captcha field".into(),
            )),
            Some(proof) => {
                if self.verifier.verify(proof) {
                    Ok(())
                } else {
                    Err(RelayError::CaptchaInvalid)
                }
            }
            None if self.config.require_captcha => Err(RelayError::CaptchaInvalid),
            None => Ok(()),
        }
    }
}
