//! Notification service implementation
//!
//! This service formats participant-facing messages from templates, picks the
//! delivery channel from the phone number and hands the result to a
//! [`MessageSender`]. Delivery failures are logged and counted, never
//! propagated to the request that triggered them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::NotificationConfig;
use crate::models::{Event, Participant};
use crate::utils::errors::{GalleryError, Result};

/// Languages with a full template set
pub const SUPPORTED_LANGUAGES: &[&str] = &["pt", "en"];

pub const TEMPLATE_MEDIA_AVAILABLE: &str = "media_available";
pub const TEMPLATE_REGISTRATION_CONFIRMATION: &str = "registration_confirmation";

/// Delivery channel for a participant message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    WhatsApp,
    Sms,
}

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub to: String,
    pub channel: Channel,
    pub body: String,
}

/// Message template structure
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub key: String,
    /// language -> (whatsapp body, sms body)
    pub content: HashMap<String, (String, String)>,
}

/// Transport that actually delivers messages
pub trait MessageSender: Send + Sync {
    fn deliver(&self, message: &OutgoingMessage) -> Result<()>;
}

/// Sender used when no messaging provider is configured: messages are logged
#[derive(Debug, Clone, Default)]
pub struct LogSender;

impl MessageSender for LogSender {
    fn deliver(&self, message: &OutgoingMessage) -> Result<()> {
        info!(
            to = %message.to,
            channel = ?message.channel,
            body = %message.body,
            "Would send participant message"
        );
        Ok(())
    }
}

/// Notification statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationStats {
    pub total_sent: u64,
    pub total_failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    sent: AtomicU64,
    failed: AtomicU64,
}

/// Notification service for participant messages
#[derive(Clone)]
pub struct NotificationService {
    config: NotificationConfig,
    templates: Arc<HashMap<String, MessageTemplate>>,
    sender: Arc<dyn MessageSender>,
    counters: Arc<Counters>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(config: NotificationConfig, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            config,
            templates: Arc::new(Self::load_default_templates()),
            sender,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Channel used to reach a phone number
    pub fn channel_for(&self, phone: &str) -> Channel {
        let prefix = &self.config.whatsapp_prefix;
        if !prefix.is_empty() && phone.starts_with(prefix.as_str()) {
            Channel::WhatsApp
        } else {
            Channel::Sms
        }
    }

    /// Render a template for a channel, substituting `{name}` parameters
    pub fn format_message(
        &self,
        template_key: &str,
        channel: Channel,
        parameters: &HashMap<&str, String>,
    ) -> Result<String> {
        let template = self.templates.get(template_key).ok_or_else(|| {
            GalleryError::Notification(format!("Unknown template: {}", template_key))
        })?;
        let (whatsapp, sms) = template
            .content
            .get(&self.config.language)
            .or_else(|| template.content.get("en"))
            .ok_or_else(|| {
                GalleryError::Notification(format!("Template {} has no content", template_key))
            })?;

        let mut text = match channel {
            Channel::WhatsApp => whatsapp.clone(),
            Channel::Sms => sms.clone(),
        };
        for (key, value) in parameters {
            text = text.replace(&format!("{{{}}}", key), value);
        }

        Ok(text)
    }

    /// Confirmation text returned to a participant right after registering
    pub fn registration_confirmation(&self) -> String {
        self.format_message(TEMPLATE_REGISTRATION_CONFIRMATION, Channel::Sms, &HashMap::new())
            .unwrap_or_default()
    }

    /// Tell a participant that new media of theirs is available
    pub fn send_media_notification(
        &self,
        participant: &Participant,
        event: &Event,
        gallery_url: &str,
    ) {
        if !self.config.enabled {
            debug!(participant_id = %participant.id, "Notifications disabled, skipping");
            return;
        }

        let channel = self.channel_for(&participant.phone);
        let parameters = HashMap::from([
            ("event_name", event.name.clone()),
            ("gallery_url", gallery_url.to_string()),
        ]);

        let result = self
            .format_message(TEMPLATE_MEDIA_AVAILABLE, channel, &parameters)
            .and_then(|body| {
                self.sender.deliver(&OutgoingMessage {
                    to: participant.phone.clone(),
                    channel,
                    body,
                })
            });

        match result {
            Ok(()) => {
                self.counters.sent.fetch_add(1, Ordering::Relaxed);
                debug!(
                    participant_id = %participant.id,
                    channel = ?channel,
                    "Media notification sent"
                );
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    participant_id = %participant.id,
                    error = %e,
                    "Failed to send media notification"
                );
            }
        }
    }

    /// Get notification statistics
    pub fn get_stats(&self) -> NotificationStats {
        NotificationStats {
            total_sent: self.counters.sent.load(Ordering::Relaxed),
            total_failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    fn load_default_templates() -> HashMap<String, MessageTemplate> {
        let mut templates = HashMap::new();

        let mut media_content = HashMap::new();
        media_content.insert(
            "pt".to_string(),
            (
                "🎉 Olá! Encontramos novas fotos/vídeos para você no evento '{event_name}'. \
                 Veja sua galeria completa: {gallery_url}"
                    .to_string(),
                "Olá! Suas fotos e vídeos do evento '{event_name}' estão disponíveis. \
                 Acesse sua galeria: {gallery_url}"
                    .to_string(),
            ),
        );
        media_content.insert(
            "en".to_string(),
            (
                "🎉 Hi! We found new photos/videos of you at '{event_name}'. \
                 See your full gallery: {gallery_url}"
                    .to_string(),
                "Hi! Your photos and videos from '{event_name}' are ready. \
                 Open your gallery: {gallery_url}"
                    .to_string(),
            ),
        );
        templates.insert(
            TEMPLATE_MEDIA_AVAILABLE.to_string(),
            MessageTemplate {
                key: TEMPLATE_MEDIA_AVAILABLE.to_string(),
                content: media_content,
            },
        );

        let mut confirmation_content = HashMap::new();
        let pt = "Perfeito! Cadastro realizado. \
                  Você receberá em minutos seu vídeo ou foto por WhatsApp ou SMS.";
        let en = "All set! You're registered. \
                  Your photos and videos will arrive by WhatsApp or SMS within minutes.";
        confirmation_content.insert("pt".to_string(), (pt.to_string(), pt.to_string()));
        confirmation_content.insert("en".to_string(), (en.to_string(), en.to_string()));
        templates.insert(
            TEMPLATE_REGISTRATION_CONFIRMATION.to_string(),
            MessageTemplate {
                key: TEMPLATE_REGISTRATION_CONFIRMATION.to_string(),
                content: confirmation_content,
            },
        );

        templates
    }
}
