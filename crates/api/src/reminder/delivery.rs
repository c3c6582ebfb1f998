use notely_domain::{Channel, EffectiveChannels, NotificationContent, UserContact};
use notely_infra::{EmailMessage, Providers, SmsMessage};
use tracing::debug;

/// Attempts delivery on every resolved channel and returns the channels
/// that actually went out, in attempt order.
///
/// Channels fail independently. A rejected email never stops the SMS
/// attempt, and a channel that cannot be attempted because contact details
/// are missing is simply left out of the result.
pub async fn deliver(
    content: &NotificationContent,
    effective: &EffectiveChannels,
    contact: &UserContact,
    providers: &Providers,
) -> Vec<Channel> {
    let mut delivered = Vec::with_capacity(effective.channels.len());

    for channel in &effective.channels {
        let sent = match channel {
            // Marking the reminder as fired is what surfaces it in the
            // in-app overdue list, so there is nothing to call out to.
            Channel::Push => true,
            Channel::Email => match contact.email.as_deref().filter(|email| !email.is_empty()) {
                Some(to) => {
                    providers
                        .email
                        .send(&EmailMessage {
                            to: to.to_string(),
                            subject: content.subject.clone(),
                            html: content.html.clone(),
                        })
                        .await
                }
                None => {
                    debug!("Skipping email channel, owner has no email address");
                    false
                }
            },
            Channel::Sms => match &effective.sms_to {
                Some(to) => {
                    providers
                        .sms
                        .send(&SmsMessage {
                            to: to.clone(),
                            body: content.sms_body.clone(),
                        })
                        .await
                }
                None => {
                    debug!("Skipping sms channel, no phone number resolvable for owner");
                    false
                }
            },
        };
        if sent {
            delivered.push(*channel);
        }
    }

    delivered
}
