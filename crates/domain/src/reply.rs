use crate::{date::format_record_date, Appointment, AppointmentStatus};

const CONFIRM_KEYWORDS: [&str; 3] = ["CONFIRM", "YES", "CONFIRMED"];
const CANCEL_KEYWORD: &str = "CANCEL";

pub const APPOINTMENT_NOT_FOUND_REPLY: &str =
    "We couldn't find your upcoming appointment. Please call us directly if you need help.";

/// What a customer meant with a text sent in response to a reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyIntent {
    Confirm,
    Cancel,
    /// Anything that is not a keyword is passed on to the business owner
    Message,
}

impl ReplyIntent {
    pub fn classify(body: &str) -> Self {
        let normalized = normalize_reply(body);
        if CONFIRM_KEYWORDS.contains(&normalized.as_str()) {
            Self::Confirm
        } else if normalized.contains(CANCEL_KEYWORD) {
            Self::Cancel
        } else {
            Self::Message
        }
    }

    /// The status the appointment moves to, if any
    pub fn target_status(&self) -> Option<AppointmentStatus> {
        match self {
            Self::Confirm => Some(AppointmentStatus::Confirmed),
            Self::Cancel => Some(AppointmentStatus::Cancelled),
            Self::Message => None,
        }
    }

    /// The text sent back to the customer
    pub fn customer_reply(&self, appointment: &Appointment) -> String {
        match self {
            Self::Confirm => format!(
                "Perfect! Your {} appointment is confirmed for {} at {}. See you then! \u{1F389}",
                appointment.service,
                format_record_date(appointment.date),
                appointment.time
            ),
            Self::Cancel => "No problem! Your appointment has been cancelled. Want to reschedule? Call us or reply with your preferred time and we'll help you book a new slot.".to_string(),
            Self::Message => {
                "Thanks for your message! We'll get back to you shortly about your appointment."
                    .to_string()
            }
        }
    }

    /// The text sent to the business owner
    pub fn owner_notification(
        &self,
        appointment: &Appointment,
        customer_phone: &str,
        body: &str,
    ) -> String {
        let date = format_record_date(appointment.date);
        match self {
            Self::Confirm => format!(
                "\u{2705} {} CONFIRMED their appointment on {} at {}",
                appointment.customer_name, date, appointment.time
            ),
            Self::Cancel => format!(
                "\u{274C} {} CANCELLED their appointment on {} at {}. The slot is free, you can now fill it!",
                appointment.customer_name, date, appointment.time
            ),
            Self::Message => format!(
                "[APPOINTMENT MESSAGE] {}\n\nFrom: {}\nRe: {} on {}\n\nMessage: {}\n\nReply to this thread to respond.",
                appointment.customer_name, customer_phone, appointment.service, date, body
            ),
        }
    }
}

pub fn normalize_reply(body: &str) -> String {
    body.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ID;
    use chrono::NaiveDate;

    fn appointment() -> Appointment {
        Appointment {
            id: ID::new(),
            business_id: None,
            customer_name: "Ada".into(),
            customer_phone: "+15550001111".into(),
            customer_email: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            time: "3:30 PM".into(),
            service: "Haircut".into(),
            status: AppointmentStatus::Scheduled,
            reminders_sent: Default::default(),
            customer_response: None,
            external_event: None,
        }
    }

    #[test]
    fn classifies_confirmations() {
        for body in &["CONFIRM", " yes ", "Confirmed", "confirm\n"] {
            assert_eq!(ReplyIntent::classify(body), ReplyIntent::Confirm, "{}", body);
        }
        // Only exact keywords confirm
        assert_eq!(ReplyIntent::classify("yes please"), ReplyIntent::Message);
    }

    #[test]
    fn classifies_cancellations() {
        for body in &["CANCEL", "cancelled", "I need to cancel, sorry", "Cancellation"] {
            assert_eq!(ReplyIntent::classify(body), ReplyIntent::Cancel, "{}", body);
        }
    }

    #[test]
    fn classifies_free_form_messages() {
        assert_eq!(ReplyIntent::classify("Running 5 min late"), ReplyIntent::Message);
        assert_eq!(ReplyIntent::classify(""), ReplyIntent::Message);
        assert_eq!(ReplyIntent::Message.target_status(), None);
    }

    #[test]
    fn owner_is_told_the_slot_is_free_on_cancel() {
        let msg = ReplyIntent::Cancel.owner_notification(&appointment(), "+1555", "CANCEL");
        assert!(msg.contains("Ada CANCELLED"));
        assert!(msg.contains("slot is free"));
    }

    #[test]
    fn forwarded_messages_carry_context() {
        let msg = ReplyIntent::Message.owner_notification(
            &appointment(),
            "+15550001111",
            "Can I bring my kid?",
        );
        assert!(msg.starts_with("[APPOINTMENT MESSAGE] Ada"));
        assert!(msg.contains("From: +15550001111"));
        assert!(msg.contains("Re: Haircut on 2024-03-15"));
        assert!(msg.contains("Message: Can I bring my kid?"));
    }

    #[test]
    fn confirmation_reply_mentions_appointment() {
        assert_eq!(
            ReplyIntent::Confirm.customer_reply(&appointment()),
            "Perfect! Your Haircut appointment is confirmed for 2024-03-15 at 3:30 PM. See you then! \u{1F389}"
        );
    }
}
