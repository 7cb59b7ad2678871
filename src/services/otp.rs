// src/services/otp.rs
// DOCUMENTATION: One-time password generation and expiry messages

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Six random digits, zero-padded
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", code)
}

pub fn otp_expiry(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(minutes)
}

/// Message returned when an unexpired OTP already exists
pub fn pending_otp_message(expiry: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = (expiry - now).num_seconds().max(0);
    if remaining >= 60 {
        let minutes = (remaining + 59) / 60;
        format!(
            "OTP already sent. Please wait {} minute{} before requesting a new one.",
            minutes,
            if minutes == 1 { "" } else { "s" }
        )
    } else {
        format!(
            "OTP already sent. Please wait {} second{} before requesting a new one.",
            remaining,
            if remaining == 1 { "" } else { "s" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_expiry_offset() {
        let now = Utc::now();
        assert_eq!(otp_expiry(now, 10) - now, Duration::minutes(10));
    }

    #[test]
    fn test_pending_message_units() {
        let now = Utc::now();
        assert_eq!(
            pending_otp_message(now + Duration::seconds(300), now),
            "OTP already sent. Please wait 5 minutes before requesting a new one."
        );
        assert_eq!(
            pending_otp_message(now + Duration::seconds(61), now),
            "OTP already sent. Please wait 2 minutes before requesting a new one."
        );
        assert_eq!(
            pending_otp_message(now + Duration::seconds(60), now),
            "OTP already sent. Please wait 1 minute before requesting a new one."
        );
        assert_eq!(
            pending_otp_message(now + Duration::seconds(1), now),
            "OTP already sent. Please wait 1 second before requesting a new one."
        );
        assert_eq!(
            pending_otp_message(now + Duration::seconds(45), now),
            "OTP already sent. Please wait 45 seconds before requesting a new one."
        );
    }
}
