//! The built-in sample inbox used when no input file is given.

use chrono::{TimeZone, Utc};

use crate::base::types::Email;

/// The six documented sample emails.
pub fn sample_emails() -> Vec<Email> {
    vec![
        Email {
            id: "email-001".to_string(),
            from: "angry.customer@bigcorp.com".to_string(),
            to: "support@ourcompany.com".to_string(),
            subject: "URGENT: Payment system is down, losing money every minute".to_string(),
            body: "Our checkout has been failing for the last two hours. Every payment attempt \
                   returns an error and we are losing orders. We need this fixed immediately or \
                   we will have to consider other providers."
                .to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 9, 15, 0).unwrap(),
        },
        Email {
            id: "email-002".to_string(),
            from: "procurement@enterprise.example".to_string(),
            to: "sales@ourcompany.com".to_string(),
            subject: "Enterprise pricing inquiry for 500 seats".to_string(),
            body: "We are evaluating your product for a company-wide rollout of around 500 users. \
                   Could you share enterprise pricing, volume discounts, and SSO support details? \
                   We would like to make a decision this quarter."
                .to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 10, 2, 0).unwrap(),
        },
        Email {
            id: "email-003".to_string(),
            from: "newsletter@dealblast.example".to_string(),
            to: "info@ourcompany.com".to_string(),
            subject: "🔥 MEGA SALE: 80% off everything, today only!!!".to_string(),
            body: "Don't miss out on the biggest sale of the year! Click here now to claim your \
                   discount. Unsubscribe at any time."
                .to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 10, 30, 0).unwrap(),
        },
        Email {
            id: "email-004".to_string(),
            from: "jane.doe@smallbiz.example".to_string(),
            to: "support@ourcompany.com".to_string(),
            subject: "Can't log in after password reset".to_string(),
            body: "I reset my password yesterday but the new one isn't accepted and the reset \
                   email never arrives anymore. Could you take a look at my account?"
                .to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 11, 45, 0).unwrap(),
        },
        Email {
            id: "email-005".to_string(),
            from: "people-team@ourcompany.com".to_string(),
            to: "all-hands@ourcompany.com".to_string(),
            subject: "Reminder: summer offsite signup closes Friday".to_string(),
            body: "A quick reminder that signups for the summer offsite close this Friday. \
                   Please fill in the dietary and travel form if you haven't yet."
                .to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 13, 20, 0).unwrap(),
        },
        Email {
            id: "email-006".to_string(),
            from: "talent@recruitco.example".to_string(),
            to: "hr@ourcompany.com".to_string(),
            subject: "Candidate introduction: senior backend engineer".to_string(),
            body: "I'm reaching out on behalf of a senior backend engineer with eight years of \
                   experience who is interested in your open platform role. Happy to share their \
                   profile and set up an intro call."
                .to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 14, 5, 0).unwrap(),
        },
    ]
}
