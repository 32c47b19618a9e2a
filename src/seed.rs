//! Sample records loaded into in-memory stores in mock mode.

use chrono::{NaiveDate, NaiveTime};

use crate::models::{
    Call, CallDirection, CallOutcome, FollowUp, FollowUpStatus, FollowUpType, Lead, LeadStatus,
    Priority, User, UserStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn lead(
    id: u32,
    company: &str,
    contact: &str,
    email: &str,
    phone: &str,
    status: LeadStatus,
    priority: Priority,
    assignee: &str,
    created: NaiveDate,
    last_contact: NaiveDate,
    next_follow_up: Option<NaiveDate>,
    notes: &str,
) -> Lead {
    Lead {
        id,
        company_name: company.to_string(),
        contact_person: contact.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        status,
        priority,
        assignee: assignee.to_string(),
        created_date: created,
        last_contact,
        next_follow_up,
        notes: notes.to_string(),
    }
}

pub fn leads() -> Vec<Lead> {
    vec![
        lead(
            1,
            "Acme Corp",
            "John Smith",
            "john@acmecorp.com",
            "+91 99887 66554",
            LeadStatus::Proposal,
            Priority::High,
            "Rahul Sharma",
            date(2024, 1, 10),
            date(2024, 1, 16),
            Some(date(2024, 1, 18)),
            "Interested in custom CRM development",
        ),
        lead(
            2,
            "Tech Solutions",
            "Sarah Johnson",
            "sarah@techsolutions.in",
            "+91 88776 55443",
            LeadStatus::Contacted,
            Priority::Medium,
            "Priya Patel",
            date(2024, 1, 12),
            date(2024, 1, 17),
            Some(date(2024, 1, 19)),
            "Comparing service tiers",
        ),
        lead(
            3,
            "Digital Dynamics",
            "Mike Wilson",
            "mike@digitaldynamics.com",
            "+91 77665 44332",
            LeadStatus::Qualified,
            Priority::High,
            "Amit Kumar",
            date(2024, 1, 8),
            date(2024, 1, 17),
            None,
            "Demo went well, contract phase next",
        ),
        lead(
            4,
            "Global Retail",
            "Emily Davis",
            "emily@globalretail.com",
            "+91 66554 33221",
            LeadStatus::New,
            Priority::Low,
            "Sneha Singh",
            date(2024, 1, 15),
            date(2024, 1, 15),
            Some(date(2024, 1, 22)),
            "Inbound enquiry from website",
        ),
        lead(
            5,
            "Nimbus Cloud Services",
            "Arjun Mehta",
            "arjun@nimbuscloud.io",
            "+91 55443 22110",
            LeadStatus::Won,
            Priority::Medium,
            "Amit Kumar",
            date(2023, 12, 20),
            date(2024, 1, 5),
            None,
            "Signed annual support contract",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn user(
    id: u32,
    name: &str,
    email: &str,
    phone: &str,
    role: &str,
    joined: NaiveDate,
    assigned: u32,
    converted: u32,
) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        role: role.to_string(),
        department: "Sales".to_string(),
        status: UserStatus::Active,
        join_date: joined,
        leads_assigned: assigned,
        leads_converted: converted,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(
            1,
            "Rahul Sharma",
            "rahul@company.com",
            "+91 98765 43210",
            "Senior Sales Executive",
            date(2023, 6, 15),
            25,
            8,
        ),
        user(
            2,
            "Priya Patel",
            "priya@company.com",
            "+91 87654 32109",
            "Sales Executive",
            date(2023, 8, 20),
            18,
            5,
        ),
        user(
            3,
            "Amit Kumar",
            "amit@company.com",
            "+91 76543 21098",
            "Team Lead",
            date(2023, 3, 10),
            32,
            12,
        ),
        user(
            4,
            "Sneha Singh",
            "sneha@company.com",
            "+91 65432 10987",
            "Sales Executive",
            date(2023, 9, 5),
            15,
            3,
        ),
    ]
}

pub fn follow_ups() -> Vec<FollowUp> {
    vec![
        FollowUp {
            id: 1,
            lead_id: Some(1),
            lead_name: "Acme Corp".into(),
            assignee: "Rahul Sharma".into(),
            kind: FollowUpType::Call,
            priority: Priority::High,
            status: FollowUpStatus::Pending,
            scheduled_date: date(2024, 1, 18),
            scheduled_time: time(10, 0),
            description: "Follow-up call to discuss proposal feedback".into(),
            notes: "Client requested custom pricing options".into(),
            created_date: date(2024, 1, 16),
            completed_date: None,
        },
        FollowUp {
            id: 2,
            lead_id: Some(2),
            lead_name: "Tech Solutions".into(),
            assignee: "Priya Patel".into(),
            kind: FollowUpType::Email,
            priority: Priority::Medium,
            status: FollowUpStatus::Pending,
            scheduled_date: date(2024, 1, 19),
            scheduled_time: time(14, 0),
            description: "Send detailed service comparison document".into(),
            notes: "Include pricing for different service tiers".into(),
            created_date: date(2024, 1, 17),
            completed_date: None,
        },
        FollowUp {
            id: 3,
            lead_id: Some(3),
            lead_name: "Digital Dynamics".into(),
            assignee: "Amit Kumar".into(),
            kind: FollowUpType::Meeting,
            priority: Priority::High,
            status: FollowUpStatus::Completed,
            scheduled_date: date(2024, 1, 17),
            scheduled_time: time(16, 0),
            description: "Product demo and requirements discussion".into(),
            notes: "Demo went well, proceeding to contract phase".into(),
            created_date: date(2024, 1, 15),
            completed_date: Some(date(2024, 1, 17)),
        },
        FollowUp {
            id: 4,
            lead_id: Some(1),
            lead_name: "Acme Corp".into(),
            assignee: "Rahul Sharma".into(),
            kind: FollowUpType::Call,
            priority: Priority::Medium,
            status: FollowUpStatus::Overdue,
            scheduled_date: date(2024, 1, 16),
            scheduled_time: time(11, 0),
            description: "Initial follow-up after first contact".into(),
            notes: "Client was interested but needed time to review".into(),
            created_date: date(2024, 1, 15),
            completed_date: None,
        },
    ]
}

pub fn calls() -> Vec<Call> {
    vec![
        Call {
            id: 1,
            lead_id: Some(1),
            lead_name: "Acme Corp".into(),
            caller: "Rahul Sharma".into(),
            direction: CallDirection::Outbound,
            outcome: CallOutcome::Connected,
            duration_minutes: 15,
            call_date: date(2024, 1, 16),
            notes: "Walked through proposal".into(),
        },
        Call {
            id: 2,
            lead_id: Some(2),
            lead_name: "Tech Solutions".into(),
            caller: "Priya Patel".into(),
            direction: CallDirection::Outbound,
            outcome: CallOutcome::NoAnswer,
            duration_minutes: 0,
            call_date: date(2024, 1, 17),
            notes: String::new(),
        },
        Call {
            id: 3,
            lead_id: Some(3),
            lead_name: "Digital Dynamics".into(),
            caller: "Amit Kumar".into(),
            direction: CallDirection::Inbound,
            outcome: CallOutcome::Connected,
            duration_minutes: 25,
            call_date: date(2024, 1, 17),
            notes: "Requested contract draft".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let ids: HashSet<u32> = leads().iter().map(|l| l.id).collect();
        assert_eq!(ids.len(), leads().len());
        let ids: HashSet<u32> = users().iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), users().len());
        let ids: HashSet<u32> = follow_ups().iter().map(|f| f.id).collect();
        assert_eq!(ids.len(), follow_ups().len());
    }

    #[test]
    fn test_seed_users_respect_conversion_bound() {
        assert!(users().iter().all(|u| u.leads_converted <= u.leads_assigned));
    }
}
