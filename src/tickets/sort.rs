//! Ticket classification and ordering.
//!
//! Open tickets come first, grouped critical, high, normal; closed tickets
//! come last regardless of urgency. Every bucket is ordered by `dateUpdated`,
//! most recent first. Timestamps are compared as plain strings, so the
//! backend's ISO-8601 encoding is what makes the order chronological.

use std::cmp::Ordering;

use crate::types::{Ticket, Urgency};

/// One of the four sort partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Critical,
    High,
    Normal,
    Closed,
}

impl Bucket {
    pub fn of(ticket: &Ticket) -> Self {
        if !ticket.is_active {
            return Bucket::Closed;
        }
        match ticket.urgency {
            Urgency::Critical => Bucket::Critical,
            Urgency::High => Bucket::High,
            Urgency::Normal => Bucket::Normal,
        }
    }
}

enum_display!(Bucket, {
    Critical => "critical",
    High => "high",
    Normal => "normal",
    Closed => "closed",
});

/// Display order of two tickets
pub fn compare_tickets(a: &Ticket, b: &Ticket) -> Ordering {
    Bucket::of(a)
        .cmp(&Bucket::of(b))
        .then_with(|| b.date_updated.cmp(&a.date_updated))
}

/// Return the tickets in display order.
///
/// The sort is stable, so tickets with equal bucket and `dateUpdated` keep
/// their input order. The input slice is left untouched.
pub fn sort_tickets(tickets: &[Ticket]) -> Vec<Ticket> {
    let mut sorted = tickets.to_vec();
    sorted.sort_by(compare_tickets);
    sorted
}

/// Count tickets per bucket, in bucket order.
pub fn bucket_counts(tickets: &[Ticket]) -> [(Bucket, usize); 4] {
    let mut counts = [
        (Bucket::Critical, 0),
        (Bucket::High, 0),
        (Bucket::Normal, 0),
        (Bucket::Closed, 0),
    ];
    for ticket in tickets {
        let bucket = Bucket::of(ticket);
        if let Some(entry) = counts.iter_mut().find(|(b, _)| *b == bucket) {
            entry.1 += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: &str, active: bool, urgency: u8, updated: &str) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            title: format!("Ticket {id}"),
            date_created: "2024-01-01".to_string(),
            date_updated: updated.to_string(),
            is_active: active,
            urgency: Urgency::from_num(urgency).unwrap(),
            last_reply: String::new(),
        }
    }

    fn ids(tickets: &[Ticket]) -> Vec<&str> {
        tickets.iter().map(|t| t.ticket_id.as_str()).collect()
    }

    #[test]
    fn test_mixed_example_order() {
        let input = vec![
            ticket("1", true, 0, "2024-01-01"),
            ticket("2", false, 2, "2024-06-01"),
            ticket("3", true, 2, "2024-03-01"),
        ];
        assert_eq!(ids(&sort_tickets(&input)), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_buckets_then_recency() {
        let input = vec![
            ticket("n-old", true, 0, "2024-01-01"),
            ticket("c-old", false, 0, "2023-01-01"),
            ticket("h-new", true, 1, "2024-05-01"),
            ticket("crit-old", true, 2, "2024-02-01"),
            ticket("n-new", true, 0, "2024-04-01"),
            ticket("c-new", false, 1, "2024-07-01"),
            ticket("crit-new", true, 2, "2024-03-01"),
            ticket("h-old", true, 1, "2024-01-15"),
        ];
        assert_eq!(
            ids(&sort_tickets(&input)),
            vec![
                "crit-new", "crit-old", "h-new", "h-old", "n-new", "n-old", "c-new", "c-old"
            ]
        );
    }

    #[test]
    fn test_closed_ignores_urgency() {
        let input = vec![
            ticket("closed-critical", false, 2, "2024-01-01"),
            ticket("open-normal", true, 0, "2020-01-01"),
        ];
        assert_eq!(
            ids(&sort_tickets(&input)),
            vec!["open-normal", "closed-critical"]
        );
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let input = vec![
            ticket("a", true, 1, "2024-02-02"),
            ticket("b", true, 1, "2024-02-02"),
            ticket("c", true, 1, "2024-02-02"),
        ];
        assert_eq!(ids(&sort_tickets(&input)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(sort_tickets(&[]).is_empty());
    }

    #[test]
    fn test_input_not_mutated_and_multiset_preserved() {
        let input = vec![
            ticket("x", false, 0, "2024-01-01"),
            ticket("y", true, 2, "2024-01-02"),
            ticket("z", true, 0, "2024-01-03"),
        ];
        let before = input.clone();
        let sorted = sort_tickets(&input);

        assert_eq!(input, before);
        assert_eq!(sorted.len(), input.len());
        let mut a = ids(&sorted);
        let mut b = ids(&input);
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sorted_output_satisfies_invariant() {
        // Deterministic spread of tickets across all buckets and dates.
        let input: Vec<Ticket> = (0..60)
            .map(|i| {
                ticket(
                    &format!("t{i}"),
                    i % 4 != 0,
                    (i % 3) as u8,
                    &format!("2024-{:02}-{:02}", (i * 7) % 12 + 1, (i * 11) % 28 + 1),
                )
            })
            .collect();
        let sorted = sort_tickets(&input);

        for pair in sorted.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(Bucket::of(a) <= Bucket::of(b), "bucket order broken");
            if Bucket::of(a) == Bucket::of(b) {
                assert!(a.date_updated >= b.date_updated, "recency order broken");
            }
        }
        let first_closed = sorted.iter().position(|t| !t.is_active).unwrap();
        assert!(sorted[first_closed..].iter().all(|t| !t.is_active));
    }

    #[test]
    fn test_bucket_counts() {
        let input = vec![
            ticket("1", true, 2, "2024-01-01"),
            ticket("2", true, 2, "2024-01-01"),
            ticket("3", true, 0, "2024-01-01"),
            ticket("4", false, 1, "2024-01-01"),
        ];
        assert_eq!(
            bucket_counts(&input),
            [
                (Bucket::Critical, 2),
                (Bucket::High, 0),
                (Bucket::Normal, 1),
                (Bucket::Closed, 1)
            ]
        );
    }
}
