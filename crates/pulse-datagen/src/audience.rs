//! Visitors, ticket sales with resale interest, and reviews.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDateTime};
use pulse_lineup::{Event, EventId, Performance, StageId};
use rand::prelude::*;
use tracing::{info, warn};

use crate::rows::{PaymentMethod, ResaleInterest, Review, Ticket, TicketCategory, Visitor};
use crate::words;

/// Share of VIP tickets an event may sell, as a fraction of stage capacity.
const VIP_SHARE: f64 = 0.1;
/// Probability a ticket is offered as VIP while VIP seats remain.
const VIP_PROBABILITY: f64 = 0.1;
/// Probability an activated ticket leaves a review.
const REVIEW_PROBABILITY: f64 = 0.7;
/// Draws per requested ticket before giving up on the target.
const ATTEMPTS_PER_TICKET: usize = 50;

/// Result of the ticket sale simulation.
#[derive(Debug, Clone, Default)]
pub struct TicketSales {
    pub tickets: Vec<Ticket>,
    pub resale_interest: Vec<ResaleInterest>,
    /// Visitor/event draws made, including duplicates.
    pub attempts: usize,
}

pub fn generate_visitors<R: Rng>(rng: &mut R, count: usize) -> Vec<Visitor> {
    (1..=count as u32)
        .map(|id| {
            let first_name = words::first_name(rng);
            let last_name = words::last_name(rng);
            let email = words::email(&first_name, &last_name, id, rng.random_range(0..4));
            Visitor {
                id,
                first_name,
                last_name,
                email,
                phone: words::phone_number(rng),
                age: rng.random_range(18..=80),
            }
        })
        .collect()
}

fn regular_category<R: Rng>(rng: &mut R) -> TicketCategory {
    if rng.random_bool(0.5) {
        TicketCategory::General
    } else {
        TicketCategory::Backstage
    }
}

/// Sell up to `target` tickets to random visitor/event pairs.
///
/// A visitor buys at most one ticket per event. Once an event reaches its
/// stage capacity, further draws for it become resale-interest rows instead.
pub fn sell_tickets<R: Rng>(
    rng: &mut R,
    target: usize,
    visitors: &[Visitor],
    events: &[Event],
    capacities: &HashMap<StageId, u32>,
    now: NaiveDateTime,
) -> TicketSales {
    let mut sales = TicketSales::default();
    if visitors.is_empty() || events.is_empty() {
        return sales;
    }

    let today = now.date();
    let max_attempts = target.saturating_mul(ATTEMPTS_PER_TICKET);
    let mut pairs: HashSet<(u32, EventId)> = HashSet::new();
    let mut sold: HashMap<EventId, u32> = HashMap::new();
    let mut vip_sold: HashMap<EventId, u32> = HashMap::new();

    while sales.tickets.len() < target && sales.attempts < max_attempts {
        sales.attempts += 1;

        let (Some(event), Some(visitor)) = (events.choose(rng), visitors.choose(rng)) else {
            break;
        };
        if !pairs.insert((visitor.id, event.id)) {
            continue;
        }

        let end = event.date.min(today);
        let start = end - Duration::days(180);

        let capacity = capacities.get(&event.stage_id).copied().unwrap_or(0);
        let sold_count = sold.entry(event.id).or_default();

        if *sold_count >= capacity {
            let category = if rng.random::<f64>() < VIP_PROBABILITY {
                TicketCategory::Vip
            } else {
                regular_category(rng)
            };
            sales.resale_interest.push(ResaleInterest {
                visitor_id: visitor.id,
                event_id: event.id,
                category,
                expressed_on: words::datetime_between(rng, now - Duration::days(90), now),
            });
            continue;
        }

        let max_vip = (capacity as f64 * VIP_SHARE) as u32;
        let vip_count = vip_sold.entry(event.id).or_default();
        let is_vip = *vip_count < max_vip && rng.random::<f64>() < VIP_PROBABILITY;

        let (category, price) = if is_vip {
            (TicketCategory::Vip, rng.random_range(200.0..=500.0))
        } else {
            (regular_category(rng), rng.random_range(50.0..=200.0))
        };

        let ticket = Ticket {
            id: sales.tickets.len() as u32 + 1,
            event_id: event.id,
            visitor_id: visitor.id,
            category,
            price: words::round_to(price, 2),
            purchase_date: words::date_between(rng, start, end),
            payment_method: PaymentMethod::ALL[rng.random_range(0..PaymentMethod::ALL.len())],
            ean_code: words::ean13(rng),
            activated: rng.random_bool(0.5),
        };

        if is_vip {
            *vip_count += 1;
        }
        *sold_count += 1;
        sales.tickets.push(ticket);
    }

    if sales.tickets.len() < target {
        warn!(
            sold = sales.tickets.len(),
            target,
            attempts = sales.attempts,
            "Ticket target not reached"
        );
    }
    info!(
        tickets = sales.tickets.len(),
        resale_interest = sales.resale_interest.len(),
        "Sold tickets"
    );
    sales
}

/// Reviews from activated tickets for performances of the ticket's event.
///
/// A visitor reviews a given performance at most once.
pub fn generate_reviews<R: Rng>(
    rng: &mut R,
    tickets: &[Ticket],
    performances: &[Performance],
) -> Vec<Review> {
    let mut by_event: HashMap<EventId, Vec<&Performance>> = HashMap::new();
    for perf in performances {
        by_event.entry(perf.event_id).or_default().push(perf);
    }

    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut reviews = Vec::new();

    for ticket in tickets {
        if !ticket.activated || rng.random::<f64>() >= REVIEW_PROBABILITY {
            continue;
        }
        let Some(perf) = by_event
            .get(&ticket.event_id)
            .and_then(|perfs| perfs.choose(rng))
        else {
            continue;
        };
        if !seen.insert((ticket.visitor_id, perf.id)) {
            continue;
        }

        reviews.push(Review {
            id: reviews.len() as u32 + 1,
            visitor_id: ticket.visitor_id,
            performance_id: perf.id,
            interpretation: rng.random_range(1..=5),
            lights_sound: rng.random_range(1..=5),
            stage_presence: rng.random_range(1..=5),
            organization: rng.random_range(1..=5),
            overall_impression: rng.random_range(1..=5),
        });
    }

    reviews
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pulse_lineup::{PerformanceOrigin, PerformanceType};
    use rand_chacha::ChaCha8Rng;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn events() -> Vec<Event> {
        vec![
            Event {
                id: 1,
                festival_id: 1,
                stage_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                total_duration: Duration::hours(6),
            },
            Event {
                id: 2,
                festival_id: 2,
                stage_id: 2,
                date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                total_duration: Duration::hours(6),
            },
        ]
    }

    #[test]
    fn test_capacity_respected_and_overflow_becomes_resale() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let visitors = generate_visitors(&mut rng, 40);
        let capacities = HashMap::from([(1, 10), (2, 8)]);

        let sales = sell_tickets(&mut rng, 100, &visitors, &events(), &capacities, now());

        assert_eq!(sales.tickets.len(), 18);
        assert!(!sales.resale_interest.is_empty());

        for event_id in [1, 2] {
            let vip = sales
                .tickets
                .iter()
                .filter(|t| t.event_id == event_id && t.category == TicketCategory::Vip)
                .count();
            assert!(vip <= 1);
        }
    }

    #[test]
    fn test_no_duplicate_visitor_event_pairs() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let visitors = generate_visitors(&mut rng, 30);
        let capacities = HashMap::from([(1, 100), (2, 100)]);
        let sales = sell_tickets(&mut rng, 50, &visitors, &events(), &capacities, now());

        let pairs: HashSet<_> = sales.tickets.iter().map(|t| (t.visitor_id, t.event_id)).collect();
        assert_eq!(pairs.len(), sales.tickets.len());
    }

    #[test]
    fn test_purchase_dates_precede_event_and_today() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let visitors = generate_visitors(&mut rng, 30);
        let capacities = HashMap::from([(1, 100), (2, 100)]);
        let sales = sell_tickets(&mut rng, 40, &visitors, &events(), &capacities, now());

        let events = events();
        for ticket in &sales.tickets {
            let event = events.iter().find(|e| e.id == ticket.event_id).unwrap();
            let end = event.date.min(now().date());
            assert!(ticket.purchase_date <= end);
            assert!(ticket.purchase_date >= end - Duration::days(180));
            let (lo, hi) = match ticket.category {
                TicketCategory::Vip => (200.0, 500.0),
                _ => (50.0, 200.0),
            };
            assert!(ticket.price >= lo && ticket.price <= hi);
        }
    }

    #[test]
    fn test_exhausted_pairs_terminate() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let visitors = generate_visitors(&mut rng, 2);
        let capacities = HashMap::from([(1, 100), (2, 100)]);
        let sales = sell_tickets(&mut rng, 10, &visitors, &events(), &capacities, now());

        assert_eq!(sales.tickets.len(), 4);
        assert_eq!(sales.attempts, 10 * ATTEMPTS_PER_TICKET);
    }

    #[test]
    fn test_reviews_target_ticket_event() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let visitors = generate_visitors(&mut rng, 30);
        let capacities = HashMap::from([(1, 100), (2, 100)]);
        let sales = sell_tickets(&mut rng, 40, &visitors, &events(), &capacities, now());

        let performances: Vec<Performance> = (1..=3)
            .map(|id| Performance {
                id,
                event_id: 1,
                start_time: now(),
                stage_id: 1,
                duration: Duration::minutes(45),
                kind: PerformanceType::Headline,
                origin: PerformanceOrigin::Scheduled,
            })
            .collect();

        let reviews = generate_reviews(&mut rng, &sales.tickets, &performances);
        let pairs: HashSet<_> = reviews.iter().map(|r| (r.visitor_id, r.performance_id)).collect();
        assert_eq!(pairs.len(), reviews.len());

        for review in &reviews {
            let ticket = sales
                .tickets
                .iter()
                .find(|t| t.visitor_id == review.visitor_id && t.event_id == 1)
                .unwrap();
            assert!(ticket.activated);
            assert!((1..=5).contains(&review.overall_impression));
        }
    }
}
