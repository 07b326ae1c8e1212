mod common;

use assert_matches::assert_matches;
use chrono::Duration;
use rust_decimal_macros::dec;

use common::{add_sow, app, date, owner, record_service, seed_litter};
use herdbook::lifecycle::Stage;
use herdbook::services::litters::{NewMortality, NewSale};
use herdbook::ServiceError;

#[test]
fn herd_counts_bucket_litters_by_age() {
    let state = app();
    let owner_id = owner();
    let today = date(2024, 6, 1);

    // Ages 10, 30, 70, and 120 days: one litter per stage.
    for (i, (age, alive)) in [(10, 8), (30, 9), (70, 10), (120, 7)].iter().enumerate() {
        let farrow = today - Duration::days(*age);
        let service = farrow - Duration::days(114);
        seed_litter(
            &state,
            owner_id,
            &format!("SOW-{:03}", i + 1),
            service,
            farrow,
            *alive,
        );
    }
    state.services.breeding.add_boar(
        owner_id,
        herdbook::entities::NewBoar {
            tag: "BOAR-001".to_string(),
            breed: "Duroc".to_string(),
            date_of_birth: None,
        },
    )
    .unwrap();

    let counts = state.services.herd.herd_counts(owner_id, today);
    assert_eq!(counts.preweaning, 8);
    assert_eq!(counts.weaner, 9);
    assert_eq!(counts.grower, 10);
    assert_eq!(counts.finisher, 7);
    assert_eq!(counts.total_piglets, 34);
    assert_eq!(counts.sows, 4);
    assert_eq!(counts.boars, 1);
    assert_eq!(counts.total_herd, 39);
}

#[test]
fn stage_boundary_at_weaning_is_exact() {
    let state = app();
    let owner_id = owner();
    let today = date(2024, 6, 1);

    // 21 days old: still preweaning. 22 days old: weaner.
    seed_litter(
        &state,
        owner_id,
        "SOW-001",
        today - Duration::days(135),
        today - Duration::days(21),
        5,
    );
    seed_litter(
        &state,
        owner_id,
        "SOW-002",
        today - Duration::days(136),
        today - Duration::days(22),
        6,
    );

    let counts = state.services.herd.herd_counts(owner_id, today);
    assert_eq!(counts.preweaning, 5);
    assert_eq!(counts.weaner, 6);
}

#[test]
fn emptied_litters_leave_the_dashboard() {
    let state = app();
    let owner_id = owner();
    let today = date(2024, 6, 1);
    let litter = seed_litter(
        &state,
        owner_id,
        "SOW-001",
        today - Duration::days(144),
        today - Duration::days(30),
        4,
    );

    state
        .services
        .litters
        .record_mortality(
            owner_id,
            litter.id,
            NewMortality {
                date: today - Duration::days(1),
                count: 4,
                cause: "scours".to_string(),
                age_at_death_days: None,
                weight_at_death_kg: None,
                notes: None,
            },
        )
        .unwrap();

    let counts = state.services.herd.herd_counts(owner_id, today);
    assert_eq!(counts.total_piglets, 0);
    assert!(state.services.herd.active_litters(owner_id, today).is_empty());
}

#[test]
fn active_litters_summarize_the_ledger() {
    let state = app();
    let owner_id = owner();
    let today = date(2024, 6, 1);
    let litter = seed_litter(
        &state,
        owner_id,
        "SOW-001",
        today - Duration::days(144),
        today - Duration::days(30),
        10,
    );

    state
        .services
        .litters
        .record_mortality(
            owner_id,
            litter.id,
            NewMortality {
                date: today - Duration::days(10),
                count: 2,
                cause: "crushing".to_string(),
                age_at_death_days: Some(20),
                weight_at_death_kg: None,
                notes: None,
            },
        )
        .unwrap();

    let summaries = state.services.herd.active_litters(owner_id, today);
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.sow_tag, "SOW-001");
    assert_eq!(summary.age_days, 30);
    assert_eq!(summary.stage, Stage::Weaner);
    assert_eq!(summary.mortalities, 2);
    assert_eq!(summary.current_alive, 8);
    assert_eq!(summary.survival_rate, 80.0);
    assert_eq!(summary.latest_average_weight_kg, 1.5);
}

#[test]
fn upcoming_farrowings_are_windowed_and_sorted() {
    let state = app();
    let owner_id = owner();
    let today = date(2024, 6, 1);

    // Due in 114 - 100 = 14 days.
    let near = add_sow(&state, owner_id, "SOW-001");
    record_service(&state, owner_id, near.id, today - Duration::days(100));
    // Due in 114 - 60 = 54 days.
    let far = add_sow(&state, owner_id, "SOW-002");
    record_service(&state, owner_id, far.id, today - Duration::days(60));
    // Served today: due in 114 days, right at the edge of the 120-day window.
    let edge = add_sow(&state, owner_id, "SOW-003");
    record_service(&state, owner_id, edge.id, today);
    // Already farrowed: no longer upcoming.
    seed_litter(
        &state,
        owner_id,
        "SOW-004",
        today - Duration::days(114),
        today,
        9,
    );
    // Due date has passed: not upcoming either.
    let overdue = add_sow(&state, owner_id, "SOW-005");
    record_service(&state, owner_id, overdue.id, today - Duration::days(130));

    let upcoming = state
        .services
        .herd
        .upcoming_farrowings(owner_id, today)
        .unwrap();
    let tags: Vec<&str> = upcoming.iter().map(|u| u.sow_tag.as_str()).collect();
    assert_eq!(tags, vec!["SOW-001", "SOW-002", "SOW-003"]);
    assert_eq!(upcoming[0].days_until_due, 14);
    assert_eq!(upcoming[2].days_until_due, 114);
}

#[test]
fn mortality_summary_groups_by_cause_within_period() {
    let state = app();
    let owner_id = owner();
    let today = date(2024, 6, 1);
    let litter = seed_litter(
        &state,
        owner_id,
        "SOW-001",
        today - Duration::days(154),
        today - Duration::days(40),
        12,
    );

    for (days_ago, count, cause) in [(35, 1, "scours"), (20, 2, "crushing"), (5, 1, "crushing")] {
        state
            .services
            .litters
            .record_mortality(
                owner_id,
                litter.id,
                NewMortality {
                    date: today - Duration::days(days_ago),
                    count,
                    cause: cause.to_string(),
                    age_at_death_days: None,
                    weight_at_death_kg: None,
                    notes: None,
                },
            )
            .unwrap();
    }

    let summary = state.services.herd.mortality_summary(owner_id, today, 30);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.by_cause.get("crushing"), Some(&3));
    assert_eq!(summary.by_cause.get("scours"), None);

    let wider = state.services.herd.mortality_summary(owner_id, today, 60);
    assert_eq!(wider.total, 4);
    assert_eq!(wider.by_cause.get("scours"), Some(&1));
}

#[test]
fn sales_summary_totals_revenue_by_type() {
    let state = app();
    let owner_id = owner();
    let today = date(2024, 6, 1);
    let litter = seed_litter(
        &state,
        owner_id,
        "SOW-001",
        today - Duration::days(214),
        today - Duration::days(100),
        12,
    );

    let mut sell = |days_ago: i64, count: u32, sale_type: Option<&str>, amount| {
        state
            .services
            .litters
            .record_sale(
                owner_id,
                litter.id,
                NewSale {
                    date: today - Duration::days(days_ago),
                    count,
                    buyer_name: None,
                    buyer_contact: None,
                    sale_type: sale_type.map(|s| s.to_string()),
                    average_weight_kg: Some(20.0),
                    total_weight_kg: Some(20.0 * count as f64),
                    price_per_kg: Some(dec!(30.00)),
                    total_amount: Some(amount),
                    notes: None,
                },
            )
            .unwrap();
    };
    sell(10, 4, Some("butchery"), dec!(2400.00));
    sell(5, 2, None, dec!(1200.00));
    sell(45, 3, Some("butchery"), dec!(1800.00)); // outside the 30-day window

    let summary = state.services.herd.sales_summary(owner_id, today, 30);
    assert_eq!(summary.total_sold, 6);
    assert_eq!(summary.total_revenue, dec!(3600.00));
    assert_eq!(summary.total_weight_kg, 120.0);
    assert_eq!(summary.by_type.get("butchery").unwrap().count, 4);
    assert_eq!(summary.by_type.get("market").unwrap().revenue, dec!(1200.00));
}

#[test]
fn dashboards_do_not_mix_owners() {
    let state = app();
    let alice = owner();
    let bob = owner();
    let today = date(2024, 6, 1);

    seed_litter(
        &state,
        alice,
        "SOW-001",
        today - Duration::days(144),
        today - Duration::days(30),
        10,
    );

    let counts = state.services.herd.herd_counts(bob, today);
    assert_eq!(counts.total_herd, 0);
    assert!(state.services.herd.active_litters(bob, today).is_empty());
}

#[test]
fn future_farrow_dates_classify_as_unknown_and_stay_out_of_buckets() {
    let state = app();
    let owner_id = owner();
    let today = date(2024, 6, 1);

    // Data-entry slip: farrow date a week in the future.
    seed_litter(
        &state,
        owner_id,
        "SOW-001",
        today - Duration::days(107),
        today + Duration::days(7),
        9,
    );

    let counts = state.services.herd.herd_counts(owner_id, today);
    assert_eq!(counts.total_piglets, 0);
    assert_eq!(counts.preweaning, 0);

    let summaries = state.services.herd.active_litters(owner_id, today);
    assert_eq!(summaries.len(), 1);
    assert_matches!(summaries[0].stage, Stage::Unknown);
}
