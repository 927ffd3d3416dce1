//! End-to-end and edge case tests for the AMB engine.
//!
//! Each test drives the public API through whole monthly cycles the way a
//! caller would: fresh ledgers every month, history carried between cycles.

use amb_engine::{
    Account, DecisionEngine, DeterminationHistory, EngineError, Evaluator, ExecutionContext,
    Money, Month, RuleConfig,
};

const MIN_BALANCE: i64 = 10000;

fn ledger(id: &str, balance: i64) -> Account {
    Account::with_constant_balance(id, "Test Customer", Money::from(balance))
}

/// Runs cycles `1..=plan.len()`, with `plan[i]` the balance held in month `i + 1`.
fn run_plan(plan: &[i64]) -> DeterminationHistory {
    let mut evaluator = Evaluator::new(DecisionEngine::default());
    for (idx, balance) in plan.iter().enumerate() {
        let month = idx as Month + 1;
        evaluator
            .run_cycle(month, &[ledger("ACC", *balance)], Money::from(MIN_BALANCE))
            .unwrap();
    }
    evaluator.into_history()
}

fn charged_pairs(history: &DeterminationHistory) -> Vec<(Month, Month, Month)> {
    history
        .charges()
        .iter()
        .map(|c| (c.month1, c.month2, c.charged_in_month))
        .collect()
}

// ==================== END-TO-END SCENARIOS ====================

#[test]
fn test_constant_deficiency_charges_every_other_month() {
    let history = run_plan(&[500; 7]);

    assert_eq!(
        charged_pairs(&history),
        vec![(1, 2, 3), (3, 4, 5), (5, 6, 7)]
    );
    for charge in history.charges() {
        assert_eq!(charge.shortfall1.to_string(), "9500.00");
        assert_eq!(charge.shortfall2.to_string(), "9500.00");
        assert_eq!(charge.total_charge.to_string(), "1180.00");
    }
    assert_eq!(history.total_charged("ACC").to_string(), "3540.00");
}

#[test]
fn test_constant_deficiency_flags_and_confirms_every_month() {
    let history = run_plan(&[500; 7]);

    assert_eq!(history.probable().len(), 7);
    assert_eq!(history.actual().len(), 7);

    // Only the first flag is a new defaulter; later months continue.
    let sms: Vec<bool> = history.probable().iter().map(|p| p.sms_sent).collect();
    assert_eq!(sms, vec![true, false, false, false, false, false, false]);
}

#[test]
fn test_recovery_stops_further_charges() {
    let history = run_plan(&[500, 500, 15000, 15000, 15000, 15000]);

    assert_eq!(charged_pairs(&history), vec![(1, 2, 3)]);
    assert_eq!(history.actual().len(), 2);
    assert_eq!(history.probable().len(), 2);
}

#[test]
fn test_single_month_blip_is_confirmed_but_not_charged() {
    let history = run_plan(&[15000, 500, 15000, 15000]);

    assert_eq!(history.actual().len(), 1);
    assert_eq!(history.actual()[0].month, 2);
    assert!(history.charges().is_empty());
}

#[test]
fn test_maintained_balance_produces_nothing() {
    let history = run_plan(&[15000; 4]);
    assert!(history.is_empty());
}

#[test]
fn test_charging_does_not_end_the_cycle() {
    // Default, recover, then default again: both episodes are charged.
    let history = run_plan(&[500, 500, 15000, 15000, 500, 500, 15000]);

    assert_eq!(charged_pairs(&history), vec![(1, 2, 3), (5, 6, 7)]);

    // The second episode starts with a fresh warning.
    let month5 = history.probable().iter().find(|p| p.month == 5).unwrap();
    assert!(month5.sms_sent);
    assert_eq!(month5.reason, "new defaulter");
}

#[test]
fn test_three_month_default_charges_only_first_pair() {
    let history = run_plan(&[500, 500, 500, 15000, 15000]);

    assert_eq!(history.actual().len(), 3);
    assert_eq!(charged_pairs(&history), vec![(1, 2, 3)]);
}

// ==================== THRESHOLD EDGE CASES ====================

#[test]
fn test_partial_month_amb_exactly_at_minimum() {
    // 12000 * 25 / 30 == 10000: maintained, never probable.
    let history = run_plan(&[12000; 3]);
    assert!(history.is_empty());
}

#[test]
fn test_probable_without_full_month_default_is_not_confirmed() {
    // 10000 * 25 / 30 < 10000 but the full month averages exactly 10000.
    let history = run_plan(&[10000; 3]);

    assert_eq!(history.probable().len(), 3);
    assert!(history.probable().iter().all(|p| p.sms_sent));
    assert!(history.actual().is_empty());
    assert!(history.charges().is_empty());
}

#[test]
fn test_zero_minimum_never_flags() {
    let mut evaluator = Evaluator::new(DecisionEngine::default());
    for month in 1..=3 {
        evaluator
            .run_cycle(month, &[ledger("ACC", 0)], Money::ZERO)
            .unwrap();
    }
    assert!(evaluator.history().is_empty());
}

// ==================== MALFORMED LEDGERS ====================

#[test]
fn test_short_ledger_is_a_maximal_default() {
    let mut evaluator = Evaluator::new(DecisionEngine::default());
    let min = Money::from(MIN_BALANCE);

    for month in 1..=2 {
        let short = Account::new("ACC", "Short", vec![Money::from(50000); 20]);
        evaluator.run_cycle(month, &[short], min).unwrap();
    }

    let history = evaluator.history();
    assert_eq!(history.actual().len(), 2);
    assert!(history.actual().iter().all(|a| a.amb == Money::ZERO));
    assert_eq!(history.actual()[0].shortfall, min);

    // Shortfall 10000 -> 600 base, capped at 500 per month.
    assert_eq!(history.charges()[0].base_charge.to_string(), "1000.00");
}

// ==================== IDEMPOTENCE & ORDERING ====================

#[test]
fn test_rerunning_every_checkpoint_changes_nothing() {
    let engine = DecisionEngine::default();
    let min = Money::from(MIN_BALANCE);
    let mut history = DeterminationHistory::new();

    for month in 1..=4 {
        let account = ledger("ACC", 500);
        for context in [
            ExecutionContext::new(month, 25, min),
            ExecutionContext::new(month + 1, 3, min),
        ] {
            let first = engine.evaluate(&account, &context, &history);
            history.append(first);
            let again = engine.evaluate(&account, &context, &history);
            assert!(again.is_empty(), "checkpoint {} fired twice", context.checkpoint());
        }
    }

    assert_eq!(history.probable().len(), 4);
    assert_eq!(history.actual().len(), 4);
    assert_eq!(history.charges().len(), 2);
}

#[test]
fn test_evaluator_rejects_going_back_a_month() {
    let mut evaluator = Evaluator::new(DecisionEngine::default());
    let min = Money::from(MIN_BALANCE);
    let accounts = [ledger("ACC", 500)];

    evaluator.run_cycle(2, &accounts, min).unwrap();
    let err = evaluator.run_cycle(1, &accounts, min).unwrap_err();

    assert!(matches!(err, EngineError::OutOfOrderCheckpoint { .. }));
    assert!(err.to_string().contains("month 1 day 25"));
}

#[test]
fn test_history_is_shared_only_within_an_account() {
    let mut evaluator = Evaluator::new(DecisionEngine::default());
    let min = Money::from(MIN_BALANCE);

    evaluator.run_cycle(1, &[ledger("A", 500)], min).unwrap();
    let result = evaluator
        .run_cycle(2, &[ledger("A", 500), ledger("B", 500)], min)
        .unwrap();

    let a = result.probable.iter().find(|p| p.account_id == "A").unwrap();
    let b = result.probable.iter().find(|p| p.account_id == "B").unwrap();
    assert!(!a.sms_sent);
    assert!(b.sms_sent);
    assert_eq!(result.charges.len(), 1);
    assert_eq!(result.charges[0].account_id, "A");
}

// ==================== CONFIGURATION ====================

#[test]
fn test_day_26_convention() {
    let config = RuleConfig::default().with_probable_check_day(26).unwrap();
    let mut evaluator = Evaluator::new(DecisionEngine::new(config));
    let min = Money::from(MIN_BALANCE);

    for month in 1..=2 {
        evaluator.run_cycle(month, &[ledger("ACC", 500)], min).unwrap();
    }

    assert_eq!(evaluator.history().probable().len(), 2);
    assert_eq!(evaluator.history().charges().len(), 1);

    // A day-25 checkpoint is not a checkpoint under this convention.
    let result = evaluator
        .run_checkpoint(&[ledger("ACC", 500)], &ExecutionContext::new(3, 25, min))
        .unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_earliest_probable_day_runs_consecutive_cycles() {
    let config = RuleConfig::default().with_probable_check_day(4).unwrap();
    let mut evaluator = Evaluator::new(DecisionEngine::new(config));
    let min = Money::from(MIN_BALANCE);

    for month in 1..=3 {
        evaluator.run_cycle(month, &[ledger("ACC", 500)], min).unwrap();
    }

    assert_eq!(evaluator.history().actual().len(), 3);
    assert_eq!(charged_pairs(evaluator.history()), vec![(1, 2, 3)]);
}

#[test]
fn test_custom_charge_schedule() {
    let config = RuleConfig {
        charge_cap: Money::from(1000),
        ..RuleConfig::default()
    };
    let mut evaluator = Evaluator::new(DecisionEngine::new(config));
    let min = Money::from(MIN_BALANCE);

    for month in 1..=2 {
        evaluator.run_cycle(month, &[ledger("ACC", 500)], min).unwrap();
    }

    // 9500 * 6% = 570 per month, now under the cap.
    let charge = &evaluator.history().charges()[0];
    assert_eq!(charge.base_charge.to_string(), "1140.00");
    assert_eq!(charge.gst_amount.to_string(), "205.20");
    assert_eq!(charge.total_charge.to_string(), "1345.20");
}
