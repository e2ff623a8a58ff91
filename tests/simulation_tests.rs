//! End-to-end tests for sessions and batches

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use roulette_sim::config::SimulationConfig;
    use roulette_sim::persistence::{DrawRow, RecordSink, SummaryRow};
    use roulette_sim::rng::{batch_rng, draw_sequence};
    use roulette_sim::strategy::ThreeNumberAdaptive;
    use roulette_sim::{
        classify, Bankroll, BatchRunner, DecisionContext, DrawRecord, Session, SessionState,
        SessionSummary, SetupContext, SimError, Strategy, StrategyKind, ViolationPolicy, Wager,
    };

    /// Keeps every row in memory
    #[derive(Default)]
    struct MemorySink {
        draws: Vec<DrawRow>,
        sessions: Vec<SummaryRow>,
        flushed: bool,
    }

    impl RecordSink for MemorySink {
        fn write_draw(&mut self, record: &DrawRecord) -> Result<()> {
            self.draws.push(DrawRow::from(record));
            Ok(())
        }

        fn write_summary(&mut self, summary: &SessionSummary) -> Result<()> {
            self.sessions.push(SummaryRow::from(summary));
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            self.flushed = true;
            Ok(())
        }
    }

    /// Stakes more than it has on the third draw
    struct Overbet;

    impl Strategy for Overbet {
        fn name(&self) -> &'static str {
            "overbet"
        }

        fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager {
            let mut wager = Wager::new();
            if ctx.history().len() == 2 {
                wager.on_red(ctx.balance() + 1.0);
            } else {
                wager.on_red(1.0);
            }
            wager
        }
    }

    fn overbet() -> Box<dyn Strategy> {
        Box::new(Overbet)
    }

    fn two_columns() -> Box<dyn Strategy> {
        StrategyKind::TwoColumns.build()
    }

    type Factory = fn() -> Box<dyn Strategy>;

    fn config(strategies: &[&str], trials: u32, seed: u64) -> SimulationConfig {
        SimulationConfig {
            trials,
            strategies: strategies.iter().map(|s| s.to_string()).collect(),
            seed: Some(seed),
            progress_every: 0,
            ..SimulationConfig::default()
        }
    }

    // ============================================================================
    // Wheel and wager
    // ============================================================================

    #[test]
    fn test_zero_has_no_other_property() {
        let outcome = classify(0);
        assert!(outcome.is_zero);
        assert!(!outcome.is_red && !outcome.is_black);
        assert!(!outcome.is_even && !outcome.is_odd);
        assert!(!outcome.is_low && !outcome.is_high);
        assert_eq!(outcome.column, None);
        assert_eq!(outcome.dozen, None);
    }

    #[test]
    fn test_one_is_red_odd_low_first_column_and_dozen() {
        let outcome = classify(1);
        assert!(outcome.is_red && outcome.is_odd && outcome.is_low);
        assert_eq!(outcome.column, Some(0));
        assert_eq!(outcome.dozen, Some(0));
    }

    #[test]
    fn test_straight_and_red_on_seven_pays_38() {
        let mut wager = Wager::new();
        wager.on_number(7, 1.0).on_red(1.0);
        assert_eq!(wager.payout(&classify(7)), 38.0);
    }

    // ============================================================================
    // Sessions
    // ============================================================================

    #[test]
    fn test_two_columns_stops_with_one_chip() {
        let draws = [5u8; 10];
        let mut session = Session::new(
            StrategyKind::TwoColumns.build(),
            1,
            &draws,
            &[],
            1.0,
            StdRng::seed_from_u64(0),
        );
        let summary = session.play().unwrap();
        assert_eq!(summary.state, SessionState::Terminated);
        assert_eq!(summary.draws_played, 0);
        assert_eq!(summary.bankroll, 1.0);
    }

    #[test]
    fn test_single_number_never_stops_with_money_left() {
        let mut source = batch_rng(Some(2024));
        for trial in 1..=50 {
            let draws = draw_sequence(&mut source, 150);
            let mut session = Session::new(
                StrategyKind::SingleNumber.build(),
                trial,
                &draws,
                &[],
                200.0,
                StdRng::seed_from_u64(trial as u64),
            );
            let summary = session.play().unwrap();
            assert!(summary.draws_played <= 150);
            if summary.draws_played < 150 {
                assert_eq!(summary.bankroll, 0.0, "trial {}", trial);
                assert_eq!(summary.state, SessionState::Exhausted);
            }
        }
    }

    #[test]
    fn test_adaptive_with_every_number_in_prior_picks_three() {
        let prior: Vec<u8> = (0..37).chain(0..37).collect();
        let bankroll = Bankroll::new(200.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut strategy = ThreeNumberAdaptive::default();
        {
            let mut ctx = SetupContext::new(1, &bankroll, &prior, &mut rng);
            strategy.initialize(&mut ctx);
        }
        let numbers = strategy.numbers();
        assert_eq!(numbers.len(), 3);
        assert!(numbers.iter().all(|&n| n <= 36));
    }

    #[test]
    fn test_overcommit_aborts_the_session() {
        let draws = [2u8; 10];
        let mut session = Session::new(
            Box::new(Overbet),
            4,
            &draws,
            &[],
            50.0,
            StdRng::seed_from_u64(0),
        );
        let err = session.play().unwrap_err();
        assert!(err.is_policy_violation());
        match err {
            SimError::PolicyViolation {
                strategy,
                trial,
                draw,
                ..
            } => {
                assert_eq!(strategy, "overbet");
                assert_eq!(trial, 4);
                assert_eq!(draw, 3);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Aborted);
        assert_eq!(session.draws_played(), 2);
    }

    #[test]
    fn test_bankroll_follows_the_records() {
        let mut source = batch_rng(Some(5));
        let draws = draw_sequence(&mut source, 150);
        let prior = draw_sequence(&mut source, 50);

        for kind in StrategyKind::ALL {
            let mut session = Session::new(
                kind.build(),
                1,
                &draws,
                &prior,
                200.0,
                StdRng::seed_from_u64(17),
            );
            let summary = session.play().unwrap();

            let mut expected = 200.0;
            for record in session.history() {
                assert!(record.stake <= record.bankroll_before);
                // withdrawals happen between draws
                assert!(record.bankroll_before <= expected, "{}", kind);
                expected = record.bankroll_after();
            }
            let net: f64 = session.history().iter().map(|r| r.net()).sum();
            assert_eq!(summary.bankroll, 200.0 + net - summary.withdrawn, "{}", kind);
            assert!(summary.peak >= 200.0);
            assert!(summary.bankroll >= 0.0);
        }
    }

    // ============================================================================
    // Batches
    // ============================================================================

    #[test]
    fn test_batch_writes_rows_for_every_session() {
        let runner = BatchRunner::new(config(
            &["two-columns-static", "two-columns-six-numbers-martingale"],
            5,
            42,
        ))
        .unwrap();
        let mut sink = MemorySink::default();
        let report = runner.run(&mut batch_rng(Some(42)), &mut sink).unwrap();

        assert!(sink.flushed);
        assert_eq!(report.trials, 5);
        assert_eq!(report.sessions, 10);
        assert_eq!(sink.sessions.len(), 10);
        assert_eq!(sink.draws.len() as u64, report.draws);

        let drawn: usize = sink.sessions.iter().map(|row| row.draws).sum();
        assert_eq!(drawn, sink.draws.len());

        // same trial, same assigned sequence for every strategy
        let first: Vec<u8> = sink
            .draws
            .iter()
            .filter(|row| row.trial == 1 && row.strategy == "two-columns-static")
            .map(|row| row.number)
            .collect();
        let second: Vec<u8> = sink
            .draws
            .iter()
            .filter(|row| row.trial == 1 && row.strategy == "two-columns-six-numbers-martingale")
            .map(|row| row.number)
            .collect();
        let shared = first.len().min(second.len());
        assert_eq!(first[..shared], second[..shared]);
    }

    #[test]
    fn test_batch_is_deterministic_for_a_seed() {
        let names: Vec<&str> = StrategyKind::ALL.iter().map(|k| k.as_str()).collect();
        let runner = BatchRunner::new(config(&names, 4, 7)).unwrap();

        let mut a = MemorySink::default();
        let mut b = MemorySink::default();
        runner.run(&mut batch_rng(Some(7)), &mut a).unwrap();
        runner.run(&mut batch_rng(Some(7)), &mut b).unwrap();

        assert_eq!(a.sessions, b.sessions);
        assert_eq!(a.draws, b.draws);
    }

    #[test]
    fn test_unknown_strategy_fails_before_running() {
        let result = BatchRunner::new(config(&["two-columns-static", "labouchere"], 1, 0));
        assert!(matches!(result, Err(SimError::UnknownStrategy(name)) if name == "labouchere"));
    }

    #[test]
    fn test_skip_policy_drops_violating_sessions_and_continues() {
        let mut simulation = config(&["two-columns-static"], 4, 3);
        simulation.on_policy_violation = ViolationPolicy::Skip;
        let runner = BatchRunner::new(simulation).unwrap();

        let factories: [Factory; 2] = [overbet, two_columns];
        let mut sink = MemorySink::default();
        let report = runner
            .run_with(&factories, &mut batch_rng(Some(3)), &mut sink)
            .unwrap();

        assert_eq!(report.trials, 4);
        assert_eq!(report.skipped, 4);
        assert_eq!(report.sessions, 4);
        assert!(sink.flushed);
        assert!(sink.draws.iter().all(|row| row.strategy == "two-columns-static"));
        assert!(sink.sessions.iter().all(|row| row.strategy == "two-columns-static"));
        assert_eq!(sink.sessions.len(), 4);
        assert!(!sink.draws.is_empty());
    }

    #[test]
    fn test_abort_policy_stops_the_run_with_the_violation() {
        let runner = BatchRunner::new(config(&["two-columns-static"], 4, 3)).unwrap();

        let factories: [Factory; 2] = [two_columns, overbet];
        let mut sink = MemorySink::default();
        let err = runner
            .run_with(&factories, &mut batch_rng(Some(3)), &mut sink)
            .unwrap_err();

        match err.downcast_ref::<SimError>() {
            Some(SimError::PolicyViolation {
                strategy,
                trial,
                draw,
                ..
            }) => {
                assert_eq!(*strategy, "overbet");
                assert_eq!(*trial, 1);
                assert_eq!(*draw, 3);
            }
            other => panic!("unexpected error {:?}", other),
        }
        // the session before the violation was already streamed
        assert_eq!(sink.sessions.len(), 1);
        assert_eq!(sink.sessions[0].strategy, "two-columns-static");
        assert!(!sink.flushed);
    }

    #[test]
    fn test_skip_policy_parses_from_config_value() {
        let mut simulation = config(&["two-columns-static"], 1, 0);
        simulation.on_policy_violation = ViolationPolicy::Skip;
        let json = serde_json::to_string(&simulation).unwrap();
        assert!(json.contains("\"on_policy_violation\":\"skip\""));
    }
}
