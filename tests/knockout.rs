//! Integration tests for knockout seeding, round advancement and match results.

mod common;

use common::{at, config, roster, scheduled_tournament};
use table_tennis_tournament_web::{
    advance_knockout, build_round_robin, generate_knockout_round, record_match_winner,
    set_match_winner, submission, ByeAdvance, GameMatch, KnockoutContext, KnockoutPatterns,
    KnockoutRound, MatchId, PatternTemplate, Player, RoundNames, RoundType, Schedule,
    ScheduleError, Side, Tournament, WinnerStatus,
};

fn round<'a>(schedule: &'a Schedule, ids: &[MatchId]) -> Vec<&'a GameMatch> {
    ids.iter().map(|id| schedule.get(*id).unwrap()).collect()
}

#[test]
fn five_groups_seed_a_sixteen_bracket_with_walkovers() {
    let mut t = scheduled_tournament("U21", 5, 4, 8, 7);
    let group_play = t.schedule.as_ref().unwrap();
    assert_eq!(group_play.matches.len(), 30);
    assert_eq!(group_play.stages["U21"].initial_stage_size, KnockoutRound::RoundOf16);

    let summary = generate_knockout_round(&mut t, "U21").unwrap();
    assert_eq!(summary.round, KnockoutRound::RoundOf16);
    assert_eq!(summary.created, (31..=38).map(MatchId).collect::<Vec<_>>());
    // Ten qualifiers in sixteen slots: every match keeps a real side, six face a BYE.
    assert_eq!(summary.walkovers, 6);

    let schedule = t.schedule.as_ref().unwrap();
    let matches = round(schedule, &summary.created);
    let played: Vec<_> = matches.iter().filter(|m| !m.is_walkover()).collect();
    assert_eq!(played.len(), 2);

    for m in &matches {
        assert_eq!(m.group, 16);
        assert_eq!(m.division, "U21 Round of 16");
        assert_eq!(m.round, RoundType::Knockout(KnockoutRound::RoundOf16));
        assert!(!m.players.iter().all(Player::is_bye));
        if m.is_walkover() {
            assert_eq!(m.time, None);
            assert_eq!(m.table, None);
            let winner = m.winner().unwrap();
            assert!(!winner.is_bye());
            assert!(winner.first_name.starts_with("Rank "));
        } else {
            assert!(m.players.iter().all(|p| p.is_winner == WinnerStatus::Pending));
        }
    }

    // Group play ended on table 6 at 09:45; knockout picks up right after it.
    assert_eq!((played[0].table, played[0].time), (Some(7), Some(at(9, 45))));
    assert_eq!((played[1].table, played[1].time), (Some(8), Some(at(9, 45))));

    let stage = &schedule.stages["U21"];
    assert_eq!(stage.current_stage_size, Some(KnockoutRound::Quarterfinal));
    assert_eq!(stage.bye_winners.len(), 6);
    for advance in &stage.bye_winners {
        let m = schedule.get(advance.match_id).unwrap();
        assert!(m.is_walkover());
        assert_eq!(m.winner(), Some(&advance.player));
    }
}

#[test]
fn bracket_runs_through_to_the_final() {
    let mut t = scheduled_tournament("U21", 5, 4, 8, 11);
    let r16 = generate_knockout_round(&mut t, "U21").unwrap();

    let qf = generate_knockout_round(&mut t, "U21").unwrap();
    assert_eq!(qf.round, KnockoutRound::Quarterfinal);
    assert_eq!(qf.created.len(), 4);
    assert_eq!(qf.walkovers, 0);
    {
        let schedule = t.schedule.as_ref().unwrap();
        let previous = round(schedule, &r16.created);
        let matches = round(schedule, &qf.created);
        for (i, m) in matches.iter().enumerate() {
            assert_eq!(m.group, 8);
            assert_eq!(m.division, "U21 Quarterfinal");
            for (side, prev) in previous[2 * i..2 * i + 2].iter().enumerate() {
                assert_eq!(prev.next_match_id, Some(m.match_id));
                let entry = &m.players[side];
                assert_eq!(entry.first_name, format!("Winner of Match {}", prev.match_id));
                match prev.winner() {
                    Some(w) => {
                        assert_eq!(w.next_match_id, Some(m.match_id));
                        assert_eq!((&entry.group, entry.rank), (&w.group, w.rank));
                    }
                    None => assert!(entry.group.is_empty()),
                }
            }
        }
        // Last played group match sat on table 8 at 09:45.
        assert_eq!(matches[0].table, Some(1));
        assert_eq!(matches[0].time, Some(at(10, 10)));
        assert!(schedule.stages["U21"].bye_winners.is_empty());
    }

    let sf = generate_knockout_round(&mut t, "U21").unwrap();
    assert_eq!(sf.created.len(), 2);
    let last = generate_knockout_round(&mut t, "U21").unwrap();
    assert_eq!(last.round, KnockoutRound::Final);
    assert_eq!(last.created.len(), 1);

    let schedule = t.schedule.as_ref().unwrap();
    let final_match = schedule.get(last.created[0]).unwrap();
    assert_eq!(final_match.division, "U21 Final");
    assert_eq!(final_match.group, 2);
    assert_eq!((final_match.table, final_match.time), (Some(7), Some(at(10, 10))));
    let stage = &schedule.stages["U21"];
    assert_eq!(stage.current_stage_size, None);
    assert_eq!(stage.current_size(), 1);

    assert_eq!(
        generate_knockout_round(&mut t, "U21"),
        Err(ScheduleError::KnockoutComplete("U21".to_string()))
    );
}

#[test]
fn walkover_winners_are_consistent_for_any_draw() {
    for seed in 0..25 {
        let mut t = scheduled_tournament("U15", 3, 3, 4, seed);
        let summary = generate_knockout_round(&mut t, "U15").unwrap();
        assert_eq!(summary.round, KnockoutRound::Quarterfinal);
        assert_eq!(summary.created.len(), 4);

        let schedule = t.schedule.as_ref().unwrap();
        let matches = round(schedule, &summary.created);
        let walkovers: Vec<_> = matches.iter().filter(|m| m.is_walkover()).collect();
        assert_eq!(walkovers.len(), summary.walkovers, "seed {seed}");
        assert!(walkovers.len() >= 2, "seed {seed}");

        let queued: Vec<MatchId> = schedule.stages["U15"]
            .bye_winners
            .iter()
            .map(|b| b.match_id)
            .collect();
        let expected: Vec<MatchId> = walkovers
            .iter()
            .filter(|m| m.winner().is_some())
            .map(|m| m.match_id)
            .collect();
        assert_eq!(queued, expected, "seed {seed}");
        for m in walkovers {
            assert_eq!((m.time, m.table), (None, None));
        }
    }
}

#[test]
fn results_flow_into_the_next_round() {
    let mut t = scheduled_tournament("U18", 4, 4, 6, 3);
    let qf = generate_knockout_round(&mut t, "U18").unwrap();
    assert_eq!(qf.walkovers, 0);

    let first = qf.created[0];
    set_match_winner(&mut t, first, Side::Two).unwrap();
    let winner = {
        let m = t.schedule.as_ref().unwrap().get(first).unwrap();
        assert_eq!(m.players[0].is_winner, WinnerStatus::Decided(false));
        assert_eq!(m.players[1].is_winner, WinnerStatus::Decided(true));
        m.players[1].clone()
    };
    assert_eq!(
        set_match_winner(&mut t, first, Side::One),
        Err(ScheduleError::MatchAlreadyDecided(first))
    );

    let sf = generate_knockout_round(&mut t, "U18").unwrap();
    let schedule = t.schedule.as_mut().unwrap();
    let semi = schedule.get(sf.created[0]).unwrap().clone();
    assert_eq!(semi.players[0].first_name, format!("Winner of Match {first}"));
    assert_eq!(semi.players[0].group, winner.group);
    assert_eq!(semi.players[0].rank, winner.rank);
    assert!(semi.players[1].group.is_empty());

    // A result entered after the next round exists fills the waiting placeholder.
    let second = qf.created[1];
    record_match_winner(schedule, second, Side::One).unwrap();
    let decided = schedule.get(second).unwrap().players[0].clone();
    assert_eq!(decided.next_match_id, Some(semi.match_id));
    let semi = schedule.get(sf.created[0]).unwrap();
    assert_eq!(semi.players[1].first_name, format!("Winner of Match {second}"));
    assert_eq!(semi.players[1].group, decided.group);
    assert_eq!(semi.players[1].rank, decided.rank);

    assert_eq!(
        record_match_winner(schedule, MatchId(999), Side::One),
        Err(ScheduleError::MatchNotFound(MatchId(999)))
    );
}

#[test]
fn walkovers_cannot_be_decided_again() {
    let mut t = scheduled_tournament("U21", 5, 4, 8, 7);
    let summary = generate_knockout_round(&mut t, "U21").unwrap();
    let schedule = t.schedule.as_mut().unwrap();
    let walkover = summary
        .created
        .iter()
        .copied()
        .find(|id| schedule.get(*id).is_some_and(GameMatch::is_walkover))
        .unwrap();
    assert_eq!(
        record_match_winner(schedule, walkover, Side::One),
        Err(ScheduleError::MatchAlreadyDecided(walkover))
    );
}

#[test]
fn leftover_bye_winners_are_paired_in_the_next_round() {
    let t = scheduled_tournament("U21", 5, 4, 8, 7);
    let mut schedule = t.schedule.clone().unwrap();
    let ctx = KnockoutContext {
        config: &t.config,
        patterns: &t.patterns,
        round_names: &t.round_names,
        groups: &t.groups,
    };
    advance_knockout(&mut schedule, "U21", &ctx).unwrap();

    let mut straggler = Player::seeded(1, 9);
    straggler.is_winner = WinnerStatus::Decided(true);
    schedule
        .stages
        .get_mut("U21")
        .unwrap()
        .bye_winners
        .push(ByeAdvance { match_id: MatchId(900), player: straggler });

    let qf = advance_knockout(&mut schedule, "U21", &ctx).unwrap();
    assert_eq!(qf.created.len(), 5);
    let extra = schedule.get(qf.created[4]).unwrap();
    assert_eq!(extra.division, "U21 Quarterfinal");
    assert_eq!(extra.players[0].first_name, "Rank 1 Group 9");
    assert_eq!(extra.players[0].is_winner, WinnerStatus::Pending);
    assert_eq!(extra.players[1].first_name, format!("Winner of Match {}", extra.match_id));
    assert!(schedule.stages["U21"].bye_winners.is_empty());
}

#[test]
fn failed_calls_leave_the_schedule_untouched() {
    let t = scheduled_tournament("U21", 5, 4, 8, 7);
    let ctx = KnockoutContext {
        config: &t.config,
        patterns: &t.patterns,
        round_names: &t.round_names,
        groups: &t.groups,
    };
    let mut schedule = t.schedule.clone().unwrap();
    advance_knockout(&mut schedule, "U21", &ctx).unwrap();

    // Drop one Round of 16 match so the round can no longer be paired.
    let dropped = schedule
        .matches
        .iter()
        .rposition(|m| m.round == RoundType::Knockout(KnockoutRound::RoundOf16))
        .unwrap();
    schedule.matches.remove(dropped);
    let before = schedule.clone();
    assert_eq!(
        advance_knockout(&mut schedule, "U21", &ctx),
        Err(ScheduleError::OddMatchCount {
            division: "U21".to_string(),
            round: KnockoutRound::RoundOf16,
            count: 7,
        })
    );
    assert_eq!(schedule, before);

    let empty = KnockoutPatterns::default();
    let no_patterns = KnockoutContext { patterns: &empty, ..ctx };
    let mut fresh = t.schedule.clone().unwrap();
    assert_eq!(
        advance_knockout(&mut fresh, "U21", &no_patterns),
        Err(ScheduleError::PatternNotFound { bracket: 16, byes: 6 })
    );
    assert_eq!(Some(&fresh), t.schedule.as_ref());
}

#[test]
fn rejects_unknown_or_missing_division() {
    let mut t = scheduled_tournament("U21", 2, 3, 4, 1);
    assert_eq!(
        generate_knockout_round(&mut t, "U99"),
        Err(ScheduleError::UnknownDivision("U99".to_string()))
    );
    assert_eq!(generate_knockout_round(&mut t, " "), Err(ScheduleError::MissingDivision));

    let mut empty = Tournament::new("Open", config(4), PatternTemplate::standard().materialize_seeded(1));
    assert_eq!(generate_knockout_round(&mut empty, "U21"), Err(ScheduleError::NoSchedule));
}

#[test]
fn knockout_needs_group_play_first() {
    let (groups, players) = roster("U21", 2, 3);
    let cfg = config(4);
    let mut schedule = build_round_robin(&groups, &players, &cfg).unwrap();
    schedule.matches.clear();

    let patterns = PatternTemplate::standard().materialize_seeded(2);
    let names = RoundNames::default();
    let ctx = KnockoutContext {
        config: &cfg,
        patterns: &patterns,
        round_names: &names,
        groups: &groups,
    };
    assert_eq!(
        advance_knockout(&mut schedule, "U21", &ctx),
        Err(ScheduleError::RoundRobinMissing("U21".to_string()))
    );

    let mut skipped = build_round_robin(&groups, &players, &cfg).unwrap();
    if let Some(stage) = skipped.stages.get_mut("U21") {
        stage.current_stage_size = Some(KnockoutRound::Semifinal);
    }
    assert_eq!(
        advance_knockout(&mut skipped, "U21", &ctx),
        Err(ScheduleError::NoPreviousRound {
            division: "U21".to_string(),
            round: KnockoutRound::Quarterfinal,
        })
    );
}

#[test]
fn custom_round_names_label_the_matches() {
    let mut t = scheduled_tournament("U18", 4, 3, 6, 5);
    t.round_names = RoundNames::with_overrides([(KnockoutRound::Quarterfinal, "Last Eight".to_string())]);
    let summary = generate_knockout_round(&mut t, "U18").unwrap();
    let schedule = t.schedule.as_ref().unwrap();
    assert!(round(schedule, &summary.created)
        .iter()
        .all(|m| m.division == "U18 Last Eight"));
}

#[test]
fn submission_starts_every_player_at_zero_sets() {
    let mut t = scheduled_tournament("U15", 1, 3, 4, 1);
    generate_knockout_round(&mut t, "U15").unwrap();
    let schedule = t.schedule.as_ref().unwrap();
    let rows = submission(schedule, &t.config);
    assert_eq!(rows.len(), schedule.matches.len());
    assert!(rows.iter().flat_map(|r| r.players.iter()).all(|p| p.sets == 0));

    let json = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(json["match_id"], "0001");
    assert_eq!(json["match_type"], "Best of 3");
    assert_eq!(json["players"][0]["sets"], 0);
    assert_eq!(json["players"][0]["first_name"], "P0");
}
