//! Round/phase state machine
//!
//! `tick` is the single transition function. Player input and elapsed time go
//! in, presentation events come out. Within one tick the order is: input, the
//! session clock, then the phase timer and any pending feedback delay.

use rand::Rng;

use super::layout::generate_dots;
use super::pattern::{generate_pattern, mirror_pattern};
use super::state::{
    DelayedAction, DotGrid, GameEvent, GamePhase, RoundState, Session, TimerAction,
};
use crate::highscores::SessionSummary;
use crate::settings::{PhaseKind, PhaseSpec};

/// Player input collected since the last tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Yes (true) / No (false) on the symmetry question
    pub symmetry_answer: Option<bool>,
    /// Dot ids clicked in the identify phase, in click order
    pub dot_clicks: Vec<u32>,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        self.symmetry_answer.is_none() && self.dot_clicks.is_empty()
    }
}

/// Start the session clock and the first round
pub fn start_session(session: &mut Session) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let duration = session.settings.session_duration_secs;

    session.state.is_playing = true;
    session.state.time_remaining_secs = duration;
    session.state.current_round = 1;
    session.state.score = 0;
    session.state.rounds_completed = 0;
    session.state.rounds_attempted = 0;
    session.state.elapsed_ms = 0;
    session.summary = None;
    session.clock.start(duration);

    log::info!(
        "Starting session at level {} (seed {})",
        session.state.selected_level,
        session.seed
    );
    events.push(GameEvent::SessionStarted {
        level: session.state.selected_level,
        seed: session.seed,
    });
    events.push(GameEvent::ClockChanged {
        remaining_secs: duration,
    });

    start_round(session, &mut events);
    events
}

/// Advance the session by `dt_ms` milliseconds
pub fn tick(session: &mut Session, input: &TickInput, dt_ms: u32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Nothing may touch a finished (or never started) session
    if !session.state.is_playing {
        return events;
    }

    if let Some(answer) = input.symmetry_answer {
        answer_symmetry(session, answer, &mut events);
    }
    for &id in &input.dot_clicks {
        click_dot(session, id, &mut events);
    }

    session.state.elapsed_ms += dt_ms as u64;
    if session.clock.advance(dt_ms) > 0 {
        let remaining = session.clock.remaining_secs();
        session.state.time_remaining_secs = remaining;
        events.push(GameEvent::ClockChanged {
            remaining_secs: remaining,
        });
    }
    // Also catches a zero-length session, whose clock never ticks
    if session.clock.remaining_secs() == 0 {
        end_session(session, &mut events);
        return events;
    }

    // Both countdowns advance before either acts, so a timer started by one
    // of them is not charged for this tick
    let update = session.phase_timer.advance(dt_ms);
    let delayed = session.delay.advance(dt_ms);

    if let Some(remaining_secs) = update.remaining_secs {
        events.push(GameEvent::PhaseTimerChanged { remaining_secs });
    }
    if let Some(action) = update.elapsed {
        on_phase_timer_elapsed(session, action, &mut events);
    }
    if let Some(action) = delayed {
        run_delayed(session, action, &mut events);
    }

    events
}

/// Stop both timers and summarize the session
pub fn end_session(session: &mut Session, events: &mut Vec<GameEvent>) {
    if !session.state.is_playing {
        return;
    }
    log::info!("Session ended");

    session.state.is_playing = false;
    session.clock.stop();
    session.phase_timer.cancel();
    session.delay.cancel();
    session.phase = GamePhase::GameOver;

    let summary = SessionSummary::from_state(&session.state, session.settings.session_duration_secs);
    log::info!(
        "Final results: score {}, {}/{} rounds, accuracy {}%, played {}",
        summary.score,
        summary.rounds_completed,
        summary.rounds_attempted,
        summary.accuracy,
        summary.time_played_display()
    );
    session.summary = Some(summary.clone());
    events.push(GameEvent::SessionEnded { summary });
}

fn start_round(session: &mut Session, events: &mut Vec<GameEvent>) {
    if !session.state.is_playing {
        return;
    }
    log::info!(
        "Starting round {} - Level {}",
        session.state.current_round,
        session.state.selected_level
    );

    let grid = session.settings.grid;
    let dots = generate_dots(&mut session.rng, grid.total_dots, grid.width, grid.height);
    session.round = RoundState::new(dots);
    session.state.rounds_attempted += 1;

    events.push(GameEvent::RoundStarted {
        round: session.state.current_round,
    });
    run_phase(session, events);
}

/// Enter the phase at the current index, skipping unknown kinds
fn run_phase(session: &mut Session, events: &mut Vec<GameEvent>) {
    loop {
        if !session.state.is_playing {
            return;
        }

        let Some(&PhaseSpec {
            kind,
            duration_secs,
        }) = session.level.phases.get(session.round.current_phase_index)
        else {
            complete_round(session, events);
            return;
        };

        if kind == PhaseKind::Unknown {
            log::warn!(
                "Unknown phase type at index {}, skipping",
                session.round.current_phase_index
            );
            session.round.current_phase_index += 1;
            continue;
        }

        log::info!("Running phase: {} for {}s", kind.as_str(), duration_secs);
        events.push(GameEvent::PhaseEntered { kind });

        match kind {
            PhaseKind::Highlight => enter_highlight(session, duration_secs, events),
            PhaseKind::Symmetry => enter_symmetry(session, duration_secs, events),
            PhaseKind::Identify => enter_identify(session, duration_secs, events),
            PhaseKind::Unknown => {}
        }
        return;
    }
}

fn start_phase_timer(
    session: &mut Session,
    duration_secs: u32,
    action: TimerAction,
    events: &mut Vec<GameEvent>,
) {
    let remaining_secs = session.phase_timer.start(duration_secs, action);
    events.push(GameEvent::PhaseTimerChanged { remaining_secs });
}

fn enter_highlight(session: &mut Session, duration_secs: u32, events: &mut Vec<GameEvent>) {
    session.phase = GamePhase::Highlight;
    events.push(GameEvent::DotsRendered {
        grid: DotGrid::Memorize,
        dots: session.round.dots.clone(),
    });

    let round = &mut session.round;
    round.highlight_phase_count += 1;
    let target = round.highlight_phase_count.min(session.level.dots_to_memorize);

    if round.memorized_sequence.len() < target {
        let unused: Vec<_> = round
            .dots
            .iter()
            .filter(|d| !round.is_memorized(d.id))
            .copied()
            .collect();

        if !unused.is_empty() {
            let dot = unused[session.rng.random_range(0..unused.len())];
            round.memorized_sequence.push(dot);
            log::debug!("Highlighting dot {}", dot.id);
            events.push(GameEvent::DotHighlighted {
                id: dot.id,
                duration_ms: session.settings.highlight_display_secs * 1000,
            });
        }
    }

    start_phase_timer(session, duration_secs, TimerAction::AdvancePhase, events);
}

fn enter_symmetry(session: &mut Session, duration_secs: u32, events: &mut Vec<GameEvent>) {
    let symmetry = session.level.symmetry;
    let size = session.settings.symmetry_grid_size;
    let rng = &mut session.rng;

    let is_symmetric = rng.random::<f64>() < symmetry.symmetry_chance;
    let left = generate_pattern(
        rng,
        symmetry.pattern_complexity,
        symmetry.filled_square_chance,
        size,
    );
    // An independent right pattern may still happen to mirror the left one
    let right = if is_symmetric {
        mirror_pattern(&left)
    } else {
        generate_pattern(
            rng,
            symmetry.pattern_complexity,
            symmetry.filled_square_chance,
            size,
        )
    };

    log::debug!(
        "Symmetry question: {} patterns, symmetric: {}",
        symmetry.pattern_complexity.as_str(),
        is_symmetric
    );
    session.phase = GamePhase::Symmetry {
        is_symmetric,
        answer: None,
    };
    events.push(GameEvent::SymmetryShown { left, right });
    events.push(GameEvent::AnswerInputEnabled(true));

    start_phase_timer(session, duration_secs, TimerAction::SymmetryTimeout, events);
}

fn enter_identify(session: &mut Session, duration_secs: u32, events: &mut Vec<GameEvent>) {
    session.phase = GamePhase::Identify { locked: false };
    session.round.user_sequence.clear();

    events.push(GameEvent::SequenceChanged { clicked: 0 });
    events.push(GameEvent::DotsRendered {
        grid: DotGrid::Recall,
        dots: session.round.dots.clone(),
    });

    start_phase_timer(session, duration_secs, TimerAction::IdentifyTimeout, events);
}

fn answer_symmetry(session: &mut Session, answer: bool, events: &mut Vec<GameEvent>) {
    let GamePhase::Symmetry {
        is_symmetric,
        answer: None,
    } = session.phase
    else {
        log::debug!("Ignoring symmetry answer outside an open symmetry question");
        return;
    };

    session.phase = GamePhase::Symmetry {
        is_symmetric,
        answer: Some(answer),
    };
    session.phase_timer.cancel();
    events.push(GameEvent::AnswerInputEnabled(false));
    session
        .delay
        .schedule(session.settings.feedback_delay_ms, DelayedAction::RecordSymmetry);
}

fn click_dot(session: &mut Session, id: u32, events: &mut Vec<GameEvent>) {
    if session.phase != (GamePhase::Identify { locked: false }) {
        log::debug!("Ignoring click on dot {} outside recall", id);
        return;
    }
    if !session.round.has_dot(id) {
        log::debug!("Ignoring click on unknown dot {}", id);
        return;
    }

    let round = &mut session.round;
    if round.user_sequence.len() >= round.memorized_sequence.len() {
        return;
    }

    round.user_sequence.push(id);
    events.push(GameEvent::DotClicked { id });
    events.push(GameEvent::SequenceChanged {
        clicked: round.user_sequence.len(),
    });

    if round.user_sequence.len() == round.memorized_sequence.len() {
        session.phase = GamePhase::Identify { locked: true };
        session.phase_timer.cancel();
        resolve_identify(session, events);
        session
            .delay
            .schedule(session.settings.feedback_delay_ms, DelayedAction::CompleteRound);
    }
}

/// Evaluate the recall and record it as the identify phase result
fn resolve_identify(session: &mut Session, events: &mut Vec<GameEvent>) {
    let correct = session.round.check_memory_sequence();
    if !correct {
        events.push(GameEvent::WrongDotsFlagged {
            ids: session.round.user_sequence.clone(),
        });
    }
    session.round.phase_results.push(correct);
    events.push(GameEvent::PhaseResolved {
        kind: PhaseKind::Identify,
        correct,
    });
}

fn advance_phase(session: &mut Session, events: &mut Vec<GameEvent>) {
    session.round.current_phase_index += 1;
    run_phase(session, events);
}

fn on_phase_timer_elapsed(session: &mut Session, action: TimerAction, events: &mut Vec<GameEvent>) {
    if !session.state.is_playing {
        return;
    }

    match action {
        TimerAction::AdvancePhase => advance_phase(session, events),
        TimerAction::SymmetryTimeout => {
            log::debug!("Symmetry question timed out");
            events.push(GameEvent::AnswerInputEnabled(false));
            session.round.phase_results.push(false);
            events.push(GameEvent::PhaseResolved {
                kind: PhaseKind::Symmetry,
                correct: false,
            });
            advance_phase(session, events);
        }
        TimerAction::IdentifyTimeout => {
            session.phase = GamePhase::Identify { locked: true };
            resolve_identify(session, events);
            complete_round(session, events);
        }
    }
}

fn run_delayed(session: &mut Session, action: DelayedAction, events: &mut Vec<GameEvent>) {
    if !session.state.is_playing {
        return;
    }

    match action {
        DelayedAction::RecordSymmetry => {
            let GamePhase::Symmetry {
                is_symmetric,
                answer: Some(answer),
            } = session.phase
            else {
                return;
            };
            let correct = answer == is_symmetric;
            session.round.phase_results.push(correct);
            events.push(GameEvent::PhaseResolved {
                kind: PhaseKind::Symmetry,
                correct,
            });
            advance_phase(session, events);
        }
        DelayedAction::CompleteRound => complete_round(session, events),
        DelayedAction::StartRound => start_round(session, events),
    }
}

fn complete_round(session: &mut Session, events: &mut Vec<GameEvent>) {
    session.phase = GamePhase::RoundComplete;
    session.phase_timer.cancel();

    let round_number = session.state.current_round;
    log::info!(
        "Round {} completed, phase results: {:?}",
        round_number,
        session.round.phase_results
    );

    let awarded = session.round.all_phases_correct();
    if awarded {
        session.state.score += 1;
        session.state.rounds_completed += 1;
        log::info!("Point awarded! Total score now: {}", session.state.score);
    } else {
        log::info!("No point awarded - not all phases were correct");
    }

    events.push(GameEvent::RoundCompleted {
        round: round_number,
        awarded,
        score: session.state.score,
    });

    session.state.current_round += 1;
    session
        .delay
        .schedule(session.settings.next_round_delay_ms, DelayedAction::StartRound);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LevelConfig, Settings};

    const STEP: u32 = 100;

    fn started(level: u8, seed: u64) -> (Session, Vec<GameEvent>) {
        let mut session = Session::new(Settings::default(), level, seed).unwrap();
        let events = start_session(&mut session);
        (session, events)
    }

    /// Tick with no input until `done` holds, collecting events
    fn run_until(
        session: &mut Session,
        max_ms: u32,
        mut done: impl FnMut(&Session) -> bool,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut waited = 0;
        while !done(session) {
            assert!(waited < max_ms, "condition not reached in {}ms", max_ms);
            events.extend(tick(session, &TickInput::default(), STEP));
            waited += STEP;
        }
        events
    }

    fn in_symmetry(session: &Session) -> bool {
        matches!(session.phase, GamePhase::Symmetry { answer: None, .. })
    }

    fn correct_answer(session: &Session) -> bool {
        match session.phase {
            GamePhase::Symmetry { is_symmetric, .. } => is_symmetric,
            other => panic!("not in a symmetry phase: {:?}", other),
        }
    }

    fn answer(session: &mut Session, yes: bool) -> Vec<GameEvent> {
        let input = TickInput {
            symmetry_answer: Some(yes),
            ..Default::default()
        };
        tick(session, &input, STEP)
    }

    fn click(session: &mut Session, ids: &[u32]) -> Vec<GameEvent> {
        let input = TickInput {
            dot_clicks: ids.to_vec(),
            ..Default::default()
        };
        tick(session, &input, STEP)
    }

    fn memorized_ids(session: &Session) -> Vec<u32> {
        session.round.memorized_sequence.iter().map(|d| d.id).collect()
    }

    /// Play the current round of a level-1 session perfectly, up to the recall
    fn play_symmetry_phases_correctly(session: &mut Session) {
        let symmetry_phases = session
            .level
            .phases
            .iter()
            .filter(|p| p.kind == PhaseKind::Symmetry)
            .count();
        for _ in 0..symmetry_phases {
            run_until(session, 10_000, in_symmetry);
            let yes = correct_answer(session);
            answer(session, yes);
        }
        run_until(session, 10_000, |s| {
            s.phase == GamePhase::Identify { locked: false }
        });
    }

    #[test]
    fn test_start_session_enters_first_highlight() {
        let (session, events) = started(1, 42);
        assert!(session.is_playing());
        assert_eq!(session.phase, GamePhase::Highlight);
        assert_eq!(session.state.rounds_attempted, 1);
        assert_eq!(session.round.dots.len(), 60);
        assert_eq!(session.round.memorized_sequence.len(), 1);
        assert_eq!(session.round.highlight_phase_count, 1);

        assert!(matches!(events[0], GameEvent::SessionStarted { level: 1, seed: 42 }));
        assert!(events.contains(&GameEvent::ClockChanged { remaining_secs: 360 }));
        assert!(events.contains(&GameEvent::RoundStarted { round: 1 }));
        assert!(events.contains(&GameEvent::PhaseEntered {
            kind: PhaseKind::Highlight
        }));
        let id = session.round.memorized_sequence[0].id;
        assert!(events.contains(&GameEvent::DotHighlighted {
            id,
            duration_ms: 3000
        }));
        assert!(events.contains(&GameEvent::PhaseTimerChanged { remaining_secs: 3 }));
    }

    #[test]
    fn test_highlight_advances_after_duration() {
        let (mut session, _) = started(1, 1);
        for _ in 0..29 {
            tick(&mut session, &TickInput::default(), STEP);
            assert_eq!(session.phase, GamePhase::Highlight);
        }
        let events = tick(&mut session, &TickInput::default(), STEP);
        assert!(in_symmetry(&session));
        assert_eq!(session.round.current_phase_index, 1);
        assert!(session.round.phase_results.is_empty());
        assert!(events.iter().any(|e| matches!(e, GameEvent::SymmetryShown { .. })));
        assert!(events.contains(&GameEvent::AnswerInputEnabled(true)));
    }

    #[test]
    fn test_symmetric_question_shows_mirrored_patterns() {
        // Across several rounds both outcomes show up; symmetric ones are exact mirrors
        let (mut session, _) = started(4, 3);
        let mut seen_symmetric = false;
        for _ in 0..12 {
            let events = run_until(&mut session, 20_000, in_symmetry);
            let shown = events.iter().rev().find_map(|e| match e {
                GameEvent::SymmetryShown { left, right } => Some((left.clone(), right.clone())),
                _ => None,
            });
            let (left, right) = shown.expect("symmetry patterns shown");
            assert_eq!(left.cells().len(), 64);
            if correct_answer(&session) {
                seen_symmetric = true;
                assert!(left.mirrors(&right));
            }
            let yes = correct_answer(&session);
            answer(&mut session, yes);
            tick(&mut session, &TickInput::default(), 500);
        }
        assert!(seen_symmetric);
    }

    #[test]
    fn test_symmetry_timeout_records_false_and_advances() {
        let (mut session, _) = started(1, 7);
        run_until(&mut session, 5_000, in_symmetry);
        let index = session.round.current_phase_index;

        let events = run_until(&mut session, 10_000, |s| s.round.current_phase_index > index);
        assert_eq!(session.round.phase_results, vec![false]);
        assert_eq!(session.phase, GamePhase::Highlight);
        assert!(events.contains(&GameEvent::PhaseResolved {
            kind: PhaseKind::Symmetry,
            correct: false
        }));
        assert!(events.contains(&GameEvent::AnswerInputEnabled(false)));
    }

    #[test]
    fn test_answer_waits_for_feedback_delay() {
        let (mut session, _) = started(1, 11);
        run_until(&mut session, 5_000, in_symmetry);
        let yes = correct_answer(&session);

        let events = answer(&mut session, yes);
        assert!(events.contains(&GameEvent::AnswerInputEnabled(false)));
        assert!(!session.phase_timer_running());
        assert!(session.round.phase_results.is_empty());

        // A second answer during the pause is ignored
        answer(&mut session, !yes);
        assert!(session.round.phase_results.is_empty());

        // 100ms in the answering tick, 100ms in the ignored one, 300ms more
        for _ in 0..2 {
            tick(&mut session, &TickInput::default(), STEP);
            assert!(session.round.phase_results.is_empty());
        }
        tick(&mut session, &TickInput::default(), STEP);
        assert_eq!(session.round.phase_results, vec![true]);
        assert_eq!(session.phase, GamePhase::Highlight);
        assert_eq!(session.round.memorized_sequence.len(), 2);
    }

    #[test]
    fn test_wrong_answer_recorded() {
        let (mut session, _) = started(2, 5);
        run_until(&mut session, 5_000, in_symmetry);
        let yes = correct_answer(&session);
        answer(&mut session, !yes);
        tick(&mut session, &TickInput::default(), 500);
        assert_eq!(session.round.phase_results, vec![false]);
    }

    #[test]
    fn test_perfect_round_scores() {
        let (mut session, _) = started(1, 2024);
        play_symmetry_phases_correctly(&mut session);

        let ids = memorized_ids(&session);
        assert_eq!(ids.len(), 2);
        let events = click(&mut session, &ids);
        assert!(events.contains(&GameEvent::PhaseResolved {
            kind: PhaseKind::Identify,
            correct: true
        }));
        assert_eq!(session.round.phase_results, vec![true, true, true]);
        assert_eq!(session.phase, GamePhase::Identify { locked: true });
        assert_eq!(session.state.score, 0);

        // Round completes after the feedback delay regardless of the phase timer
        let events = run_until(&mut session, 1_000, |s| s.phase == GamePhase::RoundComplete);
        assert!(events.contains(&GameEvent::RoundCompleted {
            round: 1,
            awarded: true,
            score: 1
        }));
        assert_eq!(session.state.score, 1);
        assert_eq!(session.state.rounds_completed, 1);
        assert_eq!(session.state.current_round, 2);

        // Next round starts after the round delay with a fresh layout
        let first_layout = session.round.dots.clone();
        let events = run_until(&mut session, 2_000, |s| s.phase == GamePhase::Highlight);
        assert!(events.contains(&GameEvent::RoundStarted { round: 2 }));
        assert_eq!(session.state.rounds_attempted, 2);
        assert_eq!(session.round.memorized_sequence.len(), 1);
        assert!(session.round.phase_results.is_empty());
        assert_ne!(session.round.dots, first_layout);
    }

    #[test]
    fn test_wrong_order_flags_clicked_dots() {
        let (mut session, _) = started(1, 99);
        play_symmetry_phases_correctly(&mut session);

        let mut ids = memorized_ids(&session);
        ids.reverse();
        let events = click(&mut session, &ids);
        assert!(events.contains(&GameEvent::WrongDotsFlagged { ids: ids.clone() }));
        assert_eq!(session.round.phase_results, vec![true, true, false]);

        run_until(&mut session, 1_000, |s| s.phase == GamePhase::RoundComplete);
        assert_eq!(session.state.score, 0);
        assert_eq!(session.state.rounds_completed, 0);
    }

    #[test]
    fn test_identify_uses_round_layout_and_caps_clicks() {
        let (mut session, _) = started(1, 8);
        let layout = session.round.dots.clone();
        play_symmetry_phases_correctly(&mut session);
        assert_eq!(session.round.dots, layout);

        let ids = memorized_ids(&session);
        let other = (0..60).find(|id| !ids.contains(id)).unwrap();
        click(&mut session, &[ids[0], ids[1], other]);
        assert_eq!(session.round.user_sequence, ids);
        assert!(session.round.user_sequence.len() <= session.round.memorized_sequence.len());
    }

    #[test]
    fn test_identify_timeout_evaluates_partial_input() {
        let (mut session, _) = started(1, 31);
        play_symmetry_phases_correctly(&mut session);

        let first = memorized_ids(&session)[0];
        let events = click(&mut session, &[first]);
        assert!(events.contains(&GameEvent::SequenceChanged { clicked: 1 }));
        assert_eq!(session.phase, GamePhase::Identify { locked: false });

        let events = run_until(&mut session, 13_000, |s| s.phase == GamePhase::RoundComplete);
        assert!(events.contains(&GameEvent::WrongDotsFlagged { ids: vec![first] }));
        assert_eq!(session.round.phase_results, vec![true, true, false]);
        assert_eq!(session.state.score, 0);
    }

    #[test]
    fn test_clicks_outside_identify_ignored() {
        let (mut session, _) = started(1, 4);
        let events = click(&mut session, &[0, 1, 2]);
        assert!(session.round.user_sequence.is_empty());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::DotClicked { .. })));
    }

    #[test]
    fn test_memorized_sequence_never_exceeds_level_count() {
        // Extra highlight phases beyond dots_to_memorize add nothing new
        let mut settings = Settings::default();
        let mut level = LevelConfig::standard(1, "Test", 1, settings.levels[0].symmetry);
        level.phases.insert(0, PhaseSpec::new(PhaseKind::Highlight, 1));
        level.phases.insert(0, PhaseSpec::new(PhaseKind::Highlight, 1));
        settings.levels[0] = level;

        let mut session = Session::new(settings, 1, 17).unwrap();
        start_session(&mut session);
        run_until(&mut session, 10_000, in_symmetry);
        assert_eq!(session.round.highlight_phase_count, 3);
        assert_eq!(session.round.memorized_sequence.len(), 1);
    }

    #[test]
    fn test_unknown_phase_is_skipped() {
        let mut settings = Settings::default();
        settings.levels[0].phases.insert(0, PhaseSpec::new(PhaseKind::Unknown, 5));

        let mut session = Session::new(settings, 1, 3).unwrap();
        let events = start_session(&mut session);
        assert_eq!(session.round.current_phase_index, 1);
        assert_eq!(session.phase, GamePhase::Highlight);
        assert!(!events.contains(&GameEvent::PhaseEntered {
            kind: PhaseKind::Unknown
        }));
    }

    #[test]
    fn test_session_clock_ends_session_mid_phase() {
        let mut settings = Settings::default();
        settings.session_duration_secs = 2;
        let mut session = Session::new(settings, 1, 10).unwrap();
        start_session(&mut session);

        let events = run_until(&mut session, 3_000, |s| !s.is_playing());
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(!session.phase_timer_running());
        assert!(!session.delay_pending());
        assert_eq!(session.state.time_remaining_secs, 0);

        let summary = session.summary.clone().unwrap();
        assert_eq!(summary.rounds_attempted, 1);
        assert_eq!(summary.score, 0);
        assert_eq!(summary.time_played_secs, 2);
        assert!(matches!(events.last(), Some(GameEvent::SessionEnded { .. })));

        // Torn-down session ignores further ticks and input
        let events = click(&mut session, &[0]);
        assert!(events.is_empty());
        assert!(tick(&mut session, &TickInput::default(), 60_000).is_empty());
    }

    #[test]
    fn test_zero_length_session_ends_on_first_tick() {
        let mut settings = Settings::default();
        settings.session_duration_secs = 0;
        let mut session = Session::new(settings, 1, 4).unwrap();
        start_session(&mut session);
        assert!(session.is_playing());

        let events = tick(&mut session, &TickInput::default(), STEP);
        assert!(!session.is_playing());
        assert_eq!(session.phase, GamePhase::GameOver);
        let summary = session.summary.clone().unwrap();
        assert_eq!(summary.rounds_attempted, 1);
        assert_eq!(summary.time_played_secs, 0);
        assert!(matches!(events.last(), Some(GameEvent::SessionEnded { .. })));
    }

    #[test]
    fn test_tick_input_is_empty() {
        assert!(TickInput::default().is_empty());
        let answered = TickInput {
            symmetry_answer: Some(false),
            ..Default::default()
        };
        assert!(!answered.is_empty());
        let clicked = TickInput {
            dot_clicks: vec![3],
            ..Default::default()
        };
        assert!(!clicked.is_empty());
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut session = Session::new(Settings::default(), 1, 1).unwrap();
        assert!(tick(&mut session, &TickInput::default(), 1000).is_empty());
        assert_eq!(session.phase, GamePhase::Idle);
    }

    #[test]
    fn test_determinism() {
        let (mut a, _) = started(3, 12345);
        let (mut b, _) = started(3, 12345);
        for _ in 0..200 {
            tick(&mut a, &TickInput::default(), STEP);
            tick(&mut b, &TickInput::default(), STEP);
        }
        assert_eq!(a.round.dots, b.round.dots);
        assert_eq!(memorized_ids(&a), memorized_ids(&b));
        assert_eq!(a.round.phase_results, b.round.phase_results);
        assert_eq!(a.state.current_round, b.state.current_round);
    }

    #[test]
    fn test_full_session_counts_rounds() {
        let (mut session, _) = started(1, 77);
        run_until(&mut session, 361_000, |s| !s.is_playing());
        // Unattended: every round is attempted, none completed.
        // A level-1 round is 3+6+3+6+12 = 30s plus a 1s pause.
        let summary = session.summary.unwrap();
        assert_eq!(summary.rounds_completed, 0);
        assert_eq!(summary.score, 0);
        assert_eq!(summary.rounds_attempted, 12);
        assert_eq!(summary.accuracy, 0);
    }
}
