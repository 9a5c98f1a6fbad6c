use automata::{Automaton, AutomatonKind, Outcome, SampleManager, DEFAULT_STEP_LIMIT};

fn sample(kind: AutomatonKind) -> Automaton {
    SampleManager::get_sample_by_kind(kind)
        .and_then(|sample| sample.build())
        .unwrap()
}

fn check(kind: AutomatonKind, cases: &[(&str, Outcome)]) {
    let automaton = sample(kind);

    for &(input, expected) in cases {
        assert_eq!(
            automaton.run(input, DEFAULT_STEP_LIMIT),
            expected,
            "{} on {:?}",
            kind,
            input
        );
    }
}

#[test]
fn dfa_even_zeros() {
    use Outcome::*;
    check(
        AutomatonKind::Dfa,
        &[
            ("00", Accepted),
            ("1010", Accepted),
            ("01010", Rejected),
            ("111", Accepted),
            ("0", Rejected),
            ("", Accepted),
            ("1001", Accepted),
        ],
    );
}

#[test]
fn nfa_ends_with_01() {
    use Outcome::*;
    check(
        AutomatonKind::Nfa,
        &[
            ("01", Accepted),
            ("001", Accepted),
            ("11101", Accepted),
            ("0101", Accepted),
            ("10", Rejected),
            ("", Rejected),
        ],
    );
}

#[test]
fn pda_zeros_then_ones() {
    use Outcome::*;
    check(
        AutomatonKind::Pda,
        &[
            ("0011", Accepted),
            ("01", Accepted),
            ("000111", Accepted),
            ("001", Rejected),
            ("10", Rejected),
            ("", Accepted),
        ],
    );
}

#[test]
fn tm_equal_zeros_ones_twos() {
    use Outcome::*;
    check(
        AutomatonKind::Tm,
        &[
            ("012", Accepted),
            ("001122", Accepted),
            ("01", Rejected),
            ("00122", Rejected),
            ("", Rejected),
        ],
    );
}

#[test]
fn tm_budget_too_small_is_undecided() {
    let automaton = sample(AutomatonKind::Tm);

    assert_eq!(automaton.run("000111222", 5), Outcome::Undecided);
    assert_eq!(automaton.run("000111222", DEFAULT_STEP_LIMIT), Outcome::Accepted);
}

#[test]
fn foreign_symbols_reject() {
    for kind in [
        AutomatonKind::Dfa,
        AutomatonKind::Nfa,
        AutomatonKind::Pda,
        AutomatonKind::Tm,
    ] {
        assert_eq!(sample(kind).run("0a1", DEFAULT_STEP_LIMIT), Outcome::Rejected);
    }
}
