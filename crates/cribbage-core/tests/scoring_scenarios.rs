use cribbage_core::combinatorics::{CombinationCache, binomial, enumerate_combinations};
use cribbage_core::eval::{EvalError, HandEvaluator, evaluate};
use cribbage_core::model::card::Card;
use cribbage_core::model::deck::Deck;
use cribbage_core::model::hand::DealtHand;

fn cards(text: [&str; 5]) -> [Card; 5] {
    text.map(|c| c.parse::<Card>().expect("valid card text"))
}

fn evaluator() -> HandEvaluator {
    HandEvaluator::new(&CombinationCache::new()).expect("powerset of five")
}

#[test]
fn maximum_hand_scores_twenty_nine() -> Result<(), EvalError> {
    assert_eq!(evaluate(&cards(["5S", "5H", "5D", "JC", "5C"]), 4)?, 29);
    Ok(())
}

#[test]
fn jack_as_cut_loses_knobs() -> Result<(), EvalError> {
    // Same cards, but the jack is the cut: 16 + 12, no knobs.
    assert_eq!(evaluate(&cards(["5S", "5H", "5D", "5C", "JC"]), 4)?, 28);
    Ok(())
}

#[test]
fn four_card_flush_ignores_off_suit_cut() -> Result<(), EvalError> {
    let evaluator = evaluator();
    let hand = cards(["2H", "4H", "6H", "KH", "9S"]);
    let breakdown = evaluator.breakdown(&hand, 4)?;
    assert_eq!(breakdown.flush, 4);
    // 2+4+9 and 6+9.
    assert_eq!(breakdown.fifteens, 4);
    assert_eq!(breakdown.total, 8);
    Ok(())
}

#[test]
fn off_suit_card_in_hand_kills_flush_even_with_matching_cut() -> Result<(), EvalError> {
    let breakdown = evaluator().breakdown(&cards(["2H", "4H", "6H", "KD", "9H"]), 4)?;
    assert_eq!(breakdown.flush, 0);
    Ok(())
}

#[test]
fn all_even_hand_scores_nothing() -> Result<(), EvalError> {
    let breakdown = evaluator().breakdown(&cards(["2S", "4H", "6D", "8C", "KS"]), 4)?;
    assert_eq!(breakdown.total, 0);
    assert_eq!(breakdown.fifteens, 0);
    assert_eq!(breakdown.pairs, 0);
    assert_eq!(breakdown.runs, 0);
    Ok(())
}

#[test]
fn double_double_run_without_fifteens() -> Result<(), EvalError> {
    let breakdown = evaluator().breakdown(&cards(["5S", "5H", "6D", "6C", "7S"]), 4)?;
    assert_eq!(breakdown.runs, 12);
    assert_eq!(breakdown.pairs, 4);
    // Smallest triple is 5+5+6, every pair is at most 13.
    assert_eq!(breakdown.fifteens, 0);
    assert_eq!(breakdown.total, 16);
    Ok(())
}

#[test]
fn score_is_independent_of_non_cut_order() -> Result<(), EvalError> {
    let evaluator = evaluator();
    let hands = [
        ["5S", "5H", "5D", "JC", "5C"],
        ["3H", "4H", "5H", "JH", "6H"],
        ["7S", "8S", "8D", "9C", "QS"],
        ["AS", "2D", "3C", "KH", "JD"],
    ];
    for text in hands {
        let base = cards(text);
        let expected = evaluator.evaluate(&base, 4)?;
        for perm in permutations_of_four() {
            let shuffled = [base[perm[0]], base[perm[1]], base[perm[2]], base[perm[3]], base[4]];
            assert_eq!(evaluator.evaluate(&shuffled, 4)?, expected, "{text:?} {perm:?}");
        }
        // Moving the cut card to the front keeps the same designation.
        let moved = [base[4], base[0], base[1], base[2], base[3]];
        assert_eq!(evaluator.evaluate(&moved, 0)?, expected);
    }
    Ok(())
}

#[test]
fn sampled_hands_never_score_nineteen() {
    let evaluator = evaluator();
    for seed in 0..500u64 {
        let mut deck = Deck::shuffled_with_seed(seed);
        let dealt = DealtHand::deal_sized(&mut deck, 5).expect("five cards");
        let hand: [Card; 5] = dealt.cards().try_into().expect("five cards");
        for cut in 0..5 {
            let score = evaluator.evaluate(&hand, cut).expect("cut in range");
            assert_ne!(score, 19, "seed {seed}");
            assert!(score <= 29, "seed {seed}");
        }
    }
}

fn permutations_of_four() -> Vec<[usize; 4]> {
    let mut out = Vec::with_capacity(24);
    for a in 0..4 {
        for b in 0..4 {
            for c in 0..4 {
                for d in 0..4 {
                    let perm = [a, b, c, d];
                    let mut seen = [false; 4];
                    perm.iter().for_each(|&i| seen[i] = true);
                    if seen.iter().all(|&s| s) {
                        out.push(perm);
                    }
                }
            }
        }
    }
    out
}

#[test]
fn cached_counts_match_binomial() {
    let cache = CombinationCache::new();
    for (n, k) in [(6, 4), (6, 2), (46, 3), (47, 4), (8, 4)] {
        let combos = cache.combinations(n, k).expect("valid arguments");
        assert_eq!(combos.len() as u64, binomial(n, k));
        assert_eq!(&combos[..], enumerate_combinations(n, k).expect("valid").as_slice());
    }
    assert_eq!(cache.powerset(5).expect("non-empty").len(), 31);
}
