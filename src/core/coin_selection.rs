//! Coin selection
//!
//! A simplified branch and bound search in the spirit of Erhardt's coin selection
//! paper, with a single random draw as the fallback when the search gives up.
//! Selection order is randomized on purpose, so two calls with the same pool may
//! pick different coins.

use crate::core::Utxo;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// How many search nodes branch and bound may visit before giving up
pub const DEFAULT_SELECTION_ATTEMPTS: usize = 1_000_000;

/// Select UTXOs from `available` whose amounts add up to at least `spend_target`.
///
/// Returns an empty vector when the pool cannot cover the target. A successful
/// selection never sums to less than the target, but may overshoot it.
pub fn select_coins(spend_target: u64, available: &[Utxo]) -> Vec<Utxo> {
    select_coins_with(
        spend_target,
        available,
        DEFAULT_SELECTION_ATTEMPTS,
        &mut rand::thread_rng(),
    )
}

/// Same as [`select_coins`] with an explicit attempt budget and random source.
pub fn select_coins_with<R: Rng + ?Sized>(
    spend_target: u64,
    available: &[Utxo],
    attempts: usize,
    rng: &mut R,
) -> Vec<Utxo> {
    let selected = BranchAndBound::new(attempts, available).run(spend_target, rng);
    if !selected.is_empty() {
        return selected;
    }

    debug!(
        "Branch and bound found no selection for {spend_target} from {} UTXOs, trying single random draw",
        available.len()
    );
    single_random_draw(spend_target, available, rng)
}

// One point in the include/exclude tree
struct SearchNode {
    depth: usize,
    selected: Vec<usize>,
    amount: u64,
}

// Search context: the remaining attempt budget and the candidates by amount, largest first
struct BranchAndBound<'a> {
    attempts: usize,
    candidates: Vec<&'a Utxo>,
}

impl<'a> BranchAndBound<'a> {
    fn new(attempts: usize, available: &'a [Utxo]) -> BranchAndBound<'a> {
        let mut candidates: Vec<&Utxo> = available.iter().collect();
        // stable sort, done once per search
        candidates.sort_by(|a, b| b.get_amount().cmp(&a.get_amount()));
        BranchAndBound {
            attempts,
            candidates,
        }
    }

    // Depth-first over an explicit stack. The branch pushed last is explored first,
    // and the first node that reaches the target ends the whole search, even one
    // popped after the attempt budget has run out.
    fn run<R: Rng + ?Sized>(&mut self, spend_target: u64, rng: &mut R) -> Vec<Utxo> {
        let mut stack = vec![SearchNode {
            depth: 0,
            selected: vec![],
            amount: 0,
        }];

        while let Some(node) = stack.pop() {
            self.attempts = self.attempts.saturating_sub(1);

            if node.amount >= spend_target {
                return node
                    .selected
                    .iter()
                    .map(|&idx| self.candidates[idx].clone())
                    .collect();
            }

            // out of budget: nodes already stacked are still checked, but none are expanded
            if self.attempts == 0 {
                continue;
            }

            if node.depth >= self.candidates.len() {
                continue;
            }

            let candidate = self.candidates[node.depth];
            let mut with_selected = node.selected.clone();
            with_selected.push(node.depth);

            let with_this = SearchNode {
                depth: node.depth + 1,
                selected: with_selected,
                amount: node.amount.saturating_add(candidate.get_amount()),
            };
            let without_this = SearchNode {
                depth: node.depth + 1,
                selected: node.selected,
                amount: node.amount,
            };

            if rng.gen_bool(0.5) {
                stack.push(without_this);
                stack.push(with_this);
            } else {
                stack.push(with_this);
                stack.push(without_this);
            }
        }

        if self.attempts == 0 {
            debug!("Branch and bound ran out of attempts");
        }
        vec![]
    }
}

fn single_random_draw<R: Rng + ?Sized>(
    spend_target: u64,
    available: &[Utxo],
    rng: &mut R,
) -> Vec<Utxo> {
    let mut pool: Vec<&Utxo> = available.iter().collect();
    pool.shuffle(rng);

    let mut selected = vec![];
    let mut amount: u64 = 0;

    while amount < spend_target {
        let Some(utxo) = pool.pop() else {
            // ran out of UTXOs, the amount cannot be made up
            return vec![];
        };
        amount = amount.saturating_add(utxo.get_amount());
        selected.push(utxo.clone());
        pool.shuffle(rng);
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Transaction, Utxo};
    use crate::utils::generate_address;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn utxo_pool(amounts: &[u64]) -> Vec<Utxo> {
        let address = generate_address();
        amounts
            .iter()
            .enumerate()
            .map(|(height, &amount)| {
                let tx = Transaction::new_coinbase(height, &address, amount);
                Utxo::from_transaction(&tx, 0).unwrap()
            })
            .collect()
    }

    fn sorted_amounts(utxos: &[Utxo]) -> Vec<u64> {
        let mut amounts: Vec<u64> = utxos.iter().map(Utxo::get_amount).collect();
        amounts.sort_unstable();
        amounts
    }

    #[test]
    fn test_select_coins_exact() {
        let pool = utxo_pool(&[30, 10, 15]);

        for _ in 0..50 {
            let selected = select_coins(45, &pool);
            assert_eq!(selected.len(), 2);
            assert_eq!(sorted_amounts(&selected), vec![15, 30]);
        }
    }

    #[test]
    fn test_select_coins_inexact_match() {
        let pool = utxo_pool(&[30, 10, 15]);

        let selected = select_coins(50, &pool);
        assert_eq!(selected.len(), 3);
        assert_eq!(selected.iter().map(Utxo::get_amount).sum::<u64>(), 55);
        assert_eq!(sorted_amounts(&selected), vec![10, 15, 30]);
    }

    #[test]
    fn test_select_coins_insufficient_funds() {
        let pool = utxo_pool(&[30, 10, 15]);
        assert!(select_coins(150, &pool).is_empty());
    }

    #[test]
    fn test_select_coins_empty_pool() {
        assert!(select_coins(1, &[]).is_empty());
    }

    #[test]
    fn test_zero_target_selects_nothing() {
        let pool = utxo_pool(&[5]);
        assert!(select_coins(0, &pool).is_empty());
    }

    #[test]
    fn test_exhausted_budget_falls_back_to_random_draw() {
        let pool = utxo_pool(&[30, 10, 15]);
        let mut rng = StdRng::seed_from_u64(7);

        // a single attempt cannot get past the root node
        let selected = select_coins_with(50, &pool, 1, &mut rng);
        assert_eq!(sorted_amounts(&selected), vec![10, 15, 30]);

        let selected = select_coins_with(20, &pool, 1, &mut rng);
        assert!(selected.iter().map(Utxo::get_amount).sum::<u64>() >= 20);
    }

    #[test]
    fn test_stacked_branch_is_checked_after_budget_runs_out() {
        let pool = utxo_pool(&[30]);

        // the root and one child use up the budget; the other child is still checked
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = BranchAndBound::new(2, &pool).run(30, &mut rng);
            assert_eq!(sorted_amounts(&selected), vec![30]);
        }
    }

    #[test]
    fn test_single_random_draw_contract() {
        let pool = utxo_pool(&[4, 8, 15, 16, 23, 42]);
        let mut rng = StdRng::seed_from_u64(42);

        for target in 1..=108 {
            let selected = single_random_draw(target, &pool, &mut rng);
            assert!(selected.iter().map(Utxo::get_amount).sum::<u64>() >= target);
        }
        assert!(single_random_draw(109, &pool, &mut rng).is_empty());
    }

    #[test]
    fn test_select_coins_random_series() {
        let mut rng = StdRng::seed_from_u64(2023);

        for _ in 0..5_000 {
            let count = rng.gen_range(1..=10);
            let amounts: Vec<u64> = (0..count).map(|_| rng.gen_range(1..=100)).collect();
            let pool = utxo_pool(&amounts);
            let spend_target = rng.gen_range(1..=100);
            let can_be_made = amounts.iter().sum::<u64>() >= spend_target;

            let selected =
                select_coins_with(spend_target, &pool, DEFAULT_SELECTION_ATTEMPTS, &mut rng);

            assert!(selected.len() <= pool.len());
            if can_be_made {
                assert!(selected.iter().map(Utxo::get_amount).sum::<u64>() >= spend_target);
            } else {
                assert!(selected.is_empty());
            }
        }
    }
}
