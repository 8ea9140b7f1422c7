//! Execution engine selection.
//!
//! Algorithms are written once against these helpers; the policy decides
//! whether the work runs on the calling thread or is spread over rayon's pool.

use rayon::prelude::*;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    /// Every step runs on the calling thread.
    #[default]
    Sequential,
    /// Independent steps are distributed over rayon worker threads.
    Parallel,
}

impl ExecutionPolicy {
    pub(crate) fn for_each<I, T, F>(self, items: I, op: F)
    where
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        T: Send,
        F: Fn(T) + Sync + Send,
    {
        match self {
            ExecutionPolicy::Sequential => items.into_iter().for_each(op),
            ExecutionPolicy::Parallel => items.into_par_iter().for_each(op),
        }
    }

    pub(crate) fn any<I, T, F>(self, items: I, pred: F) -> bool
    where
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        T: Send,
        F: Fn(T) -> bool + Sync + Send,
    {
        match self {
            ExecutionPolicy::Sequential => items.into_iter().any(pred),
            ExecutionPolicy::Parallel => items.into_par_iter().any(pred),
        }
    }

    /// Keeps the items accepted by `pred`, in their original order.
    pub(crate) fn filter_collect<I, T, F>(self, items: I, pred: F) -> Vec<T>
    where
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        T: Send,
        F: Fn(&T) -> bool + Sync + Send,
    {
        match self {
            ExecutionPolicy::Sequential => items.into_iter().filter(|item| pred(item)).collect(),
            ExecutionPolicy::Parallel => items.into_par_iter().filter(|item| pred(item)).collect(),
        }
    }

    /// Maps every item, preserving the input order in the output.
    pub(crate) fn map_collect<I, T, U, F>(self, items: I, op: F) -> Vec<U>
    where
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        T: Send,
        U: Send,
        F: Fn(T) -> U + Sync + Send,
    {
        match self {
            ExecutionPolicy::Sequential => items.into_iter().map(op).collect(),
            ExecutionPolicy::Parallel => items.into_par_iter().map(op).collect(),
        }
    }

    pub(crate) fn sort_by<T, F>(self, items: &mut [T], compare: F)
    where
        T: Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        match self {
            ExecutionPolicy::Sequential => items.sort_by(compare),
            ExecutionPolicy::Parallel => items.par_sort_by(compare),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    const POLICIES: [ExecutionPolicy; 2] = [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel];

    #[test]
    fn for_each_visits_every_item() {
        for policy in POLICIES {
            let seen = AtomicUsize::new(0);
            policy.for_each(0..1000usize, |i| {
                seen.fetch_add(i, AtomicOrdering::Relaxed);
            });
            assert_eq!(seen.into_inner(), (0..1000).sum::<usize>());
        }
    }

    #[test]
    fn filter_collect_keeps_set_order() {
        let words: BTreeSet<&str> = ["pear", "apple", "fig", "kiwi"].into_iter().collect();
        for policy in POLICIES {
            let kept = policy.filter_collect(&words, |w| w.len() > 3);
            assert_eq!(kept, vec![&"apple", &"kiwi", &"pear"]);
        }
    }

    #[test]
    fn map_collect_preserves_order() {
        for policy in POLICIES {
            let doubled = policy.map_collect(vec![3, 1, 2], |x| x * 2);
            assert_eq!(doubled, vec![6, 2, 4]);
        }
    }

    #[test]
    fn sort_and_any_agree_across_policies() {
        for policy in POLICIES {
            let mut values = vec![5, 3, 9, 1];
            policy.sort_by(&mut values, |a, b| b.cmp(a));
            assert_eq!(values, vec![9, 5, 3, 1]);
            assert!(policy.any(&values, |v| *v == 3));
            assert!(!policy.any(&values, |v| *v == 4));
        }
    }
}
