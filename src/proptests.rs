use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeSet;

/// Walk every node and check ordering, balance and the cached fields.
/// Returns the tree's height.
fn validate_tree<K: Ord + fmt::Debug, C>(t: &OrderedTree<K, C>) -> i32 {
    fn walk<K: Ord + fmt::Debug>(
        nodes: &NodeArena<K>,
        id: NodeId,
        lo: Option<&K>,
        hi: Option<&K>,
    ) -> (i32, usize) {
        if id.is_null() {
            return (-1, 0);
        }
        let n = nodes.node(id);
        if let Some(lo) = lo {
            assert!(lo < &n.key, "{:?} must sort after {:?}", n.key, lo);
        }
        if let Some(hi) = hi {
            assert!(&n.key < hi, "{:?} must sort before {:?}", n.key, hi);
        }

        let (lh, lw) = walk(nodes, n.left, lo, Some(&n.key));
        let (rh, rw) = walk(nodes, n.right, Some(&n.key), hi);
        assert!(
            (lh - rh).abs() <= 1,
            "node {:?} out of balance: left {lh}, right {rh}",
            n.key
        );
        assert_eq!(n.height, lh.max(rh) + 1, "stale height at {:?}", n.key);
        assert_eq!(n.weight, lw + rw + 1, "stale weight at {:?}", n.key);
        (n.height, n.weight)
    }

    let (height, weight) = walk(&t.nodes, t.root, None, None);
    assert_eq!(weight, t.len());
    assert_eq!(t.nodes.live(), t.len(), "every live node must be reachable");

    // AVL height bound, in levels: h + 1 < 1.4405 log2(n + 2) - 0.3277.
    if weight > 0 {
        let levels = f64::from(height + 1);
        let bound = 1.4405 * ((weight + 2) as f64).log2() - 0.3277;
        assert!(levels <= bound, "height {height} too tall for {weight} keys");
    }
    height
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "0u16..512")] u16),
    #[proptest(weight = 30)]
    Remove(#[proptest(strategy = "0u16..512")] u16),
    #[proptest(weight = 10)]
    Contains(#[proptest(strategy = "0u16..512")] u16),
    #[proptest(weight = 9)]
    Rank(#[proptest(strategy = "0usize..600")] usize),
    #[proptest(weight = 1)]
    Clear,
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=2000)) {
        let mut t: OrderedTree<u16> = OrderedTree::new();
        let mut m: BTreeSet<u16> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    prop_assert_eq!(t.insert(key).get(), Some(&key));
                    m.insert(key);
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.take(&key));
                    prop_assert!(!t.contains(&key));
                }
                Op::Contains(key) => {
                    prop_assert_eq!(t.contains(&key), m.contains(&key));
                }
                Op::Rank(rank) => {
                    let expected = rank.checked_sub(1).and_then(|i| m.iter().nth(i));
                    prop_assert_eq!(t.k_order_statistic(rank).ok(), expected);
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got: Vec<u16> = t.iter().copied().collect();
        let expected: Vec<u16> = m.iter().copied().collect();
        prop_assert_eq!(&got, &expected);

        let mut back = Vec::new();
        let mut c = t.reverse_begin();
        while let Some(&k) = c.get() {
            back.push(k);
            c.move_prev();
        }
        back.reverse();
        prop_assert_eq!(back, expected);
    }

    #[test]
    fn prop_ranks_match_sorted(keys in prop::collection::btree_set(any::<i64>(), 0..=500)) {
        let t: OrderedTree<i64> = keys.iter().copied().collect();
        validate_tree(&t);
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(t.k_order_statistic(i + 1), Ok(k));
        }
        let len = keys.len();
        prop_assert_eq!(
            t.k_order_statistic(len + 1),
            Err(TreeError::RankOutOfRange { rank: len + 1, len })
        );
    }

    #[test]
    fn prop_insert_cursor_walks_rest(
        keys in prop::collection::vec(0u32..1000, 1..=300),
        probe in 0u32..1000,
    ) {
        let mut t: OrderedTree<u32> = keys.iter().copied().collect();
        let model: BTreeSet<u32> = keys.iter().copied().chain([probe]).collect();

        let mut c = t.insert(probe);
        let mut tail = Vec::new();
        while let Ok(&k) = c.key() {
            tail.push(k);
            c.move_next();
        }
        let expected: Vec<u32> = model.range(probe..).copied().collect();
        prop_assert_eq!(tail, expected);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<u8> = (1..=7).collect();

    for_each_permutation(&keys, |perm| {
        let t: OrderedTree<u8> = perm.iter().copied().collect();
        validate_tree(&t);
        assert_eq!(t.len(), keys.len());
        let got: Vec<u8> = t.iter().copied().collect();
        assert_eq!(got, keys);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys: Vec<u8> = (1..=7).collect();

    // Insert in a fixed order, then remove in all permutations.
    let base: OrderedTree<u8> = [4, 2, 6, 1, 3, 5, 7].into_iter().collect();

    for_each_permutation(&keys, |perm| {
        let mut t = base.clone();
        let mut m: BTreeSet<u8> = keys.iter().copied().collect();

        for k in perm {
            assert_eq!(t.remove(&k), m.take(&k));
            assert_eq!(t.len(), m.len());
            validate_tree(&t);
            for (i, expected) in m.iter().enumerate() {
                assert_eq!(t.k_order_statistic(i + 1), Ok(expected));
            }
        }
        assert!(t.is_empty());
        assert!(t.root.is_null());
    });
}

#[test]
fn sequential_inserts_stay_within_bound() {
    let mut t: OrderedTree<u32> = OrderedTree::new();
    for k in 0..5_000 {
        t.insert(k);
    }
    assert!(validate_tree(&t) <= 13);
    for k in (0..5_000).step_by(3) {
        t.remove(&k);
    }
    validate_tree(&t);
}
