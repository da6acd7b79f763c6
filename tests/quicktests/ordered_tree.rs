use ordered_tree::OrderedTree;

use std::collections::{BTreeMap, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and to a map counting each key.
/// This way we can ensure that after a random smattering of inserts
/// and removes we have the same keys, as many times, in both.
fn do_ops<K>(ops: &[Op<K>], tree: &mut OrderedTree<K>, counts: &mut BTreeMap<K, usize>)
where
    K: Clone + Ord,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                tree.insert(k.clone());
                *counts.entry(k.clone()).or_default() += 1;
            }
            Op::Remove(k) => {
                let removed = tree.remove(k);
                match counts.get_mut(k) {
                    Some(count) => {
                        assert!(removed.is_some());
                        *count -= 1;
                        if *count == 0 {
                            counts.remove(k);
                        }
                    }
                    None => assert!(removed.is_none()),
                }
            }
        }
    }
}

/// The sorted keys a map of counts describes.
fn expand<K: Clone>(counts: &BTreeMap<K, usize>) -> Vec<K> {
    counts
        .iter()
        .flat_map(|(k, count)| std::iter::repeat(k.clone()).take(*count))
        .collect()
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(first: i8, ops: Vec<Op<i8>>) -> bool {
        let mut tree = OrderedTree::new(first);
        let mut counts = BTreeMap::from([(first, 1)]);

        do_ops(&ops, &mut tree, &mut counts);
        let expected = expand(&counts);

        tree.is_valid_ordered_tree()
            && tree.len() == expected.len()
            && tree.to_ordered_vec() == expected
    }

    fn in_order_is_non_decreasing(first: i16, ops: Vec<Op<i16>>) -> bool {
        let mut tree = OrderedTree::new(first);
        let mut counts = BTreeMap::from([(first, 1)]);

        do_ops(&ops, &mut tree, &mut counts);

        let keys: Vec<_> = tree.keys().collect();
        keys.windows(2).all(|pair| pair[0] <= pair[1])
    }

    fn permutation_round_trips(xs: Vec<u16>) -> bool {
        // Keep the first occurrence of each key to get a permutation of 0..n.
        let mut seen = HashSet::new();
        let order: Vec<_> = xs.into_iter().filter(|x| seen.insert(*x)).collect();
        let mut ranks = order.clone();
        ranks.sort_unstable();
        let permutation: Vec<usize> = order
            .iter()
            .map(|x| ranks.binary_search(x).unwrap())
            .collect();

        match OrderedTree::from_keys(permutation.iter().copied()) {
            Ok(tree) => tree.to_ordered_vec() == (0..permutation.len()).collect::<Vec<_>>(),
            Err(_) => permutation.is_empty(),
        }
    }

    fn contains(xs: Vec<i8>) -> bool {
        let Ok(tree) = OrderedTree::from_keys(xs.iter().copied()) else {
            return xs.is_empty();
        };

        xs.iter().all(|x| tree.search(x).map(|node| node.key()) == Some(x))
    }

    fn contains_not(first: i8, xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = OrderedTree::new(first);
        tree.extend(xs.iter().copied());

        let added: HashSet<_> = xs.into_iter().chain([first]).collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| tree.search(x).is_none())
    }

    fn with_removals(first: i8, xs: Vec<i8>, removes: Vec<i8>) -> bool {
        let mut tree = OrderedTree::new(first);
        tree.extend(xs.iter().copied());
        for remove in &removes {
            // We may have inserted the same key multiple times - remove each one.
            while tree.remove(remove).is_some() {}
        }

        let mut still_present = xs;
        still_present.push(first);
        still_present.retain(|x| !removes.contains(x));

        removes.iter().all(|x| !tree.contains(x))
            && still_present.iter().all(|x| tree.contains(x))
            && tree.len() == still_present.len()
    }

    fn neighbours_of_distinct_keys_are_adjacent(first: i8, xs: Vec<i8>) -> bool {
        let mut seen = HashSet::from([first]);
        let mut tree = OrderedTree::new(first);
        tree.extend(xs.into_iter().filter(|x| seen.insert(*x)));

        let sorted: Vec<_> = tree.keys().copied().collect();

        tree.in_order().enumerate().all(|(i, node)| {
            let before = i.checked_sub(1).map(|i| sorted[i]);
            let after = sorted.get(i + 1).copied();

            node.predecessor().map(|n| *n.key()) == before
                && node.successor().map(|n| *n.key()) == after
        })
    }
}
