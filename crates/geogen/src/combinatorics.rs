//! Small enumeration helpers shared by the matcher and the canonicalizer.

/// All `k`-element subsets of `items`, each in the order of `items`,
/// listed in lexicographic order of positions.
pub fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    if k > items.len() {
        return Vec::new();
    }
    if k == 0 {
        return vec![Vec::new()];
    }
    let n = items.len();
    let mut idx: Vec<usize> = (0..k).collect();
    let mut out = Vec::new();
    loop {
        out.push(idx.iter().map(|&i| items[i]).collect());
        // rightmost position that can still move right
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] < n - k + i {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Rearrange `v` into the next lexicographic permutation.
/// Returns `false` (leaving `v` sorted ascending) after the last one.
pub fn next_permutation<T: Ord>(v: &mut [T]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        v.reverse();
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

/// Every ordering of `items` (`items.len()!` entries, starting with `items` itself
/// when it has no repeated elements).
pub fn permutations<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    let mut out = Vec::new();
    loop {
        out.push(order.iter().map(|&i| items[i]).collect());
        if !next_permutation(&mut order) {
            return out;
        }
    }
}

/// Odometer over the cartesian product of `sizes`; calls `visit` with one
/// index per dimension. Nothing is visited if any dimension is empty.
pub fn for_each_product(sizes: &[usize], mut visit: impl FnMut(&[usize])) {
    if sizes.iter().any(|&s| s == 0) {
        return;
    }
    let mut odometer = vec![0usize; sizes.len()];
    loop {
        visit(&odometer);
        let mut pos = sizes.len();
        loop {
            if pos == 0 {
                return;
            }
            pos -= 1;
            odometer[pos] += 1;
            if odometer[pos] < sizes[pos] {
                break;
            }
            odometer[pos] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combination_counts() {
        assert_eq!(combinations(&[1, 2, 3, 4], 2).len(), 6);
        assert_eq!(combinations(&[1, 2, 3], 3), vec![vec![1, 2, 3]]);
        assert!(combinations(&[1, 2], 3).is_empty());
        assert_eq!(combinations::<u8>(&[], 0), vec![Vec::<u8>::new()]);
        assert_eq!(
            combinations(&['a', 'b', 'c'], 2),
            vec![vec!['a', 'b'], vec!['a', 'c'], vec!['b', 'c']]
        );
    }

    #[test]
    fn permutations_cover_all_orders() {
        let p = permutations(&[7, 8, 9]);
        assert_eq!(p.len(), 6);
        assert_eq!(p[0], vec![7, 8, 9]);
        assert_eq!(p[5], vec![9, 8, 7]);
        assert_eq!(permutations::<u8>(&[]), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn product_visits_every_tuple_once() {
        let mut seen = Vec::new();
        for_each_product(&[2, 3], |t| seen.push(t.to_vec()));
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[0], vec![0, 0]);
        assert_eq!(seen[5], vec![1, 2]);

        let mut count = 0;
        for_each_product(&[], |_| count += 1);
        assert_eq!(count, 1);
        for_each_product(&[3, 0], |_| count += 1);
        assert_eq!(count, 1);
    }
}
