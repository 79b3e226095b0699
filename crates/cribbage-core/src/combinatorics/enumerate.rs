use super::{Combination, CombinatoricsError};

/// `n` choose `k`, computed multiplicatively so intermediate values stay small.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc = 1u64;
    for i in 0..k {
        acc = acc * (n - i) as u64 / (i + 1) as u64;
    }
    acc
}

/// All `k`-combinations of `0..n` in lexicographic (combinadic) order.
///
/// Starts from `{0, 1, .., k-1}`; each step bumps the rightmost slot that still
/// has room (slot `x` may hold at most `n - k + x`) and packs every slot to its
/// right directly after it.
pub fn enumerate_combinations(
    n: usize,
    k: usize,
) -> Result<Vec<Combination>, CombinatoricsError> {
    if k == 0 || k > n {
        return Err(CombinatoricsError::InvalidArguments { n, k });
    }

    let mut indices: Vec<usize> = (0..k).collect();
    let mut combos = Vec::with_capacity(binomial(n, k) as usize);
    loop {
        combos.push(Combination::from_indices(&indices));
        let Some(x) = (0..k).rev().find(|&x| indices[x] < n - k + x) else {
            break;
        };
        indices[x] += 1;
        for y in (x + 1)..k {
            indices[y] = indices[y - 1] + 1;
        }
    }
    Ok(combos)
}

/// Every non-empty subset of `0..n`, grouped by ascending size.
pub fn enumerate_powerset(n: usize) -> Result<Vec<Combination>, CombinatoricsError> {
    if n == 0 {
        return Err(CombinatoricsError::InvalidArguments { n, k: 0 });
    }
    let mut subsets = Vec::new();
    for k in 1..=n {
        subsets.extend(enumerate_combinations(n, k)?);
    }
    Ok(subsets)
}

/// Positions of `0..n` that are not listed in `indices`, ascending.
pub fn index_complement(n: usize, indices: &[usize]) -> Vec<usize> {
    (0..n).filter(|index| !indices.contains(index)).collect()
}
