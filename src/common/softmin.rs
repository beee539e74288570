use micromath::F32Ext;

/// Converts costs to a normalized probability distribution proportional to `exp(-cost)`.
///
/// The costs are shifted by their minimum before exponentiation, which does not change
/// the normalized result but keeps the largest term at exactly 1 so that long running
/// sums of costs cannot underflow every term to zero.
///
/// # Arguments
///
/// * `costs` - Input costs. Must not be empty.
/// * `result` - A buffer of the same length as `costs` to write the probabilities to.
pub fn softmin(costs: &[f32], result: &mut [f32]) {
    assert_eq!(costs.len(), result.len());
    assert!(!costs.is_empty());

    let min_cost = costs.iter().fold(f32::INFINITY, |min, cost| min.min(*cost));
    let mut sum = 0.0;
    for (probability, cost) in result.iter_mut().zip(costs.iter()) {
        *probability = F32Ext::exp(min_cost - *cost);
        sum += *probability;
    }
    // sum >= 1 since the minimum cost maps to exp(0)
    let scale = 1.0 / sum;
    for probability in result.iter_mut() {
        *probability *= scale;
    }
}
